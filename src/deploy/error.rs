use std::fmt;
use std::io;

use crate::registry::RegistryError;

/// Load-time deployment failure.
///
/// Fatal to the single application being built; the container keeps
/// serving every application that already deployed.
#[derive(Debug)]
pub enum DeployError {
    /// The descriptor names a servlet class no constructor is registered
    /// for.
    UnknownServletClass {
        servlet_name: String,
        class_id: String,
    },
    /// A servlet's `init` rejected its configuration.
    ServletInit {
        servlet_name: String,
        source: anyhow::Error,
    },
    /// A mapping was invalid (dangling target or malformed pattern).
    Registry(RegistryError),
    /// The application's dispatch worker could not be spawned.
    WorkerSpawn { identity: String, source: io::Error },
}

impl fmt::Display for DeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::UnknownServletClass {
                servlet_name,
                class_id,
            } => {
                write!(
                    f,
                    "no constructor registered for servlet class '{class_id}' (servlet '{servlet_name}')"
                )
            }
            DeployError::ServletInit {
                servlet_name,
                source,
            } => {
                write!(f, "servlet '{servlet_name}' failed to initialize: {source}")
            }
            DeployError::Registry(err) => err.fmt(f),
            DeployError::WorkerSpawn { identity, source } => {
                write!(
                    f,
                    "failed to start the dispatch worker for application '{identity}': {source}"
                )
            }
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeployError::UnknownServletClass { .. } => None,
            DeployError::ServletInit { source, .. } => Some(source.as_ref()),
            DeployError::Registry(err) => Some(err),
            DeployError::WorkerSpawn { source, .. } => Some(source),
        }
    }
}

impl From<RegistryError> for DeployError {
    fn from(err: RegistryError) -> Self {
        DeployError::Registry(err)
    }
}
