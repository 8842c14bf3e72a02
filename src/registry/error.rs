use std::fmt;

use crate::locator::PatternError;

/// Load-time registry failure.
///
/// Both variants are fatal to the deployment of the owning application and
/// are never raised at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A URL mapping references a servlet name that was never registered.
    InvalidMapping {
        /// The mapping's URL pattern.
        pattern: String,
        /// The unregistered servlet name the mapping points at.
        servlet_name: String,
    },
    /// A URL pattern could not be compiled into a matcher.
    InvalidPattern(PatternError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::InvalidMapping {
                pattern,
                servlet_name,
            } => {
                write!(
                    f,
                    "can't find servlet '{servlet_name}' for url-pattern '{pattern}'"
                )
            }
            RegistryError::InvalidPattern(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::InvalidMapping { .. } => None,
            RegistryError::InvalidPattern(err) => Some(err),
        }
    }
}

impl From<PatternError> for RegistryError {
    fn from(err: PatternError) -> Self {
        RegistryError::InvalidPattern(err)
    }
}
