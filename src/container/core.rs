use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use tracing::{info, warn};

use crate::dispatcher::{AppDispatcher, ServletRequest, ServletResponse};
use crate::registry::ServletRegistry;
use crate::runtime_config::RuntimeConfig;

/// Container-level routing failure: the target application identity is not
/// deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    ApplicationNotFound {
        /// The identity no deployed application answered to.
        identity: String,
    },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::ApplicationNotFound { identity } => {
                write!(f, "no application deployed under identity '{identity}'")
            }
        }
    }
}

impl std::error::Error for ContainerError {}

/// A deployed tenant: identity, frozen servlet registry and the running
/// dispatcher, bundled with exclusive ownership.
pub struct AppContext {
    identity: String,
    registry: Arc<ServletRegistry>,
    dispatcher: AppDispatcher,
}

impl AppContext {
    /// Freeze `registry` and bring up the application's dispatch worker.
    ///
    /// The worker stack size comes from [`RuntimeConfig::from_env`]
    /// (`APPC_STACK_SIZE`).
    ///
    /// # Safety
    ///
    /// Spawns the dispatch worker coroutine; see
    /// [`AppDispatcher::start`].
    ///
    /// # Errors
    ///
    /// Propagates the worker spawn failure; the context is not created and
    /// the registry is dropped.
    pub unsafe fn new(identity: impl Into<String>, registry: ServletRegistry) -> io::Result<Self> {
        let identity = identity.into();
        let registry = Arc::new(registry);
        let config = RuntimeConfig::from_env();
        // SAFETY: forwarded to AppDispatcher::start, same contract.
        let dispatcher =
            unsafe { AppDispatcher::start(&identity, Arc::clone(&registry), config.stack_size) }?;
        Ok(Self {
            identity,
            registry,
            dispatcher,
        })
    }

    /// The application's unique identity.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The application's frozen servlet registry.
    #[must_use]
    pub fn registry(&self) -> &ServletRegistry {
        &self.registry
    }

    /// The application's dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &AppDispatcher {
        &self.dispatcher
    }

    /// Stop the application's worker, completing any in-flight request
    /// first.
    pub fn shutdown(&self) {
        self.dispatcher.shutdown();
    }
}

/// The set of deployed applications and their lifecycle.
#[derive(Default)]
pub struct Container {
    applications: HashMap<String, AppContext>,
}

impl Container {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deployed application context under its identity.
    ///
    /// Returns `true` when the context was added. Deployment is idempotent
    /// like servlet registration: a second context with an already-taken
    /// identity is rejected (`false`), its worker is shut down and the
    /// first deployment stays authoritative.
    pub fn deploy(&mut self, context: AppContext) -> bool {
        if self.applications.contains_key(context.identity()) {
            warn!(
                application = %context.identity(),
                "application already deployed, keeping the first deployment"
            );
            context.shutdown();
            return false;
        }

        info!(
            application = %context.identity(),
            servlets = context.registry().servlet_count(),
            mappings = context.registry().mappings().len(),
            "application deployed"
        );
        self.applications
            .insert(context.identity().to_string(), context);
        true
    }

    /// Whether an application is deployed under `identity`.
    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.applications.contains_key(identity)
    }

    /// Look up a deployed application context.
    #[must_use]
    pub fn application(&self, identity: &str) -> Option<&AppContext> {
        self.applications.get(identity)
    }

    /// Iterate over all deployed application contexts.
    pub fn applications(&self) -> impl Iterator<Item = &AppContext> {
        self.applications.values()
    }

    /// Route a request to the application deployed under `identity` and
    /// wait for the completed response.
    ///
    /// # Errors
    ///
    /// [`ContainerError::ApplicationNotFound`] when the identity is
    /// unknown; the request is not dispatched anywhere.
    pub fn route(
        &self,
        identity: &str,
        request: ServletRequest,
    ) -> Result<ServletResponse, ContainerError> {
        let Some(context) = self.applications.get(identity) else {
            warn!(
                application = %identity,
                request_id = %request.request_id,
                path = %request.path,
                "request for unknown application"
            );
            return Err(ContainerError::ApplicationNotFound {
                identity: identity.to_string(),
            });
        };
        Ok(context.dispatcher().submit(request))
    }

    /// Transport-facing entry point: like [`Container::route`], but an
    /// unknown identity becomes the canonical "not found" response instead
    /// of an error.
    #[must_use]
    pub fn service_request(&self, identity: &str, request: ServletRequest) -> ServletResponse {
        match self.route(identity, request) {
            Ok(response) => response,
            Err(ContainerError::ApplicationNotFound { identity }) => ServletResponse::json(
                404,
                serde_json::json!({ "error": "Not Found", "application": identity }),
            ),
        }
    }

    /// Shut down every deployed application.
    ///
    /// Safe to call while dispatchers are busy: each worker finishes its
    /// in-flight request before its exit signal is honored, and each
    /// worker is joined before its context is dropped.
    pub fn shutdown(&mut self) {
        for (_, context) in self.applications.drain() {
            context.shutdown();
        }
        info!("container shut down");
    }
}
