use std::collections::HashMap;

use crate::dispatcher::{ServletRequest, ServletResponse};

/// Boxed servlet instance as stored in a registry.
pub type BoxedServlet = Box<dyn Servlet>;

/// Configuration handed to a servlet exactly once, at load time.
///
/// Carries the unique servlet name and the init-parameters declared in the
/// deployment descriptor. The parameter map is immutable after load; a
/// servlet that needs them at request time keeps the config (or the values
/// it extracted) from `init`.
#[derive(Debug, Clone, Default)]
pub struct ServletConfig {
    servlet_name: String,
    init_params: HashMap<String, String>,
}

impl ServletConfig {
    pub fn new(servlet_name: impl Into<String>, init_params: HashMap<String, String>) -> Self {
        Self {
            servlet_name: servlet_name.into(),
            init_params,
        }
    }

    /// The unique name this servlet was registered under.
    pub fn servlet_name(&self) -> &str {
        &self.servlet_name
    }

    /// Look up a single init-parameter.
    pub fn init_parameter(&self, name: &str) -> Option<&str> {
        self.init_params.get(name).map(String::as_str)
    }

    /// All init-parameters, as declared in the descriptor.
    pub fn init_parameters(&self) -> &HashMap<String, String> {
        &self.init_params
    }
}

/// The capability contract for request handlers.
///
/// Implementations must be `Send + Sync`: the instance is moved into the
/// owning application's registry (shared with the dispatch worker behind an
/// `Arc`) after initialization completes.
pub trait Servlet: Send + Sync + 'static {
    /// Called exactly once, after construction and before any `service`
    /// call. The default implementation accepts any configuration.
    ///
    /// # Errors
    ///
    /// An error aborts deployment of the owning application; the servlet
    /// will never see a request.
    fn init(&mut self, config: ServletConfig) -> anyhow::Result<()> {
        let _ = config;
        Ok(())
    }

    /// Process one request and fill in the response.
    ///
    /// # Errors
    ///
    /// An error is converted by the dispatch worker into a `500` response;
    /// it never escapes the worker or affects later requests.
    fn service(
        &self,
        request: &ServletRequest,
        response: &mut ServletResponse,
    ) -> anyhow::Result<()>;
}
