use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::DeployError;
use crate::container::AppContext;
use crate::registry::ServletRegistry;
use crate::servlet::{BoxedServlet, Servlet, ServletConfig};

/// One servlet registration record from the deployment descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServletRecord {
    /// Unique servlet name within the application.
    pub name: String,
    /// Class identifier resolved through the [`ServletFactory`].
    pub class_id: String,
    /// Init-parameters handed to the servlet's `init`, immutable after
    /// load.
    #[serde(default)]
    pub init_params: HashMap<String, String>,
}

impl ServletRecord {
    pub fn new(name: impl Into<String>, class_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_id: class_id.into(),
            init_params: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_init_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.init_params.insert(name.into(), value.into());
        self
    }
}

/// One URL mapping record from the deployment descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRecord {
    /// Shell-glob URL pattern.
    pub pattern: String,
    /// Target servlet name; must reference a servlet record.
    pub servlet_name: String,
}

impl MappingRecord {
    pub fn new(pattern: impl Into<String>, servlet_name: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            servlet_name: servlet_name.into(),
        }
    }
}

/// The fully parsed deployment descriptor of one application.
///
/// Record order is preserved end to end: mappings are added to the
/// registry in declaration order, which is what makes first-match routing
/// reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Unique application identity within the container.
    pub identity: String,
    /// Application-wide context parameters.
    #[serde(default)]
    pub context_params: HashMap<String, String>,
    /// Servlet registrations, in declaration order.
    #[serde(default)]
    pub servlets: Vec<ServletRecord>,
    /// URL mappings, in declaration order.
    #[serde(default)]
    pub mappings: Vec<MappingRecord>,
}

impl AppDescriptor {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            ..Self::default()
        }
    }
}

/// A servlet constructor as registered with the factory.
pub type ServletConstructor = Box<dyn Fn() -> BoxedServlet + Send + Sync>;

/// Constructor registry keyed by servlet class identifier.
///
/// The host process registers a constructor per servlet implementation it
/// ships; deployment resolves descriptor `class_id`s against this table
/// once, at load time.
#[derive(Default)]
pub struct ServletFactory {
    constructors: HashMap<String, ServletConstructor>,
}

impl ServletFactory {
    /// Create an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for `class_id`.
    ///
    /// Returns `true` when the constructor was newly added; like servlet
    /// registration, the first constructor for a class wins.
    pub fn register_constructor<F>(&mut self, class_id: &str, constructor: F) -> bool
    where
        F: Fn() -> BoxedServlet + Send + Sync + 'static,
    {
        if self.constructors.contains_key(class_id) {
            debug!(
                class_id = %class_id,
                "constructor already registered, keeping the first one"
            );
            return false;
        }
        self.constructors
            .insert(class_id.to_string(), Box::new(constructor));
        true
    }

    /// Whether a constructor is registered for `class_id`.
    #[must_use]
    pub fn contains(&self, class_id: &str) -> bool {
        self.constructors.contains_key(class_id)
    }

    /// Construct a fresh, uninitialized servlet instance.
    #[must_use]
    pub fn construct(&self, class_id: &str) -> Option<BoxedServlet> {
        self.constructors.get(class_id).map(|constructor| constructor())
    }
}

/// Build a running application from its descriptor.
///
/// Registers and initializes every servlet (first record wins on duplicate
/// names), adds the URL mappings in declaration order, freezes the
/// registry and starts the application's dispatch worker.
///
/// # Safety
///
/// Spawns the dispatch worker coroutine; see
/// [`AppDispatcher::start`](crate::dispatcher::AppDispatcher::start).
///
/// # Errors
///
/// Any [`DeployError`] aborts this application only: the partially built
/// registry is dropped, nothing was shared yet, and other applications are
/// unaffected.
pub unsafe fn build_application(
    descriptor: AppDescriptor,
    factory: &ServletFactory,
) -> Result<AppContext, DeployError> {
    let AppDescriptor {
        identity,
        context_params,
        servlets,
        mappings,
    } = descriptor;

    let mut registry = ServletRegistry::new();

    for (name, value) in context_params {
        registry.add_init_parameter(name, value);
    }

    for record in servlets {
        if registry.contains(&record.name) {
            debug!(
                application = %identity,
                servlet_name = %record.name,
                "duplicate servlet record skipped"
            );
            continue;
        }

        let Some(mut servlet) = factory.construct(&record.class_id) else {
            return Err(DeployError::UnknownServletClass {
                servlet_name: record.name,
                class_id: record.class_id,
            });
        };

        let config = ServletConfig::new(&record.name, record.init_params);
        servlet
            .init(config)
            .map_err(|source| DeployError::ServletInit {
                servlet_name: record.name.clone(),
                source,
            })?;

        registry.register(&record.name, servlet);
        debug!(
            application = %identity,
            servlet_name = %record.name,
            class_id = %record.class_id,
            "servlet initialized"
        );
    }

    for mapping in &mappings {
        registry.add_mapping(&mapping.pattern, &mapping.servlet_name)?;
    }

    let servlet_count = registry.servlet_count();
    let mapping_count = registry.mappings().len();

    // SAFETY: forwarded to AppContext::new, same contract.
    let context = unsafe { AppContext::new(identity.clone(), registry) }
        .map_err(|source| DeployError::WorkerSpawn { identity, source })?;

    info!(
        application = %context.identity(),
        servlets = servlet_count,
        mappings = mapping_count,
        "application built"
    );
    Ok(context)
}
