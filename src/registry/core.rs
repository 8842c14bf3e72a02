use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

use super::error::RegistryError;
use crate::locator::{self, compile_pattern, ServletNotFound};
use crate::servlet::{BoxedServlet, Servlet};

/// A declared association from a URL glob pattern to a servlet name.
///
/// The matcher is compiled once when the mapping is added; request-time
/// matching never compiles or allocates.
#[derive(Debug, Clone)]
pub struct UrlMapping {
    pattern: String,
    matcher: Regex,
    servlet_name: String,
}

impl UrlMapping {
    /// The URL pattern as written in the descriptor.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The servlet name this mapping resolves to.
    pub fn servlet_name(&self) -> &str {
        &self.servlet_name
    }

    /// Test a request path against this mapping's pattern.
    #[inline]
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }
}

/// The servlet registry of one application: named servlet instances plus
/// their URL mappings and the application-wide init-parameters.
#[derive(Default)]
pub struct ServletRegistry {
    servlets: HashMap<String, BoxedServlet>,
    mappings: Vec<UrlMapping>,
    init_params: HashMap<String, String>,
}

impl ServletRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `servlet` under `name` if the name is still free.
    ///
    /// Returns `true` when the servlet was newly added. A duplicate name is
    /// a no-op returning `false` — the first registration wins and the new
    /// instance is dropped, which keeps descriptor merging idempotent.
    pub fn register(&mut self, name: &str, servlet: BoxedServlet) -> bool {
        if self.servlets.contains_key(name) {
            debug!(
                servlet_name = %name,
                "servlet already registered, keeping the first instance"
            );
            return false;
        }
        self.servlets.insert(name.to_string(), servlet);
        true
    }

    /// Look up a servlet by its registered name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Servlet> {
        self.servlets.get(name).map(|servlet| servlet.as_ref())
    }

    /// Whether a servlet is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.servlets.contains_key(name)
    }

    /// Number of registered servlets.
    #[must_use]
    pub fn servlet_count(&self) -> usize {
        self.servlets.len()
    }

    /// Append a `(pattern → servlet name)` mapping, preserving insertion
    /// order. Order is semantically significant: the locator returns the
    /// first match in this order.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidMapping`] when `servlet_name` has not been
    /// registered, [`RegistryError::InvalidPattern`] when the glob cannot
    /// be compiled. Both make the owning application's deployment fail.
    pub fn add_mapping(&mut self, pattern: &str, servlet_name: &str) -> Result<(), RegistryError> {
        if !self.servlets.contains_key(servlet_name) {
            return Err(RegistryError::InvalidMapping {
                pattern: pattern.to_string(),
                servlet_name: servlet_name.to_string(),
            });
        }

        let matcher = compile_pattern(pattern)?;
        debug!(
            servlet_name = %servlet_name,
            pattern = %pattern,
            "registered servlet mapping"
        );
        self.mappings.push(UrlMapping {
            pattern: pattern.to_string(),
            matcher,
            servlet_name: servlet_name.to_string(),
        });
        Ok(())
    }

    /// The ordered mapping list, as declared in the descriptor.
    #[must_use]
    pub fn mappings(&self) -> &[UrlMapping] {
        &self.mappings
    }

    /// Resolve a request path to its mapping via the resource locator.
    ///
    /// # Errors
    ///
    /// [`ServletNotFound`] when no pattern matches.
    pub fn locate(&self, path: &str) -> Result<&UrlMapping, ServletNotFound> {
        locator::locate(&self.mappings, path)
    }

    /// Register an application-wide init-parameter.
    pub fn add_init_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.init_params.insert(name.into(), value.into());
    }

    /// Look up an application-wide init-parameter.
    #[must_use]
    pub fn init_parameter(&self, name: &str) -> Option<&str> {
        self.init_params.get(name).map(String::as_str)
    }
}
