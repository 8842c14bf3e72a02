//! Per-application servlet registry.
//!
//! One [`ServletRegistry`] exists per deployed application. It owns the
//! named servlet instances, the ordered `(pattern → servlet name)` mapping
//! list, and the application-wide init-parameters.
//!
//! Registration is idempotent: descriptors are merged from several sources
//! in the original system, so re-registering an existing name is a no-op
//! (first registration wins), not an error. Mappings are validated when
//! they are added — a mapping whose target servlet is unknown is rejected
//! with [`RegistryError::InvalidMapping`] and fails the whole deployment;
//! the request path never sees a dangling mapping.
//!
//! All mutation happens during the deployment phase on one thread. The
//! finished registry is moved behind an `Arc` shared with the dispatch
//! worker, which only reads it; there is no interior locking.

mod core;
mod error;

pub use core::{ServletRegistry, UrlMapping};
pub use error::RegistryError;
