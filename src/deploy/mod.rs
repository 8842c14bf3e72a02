//! Application deployment: from parsed descriptor records to a running
//! [`AppContext`](crate::container::AppContext).
//!
//! Descriptor parsing itself (web.xml, JSON, whatever the host uses) is an
//! external collaborator; this module consumes the already-validated
//! record lists. Servlet implementations are resolved through a
//! [`ServletFactory`] — a registry of constructors keyed by class
//! identifier, resolved once at load time, so the "pluggable servlet
//! class" capability works without runtime reflection.
//!
//! [`build_application`] is all-or-nothing per application: an unknown
//! class, a failing `init`, a dangling or malformed mapping, or a worker
//! spawn failure aborts that one application and leaves the container (and
//! every other application) untouched.

mod core;
mod error;

pub use core::{
    build_application, AppDescriptor, MappingRecord, ServletConstructor, ServletFactory,
    ServletRecord,
};
pub use error::DeployError;
