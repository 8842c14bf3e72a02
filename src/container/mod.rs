//! Container orchestration: the process-wide set of deployed applications.
//!
//! The [`Container`] owns one [`AppContext`] per deployed application and
//! routes each accepted, virtual-host-resolved request to the owning
//! context's dispatcher. Which application a request belongs to is decided
//! by an external collaborator (virtual-host matching lives outside this
//! core); the container only needs the resulting identity.
//!
//! Request-time faults never cross the container boundary as errors:
//! [`Container::service_request`] converts an unknown application identity
//! into the canonical "not found" response, and everything below it (bad
//! paths, failing servlets) is already converted by the dispatcher.

mod core;

pub use core::{AppContext, Container, ContainerError};
