//! The servlet capability: the unit of request-processing logic an
//! application registers under a unique name.
//!
//! A servlet's lifecycle is deliberately small:
//!
//! 1. constructed by the [`ServletFactory`](crate::deploy::ServletFactory)
//!    during deployment,
//! 2. [`init`](Servlet::init) called exactly once with its
//!    [`ServletConfig`] (name plus immutable init-parameters) before any
//!    request reaches it,
//! 3. [`service`](Servlet::service) called once per dispatched request,
//!    always from the owning application's single dispatch worker.
//!
//! `service` takes `&self`: per-application requests are strictly
//! serialized by the dispatcher, but different applications run on
//! different workers, so a servlet type shared across tenants still needs
//! interior mutability for mutable state.

mod core;

pub use core::{BoxedServlet, Servlet, ServletConfig};
