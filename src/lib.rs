//! # appcontainer
//!
//! **appcontainer** is the request-dispatch core of a multi-tenant
//! application container, built on the `may` coroutine runtime.
//!
//! One process hosts N independently deployed applications. Each
//! application processes its requests in isolation from the others, while
//! the container serves all of them concurrently. This crate owns the two
//! hard parts of that arrangement:
//!
//! - the **dispatch protocol** that hands a request from the container's
//!   accepting context to an application's dedicated worker and returns
//!   the completed response, and
//! - the **servlet registry and resource locator** that map a request's
//!   logical path to the servlet responsible for it, with deterministic
//!   first-match routing and fatal ambiguity detection at load time.
//!
//! ## Architecture
//!
//! The library is organized into a handful of modules, leaves first:
//!
//! - **[`servlet`]** - the `Servlet` capability (`init` once at load time,
//!   `service` once per request) and its configuration
//! - **[`registry`]** - named servlet instances plus the ordered URL
//!   mapping list of one application
//! - **[`locator`]** - shell-glob pattern compilation and first-match path
//!   resolution
//! - **[`dispatcher`]** - the per-application worker coroutine and the
//!   single-flight submit/await rendezvous
//! - **[`container`]** - the set of deployed applications, identity-based
//!   routing, startup and shutdown
//! - **[`deploy`]** - descriptor records, the servlet constructor factory
//!   and per-application deployment
//! - **[`runtime_config`]** - environment-driven worker tuning
//! - **[`ids`]** - ULID request ids for log correlation
//!
//! ## Request flow
//!
//! ```text
//! transport ──▶ Container::service_request(identity, request)
//!                  │  identity lookup (ApplicationNotFound → 404)
//!                  ▼
//!               AppDispatcher::submit(request)        ── caller side
//!                  │  coordination lock + job channel
//!                  ▼
//!               dispatch worker (one coroutine/app)   ── worker side
//!                  │  locator::locate(mappings, path) (miss → 404)
//!                  ▼
//!               Servlet::service(request, response)   (Err/panic → 500)
//!                  │
//!                  ▼
//!               reply channel ──▶ submit returns ──▶ transport
//! ```
//!
//! ## Concurrency contract
//!
//! Requests within one application are strictly serialized: the
//! dispatcher's coordination lock is held for the whole submit→reply
//! exchange, so at most one request is in flight per application. This is
//! a deliberate single-flight-per-tenant policy matching an execution
//! model where servlets may rely on being called in sequence - not an
//! accidental bottleneck. Applications are isolated from one another's
//! load: every dispatcher has its own lock, channel and worker, and a slow
//! servlet in one tenant never delays dispatch to another.
//!
//! Request-time faults never escape the dispatch core. Unmatched paths,
//! failing servlets and panicking servlets all come back as well-defined
//! response values; load-time faults (dangling mappings, unknown servlet
//! classes, failing `init`) abort deployment of the single offending
//! application and leave the rest of the container serving.
//!
//! ## Out of scope
//!
//! Transport listening, descriptor parsing, virtual-host resolution,
//! session management and process bootstrap are external collaborators.
//! The crate is an in-process API boundary only.

pub mod container;
pub mod deploy;
pub mod dispatcher;
pub mod ids;
pub mod locator;
pub mod registry;
pub mod runtime_config;
pub mod servlet;

pub use container::{AppContext, Container, ContainerError};
pub use deploy::{
    build_application, AppDescriptor, DeployError, MappingRecord, ServletFactory, ServletRecord,
};
pub use dispatcher::{AppDispatcher, HeaderVec, ServletRequest, ServletResponse};
pub use locator::{PatternError, ServletNotFound};
pub use registry::{RegistryError, ServletRegistry, UrlMapping};
pub use servlet::{BoxedServlet, Servlet, ServletConfig};
