//! Dispatcher core - the request hot path.

// No avoidable allocations after initialization on the dispatch path.
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::unnecessary_to_owned)]

use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use http::Method;
use may::coroutine::{self, JoinHandle};
use may::sync::{mpsc, Mutex, MutexGuard};
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, error, info, warn};

use crate::ids::RequestId;
use crate::registry::ServletRegistry;
use crate::servlet::Servlet;

/// Maximum inline headers before the header vector spills to the heap.
/// Most requests carry well under 16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the dispatch hot path.
///
/// Header names are `Arc<str>`: they repeat heavily across requests
/// (`content-type`, `accept`, ...) and clone in O(1), while values stay
/// per-request `String`s.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// A request as handed to this core by the transport layer: the logical
/// path used for routing plus payload the servlets interpret.
#[derive(Debug, Clone)]
pub struct ServletRequest {
    /// Unique id for log correlation, generated at construction.
    pub request_id: RequestId,
    /// HTTP method; routing ignores it, servlets branch on it.
    pub method: Method,
    /// Logical path the resource locator matches mappings against.
    pub path: String,
    /// Request headers, opaque to this core.
    pub headers: HeaderVec,
    /// Request body parsed as JSON, if any.
    pub body: Option<Value>,
}

impl ServletRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            headers: HeaderVec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Get a header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// The response sink a servlet writes into, returned to the transport
/// layer when dispatch completes.
#[derive(Debug, Clone, Serialize)]
pub struct ServletResponse {
    /// HTTP status code (200, 404, 500, ...).
    pub status: u16,
    /// Response headers.
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON.
    pub body: Value,
}

impl ServletResponse {
    /// Empty `200` response, the initial state handed to a servlet's
    /// `service` call.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: 200,
            headers: HeaderVec::new(),
            body: Value::Null,
        }
    }

    /// JSON response with the content type set.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Error response with a `{"error": message}` body.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// The canonical response for a path no mapping matches.
    #[must_use]
    pub fn not_found(path: &str) -> Self {
        Self::json(404, serde_json::json!({ "error": "Not Found", "path": path }))
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// One in-flight handoff between a submitting caller and the worker: the
/// request plus the reply channel the worker completes it on.
struct DispatchJob {
    request: ServletRequest,
    reply_tx: mpsc::Sender<ServletResponse>,
}

/// The per-application dispatcher: one worker coroutine, one job channel,
/// one coordination lock.
pub struct AppDispatcher {
    identity: Arc<str>,
    /// Coordination lock and job sender in one: held by a submitting
    /// caller for the whole submit→reply exchange (single flight), taken
    /// to `None` on shutdown.
    jobs: Mutex<Option<mpsc::Sender<DispatchJob>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AppDispatcher {
    /// Spawn the dispatch worker for `identity` and return the running
    /// dispatcher.
    ///
    /// The registry must be fully populated: the worker only reads it, and
    /// nothing synchronizes later writes.
    ///
    /// # Safety
    ///
    /// Spawning goes through `may::coroutine::Builder::spawn`, which is
    /// unsafe in the `may` runtime; the caller must ensure the runtime is
    /// usable (true in any ordinary process using this crate).
    ///
    /// # Errors
    ///
    /// Propagates the spawn failure, which callers treat as a load-time
    /// deployment error.
    pub unsafe fn start(
        identity: &str,
        registry: Arc<ServletRegistry>,
        stack_size: usize,
    ) -> io::Result<Self> {
        let (jobs_tx, jobs_rx) = mpsc::channel::<DispatchJob>();
        let identity: Arc<str> = Arc::from(identity);
        let worker_identity = Arc::clone(&identity);

        // SAFETY: the worker closure owns everything it touches (identity,
        // registry Arc, receiver); replies go through per-job channels, so
        // no references escape the coroutine.
        let handle = unsafe {
            coroutine::Builder::new()
                .name(format!("dispatch-{identity}"))
                .stack_size(stack_size)
                .spawn(move || Self::run(worker_identity, registry, jobs_rx))
        }?;

        debug!(application = %identity, stack_size, "dispatch worker spawned");
        Ok(Self {
            identity,
            jobs: Mutex::new(Some(jobs_tx)),
            worker: Mutex::new(Some(handle)),
        })
    }

    /// The application this dispatcher serves.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Hand a request to the worker and block until the response is ready.
    ///
    /// Requests for one application are strictly serialized: a concurrent
    /// `submit` blocks on the coordination lock until the current exchange
    /// completes. Submitting to a shut-down dispatcher returns a `503`
    /// marker response rather than panicking or hanging.
    #[must_use]
    pub fn submit(&self, request: ServletRequest) -> ServletResponse {
        let guard = lock(&self.jobs);
        let Some(jobs) = guard.as_ref() else {
            warn!(
                application = %self.identity,
                request_id = %request.request_id,
                "submit rejected, application has been shut down"
            );
            return ServletResponse::error(503, "application has been shut down");
        };

        let request_id = request.request_id;
        debug!(
            application = %self.identity,
            request_id = %request_id,
            path = %request.path,
            "request accepted for dispatch"
        );

        let started = Instant::now();
        let (reply_tx, reply_rx) = mpsc::channel();
        if jobs.send(DispatchJob { request, reply_tx }).is_err() {
            error!(
                application = %self.identity,
                request_id = %request_id,
                "dispatch worker is gone"
            );
            return ServletResponse::error(503, "application worker is not running");
        }

        match reply_rx.recv() {
            Ok(response) => {
                info!(
                    application = %self.identity,
                    request_id = %request_id,
                    status = response.status,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "request completed"
                );
                response
            }
            Err(_) => {
                error!(
                    application = %self.identity,
                    request_id = %request_id,
                    "dispatch worker stopped before completing the request"
                );
                ServletResponse::error(503, "application worker stopped before completing the request")
            }
        }
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Takes the coordination lock first, so an in-flight request finishes
    /// and its caller gets the real response before the worker is asked to
    /// exit. Safe to call more than once.
    pub fn shutdown(&self) {
        let mut jobs = lock(&self.jobs);
        let Some(sender) = jobs.take() else {
            return;
        };
        // Closing the channel ends the worker's receive loop.
        drop(sender);
        drop(jobs);

        let handle = lock(&self.worker).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!(application = %self.identity, "dispatch worker exited abnormally");
            }
        }
        info!(application = %self.identity, "dispatcher shut down");
    }

    fn run(identity: Arc<str>, registry: Arc<ServletRegistry>, jobs: mpsc::Receiver<DispatchJob>) {
        debug!(application = %identity, "dispatch worker started");

        for job in jobs.iter() {
            let request_id = job.request.request_id;
            info!(
                application = %identity,
                request_id = %request_id,
                method = %job.request.method,
                path = %job.request.path,
                "servlet execution start"
            );

            let started = Instant::now();
            let outcome =
                catch_unwind(AssertUnwindSafe(|| Self::process(&identity, &registry, &job.request)));
            let response = match outcome {
                Ok(response) => response,
                Err(panic) => {
                    error!(
                        application = %identity,
                        request_id = %request_id,
                        panic_message = %format!("{panic:?}"),
                        "servlet panicked"
                    );
                    ServletResponse::error(500, "servlet panicked while processing the request")
                }
            };

            info!(
                application = %identity,
                request_id = %request_id,
                status = response.status,
                execution_time_ms = started.elapsed().as_millis() as u64,
                "servlet execution complete"
            );

            if job.reply_tx.send(response).is_err() {
                warn!(
                    application = %identity,
                    request_id = %request_id,
                    "caller abandoned the request before completion"
                );
            }
        }

        debug!(application = %identity, "dispatch worker stopped");
    }

    fn process(
        identity: &str,
        registry: &ServletRegistry,
        request: &ServletRequest,
    ) -> ServletResponse {
        let mapping = match registry.locate(&request.path) {
            Ok(mapping) => mapping,
            Err(not_found) => {
                debug!(
                    application = %identity,
                    path = %not_found.path,
                    "no servlet mapping matched"
                );
                return ServletResponse::not_found(&request.path);
            }
        };

        let Some(servlet) = registry.get(mapping.servlet_name()) else {
            // add_mapping guarantees the target exists; reaching this means
            // the registry was mutated outside the deployment path.
            error!(
                application = %identity,
                servlet_name = %mapping.servlet_name(),
                "mapped servlet instance is missing from the registry"
            );
            return ServletResponse::error(500, "mapped servlet instance is missing");
        };

        debug!(
            application = %identity,
            servlet_name = %mapping.servlet_name(),
            pattern = %mapping.pattern(),
            path = %request.path,
            "servlet mapping matched"
        );

        let mut response = ServletResponse::ok();
        match servlet.service(request, &mut response) {
            Ok(()) => response,
            Err(err) => {
                error!(
                    application = %identity,
                    servlet_name = %mapping.servlet_name(),
                    error = %err,
                    "servlet execution failed"
                );
                ServletResponse::error(
                    500,
                    &format!(
                        "servlet '{}' failed to process the request",
                        mapping.servlet_name()
                    ),
                )
            }
        }
    }
}

// Dispatcher state stays consistent across a poisoned lock: the worker
// converts servlet faults to responses before they can poison anything,
// so a poisoned guard only means a submitting caller panicked mid-wait.
fn lock<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
