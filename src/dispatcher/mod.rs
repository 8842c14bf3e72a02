//! Per-application request dispatch.
//!
//! One [`AppDispatcher`] exists per deployed application. It owns a single
//! persistent worker coroutine that serializes all request processing for
//! its application: wait for a job, locate the servlet, invoke it, reply,
//! loop. The worker exits only when the application is shut down.
//!
//! ## Handoff protocol
//!
//! [`AppDispatcher::submit`] is a rendezvous:
//!
//! 1. the caller takes the dispatcher's coordination lock,
//! 2. sends a job (request plus a fresh reply channel) to the worker,
//! 3. blocks on the reply channel until the worker has produced the
//!    response,
//! 4. releases the lock and returns the response.
//!
//! Because the lock is held across the whole exchange, at most one request
//! is in flight per application — a second concurrent `submit` blocks
//! until the first one completes. Callers targeting different applications
//! contend on nothing: each dispatcher has its own lock, its own channel
//! and its own worker, so a slow servlet in one application never delays
//! dispatch to another.
//!
//! ## Fault containment
//!
//! A servlet `Err` becomes a `500` response; a servlet panic is caught and
//! becomes a `500` response; an unmatched path becomes the canonical `404`
//! response without invoking any servlet. In every case the worker reaches
//! the reply step and survives to serve the next request — a failing
//! servlet can never wedge its application in the busy state.
//!
//! If a caller abandons a `submit` (for example a transport-level timeout
//! at the container boundary), the late response lands in that request's
//! own reply channel and is discarded; the next request gets a fresh
//! channel and a clean handoff.

mod core;

pub use core::{
    AppDispatcher, HeaderVec, ServletRequest, ServletResponse, MAX_INLINE_HEADERS,
};
