//! Resource location: mapping a request path to the servlet responsible
//! for it.
//!
//! ## Pattern semantics
//!
//! URL patterns are shell globs, matched against the full logical path:
//!
//! - `*` matches any run of characters, including none — and including
//!   `/`; patterns are not segment-bounded,
//! - `?` matches exactly one character,
//! - `[...]` matches one character from the class (`[0-9]` ranges work,
//!   a leading `!` or `^` negates, a `]` right after the opening bracket
//!   is literal, an unterminated `[` is an ordinary character).
//!
//! ## Two-phase approach
//!
//! Patterns are compiled to anchored regexes once, when the mapping is
//! added to the registry ([`compile_pattern`]). Request-time matching
//! ([`locate`]) is a linear scan over the pre-compiled matchers in
//! descriptor-declaration order; the first match wins. There is no
//! specificity ranking — descriptor authors order mappings from most to
//! least specific, and [`locate`] depends only on that order and the
//! pattern semantics, never on registration timing.

mod core;

pub use core::{compile_pattern, locate, PatternError, ServletNotFound};
