//! Typed environment variable reader with logged default fallbacks
//!
//! `envparse` reads one environment variable at a time and converts it to a
//! typed value. A conversion never fails: when the variable is unset, empty or
//! malformed, the caller's default is returned and a warning is reported.
//! A service with a bad setting starts with its defaults and says so in its
//! logs, and the calling code has no error branch to write.
//!
//! # Features
//!
//! - **Fluent**: `env("NAME").def(default).as_int()`
//! - **Typed defaults**: the default's type must match the conversion at compile time
//! - **Never fails**: every path yields a usable value
//! - **Logged fallbacks**: each substituted default is reported through `tracing`
//! - **Injectable diagnostics**: pass your own [`Diagnostics`] sink via [`Reader::new`]
//!
//! # Value Parsing
//!
//! - Strings: `DATABASE_URL=postgres://localhost/db` (verbatim)
//! - String lists: `FEATURE_FLAGS=a,b,c` (split on `,` or a custom separator)
//! - Integers: `MAX_RETRIES=3` (base-10 `i64`)
//! - Durations: `LOOKUP_TIMEOUT=1h30m`, `500ms`, `1.5s`
//! - Booleans: `1 t T TRUE true True` / `0 f F FALSE false False`
//! - Anything `FromStr`: [`Binding::as_parsed`]
//! - JSON: [`Binding::as_json`]
//!
//! # Example
//!
//! ```rust
//! use envparse::env;
//! use std::time::Duration;
//!
//! std::env::set_var("MAX_RETRIES", "abc");
//! std::env::set_var("ENABLE_CACHE", "1");
//! std::env::remove_var("LOOKUP_TIMEOUT");
//!
//! // Malformed: falls back to 3 and logs a warning
//! assert_eq!(env("MAX_RETRIES").def(3).as_int(), 3);
//!
//! // Unset: falls back to 5s and logs a warning
//! assert_eq!(
//!     env("LOOKUP_TIMEOUT").def(Duration::from_secs(5)).as_duration(),
//!     Duration::from_secs(5),
//! );
//!
//! assert!(env("ENABLE_CACHE").def(false).as_bool());
//! ```
//!
//! # Diagnostics
//!
//! Two warnings exist:
//!
//! - `using default value NAME=DEFAULT` when a default is substituted. If a
//!   parse error caused the fallback it is attached as the `error` field.
//! - `default value is invalid NAME=DEFAULT` when a conversion runs on a
//!   [`Lookup`] with no default attached. The target type's `Default` value
//!   is used in that case.
//!
//! [`env`] logs through [`TracingDiagnostics`]. Installing a subscriber is up
//! to the application.

mod binding;
pub mod de;
mod diagnostics;
mod error;

pub use binding::{Binding, Lookup, Reader};
pub use diagnostics::{
    Diagnostic, Diagnostics, RecordingDiagnostics, TracingDiagnostics, DEFAULT_INVALID,
    USING_DEFAULT,
};
pub use error::{ParseBoolError, ParseDurationError};

/// Capture an environment variable, reporting fallbacks through `tracing`
///
/// Shorthand for `Reader::tracing().lookup(name)`.
pub fn env(name: impl Into<String>) -> Lookup<'static> {
    Reader::tracing().lookup(name)
}
