//! Diagnostic sinks for default fallbacks
//!
//! A [`Diagnostics`] implementation receives one call per fallback. The crate
//! ships [`TracingDiagnostics`], which emits `tracing` warnings, and
//! [`RecordingDiagnostics`], which keeps them in memory for assertions. Any
//! implementation can be passed to [`Reader::new`](crate::Reader::new).

use std::cell::RefCell;
use std::fmt::{Debug, Display};

/// Message for a substituted default
pub const USING_DEFAULT: &str = "using default value";

/// Message for a binding converted without a usable default
pub const DEFAULT_INVALID: &str = "default value is invalid";

/// Receiver of non-fatal reader diagnostics.
pub trait Diagnostics {
    /// A default was returned in place of the environment value.
    ///
    /// `cause` is the parse error when the variable was set but malformed,
    /// and `None` when it was unset or empty.
    fn using_default(&self, name: &str, default: &dyn Debug, cause: Option<&dyn Display>);

    /// A conversion ran without a default of the requested type; `default`
    /// is the substitute that will be used instead.
    fn default_invalid(&self, name: &str, default: &dyn Debug);
}

/// Emits every diagnostic as a `tracing` warning.
///
/// The message reads `using default value NAME=DEFAULT` or
/// `default value is invalid NAME=DEFAULT`, with `name`, `default` and (when
/// present) `error` also attached as structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn using_default(&self, name: &str, default: &dyn Debug, cause: Option<&dyn Display>) {
        match cause {
            Some(error) => tracing::warn!(
                name = name,
                default = ?default,
                error = %error,
                "{USING_DEFAULT} {name}={default:?}"
            ),
            None => tracing::warn!(
                name = name,
                default = ?default,
                "{USING_DEFAULT} {name}={default:?}"
            ),
        }
    }

    fn default_invalid(&self, name: &str, default: &dyn Debug) {
        tracing::warn!(name = name, default = ?default, "{DEFAULT_INVALID} {name}={default:?}");
    }
}

/// One diagnostic captured by [`RecordingDiagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// See [`Diagnostics::using_default`]
    UsingDefault {
        name: String,
        /// `Debug` rendering of the default
        default: String,
        /// `Display` rendering of the parse error, if any
        cause: Option<String>,
    },
    /// See [`Diagnostics::default_invalid`]
    DefaultInvalid {
        name: String,
        /// `Debug` rendering of the substitute default
        default: String,
    },
}

impl Diagnostic {
    /// Variable name the diagnostic refers to
    pub fn name(&self) -> &str {
        match self {
            Self::UsingDefault { name, .. } | Self::DefaultInvalid { name, .. } => name,
        }
    }
}

/// Keeps diagnostics in memory instead of logging them.
///
/// ```rust
/// use envparse::{Diagnostic, Reader, RecordingDiagnostics};
///
/// let sink = RecordingDiagnostics::new();
/// let retries = Reader::new(&sink).lookup("ENVPARSE_DOC_UNSET").def(3).as_int();
///
/// assert_eq!(retries, 3);
/// assert!(matches!(&sink.take()[..], [Diagnostic::UsingDefault { cause: None, .. }]));
/// ```
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: RefCell<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.borrow().clone()
    }

    /// Drain the recorded diagnostics
    pub fn take(&self) -> Vec<Diagnostic> {
        self.events.take()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn using_default(&self, name: &str, default: &dyn Debug, cause: Option<&dyn Display>) {
        self.events.borrow_mut().push(Diagnostic::UsingDefault {
            name: name.to_string(),
            default: format!("{default:?}"),
            cause: cause.map(|error| error.to_string()),
        });
    }

    fn default_invalid(&self, name: &str, default: &dyn Debug) {
        self.events.borrow_mut().push(Diagnostic::DefaultInvalid {
            name: name.to_string(),
            default: format!("{default:?}"),
        });
    }
}
