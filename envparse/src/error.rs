//! Error types for value parsing
//!
//! These never escape a [`Binding`](crate::Binding) conversion; they end up in
//! the diagnostic that accompanies a default fallback. The parsers in
//! [`de`](crate::de) return them directly for callers that want strict parsing.

/// Failed to parse a boolean token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid boolean '{value}': expected one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False")]
pub struct ParseBoolError {
    /// The rejected input
    pub value: String,
}

/// Failed to parse a duration expression such as `1h30m` or `500ms`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDurationError {
    /// Input was empty or contained only a sign.
    #[error("invalid duration '{input}': empty")]
    Empty {
        /// The rejected input
        input: String,
    },

    /// A number was expected but not found, or had no digits.
    #[error("invalid duration '{input}': expected a number")]
    InvalidNumber {
        /// The rejected input
        input: String,
    },

    /// A number was not followed by a unit.
    #[error("invalid duration '{input}': missing unit")]
    MissingUnit {
        /// The rejected input
        input: String,
    },

    /// A unit other than ns, us, µs, ms, s, m or h.
    #[error("invalid duration '{input}': unknown unit '{unit}'")]
    UnknownUnit {
        /// The rejected input
        input: String,
        /// The unrecognized unit text
        unit: String,
    },

    /// A non-zero duration with a leading `-`.
    #[error("invalid duration '{input}': negative durations are not supported")]
    Negative {
        /// The rejected input
        input: String,
    },

    /// Total exceeds `u64::MAX` nanoseconds.
    #[error("invalid duration '{input}': overflow")]
    Overflow {
        /// The rejected input
        input: String,
    },
}

impl ParseDurationError {
    /// The input that failed to parse
    pub fn input(&self) -> &str {
        match self {
            Self::Empty { input }
            | Self::InvalidNumber { input }
            | Self::MissingUnit { input }
            | Self::UnknownUnit { input, .. }
            | Self::Negative { input }
            | Self::Overflow { input } => input,
        }
    }
}
