//! Parsing functions for environment variable values
//!
//! Bindings use these after the raw value has been captured. They are public
//! for callers that want the same grammar with strict error handling.

use crate::error::{ParseBoolError, ParseDurationError};
use std::env;
use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

// Fraction digits beyond this cannot change a nanosecond total.
const MAX_FRACTION_DIGITS: usize = 18;

/// Read the raw value of an environment variable
///
/// Returns an empty string when the variable is unset. A value that is not
/// valid Unicode is converted lossily.
pub fn read_raw(env_name: &str) -> String {
    env::var_os(env_name)
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse a boolean token
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` as true and
/// `0`, `f`, `F`, `FALSE`, `false`, `False` as false.
pub fn parse_bool(value: &str) -> Result<bool, ParseBoolError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseBoolError {
            value: value.to_string(),
        }),
    }
}

/// Split a value on `separator`, keeping order and empty tokens
///
/// An empty separator splits into individual characters.
pub fn split_list(value: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return value.chars().map(String::from).collect();
    }
    value.split(separator).map(String::from).collect()
}

/// Parse a compound duration such as `1h30m`, `500ms` or `1.5h`
///
/// The grammar is an optional sign followed by either `0` or one or more
/// `number unit` pairs. Numbers may carry a decimal fraction. Units are
/// `ns`, `us` (or `µs`/`μs`), `ms`, `s`, `m` and `h`.
///
/// # Example
///
/// ```rust
/// use envparse::de::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// assert!(parse_duration("5").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let mut rest = input;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(ParseDurationError::Empty {
            input: input.to_string(),
        });
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = leading_digits(rest);
        rest = after_whole;

        let mut fraction = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (digits, after_fraction) = leading_digits(after_dot);
            fraction = digits;
            rest = after_fraction;
        }

        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseDurationError::InvalidNumber {
                input: input.to_string(),
            });
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, after_unit) = rest.split_at(unit_end);
        rest = after_unit;

        if unit.is_empty() {
            return Err(ParseDurationError::MissingUnit {
                input: input.to_string(),
            });
        }
        let per_unit = unit_nanos(unit).ok_or_else(|| ParseDurationError::UnknownUnit {
            input: input.to_string(),
            unit: unit.to_string(),
        })?;

        total = scaled_nanos(whole, fraction, per_unit)
            .and_then(|nanos| total.checked_add(nanos))
            .filter(|&sum| sum <= u128::from(u64::MAX))
            .ok_or_else(|| ParseDurationError::Overflow {
                input: input.to_string(),
            })?;
    }

    if negative && total != 0 {
        return Err(ParseDurationError::Negative {
            input: input.to_string(),
        });
    }

    let nanos = u64::try_from(total).map_err(|_| ParseDurationError::Overflow {
        input: input.to_string(),
    })?;
    Ok(Duration::from_nanos(nanos))
}

fn leading_digits(s: &str) -> (&str, &str) {
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// `whole.fraction` units expressed in nanoseconds, truncated
fn scaled_nanos(whole: &str, fraction: &str, per_unit: u128) -> Option<u128> {
    let mut nanos: u128 = 0;
    for digit in whole.bytes() {
        nanos = nanos
            .checked_mul(10)?
            .checked_add(u128::from(digit - b'0'))?;
        if nanos > u128::from(u64::MAX) {
            return None;
        }
    }
    nanos = nanos.checked_mul(per_unit)?;

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let mut numerator: u128 = 0;
        let mut scale: u128 = 1;
        for digit in fraction.bytes() {
            numerator = numerator * 10 + u128::from(digit - b'0');
            scale *= 10;
        }
        nanos = nanos.checked_add(numerator * per_unit / scale)?;
    }

    Some(nanos)
}
