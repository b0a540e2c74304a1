//! Lookups, bindings and typed conversions

use crate::de;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;
use std::time::Duration;

static TRACING: TracingDiagnostics = TracingDiagnostics;

/// Creates lookups that report to a given [`Diagnostics`] sink.
///
/// ```rust
/// use envparse::{Reader, RecordingDiagnostics};
///
/// let sink = RecordingDiagnostics::new();
/// let reader = Reader::new(&sink);
///
/// std::env::set_var("ENVPARSE_DOC_PORT", "8080");
/// assert_eq!(reader.lookup("ENVPARSE_DOC_PORT").def(80).as_int(), 8080);
/// assert!(sink.events().is_empty());
/// # std::env::remove_var("ENVPARSE_DOC_PORT");
/// ```
#[derive(Clone, Copy)]
pub struct Reader<'s> {
    diagnostics: &'s dyn Diagnostics,
}

impl Reader<'static> {
    /// Reader that logs through `tracing`
    pub fn tracing() -> Self {
        Self {
            diagnostics: &TRACING,
        }
    }
}

impl Default for Reader<'static> {
    fn default() -> Self {
        Self::tracing()
    }
}

impl<'s> Reader<'s> {
    /// Reader that reports to `diagnostics`
    pub fn new(diagnostics: &'s dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Capture the current value of `name`
    ///
    /// The value is read once, here. An unset variable is captured as an
    /// empty string.
    pub fn lookup(self, name: impl Into<String>) -> Lookup<'s> {
        let name = name.into();
        let value = de::read_raw(&name);
        Lookup {
            name,
            value,
            diagnostics: self.diagnostics,
        }
    }
}

impl Debug for Reader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader").finish_non_exhaustive()
    }
}

/// A captured environment variable with no default attached yet.
///
/// Attach one with [`def`](Lookup::def). Converting a `Lookup` directly is
/// allowed; it reports [`Diagnostics::default_invalid`] and falls back to the
/// target type's `Default` value.
pub struct Lookup<'s> {
    name: String,
    value: String,
    diagnostics: &'s dyn Diagnostics,
}

impl<'s> Lookup<'s> {
    /// Environment variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw captured value, empty when the variable was unset
    pub fn raw(&self) -> &str {
        &self.value
    }

    /// Attach a default
    pub fn def<T>(self, default: T) -> Binding<'s, T> {
        self.bind(Some(default))
    }

    fn bind<T>(self, default: Option<T>) -> Binding<'s, T> {
        Binding {
            name: self.name,
            value: self.value,
            default,
            diagnostics: self.diagnostics,
        }
    }

    /// See [`Binding::as_str`]
    pub fn as_str(self) -> String {
        self.bind::<String>(None).as_str()
    }

    /// See [`Binding::as_str_list`]
    pub fn as_str_list(self) -> Vec<String> {
        self.bind::<Vec<String>>(None).as_str_list()
    }

    /// See [`Binding::as_str_list_by`]
    pub fn as_str_list_by(self, separator: &str) -> Vec<String> {
        self.bind::<Vec<String>>(None).as_str_list_by(separator)
    }

    /// See [`Binding::as_int`]
    pub fn as_int(self) -> i64 {
        self.bind::<i64>(None).as_int()
    }

    /// See [`Binding::as_duration`]
    pub fn as_duration(self) -> Duration {
        self.bind::<Duration>(None).as_duration()
    }

    /// See [`Binding::as_bool`]
    pub fn as_bool(self) -> bool {
        self.bind::<bool>(None).as_bool()
    }

    /// See [`Binding::as_bool_box`]
    pub fn as_bool_box(self) -> Box<bool> {
        self.bind::<bool>(None).as_bool_box()
    }

    /// See [`Binding::as_parsed`]
    pub fn as_parsed<T>(self) -> T
    where
        T: FromStr + Debug + Default,
        T::Err: Display,
    {
        self.bind::<T>(None).as_parsed()
    }

    /// See [`Binding::as_json`]
    pub fn as_json<T>(self) -> T
    where
        T: DeserializeOwned + Debug + Default,
    {
        self.bind::<T>(None).as_json()
    }
}

impl Debug for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookup")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// A captured environment variable with a typed default.
///
/// Every conversion consumes the binding and always yields a value: the
/// parsed variable, or the default when the variable is unset, empty or
/// malformed. Each fallback is reported to the reader's [`Diagnostics`].
pub struct Binding<'s, T> {
    name: String,
    value: String,
    default: Option<T>,
    diagnostics: &'s dyn Diagnostics,
}

impl<'s, T> Binding<'s, T> {
    /// Environment variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw captured value, empty when the variable was unset
    pub fn raw(&self) -> &str {
        &self.value
    }

    /// Replace the attached default
    pub fn def(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }

    /// Convert with a caller-supplied parser
    ///
    /// ```rust
    /// use envparse::env;
    ///
    /// fn parse_ratio(raw: &str) -> Result<(u32, u32), String> {
    ///     let (n, d) = raw.split_once('/').ok_or("missing '/'")?;
    ///     let n = n.parse().map_err(|_| "bad numerator")?;
    ///     let d = d.parse().map_err(|_| "bad denominator")?;
    ///     Ok((n, d))
    /// }
    ///
    /// std::env::set_var("ENVPARSE_DOC_RATIO", "3/4");
    /// let ratio = env("ENVPARSE_DOC_RATIO").def((1, 1)).parse_with(parse_ratio);
    /// assert_eq!(ratio, (3, 4));
    /// # std::env::remove_var("ENVPARSE_DOC_RATIO");
    /// ```
    pub fn parse_with<E, F>(self, parse: F) -> T
    where
        T: Debug + Default,
        E: Display,
        F: FnOnce(&str) -> Result<T, E>,
    {
        let default = match self.default {
            Some(default) => default,
            None => {
                let substitute = T::default();
                self.diagnostics.default_invalid(&self.name, &substitute);
                substitute
            }
        };

        if self.value.is_empty() {
            self.diagnostics.using_default(&self.name, &default, None);
            return default;
        }

        match parse(&self.value) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.diagnostics
                    .using_default(&self.name, &default, Some(&err));
                default
            }
        }
    }

    /// Convert using the target type's `FromStr`
    pub fn as_parsed(self) -> T
    where
        T: FromStr + Debug + Default,
        T::Err: Display,
    {
        self.parse_with(str::parse::<T>)
    }

    /// Convert by deserializing the value as JSON
    pub fn as_json(self) -> T
    where
        T: DeserializeOwned + Debug + Default,
    {
        self.parse_with(|raw| serde_json::from_str::<T>(raw))
    }
}

impl Binding<'_, String> {
    /// The value verbatim
    pub fn as_str(self) -> String {
        self.parse_with(|raw| Ok::<_, Infallible>(raw.to_string()))
    }
}

impl Binding<'_, Vec<String>> {
    /// The value split on `,`
    pub fn as_str_list(self) -> Vec<String> {
        self.as_str_list_by(",")
    }

    /// The value split on `separator`, keeping order and empty tokens
    pub fn as_str_list_by(self, separator: &str) -> Vec<String> {
        self.parse_with(|raw| Ok::<_, Infallible>(de::split_list(raw, separator)))
    }
}

impl Binding<'_, i64> {
    /// Base-10 signed integer
    pub fn as_int(self) -> i64 {
        self.as_parsed()
    }
}

impl Binding<'_, Duration> {
    /// Compound duration, see [`de::parse_duration`]
    pub fn as_duration(self) -> Duration {
        self.parse_with(de::parse_duration)
    }
}

impl Binding<'_, bool> {
    /// Boolean token, see [`de::parse_bool`]
    pub fn as_bool(self) -> bool {
        self.parse_with(de::parse_bool)
    }

    /// Like [`as_bool`](Self::as_bool), boxed for callers that keep the
    /// flag behind an owned pointer
    pub fn as_bool_box(self) -> Box<bool> {
        Box::new(self.as_bool())
    }
}

impl<T: Debug> Debug for Binding<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostic, RecordingDiagnostics};
    use serial_test::serial;
    use std::env;

    fn using_default(name: &str, default: &str, cause: Option<&str>) -> Diagnostic {
        Diagnostic::UsingDefault {
            name: name.to_string(),
            default: default.to_string(),
            cause: cause.map(str::to_string),
        }
    }

    #[test]
    #[serial]
    fn test_lookup_captures_value_once() {
        env::set_var("TEST_CAPTURE", "first");
        let sink = RecordingDiagnostics::new();
        let binding = Reader::new(&sink).lookup("TEST_CAPTURE").def(String::new());

        env::set_var("TEST_CAPTURE", "second");
        assert_eq!(binding.raw(), "first");
        assert_eq!(binding.as_str(), "first");

        env::remove_var("TEST_CAPTURE");
    }

    #[test]
    #[serial]
    fn test_lookup_unset_captures_empty() {
        env::remove_var("TEST_CAPTURE_UNSET");
        let sink = RecordingDiagnostics::new();
        let lookup = Reader::new(&sink).lookup("TEST_CAPTURE_UNSET");
        assert_eq!(lookup.name(), "TEST_CAPTURE_UNSET");
        assert_eq!(lookup.raw(), "");
    }

    #[test]
    #[serial]
    fn test_as_str_set() {
        env::set_var("TEST_STR", "hello world");
        let sink = RecordingDiagnostics::new();
        let value = Reader::new(&sink)
            .lookup("TEST_STR")
            .def("fallback".to_string())
            .as_str();
        assert_eq!(value, "hello world");
        assert!(sink.events().is_empty());
        env::remove_var("TEST_STR");
    }

    #[test]
    #[serial]
    fn test_as_str_empty_uses_default() {
        env::set_var("TEST_STR_EMPTY", "");
        let sink = RecordingDiagnostics::new();
        let value = Reader::new(&sink)
            .lookup("TEST_STR_EMPTY")
            .def("fallback".to_string())
            .as_str();
        assert_eq!(value, "fallback");
        assert_eq!(
            sink.take(),
            vec![using_default("TEST_STR_EMPTY", "\"fallback\"", None)]
        );
        env::remove_var("TEST_STR_EMPTY");
    }

    #[test]
    #[serial]
    fn test_as_str_list_custom_separator() {
        env::set_var("TEST_LIST_SEP", "a;b;;c");
        let sink = RecordingDiagnostics::new();
        let value = Reader::new(&sink)
            .lookup("TEST_LIST_SEP")
            .def(Vec::<String>::new())
            .as_str_list_by(";");
        assert_eq!(value, vec!["a", "b", "", "c"]);
        env::remove_var("TEST_LIST_SEP");
    }

    #[test]
    #[serial]
    fn test_as_int_invalid_reports_parse_error() {
        env::set_var("TEST_INT_BAD", "12x");
        let sink = RecordingDiagnostics::new();
        let value = Reader::new(&sink).lookup("TEST_INT_BAD").def(7).as_int();
        assert_eq!(value, 7);

        match &sink.take()[..] {
            [Diagnostic::UsingDefault {
                name,
                default,
                cause: Some(cause),
            }] => {
                assert_eq!(name, "TEST_INT_BAD");
                assert_eq!(default, "7");
                assert!(cause.contains("invalid digit"), "cause: {cause}");
            }
            other => panic!("Expected one UsingDefault with cause, got {other:?}"),
        }
        env::remove_var("TEST_INT_BAD");
    }

    #[test]
    #[serial]
    fn test_as_int_signed() {
        env::set_var("TEST_INT_SIGNED", "-42");
        let value = Reader::new(&RecordingDiagnostics::new())
            .lookup("TEST_INT_SIGNED")
            .def(0)
            .as_int();
        assert_eq!(value, -42);
        env::remove_var("TEST_INT_SIGNED");
    }

    #[test]
    #[serial]
    fn test_as_duration_invalid_uses_default() {
        env::set_var("TEST_DURATION_BAD", "10 seconds");
        let sink = RecordingDiagnostics::new();
        let value = Reader::new(&sink)
            .lookup("TEST_DURATION_BAD")
            .def(Duration::from_secs(1))
            .as_duration();
        assert_eq!(value, Duration::from_secs(1));
        assert!(matches!(
            &sink.take()[..],
            [Diagnostic::UsingDefault { cause: Some(_), .. }]
        ));
        env::remove_var("TEST_DURATION_BAD");
    }

    #[test]
    #[serial]
    fn test_as_bool_box() {
        env::set_var("TEST_BOOL_BOX", "F");
        let sink = RecordingDiagnostics::new();
        let reader = Reader::new(&sink);

        assert!(!*reader.lookup("TEST_BOOL_BOX").def(true).as_bool_box());

        env::remove_var("TEST_BOOL_BOX");
        assert!(*reader.lookup("TEST_BOOL_BOX").def(true).as_bool_box());
        assert_eq!(
            sink.take(),
            vec![using_default("TEST_BOOL_BOX", "true", None)]
        );
    }

    #[test]
    #[serial]
    fn test_missing_default_reports_invalid_and_uses_type_default() {
        env::remove_var("TEST_NO_DEFAULT");
        let sink = RecordingDiagnostics::new();
        let value = Reader::new(&sink).lookup("TEST_NO_DEFAULT").as_int();
        assert_eq!(value, 0);
        assert_eq!(
            sink.take(),
            vec![
                Diagnostic::DefaultInvalid {
                    name: "TEST_NO_DEFAULT".to_string(),
                    default: "0".to_string(),
                },
                using_default("TEST_NO_DEFAULT", "0", None),
            ]
        );
    }

    #[test]
    #[serial]
    fn test_missing_default_still_parses_value() {
        env::set_var("TEST_NO_DEFAULT_SET", "true");
        let sink = RecordingDiagnostics::new();
        assert!(Reader::new(&sink).lookup("TEST_NO_DEFAULT_SET").as_bool());

        let events = sink.take();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Diagnostic::DefaultInvalid { .. }));
        env::remove_var("TEST_NO_DEFAULT_SET");
    }

    #[test]
    #[serial]
    fn test_def_replaces_default() {
        env::remove_var("TEST_REDEF");
        let value = Reader::new(&RecordingDiagnostics::new())
            .lookup("TEST_REDEF")
            .def(1)
            .def(2)
            .as_int();
        assert_eq!(value, 2);
    }

    #[test]
    #[serial]
    fn test_as_parsed_other_types() {
        env::set_var("TEST_PARSED_PORT", "8443");
        env::set_var("TEST_PARSED_RATIO", "0.25");
        let sink = RecordingDiagnostics::new();
        let reader = Reader::new(&sink);

        let port: u16 = reader.lookup("TEST_PARSED_PORT").def(80).as_parsed();
        let ratio: f64 = reader.lookup("TEST_PARSED_RATIO").def(1.0).as_parsed();
        assert_eq!(port, 8443);
        assert_eq!(ratio, 0.25);

        env::remove_var("TEST_PARSED_PORT");
        env::remove_var("TEST_PARSED_RATIO");
    }

    #[test]
    #[serial]
    fn test_as_parsed_out_of_range_uses_default() {
        env::set_var("TEST_PARSED_RANGE", "70000");
        let sink = RecordingDiagnostics::new();
        let port: u16 = Reader::new(&sink)
            .lookup("TEST_PARSED_RANGE")
            .def(80)
            .as_parsed();
        assert_eq!(port, 80);
        assert_eq!(sink.take().len(), 1);
        env::remove_var("TEST_PARSED_RANGE");
    }

    #[test]
    #[serial]
    fn test_as_json() {
        env::set_var("TEST_JSON", r#"{"a": 1, "b": 2}"#);
        let value: std::collections::BTreeMap<String, i32> =
            Reader::new(&RecordingDiagnostics::new())
                .lookup("TEST_JSON")
                .def(Default::default())
                .as_json();
        assert_eq!(value.get("a"), Some(&1));
        assert_eq!(value.get("b"), Some(&2));
        env::remove_var("TEST_JSON");
    }

    #[test]
    #[serial]
    fn test_as_json_malformed_uses_default() {
        env::set_var("TEST_JSON_BAD", "[1, 2");
        let sink = RecordingDiagnostics::new();
        let value: Vec<u8> = Reader::new(&sink)
            .lookup("TEST_JSON_BAD")
            .def(vec![9])
            .as_json();
        assert_eq!(value, vec![9]);
        assert!(matches!(
            &sink.take()[..],
            [Diagnostic::UsingDefault { cause: Some(_), .. }]
        ));
        env::remove_var("TEST_JSON_BAD");
    }

    #[test]
    #[serial]
    fn test_tracing_reader_returns_default() {
        env::remove_var("TEST_TRACING_READER");
        let value = Reader::tracing()
            .lookup("TEST_TRACING_READER")
            .def(Duration::from_millis(250))
            .as_duration();
        assert_eq!(value, Duration::from_millis(250));
    }
}
