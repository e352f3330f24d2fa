//! `slog` adapters: log the redacted copy of a value, and log digests.
//!
//! Logging APIs here never fail. A value whose redacted copy cannot be
//! serialized is logged as a placeholder string instead.

use serde::Serialize;
use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{hash::Hash, object::Object, redact::deep_copy_redacted_with, Options};

/// Logged in place of a value that could not be serialized.
const SERIALIZE_FAILED: &str = "Failed to serialize redacted value";

/// A `slog::Value` holding the redacted form of a value as JSON.
///
/// Emitted through `slog`'s nested-value support, so structured drains see
/// the JSON tree rather than a string.
#[derive(Clone, Debug)]
pub struct RedactedJson {
    value: JsonValue,
}

impl RedactedJson {
    fn new(value: JsonValue) -> Self {
        Self { value }
    }

    /// The JSON that will be logged.
    pub fn as_json(&self) -> &JsonValue {
        &self.value
    }
}

impl SlogValue for RedactedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Turns a value into a [`RedactedJson`] built from its redacted deep copy.
///
/// The original value is never serialized.
///
/// ```ignore
/// use objgraph::slog::IntoRedactedJson;
///
/// info!(logger, "login"; "request" => request.into_redacted_json());
/// ```
pub trait IntoRedactedJson: Object + Serialize + Sized {
    /// Redacts `self` and converts the copy to JSON.
    ///
    /// Falls back to the string `"Failed to serialize redacted value"` if the
    /// copy cannot be built or serialized.
    fn into_redacted_json(self) -> RedactedJson {
        let json = deep_copy_redacted_with(&self, Options::new())
            .ok()
            .and_then(|redacted| serde_json::to_value(redacted).ok())
            .unwrap_or_else(|| JsonValue::String(SERIALIZE_FAILED.to_owned()));
        RedactedJson::new(json)
    }
}

impl<T> IntoRedactedJson for T where T: Object + Serialize {}

/// Digests are logged as lowercase hex.
impl SlogValue for Hash {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, &self.to_hex())
    }
}
