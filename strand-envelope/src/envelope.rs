//! The two-field wire envelope.
//!
//! An envelope pairs a canonical type name with the type's exported state:
//!
//! | Format | Layout |
//! |--------|--------|
//! | [`WireFormat::Json`] | `{"type": "my_app.Order", "data": {...}}` |
//! | [`WireFormat::Native`] | `{"@": "my_app.Order", "$": {...}}` |
//!
//! Encoding writes exactly these two fields, type name first, with forward
//! slashes left unescaped. Decoding requires both fields and ignores any
//! others.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::{EnvelopeError, Result};
use crate::name;

/// Field naming used on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WireFormat {
    /// `type` / `data` keys.
    #[default]
    Json,
    /// `@` / `$` keys.
    Native,
}

impl WireFormat {
    /// Key holding the canonical type name.
    pub const fn type_key(self) -> &'static str {
        match self {
            Self::Json => "type",
            Self::Native => "@",
        }
    }

    /// Key holding the exported state.
    pub const fn data_key(self) -> &'static str {
        match self {
            Self::Json => "data",
            Self::Native => "$",
        }
    }
}

/// A decoded envelope: a canonical type name and its state.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Canonical (dot-separated) type name.
    pub type_name: String,
    /// Exported state of the value.
    pub data: Value,
}

impl Envelope {
    /// Creates an envelope.
    pub fn new(type_name: impl Into<String>, data: Value) -> Self {
        Self {
            type_name: type_name.into(),
            data,
        }
    }

    /// Encodes the envelope as a JSON string.
    ///
    /// ```
    /// use serde_json::json;
    /// use strand_envelope::{Envelope, WireFormat};
    ///
    /// let envelope = Envelope::new("shop.Order", json!({"url": "a/b"}));
    /// assert_eq!(
    ///     envelope.encode(WireFormat::Json).unwrap(),
    ///     r#"{"type":"shop.Order","data":{"url":"a/b"}}"#
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidName`] if the type name is malformed.
    pub fn encode(&self, format: WireFormat) -> Result<String> {
        name::validate(&self.type_name)?;
        serde_json::to_string(&Wire {
            format,
            envelope: self,
        })
        .map_err(|source| EnvelopeError::Encode {
            name: self.type_name.clone(),
            source,
        })
    }

    /// Decodes an envelope from a JSON string.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::Malformed`] if the input is not a JSON object, or
    ///   lacks a string type name or a data field.
    /// - [`EnvelopeError::InvalidName`] if the type name is malformed.
    pub fn decode(input: &str, format: WireFormat) -> Result<Self> {
        let malformed = |source| EnvelopeError::Malformed {
            input: input.to_owned(),
            source,
        };

        let value: Value = serde_json::from_str(input).map_err(|e| {
            tracing::debug!(error = %e, "envelope is not valid JSON");
            malformed(Some(e))
        })?;

        let Value::Object(mut fields) = value else {
            tracing::debug!("envelope is not a JSON object");
            return Err(malformed(None));
        };

        let type_name = match fields.remove(format.type_key()) {
            Some(Value::String(type_name)) => type_name,
            other => {
                tracing::debug!(key = format.type_key(), found = ?other, "envelope type name missing");
                return Err(malformed(None));
            }
        };

        let Some(data) = fields.remove(format.data_key()) else {
            tracing::debug!(key = format.data_key(), "envelope data missing");
            return Err(malformed(None));
        };

        name::validate(&type_name)?;
        Ok(Self { type_name, data })
    }
}

/// Serializes an envelope with its keys in wire order.
struct Wire<'a> {
    format: WireFormat,
    envelope: &'a Envelope,
}

impl Serialize for Wire<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.format.type_key(), &self.envelope.type_name)?;
        map.serialize_entry(self.format.data_key(), &self.envelope.data)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_type_first() {
        let envelope = Envelope::new("a.B", json!([1, 2]));
        assert_eq!(
            envelope.encode(WireFormat::Json).unwrap(),
            r#"{"type":"a.B","data":[1,2]}"#
        );
        assert_eq!(
            envelope.encode(WireFormat::Native).unwrap(),
            r#"{"@":"a.B","$":[1,2]}"#
        );
    }

    #[test]
    fn decode_tolerates_extra_fields() {
        let decoded =
            Envelope::decode(r#"{"v":2,"data":null,"type":"a.B"}"#, WireFormat::Json).unwrap();
        assert_eq!(decoded, Envelope::new("a.B", Value::Null));
    }

    #[test]
    fn decode_requires_both_fields() {
        for input in [
            r#"{"type":"a.B"}"#,
            r#"{"data":1}"#,
            r#"{"type":7,"data":1}"#,
            r#"[1,2]"#,
            r#"not json"#,
        ] {
            let err = Envelope::decode(input, WireFormat::Json).unwrap_err();
            match err {
                EnvelopeError::Malformed { input: raw, .. } => assert_eq!(raw, input),
                other => panic!("unexpected error for {input}: {other}"),
            }
        }
    }

    #[test]
    fn formats_do_not_mix() {
        let json = Envelope::new("a.B", json!(1))
            .encode(WireFormat::Json)
            .unwrap();
        assert!(Envelope::decode(&json, WireFormat::Native).is_err());
        assert!(Envelope::decode(&json, WireFormat::Json).is_ok());
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(matches!(
            Envelope::decode(r#"{"type":"a..B","data":1}"#, WireFormat::Json),
            Err(EnvelopeError::InvalidName { .. })
        ));
        assert!(matches!(
            Envelope::new("", json!(1)).encode(WireFormat::Json),
            Err(EnvelopeError::InvalidName { .. })
        ));
    }

    #[test]
    fn malformed_message_names_input() {
        let err = Envelope::decode("{}", WireFormat::Native).unwrap_err();
        assert_eq!(err.to_string(), "malformed envelope: {}");
    }
}
