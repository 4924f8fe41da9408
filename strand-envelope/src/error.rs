//! Error types for envelope encoding, decoding and type registration.

use thiserror::Error;

/// Errors produced by the registry and the envelope codec.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The input is not an envelope: bad JSON, not an object, or the type
    /// name or data field is missing.
    #[error("malformed envelope: {input}")]
    Malformed {
        /// The raw input, verbatim.
        input: String,
        /// The parse error, when the input was not JSON at all.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// No type is registered under this canonical name.
    #[error("unknown type: {name}")]
    UnknownType {
        /// The canonical name that failed to resolve.
        name: String,
    },

    /// A type is already registered under this canonical name.
    #[error("duplicate type registration: {name}")]
    Duplicate {
        /// The canonical name registered twice.
        name: String,
    },

    /// A canonical name or type path is not well formed.
    #[error("invalid type name: {name:?}")]
    InvalidName {
        /// The offending name.
        name: String,
    },

    /// The envelope data does not fit the named type.
    #[error("cannot restore {name} from envelope data: {source}")]
    Restore {
        /// The canonical name the data was restored as.
        name: String,
        /// The underlying deserialization error.
        source: serde_json::Error,
    },

    /// A value could not be exported to JSON.
    #[error("cannot encode {name}: {source}")]
    Encode {
        /// The canonical name of the value's type.
        name: String,
        /// The underlying serialization error.
        source: serde_json::Error,
    },

    /// The envelope names a registered type other than the one requested.
    #[error("type mismatch: expected {expected}, envelope holds {found}")]
    TypeMismatch {
        /// The canonical name that was requested.
        expected: String,
        /// The canonical name found in the envelope.
        found: String,
    },
}

/// Result alias for envelope operations.
pub type Result<T, E = EnvelopeError> = std::result::Result<T, E>;
