//! Type-tagged serialization envelopes.
//!
//! A value travels as a two-field JSON object: its canonical type name and
//! its exported state. The receiving side resolves the name through an
//! explicit [`Registry`] and rebuilds the value, or refuses with a typed
//! [`EnvelopeError`] without constructing anything.
//!
//! ```text
//! value --export--> Value --Envelope::encode--> {"type": "...", "data": ...}
//! value <-restore-- Value <-Envelope::decode--- {"type": "...", "data": ...}
//!                      Registry::resolve(name)
//! ```
//!
//! # Quick Start
//!
//! ```
//! use strand_envelope::{Registry, WireFormat};
//!
//! let mut registry = Registry::new();
//! registry.register_as::<Vec<String>>("app.Tags")?;
//!
//! let tags = vec!["a/b".to_string(), "c".to_string()];
//! let state = registry.serialize(&tags, WireFormat::Json)?;
//! assert_eq!(state, r#"{"type":"app.Tags","data":["a/b","c"]}"#);
//!
//! let back: Vec<String> = registry.deserialize_as(&state, WireFormat::Json)?;
//! assert_eq!(back, tags);
//! # Ok::<(), strand_envelope::EnvelopeError>(())
//! ```
//!
//! # Wire Formats
//!
//! | Format | Type key | Data key |
//! |--------|----------|----------|
//! | [`WireFormat::Json`] (default) | `type` | `data` |
//! | [`WireFormat::Native`] | `@` | `$` |

#![warn(missing_docs)]

pub mod envelope;
pub mod error;
pub mod name;
pub mod registry;

pub use envelope::{Envelope, WireFormat};
pub use error::{EnvelopeError, Result};
pub use registry::{Envelopable, Factory, Registry};
