//! Canonical-name to type resolution.
//!
//! Types are never looked up by reflection. Each type that may travel in an
//! envelope is registered once, at startup, under a canonical name:
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use strand_envelope::{Registry, WireFormat};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_as::<Point>("geo.Point")?;
//!
//! let state = registry.serialize(&Point { x: 1, y: 2 }, WireFormat::Json)?;
//! assert_eq!(state, r#"{"type":"geo.Point","data":{"x":1,"y":2}}"#);
//!
//! let point: Point = registry.deserialize_as(&state, WireFormat::Json)?;
//! assert_eq!(point, Point { x: 1, y: 2 });
//! # Ok::<(), strand_envelope::EnvelopeError>(())
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::envelope::{Envelope, WireFormat};
use crate::error::{EnvelopeError, Result};
use crate::name;

/// A value that can travel in an envelope.
///
/// Implemented for every `Serialize + DeserializeOwned + 'static` type.
pub trait Envelopable: Serialize + DeserializeOwned + 'static {
    /// Exports the value's state.
    fn export(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Rebuilds a value from exported state.
    fn restore(data: Value) -> serde_json::Result<Self> {
        serde_json::from_value(data)
    }
}

impl<T> Envelopable for T where T: Serialize + DeserializeOwned + 'static {}

type RestoreFn = fn(Value) -> serde_json::Result<Box<dyn Any>>;

fn restore_boxed<T: Envelopable>(data: Value) -> serde_json::Result<Box<dyn Any>> {
    Ok(Box::new(T::restore(data)?))
}

/// How to rebuild one registered type.
#[derive(Debug, Clone)]
pub struct Factory {
    name: String,
    type_id: TypeId,
    type_path: &'static str,
    restore: RestoreFn,
}

impl Factory {
    fn of<T: Envelopable>(name: String) -> Self {
        Self {
            name,
            type_id: TypeId::of::<T>(),
            type_path: std::any::type_name::<T>(),
            restore: restore_boxed::<T>,
        }
    }

    /// Canonical name the type is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rust type name of the registered type.
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// `TypeId` of the registered type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rebuilds a value from exported state.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Restore`] if `data` does not fit the type.
    pub fn restore(&self, data: Value) -> Result<Box<dyn Any>> {
        (self.restore)(data).map_err(|source| {
            tracing::debug!(name = %self.name, error = %source, "envelope data rejected");
            EnvelopeError::Restore {
                name: self.name.clone(),
                source,
            }
        })
    }
}

/// Explicit table of envelope-capable types.
///
/// A canonical name maps to exactly one type. A type may be registered under
/// several names; it is always encoded under the first.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_name: HashMap<String, Factory>,
    by_type: HashMap<TypeId, String>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under the canonical form of its Rust type name.
    ///
    /// Types whose path cannot be written as an envelope name, such as
    /// tuples and arrays, need [`register_as`](Self::register_as).
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::InvalidName`] if the derived name is malformed.
    /// - [`EnvelopeError::Duplicate`] if the name is taken.
    pub fn register<T: Envelopable>(&mut self) -> Result<()> {
        let name = name::canonical_name_of::<T>();
        name::validate(&name)?;
        self.insert::<T>(name)
    }

    /// Registers `T` under `name`.
    ///
    /// `name` may be given in canonical form (`shop.Order`) or as a Rust path
    /// (`shop::Order`).
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::InvalidName`] if `name` is malformed.
    /// - [`EnvelopeError::Duplicate`] if the name is taken.
    pub fn register_as<T: Envelopable>(&mut self, name: &str) -> Result<()> {
        let name = name::canonical_name(name)?;
        self.insert::<T>(name)
    }

    fn insert<T: Envelopable>(&mut self, name: String) -> Result<()> {
        match self.by_name.entry(name) {
            Entry::Occupied(entry) => {
                tracing::warn!(
                    name = %entry.key(),
                    registered = entry.get().type_path,
                    rejected = std::any::type_name::<T>(),
                    "duplicate type registration"
                );
                Err(EnvelopeError::Duplicate {
                    name: entry.key().clone(),
                })
            }
            Entry::Vacant(entry) => {
                let name = entry.key().clone();
                tracing::debug!(%name, type_path = std::any::type_name::<T>(), "registered type");
                self.by_type.entry(TypeId::of::<T>()).or_insert_with(|| name.clone());
                entry.insert(Factory::of::<T>(name));
                Ok(())
            }
        }
    }

    /// Looks up the factory registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::UnknownType`] if nothing is registered.
    pub fn resolve(&self, name: &str) -> Result<&Factory> {
        self.by_name.get(name).ok_or_else(|| {
            tracing::debug!(name, "unknown envelope type");
            EnvelopeError::UnknownType {
                name: name.to_owned(),
            }
        })
    }

    /// Returns `true` if a type is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Canonical name `T` is encoded under, if registered.
    pub fn name_of<T: Any>(&self) -> Option<&str> {
        self.by_type.get(&TypeId::of::<T>()).map(String::as_str)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterates over the registered canonical names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Wraps `value` in an envelope and encodes it.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::UnknownType`] if `T` is not registered.
    /// - [`EnvelopeError::Encode`] if `value` cannot be exported.
    pub fn serialize<T: Envelopable>(&self, value: &T, format: WireFormat) -> Result<String> {
        self.envelope(value)?.encode(format)
    }

    /// Wraps `value` in an envelope without encoding it.
    ///
    /// # Errors
    ///
    /// Same as [`serialize`](Self::serialize).
    pub fn envelope<T: Envelopable>(&self, value: &T) -> Result<Envelope> {
        let name = self
            .name_of::<T>()
            .ok_or_else(|| EnvelopeError::UnknownType {
                name: name::canonical_name_of::<T>(),
            })?;
        let data = value.export().map_err(|source| EnvelopeError::Encode {
            name: name.to_owned(),
            source,
        })?;
        Ok(Envelope::new(name, data))
    }

    /// Decodes an envelope and rebuilds the value it names.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::Malformed`] or [`EnvelopeError::InvalidName`] if
    ///   `state` is not a valid envelope.
    /// - [`EnvelopeError::UnknownType`] if the named type is not registered.
    /// - [`EnvelopeError::Restore`] if the data does not fit the type.
    pub fn deserialize(&self, state: &str, format: WireFormat) -> Result<Box<dyn Any>> {
        let envelope = Envelope::decode(state, format)?;
        self.resolve(&envelope.type_name)?.restore(envelope.data)
    }

    /// Decodes an envelope that must hold a `T`.
    ///
    /// The type check runs before any value is built.
    ///
    /// # Errors
    ///
    /// Same as [`deserialize`](Self::deserialize), plus
    /// [`EnvelopeError::TypeMismatch`] if the envelope names another type.
    pub fn deserialize_as<T: Envelopable>(&self, state: &str, format: WireFormat) -> Result<T> {
        let envelope = Envelope::decode(state, format)?;
        let factory = self.resolve(&envelope.type_name)?;

        if factory.type_id != TypeId::of::<T>() {
            let expected = self
                .name_of::<T>()
                .map_or_else(name::canonical_name_of::<T>, str::to_owned);
            return Err(EnvelopeError::TypeMismatch {
                expected,
                found: envelope.type_name,
            });
        }

        T::restore(envelope.data).map_err(|source| EnvelopeError::Restore {
            name: envelope.type_name,
            source,
        })
    }
}
