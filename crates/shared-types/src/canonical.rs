//! # Canonical Serialization
//!
//! Structured (JSON value) and text forms of every entity, layered on the
//! entities' serde impls.
//!
//! Decoding goes through the entity's [`Canonical::Document`] so that the
//! content checks (block hash, chain linkage) surface as typed
//! [`SerializationError`] variants instead of serde messages.

use crate::errors::SerializationError;
use serde::de::{Deserialize, DeserializeOwned};
use serde::Serialize;
use serde_json::Value;

/// Serialize/deserialize capability implemented per entity.
///
/// `from_canonical(&x.to_canonical()) == x` holds for every valid `x`.
pub trait Canonical: Serialize + Sized {
    /// Wire form the entity is decoded from.
    type Document: DeserializeOwned;

    /// Validate a decoded wire form.
    fn from_document(document: Self::Document) -> Result<Self, SerializationError>;

    /// Structured form of the entity.
    fn to_canonical(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Decode the structured form, rejecting anything malformed.
    fn from_canonical(value: &Value) -> Result<Self, SerializationError> {
        Self::from_document(Self::Document::deserialize(value)?)
    }

    /// Compact JSON text, fields in declaration order.
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse JSON text and decode it.
    fn from_json(json: &str) -> Result<Self, SerializationError> {
        Self::from_document(serde_json::from_str(json)?)
    }
}
