//! # Canonical Serialization
//!
//! `CanonicalBytes` is the only byte sequence that may be hashed into a
//! proof transcript. It is produced by RFC 8785 (JSON Canonicalization
//! Scheme) serialization after a float-rejection pass.
//!
//! ## Security Invariant
//!
//! The inner buffer is private and the single constructor runs the full
//! pipeline. A context hash computed from anything other than
//! `CanonicalBytes` is a type error, so two verifiers can never disagree
//! about which bytes a proof was bound to.
//!
//! ## Rules
//!
//! 1. `null`, booleans, strings and integers pass through.
//! 2. Non-integer numbers are rejected. Their JCS rendering has edge cases
//!    that differ across serializers.
//! 3. Object keys are emitted in sorted order with compact separators.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced by JCS canonicalization with float rejection.
///
/// # Invariants
///
/// - Keys are sorted, separators are compact, output is UTF-8.
/// - No float values appear anywhere in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::FloatRejected`] if the value contains
    /// a non-integer number, or [`CanonicalizationError::SerializationFailed`]
    /// if serde cannot render the value.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let rendered = serde_jcs::to_string(&value)?;
        Ok(Self(rendered.into_bytes()))
    }

    /// The canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}
