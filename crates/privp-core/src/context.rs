//! # Proof Contexts
//!
//! A [`ProofContext`] names the occasion a proof is produced for: which peer,
//! which session, plus free-form metadata and a creation time. Its canonical
//! bytes are hashed into every proof transcript, so a proof made for one
//! session does not verify under another.
//!
//! Two validation layers exist:
//!
//! - [`ProofContext::from_json`] checks the *shape* of an untyped payload and
//!   reports [`ContextError::TypeViolation`].
//! - [`ProofContext::validate`] checks the *values* of a typed context and
//!   reports [`ContextError::ValueViolation`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::{CanonicalizationError, ContextError};
use crate::temporal::Timestamp;

/// Metadata key carrying the anonymity-set size hint.
pub const ANONYMITY_SET_SIZE_KEY: &str = "anonymity_set_size";

/// The usage context a proof is bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofContext {
    /// Opaque peer identifier. Never appears in a proof.
    pub peer_id: String,
    /// Opaque session identifier distinguishing usage occasions.
    pub session_id: String,
    /// Auxiliary values. Every entry participates in the context hash.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
    /// Creation time.
    pub timestamp: Timestamp,
}

impl ProofContext {
    /// Build a context stamped with the current time and empty metadata.
    pub fn new(peer_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
            session_id: session_id.into(),
            metadata: BTreeMap::new(),
            timestamp: Timestamp::now(),
        }
    }

    /// Build a context with a fresh random (UUIDv4) session identifier.
    pub fn for_new_session(peer_id: impl Into<String>) -> Self {
        Self::new(peer_id, uuid::Uuid::new_v4().to_string())
    }

    /// Add one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replace the creation time.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Parse a context from an untyped JSON payload.
    ///
    /// `metadata` and `timestamp` are optional; a missing timestamp is filled
    /// with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::TypeViolation`] if the payload is not an
    /// object, if `peer_id` or `session_id` is missing or not a string, if
    /// `metadata` is not an object, or if `timestamp` is not a UTC
    /// RFC 3339 string. Values are not checked here; see [`Self::validate`].
    pub fn from_json(payload: &Value) -> Result<Self, ContextError> {
        let obj = payload
            .as_object()
            .ok_or_else(|| ContextError::TypeViolation("ctx must be ProofContext object".into()))?;

        let peer_id = required_str(obj, "peer_id")?;
        let session_id = required_str(obj, "session_id")?;

        let metadata = match obj.get("metadata") {
            None | Some(Value::Null) => BTreeMap::new(),
            Some(Value::Object(map)) => map.clone().into_iter().collect(),
            Some(_) => {
                return Err(ContextError::TypeViolation("metadata must be an object".into()))
            }
        };

        let timestamp = match obj.get("timestamp") {
            None | Some(Value::Null) => Timestamp::now(),
            Some(Value::String(s)) => Timestamp::parse(s)
                .map_err(|e| ContextError::TypeViolation(format!("timestamp: {e}")))?,
            Some(_) => {
                return Err(ContextError::TypeViolation("timestamp must be str".into()))
            }
        };

        Ok(Self {
            peer_id,
            session_id,
            metadata,
            timestamp,
        })
    }

    /// Check that the context's values are usable for proof generation.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::ValueViolation`] if either identifier is empty
    /// or if the metadata cannot be canonicalized.
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.peer_id.is_empty() {
            return Err(ContextError::ValueViolation("peer_id cannot be empty".into()));
        }
        if self.session_id.is_empty() {
            return Err(ContextError::ValueViolation("session_id cannot be empty".into()));
        }
        self.to_bytes().map(|_| ())
    }

    /// Canonical (JCS) encoding of all four fields.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::ValueViolation`] if the metadata holds a
    /// non-integer number.
    pub fn to_bytes(&self) -> Result<CanonicalBytes, ContextError> {
        CanonicalBytes::new(self).map_err(|e| match e {
            CanonicalizationError::FloatRejected(_) => {
                ContextError::ValueViolation(format!("metadata: {e}"))
            }
            CanonicalizationError::SerializationFailed(_) => {
                ContextError::TypeViolation(format!("context: {e}"))
            }
        })
    }

    /// SHA-256 of [`Self::to_bytes`].
    pub fn context_hash(&self) -> Result<ContentDigest, ContextError> {
        Ok(sha256_digest(&self.to_bytes()?))
    }

    /// The anonymity-set size hint, or 1 when absent or not a non-negative
    /// integer.
    pub fn anonymity_set_size(&self) -> u64 {
        self.metadata
            .get(ANONYMITY_SET_SIZE_KEY)
            .and_then(Value::as_u64)
            .unwrap_or(1)
    }
}

fn required_str(obj: &serde_json::Map<String, Value>, field: &str) -> Result<String, ContextError> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(ContextError::TypeViolation(format!("{field} must be str"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed_ts() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn sample() -> ProofContext {
        ProofContext::new("QmTest123", "session_001")
            .with_metadata("purpose", "commitment_opening_pok")
            .with_metadata(ANONYMITY_SET_SIZE_KEY, 4)
            .with_timestamp(fixed_ts())
    }

    #[test]
    fn canonical_bytes_are_sorted() {
        let bytes = sample().to_bytes().unwrap();
        assert_eq!(
            std::str::from_utf8(bytes.as_bytes()).unwrap(),
            r#"{"metadata":{"anonymity_set_size":4,"purpose":"commitment_opening_pok"},"peer_id":"QmTest123","session_id":"session_001","timestamp":"2026-01-15T12:00:00Z"}"#
        );
    }

    #[test]
    fn session_id_changes_encoding() {
        let a = sample();
        let mut b = sample();
        b.session_id = "session_other".into();
        assert_ne!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
        assert_ne!(a.context_hash().unwrap(), b.context_hash().unwrap());
    }

    #[test]
    fn every_metadata_entry_is_hashed() {
        let a = sample();
        let b = sample().with_metadata("network", "testnet");
        assert_ne!(a.context_hash().unwrap(), b.context_hash().unwrap());
    }

    #[test]
    fn hash_is_stable_across_clones() {
        let a = sample();
        assert_eq!(a.context_hash().unwrap(), a.clone().context_hash().unwrap());
    }

    #[test]
    fn validate_rejects_empty_ids() {
        let err = ProofContext::new("", "s").validate().unwrap_err();
        assert_eq!(err, ContextError::ValueViolation("peer_id cannot be empty".into()));
        let err = ProofContext::new("p", "").validate().unwrap_err();
        assert_eq!(err, ContextError::ValueViolation("session_id cannot be empty".into()));
    }

    #[test]
    fn float_metadata_is_value_violation() {
        let ctx = sample().with_metadata("threshold", 0.5);
        assert!(matches!(ctx.validate(), Err(ContextError::ValueViolation(_))));
    }

    #[test]
    fn anonymity_set_size_defaults_to_one() {
        assert_eq!(ProofContext::new("p", "s").anonymity_set_size(), 1);
        assert_eq!(sample().anonymity_set_size(), 4);
        let ctx = ProofContext::new("p", "s").with_metadata(ANONYMITY_SET_SIZE_KEY, "four");
        assert_eq!(ctx.anonymity_set_size(), 1);
    }

    #[test]
    fn for_new_session_generates_distinct_uuids() {
        let a = ProofContext::for_new_session("peer");
        let b = ProofContext::for_new_session("peer");
        assert_ne!(a.session_id, b.session_id);
        assert!(uuid::Uuid::parse_str(&a.session_id).is_ok());
    }

    #[test]
    fn from_json_accepts_well_typed_payload() {
        let ctx = ProofContext::from_json(&json!({
            "peer_id": "QmTest123",
            "session_id": "session_001",
            "metadata": {"anonymity_set_size": 4},
            "timestamp": "2026-01-15T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(ctx.peer_id, "QmTest123");
        assert_eq!(ctx.anonymity_set_size(), 4);
        assert_eq!(ctx.timestamp, fixed_ts());
    }

    #[test]
    fn from_json_type_violations() {
        let cases = [
            (json!("not_ctx"), "ctx must be ProofContext object"),
            (json!({"peer_id": "p"}), "session_id must be str"),
            (json!({"peer_id": "p", "session_id": null}), "session_id must be str"),
            (json!({"peer_id": 7, "session_id": "s"}), "peer_id must be str"),
            (json!({"peer_id": "p", "session_id": "s", "metadata": [1]}), "metadata must be an object"),
            (json!({"peer_id": "p", "session_id": "s", "timestamp": 12}), "timestamp must be str"),
        ];
        for (payload, msg) in cases {
            assert_eq!(
                ProofContext::from_json(&payload).unwrap_err(),
                ContextError::TypeViolation(msg.into()),
                "payload: {payload}"
            );
        }
    }

    #[test]
    fn from_json_does_not_check_values() {
        let ctx = ProofContext::from_json(&json!({"peer_id": "", "session_id": "s"})).unwrap();
        assert!(matches!(ctx.validate(), Err(ContextError::ValueViolation(_))));
    }

    #[test]
    fn serde_roundtrip_preserves_hash() {
        let ctx = sample();
        let json = serde_json::to_string(&ctx).unwrap();
        let back: ProofContext = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx.context_hash().unwrap(), back.context_hash().unwrap());
    }
}
