//! # Timestamps
//!
//! `Timestamp` is a UTC instant truncated to whole seconds. Contexts carry
//! one, and it is part of their canonical bytes, so the representation must
//! be identical on every machine: `YYYY-MM-DDTHH:MM:SSZ`, never an offset,
//! never sub-seconds.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PrivpError;

/// A UTC-only timestamp with seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string. Only the `Z` suffix is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PrivpError::Timestamp`] for malformed input or any explicit
    /// offset, including `+00:00`.
    pub fn parse(s: &str) -> Result<Self, PrivpError> {
        if !s.ends_with('Z') {
            return Err(PrivpError::Timestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| PrivpError::Timestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// From Unix epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns [`PrivpError::Timestamp`] if `secs` is out of chrono's range.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, PrivpError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| PrivpError::Timestamp(format!("invalid Unix timestamp: {secs}")))
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// The inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// ISO 8601 with `Z` suffix.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
