//! # Proof Backend Policy
//!
//! Decides whether a backend may be used in the current deployment.
//!
//! The mock backend's "proofs" are hashes anyone can produce without a
//! witness. A verifier that accepts them in production accepts forgeries,
//! so [`PolicyMode::Production`] refuses the mock backend at selection time.
//!
//! ## Configuration
//!
//! 1. Explicit construction ([`ProofPolicy::production`] and friends).
//! 2. `PRIVP_PROOF_POLICY`, read by
//!    [`BackendConfig::from_env`](crate::config::BackendConfig::from_env)
//!    through [`PolicyMode::parse`].
//! 3. Build profile: release builds default to `Production`, debug builds
//!    to `Development`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::factory::BackendKind;

/// Environment variable selecting the policy mode.
pub const POLICY_ENV_VAR: &str = "PRIVP_PROOF_POLICY";

/// Errors from policy enforcement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The mock backend was requested under a production policy.
    #[error("mock backend rejected: production mode requires a real proof backend ({backend})")]
    MockBackendRejected {
        /// Name of the rejected backend.
        backend: String,
    },
}

/// Policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Reject the mock backend.
    Production,
    /// Accept every backend.
    Development,
}

impl PolicyMode {
    /// Parse `production`/`prod` or `development`/`dev`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }

    /// The build-profile default.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }
}

/// Runtime policy over backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofPolicy {
    mode: PolicyMode,
}

impl ProofPolicy {
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    pub fn production() -> Self {
        Self::new(PolicyMode::Production)
    }

    pub fn development() -> Self {
        Self::new(PolicyMode::Development)
    }

    /// Accept or reject `backend` under this policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::MockBackendRejected`] for the mock backend in
    /// production mode.
    pub fn validate(&self, backend: BackendKind) -> Result<(), PolicyError> {
        match self.mode {
            PolicyMode::Production if !backend.is_real() => Err(PolicyError::MockBackendRejected {
                backend: backend.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }
}
