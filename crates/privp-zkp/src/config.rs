//! Backend configuration.
//!
//! Defaults select the Pedersen backend under the build-profile policy.
//! Override via environment variables or explicit construction.

use crate::factory::BackendKind;
use crate::policy::{PolicyMode, ProofPolicy, POLICY_ENV_VAR};

/// Environment variable naming the preferred backend.
pub const BACKEND_ENV_VAR: &str = "PRIVP_ZK_BACKEND";

/// Which backend to build and under which policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendConfig {
    pub backend: BackendKind,
    pub policy: ProofPolicy,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Pedersen,
            policy: ProofPolicy::new(PolicyMode::build_default()),
        }
    }
}

impl BackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PRIVP_ZK_BACKEND` (`pedersen` or `mock`, default: `pedersen`)
    /// - `PRIVP_PROOF_POLICY` (`production`/`prod` or `development`/`dev`,
    ///   default: by build profile)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to a value
    /// that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// As [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup(BACKEND_ENV_VAR) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue(BACKEND_ENV_VAR.to_string(), raw))?,
            None => BackendKind::Pedersen,
        };
        let policy = match lookup(POLICY_ENV_VAR) {
            Some(raw) => ProofPolicy::new(
                PolicyMode::parse(&raw)
                    .ok_or_else(|| ConfigError::InvalidValue(POLICY_ENV_VAR.to_string(), raw))?,
            ),
            None => ProofPolicy::new(PolicyMode::build_default()),
        };
        Ok(Self { backend, policy })
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = BackendConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, BackendConfig::default());
        assert_eq!(cfg.backend, BackendKind::Pedersen);
    }

    #[test]
    fn reads_both_variables() {
        let cfg = BackendConfig::from_lookup(lookup(&[
            (BACKEND_ENV_VAR, "Mock"),
            (POLICY_ENV_VAR, "development"),
        ]))
        .unwrap();
        assert_eq!(cfg.backend, BackendKind::Mock);
        assert_eq!(cfg.policy.mode(), PolicyMode::Development);
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = BackendConfig::from_lookup(lookup(&[(BACKEND_ENV_VAR, "plonk")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue(BACKEND_ENV_VAR.to_string(), "plonk".to_string())
        );
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = BackendConfig::from_lookup(lookup(&[(POLICY_ENV_VAR, "staging")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue(POLICY_ENV_VAR.to_string(), "staging".to_string())
        );
    }

    #[test]
    fn policy_aliases_are_accepted() {
        let cfg = BackendConfig::from_lookup(lookup(&[(POLICY_ENV_VAR, "PROD")])).unwrap();
        assert_eq!(cfg.policy, ProofPolicy::production());
        let cfg = BackendConfig::from_lookup(lookup(&[(POLICY_ENV_VAR, " dev ")])).unwrap();
        assert_eq!(cfg.policy, ProofPolicy::development());
    }
}
