use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::{AdaptiveError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    pub store: StoreConfig,
    pub fingerprint: FingerprintConfig,
    pub weights: MatchWeights,
    /// Minimum similarity score required to accept a relocation match.
    pub threshold: f64,
    /// Optional cap on the number of candidates scanned per relocation.
    pub max_candidates: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database path for the durable backend; ignored by the in-memory one.
    pub location: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Cap on the normalized own-text signature, in characters.
    pub max_text_signature_length: usize,
}

/// Relative importance of each fingerprint feature. Must sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchWeights {
    pub attributes: f64,
    pub text: f64,
    pub path: f64,
    pub structural: f64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            fingerprint: FingerprintConfig::default(),
            weights: MatchWeights::default(),
            threshold: 0.70,
            max_candidates: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            location: None,
        }
    }
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            max_text_signature_length: 200,
        }
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            attributes: 0.5,
            text: 0.3,
            path: 0.15,
            structural: 0.05,
        }
    }
}

impl MatchWeights {
    pub fn validate(&self) -> Result<()> {
        let parts = [self.attributes, self.text, self.path, self.structural];
        if parts.iter().any(|w| *w < 0.0) {
            return Err(AdaptiveError::ConfigurationError(
                "match weights must be non-negative".to_string(),
            ));
        }
        let sum: f64 = parts.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(AdaptiveError::ConfigurationError(format!(
                "match weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

impl AdaptiveConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(AdaptiveError::ConfigurationError(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if matches!(self.store.backend, StoreBackend::Sqlite) && self.store.location.is_none() {
            return Err(AdaptiveError::ConfigurationError(
                "sqlite backend requires a location".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        AdaptiveConfig::default().validate().unwrap();
    }

    #[test]
    fn weights_must_sum_to_one() {
        let weights = MatchWeights {
            attributes: 0.9,
            text: 0.3,
            path: 0.15,
            structural: 0.05,
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn sqlite_backend_requires_location() {
        let config = AdaptiveConfig {
            store: StoreConfig {
                backend: StoreBackend::Sqlite,
                location: None,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        let config = AdaptiveConfig {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
