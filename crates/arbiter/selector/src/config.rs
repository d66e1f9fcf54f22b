use maple_arbiter_gate::GateThresholds;
use maple_arbiter_types::{ArbiterError, RankingMethod};
use serde::{Deserialize, Serialize};

/// Per-call selection settings.
///
/// Passed into every `select` call; nothing here is process-wide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub thresholds: GateThresholds,
    pub method: RankingMethod,
    /// Seed for robust weight sampling
    pub seed: u64,
    /// Reject accepted candidates that fall below a profile floor
    pub enforce_floors: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            thresholds: GateThresholds::default(),
            method: RankingMethod::default(),
            seed: 42,
            enforce_floors: false,
        }
    }
}

impl SelectionConfig {
    pub fn with_method(mut self, method: RankingMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_thresholds(mut self, thresholds: GateThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn enforcing_floors(mut self) -> Self {
        self.enforce_floors = true;
        self
    }

    pub fn validate(&self) -> Result<(), ArbiterError> {
        self.thresholds.validate()?;
        if let RankingMethod::RobustWeights { samples: 0 } = self.method {
            return Err(ArbiterError::InvalidConfig(
                "robust weight sampling needs at least one sample".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ArbiterError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ArbiterError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SelectionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, 42);
        assert_eq!(config.thresholds.max_repairs, 4);
        assert_eq!(config.method, RankingMethod::RobustWeights { samples: 1000 });
    }

    #[test]
    fn json_overrides_merge_with_defaults() {
        let config = SelectionConfig::from_json_str(
            r#"{"seed": 7, "method": {"method": "topsis"}, "thresholds": {"reject": 0.6}}"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.method, RankingMethod::Topsis);
        assert_eq!(config.thresholds.reject, 0.6);
        assert_eq!(config.thresholds.repair, 0.3);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(matches!(
            SelectionConfig::from_json_str("not json"),
            Err(ArbiterError::InvalidConfig(_))
        ));
        assert!(matches!(
            SelectionConfig::from_json_str(r#"{"thresholds": {"repair": 1.5}}"#),
            Err(ArbiterError::InvalidThreshold { .. })
        ));

        let zero = SelectionConfig::default().with_method(RankingMethod::RobustWeights { samples: 0 });
        assert!(matches!(zero.validate(), Err(ArbiterError::InvalidConfig(_))));
    }
}
