//! Search configuration parameters.
//!
//! These parameters control the behavior of the Monte Carlo Tree Search engine.
//! They deserialize from TOML or JSON; missing fields take their defaults.

use montecarlo_core::{MctsError, Result};
use serde::{Deserialize, Serialize};

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// UCB1 exploration coefficient `c`.
    /// Higher values favor rarely visited children, 0 is pure exploitation.
    pub exploration_coefficient: f64,

    /// Number of iterations run by `Mcts::run_budget`.
    pub iteration_budget: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_coefficient: 1.0,
            iteration_budget: 1000,
        }
    }
}

impl MctsConfig {
    /// Create a new config with the specified iteration budget.
    pub fn with_iterations(iteration_budget: usize) -> Self {
        Self {
            iteration_budget,
            ..Default::default()
        }
    }

    /// Builder pattern: set the exploration coefficient.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_coefficient = c;
        self
    }

    /// Check that the parameters can drive a search.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidConfig` if the exploration coefficient is
    /// negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_coefficient.is_finite() || self.exploration_coefficient < 0.0 {
            return Err(MctsError::InvalidConfig(format!(
                "exploration_coefficient must be a finite non-negative number, got {}",
                self.exploration_coefficient
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert!((config.exploration_coefficient - 1.0).abs() < 1e-12);
        assert_eq!(config.iteration_budget, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::with_iterations(50).with_exploration(1.41);
        assert_eq!(config.iteration_budget, 50);
        assert!((config.exploration_coefficient - 1.41).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_coefficient() {
        for c in [-0.1, f64::NAN, f64::INFINITY] {
            let config = MctsConfig::default().with_exploration(c);
            assert!(matches!(
                config.validate(),
                Err(MctsError::InvalidConfig(_))
            ));
        }
        assert!(MctsConfig::default().with_exploration(0.0).validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: MctsConfig = toml::from_str("iteration_budget = 25").unwrap();
        assert_eq!(config.iteration_budget, 25);
        assert!((config.exploration_coefficient - 1.0).abs() < 1e-12);
    }
}
