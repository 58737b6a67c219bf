//! Knobs for harness synthesis.

use serde::{Deserialize, Serialize};
use tandem_config::HarnessConfig;

/// Instance names, trial budget, seed and timing of a synthesized harness.
///
/// Delays are in nanoseconds under the harness's `1ns/1ps` timescale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessOptions {
    /// Instance name of the golden module.
    pub golden_instance: String,
    /// Instance name of the candidate module.
    pub candidate_instance: String,
    /// Number of stimulus iterations.
    pub trials: u32,
    /// Initial value of the harness `seed` variable.
    pub seed: u32,
    /// Half period of the clock generator.
    pub clock_half_period: u32,
    /// Time reset is held asserted.
    pub reset_assert: u32,
    /// Time between reset release and the first stimulus.
    pub reset_release: u32,
    /// Time between applying stimulus and comparing outputs.
    pub settle_delay: u32,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            golden_instance: "golden_inst".to_string(),
            candidate_instance: "buggy_inst".to_string(),
            trials: 1000,
            seed: 0,
            clock_half_period: 5,
            reset_assert: 20,
            reset_release: 10,
            settle_delay: 10,
        }
    }
}

impl HarnessOptions {
    /// Options from configuration. Without a configured seed a fresh random
    /// one is drawn, so every harness is still replayable from its seed.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            trials: config.trials,
            seed: config.seed.unwrap_or_else(rand::random),
            clock_half_period: config.clock_half_period,
            reset_assert: config.reset_assert,
            reset_release: config.reset_release,
            settle_delay: config.settle_delay,
            ..Self::default()
        }
    }

    /// Replaces the seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the trial budget. A harness always runs at least one trial.
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = HarnessOptions::default();
        assert_eq!(opts.golden_instance, "golden_inst");
        assert_eq!(opts.candidate_instance, "buggy_inst");
        assert_eq!(opts.trials, 1000);
        assert_eq!(opts.clock_half_period, 5);
    }

    #[test]
    fn config_seed_is_used() {
        let config = HarnessConfig {
            seed: Some(77),
            trials: 12,
            ..HarnessConfig::default()
        };
        let opts = HarnessOptions::from_config(&config);
        assert_eq!(opts.seed, 77);
        assert_eq!(opts.trials, 12);
        assert_eq!(opts.golden_instance, "golden_inst");
    }

    #[test]
    fn builders_override() {
        let opts = HarnessOptions::default().with_seed(5).with_trials(9);
        assert_eq!((opts.seed, opts.trials), (5, 9));
        assert_eq!(HarnessOptions::default().with_trials(0).trials, 1);
    }
}
