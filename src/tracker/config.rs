use crate::error::{Result, TrackError};

/// Centroids farther apart than this (in pixels) are never matched.
pub const MAX_MATCHING_DIST: f64 = 45.0;

/// Multiplier on [`MAX_MATCHING_DIST`] giving the cost of letting a parent vanish.
pub const VANISH_COST_FACTOR: f64 = 1.2;

/// Finite stand-in for a forbidden (over-threshold) assignment.
pub const APPROX_INF: f64 = 65535.0;

/// How chain extension marks match pairs as consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContinuationPolicy {
    /// Only the pair that continues the chain is consumed.
    #[default]
    Exact,
    /// Every pair of a searched match set is consumed, whether or not it
    /// continues the chain. Pairs consumed this way never start a track.
    Legacy,
}

/// Configuration for frame matching and track stitching.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub max_matching_dist: f64,
    pub vanish_cost_factor: f64,
    pub approx_inf: f64,
    pub continuation: ContinuationPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_matching_dist: MAX_MATCHING_DIST,
            vanish_cost_factor: VANISH_COST_FACTOR,
            approx_inf: APPROX_INF,
            continuation: ContinuationPolicy::Exact,
        }
    }
}

impl TrackerConfig {
    /// Cost of assigning a parent to its auxiliary "vanished" column.
    pub fn vanish_cost(&self) -> f64 {
        self.max_matching_dist * self.vanish_cost_factor
    }

    pub fn with_continuation(mut self, continuation: ContinuationPolicy) -> Self {
        self.continuation = continuation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_matching_dist.is_finite() || self.max_matching_dist <= 0.0 {
            return Err(TrackError::InvalidConfig(format!(
                "max_matching_dist must be positive and finite, got {}",
                self.max_matching_dist
            )));
        }
        if !self.approx_inf.is_finite() {
            return Err(TrackError::InvalidConfig(
                "approx_inf must be finite".to_string(),
            ));
        }
        let vanish = self.vanish_cost();
        if !(vanish > self.max_matching_dist && vanish < self.approx_inf) {
            return Err(TrackError::InvalidConfig(format!(
                "vanish cost {vanish} must lie strictly between max_matching_dist {} and approx_inf {}",
                self.max_matching_dist, self.approx_inf
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.max_matching_dist, 45.0);
        assert_eq!(config.approx_inf, 65535.0);
        assert_relative_eq!(config.vanish_cost(), 54.0);
        assert_eq!(config.continuation, ContinuationPolicy::Exact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let config = TrackerConfig {
            max_matching_dist: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TrackError::InvalidConfig(_))));

        let config = TrackerConfig {
            max_matching_dist: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_vanish_cost_out_of_range() {
        let below = TrackerConfig {
            vanish_cost_factor: 0.9,
            ..Default::default()
        };
        assert!(below.validate().is_err());

        let above = TrackerConfig {
            approx_inf: 50.0,
            ..Default::default()
        };
        assert!(above.validate().is_err());
    }
}
