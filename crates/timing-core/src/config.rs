use serde::{Deserialize, Serialize};

/// Default distance from the line below which a crossing is suspected.
pub const DEFAULT_CROSSING_THRESHOLD_M: f64 = 10.0;

/// Default number of fixes kept while a crossing is suspected.
pub const DEFAULT_BUFFER_CAPACITY: usize = 10;

/// Interpolation needs at least one pair of fixes.
pub const MIN_BUFFER_CAPACITY: usize = 2;

/// How the crossing instant is reconstructed from the buffered fixes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationStrategy {
    /// Straight line between the bracketing pair.
    Linear,
    /// Uniform Catmull-Rom spline through the bracketing pair and one neighbour on each side.
    #[default]
    CatmullRom,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Hysteresis band around the line, meters
    pub crossing_threshold_m: f64,
    /// Ring buffer size, fixed for the lifetime of the timer
    pub buffer_capacity: usize,
    pub strategy: InterpolationStrategy,
    /// Retry with linear interpolation when the spline lacks a neighbour fix
    pub fallback_to_linear: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            crossing_threshold_m: DEFAULT_CROSSING_THRESHOLD_M,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            strategy: InterpolationStrategy::CatmullRom,
            fallback_to_linear: true,
        }
    }
}

impl TimerConfig {
    pub fn linear() -> Self {
        Self { strategy: InterpolationStrategy::Linear, ..Self::default() }
    }

    pub(crate) fn effective_capacity(&self) -> usize {
        self.buffer_capacity.max(MIN_BUFFER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let cfg: TimerConfig =
            serde_json::from_str(r#"{"crossing_threshold_m": 6.5, "strategy": "linear"}"#).unwrap();
        assert_eq!(cfg.crossing_threshold_m, 6.5);
        assert_eq!(cfg.strategy, InterpolationStrategy::Linear);
        assert_eq!(cfg.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert!(cfg.fallback_to_linear);
    }

    #[test]
    fn test_tiny_capacity_is_raised() {
        let cfg = TimerConfig { buffer_capacity: 0, ..TimerConfig::default() };
        assert_eq!(cfg.effective_capacity(), MIN_BUFFER_CAPACITY);
    }
}
