use bevy::prelude::*;

use crate::config::TickerConfig;

/// Frame clock normalised against a nominal frame rate.
///
/// `delta_ratio()` is 1.0 when the last frame took exactly one nominal frame,
/// 2.0 when it took two, and so on. Frames longer than the lag threshold
/// (tab switch, debugger pause) are clamped to a short adjusted lag so eased
/// values don't snap straight to their targets.
#[derive(Resource, Debug, Clone)]
pub struct FrameTicker {
    nominal_frame_ms: f32,
    lag_threshold_ms: f32,
    adjusted_lag_ms: f32,
    last_elapsed_ms: f32,
}

impl FrameTicker {
    pub fn new(config: &TickerConfig) -> Self {
        Self {
            nominal_frame_ms: 1000.0 / config.fps,
            lag_threshold_ms: config.lag_threshold_ms,
            adjusted_lag_ms: config.adjusted_lag_ms,
            last_elapsed_ms: 0.0,
        }
    }

    /// Record one frame that took `delta_secs` of wall time
    pub fn advance(&mut self, delta_secs: f32) {
        let elapsed_ms = (delta_secs * 1000.0).max(0.0);
        self.last_elapsed_ms = if elapsed_ms > self.lag_threshold_ms {
            self.adjusted_lag_ms
        } else {
            elapsed_ms
        };
    }

    pub fn delta_ratio(&self) -> f32 {
        self.last_elapsed_ms / self.nominal_frame_ms
    }

    /// Lag-smoothed seconds for the current frame; tweens advance by this
    pub fn delta_secs(&self) -> f32 {
        self.last_elapsed_ms / 1000.0
    }
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new(&TickerConfig::default())
    }
}

/// System: advance the ticker once per frame, before anything reads it
pub fn advance_ticker(time: Res<Time>, mut ticker: ResMut<FrameTicker>) {
    ticker.advance(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_frame_is_unit_ratio() {
        let mut ticker = FrameTicker::default();
        ticker.advance(1.0 / 60.0);
        assert!((ticker.delta_ratio() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_slow_frame_scales_ratio() {
        let mut ticker = FrameTicker::default();
        ticker.advance(1.0 / 30.0);
        assert!((ticker.delta_ratio() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_lag_spike_is_smoothed() {
        let mut ticker = FrameTicker::default();
        ticker.advance(0.6);
        // 600ms spike is replaced by 33ms
        assert!((ticker.delta_ratio() - 33.0 / (1000.0 / 60.0)).abs() < 1e-4);
        assert!((ticker.delta_secs() - 0.033).abs() < 1e-6);
    }

    #[test]
    fn test_fresh_ticker_reports_zero() {
        let ticker = FrameTicker::default();
        assert_eq!(ticker.delta_ratio(), 0.0);
        assert_eq!(ticker.delta_secs(), 0.0);
    }
}
