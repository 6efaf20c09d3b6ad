//! Temporal smoothing - one-pole exponential filter per channel
//!
//! `smoothed = previous + (raw - previous) * alpha`
//!
//! Settling takes a few ticks: after k ticks of a constant input `v` from a
//! zero state the output is `v * (1 - (1 - alpha)^k)`.

use facebridge_core::{ChannelMap, ExpressionChannel};

/// Filter coefficient, fixed for every channel
pub const SMOOTHING_ALPHA: f32 = 0.35;

/// Per-channel exponential moving average state
#[derive(Debug, Clone, Default)]
pub struct SmoothingFilter {
    /// Last emitted value per channel, zero until first written
    previous: ChannelMap<f32>,
}

impl SmoothingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last emitted value for a channel
    pub fn previous(&self, channel: ExpressionChannel) -> f32 {
        self.previous[channel]
    }

    /// Feed one raw value and return the smoothed one
    ///
    /// A non-finite input leaves the channel's history untouched and
    /// returns `None`, so one bad sample cannot poison the average.
    pub fn apply(&mut self, channel: ExpressionChannel, raw: f32) -> Option<f32> {
        debug_assert!(channel.is_smoothed(), "{channel} is not a smoothed channel");

        if !raw.is_finite() {
            return None;
        }

        let prev = self.previous[channel];
        let smoothed = prev + (raw - prev) * SMOOTHING_ALPHA;
        self.previous[channel] = smoothed;
        Some(smoothed)
    }

    /// Forget all history
    pub fn reset(&mut self) {
        self.previous.clear();
    }
}
