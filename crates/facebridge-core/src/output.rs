//! Normalized output model handed to the avatar consumer
//!
//! The consumer owns these values and reads them after every tick. The
//! mapping pipeline only ever writes into named slots, so anything a tick
//! does not touch keeps its previous value.

use crate::{ChannelMap, ExpressionChannel, GazeAngles};

/// Stand-in pupil diameter; the raw data carries no dilation signal
pub const DEFAULT_PUPIL_DIAMETER_MM: f32 = 5.0;

/// Dilation normalization range fitted to average pupil sizes
pub const DEFAULT_DILATION_RANGE: (f32, f32) = (0.0, 10.0);

/// Per-eye normalized state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeState {
    /// Openness (0.0 = closed, 1.0 = fully open)
    pub openness: f32,
    /// Look direction
    pub gaze: GazeAngles,
    /// Pupil diameter in millimetres
    pub pupil_diameter_mm: f32,
}

impl Default for EyeState {
    fn default() -> Self {
        Self {
            openness: 1.0,
            gaze: GazeAngles::FORWARD,
            pupil_diameter_mm: DEFAULT_PUPIL_DIAMETER_MM,
        }
    }
}

/// Both eyes plus the shared dilation range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeData {
    pub left: EyeState,
    pub right: EyeState,
    pub min_dilation: f32,
    pub max_dilation: f32,
}

impl Default for EyeData {
    fn default() -> Self {
        Self {
            left: EyeState::default(),
            right: EyeState::default(),
            min_dilation: DEFAULT_DILATION_RANGE.0,
            max_dilation: DEFAULT_DILATION_RANGE.1,
        }
    }
}

/// Everything the consumer reads each tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingOutput {
    pub eye: EyeData,
    pub shapes: ChannelMap<f32>,
}

impl TrackingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn weight(&self, channel: ExpressionChannel) -> f32 {
        self.shapes[channel]
    }

    #[inline]
    pub fn set_weight(&mut self, channel: ExpressionChannel, value: f32) {
        self.shapes[channel] = value;
    }
}
