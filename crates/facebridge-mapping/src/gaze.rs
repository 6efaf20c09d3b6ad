//! Gaze & eye openness
//!
//! Both eyes share one gaze direction and one openness value. Openness is
//! synchronized to the most closed eye so single-eye tracking noise never
//! shows up as a lazy eye, and gaze is the slerp midpoint of the two eye
//! orientations.

use facebridge_core::{
    EyeData, GazeAngles, Quaternion, RawExpression, RawWeights, DEFAULT_DILATION_RANGE,
    DEFAULT_PUPIL_DIAMETER_MM,
};

/// Interpolation factor between the left and right eye orientations
pub const GAZE_BLEND: f32 = 0.5;

/// Raw inputs driving one eye's closure
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClosureInputs {
    pub eyes_closed: f32,
    pub cheek_raiser: f32,
    pub lid_tightener: f32,
}

impl ClosureInputs {
    pub fn left(weights: &RawWeights) -> Self {
        Self {
            eyes_closed: weights[RawExpression::EyesClosedL],
            cheek_raiser: weights[RawExpression::CheekRaiserL],
            lid_tightener: weights[RawExpression::LidTightenerL],
        }
    }

    pub fn right(weights: &RawWeights) -> Self {
        Self {
            eyes_closed: weights[RawExpression::EyesClosedR],
            cheek_raiser: weights[RawExpression::CheekRaiserR],
            lid_tightener: weights[RawExpression::LidTightenerR],
        }
    }

    /// Closure in [0, 1]; a raised cheek with tightened lids closes the eye
    /// further
    pub fn closure(&self) -> f32 {
        (self.eyes_closed + self.cheek_raiser * self.lid_tightener).clamp(0.0, 1.0)
    }

    pub fn openness(&self) -> f32 {
        1.0 - self.closure()
    }
}

/// Openness shared by both eyes: the minimum of the two
pub fn synchronized_openness(left: &ClosureInputs, right: &ClosureInputs) -> f32 {
    left.openness().min(right.openness())
}

/// Gaze from the midpoint of both eye orientations
///
/// Returns `None` when the interpolated orientation cannot be normalized.
pub fn combined_gaze(left: &Quaternion, right: &Quaternion) -> Option<GazeAngles> {
    left.slerp(right, GAZE_BLEND)
        .normalize()
        .map(|q| q.to_gaze_angles())
}

/// What an eye update actually wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeUpdate {
    /// Openness was finite and written to both eyes
    pub openness_written: bool,
    /// Gaze was derived and written to both eyes
    pub gaze_written: bool,
}

/// Write openness, gaze, pupil size and dilation range
///
/// The pupil constants are always written. Openness is written only when
/// the closure inputs are finite, and gaze only when the orientations yield
/// a usable direction; otherwise both eyes keep their previous value.
pub fn update_eye_data(
    eye: &mut EyeData,
    weights: &RawWeights,
    left_orientation: &Quaternion,
    right_orientation: &Quaternion,
) -> EyeUpdate {
    let openness =
        synchronized_openness(&ClosureInputs::left(weights), &ClosureInputs::right(weights));
    let openness_written = openness.is_finite();
    if openness_written {
        eye.left.openness = openness;
        eye.right.openness = openness;
    }

    let gaze = combined_gaze(left_orientation, right_orientation);
    if let Some(gaze) = gaze {
        eye.left.gaze = gaze;
        eye.right.gaze = gaze;
    }

    eye.left.pupil_diameter_mm = DEFAULT_PUPIL_DIAMETER_MM;
    eye.right.pupil_diameter_mm = DEFAULT_PUPIL_DIAMETER_MM;
    (eye.min_dilation, eye.max_dilation) = DEFAULT_DILATION_RANGE;

    EyeUpdate {
        openness_written,
        gaze_written: gaze.is_some(),
    }
}
