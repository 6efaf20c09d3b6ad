//! Face mapper - one snapshot in, normalized output written
//!
//! Branches are gated independently: any subset of the validity flags may
//! be set, and a branch that does not run leaves its part of the output
//! exactly as it was.

use facebridge_core::TrackingOutput;
use facebridge_wire::RawSnapshot;

use crate::{update_eye_data, update_eye_expressions, update_mouth_expressions, SmoothingFilter};

/// Which branches the host allows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub eye: bool,
    pub expression: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        eye: true,
        expression: true,
    };

    pub const NONE: Capabilities = Capabilities {
        eye: false,
        expression: false,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ALL
    }
}

/// What one mapping pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapReport {
    /// Eye openness branch ran
    pub eye: bool,
    /// Openness was finite and written (only meaningful when `eye` is set)
    pub openness_written: bool,
    /// Gaze was derived (only meaningful when `eye` is set)
    pub gaze_written: bool,
    /// Eye/brow expression branch ran
    pub eye_expressions: bool,
    /// Mouth branch ran
    pub mouth: bool,
    /// Eye/brow and mouth channels skipped for non-finite input
    pub skipped_channels: usize,
}

impl MapReport {
    /// Any branch ran, i.e. the user is being tracked
    pub fn is_tracking(&self) -> bool {
        self.eye || self.eye_expressions || self.mouth
    }
}

/// Snapshot-to-output mapper owning the smoothing history
#[derive(Debug, Clone, Default)]
pub struct FaceMapper {
    filter: SmoothingFilter,
}

impl FaceMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &SmoothingFilter {
        &self.filter
    }

    /// Run every enabled and valid branch against `output`
    pub fn map(
        &mut self,
        snapshot: &RawSnapshot,
        capabilities: Capabilities,
        output: &mut TrackingOutput,
    ) -> MapReport {
        let mut report = MapReport::default();
        let flags = snapshot.flags;
        let weights = &snapshot.weights;

        if capabilities.eye && flags.any_eye() {
            let update = update_eye_data(
                &mut output.eye,
                weights,
                &snapshot.left_eye,
                &snapshot.right_eye,
            );
            report.eye = true;
            report.openness_written = update.openness_written;
            report.gaze_written = update.gaze_written;
        }

        if capabilities.eye && flags.eye_following_blendshapes() {
            report.skipped_channels += update_eye_expressions(&mut output.shapes, weights);
            report.eye_expressions = true;
        }

        if capabilities.expression && flags.face() {
            report.skipped_channels +=
                update_mouth_expressions(&mut output.shapes, weights, &mut self.filter);
            report.mouth = true;
        }

        report
    }

    /// Drop all smoothing history
    pub fn reset(&mut self) {
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facebridge_core::{ExpressionChannel, RawExpression};
    use facebridge_wire::ValidityFlags;

    fn snapshot(flags: ValidityFlags) -> RawSnapshot {
        let mut snapshot = RawSnapshot::new();
        snapshot.flags = flags;
        snapshot.weights.set(RawExpression::EyesClosedL, 0.5);
        snapshot.weights.set(RawExpression::UpperLidRaiserL, 0.4);
        snapshot.weights.set(RawExpression::JawDrop, 1.0);
        snapshot
    }

    #[test]
    fn test_all_branches() {
        let mut mapper = FaceMapper::new();
        let mut output = TrackingOutput::new();

        let report = mapper.map(&snapshot(ValidityFlags::ALL), Capabilities::ALL, &mut output);

        assert!(report.eye && report.gaze_written && report.eye_expressions && report.mouth);
        assert!(report.openness_written);
        assert!(report.is_tracking());
        assert!((output.eye.left.openness - 0.5).abs() < 1e-6);
        assert_eq!(output.weight(ExpressionChannel::EyeWideLeft), 0.4);
        assert!((output.weight(ExpressionChannel::JawOpen) - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_face_invalid_keeps_mouth_exactly() {
        let mut mapper = FaceMapper::new();
        let mut output = TrackingOutput::new();
        mapper.map(&snapshot(ValidityFlags::ALL), Capabilities::ALL, &mut output);
        let jaw = output.weight(ExpressionChannel::JawOpen);
        let history = mapper.filter().previous(ExpressionChannel::JawOpen);

        let mut changed = snapshot(ValidityFlags::ALL);
        changed.flags.set(ValidityFlags::FACE, false);
        changed.weights.set(RawExpression::JawDrop, 0.0);
        let report = mapper.map(&changed, Capabilities::ALL, &mut output);

        assert!(!report.mouth);
        assert_eq!(output.weight(ExpressionChannel::JawOpen), jaw);
        assert_eq!(mapper.filter().previous(ExpressionChannel::JawOpen), history);
    }

    #[test]
    fn test_eye_invalid_leaves_eye_untouched() {
        let mut mapper = FaceMapper::new();
        let mut output = TrackingOutput::new();
        let before = output.eye;

        let flags = ValidityFlags::NONE.with(ValidityFlags::FACE);
        let report = mapper.map(&snapshot(flags), Capabilities::ALL, &mut output);

        assert!(!report.eye && !report.eye_expressions);
        assert!(report.mouth && report.is_tracking());
        assert_eq!(output.eye, before);
        assert_eq!(output.weight(ExpressionChannel::EyeWideLeft), 0.0);
    }

    #[test]
    fn test_single_eye_flag_runs_eye_branch() {
        let mut mapper = FaceMapper::new();
        let mut output = TrackingOutput::new();

        let flags = ValidityFlags::NONE.with(ValidityFlags::RIGHT_EYE);
        let report = mapper.map(&snapshot(flags), Capabilities::ALL, &mut output);

        assert!(report.eye);
        assert!(!report.eye_expressions);
    }

    #[test]
    fn test_capabilities_gate_branches() {
        let mut mapper = FaceMapper::new();
        let mut output = TrackingOutput::new();

        let eye_only = Capabilities {
            eye: true,
            expression: false,
        };
        let report = mapper.map(&snapshot(ValidityFlags::ALL), eye_only, &mut output);
        assert!(report.eye && report.eye_expressions && !report.mouth);

        let report = mapper.map(&snapshot(ValidityFlags::ALL), Capabilities::NONE, &mut output);
        assert!(!report.is_tracking());
    }

    #[test]
    fn test_non_finite_weights_never_reach_output() {
        let mut mapper = FaceMapper::new();
        let mut output = TrackingOutput::new();
        mapper.map(&snapshot(ValidityFlags::ALL), Capabilities::ALL, &mut output);
        let before = output.clone();

        let mut bad = snapshot(ValidityFlags::ALL);
        bad.weights.set(RawExpression::EyesClosedL, f32::NAN);
        bad.weights.set(RawExpression::EyesClosedR, f32::NAN);
        bad.weights.set(RawExpression::UpperLidRaiserL, f32::NAN);
        bad.weights.set(RawExpression::JawDrop, f32::NAN);
        let report = mapper.map(&bad, Capabilities::ALL, &mut output);

        assert!(report.eye && !report.openness_written && report.gaze_written);
        assert_eq!(report.skipped_channels, 2);
        assert!(report.is_tracking());

        assert_eq!(output.eye.left.openness, before.eye.left.openness);
        assert_eq!(output.eye.right.openness, before.eye.right.openness);
        assert!((0.0..=1.0).contains(&output.eye.left.openness));
        assert_eq!(
            output.weight(ExpressionChannel::EyeWideLeft),
            before.weight(ExpressionChannel::EyeWideLeft)
        );
        assert_eq!(
            output.weight(ExpressionChannel::JawOpen),
            before.weight(ExpressionChannel::JawOpen)
        );
        assert!(output.shapes.iter().all(|(_, v)| v.is_finite()));
    }

    #[test]
    fn test_no_flags_not_tracking() {
        let mut mapper = FaceMapper::new();
        let mut output = TrackingOutput::new();
        let report = mapper.map(&snapshot(ValidityFlags::NONE), Capabilities::ALL, &mut output);
        assert!(!report.is_tracking());
        assert_eq!(output, TrackingOutput::new());
    }
}
