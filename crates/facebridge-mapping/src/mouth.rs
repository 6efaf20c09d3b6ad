//! Jaw, mouth, lip, cheek, nose and tongue expressions
//!
//! Every channel here is derived from the raw weights and then passed
//! through the [`SmoothingFilter`]. Several raw signals are correlated on
//! the sensor side, so a few channels need compensation instead of a plain
//! copy:
//! - upper lip up/deepen subtract the nose wrinkler bleed, floored at zero
//! - upper lip suck is suppressed by the upper lip raiser through a
//!   sixth-root curve and never exceeds the raw suck weight
//! - upper/lower mouth shifts and corner pull/slant share one raw signal

use facebridge_core::{ChannelMap, ExpressionChannel, RawExpression, RawWeights};

use crate::SmoothingFilter;

/// Number of smoothed channels driven by the mouth mapper
pub const MOUTH_CHANNEL_COUNT: usize = 53;

/// Upper lip raiser with the nose wrinkler bleed removed
#[inline]
pub fn upper_lip_up(upper_lip_raiser: f32, nose_wrinkler: f32) -> f32 {
    (upper_lip_raiser - nose_wrinkler).max(0.0)
}

/// Upper lip suck, damped as the upper lip raiser rises
#[inline]
pub fn upper_lip_suck(upper_lip_raiser: f32, lip_suck: f32) -> f32 {
    (1.0 - upper_lip_raiser.powf(1.0 / 6.0)).min(lip_suck)
}

/// Source value for every mouth channel, before smoothing
pub fn mouth_sources(w: &RawWeights) -> [(ExpressionChannel, f32); MOUTH_CHANNEL_COUNT] {
    use ExpressionChannel as C;
    use RawExpression as R;

    let upper_up_left = upper_lip_up(w[R::UpperLipRaiserL], w[R::NoseWrinklerL]);
    let upper_up_right = upper_lip_up(w[R::UpperLipRaiserR], w[R::NoseWrinklerR]);

    [
        // Jaw
        (C::JawOpen, w[R::JawDrop]),
        (C::JawLeft, w[R::JawSidewaysLeft]),
        (C::JawRight, w[R::JawSidewaysRight]),
        (C::JawForward, w[R::JawThrust]),
        // Mouth
        (C::MouthClosed, w[R::LipsToward]),
        (C::MouthUpperLeft, w[R::MouthLeft]),
        (C::MouthLowerLeft, w[R::MouthLeft]),
        (C::MouthUpperRight, w[R::MouthRight]),
        (C::MouthLowerRight, w[R::MouthRight]),
        (C::MouthCornerPullLeft, w[R::LipCornerPullerL]),
        (C::MouthCornerSlantLeft, w[R::LipCornerPullerL]),
        (C::MouthCornerPullRight, w[R::LipCornerPullerR]),
        (C::MouthCornerSlantRight, w[R::LipCornerPullerR]),
        (C::MouthFrownLeft, w[R::LipCornerDepressorL]),
        (C::MouthFrownRight, w[R::LipCornerDepressorR]),
        (C::MouthLowerDownLeft, w[R::LowerLipDepressorL]),
        (C::MouthLowerDownRight, w[R::LowerLipDepressorR]),
        (C::MouthUpperUpLeft, upper_up_left),
        (C::MouthUpperDeepenLeft, upper_up_left),
        (C::MouthUpperUpRight, upper_up_right),
        (C::MouthUpperDeepenRight, upper_up_right),
        (C::MouthRaiserUpper, w[R::ChinRaiserT]),
        (C::MouthRaiserLower, w[R::ChinRaiserB]),
        (C::MouthDimpleLeft, w[R::DimplerL]),
        (C::MouthDimpleRight, w[R::DimplerR]),
        (C::MouthTightenerLeft, w[R::LipTightenerL]),
        (C::MouthTightenerRight, w[R::LipTightenerR]),
        (C::MouthPressLeft, w[R::LipPressorL]),
        (C::MouthPressRight, w[R::LipPressorR]),
        (C::MouthStretchLeft, w[R::LipStretcherL]),
        (C::MouthStretchRight, w[R::LipStretcherR]),
        // Lip
        (C::LipPuckerUpperRight, w[R::LipPuckerR]),
        (C::LipPuckerLowerRight, w[R::LipPuckerR]),
        (C::LipPuckerUpperLeft, w[R::LipPuckerL]),
        (C::LipPuckerLowerLeft, w[R::LipPuckerL]),
        (C::LipFunnelUpperLeft, w[R::LipFunnelerLt]),
        (C::LipFunnelUpperRight, w[R::LipFunnelerRt]),
        (C::LipFunnelLowerLeft, w[R::LipFunnelerLb]),
        (C::LipFunnelLowerRight, w[R::LipFunnelerRb]),
        (
            C::LipSuckUpperLeft,
            upper_lip_suck(w[R::UpperLipRaiserL], w[R::LipSuckLt]),
        ),
        (
            C::LipSuckUpperRight,
            upper_lip_suck(w[R::UpperLipRaiserR], w[R::LipSuckRt]),
        ),
        (C::LipSuckLowerLeft, w[R::LipSuckLb]),
        (C::LipSuckLowerRight, w[R::LipSuckRb]),
        // Cheek
        (C::CheekPuffLeft, w[R::CheekPuffL]),
        (C::CheekPuffRight, w[R::CheekPuffR]),
        (C::CheekSuckLeft, w[R::CheekSuckL]),
        (C::CheekSuckRight, w[R::CheekSuckR]),
        (C::CheekSquintLeft, w[R::CheekRaiserL]),
        (C::CheekSquintRight, w[R::CheekRaiserR]),
        // Nose
        (C::NoseSneerLeft, w[R::NoseWrinklerL]),
        (C::NoseSneerRight, w[R::NoseWrinklerR]),
        // Tongue
        (C::TongueOut, w[R::TongueOut]),
        (C::TongueCurlUp, w[R::TongueTipAlveolar]),
    ]
}

/// Smooth every mouth channel and write it out
///
/// Returns how many channels were skipped because their source value was
/// not finite; those keep their previous output.
pub fn update_mouth_expressions(
    shapes: &mut ChannelMap<f32>,
    weights: &RawWeights,
    filter: &mut SmoothingFilter,
) -> usize {
    let mut skipped = 0;

    for (channel, source) in mouth_sources(weights) {
        match filter.apply(channel, source) {
            Some(smoothed) => shapes[channel] = smoothed,
            None => skipped += 1,
        }
    }

    skipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(weights: &RawWeights, channel: ExpressionChannel) -> f32 {
        mouth_sources(weights)
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, v)| *v)
            .unwrap()
    }

    #[test]
    fn test_covers_every_smoothed_channel_once() {
        let mut mapped: Vec<_> = mouth_sources(&RawWeights::default())
            .iter()
            .map(|(c, _)| *c)
            .collect();
        mapped.sort();
        mapped.dedup();
        assert_eq!(mapped.len(), MOUTH_CHANNEL_COUNT);

        let smoothed: Vec<_> = ExpressionChannel::ALL
            .iter()
            .copied()
            .filter(|c| c.is_smoothed())
            .collect();
        assert_eq!(mapped, smoothed);
    }

    #[test]
    fn test_upper_lip_up_floored() {
        let weights = RawWeights::default()
            .with(RawExpression::UpperLipRaiserL, 0.6)
            .with(RawExpression::NoseWrinklerL, 0.9);
        assert_eq!(source(&weights, ExpressionChannel::MouthUpperUpLeft), 0.0);
        assert_eq!(source(&weights, ExpressionChannel::MouthUpperDeepenLeft), 0.0);
    }

    #[test]
    fn test_upper_lip_up_subtracts_wrinkle() {
        let weights = RawWeights::default()
            .with(RawExpression::UpperLipRaiserR, 0.9)
            .with(RawExpression::NoseWrinklerR, 0.25);
        let up = source(&weights, ExpressionChannel::MouthUpperUpRight);
        assert!((up - 0.65).abs() < 1e-6);
        assert_eq!(up, source(&weights, ExpressionChannel::MouthUpperDeepenRight));
    }

    #[test]
    fn test_lip_suck_upper_compensation() {
        let relaxed = RawWeights::default().with(RawExpression::LipSuckLt, 0.8);
        assert!((source(&relaxed, ExpressionChannel::LipSuckUpperLeft) - 0.8).abs() < 1e-6);

        let raised = relaxed.with(RawExpression::UpperLipRaiserL, 1.0);
        assert_eq!(source(&raised, ExpressionChannel::LipSuckUpperLeft), 0.0);
    }

    #[test]
    fn test_lip_suck_upper_never_exceeds_raw() {
        for raiser in [0.0, 0.001, 0.1, 0.5, 0.9] {
            for suck in [0.0, 0.2, 0.5, 1.0] {
                let v = upper_lip_suck(raiser, suck);
                assert!(v <= suck, "raiser {raiser} suck {suck} gave {v}");
            }
        }
        // Sixth-root decay: a small raiser already cuts deep
        let v = upper_lip_suck(0.001, 1.0);
        assert!((v - (1.0 - 0.001f32.powf(1.0 / 6.0))).abs() < 1e-6);
        assert!(v < 0.7);
    }

    #[test]
    fn test_lip_suck_lower_is_direct() {
        let weights = RawWeights::default()
            .with(RawExpression::UpperLipRaiserR, 1.0)
            .with(RawExpression::LipSuckRb, 0.4);
        assert_eq!(source(&weights, ExpressionChannel::LipSuckLowerRight), 0.4);
    }

    #[test]
    fn test_shared_sources() {
        let weights = RawWeights::default()
            .with(RawExpression::MouthLeft, 0.3)
            .with(RawExpression::LipCornerPullerR, 0.7)
            .with(RawExpression::TongueTipAlveolar, 0.2);

        assert_eq!(source(&weights, ExpressionChannel::MouthUpperLeft), 0.3);
        assert_eq!(source(&weights, ExpressionChannel::MouthLowerLeft), 0.3);
        assert_eq!(source(&weights, ExpressionChannel::MouthCornerPullRight), 0.7);
        assert_eq!(source(&weights, ExpressionChannel::MouthCornerSlantRight), 0.7);
        assert_eq!(source(&weights, ExpressionChannel::TongueCurlUp), 0.2);
    }

    #[test]
    fn test_update_smooths_output() {
        let weights = RawWeights::default().with(RawExpression::JawDrop, 1.0);
        let mut shapes = ChannelMap::new();
        let mut filter = SmoothingFilter::new();

        let skipped = update_mouth_expressions(&mut shapes, &weights, &mut filter);
        assert_eq!(skipped, 0);
        assert!((shapes[ExpressionChannel::JawOpen] - 0.35).abs() < 1e-6);

        update_mouth_expressions(&mut shapes, &weights, &mut filter);
        assert!((shapes[ExpressionChannel::JawOpen] - (1.0 - 0.65 * 0.65)).abs() < 1e-6);
    }

    #[test]
    fn test_update_leaves_eye_channels() {
        let mut shapes = ChannelMap::new();
        shapes[ExpressionChannel::EyeWideLeft] = 0.9;
        let mut filter = SmoothingFilter::new();

        update_mouth_expressions(&mut shapes, &RawWeights::default(), &mut filter);
        assert_eq!(shapes[ExpressionChannel::EyeWideLeft], 0.9);
    }

    #[test]
    fn test_non_finite_source_keeps_previous() {
        let mut shapes = ChannelMap::new();
        let mut filter = SmoothingFilter::new();
        let good = RawWeights::default().with(RawExpression::CheekPuffL, 1.0);
        update_mouth_expressions(&mut shapes, &good, &mut filter);
        let before = shapes[ExpressionChannel::CheekPuffLeft];

        let bad = good.with(RawExpression::CheekPuffL, f32::NAN);
        let skipped = update_mouth_expressions(&mut shapes, &bad, &mut filter);

        assert_eq!(skipped, 1);
        assert_eq!(shapes[ExpressionChannel::CheekPuffLeft], before);
    }
}
