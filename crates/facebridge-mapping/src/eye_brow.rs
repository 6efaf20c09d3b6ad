//! Eye and brow expressions
//!
//! Straight copies from raw weights, no smoothing. Brow pinch and brow
//! lowerer are not sensed separately and both follow the brow lowerer.

use facebridge_core::{ChannelMap, ExpressionChannel, RawExpression, RawWeights};

/// Output channel and the raw weight it copies
pub const EYE_BROW_MAP: [(ExpressionChannel, RawExpression); 12] = [
    (ExpressionChannel::EyeWideLeft, RawExpression::UpperLidRaiserL),
    (ExpressionChannel::EyeWideRight, RawExpression::UpperLidRaiserR),
    (ExpressionChannel::EyeSquintLeft, RawExpression::LidTightenerL),
    (ExpressionChannel::EyeSquintRight, RawExpression::LidTightenerR),
    (ExpressionChannel::BrowInnerUpLeft, RawExpression::InnerBrowRaiserL),
    (ExpressionChannel::BrowInnerUpRight, RawExpression::InnerBrowRaiserR),
    (ExpressionChannel::BrowOuterUpLeft, RawExpression::OuterBrowRaiserL),
    (ExpressionChannel::BrowOuterUpRight, RawExpression::OuterBrowRaiserR),
    (ExpressionChannel::BrowPinchLeft, RawExpression::BrowLowererL),
    (ExpressionChannel::BrowLowererLeft, RawExpression::BrowLowererL),
    (ExpressionChannel::BrowPinchRight, RawExpression::BrowLowererR),
    (ExpressionChannel::BrowLowererRight, RawExpression::BrowLowererR),
];

/// Copy eye and brow weights into the output channels
///
/// Returns how many channels were skipped because their raw weight was not
/// finite; those keep their previous output.
pub fn update_eye_expressions(shapes: &mut ChannelMap<f32>, weights: &RawWeights) -> usize {
    let mut skipped = 0;

    for (channel, raw) in EYE_BROW_MAP {
        let value = weights[raw];
        if value.is_finite() {
            shapes[channel] = value;
        } else {
            skipped += 1;
        }
    }

    skipped
}
