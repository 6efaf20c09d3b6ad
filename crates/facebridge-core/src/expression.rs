//! Raw action weights and normalized expression channels
//!
//! Raw weights are positional on the wire: their index order is fixed by the
//! producer's face-tracking enumeration and must never be reordered.
//! Normalized channels form a closed set; [`ChannelMap`] holds exactly one
//! slot per channel so an unmapped channel cannot silently read as zero
//! from some oversized table.

use std::fmt;
use std::ops::{Index, IndexMut};

/// Number of raw action weights in a snapshot
pub const RAW_EXPRESSION_COUNT: usize = 70;

/// Raw facial action weights, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RawExpression {
    BrowLowererL = 0,
    BrowLowererR,
    CheekPuffL,
    CheekPuffR,
    CheekRaiserL,
    CheekRaiserR,
    CheekSuckL,
    CheekSuckR,
    ChinRaiserB,
    ChinRaiserT,
    DimplerL,
    DimplerR,
    EyesClosedL,
    EyesClosedR,
    EyesLookDownL,
    EyesLookDownR,
    EyesLookLeftL,
    EyesLookLeftR,
    EyesLookRightL,
    EyesLookRightR,
    EyesLookUpL,
    EyesLookUpR,
    InnerBrowRaiserL,
    InnerBrowRaiserR,
    JawDrop,
    JawSidewaysLeft,
    JawSidewaysRight,
    JawThrust,
    LidTightenerL,
    LidTightenerR,
    LipCornerDepressorL,
    LipCornerDepressorR,
    LipCornerPullerL,
    LipCornerPullerR,
    LipFunnelerLb,
    LipFunnelerLt,
    LipFunnelerRb,
    LipFunnelerRt,
    LipPressorL,
    LipPressorR,
    LipPuckerL,
    LipPuckerR,
    LipStretcherL,
    LipStretcherR,
    LipSuckLb,
    LipSuckLt,
    LipSuckRb,
    LipSuckRt,
    LipTightenerL,
    LipTightenerR,
    LipsToward,
    LowerLipDepressorL,
    LowerLipDepressorR,
    MouthLeft,
    MouthRight,
    NoseWrinklerL,
    NoseWrinklerR,
    OuterBrowRaiserL,
    OuterBrowRaiserR,
    UpperLidRaiserL,
    UpperLidRaiserR,
    UpperLipRaiserL,
    UpperLipRaiserR,
    TongueTipInterdental,
    TongueTipAlveolar,
    TongueFrontDorsalPalate,
    TongueMidDorsalPalate,
    TongueBackDorsalVelar,
    TongueOut,
    TongueRetreat,
}

impl RawExpression {
    /// Position in the wire weight array
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Fixed-size raw weight array with typed access
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawWeights(pub [f32; RAW_EXPRESSION_COUNT]);

impl Default for RawWeights {
    fn default() -> Self {
        RawWeights([0.0; RAW_EXPRESSION_COUNT])
    }
}

impl RawWeights {
    #[inline]
    pub fn get(&self, expression: RawExpression) -> f32 {
        self.0[expression.index()]
    }

    #[inline]
    pub fn set(&mut self, expression: RawExpression, value: f32) {
        self.0[expression.index()] = value;
    }

    pub fn with(mut self, expression: RawExpression, value: f32) -> Self {
        self.set(expression, value);
        self
    }
}

impl Index<RawExpression> for RawWeights {
    type Output = f32;

    fn index(&self, expression: RawExpression) -> &f32 {
        &self.0[expression.index()]
    }
}

macro_rules! expression_channels {
    ($($name:ident),+ $(,)?) => {
        /// Normalized expression channels written for the avatar
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum ExpressionChannel {
            $($name),+
        }

        impl ExpressionChannel {
            /// Every channel, in slot order
            pub const ALL: &'static [ExpressionChannel] = &[$(ExpressionChannel::$name),+];

            /// Channel name as the consumer knows it
            pub fn name(self) -> &'static str {
                match self {
                    $(ExpressionChannel::$name => stringify!($name)),+
                }
            }
        }
    };
}

expression_channels! {
    // Eye
    EyeWideLeft,
    EyeWideRight,
    EyeSquintLeft,
    EyeSquintRight,

    // Brow
    BrowInnerUpLeft,
    BrowInnerUpRight,
    BrowOuterUpLeft,
    BrowOuterUpRight,
    BrowPinchLeft,
    BrowPinchRight,
    BrowLowererLeft,
    BrowLowererRight,

    // Jaw
    JawOpen,
    JawLeft,
    JawRight,
    JawForward,

    // Mouth
    MouthClosed,
    MouthUpperLeft,
    MouthLowerLeft,
    MouthUpperRight,
    MouthLowerRight,
    MouthCornerPullLeft,
    MouthCornerSlantLeft,
    MouthCornerPullRight,
    MouthCornerSlantRight,
    MouthFrownLeft,
    MouthFrownRight,
    MouthLowerDownLeft,
    MouthLowerDownRight,
    MouthUpperUpLeft,
    MouthUpperDeepenLeft,
    MouthUpperUpRight,
    MouthUpperDeepenRight,
    MouthRaiserUpper,
    MouthRaiserLower,
    MouthDimpleLeft,
    MouthDimpleRight,
    MouthTightenerLeft,
    MouthTightenerRight,
    MouthPressLeft,
    MouthPressRight,
    MouthStretchLeft,
    MouthStretchRight,

    // Lip
    LipPuckerUpperRight,
    LipPuckerLowerRight,
    LipPuckerUpperLeft,
    LipPuckerLowerLeft,
    LipFunnelUpperLeft,
    LipFunnelUpperRight,
    LipFunnelLowerLeft,
    LipFunnelLowerRight,
    LipSuckUpperLeft,
    LipSuckUpperRight,
    LipSuckLowerLeft,
    LipSuckLowerRight,

    // Cheek
    CheekPuffLeft,
    CheekPuffRight,
    CheekSuckLeft,
    CheekSuckRight,
    CheekSquintLeft,
    CheekSquintRight,

    // Nose
    NoseSneerLeft,
    NoseSneerRight,

    // Tongue
    TongueOut,
    TongueCurlUp,
}

/// Number of normalized expression channels
pub const EXPRESSION_CHANNEL_COUNT: usize = ExpressionChannel::ALL.len();

impl ExpressionChannel {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Eye and brow channels are copied straight through; everything else
    /// goes through the temporal filter
    pub fn is_smoothed(self) -> bool {
        self.index() >= ExpressionChannel::JawOpen.index()
    }
}

impl fmt::Display for ExpressionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per expression channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMap<T> {
    slots: [T; EXPRESSION_CHANNEL_COUNT],
}

impl<T: Copy + Default> Default for ChannelMap<T> {
    fn default() -> Self {
        Self {
            slots: [T::default(); EXPRESSION_CHANNEL_COUNT],
        }
    }
}

impl<T: Copy + Default> ChannelMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every slot to its default
    pub fn clear(&mut self) {
        self.slots = [T::default(); EXPRESSION_CHANNEL_COUNT];
    }
}

impl<T> ChannelMap<T> {
    #[inline]
    pub fn get(&self, channel: ExpressionChannel) -> &T {
        &self.slots[channel.index()]
    }

    #[inline]
    pub fn set(&mut self, channel: ExpressionChannel, value: T) {
        self.slots[channel.index()] = value;
    }

    /// Iterate `(channel, value)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (ExpressionChannel, &T)> {
        ExpressionChannel::ALL.iter().copied().zip(self.slots.iter())
    }
}

impl<T> Index<ExpressionChannel> for ChannelMap<T> {
    type Output = T;

    fn index(&self, channel: ExpressionChannel) -> &T {
        &self.slots[channel.index()]
    }
}

impl<T> IndexMut<ExpressionChannel> for ChannelMap<T> {
    fn index_mut(&mut self, channel: ExpressionChannel) -> &mut T {
        &mut self.slots[channel.index()]
    }
}
