//! FaceBridge Mapping - Raw action weights to normalized expressions
//!
//! The conversion pipeline, one stage per module:
//! - Gaze & eye openness from two eye orientations
//! - Eye and brow channels, copied straight through
//! - Jaw, mouth, lip, cheek, nose and tongue channels, derived and smoothed
//! - Temporal smoothing filter holding per-channel history
//!
//! [`FaceMapper`] ties the stages together behind the validity gates.

pub mod eye_brow;
pub mod gaze;
pub mod mapper;
pub mod mouth;
pub mod smoothing;

pub use eye_brow::*;
pub use gaze::*;
pub use mapper::*;
pub use mouth::*;
pub use smoothing::*;
