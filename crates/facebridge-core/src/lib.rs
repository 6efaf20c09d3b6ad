//! FaceBridge Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every stage of the pipeline:
//! - Errors (attach failures, layout violations)
//! - Orientation math (quaternions, gaze angles)
//! - Raw action weights and normalized expression channels
//! - The normalized output model written for the avatar consumer

pub mod error;
pub mod expression;
pub mod output;
pub mod quat;

pub use error::*;
pub use expression::*;
pub use output::*;
pub use quat::*;
