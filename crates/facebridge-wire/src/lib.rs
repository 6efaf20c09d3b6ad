//! FaceBridge Wire - Raw snapshot ABI
//!
//! This crate implements the fixed binary layout the producer writes into
//! the shared region:
//! - Two eye orientations
//! - Four validity bytes
//! - The positional action weight array

pub mod flags;
pub mod snapshot;

pub use flags::*;
pub use snapshot::*;
