//! FaceBridge Runtime - Tracking module driven by a host loop
//!
//! Each tick of [`TrackingModule`]:
//! 1. Skips while the host keeps the module idle
//! 2. Waits, bounded, for the producer's update signal
//! 3. Copies the snapshot out of the shared region
//! 4. Maps eye, eye/brow and mouth branches into the output
//! 5. Updates tracking availability
//!
//! The shared region and signal sit behind [`Transport`] so the module can
//! run against an in-process loopback.

pub mod accessor;
pub mod config;
pub mod logging;
pub mod module;
pub mod status;
pub mod transport;

pub use accessor::*;
pub use config::*;
pub use logging::*;
pub use module::*;
pub use status::*;
pub use transport::*;
