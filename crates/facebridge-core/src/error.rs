//! Error types for FaceBridge

use thiserror::Error;

/// Core FaceBridge errors
///
/// Only attachment can fail fatally. Everything that happens inside a tick
/// degrades to "leave output unchanged" instead of surfacing here.
#[derive(Error, Debug)]
pub enum FaceBridgeError {
    // Layout errors
    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    // Attachment errors
    #[error("Shared region unavailable: {0}")]
    RegionUnavailable(String),

    #[error("Update signal unavailable: {0}")]
    SignalUnavailable(String),

    #[error("Module already attached")]
    AlreadyAttached,
}

impl FaceBridgeError {
    /// Whether the host should report the feature as unsupported
    pub fn is_attach_failure(&self) -> bool {
        matches!(
            self,
            FaceBridgeError::RegionUnavailable(_)
                | FaceBridgeError::SignalUnavailable(_)
                | FaceBridgeError::BufferTooShort { .. }
        )
    }
}

/// Result type for FaceBridge operations
pub type FaceBridgeResult<T> = Result<T, FaceBridgeError>;
