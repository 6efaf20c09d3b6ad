//! Snapshot accessor - validated, copy-out reads of the shared region
//!
//! The region size is checked once at attach. Each read copies the whole
//! snapshot out of the region and decodes it, so nothing handed to callers
//! points back into memory the producer may rewrite or unmap.

use std::time::Duration;

use tracing::trace;

use facebridge_core::FaceBridgeResult;
use facebridge_wire::{validate_region_len, RawSnapshot, SNAPSHOT_SIZE};

use crate::TransportHandles;

/// Attached region and signal
pub struct SnapshotAccessor {
    handles: TransportHandles,
}

impl SnapshotAccessor {
    /// Take ownership of opened handles, rejecting regions too small for a
    /// snapshot
    pub fn attach(handles: TransportHandles) -> FaceBridgeResult<Self> {
        validate_region_len(handles.region.len())?;
        Ok(Self { handles })
    }

    /// Bounded wait for the producer's signal
    pub fn wait_for_update(&self, timeout: Duration) -> bool {
        self.handles.signal.wait(timeout)
    }

    /// Current snapshot, or `None` if the region cannot be read
    pub fn read_snapshot(&self) -> Option<RawSnapshot> {
        let mut buf = [0u8; SNAPSHOT_SIZE];

        if let Err(e) = self.handles.region.read(&mut buf) {
            trace!(error = %e, "snapshot read failed");
            return None;
        }

        match RawSnapshot::parse(&buf) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                trace!(error = %e, "snapshot decode failed");
                None
            }
        }
    }

    pub fn region_len(&self) -> usize {
        self.handles.region.len()
    }
}

impl std::fmt::Debug for SnapshotAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotAccessor")
            .field("region_len", &self.region_len())
            .finish()
    }
}
