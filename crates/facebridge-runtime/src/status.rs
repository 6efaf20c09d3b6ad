//! Module and tracking status

use tracing::{info, warn};

/// Host-controlled module state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleStatus {
    /// Not attached yet, or torn down
    #[default]
    Uninitialized,
    /// Ticks read and map snapshots
    Active,
    /// Attached but paused by the host
    Idle,
}

/// Whether the user is currently being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingStatus {
    /// No tick has decided yet
    #[default]
    Unknown,
    Inactive,
    Active,
}

impl TrackingStatus {
    pub fn from_tracking(tracking: bool) -> Self {
        if tracking {
            TrackingStatus::Active
        } else {
            TrackingStatus::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        self == TrackingStatus::Active
    }
}

/// Tracks availability across ticks and reports each transition once
#[derive(Debug, Clone, Default)]
pub struct AvailabilityTracker {
    status: TrackingStatus,
    transitions: u64,
}

impl AvailabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    /// Number of status changes since the last reset
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Record this tick's availability; returns the new status if it changed
    pub fn update(&mut self, tracking: bool) -> Option<TrackingStatus> {
        let next = TrackingStatus::from_tracking(tracking);
        if next == self.status {
            return None;
        }

        self.status = next;
        self.transitions += 1;

        match next {
            TrackingStatus::Active => info!("Tracking is now active"),
            _ => warn!(
                "Tracking is not active. Make sure the streamer is connected, a VR application \
                 is running and tracking data forwarding is enabled"
            ),
        }

        Some(next)
    }

    /// Back to `Unknown`, without reporting
    pub fn reset(&mut self) {
        self.status = TrackingStatus::Unknown;
        self.transitions = 0;
    }
}
