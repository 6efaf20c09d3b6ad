//! Tracking module - attach / tick / detach lifecycle
//!
//! Each tick runs in order:
//! 1. Skip if the host has not activated the module
//! 2. Wait (bounded) for the producer's update signal
//! 3. Read and decode the snapshot
//! 4. Map every enabled, valid branch into the output
//! 5. Update tracking availability
//!
//! The attached resources sit behind one lock: detach takes it exclusively
//! and drops them, so no tick can observe a released region. Mapping state
//! sits behind a second lock, which serializes concurrent ticks.

use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, trace};

use facebridge_core::{FaceBridgeError, FaceBridgeResult, TrackingOutput};
use facebridge_mapping::{Capabilities, FaceMapper, MapReport};

use crate::{
    AvailabilityTracker, ModuleConfig, ModuleStatus, SnapshotAccessor, TrackingStatus, Transport,
};

/// Name reported to the host
pub const MODULE_NAME: &str = "Virtual Desktop";

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Host has not activated the module
    Idle,
    /// Nothing attached
    Detached,
    /// No new snapshot within the wait timeout
    Stale,
    /// A new snapshot was mapped
    Updated(MapReport),
}

#[derive(Clone, Debug, Default)]
pub struct TickStats {
    pub ticks: u64,
    pub updates: u64,
    pub stale: u64,
    pub idle: u64,
    pub detached: u64,
    /// Updates whose snapshot could not be read
    pub unreadable: u64,
    /// Eye updates that kept the previous openness
    pub skipped_openness: u64,
    /// Eye updates that kept the previous gaze
    pub skipped_gaze: u64,
    /// Expression channels held back for non-finite input
    pub skipped_channels: u64,
    pub last_tick_duration: Duration,
}

struct TickState {
    mapper: FaceMapper,
    capabilities: Capabilities,
    availability: AvailabilityTracker,
    stats: TickStats,
}

/// Face tracking module driven by an external host loop
pub struct TrackingModule {
    config: ModuleConfig,
    status: RwLock<ModuleStatus>,
    attachment: RwLock<Option<SnapshotAccessor>>,
    state: Mutex<TickState>,
}

impl TrackingModule {
    /// Create a module with default configuration
    pub fn new() -> Self {
        Self::with_config(ModuleConfig::default())
    }

    /// Create a module with custom configuration
    pub fn with_config(config: ModuleConfig) -> Self {
        TrackingModule {
            config,
            status: RwLock::new(ModuleStatus::Uninitialized),
            attachment: RwLock::new(None),
            state: Mutex::new(TickState {
                mapper: FaceMapper::new(),
                capabilities: Capabilities::NONE,
                availability: AvailabilityTracker::new(),
                stats: TickStats::default(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        MODULE_NAME
    }

    /// Eye and expression support
    pub fn supported(&self) -> (bool, bool) {
        (true, true)
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Open the producer's region and signal and start mapping
    ///
    /// Returns the granted `(eye, expression)` capabilities. Failure means
    /// the feature is unsupported; it is not retried.
    pub fn attach(
        &self,
        transport: &dyn Transport,
        eye_available: bool,
        expression_available: bool,
    ) -> FaceBridgeResult<(bool, bool)> {
        let mut attachment = self.attachment.write();
        if attachment.is_some() {
            return Err(FaceBridgeError::AlreadyAttached);
        }

        let accessor = transport
            .open(&self.config.region_name, &self.config.signal_name)
            .and_then(SnapshotAccessor::attach)
            .map_err(|e| {
                error!(
                    region = %self.config.region_name,
                    error = %e,
                    "Failed to open the shared face state. Make sure the streamer is running"
                );
                e
            })?;

        info!(
            module = MODULE_NAME,
            region_len = accessor.region_len(),
            eye = eye_available,
            expression = expression_available,
            "attached to shared face state"
        );

        *attachment = Some(accessor);

        {
            let mut state = self.state.lock();
            state.capabilities = Capabilities {
                eye: eye_available,
                expression: expression_available,
            };
            state.mapper.reset();
            state.availability.reset();
        }

        *self.status.write() = ModuleStatus::Active;

        Ok((eye_available, expression_available))
    }

    /// Release the region and signal; returns false if nothing was attached
    pub fn detach(&self) -> bool {
        let released = self.attachment.write().take();
        let was_attached = released.is_some();
        drop(released);

        {
            let mut state = self.state.lock();
            state.capabilities = Capabilities::NONE;
            state.mapper.reset();
            state.availability.reset();
        }

        *self.status.write() = ModuleStatus::Uninitialized;

        if was_attached {
            info!(module = MODULE_NAME, "detached from shared face state");
        }
        was_attached
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.read().is_some()
    }

    pub fn status(&self) -> ModuleStatus {
        *self.status.read()
    }

    /// Host-side activation switch
    pub fn set_status(&self, status: ModuleStatus) {
        *self.status.write() = status;
    }

    pub fn tracking_status(&self) -> TrackingStatus {
        self.state.lock().availability.status()
    }

    pub fn stats(&self) -> TickStats {
        self.state.lock().stats.clone()
    }

    /// Run one update tick against `output`
    ///
    /// Never fails: stale or unreadable data leaves `output` as it was.
    pub fn tick(&self, output: &mut TrackingOutput) -> TickOutcome {
        let start = Instant::now();

        if self.status() != ModuleStatus::Active {
            if !self.config.idle_sleep.is_zero() {
                thread::sleep(self.config.idle_sleep);
            }
            return self.finish(start, TickOutcome::Idle);
        }

        let attachment = self.attachment.read();
        let Some(accessor) = attachment.as_ref() else {
            return self.finish(start, TickOutcome::Detached);
        };

        if !accessor.wait_for_update(self.config.wait_timeout) {
            let tracking = accessor
                .read_snapshot()
                .is_some_and(|snapshot| !snapshot.flags.is_empty());
            trace!(tracking, "no new snapshot within timeout");

            self.state.lock().availability.update(tracking);
            return self.finish(start, TickOutcome::Stale);
        }

        let snapshot = accessor.read_snapshot();
        let mut state = self.state.lock();

        let report = match snapshot {
            Some(snapshot) => {
                let capabilities = state.capabilities;
                state.mapper.map(&snapshot, capabilities, output)
            }
            None => {
                debug!("signalled but snapshot unreadable");
                state.stats.unreadable += 1;
                MapReport::default()
            }
        };

        if report.eye && !report.openness_written {
            debug!("eye closure not finite, openness kept from previous tick");
            state.stats.skipped_openness += 1;
        }
        if report.eye && !report.gaze_written {
            debug!("eye orientation degenerate, gaze kept from previous tick");
            state.stats.skipped_gaze += 1;
        }
        state.stats.skipped_channels += report.skipped_channels as u64;
        state.availability.update(report.is_tracking());
        drop(state);

        self.finish(start, TickOutcome::Updated(report))
    }

    fn finish(&self, start: Instant, outcome: TickOutcome) -> TickOutcome {
        let mut state = self.state.lock();
        let stats = &mut state.stats;

        stats.ticks += 1;
        match outcome {
            TickOutcome::Idle => stats.idle += 1,
            TickOutcome::Detached => stats.detached += 1,
            TickOutcome::Stale => stats.stale += 1,
            TickOutcome::Updated(_) => stats.updates += 1,
        }
        stats.last_tick_duration = start.elapsed();

        outcome
    }
}

impl Default for TrackingModule {
    fn default() -> Self {
        Self::new()
    }
}
