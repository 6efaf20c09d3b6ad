//! Module configuration

use std::time::Duration;

/// Default name of the producer's shared region
pub const DEFAULT_REGION_NAME: &str = "VirtualDesktop.BodyState";

/// Default name of the producer's update signal
pub const DEFAULT_SIGNAL_NAME: &str = "VirtualDesktop.BodyStateEvent";

/// Tracking module configuration
#[derive(Clone, Debug)]
pub struct ModuleConfig {
    /// Bounded wait for a new snapshot each tick
    pub wait_timeout: Duration,
    /// Sleep per tick while the host keeps the module idle
    pub idle_sleep: Duration,
    /// Shared region name passed to the transport
    pub region_name: String,
    /// Update signal name passed to the transport
    pub signal_name: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        ModuleConfig {
            wait_timeout: Duration::from_millis(50),
            idle_sleep: Duration::from_millis(10),
            region_name: DEFAULT_REGION_NAME.to_string(),
            signal_name: DEFAULT_SIGNAL_NAME.to_string(),
        }
    }
}

impl ModuleConfig {
    /// Configuration for test harnesses and offline replay: no idle sleep
    /// and a short wait so stale ticks return quickly
    pub fn headless() -> Self {
        ModuleConfig {
            wait_timeout: Duration::from_millis(2),
            idle_sleep: Duration::ZERO,
            ..Default::default()
        }
    }

    pub fn with_names(mut self, region_name: impl Into<String>, signal_name: impl Into<String>) -> Self {
        self.region_name = region_name.into();
        self.signal_name = signal_name.into();
        self
    }
}
