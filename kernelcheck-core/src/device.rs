//! Device Abstraction
//!
//! Kernels queue work asynchronously on a device. The harness only observes
//! that work through two capabilities:
//! - `synchronize()`: block the host until all queued work has completed
//! - timing events recorded on the device's own timeline
//!
//! Runners take a `&D where D: Device` so they can be driven by a scripted
//! device in tests.

use std::time::Instant;

/// Errors reported by a device
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceError {
    #[error("device synchronization failed: {0}")]
    Synchronize(String),
    #[error("timing event failed: {0}")]
    Event(String),
}

/// A compute device with a synchronization barrier and native timing events
pub trait Device {
    /// Marker recorded on the device timeline
    type Event;

    /// Human-readable device name
    fn name(&self) -> &str;

    /// Block until every previously queued operation has completed
    fn synchronize(&self) -> Result<(), DeviceError>;

    /// Record a timing marker after all previously queued work
    fn record_event(&self) -> Result<Self::Event, DeviceError>;

    /// Milliseconds elapsed between two recorded markers.
    ///
    /// Only valid once both markers have completed, i.e. after a
    /// `synchronize()` that follows `end`.
    fn elapsed_ms(&self, start: &Self::Event, end: &Self::Event) -> Result<f64, DeviceError>;
}

/// Timing marker on the host timeline
#[derive(Debug, Clone, Copy)]
pub struct HostEvent {
    instant: Instant,
}

impl HostEvent {
    /// Capture the current instant
    #[inline(always)]
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
        }
    }
}

/// Device that executes kernels synchronously on the calling thread.
///
/// Every invocation has completed by the time it returns, so the barrier is
/// a no-op and host instants are the device timeline.
#[derive(Debug, Clone)]
pub struct HostDevice {
    name: String,
}

impl HostDevice {
    pub fn new() -> Self {
        let name = format!("host ({})", std::env::consts::ARCH);
        Self { name }
    }
}

impl Default for HostDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for HostDevice {
    type Event = HostEvent;

    fn name(&self) -> &str {
        &self.name
    }

    fn synchronize(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    #[inline(always)]
    fn record_event(&self) -> Result<HostEvent, DeviceError> {
        Ok(HostEvent::now())
    }

    fn elapsed_ms(&self, start: &HostEvent, end: &HostEvent) -> Result<f64, DeviceError> {
        let elapsed = end
            .instant
            .checked_duration_since(start.instant)
            .ok_or_else(|| DeviceError::Event("end event precedes start event".to_string()))?;
        Ok(elapsed.as_secs_f64() * 1000.0)
    }
}
