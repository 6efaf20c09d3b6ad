//! Transport seams - the shared region and its update signal
//!
//! The host owns how the region and signal are found and opened. The
//! runtime only needs a region it can copy bytes out of and a signal it can
//! wait on with a timeout. The loopback implementation keeps both in
//! process, for embedding the producer or driving the module from tests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, RwLock};

use facebridge_core::{FaceBridgeError, FaceBridgeResult};
use facebridge_wire::{RawSnapshot, SNAPSHOT_SIZE};

/// Read-only view over the producer's shared region
pub trait SharedRegion: Send + Sync {
    /// Mapped size in bytes
    fn len(&self) -> usize;

    /// Copy `dst.len()` bytes from the start of the region
    fn read(&self, dst: &mut [u8]) -> FaceBridgeResult<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// "New snapshot written" signal
pub trait UpdateSignal: Send + Sync {
    /// Wait up to `timeout`; true when the producer signalled.
    /// A timeout is not an error.
    fn wait(&self, timeout: Duration) -> bool;
}

/// Opened region and signal, released together on drop
pub struct TransportHandles {
    pub region: Box<dyn SharedRegion>,
    pub signal: Box<dyn UpdateSignal>,
}

/// Opens the producer's region and signal by name
pub trait Transport {
    fn open(&self, region_name: &str, signal_name: &str) -> FaceBridgeResult<TransportHandles>;
}

/// In-process shared region
#[derive(Clone, Debug)]
pub struct MemoryRegion {
    inner: Arc<RegionInner>,
}

#[derive(Debug)]
struct RegionInner {
    bytes: RwLock<Vec<u8>>,
    closed: RwLock<bool>,
}

impl MemoryRegion {
    /// Region sized for exactly one snapshot
    pub fn new() -> Self {
        Self::with_len(SNAPSHOT_SIZE)
    }

    pub fn with_len(len: usize) -> Self {
        Self {
            inner: Arc::new(RegionInner {
                bytes: RwLock::new(vec![0u8; len]),
                closed: RwLock::new(false),
            }),
        }
    }

    /// Overwrite the start of the region with a snapshot
    pub fn write_snapshot(&self, snapshot: &RawSnapshot) -> FaceBridgeResult<()> {
        let mut bytes = self.inner.bytes.write();
        snapshot.serialize(&mut bytes)
    }

    /// Simulate the producer going away; later reads fail
    pub fn close(&self) {
        *self.inner.closed.write() = true;
    }

    pub fn is_closed(&self) -> bool {
        *self.inner.closed.read()
    }
}

impl Default for MemoryRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedRegion for MemoryRegion {
    fn len(&self) -> usize {
        self.inner.bytes.read().len()
    }

    fn read(&self, dst: &mut [u8]) -> FaceBridgeResult<()> {
        if self.is_closed() {
            return Err(FaceBridgeError::RegionUnavailable("region closed".into()));
        }

        let bytes = self.inner.bytes.read();
        if bytes.len() < dst.len() {
            return Err(FaceBridgeError::BufferTooShort {
                expected: dst.len(),
                actual: bytes.len(),
            });
        }

        dst.copy_from_slice(&bytes[..dst.len()]);
        Ok(())
    }
}

/// In-process auto-reset event
///
/// `notify` sets the event; a successful `wait` consumes it.
#[derive(Clone, Debug, Default)]
pub struct MemorySignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl MemorySignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock() = true;
        cvar.notify_one();
    }

    pub fn is_set(&self) -> bool {
        *self.inner.0.lock()
    }
}

impl UpdateSignal for MemorySignal {
    fn wait(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut signalled = lock.lock();

        while !*signalled {
            if cvar.wait_until(&mut signalled, deadline).timed_out() {
                break;
            }
        }

        std::mem::replace(&mut *signalled, false)
    }
}

/// Loopback transport serving one named region and signal
#[derive(Clone, Debug)]
pub struct LoopbackTransport {
    region_name: String,
    signal_name: String,
    region: MemoryRegion,
    signal: MemorySignal,
}

impl LoopbackTransport {
    pub fn new(region_name: impl Into<String>, signal_name: impl Into<String>) -> Self {
        Self::with_region(region_name, signal_name, MemoryRegion::new())
    }

    pub fn with_region(
        region_name: impl Into<String>,
        signal_name: impl Into<String>,
        region: MemoryRegion,
    ) -> Self {
        Self {
            region_name: region_name.into(),
            signal_name: signal_name.into(),
            region,
            signal: MemorySignal::new(),
        }
    }

    /// Producer side writing into this transport
    pub fn producer(&self) -> LoopbackProducer {
        LoopbackProducer {
            region: self.region.clone(),
            signal: self.signal.clone(),
        }
    }
}

impl Transport for LoopbackTransport {
    fn open(&self, region_name: &str, signal_name: &str) -> FaceBridgeResult<TransportHandles> {
        if region_name != self.region_name || self.region.is_closed() {
            return Err(FaceBridgeError::RegionUnavailable(region_name.to_string()));
        }
        if signal_name != self.signal_name {
            return Err(FaceBridgeError::SignalUnavailable(signal_name.to_string()));
        }

        Ok(TransportHandles {
            region: Box::new(self.region.clone()),
            signal: Box::new(self.signal.clone()),
        })
    }
}

/// Writes snapshots into a loopback region and signals them
#[derive(Clone, Debug)]
pub struct LoopbackProducer {
    region: MemoryRegion,
    signal: MemorySignal,
}

impl LoopbackProducer {
    /// Write a snapshot and signal it
    pub fn publish(&self, snapshot: &RawSnapshot) -> FaceBridgeResult<()> {
        self.region.write_snapshot(snapshot)?;
        self.signal.notify();
        Ok(())
    }

    /// Write a snapshot without signalling
    pub fn write_silently(&self, snapshot: &RawSnapshot) -> FaceBridgeResult<()> {
        self.region.write_snapshot(snapshot)
    }

    /// Producer process exits
    pub fn shutdown(&self) {
        self.region.close();
    }

    pub fn signal(&self) -> &MemorySignal {
        &self.signal
    }
}
