//! Live-resource accounting for strategy-owned surfaces
//!
//! Every pixel buffer or accelerated surface a strategy allocates is paired
//! with a lease from the ledger. Dropping the resource drops the lease, so
//! the ledger always reflects what is actually alive.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    PixelBuffer,
    AcceleratedSurface,
}

/// Snapshot of live resource counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveResources {
    pub pixel_buffers: usize,
    pub accelerated_surfaces: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceLedger {
    pixel_buffers: Arc<AtomicUsize>,
    accelerated_surfaces: Arc<AtomicUsize>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, kind: ResourceKind) -> &Arc<AtomicUsize> {
        match kind {
            ResourceKind::PixelBuffer => &self.pixel_buffers,
            ResourceKind::AcceleratedSurface => &self.accelerated_surfaces,
        }
    }

    /// Register a newly allocated resource
    pub fn acquire(&self, kind: ResourceKind) -> ResourceLease {
        let counter = Arc::clone(self.counter(kind));
        counter.fetch_add(1, Ordering::Relaxed);
        ResourceLease { counter, kind }
    }

    pub fn live(&self, kind: ResourceKind) -> usize {
        self.counter(kind).load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> LiveResources {
        LiveResources {
            pixel_buffers: self.live(ResourceKind::PixelBuffer),
            accelerated_surfaces: self.live(ResourceKind::AcceleratedSurface),
        }
    }
}

/// Proof of one live resource; releases its count on drop
#[derive(Debug)]
pub struct ResourceLease {
    counter: Arc<AtomicUsize>,
    kind: ResourceKind,
}

impl ResourceLease {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl Drop for ResourceLease {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_counts_follow_drop() {
        let ledger = ResourceLedger::new();
        let first = ledger.acquire(ResourceKind::PixelBuffer);
        let second = ledger.acquire(ResourceKind::PixelBuffer);
        let surface = ledger.acquire(ResourceKind::AcceleratedSurface);
        assert_eq!(
            ledger.snapshot(),
            LiveResources {
                pixel_buffers: 2,
                accelerated_surfaces: 1
            }
        );

        drop(first);
        assert_eq!(ledger.live(ResourceKind::PixelBuffer), 1);
        assert_eq!(second.kind(), ResourceKind::PixelBuffer);
        drop((second, surface));
        assert_eq!(ledger.snapshot(), LiveResources::default());
    }
}
