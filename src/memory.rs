// Global allocator setup and optional heap accounting.
//
// mimalloc is the allocator when the feature is on. With memory_tracking a
// thin counting wrapper sits in front of it and records current and peak
// bytes; without it the counters read as zero.

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static CURRENT: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK: AtomicUsize = AtomicUsize::new(0);

    #[cfg(feature = "mimalloc")]
    static BACKEND: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static BACKEND: std::alloc::System = std::alloc::System;

    pub struct CountingAllocator;

    unsafe impl GlobalAlloc for CountingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = BACKEND.alloc(layout);
            if !ptr.is_null() {
                let now = CURRENT.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                PEAK.fetch_max(now, Ordering::Relaxed);
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            CURRENT.fetch_sub(layout.size(), Ordering::Relaxed);
            BACKEND.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::CountingAllocator = tracking::CountingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Heap bytes currently allocated through the global allocator.
#[cfg(feature = "memory_tracking")]
pub fn current() -> usize {
    tracking::CURRENT.load(std::sync::atomic::Ordering::SeqCst)
}

/// Highest `current()` seen since start or the last `reset_peak`.
#[cfg(feature = "memory_tracking")]
pub fn peak() -> usize {
    tracking::PEAK.load(std::sync::atomic::Ordering::SeqCst)
}

/// Restart peak tracking from the current usage; returns `(current, old_peak)`.
#[cfg(feature = "memory_tracking")]
pub fn reset_peak() -> (usize, usize) {
    let now = current();
    let old_peak = tracking::PEAK.swap(now, std::sync::atomic::Ordering::SeqCst);
    (now, old_peak)
}

#[cfg(not(feature = "memory_tracking"))]
pub fn current() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
pub fn peak() -> usize {
    0
}

#[cfg(not(feature = "memory_tracking"))]
pub fn reset_peak() -> (usize, usize) {
    (0, 0)
}

#[cfg(all(test, feature = "memory_tracking"))]
mod tests {
    use super::*;

    #[test]
    fn test_peak_never_below_current() {
        let block = vec![0u8; 1 << 20];
        assert!(peak() >= block.len());
        drop(block);
        let (now, old_peak) = reset_peak();
        assert!(old_peak >= now);
    }
}
