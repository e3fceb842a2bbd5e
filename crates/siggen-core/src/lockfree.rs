//! Lock-free primitives shared between the owner thread and the engine thread.

use atomic_float::AtomicF64;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Cache-line aligned atomic f64.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicDouble {
    value: AtomicF64,
}

impl AtomicDouble {
    pub fn new(value: f64) -> Self {
        Self {
            value: AtomicF64::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Acquire)
    }

    /// Read without ordering guarantees. Used on the per-sample path.
    #[inline]
    pub fn get_relaxed(&self) -> f64 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Release);
    }

}

impl Default for AtomicDouble {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic bool.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn get_relaxed(&self) -> bool {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    /// Flip the flag, returning the new value.
    #[inline]
    pub fn toggle(&self) -> bool {
        !self.value.fetch_xor(true, Ordering::AcqRel)
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Atomic cell for a `u8`-encoded enum.
#[derive(Debug, Default)]
pub(crate) struct AtomicTag {
    value: AtomicU8,
}

impl AtomicTag {
    pub(crate) fn new(value: u8) -> Self {
        Self {
            value: AtomicU8::new(value),
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> u8 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn get_relaxed(&self) -> u8 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set(&self, value: u8) {
        self.value.store(value, Ordering::Release);
    }
}
