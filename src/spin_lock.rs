//! Non-reentrant spin lock.
//!
//! [`SpinLock`] is a raw test-and-test-and-set lock: an acquire attempt is a single
//! sequentially consistent exchange on the lock word, and a failed attempt polls the
//! word with acquire loads (and a CPU pause hint) until it reads free before trying
//! again. Release is a plain store with release ordering.
//!
//! The lock carries no data. Pair it with `lock_api` through [`SpinMutex`] when the
//! protected value should only be reachable through a guard:
//!
//! ```rust
//! use keyed_factory::SpinMutex;
//!
//! let counter = SpinMutex::new(0u32);
//! *counter.lock() += 1;
//! assert_eq!(*counter.lock(), 1);
//! ```
//!
//! ## Usage contract
//!
//! - Not reentrant: a thread calling [`SpinLock::lock`] while it already holds the lock
//!   spins forever. This is not detected.
//! - No fairness between waiters.
//! - Meant for very short critical sections on multi-core hosts. Never hold it across
//!   slow or blocking work; use `parking_lot` for that.

use core::hint::spin_loop;
use core::sync::atomic::{AtomicBool, Ordering};

use lock_api::{GuardSend, RawMutex};

use crate::CachePadded;

/// A mutex that spins while it waits, guarding a `T`.
pub type SpinMutex<T> = lock_api::Mutex<SpinLock, T>;

/// RAII guard returned by [`SpinMutex::lock`].
pub type SpinMutexGuard<'a, T> = lock_api::MutexGuard<'a, SpinLock, T>;

/// Raw non-reentrant spin lock.
///
/// The lock word lives on its own cache line so that independently contended locks
/// placed next to each other do not false-share.
pub struct SpinLock {
    locked: CachePadded<AtomicBool>,
}

impl SpinLock {
    /// Creates an unlocked spin lock.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            locked: CachePadded::new(AtomicBool::new(false)),
        }
    }

    /// Acquires the lock, spinning until it becomes available.
    #[inline]
    pub fn lock(&self) {
        while !self.try_lock() {
            while self.locked.load(Ordering::Acquire) {
                spin_loop();
            }
        }
    }

    /// Attempts to acquire the lock without spinning.
    ///
    /// Returns `false` if the lock is held, including when the caller itself holds it.
    #[inline]
    pub fn try_lock(&self) -> bool {
        !self.locked.swap(true, Ordering::SeqCst)
    }

    /// Releases the lock.
    ///
    /// The caller is expected to hold the lock. Releasing a lock held by another thread
    /// breaks mutual exclusion for whatever that thread is protecting.
    #[inline]
    pub fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    /// Checks whether the lock is currently held by anyone.
    #[inline(always)]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SpinLock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpinLock")
            .field("locked", &self.is_locked())
            .finish()
    }
}

unsafe impl RawMutex for SpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = SpinLock::new();

    type GuardMarker = GuardSend;

    #[inline]
    fn lock(&self) {
        SpinLock::lock(self)
    }

    #[inline]
    fn try_lock(&self) -> bool {
        SpinLock::try_lock(self)
    }

    #[inline]
    unsafe fn unlock(&self) {
        SpinLock::unlock(self)
    }

    #[inline]
    fn is_locked(&self) -> bool {
        SpinLock::is_locked(self)
    }
}
