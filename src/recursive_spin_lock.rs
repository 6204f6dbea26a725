//! Reentrant spin lock.
//!
//! [`RecursiveSpinLock`] layers an owning-thread identity and a reentry count over the
//! same acquisition strategy as [`SpinLock`](crate::SpinLock). The owner may lock it
//! again without spinning; it is released for other threads only after the owner has
//! unlocked it as many times as it locked it.
//!
//! Thread identity comes from `parking_lot`'s [`RawThreadId`], which is unique among
//! live threads and never zero, so `0` doubles as "no owner".

use core::hint::spin_loop;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use lock_api::GetThreadId;
use parking_lot::RawThreadId;

use crate::CachePadded;

const NO_OWNER: usize = 0;

#[inline]
fn current_thread_id() -> usize {
    RawThreadId::INIT.nonzero_thread_id().get()
}

/// Raw reentrant spin lock tracking its owner thread.
///
/// `owner` and `count` are only written by the thread holding `locked`, so they are
/// accessed with relaxed ordering; a thread can only ever read its own id back from
/// `owner` if it wrote it there itself.
pub struct RecursiveSpinLock {
    locked: CachePadded<AtomicBool>,
    owner: AtomicUsize,
    count: AtomicU64,
}

impl RecursiveSpinLock {
    /// Creates an unlocked, unowned lock.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            locked: CachePadded::new(AtomicBool::new(false)),
            owner: AtomicUsize::new(NO_OWNER),
            count: AtomicU64::new(0),
        }
    }

    /// Acquires the lock, spinning until [`try_lock`](Self::try_lock) succeeds.
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
    /// Always succeeds for the current owner (bumping the reentry count). Otherwise
    /// performs one exchange on the lock word and, on success, records the caller as
    /// owner with a count of 1.
    pub fn try_lock(&self) -> bool {
        let me = current_thread_id();

        if self.owner.load(Ordering::Relaxed) == me {
            self.count.fetch_add(1, Ordering::Relaxed);
            return true;
        }

        if !self.locked.swap(true, Ordering::SeqCst) {
            self.owner.store(me, Ordering::Relaxed);
            self.count.store(1, Ordering::Relaxed);
            return true;
        }

        false
    }

    /// Releases one level of ownership.
    ///
    /// The lock word is cleared when the count drops to zero. Called from a thread
    /// that does not own the lock this does nothing and returns `false`.
    pub fn unlock(&self) -> bool {
        let me = current_thread_id();

        if self.owner.load(Ordering::Relaxed) != me {
            tracing::warn!("recursive spin lock released by a thread that does not own it");
            return false;
        }

        if self.count.fetch_sub(1, Ordering::Relaxed) == 1 {
            self.owner.store(NO_OWNER, Ordering::Relaxed);
            self.locked.store(false, Ordering::Release);
        }

        true
    }

    /// Acquires the lock and returns a guard that releases one level on drop.
    #[inline]
    pub fn lock_scoped(&self) -> RecursiveSpinGuard<'_> {
        self.lock();
        RecursiveSpinGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    /// Checks whether any thread holds the lock.
    #[inline(always)]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Checks whether the calling thread holds the lock.
    #[inline]
    pub fn is_owned_by_current_thread(&self) -> bool {
        self.owner.load(Ordering::Relaxed) == current_thread_id()
    }

    /// Current reentry depth; 0 while the lock is free.
    ///
    /// Only meaningful when read by the owner. Other threads see a value that may be
    /// stale by the time they act on it.
    #[inline]
    pub fn recursion_level(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for RecursiveSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for RecursiveSpinLock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecursiveSpinLock")
            .field("locked", &self.is_locked())
            .field("recursion_level", &self.recursion_level())
            .finish()
    }
}

/// Releases one level of a [`RecursiveSpinLock`] when dropped.
///
/// Not `Send`: the release has to happen on the thread that owns the lock.
#[must_use = "if unused the lock level is released immediately"]
pub struct RecursiveSpinGuard<'a> {
    lock: &'a RecursiveSpinLock,
    _not_send: PhantomData<*const ()>,
}

impl Drop for RecursiveSpinGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.lock.unlock();
    }
}
