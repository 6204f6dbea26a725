//! Integration tests for the spin lock primitives under real contention.

use keyed_factory::{RecursiveSpinLock, SpinLock, SpinMutex};
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// A counter guarded by a raw lock, incremented outside of any guard type.
struct RawCounter<L> {
    lock: L,
    value: UnsafeCell<u64>,
}

unsafe impl<L: Sync> Sync for RawCounter<L> {}

#[test]
fn test_spin_lock_counter_n_by_m() {
    const N: usize = 16;
    const M: usize = 20_000;

    let counter = Arc::new(RawCounter {
        lock: SpinLock::new(),
        value: UnsafeCell::new(0),
    });
    let barrier = Arc::new(Barrier::new(N));

    let handles: Vec<_> = (0..N)
        .map(|_| {
            let counter = counter.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..M {
                    counter.lock.lock();
                    unsafe { *counter.value.get() += 1 };
                    counter.lock.unlock();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert!(counter.lock.try_lock());
    assert_eq!(unsafe { *counter.value.get() }, (N * M) as u64);
    counter.lock.unlock();
}

#[test]
fn test_spin_mutex_counter_n_by_m() {
    const N: usize = 8;
    const M: usize = 10_000;

    static COUNTER: SpinMutex<usize> = SpinMutex::new(0);

    let handles: Vec<_> = (0..N)
        .map(|_| {
            thread::spawn(|| {
                for _ in 0..M {
                    *COUNTER.lock() += 1;
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(*COUNTER.lock(), N * M);
}

#[test]
fn test_holder_try_lock_fails() {
    let lock = SpinLock::new();
    lock.lock();
    assert!(!lock.try_lock());
    lock.unlock();
}

#[test]
fn test_writes_visible_to_next_holder() {
    let lock = Arc::new(SpinLock::new());
    let payload = Arc::new(RawCounter {
        lock: (),
        value: UnsafeCell::new(0),
    });
    let written = Arc::new(AtomicBool::new(false));

    lock.lock();
    let writer = {
        let lock = lock.clone();
        let payload = payload.clone();
        let written = written.clone();
        thread::spawn(move || {
            lock.lock();
            unsafe { *payload.value.get() = 42 };
            written.store(true, Ordering::Relaxed);
            lock.unlock();
        })
    };

    // The writer cannot enter until we release.
    assert!(!written.load(Ordering::Relaxed));
    lock.unlock();
    writer.join().unwrap();

    lock.lock();
    assert_eq!(unsafe { *payload.value.get() }, 42);
    lock.unlock();
}

#[test]
fn test_recursive_lock_requires_matching_releases() {
    const DEPTH: u64 = 5;

    let lock = Arc::new(RecursiveSpinLock::new());
    for _ in 0..DEPTH {
        lock.lock();
    }
    assert_eq!(lock.recursion_level(), DEPTH);

    for remaining in (0..DEPTH).rev() {
        let other = lock.clone();
        let acquired = thread::spawn(move || {
            let acquired = other.try_lock();
            if acquired {
                other.unlock();
            }
            acquired
        })
        .join()
        .unwrap();
        assert!(!acquired, "acquired while owner held {} levels", remaining + 1);

        lock.unlock();
        assert_eq!(lock.recursion_level(), remaining);
    }

    let other = lock.clone();
    let acquired = thread::spawn(move || {
        let acquired = other.try_lock();
        if acquired {
            other.unlock();
        }
        acquired
    })
    .join()
    .unwrap();
    assert!(acquired);
}

#[test]
fn test_recursive_lock_counter_with_nesting() {
    const N: usize = 8;
    const M: usize = 5_000;

    let counter = Arc::new(RawCounter {
        lock: RecursiveSpinLock::new(),
        value: UnsafeCell::new(0),
    });

    fn bump(counter: &RawCounter<RecursiveSpinLock>, depth: u32) {
        let _guard = counter.lock.lock_scoped();
        if depth == 0 {
            unsafe { *counter.value.get() += 1 };
        } else {
            bump(counter, depth - 1);
        }
    }

    let handles: Vec<_> = (0..N)
        .map(|i| {
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..M {
                    bump(&counter, (i % 3) as u32);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let _guard = counter.lock.lock_scoped();
    assert_eq!(unsafe { *counter.value.get() }, (N * M) as u64);
}
