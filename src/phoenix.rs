//! Lazily constructed singleton storage that rebuilds its value after teardown.
//!
//! A [`Phoenix`] owns storage for one `T` and the function that builds it. The first
//! call to [`instance`](Phoenix::instance) constructs the value; later calls return the
//! same reference. If the value has been torn down through
//! [`destroy`](Phoenix::destroy), the next `instance` call constructs a fresh value in
//! the same storage and returns that instead, so callers running after the teardown
//! point (shutdown hooks, late logging) still get a usable object.
//!
//! ```rust
//! use keyed_factory::Phoenix;
//!
//! static NAMES: Phoenix<Vec<&'static str>> = Phoenix::new(|| vec!["boot"]);
//!
//! assert_eq!(NAMES.instance().len(), 1);
//! assert_eq!(NAMES.generation(), 1);
//! ```
//!
//! Construction is serialized by a small state machine on an atomic word: exactly one
//! caller builds the value for each life of the object while the others spin until it
//! is published. Tearing down is `unsafe` because nothing tracks references handed out
//! by `instance`; it is intended for single-threaded shutdown paths.

use core::cell::UnsafeCell;
use core::fmt;
use core::hint::spin_loop;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicU64, AtomicU8, Ordering};

const UNINIT: u8 = 0;
const BUSY: u8 = 1;
const ALIVE: u8 = 2;
const DESTROYED: u8 = 3;

/// Singleton storage with resurrect-on-access semantics.
pub struct Phoenix<T> {
    state: AtomicU8,
    generation: AtomicU64,
    init: fn() -> T,
    slot: UnsafeCell<MaybeUninit<T>>,
}

unsafe impl<T: Send + Sync> Sync for Phoenix<T> {}
unsafe impl<T: Send> Send for Phoenix<T> {}

impl<T> Phoenix<T> {
    /// Creates empty storage that will build its value with `init`.
    pub const fn new(init: fn() -> T) -> Self {
        Self {
            state: AtomicU8::new(UNINIT),
            generation: AtomicU64::new(0),
            init,
            slot: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Returns the live value, constructing it first if it was never built or has
    /// been destroyed.
    pub fn instance(&self) -> &T {
        loop {
            match self.state.load(Ordering::Acquire) {
                ALIVE => return unsafe { (*self.slot.get()).assume_init_ref() },
                BUSY => spin_loop(),
                current => {
                    if self
                        .state
                        .compare_exchange_weak(current, BUSY, Ordering::Acquire, Ordering::Relaxed)
                        .is_ok()
                    {
                        return self.construct(current == DESTROYED);
                    }
                }
            }
        }
    }

    fn construct(&self, resurrect: bool) -> &T {
        // A panicking initializer must not leave the storage stuck in BUSY.
        struct Reset<'a>(&'a AtomicU8, u8);
        impl Drop for Reset<'_> {
            fn drop(&mut self) {
                self.0.store(self.1, Ordering::Release);
            }
        }
        let reset = Reset(&self.state, if resurrect { DESTROYED } else { UNINIT });

        let value = (self.init)();
        let value = unsafe { (*self.slot.get()).write(value) };
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        core::mem::forget(reset);
        self.state.store(ALIVE, Ordering::Release);

        if resurrect {
            tracing::debug!(
                type_name = core::any::type_name::<T>(),
                generation,
                "resurrected singleton after teardown"
            );
        } else {
            tracing::debug!(
                type_name = core::any::type_name::<T>(),
                "constructed singleton"
            );
        }

        value
    }

    /// Tears the value down in place, returning `false` if it was not alive.
    ///
    /// This is the terminal cleanup hook. The storage stays usable: the next
    /// [`instance`](Self::instance) call constructs a new value.
    ///
    /// # Safety
    ///
    /// No reference previously returned by [`instance`](Self::instance) may be used
    /// after this call, and no other thread may be inside `instance` or reading the
    /// value while it runs.
    pub unsafe fn destroy(&self) -> bool {
        if self
            .state
            .compare_exchange(ALIVE, BUSY, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }

        unsafe { (*self.slot.get()).assume_init_drop() };
        self.state.store(DESTROYED, Ordering::Release);

        tracing::debug!(
            type_name = core::any::type_name::<T>(),
            "destroyed singleton"
        );
        true
    }

    /// Whether a constructed value is currently available.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state.load(Ordering::Acquire) == ALIVE
    }

    /// Whether the value has been torn down and not yet rebuilt.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.state.load(Ordering::Acquire) == DESTROYED
    }

    /// Number of times the value has been constructed, counting resurrections.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}

impl<T> Drop for Phoenix<T> {
    fn drop(&mut self) {
        if *self.state.get_mut() == ALIVE {
            unsafe { self.slot.get_mut().assume_init_drop() };
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Phoenix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Phoenix");
        d.field("generation", &self.generation());
        if self.is_alive() {
            d.field("value", self.instance());
        } else {
            d.field("value", &format_args!("<not alive>"));
        }
        d.finish()
    }
}
