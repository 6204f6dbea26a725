//! Keyed registry of creation functions.
//!
//! A [`KeyedFactory`] maps keys to creators and remembers the order in which keys were
//! inserted. Every operation takes the factory's single lock for its whole duration,
//! including [`create`](KeyedFactory::create), which runs the creator while the lock is
//! held.
//!
//! # Examples
//!
//! ```
//! use keyed_factory::{creator, KeyedFactory};
//!
//! trait Shape: Send {
//!     fn sides(&self) -> u32;
//! }
//!
//! struct Triangle;
//! impl Shape for Triangle {
//!     fn sides(&self) -> u32 { 3 }
//! }
//!
//! let shapes: KeyedFactory<dyn Shape> = KeyedFactory::new();
//! shapes.insert(
//!     "triangle".to_string(),
//!     creator(|| -> Box<dyn Shape> { Box::new(Triangle) }),
//! );
//!
//! let triangle = shapes.call(&"triangle".to_string()).unwrap();
//! assert_eq!(triangle.sides(), 3);
//! assert!(shapes.call(&"hexagon".to_string()).is_none());
//! ```
//!
//! # Deadlocks
//!
//! The lock is not reentrant. A creator that calls back into the same factory
//! (`insert`, `erase`, `create`, `creator`, ...) deadlocks, and a slow creator stalls
//! every other caller of the factory. Trace callbacks run after the lock is released
//! and may query the factory freely. `{:?}` on a factory whose lock is held prints
//! `<locked>` in place of the keys instead of waiting.

use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

use lock_api::RawMutex;

use crate::{Creator, FactoryError, FactoryEvent, Invoke, Registrar, SpinLock};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every event the factory emits. It must be thread-safe
/// because the factory itself is usually shared.
pub type TraceCallback<K> = dyn Fn(&FactoryEvent<'_, K>) + Send + Sync + 'static;

/// A factory whose lock parks waiting threads instead of spinning.
///
/// Prefer this when creators do real work or when the factory is contended by more
/// threads than there are cores.
pub type BlockingFactory<T, K = String, C = Creator<T>> =
    KeyedFactory<T, K, C, parking_lot::RawMutex>;

/// Creators plus their insertion order.
///
/// Invariant: `order` holds exactly the keys of `map`, each once.
struct Creators<K, C> {
    map: BTreeMap<K, C>,
    order: Vec<K>,
}

impl<K: Ord, C> Creators<K, C> {
    const fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    fn erase(&mut self, key: &K) -> bool {
        if self.map.remove(key).is_none() {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        true
    }
}

/// Thread-safe registry of creators producing `T`, looked up by `K`.
///
/// - `C` is the stored creator type. It defaults to [`Creator<T>`], a shared
///   zero-argument closure returning `Box<T>`; any type implementing
///   [`Invoke`] for the argument tuples you pass to [`create`](Self::create) works.
/// - `R` is the lock backend. [`SpinLock`] by default; see [`BlockingFactory`] for a
///   parking mutex.
pub struct KeyedFactory<T: ?Sized, K = String, C = Creator<T>, R = SpinLock> {
    creators: lock_api::Mutex<R, Creators<K, C>>,
    trace: parking_lot::RwLock<Option<Arc<TraceCallback<K>>>>,
    _produces: PhantomData<fn() -> Box<T>>,
}

impl<T, K, C, R> KeyedFactory<T, K, C, R>
where
    T: ?Sized,
    K: Ord + Clone + Debug,
    R: RawMutex,
{
    /// Creates an empty factory.
    pub const fn new() -> Self {
        Self {
            creators: lock_api::Mutex::new(Creators::new()),
            trace: parking_lot::RwLock::new(None),
            _produces: PhantomData,
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for factory operations.
    ///
    /// Replaces any previous callback. The callback is invoked after the factory lock
    /// has been released, so it may call back into the factory.
    pub fn set_trace_callback(&self, callback: impl Fn(&FactoryEvent<'_, K>) + Send + Sync + 'static) {
        *self.trace.write() = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    pub fn clear_trace_callback(&self) {
        *self.trace.write() = None;
    }

    fn emit_event(&self, event: &FactoryEvent<'_, K>) {
        let callback = self.trace.read().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Registers `creator` under `key`.
    ///
    /// An existing creator under the same key is erased first, so the key moves to the
    /// end of [`keys`](Self::keys).
    pub fn insert(&self, key: K, creator: C) {
        let replaced = {
            let mut creators = self.creators.lock();
            let replaced = creators.erase(&key);
            creators.map.insert(key.clone(), creator);
            creators.order.push(key.clone());
            replaced
        };

        tracing::trace!(key = ?key, replaced, "inserted creator");
        self.emit_event(&FactoryEvent::Insert {
            key: &key,
            replaced,
        });
    }

    /// Removes the creator registered under `key`.
    ///
    /// Returns whether there was one. Erasing an absent key changes nothing.
    pub fn erase(&self, key: &K) -> bool {
        let found = self.creators.lock().erase(key);

        tracing::trace!(key = ?key, found, "erased creator");
        self.emit_event(&FactoryEvent::Erase { key, found });
        found
    }

    /// Checks whether a creator is registered under `key`.
    pub fn exists(&self, key: &K) -> bool {
        let found = self.creators.lock().map.contains_key(key);

        self.emit_event(&FactoryEvent::Exists { key, found });
        found
    }

    /// Snapshot of the registered keys, oldest insertion first.
    pub fn keys(&self) -> Vec<K> {
        self.creators.lock().order.clone()
    }

    /// Number of registered creators.
    pub fn len(&self) -> usize {
        self.creators.lock().map.len()
    }

    /// Whether no creator is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the creator registered under `key`.
    ///
    /// # Errors
    ///
    /// [`FactoryError::NotFound`] if nothing is registered under `key`.
    pub fn creator(&self, key: &K) -> Result<C, FactoryError>
    where
        C: Clone,
    {
        let creator = self.creators.lock().map.get(key).cloned();

        self.emit_event(&FactoryEvent::Creator {
            key,
            found: creator.is_some(),
        });

        creator.ok_or_else(|| {
            tracing::trace!(key = ?key, "creator lookup missed");
            FactoryError::not_found(key)
        })
    }

    /// Invokes the creator registered under `key` with `args`.
    ///
    /// Returns `None` if nothing is registered under `key`; unlike
    /// [`creator`](Self::creator) a miss is not an error. The creator runs with the
    /// factory lock held.
    pub fn create<Args>(&self, key: &K, args: Args) -> Option<C::Output>
    where
        C: Invoke<Args>,
    {
        let output = {
            let creators = self.creators.lock();
            creators.map.get(key).map(|creator| creator.invoke(args))
        };

        let found = output.is_some();
        if !found {
            tracing::trace!(key = ?key, "create missed");
        }
        self.emit_event(&FactoryEvent::Create { key, found });
        output
    }

    /// Invokes a zero-argument creator; shorthand for `create(key, ())`.
    pub fn call(&self, key: &K) -> Option<C::Output>
    where
        C: Invoke<()>,
    {
        self.create(key, ())
    }

    /// Registers `creator` under `key` for as long as the returned [`Registrar`] lives.
    pub fn register(&self, key: K, creator: C) -> Registrar<'_, T, K, C, R> {
        Registrar::new(self, key, creator)
    }

    /// Removes every creator, returning how many there were.
    ///
    /// Does not affect the tracing callback.
    pub fn clear(&self) -> usize {
        let removed = {
            let mut creators = self.creators.lock();
            creators.order.clear();
            let removed = creators.map.len();
            creators.map.clear();
            removed
        };

        self.emit_event(&FactoryEvent::Clear { removed });
        removed
    }
}

impl<T, K, C, R> Default for KeyedFactory<T, K, C, R>
where
    T: ?Sized,
    K: Ord + Clone + Debug,
    R: RawMutex,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K, C, R> Debug for KeyedFactory<T, K, C, R>
where
    T: ?Sized,
    K: Ord + Clone + Debug,
    R: RawMutex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("KeyedFactory");
        match self.creators.try_lock() {
            Some(creators) => d.field("keys", &creators.order),
            None => d.field("keys", &format_args!("<locked>")),
        };
        d.finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
