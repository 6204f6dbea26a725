use std::fmt::{self, Debug};

use lock_api::RawMutex;

use crate::{Creator, KeyedFactory, SpinLock};

/// Scoped registration of one creator.
///
/// Construction inserts `(key, creator)` into the factory; dropping the registrar
/// erases `key`. The registrar owns only its key. It reaches the factory either through
/// a borrow ([`new`](Self::new)) or through an accessor called on every use
/// ([`with_accessor`](Self::with_accessor)). Process-wide factories use the accessor so
/// that a registrar dropped after teardown erases from the rebuilt factory.
///
/// # Erase-by-key on drop
///
/// Drop removes whatever is registered under the key at that moment, even if another
/// insert has replaced this registrar's creator in the meantime. Two registrars for the
/// same key therefore do not nest: the first one dropped removes the key for both.
///
/// # Examples
///
/// ```rust
/// use keyed_factory::{creator, KeyedFactory};
///
/// let factory: KeyedFactory<u32> = KeyedFactory::new();
/// {
///     let _seven = factory.register("seven".to_string(), creator(|| Box::new(7)));
///     assert!(factory.exists(&"seven".to_string()));
/// }
/// assert!(!factory.exists(&"seven".to_string()));
/// ```
#[must_use = "dropping the registrar erases its key immediately"]
pub struct Registrar<'a, T, K, C = Creator<T>, R = SpinLock>
where
    T: ?Sized,
    K: Ord + Clone + Debug,
    R: RawMutex,
{
    target: Target<'a, T, K, C, R>,
    key: K,
}

enum Target<'a, T: ?Sized, K, C, R> {
    Borrowed(&'a KeyedFactory<T, K, C, R>),
    Accessor(fn() -> &'a KeyedFactory<T, K, C, R>),
}

impl<'a, T, K, C, R> Registrar<'a, T, K, C, R>
where
    T: ?Sized,
    K: Ord + Clone + Debug,
    R: RawMutex,
{
    /// Inserts `creator` under `key` into `factory`.
    pub fn new(factory: &'a KeyedFactory<T, K, C, R>, key: K, creator: C) -> Self {
        factory.insert(key.clone(), creator);
        Registrar {
            target: Target::Borrowed(factory),
            key,
        }
    }

    /// Inserts `creator` under `key` into the factory returned by `instance`.
    ///
    /// `instance` is called again on drop, so a factory that was torn down and rebuilt
    /// in between is reached through its current storage.
    pub fn with_accessor(
        instance: fn() -> &'a KeyedFactory<T, K, C, R>,
        key: K,
        creator: C,
    ) -> Self {
        instance().insert(key.clone(), creator);
        Registrar {
            target: Target::Accessor(instance),
            key,
        }
    }

    /// The key this registrar erases on drop.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The factory this registrar registered into.
    pub fn factory(&self) -> &'a KeyedFactory<T, K, C, R> {
        match self.target {
            Target::Borrowed(factory) => factory,
            Target::Accessor(instance) => instance(),
        }
    }
}

impl<T, K, C, R> Drop for Registrar<'_, T, K, C, R>
where
    T: ?Sized,
    K: Ord + Clone + Debug,
    R: RawMutex,
{
    fn drop(&mut self) {
        self.factory().erase(&self.key);
    }
}

impl<T, K, C, R> Debug for Registrar<'_, T, K, C, R>
where
    T: ?Sized,
    K: Ord + Clone + Debug,
    R: RawMutex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar").field("key", &self.key).finish()
    }
}
