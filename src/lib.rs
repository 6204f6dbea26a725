//! # Keyed Factory
//!
//! A thread-safe registry of creation functions looked up by key, and the concurrency
//! primitives it is built from.
//!
//! Creators are registered under a key and invoked later to produce values. The
//! registry keeps keys in insertion order, guards everything with one lock, and can
//! live in a process-wide static that rebuilds itself if it is used after teardown.
//!
//! ## Quick Start
//!
//! ```rust
//! use keyed_factory::{creator, KeyedFactory};
//!
//! let numbers: KeyedFactory<u32> = KeyedFactory::new();
//! numbers.insert("one".to_string(), creator(|| Box::new(1)));
//! numbers.insert("two".to_string(), creator(|| Box::new(2)));
//!
//! assert_eq!(numbers.keys(), ["one", "two"]);
//! assert_eq!(numbers.call(&"two".to_string()).map(|n| *n), Some(2));
//! assert!(numbers.call(&"three".to_string()).is_none());
//! assert!(numbers.creator(&"three".to_string()).is_err());
//! ```
//!
//! ## Components
//!
//! - [`SpinLock`] - non-reentrant spin lock; [`SpinMutex`] pairs it with data through `lock_api`
//! - [`RecursiveSpinLock`] - reentrant spin lock tracking its owner thread
//! - [`Phoenix`] - lazily built singleton storage that resurrects its value after teardown
//! - [`KeyedFactory`] - the registry, generic over product, key, creator and lock backend
//! - [`Registrar`] - scoped registration that erases its key on drop
//! - [`define_factory!`] - declares a process-wide factory behind a [`Phoenix`]
//!
//! ## Missing keys
//!
//! [`KeyedFactory::creator`] fails with [`FactoryError::NotFound`] for an unknown key,
//! while [`KeyedFactory::create`] and [`KeyedFactory::call`] return `None`.
//!
//! ## Tracing
//!
//! Operations are logged through `tracing` at `trace` level, and each factory accepts
//! an optional callback receiving a [`FactoryEvent`] per operation.

mod cache_padded;
mod creator;
mod factory;
mod factory_error;
mod factory_event;
mod macros;
mod phoenix;
mod recursive_spin_lock;
mod registrar;
mod spin_lock;

pub use cache_padded::CachePadded;
pub use creator::{creator, Creator, Invoke};
pub use factory::{BlockingFactory, KeyedFactory, TraceCallback};
pub use factory_error::FactoryError;
pub use factory_event::FactoryEvent;
pub use phoenix::Phoenix;
pub use recursive_spin_lock::{RecursiveSpinGuard, RecursiveSpinLock};
pub use registrar::Registrar;
pub use spin_lock::{SpinLock, SpinMutex, SpinMutexGuard};
