//! Cache-line padding for contended atomics.
//!
//! Lock words that sit next to unrelated data end up sharing a cache line with it,
//! and every write to the lock then invalidates the neighbour on other cores.
//! [`CachePadded`] aligns (and therefore pads) its contents to 128 bytes, which covers
//! the 64-byte lines of most x86-64 parts as well as the 128-byte prefetch pairs of
//! recent Intel cores and Apple silicon.

use core::fmt;
use core::ops::{Deref, DerefMut};

use static_assertions::const_assert;

/// Pads and aligns a value to the length of a cache line.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(align(128))]
pub struct CachePadded<T> {
    value: T,
}

const_assert!(core::mem::align_of::<CachePadded<u8>>() >= 64);
const_assert!(core::mem::size_of::<CachePadded<u8>>() >= 64);

impl<T> CachePadded<T> {
    /// Wraps `value` in its own cache line.
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Returns the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for CachePadded<T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for CachePadded<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for CachePadded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePadded")
            .field("value", &self.value)
            .finish()
    }
}

impl<T> From<T> for CachePadded<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
