//! Creator signatures.
//!
//! A factory stores creators by value and hands out clones of them, so the creator
//! type is a concrete parameter of [`KeyedFactory`](crate::KeyedFactory) rather than
//! something inferred. [`Invoke`] is what the factory needs from it to run
//! [`create`](crate::KeyedFactory::create): a way to call it with an argument tuple.

use std::sync::Arc;

/// Default creator: builds a boxed `T` from nothing.
///
/// Boxing lets `T` be a trait object, so one factory can produce many concrete types.
pub type Creator<T> = Arc<dyn Fn() -> Box<T> + Send + Sync>;

/// A stored creator callable with the argument tuple `Args`.
///
/// Implemented for shared closures (`Arc<dyn Fn(..) -> O + Send + Sync>`) and plain
/// function pointers taking up to four arguments.
pub trait Invoke<Args> {
    /// What the creator produces.
    type Output;

    /// Calls the creator.
    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<$($arg,)* O> Invoke<($($arg,)*)> for Arc<dyn Fn($($arg),*) -> O + Send + Sync> {
            type Output = O;

            #[inline]
            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> O {
                (**self)($($arg),*)
            }
        }

        impl<$($arg,)* O> Invoke<($($arg,)*)> for fn($($arg),*) -> O {
            type Output = O;

            #[inline]
            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> O {
                (*self)($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A);
impl_invoke!(A, B);
impl_invoke!(A, B, C);
impl_invoke!(A, B, C, D);

/// Wraps a closure as the default [`Creator`] for `T`.
///
/// ```rust
/// use keyed_factory::{creator, Creator};
///
/// let make: Creator<str> = creator::<str, _>(|| "built".into());
/// assert_eq!(&*make(), "built");
/// ```
pub fn creator<T: ?Sized, F>(f: F) -> Creator<T>
where
    F: Fn() -> Box<T> + Send + Sync + 'static,
{
    Arc::new(f)
}
