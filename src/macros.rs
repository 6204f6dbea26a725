//! Macros for declaring process-wide factories.
//!
//! Rust statics cannot be generic, so there is no `KeyedFactory::<T>::instance()`.
//! Instead [`define_factory!`] expands to a module owning one `static` factory for a
//! concrete `T`, key type and creator type, reached through free functions.

/// Declares a process-wide [`KeyedFactory`](crate::KeyedFactory) in a module.
///
/// ```text
/// define_factory!(name, T);             // K = String, C = Creator<T>
/// define_factory!(name, T, K);          // C = Creator<T>
/// define_factory!(name, T, K, C);
/// ```
///
/// The generated module contains:
/// - `Factory`, the concrete factory type, and `Registrar`, its `'static` registrar
/// - `instance()`, returning the factory (built on first use, rebuilt after teardown)
/// - `insert`, `erase`, `exists`, `keys`, `creator`, `create`, `register`,
///   `set_trace_callback` and `clear_trace_callback`, delegating to `instance()`
/// - `unsafe fn destroy()`, the teardown hook of the underlying [`Phoenix`](crate::Phoenix)
///
/// The module body imports `super::*`, so `T`, `K` and `C` may name items of the
/// invoking module. The creator type must be `Clone`.
///
/// # Examples
///
/// ```rust
/// use keyed_factory::{creator, define_factory};
///
/// pub trait Greeter: Send {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".into() }
/// }
///
/// define_factory!(greeters, dyn Greeter);
///
/// fn main() {
///     let _english = greeters::register(
///         "en".to_string(),
///         creator(|| -> Box<dyn Greeter> { Box::new(English) }),
///     );
///
///     let greeter = greeters::instance().call(&"en".to_string()).unwrap();
///     assert_eq!(greeter.greet(), "hello");
///     assert_eq!(greeters::keys(), ["en"]);
/// }
/// ```
#[macro_export]
macro_rules! define_factory {
    ($name:ident, $t:ty) => {
        $crate::define_factory!($name, $t, ::std::string::String, $crate::Creator<$t>);
    };
    ($name:ident, $t:ty, $k:ty) => {
        $crate::define_factory!($name, $t, $k, $crate::Creator<$t>);
    };
    ($name:ident, $t:ty, $k:ty, $c:ty) => {
        #[allow(dead_code)]
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            /// The concrete factory type held by this module.
            pub type Factory = $crate::KeyedFactory<$t, $k, $c>;

            /// A registrar bound to this module's factory.
            pub type Registrar = $crate::Registrar<'static, $t, $k, $c>;

            static INSTANCE: $crate::Phoenix<Factory> = $crate::Phoenix::new(Factory::new);

            /// The process-wide factory, constructed on first use.
            pub fn instance() -> &'static Factory {
                INSTANCE.instance()
            }

            /// Tears the factory down; the next access rebuilds it empty.
            ///
            /// # Safety
            ///
            /// Same contract as `Phoenix::destroy`: no reference obtained from
            /// `instance()` may be used afterwards, and no other thread may be using the
            /// factory. Registrars from `register()` reach the factory through
            /// `instance()` and stay valid across teardown.
            pub unsafe fn destroy() -> bool {
                unsafe { INSTANCE.destroy() }
            }

            /// Whether the factory is currently constructed.
            pub fn is_alive() -> bool {
                INSTANCE.is_alive()
            }

            /// Register a creator under `key`.
            pub fn insert(key: $k, creator: $c) {
                instance().insert(key, creator)
            }

            /// Erase the creator under `key`.
            pub fn erase(key: &$k) -> bool {
                instance().erase(key)
            }

            /// Check whether a creator is registered under `key`.
            pub fn exists(key: &$k) -> bool {
                instance().exists(key)
            }

            /// Registered keys in insertion order.
            pub fn keys() -> ::std::vec::Vec<$k> {
                instance().keys()
            }

            /// Copy of the creator under `key`.
            pub fn creator(key: &$k) -> ::std::result::Result<$c, $crate::FactoryError> {
                instance().creator(key)
            }

            /// Invoke the creator under `key` with `args`.
            pub fn create<Args>(
                key: &$k,
                args: Args,
            ) -> ::std::option::Option<<$c as $crate::Invoke<Args>>::Output>
            where
                $c: $crate::Invoke<Args>,
            {
                instance().create(key, args)
            }

            /// Register a creator for the lifetime of the returned registrar.
            ///
            /// The registrar looks the factory up again when dropped, so dropping it
            /// after `destroy()` erases from the rebuilt factory.
            pub fn register(key: $k, creator: $c) -> Registrar {
                $crate::Registrar::with_accessor(instance, key, creator)
            }

            /// Set a tracing callback on this factory.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::FactoryEvent<'_, $k>) + Send + Sync + 'static,
            ) {
                instance().set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                instance().clear_trace_callback()
            }
        }
    };
}
