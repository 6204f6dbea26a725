use std::fmt;

/// Events emitted by a [`KeyedFactory`](crate::KeyedFactory) during operations.
///
/// These are passed to the callback installed with
/// [`set_trace_callback`](crate::KeyedFactory::set_trace_callback). Events borrow the
/// key, so nothing is allocated unless the callback formats them.
///
/// # Examples
///
/// ```rust
/// use keyed_factory::FactoryEvent;
///
/// let key = String::from("circle");
/// let event = FactoryEvent::Insert { key: &key, replaced: false };
/// assert_eq!(event.to_string(), r#"insert { key: "circle", replaced: false }"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryEvent<'a, K> {
    /// A creator was installed.
    Insert {
        key: &'a K,
        /// Whether an existing creator under the same key was replaced.
        replaced: bool,
    },

    /// A key was erased.
    Erase {
        key: &'a K,
        /// Whether a creator was registered under the key.
        found: bool,
    },

    /// An existence check was performed.
    Exists { key: &'a K, found: bool },

    /// A creator was requested.
    Creator { key: &'a K, found: bool },

    /// A creator was invoked, or the key was missing.
    Create { key: &'a K, found: bool },

    /// Every creator was removed.
    Clear {
        /// How many creators were removed.
        removed: usize,
    },
}

impl<K: fmt::Debug> fmt::Display for FactoryEvent<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryEvent::Insert { key, replaced } => {
                write!(f, "insert {{ key: {key:?}, replaced: {replaced} }}")
            }
            FactoryEvent::Erase { key, found } => {
                write!(f, "erase {{ key: {key:?}, found: {found} }}")
            }
            FactoryEvent::Exists { key, found } => {
                write!(f, "exists {{ key: {key:?}, found: {found} }}")
            }
            FactoryEvent::Creator { key, found } => {
                write!(f, "creator {{ key: {key:?}, found: {found} }}")
            }
            FactoryEvent::Create { key, found } => {
                write!(f, "create {{ key: {key:?}, found: {found} }}")
            }
            FactoryEvent::Clear { removed } => write!(f, "clear {{ removed: {removed} }}"),
        }
    }
}
