/// Errors surfaced by a [`KeyedFactory`](crate::KeyedFactory).
///
/// Only [`creator`](crate::KeyedFactory::creator) fails; a missing key passed to
/// [`create`](crate::KeyedFactory::create) yields `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    /// No creator is registered under the key (rendered with `Debug`).
    #[error("factory for key <{key}> is missing")]
    NotFound { key: String },
}

impl FactoryError {
    pub(crate) fn not_found(key: &impl std::fmt::Debug) -> Self {
        FactoryError::NotFound {
            key: format!("{key:?}"),
        }
    }
}
