//! Error types shared by every iteration.

/// An error from [`Iteration::next`](crate::Iteration::next).
///
/// `next` can fail for two different reasons, which callers usually want to
/// treat differently: the declared error of the iteration, or a call made
/// when there was nothing left to return.
#[derive(Clone, Debug, thiserror::Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum NextError<E> {
    /// `next` was called, but there were no more elements.
    ///
    /// This indicates a bug in the caller, which should have checked
    /// [`has_next`](crate::Iteration::has_next) first.
    #[error("no more elements")]
    Exhausted,

    /// Producing the next element failed.
    #[error("iteration failed")]
    Failed(#[source] E),
}

impl<E> NextError<E> {
    /// Return true if this error means there were no more elements.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, NextError::Exhausted)
    }

    /// Return the declared error, if this is one.
    pub fn into_failed(self) -> Option<E> {
        match self {
            NextError::Exhausted => None,
            NextError::Failed(e) => Some(e),
        }
    }

    /// Translate the declared error (if any) with `f`.
    ///
    /// `Exhausted` is passed through unchanged.
    pub fn map<E2, F>(self, f: F) -> NextError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            NextError::Exhausted => NextError::Exhausted,
            NextError::Failed(e) => NextError::Failed(f(e)),
        }
    }
}

/// An error that a translation function declined to translate.
///
/// Returned (converted into the target error type) by
/// [`TranslateErr`](crate::TranslateErr) when its function hands the
/// original error back.  The original error is kept, so that nothing is
/// lost.
#[derive(Clone, Debug, thiserror::Error)]
#[error("error could not be translated")]
pub struct Untranslated<E>(#[source] E);

impl<E> Untranslated<E> {
    /// Wrap `err`, which could not be translated.
    pub(crate) fn new(err: E) -> Self {
        Untranslated(err)
    }

    /// Return a reference to the original error.
    pub fn get_ref(&self) -> &E {
        &self.0
    }

    /// Consume this wrapper and return the original error.
    pub fn into_inner(self) -> E {
        self.0
    }
}
