//! Combinators that transform elements or errors: [`Map`], [`MapErr`] and
//! [`TranslateErr`].
//!
//! None of these buffer anything: each call is passed straight through to the
//! inner iteration, so they are exactly as lazy as it is.

use std::fmt::{self, Debug};

use crate::{Iteration, NextError, Untranslated};

/// An [`Iteration`] that applies a function to every element of another.
///
/// Returned by [`IterationExt::map`](crate::IterationExt::map).
pub struct Map<I, F> {
    /// The iteration whose elements we transform.
    inner: I,
    /// The transformation.
    f: F,
}

impl<I, F> Map<I, F> {
    /// Return a new `Map` over `inner`.
    pub(crate) fn new(inner: I, f: F) -> Self {
        Map { inner, f }
    }
}

impl<I, F, U> Iteration for Map<I, F>
where
    I: Iteration,
    F: FnMut(I::Item) -> U,
{
    type Item = U;
    type Error = I::Error;

    fn has_next(&mut self) -> Result<bool, I::Error> {
        self.inner.has_next()
    }

    fn next(&mut self) -> Result<U, NextError<I::Error>> {
        self.inner.next().map(&mut self.f)
    }

    fn close(&mut self) -> Result<(), I::Error> {
        self.inner.close()
    }

    fn try_next(&mut self) -> Result<Option<U>, I::Error> {
        Ok(self.inner.try_next()?.map(&mut self.f))
    }
}

/// An [`Iteration`] that translates every error of another iteration.
///
/// Returned by [`IterationExt::map_err`](crate::IterationExt::map_err).
///
/// Errors from `has_next`, `next`, and `close` are all translated.
/// [`NextError::Exhausted`] is not an error of the inner iteration, and is
/// passed through unchanged.
pub struct MapErr<I, F> {
    /// The iteration whose errors we translate.
    inner: I,
    /// The translation.
    f: F,
}

impl<I, F> MapErr<I, F> {
    /// Return a new `MapErr` over `inner`.
    pub(crate) fn new(inner: I, f: F) -> Self {
        MapErr { inner, f }
    }
}

impl<I, F, E2> Iteration for MapErr<I, F>
where
    I: Iteration,
    F: FnMut(I::Error) -> E2,
{
    type Item = I::Item;
    type Error = E2;

    fn has_next(&mut self) -> Result<bool, E2> {
        self.inner.has_next().map_err(&mut self.f)
    }

    fn next(&mut self) -> Result<I::Item, NextError<E2>> {
        self.inner.next().map_err(|e| e.map(&mut self.f))
    }

    fn close(&mut self) -> Result<(), E2> {
        self.inner.close().map_err(&mut self.f)
    }

    fn try_next(&mut self) -> Result<Option<I::Item>, E2> {
        self.inner.try_next().map_err(&mut self.f)
    }
}

/// An [`Iteration`] that translates the errors of another iteration with a
/// function that might decline to translate some of them.
///
/// Returned by [`IterationExt::translate_err`](crate::IterationExt::translate_err).
///
/// The function returns `Ok(translated)`, or `Err(original)` if it can't
/// handle `original`.  In the latter case the original error is wrapped in
/// [`Untranslated`] and converted into the target type with `From`, so the
/// caller always gets a well-typed error, and the original is never lost.
///
/// # Example
///
/// ```
/// use iteration::{Iteration as _, IterationExt as _, Untranslated, from_fn};
///
/// #[derive(Debug, thiserror::Error)]
/// enum StoreError {
///     #[error("record missing")]
///     Missing,
///     #[error("storage failure")]
///     Other(#[from] Untranslated<std::io::Error>),
/// }
///
/// let mut it = from_fn(|| Err::<Option<u8>, _>(std::io::Error::other("disk on fire")))
///     .translate_err(|e| match e.kind() {
///         std::io::ErrorKind::NotFound => Ok(StoreError::Missing),
///         _ => Err(e),
///     });
/// match it.has_next() {
///     Err(StoreError::Other(u)) => assert_eq!(u.get_ref().to_string(), "disk on fire"),
///     other => panic!("{:?}", other),
/// }
/// ```
pub struct TranslateErr<I, F> {
    /// The iteration whose errors we translate.
    inner: I,
    /// The translation.
    f: F,
}

impl<I, F> TranslateErr<I, F> {
    /// Return a new `TranslateErr` over `inner`.
    pub(crate) fn new(inner: I, f: F) -> Self {
        TranslateErr { inner, f }
    }
}

impl<I, F, E2> TranslateErr<I, F>
where
    I: Iteration,
    F: FnMut(I::Error) -> Result<E2, I::Error>,
    E2: From<Untranslated<I::Error>>,
{
    /// Translate `err`, falling back to wrapping it.
    fn translate(&mut self, err: I::Error) -> E2 {
        match (self.f)(err) {
            Ok(translated) => translated,
            Err(original) => Untranslated::new(original).into(),
        }
    }
}

impl<I, F, E2> Iteration for TranslateErr<I, F>
where
    I: Iteration,
    F: FnMut(I::Error) -> Result<E2, I::Error>,
    E2: From<Untranslated<I::Error>>,
{
    type Item = I::Item;
    type Error = E2;

    fn has_next(&mut self) -> Result<bool, E2> {
        self.inner.has_next().map_err(|e| self.translate(e))
    }

    fn next(&mut self) -> Result<I::Item, NextError<E2>> {
        match self.inner.next() {
            Ok(item) => Ok(item),
            Err(e) => Err(e.map(|e| self.translate(e))),
        }
    }

    fn close(&mut self) -> Result<(), E2> {
        self.inner.close().map_err(|e| self.translate(e))
    }

    fn try_next(&mut self) -> Result<Option<I::Item>, E2> {
        self.inner.try_next().map_err(|e| self.translate(e))
    }
}

/// Implement `Debug` for a combinator whose function can't be printed.
macro_rules! debug_skipping_fn {
    { $($name:ident),* } => { $(
        impl<I: Debug, F> Debug for $name<I, F> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("inner", &self.inner)
                    .finish_non_exhaustive()
            }
        }
    )* };
}
debug_skipping_fn! { Map, MapErr, TranslateErr }
