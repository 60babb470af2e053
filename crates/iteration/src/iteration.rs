//! The [`Iteration`] trait itself.

use crate::NextError;

/// A lazy, single-pass, fallible cursor that owns resources until closed.
///
/// # Protocol
///
/// * [`has_next`](Iteration::has_next) reports whether [`next`](Iteration::next)
///   would succeed.  It is idempotent: calling it any number of times without
///   an intervening `next` consumes nothing, and repeats no side effect.
/// * `next` returns the next element and advances.  If there is no next
///   element, it fails with [`NextError::Exhausted`].
/// * [`close`](Iteration::close) releases whatever the iteration holds.  It is
///   idempotent too: a second call must succeed and must not release
///   anything twice.
///
/// Once an iteration has been closed, `has_next` must report `false` (or
/// fail); it must never start producing elements again.
///
/// Any of the three operations can fail with [`Iteration::Error`].  An
/// iteration that cannot fail can use [`void::Void`].
///
/// # Ownership
///
/// Whoever holds an iteration must eventually close it, directly or by
/// handing it to something that closes it (a combinator, or a sink from
/// [`crate::sink`]).  Dropping an iteration does *not* close it.
pub trait Iteration {
    /// The type of the elements.
    type Item;
    /// The declared error of this iteration.
    type Error;

    /// Return true if a subsequent call to `next` will return an element.
    fn has_next(&mut self) -> Result<bool, Self::Error>;

    /// Return the next element, and advance past it.
    fn next(&mut self) -> Result<Self::Item, NextError<Self::Error>>;

    /// Release every resource held by this iteration.
    fn close(&mut self) -> Result<(), Self::Error>;

    /// Return the next element, or `None` if there are no more elements.
    ///
    /// This is `has_next` followed by `next`, for callers that pull elements
    /// in a loop:
    ///
    /// ```
    /// use iteration::{Iteration as _, of_vec};
    ///
    /// let mut it = of_vec::<_, void::Void>(vec!["x", "y"]);
    /// let mut seen = vec![];
    /// while let Ok(Some(s)) = it.try_next() {
    ///     seen.push(s);
    /// }
    /// assert_eq!(seen, ["x", "y"]);
    /// ```
    fn try_next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        if !self.has_next()? {
            return Ok(None);
        }
        match self.next() {
            Ok(item) => Ok(Some(item)),
            Err(NextError::Exhausted) => Ok(None),
            Err(NextError::Failed(e)) => Err(e),
        }
    }
}

/// A boxed [`Iteration`], for when children of different types need to be
/// handled together (for example, by [`concat`](crate::concat)).
pub type BoxIteration<'a, T, E> = Box<dyn Iteration<Item = T, Error = E> + 'a>;

impl<'a, I: Iteration + ?Sized> Iteration for &'a mut I {
    type Item = I::Item;
    type Error = I::Error;

    fn has_next(&mut self) -> Result<bool, I::Error> {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<I::Item, NextError<I::Error>> {
        (**self).next()
    }

    fn close(&mut self) -> Result<(), I::Error> {
        (**self).close()
    }

    fn try_next(&mut self) -> Result<Option<I::Item>, I::Error> {
        (**self).try_next()
    }
}

impl<I: Iteration + ?Sized> Iteration for Box<I> {
    type Item = I::Item;
    type Error = I::Error;

    fn has_next(&mut self) -> Result<bool, I::Error> {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<I::Item, NextError<I::Error>> {
        (**self).next()
    }

    fn close(&mut self) -> Result<(), I::Error> {
        (**self).close()
    }

    fn try_next(&mut self) -> Result<Option<I::Item>, I::Error> {
        (**self).try_next()
    }
}
