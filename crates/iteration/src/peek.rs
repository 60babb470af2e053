//! Implement [`Peekable`], which lets callers look at the next element
//! without consuming it.
//!
//! # Stability of peeked elements
//!
//! An element returned by `peek` stays at the head of the iteration until it
//! is taken by `next` (or discarded by `close`).  Peeking again returns the
//! same element, and does not compute anything.

use std::fmt::{self, Debug};

use crate::lazy::{Lazy, Pull, delegate_to_lazy};
use crate::{Iteration, NextError};

/// An [`Iteration`] that can show its next element without consuming it.
///
/// Returned by [`IterationExt::peekable`](crate::IterationExt::peekable).
///
/// Iterations that are already built on [`Lazy`] can be peeked at directly
/// with [`Lazy::peek`]; this wrapper adds the same ability to any iteration.
pub struct Peekable<I: Iteration>(Lazy<Pull<I>>);

impl<I: Iteration> Peekable<I> {
    /// Return a new `Peekable` over `inner`.
    pub(crate) fn new(inner: I) -> Self {
        Peekable(Lazy::new(Pull(inner)))
    }

    /// Return a reference to the next element, or `None` if there are no more.
    pub fn peek(&mut self) -> Result<Option<&I::Item>, I::Error> {
        self.0.peek()
    }

    /// Return a mutable reference to the next element, or `None` if there are
    /// no more.
    ///
    /// Changes made through the reference are seen by the next call to `next`.
    pub fn peek_mut(&mut self) -> Result<Option<&mut I::Item>, I::Error> {
        self.0.peek_mut()
    }

    /// Return the next element if it satisfies `pred`.
    ///
    /// Otherwise, leave it in place and return `None`.
    pub fn next_if<P>(&mut self, pred: P) -> Result<Option<I::Item>, I::Error>
    where
        P: FnOnce(&I::Item) -> bool,
    {
        let accept = match self.peek()? {
            Some(item) => pred(item),
            None => false,
        };
        if !accept {
            return Ok(None);
        }
        match self.0.next() {
            Ok(item) => Ok(Some(item)),
            Err(NextError::Exhausted) => Ok(None),
            Err(NextError::Failed(e)) => Err(e),
        }
    }

    /// Return a reference to the underlying iteration.
    pub fn get_ref(&self) -> &I {
        &self.0.get_ref().0
    }
}

impl<I: Iteration + Debug> Debug for Peekable<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Peekable").field(self.get_ref()).finish()
    }
}

delegate_to_lazy! { Peekable [I] where [I: Iteration] item = I::Item, error = I::Error }
