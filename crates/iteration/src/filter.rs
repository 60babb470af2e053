//! Implement [`Filter`], which skips elements that fail a predicate.

use std::fmt::{self, Debug};

use educe::Educe;

use crate::Iteration;
use crate::lazy::{Compute, Lazy, delegate_to_lazy};

/// The [`Compute`] behind a [`Filter`].
#[derive(Educe)]
#[educe(Debug(bound = "I: Debug"))]
struct Filtering<I, P> {
    /// The iteration we're taking elements from.
    inner: I,
    /// The predicate that elements must satisfy.
    #[educe(Debug(ignore))]
    pred: P,
}

impl<I, P> Compute for Filtering<I, P>
where
    I: Iteration,
    P: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;
    type Error = I::Error;

    fn compute_next(&mut self) -> Result<Option<I::Item>, I::Error> {
        while let Some(item) = self.inner.try_next()? {
            if (self.pred)(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn release(&mut self) -> Result<(), I::Error> {
        self.inner.close()
    }
}

/// An [`Iteration`] that yields only the elements of another iteration that
/// satisfy a predicate.
///
/// Returned by [`IterationExt::filter`](crate::IterationExt::filter).
///
/// Order is preserved.  If no element passes (or the inner iteration is
/// empty), this iteration is simply empty.  Closing it closes the inner
/// iteration.
pub struct Filter<I, P>(Lazy<Filtering<I, P>>)
where
    I: Iteration,
    P: FnMut(&I::Item) -> bool;

impl<I, P> Filter<I, P>
where
    I: Iteration,
    P: FnMut(&I::Item) -> bool,
{
    /// Return a new `Filter` over `inner`.
    pub(crate) fn new(inner: I, pred: P) -> Self {
        Filter(Lazy::new(Filtering { inner, pred }))
    }
}

impl<I, P> Debug for Filter<I, P>
where
    I: Iteration + Debug,
    P: FnMut(&I::Item) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filter").field(&self.0).finish()
    }
}

delegate_to_lazy! {
    Filter [I, P] where [I: Iteration, P: FnMut(&I::Item) -> bool]
    item = I::Item, error = I::Error
}
