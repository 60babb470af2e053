//! Implement [`Concat`], which yields the elements of several iterations,
//! one after another.

use std::fmt::{self, Debug};

use close_error::CloseErrors;
use tracing::warn;

use crate::Iteration;
use crate::lazy::{Compute, Lazy, delegate_to_lazy};

/// What a [`Concat`] calls the things it closes, in error messages.
const CLOSING: &str = "concatenated iterations";

/// The [`Compute`] behind a [`Concat`].
struct Concatenating<C: Iterator> {
    /// The child we're taking elements from now, if any.
    current: Option<C::Item>,
    /// The position of `current` among all the children.
    position: usize,
    /// The children we haven't started yet.
    rest: C,
}

impl<C> Concatenating<C>
where
    C: Iterator,
    C::Item: Iteration,
{
    /// Close the current child, and every child we haven't started.
    ///
    /// Every child is closed, even if closing some of them fails; every
    /// failure is recorded.
    fn close_all(&mut self) -> CloseErrors<<C::Item as Iteration>::Error> {
        let mut errs = CloseErrors::while_closing(CLOSING);
        let mut position = self.position;
        if let Some(mut current) = self.current.take() {
            if let Err(e) = current.close() {
                errs.push_indexed(position, e);
            }
            position += 1;
        }
        for mut child in self.rest.by_ref() {
            if let Err(e) = child.close() {
                errs.push_indexed(position, e);
            }
            position += 1;
        }
        self.position = position;
        errs
    }
}

impl<C> Compute for Concatenating<C>
where
    C: Iterator,
    C::Item: Iteration,
{
    type Item = <C::Item as Iteration>::Item;
    type Error = <C::Item as Iteration>::Error;

    fn compute_next(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if let Some(current) = &mut self.current {
                if let Some(item) = current.try_next()? {
                    return Ok(Some(item));
                }
                // This child is finished: close it now, rather than keeping it
                // open until we're closed ourselves.
                if let Some(mut finished) = self.current.take() {
                    self.position += 1;
                    finished.close()?;
                }
            }
            match self.rest.next() {
                Some(child) => self.current = Some(child),
                None => return Ok(None),
            }
        }
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        let mut errs = self.close_all().into_iter();
        let first = errs.next();
        let n_more = errs.len();
        if n_more > 0 {
            warn!(
                "{} more failures while closing {} were discarded",
                n_more, CLOSING
            );
        }
        first.map_or(Ok(()), Err)
    }
}

/// An [`Iteration`] that yields every element of its first child, then every
/// element of its second child, and so on.
///
/// Returned by [`concat`] and [`IterationExt::chain`](crate::IterationExt::chain).
///
/// Children are taken from an iterator, one at a time, when they are needed.
/// Only one child is open at once: each child is closed as soon as it is
/// exhausted.  Closing the `Concat` closes the current child *and every child
/// that was never started*, so no child is leaked because we stopped early.
///
/// If more than one child fails to close, [`Iteration::close`] returns the
/// first failure and logs how many others there were; use
/// [`Concat::close_collecting`] to get all of them.
pub struct Concat<C>(Lazy<Concatenating<C>>)
where
    C: Iterator,
    C::Item: Iteration;

impl<C> Concat<C>
where
    C: Iterator,
    C::Item: Iteration,
{
    /// Close this `Concat`, returning every failure to close a child.
    ///
    /// Like [`Iteration::close`], this is idempotent: calling it (or `close`)
    /// again does nothing, and succeeds.
    pub fn close_collecting(&mut self) -> Result<(), CloseErrors<<C::Item as Iteration>::Error>> {
        match self.0.close_with(Concatenating::close_all) {
            Some(errs) => errs.into_result(),
            None => Ok(()),
        }
    }
}

impl<C> Debug for Concat<C>
where
    C: Iterator,
    C::Item: Iteration + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.get_ref();
        f.debug_struct("Concat")
            .field("current", &inner.current)
            .field("position", &inner.position)
            .finish_non_exhaustive()
    }
}

delegate_to_lazy! {
    Concat [C] where [C: Iterator, C::Item: Iteration]
    item = <C::Item as Iteration>::Item, error = <C::Item as Iteration>::Error
}

/// Return an [`Iteration`] over the elements of every iteration in
/// `children`, in order.
///
/// `children` is consumed lazily: a child is taken from it only when the
/// previous child is exhausted (or when the result is closed).  With no
/// children, the result is empty.
///
/// To concatenate iterations of different types, box them first with
/// [`IterationExt::boxed`](crate::IterationExt::boxed).
///
/// # Example
///
/// ```
/// use iteration::{concat, of_vec, sink};
///
/// let parts = vec![of_vec::<_, void::Void>(vec![1, 2]), of_vec(vec![]), of_vec(vec![3])];
/// assert_eq!(sink::to_vec(concat(parts)), Ok(vec![1, 2, 3]));
/// ```
pub fn concat<C>(children: C) -> Concat<C::IntoIter>
where
    C: IntoIterator,
    C::Item: Iteration,
{
    Concat(Lazy::new(Concatenating {
        current: None,
        position: 0,
        rest: children.into_iter(),
    }))
}
