//! Iterations that produce elements from scratch: the leaves of a tree of
//! combinators.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use educe::Educe;
use void::Void;

use crate::lazy::{Compute, Lazy, delegate_to_lazy};
use crate::{Iteration, NextError};

/// A [`Compute`] over a `std` iterator.
#[derive(Educe)]
#[educe(Debug(bound = "I: Debug"))]
struct Adapter<I, E> {
    /// The iterator we take elements from.
    iter: I,
    /// Marker for the declared error type, which we never produce.
    #[educe(Debug(ignore))]
    _error: PhantomData<fn() -> E>,
}

impl<I: Iterator, E> Compute for Adapter<I, E> {
    type Item = I::Item;
    type Error = E;

    fn compute_next(&mut self) -> Result<Option<I::Item>, E> {
        Ok(self.iter.next())
    }
}

/// An [`Iteration`] over the elements of a `std` iterator.
///
/// Returned by [`from_iter`], [`from_iter_with_error`], and (as [`Elements`])
/// by [`of_vec`] and [`of_slice`].
///
/// Never fails, although its declared error type may be anything.  Closing
/// it does nothing except stop it.  If the underlying iterator panics, the
/// panic propagates.
#[derive(Educe)]
#[educe(Debug(bound = "I: Debug"))]
pub struct FromIter<I: Iterator, E>(Lazy<Adapter<I, E>>);

delegate_to_lazy! { FromIter [I, E] where [I: Iterator] item = I::Item, error = E }

/// An [`Iteration`] over the elements of a vector.
pub type Elements<T, E> = FromIter<std::vec::IntoIter<T>, E>;

/// Return an [`Iteration`] over the elements of `iter`, which never fails.
///
/// # Example
///
/// ```
/// use iteration::{from_iter, sink};
///
/// let squares = sink::to_vec(from_iter((1..=4).map(|n| n * n)));
/// assert_eq!(squares, Ok(vec![1, 4, 9, 16]));
/// ```
pub fn from_iter<I: IntoIterator>(iter: I) -> FromIter<I::IntoIter, Void> {
    from_iter_with_error(iter)
}

/// Return an [`Iteration`] over the elements of `iter`, which never fails,
/// but which declares its error type as `E`.
///
/// This is useful when the result needs to be combined with iterations that
/// *can* fail with `E`.
pub fn from_iter_with_error<I: IntoIterator, E>(iter: I) -> FromIter<I::IntoIter, E> {
    FromIter(Lazy::new(Adapter {
        iter: iter.into_iter(),
        _error: PhantomData,
    }))
}

/// Return an [`Iteration`] that yields the elements of `elements`, in order.
pub fn of_vec<T, E>(elements: Vec<T>) -> Elements<T, E> {
    from_iter_with_error(elements)
}

/// Return an [`Iteration`] that yields clones of the elements of `elements`,
/// in order.
pub fn of_slice<T: Clone, E>(elements: &[T]) -> Elements<T, E> {
    of_vec(elements.to_vec())
}

/// Return an [`Iteration`] that yields the elements of `elements`, in order.
pub fn of_array<T, E, const N: usize>(elements: [T; N]) -> FromIter<std::array::IntoIter<T, N>, E> {
    from_iter_with_error(elements)
}

/// A [`Compute`] that yields one value.
#[derive(Educe)]
#[educe(Debug(bound = "T: Debug"))]
struct Single<T, E> {
    /// The value, until it has been yielded.
    value: Option<T>,
    /// Marker for the declared error type.
    #[educe(Debug(ignore))]
    _error: PhantomData<fn() -> E>,
}

impl<T, E> Compute for Single<T, E> {
    type Item = T;
    type Error = E;

    fn compute_next(&mut self) -> Result<Option<T>, E> {
        Ok(self.value.take())
    }
}

/// An [`Iteration`] that yields exactly one element.  Returned by [`once`].
#[derive(Educe)]
#[educe(Debug(bound = "T: Debug"))]
pub struct Once<T, E>(Lazy<Single<T, E>>);

delegate_to_lazy! { Once [T, E] where [] item = T, error = E }

/// Return an [`Iteration`] that yields `value`, and then ends.
pub fn once<T, E>(value: T) -> Once<T, E> {
    Once(Lazy::new(Single {
        value: Some(value),
        _error: PhantomData,
    }))
}

/// An [`Iteration`] with no elements.  Returned by [`empty`].
///
/// This holds no state at all, so there is no need to share one instance:
/// every `Empty` is as good as any other.
#[derive(Educe)]
#[educe(Clone, Copy, Default, Debug)]
pub struct Empty<T, E>(#[educe(Debug(ignore))] PhantomData<fn() -> (T, E)>);

/// Return an [`Iteration`] with no elements.
pub fn empty<T, E>() -> Empty<T, E> {
    Empty(PhantomData)
}

impl<T, E> Iteration for Empty<T, E> {
    type Item = T;
    type Error = E;

    fn has_next(&mut self) -> Result<bool, E> {
        Ok(false)
    }

    fn next(&mut self) -> Result<T, NextError<E>> {
        Err(NextError::Exhausted)
    }

    fn close(&mut self) -> Result<(), E> {
        Ok(())
    }

    fn try_next(&mut self) -> Result<Option<T>, E> {
        Ok(None)
    }
}

/// A [`Compute`] made of two closures: one that produces the next element,
/// and one that releases resources.
///
/// Built by [`from_fn`] and [`from_fn_with_release`].
pub struct FnCompute<F, R> {
    /// Produces the next element.
    next: F,
    /// Releases resources.
    release: R,
}

impl<T, E, F, R> Compute for FnCompute<F, R>
where
    F: FnMut() -> Result<Option<T>, E>,
    R: FnMut() -> Result<(), E>,
{
    type Item = T;
    type Error = E;

    fn compute_next(&mut self) -> Result<Option<T>, E> {
        (self.next)()
    }

    fn release(&mut self) -> Result<(), E> {
        (self.release)()
    }
}

impl<F, R> Debug for FnCompute<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCompute").finish_non_exhaustive()
    }
}

/// An [`Iteration`] whose elements come from a closure.
///
/// Returned by [`from_fn`] and [`from_fn_with_release`].
pub type FromFn<F, R> = Lazy<FnCompute<F, R>>;

/// The release action for iterations that hold nothing.
fn no_release<E>() -> Result<(), E> {
    Ok(())
}

/// Return an [`Iteration`] whose elements are produced by calling `next`.
///
/// `next` returns `Ok(None)` to signal the end of the elements; it is not
/// called again after that (or after it fails).
///
/// # Example
///
/// ```
/// use iteration::{from_fn, sink};
///
/// let mut lines = vec!["beta", "alpha"];
/// let it = from_fn(|| Ok::<_, std::io::Error>(lines.pop()));
/// assert_eq!(sink::to_vec(it).unwrap(), ["alpha", "beta"]);
/// ```
pub fn from_fn<T, E, F>(next: F) -> FromFn<F, fn() -> Result<(), E>>
where
    F: FnMut() -> Result<Option<T>, E>,
{
    from_fn_with_release(next, no_release::<E> as fn() -> Result<(), E>)
}

/// Return an [`Iteration`] whose elements are produced by calling `next`,
/// and whose resources are released by calling `release`.
///
/// `release` is called exactly once, by the first call to `close`.
pub fn from_fn_with_release<T, E, F, R>(next: F, release: R) -> FromFn<F, R>
where
    F: FnMut() -> Result<Option<T>, E>,
    R: FnMut() -> Result<(), E>,
{
    Lazy::new(FnCompute { next, release })
}
