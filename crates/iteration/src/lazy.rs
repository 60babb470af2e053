//! The suspension engine: compute each element once, on demand.
//!
//! Most iterations in this crate are a [`Lazy`] wrapped around some type that
//! implements [`Compute`].  The `Compute` type only has to say how to produce
//! the next element (or that there are none left); `Lazy` takes care of the
//! `has_next` / `next` / `close` protocol:
//!
//!  * The next element is computed when someone first asks whether there is
//!    one, and buffered until `next` takes it.  Asking again does not
//!    recompute it, which matters when computing it does I/O.
//!  * Once the computation reports end-of-data, it is never called again.
//!  * `close` releases the computation's resources exactly once, however many
//!    times it is called.
//!
//! # Failures
//!
//! If `compute_next` fails, its error is returned to the caller, and the
//! `Lazy` becomes *failed*.  That state is terminal: afterwards, `has_next`
//! reports `false` and `next` reports [`NextError::Exhausted`].  (We can't
//! report the original error a second time, since we don't require errors to
//! be `Clone`.)  A failed `Lazy` can still be closed, and closing it still
//! releases its resources.

use std::fmt::{self, Debug};
use std::mem;

use tracing::{debug, trace};

use crate::{Iteration, NextError};

/// Something that can produce a sequence of elements, one at a time.
///
/// Wrap it in a [`Lazy`] to get an [`Iteration`].
pub trait Compute {
    /// The type of the elements.
    type Item;
    /// The error that computing an element (or releasing) can fail with.
    type Error;

    /// Compute the next element, or return `Ok(None)` at the end of the data.
    ///
    /// [`Lazy`] calls this at most once per element, and never again after it
    /// has returned `Ok(None)` or an error.
    fn compute_next(&mut self) -> Result<Option<Self::Item>, Self::Error>;

    /// Release any resources held by this computation.
    ///
    /// [`Lazy`] calls this at most once.  The default does nothing.
    fn release(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// The state of a [`Lazy`].
enum State<T> {
    /// No element is buffered; we have to compute one to know if there is one.
    NotReady,
    /// This element has been computed, and nobody has taken it yet.
    Ready(T),
    /// The computation reported end-of-data.
    Done,
    /// We've been closed.
    Closed,
    /// We're computing an element right now, or the last computation failed.
    Failed,
}

impl<T> State<T> {
    /// Return a short name for this state, for debugging output.
    fn name(&self) -> &'static str {
        match self {
            State::NotReady => "not ready",
            State::Ready(_) => "ready",
            State::Done => "done",
            State::Closed => "closed",
            State::Failed => "failed",
        }
    }
}

/// An [`Iteration`] driven by a [`Compute`].
///
/// See the [module documentation](self) for the rules it follows.
///
/// # Example
///
/// ```
/// use iteration::{Compute, Iteration as _, Lazy};
///
/// /// Count down from some number to 1.
/// struct Countdown(u32);
///
/// impl Compute for Countdown {
///     type Item = u32;
///     type Error = void::Void;
///
///     fn compute_next(&mut self) -> Result<Option<u32>, void::Void> {
///         if self.0 == 0 {
///             return Ok(None);
///         }
///         self.0 -= 1;
///         Ok(Some(self.0 + 1))
///     }
/// }
///
/// let mut it = Lazy::new(Countdown(2));
/// assert_eq!(it.has_next(), Ok(true));
/// assert_eq!(it.has_next(), Ok(true));
/// assert_eq!(it.peek(), Ok(Some(&2)));
/// assert_eq!(it.next(), Ok(2));
/// assert_eq!(it.next(), Ok(1));
/// assert_eq!(it.has_next(), Ok(false));
/// ```
pub struct Lazy<C: Compute> {
    /// The computation that produces our elements.
    compute: C,
    /// Where we are in the protocol; holds the buffered element, if any.
    state: State<C::Item>,
}

impl<C: Compute> Lazy<C> {
    /// Return a new `Lazy` driven by `compute`.
    ///
    /// Nothing is computed until the first call to `has_next`, `next` or
    /// `peek`.
    pub fn new(compute: C) -> Self {
        Lazy {
            compute,
            state: State::NotReady,
        }
    }

    /// Return a reference to the next element, without consuming it.
    ///
    /// Computes the element if it was not already buffered.  Returns `None`
    /// if there are no more elements.
    pub fn peek(&mut self) -> Result<Option<&C::Item>, C::Error> {
        Ok(self.peek_mut()?.map(|item| &*item))
    }

    /// Return a mutable reference to the next element, without consuming it.
    ///
    /// Changes made through the reference are seen by the next call to `next`.
    pub fn peek_mut(&mut self) -> Result<Option<&mut C::Item>, C::Error> {
        self.fill()?;
        match &mut self.state {
            State::Ready(item) => Ok(Some(item)),
            _ => Ok(None),
        }
    }

    /// Return true if this `Lazy` has been closed.
    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Return true if a computation failed, and this `Lazy` will not produce
    /// any more elements.
    pub fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed)
    }

    /// Return a reference to the underlying computation.
    pub fn get_ref(&self) -> &C {
        &self.compute
    }

    /// Return a mutable reference to the underlying computation.
    ///
    /// Elements that were already computed are not affected by changes made
    /// through this reference.
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.compute
    }

    /// Mark this `Lazy` as closed, and run `release` on the computation.
    ///
    /// Returns `None` without running `release` if we were already closed.
    /// Any buffered element is dropped.
    ///
    /// This is for wrappers whose computation has a richer way of releasing
    /// its resources than [`Compute::release`].
    pub fn close_with<R, F>(&mut self, release: F) -> Option<R>
    where
        F: FnOnce(&mut C) -> R,
    {
        match mem::replace(&mut self.state, State::Closed) {
            State::Closed => return None,
            State::Failed => debug!("closing an iteration after its computation failed"),
            _ => {}
        }
        Some(release(&mut self.compute))
    }

    /// Make sure that the state is not `NotReady`, computing an element if
    /// necessary.
    ///
    /// Returns true if there is an element buffered.
    fn fill(&mut self) -> Result<bool, C::Error> {
        match self.state {
            State::Ready(_) => return Ok(true),
            State::Done | State::Closed | State::Failed => return Ok(false),
            State::NotReady => {}
        }
        // If compute_next fails (or panics), we stay in this state.
        self.state = State::Failed;
        match self.compute.compute_next() {
            Ok(Some(item)) => {
                self.state = State::Ready(item);
                Ok(true)
            }
            Ok(None) => {
                self.state = State::Done;
                Ok(false)
            }
            Err(e) => {
                trace!("computing the next element failed; iteration is finished");
                Err(e)
            }
        }
    }
}

impl<C: Compute> Iteration for Lazy<C> {
    type Item = C::Item;
    type Error = C::Error;

    fn has_next(&mut self) -> Result<bool, C::Error> {
        self.fill()
    }

    fn next(&mut self) -> Result<C::Item, NextError<C::Error>> {
        if !self.fill().map_err(NextError::Failed)? {
            return Err(NextError::Exhausted);
        }
        match mem::replace(&mut self.state, State::NotReady) {
            State::Ready(item) => Ok(item),
            other => {
                // fill() returned true, so this can't happen; but if it does,
                // don't lose the state.
                self.state = other;
                Err(NextError::Exhausted)
            }
        }
    }

    fn close(&mut self) -> Result<(), C::Error> {
        self.close_with(|c| c.release()).unwrap_or(Ok(()))
    }
}

impl<C: Compute + Debug> Debug for Lazy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("compute", &self.compute)
            .field("state", &self.state.name())
            .finish()
    }
}

/// Implement [`Iteration`] for a newtype around a [`Lazy`], by delegation.
macro_rules! delegate_to_lazy {
    {
        $name:ident [ $($gen:tt)* ] where [ $($bound:tt)* ]
        item = $item:ty, error = $error:ty
    } => {
        impl< $($gen)* > $crate::Iteration for $name< $($gen)* > where $($bound)* {
            type Item = $item;
            type Error = $error;

            fn has_next(&mut self) -> Result<bool, $error> {
                $crate::Iteration::has_next(&mut self.0)
            }

            fn next(&mut self) -> Result<$item, $crate::NextError<$error>> {
                $crate::Iteration::next(&mut self.0)
            }

            fn close(&mut self) -> Result<(), $error> {
                $crate::Iteration::close(&mut self.0)
            }
        }
    };
}
pub(crate) use delegate_to_lazy;

/// A [`Compute`] that pulls elements from another [`Iteration`] unchanged,
/// and closes it on release.
///
/// Wrapping an iteration in `Lazy<Pull<I>>` adds buffering (and so,
/// peeking) to an iteration that doesn't have it.
#[derive(Debug)]
pub(crate) struct Pull<I>(pub(crate) I);

impl<I: Iteration> Compute for Pull<I> {
    type Item = I::Item;
    type Error = I::Error;

    fn compute_next(&mut self) -> Result<Option<I::Item>, I::Error> {
        self.0.try_next()
    }

    fn release(&mut self) -> Result<(), I::Error> {
        self.0.close()
    }
}
