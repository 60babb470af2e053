//! Sinks: functions that consume an [`Iteration`].
//!
//! Unless noted otherwise, each sink here takes ownership of its iteration,
//! drains it, and then closes it, *whether or not draining succeeded*.  If
//! both draining and closing fail, the draining error is returned, and the
//! closing error is discarded.  If draining panics (for example, in a
//! callback), the iteration is closed while the panic unwinds.
//!
//! To keep using an iteration after a sink is done with it, pass `&mut it`:
//! the sink will still close it.

use std::collections::HashSet;
use std::error::Error as StdError;
use std::hash::Hash;
use std::iter::FusedIterator;

use close_error::{CloseErrors, ErrorReport as _};
use tracing::{debug, warn};

use crate::Iteration;

/// A guard that closes an iteration on drop, unless it was disarmed.
///
/// Used by the sinks so that a panic while draining still closes.
struct CloseOnUnwind<I: Iteration> {
    /// The iteration being drained.
    it: I,
    /// False once the sink has closed `it` itself.
    armed: bool,
}

impl<I: Iteration> Drop for CloseOnUnwind<I> {
    fn drop(&mut self) {
        if self.armed && self.it.close().is_err() {
            warn!("failed to close an iteration while unwinding from a panic");
        }
    }
}

/// Run `drain` on `it`, then close `it`.
///
/// An error from `drain` takes precedence over an error from closing.
fn drain_then_close<I, R, F>(it: I, drain: F) -> Result<R, I::Error>
where
    I: Iteration,
    F: FnOnce(&mut I) -> Result<R, I::Error>,
{
    let mut guard = CloseOnUnwind { it, armed: true };
    let outcome = drain(&mut guard.it);
    guard.armed = false;
    let closed = guard.it.close();
    match (outcome, closed) {
        (Ok(r), Ok(())) => Ok(r),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(_)) => {
            debug!("closing an iteration failed after draining it failed; reporting the first failure");
            Err(e)
        }
    }
}

/// Drain `it` into a `Vec`, in order, and close it.
///
/// # Example
///
/// ```
/// use iteration::{of_vec, sink};
///
/// let letters = sink::to_vec(of_vec::<_, void::Void>(vec!['a', 'b']));
/// assert_eq!(letters, Ok(vec!['a', 'b']));
/// ```
pub fn to_vec<I: Iteration>(it: I) -> Result<Vec<I::Item>, I::Error> {
    collect_into(it)
}

/// Drain `it` into a `HashSet`, and close it.
pub fn to_set<I>(it: I) -> Result<HashSet<I::Item>, I::Error>
where
    I: Iteration,
    I::Item: Eq + Hash,
{
    collect_into(it)
}

/// Drain `it` into any collection that can be extended, and close it.
pub fn collect_into<C, I>(it: I) -> Result<C, I::Error>
where
    I: Iteration,
    C: Default + Extend<I::Item>,
{
    drain_then_close(it, |it| {
        let mut out = C::default();
        while let Some(item) = it.try_next()? {
            out.extend(std::iter::once(item));
        }
        Ok(out)
    })
}

/// Drain `it`, close it, and return the number of elements it had.
pub fn count<I: Iteration>(it: I) -> Result<usize, I::Error> {
    for_each_counted(it, |_| ())
}

/// Call `f` on every element of `it`, in order, then close `it`.
///
/// Stops at the first failure.
pub fn for_each<I, F>(it: I, f: F) -> Result<(), I::Error>
where
    I: Iteration,
    F: FnMut(I::Item),
{
    for_each_counted(it, f).map(|_| ())
}

/// Helper: implement [`for_each`] and [`count`].
fn for_each_counted<I, F>(it: I, mut f: F) -> Result<usize, I::Error>
where
    I: Iteration,
    F: FnMut(I::Item),
{
    drain_then_close(it, |it| {
        let mut n = 0;
        while let Some(item) = it.try_next()? {
            f(item);
            n += 1;
        }
        Ok(n)
    })
}

/// Take the first element of `it` (if any), and close it.
///
/// The rest of `it` is never computed.
pub fn first<I: Iteration>(it: I) -> Result<Option<I::Item>, I::Error> {
    drain_then_close(it, |it| it.try_next())
}

/// Return true if `a` and `b` yield equal elements, in the same order, and
/// the same number of them.
///
/// Returns `false` as soon as a difference is found, without looking at the
/// rest of either iteration.
///
/// This does *not* close either iteration: the caller still owns both.
pub fn equals<A, B>(a: &mut A, b: &mut B) -> Result<bool, A::Error>
where
    A: Iteration,
    B: Iteration<Error = A::Error>,
    A::Item: PartialEq<B::Item>,
{
    loop {
        let Some(x) = a.try_next()? else {
            return Ok(!b.has_next()?);
        };
        let Some(y) = b.try_next()? else {
            return Ok(false);
        };
        if x != y {
            return Ok(false);
        }
    }
}

/// Return a `std` iterator over the elements of `it`.
///
/// Each element is yielded as `Ok`; if `it` fails, the error is yielded as
/// `Err`, and the iterator then ends.
///
/// The returned iterator does *not* close `it`, even when it runs out.  Get
/// `it` back with [`StdIter::into_inner`], or close it with
/// [`StdIter::close`].
///
/// # Example
///
/// ```
/// use iteration::{Iteration as _, of_vec, sink};
///
/// let mut iter = sink::into_std_iter(of_vec::<_, void::Void>(vec![1, 2, 3]));
/// let total: u32 = iter.by_ref().map(|r| r.unwrap_or_else(|v| void::unreachable(v))).sum();
/// assert_eq!(total, 6);
/// let mut it = iter.into_inner();
/// assert_eq!(it.close(), Ok(()));
/// ```
pub fn into_std_iter<I: Iteration>(it: I) -> StdIter<I> {
    StdIter {
        inner: it,
        finished: false,
    }
}

/// A `std` [`Iterator`] over the elements of an [`Iteration`].
///
/// Returned by [`into_std_iter`].
#[derive(Debug)]
pub struct StdIter<I> {
    /// The iteration we're reading from.
    inner: I,
    /// True once we've hit the end of `inner`, or an error.
    finished: bool,
}

impl<I: Iteration> StdIter<I> {
    /// Return the underlying iteration, without closing it.
    pub fn into_inner(self) -> I {
        self.inner
    }

    /// Return a reference to the underlying iteration.
    pub fn get_ref(&self) -> &I {
        &self.inner
    }

    /// Close the underlying iteration.
    ///
    /// This iterator yields nothing more afterwards.
    pub fn close(&mut self) -> Result<(), I::Error> {
        self.finished = true;
        self.inner.close()
    }
}

impl<I: Iteration> Iterator for StdIter<I> {
    type Item = Result<I::Item, I::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.inner.try_next() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<I: Iteration> FusedIterator for StdIter<I> {}

/// Close `it`, logging any failure instead of returning it.
///
/// For cleanup paths where there is nothing better to do with the error.
pub fn close_quietly<I>(mut it: I)
where
    I: Iteration,
    I::Error: StdError + 'static,
{
    if let Err(e) = it.close() {
        warn!("failed to close an iteration: {}", e.report());
    }
}

/// Close every iteration in `children`, returning every failure.
///
/// Every child is closed, even if closing an earlier one failed.  Failures
/// are reported with each child's position in `children`.
///
/// # Example
///
/// ```
/// use iteration::{IterationExt as _, from_fn_with_release, of_vec, sink};
///
/// let mut children = vec![
///     of_vec(vec![1]).boxed(),
///     from_fn_with_release(|| Ok(None), || Err(std::io::Error::other("stuck"))).boxed(),
/// ];
/// let errs = sink::close_all(&mut children).unwrap_err();
/// assert_eq!(errs.to_string(), "Unable to close iterations: resource #1: stuck");
/// ```
pub fn close_all<C>(children: C) -> Result<(), CloseErrors<<C::Item as Iteration>::Error>>
where
    C: IntoIterator,
    C::Item: Iteration,
{
    let mut errs = CloseErrors::while_closing("iterations");
    for (idx, mut child) in children.into_iter().enumerate() {
        if let Err(e) = child.close() {
            errs.push_indexed(idx, e);
        }
    }
    errs.into_result()
}

#[cfg(test)]
mod test {
    // @@ begin test lint list maintained by maint/add_warning @@
    #![allow(clippy::bool_assert_comparison)]
    #![allow(clippy::clone_on_copy)]
    #![allow(clippy::dbg_macro)]
    #![allow(clippy::mixed_attributes_style)]
    #![allow(clippy::print_stderr)]
    #![allow(clippy::print_stdout)]
    #![allow(clippy::single_char_pattern)]
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::unchecked_time_subtraction)]
    #![allow(clippy::useless_vec)]
    #![allow(clippy::needless_pass_by_value)]
    //! <!-- @@ end test lint list maintained by maint/add_warning @@ -->
    use super::*;
    use crate::testing::{Probe, ProbeError, testing_rng};
    use crate::{IterationExt as _, NextError, of_vec};
    use rand::Rng as _;
    use std::collections::BTreeSet;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use tracing_test::traced_test;

    #[test]
    fn collections() {
        let (probe, handle) = Probe::new(vec![3, 1, 3]).with_handle();
        assert_eq!(to_vec(probe), Ok(vec![3, 1, 3]));
        assert_eq!(handle.releases(), 1);

        let set = to_set(Probe::new(vec![3, 1, 3])).unwrap();
        assert_eq!(set, HashSet::from([1, 3]));

        let tree: BTreeSet<_> = collect_into(Probe::new(vec!["b", "a", "b"])).unwrap();
        assert_eq!(tree.into_iter().collect::<Vec<_>>(), ["a", "b"]);

        let s: String = collect_into(Probe::new(vec!['h', 'i'])).unwrap();
        assert_eq!(s, "hi");
    }

    #[test]
    fn empty_sources() {
        assert_eq!(to_vec(Probe::<u8>::new(vec![])), Ok(vec![]));
        assert_eq!(count(Probe::<u8>::new(vec![])), Ok(0));
        assert_eq!(first(Probe::<u8>::new(vec![])), Ok(None));
        assert_eq!(into_std_iter(Probe::<u8>::new(vec![])).count(), 0);
    }

    #[test]
    fn counting_and_visiting() {
        let (probe, handle) = Probe::new(vec!['x'; 7]).with_handle();
        assert_eq!(count(probe), Ok(7));
        assert_eq!(handle.releases(), 1);

        let mut seen = vec![];
        for_each(Probe::new(vec![1, 2, 3]), |n| seen.push(n * n)).unwrap();
        assert_eq!(seen, [1, 4, 9]);
    }

    #[test]
    fn first_does_not_drain() {
        let (probe, handle) = Probe::new(vec![1, 2, 3]).with_handle();
        assert_eq!(first(probe), Ok(Some(1)));
        assert_eq!(handle.computed(), 1);
        assert_eq!(handle.releases(), 1);
    }

    #[test]
    fn closed_even_after_failure() {
        let (probe, handle) = Probe::new(vec![1, 2, 3]).fail_at(1).with_handle();
        assert_eq!(to_vec(probe), Err(ProbeError::Element(1)));
        assert_eq!(handle.releases(), 1);

        let (probe, handle) = Probe::new(vec![1, 2]).fail_on_close().with_handle();
        assert_eq!(count(probe), Err(ProbeError::Close));
        assert_eq!(handle.releases(), 1);
    }

    #[test]
    fn closed_when_callback_panics() {
        let (probe, handle) = Probe::new(vec![1, 2, 3]).with_handle();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            for_each(probe, |n| {
                if n == 2 {
                    panic!("gave up at {}", n);
                }
            })
        }));
        assert!(outcome.is_err());
        assert_eq!(handle.releases(), 1);
        assert_eq!(handle.close_calls(), 1);

        // A panic inside a combinator in the drained chain.
        let (probe, handle) = Probe::new(vec![1, 2, 3]).with_handle();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            to_vec(probe.filter(|n| {
                assert!(*n < 3, "unexpected element");
                true
            }))
        }));
        assert!(outcome.is_err());
        assert_eq!(handle.releases(), 1);
    }

    #[test]
    #[traced_test]
    fn panic_then_failed_close() {
        let (probe, handle) = Probe::new(vec![1]).fail_on_close().with_handle();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            count(probe.map(|_: i32| -> i32 { panic!("no") }))
        }));
        assert!(outcome.is_err());
        assert_eq!(handle.releases(), 1);
        assert!(logs_contain("while unwinding from a panic"));
    }

    #[test]
    #[traced_test]
    fn drain_error_wins() {
        let probe = Probe::new(vec![1, 2]).fail_at(0).fail_on_close();
        let mut seen = 0;
        assert_eq!(
            for_each(probe, |_| seen += 1),
            Err(ProbeError::Element(0))
        );
        assert_eq!(seen, 0);
        assert!(logs_contain("after draining it failed"));
    }

    #[test]
    fn by_reference() {
        let (probe, handle) = Probe::new(vec![1, 2, 3]).with_handle();
        let mut it = probe.peekable();
        assert_eq!(first(&mut it), Ok(Some(1)));
        assert_eq!(handle.releases(), 1);
        // It was closed through the reference.
        assert_eq!(it.has_next(), Ok(false));
    }

    #[test]
    fn equality() {
        /// Compare two vectors through `equals`.
        fn eq(a: Vec<i32>, b: Vec<i32>) -> bool {
            let (mut a, a_handle) = Probe::new(a).with_handle();
            let mut b = Probe::new(b);
            let result = equals(&mut a, &mut b).unwrap();
            assert_eq!(a_handle.releases(), 0);
            a.close().unwrap();
            b.close().unwrap();
            result
        }

        assert!(eq(vec![], vec![]));
        assert!(eq(vec![1, 2], vec![1, 2]));
        assert!(!eq(vec![1, 2], vec![1, 3]));
        assert!(!eq(vec![1, 2], vec![1]));
        assert!(!eq(vec![1], vec![1, 2]));
        assert!(!eq(vec![], vec![0]));

        let mut a = Probe::new(vec![1, 2]).fail_at(1);
        let mut b = Probe::new(vec![1, 2]);
        assert_eq!(equals(&mut a, &mut b), Err(ProbeError::Element(1)));
    }

    #[test]
    fn equals_stops_at_first_difference() {
        let (mut a, a_handle) = Probe::new(vec![1, 9, 3, 4]).with_handle();
        let mut b = of_vec::<_, ProbeError>(vec![1, 2, 3, 4]);
        assert_eq!(equals(&mut a, &mut b), Ok(false));
        assert_eq!(a_handle.computed(), 2);
        // The rest is still there.
        assert_eq!(a.next(), Ok(3));
        assert_eq!(b.next(), Ok(3));
    }

    #[test]
    fn std_iter() {
        let (probe, handle) = Probe::new(vec![1, 2, 3]).fail_at(2).with_handle();
        let mut iter = into_std_iter(probe);
        assert_eq!(iter.next(), Some(Ok(1)));
        assert_eq!(iter.next(), Some(Ok(2)));
        assert_eq!(iter.next(), Some(Err(ProbeError::Element(2))));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
        assert_eq!(handle.releases(), 0);
        iter.close().unwrap();
        assert_eq!(handle.releases(), 1);
        assert_eq!(iter.next(), None);

        let (probe, handle) = Probe::new(vec!['a', 'b']).with_handle();
        let mut iter = into_std_iter(probe);
        let collected: Result<String, _> = iter.by_ref().collect();
        assert_eq!(collected.unwrap(), "ab");
        assert_eq!(handle.releases(), 0);
        let mut probe = iter.into_inner();
        assert_eq!(probe.next(), Err(NextError::Exhausted));
        probe.close().unwrap();
        assert_eq!(handle.releases(), 1);
    }

    #[test]
    fn std_round_trip() {
        let mut rng = testing_rng();
        for _ in 0..50 {
            let len = rng.random_range(0..30);
            let input: Vec<u64> = (0..len).map(|_| rng.random()).collect();
            let out: Result<Vec<u64>, ProbeError> =
                into_std_iter(Probe::new(input.clone())).collect();
            assert_eq!(out.unwrap(), input);
        }
    }

    #[test]
    #[traced_test]
    fn quietly() {
        let (probe, handle) = Probe::new(vec![1]).fail_on_close().with_handle();
        close_quietly(probe);
        assert_eq!(handle.releases(), 1);
        assert!(logs_contain(
            "failed to close an iteration: error: injected failure while closing"
        ));

        close_quietly(Probe::new(vec![1]));
        logs_assert(|lines| {
            match lines.iter().filter(|l| l.contains("failed to close")).count() {
                1 => Ok(()),
                n => Err(format!("expected one warning, found {}", n)),
            }
        });
    }

    #[test]
    fn close_every_child() {
        let mut children: Vec<_> = (0..5)
            .map(|i| {
                let p = Probe::new(vec![i]);
                let p = if i == 1 || i == 4 { p.fail_on_close() } else { p };
                p.with_handle()
            })
            .collect();
        let handles: Vec<_> = children.iter().map(|(_, h)| h.clone()).collect();
        let errs = close_all(children.iter_mut().map(|(p, _)| p)).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert_eq!(
            errs.to_string(),
            "Unable to close iterations: 2 failures\n\
             Resource #1: injected failure while closing\n\
             Resource #4: injected failure while closing"
        );
        assert!(handles.iter().all(|h| h.releases() == 1));

        // Closing again is fine: every child is already closed.
        assert!(close_all(children.iter_mut().map(|(p, _)| p)).is_ok());
    }
}
