//! Implement [`Limit`], which stops after a fixed number of elements.

use crate::{Iteration, NextError};

/// An [`Iteration`] that yields at most a fixed number of elements of another.
///
/// Returned by [`IterationExt::limit`](crate::IterationExt::limit).
///
/// Once the limit is reached, the inner iteration is not asked for any more
/// elements, so nothing past the limit is ever computed.  The inner
/// iteration is still open at that point; closing the `Limit` closes it.
#[derive(Debug)]
pub struct Limit<I> {
    /// The iteration we're taking elements from.
    inner: I,
    /// How many more elements we may yield.
    remaining: usize,
}

impl<I> Limit<I> {
    /// Return a new `Limit` that yields no more than `n` elements of `inner`.
    pub(crate) fn new(inner: I, n: usize) -> Self {
        Limit {
            inner,
            remaining: n,
        }
    }

    /// Return the number of elements this `Limit` may still yield.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<I: Iteration> Iteration for Limit<I> {
    type Item = I::Item;
    type Error = I::Error;

    fn has_next(&mut self) -> Result<bool, I::Error> {
        if self.remaining == 0 {
            return Ok(false);
        }
        self.inner.has_next()
    }

    fn next(&mut self) -> Result<I::Item, NextError<I::Error>> {
        if self.remaining == 0 {
            return Err(NextError::Exhausted);
        }
        let item = self.inner.next()?;
        self.remaining -= 1;
        Ok(item)
    }

    fn close(&mut self) -> Result<(), I::Error> {
        self.remaining = 0;
        self.inner.close()
    }
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
    use crate::testing::{Probe, ProbeError};
    use crate::{IterationExt as _, sink};

    #[test]
    fn stops_pulling() {
        let (probe, handle) = Probe::new(vec![1, 2, 3, 4]).with_handle();
        let mut it = probe.limit(2);
        assert_eq!(it.next(), Ok(1));
        assert_eq!(it.remaining(), 1);
        assert_eq!(it.next(), Ok(2));
        assert_eq!(it.has_next(), Ok(false));
        assert_eq!(it.next(), Err(NextError::Exhausted));
        assert_eq!(handle.computed(), 2);
        assert_eq!(handle.releases(), 0);
        it.close().unwrap();
        assert_eq!(handle.releases(), 1);
    }

    #[test]
    fn short_inner() {
        let (probe, handle) = Probe::new(vec!['a']).with_handle();
        assert_eq!(sink::to_vec(probe.limit(5)), Ok(vec!['a']));
        assert_eq!(handle.releases(), 1);

        let (probe, handle) = Probe::new(vec!['a']).with_handle();
        assert_eq!(sink::count(probe.limit(0)), Ok(0));
        assert_eq!(handle.computed(), 0);
        assert_eq!(handle.releases(), 1);
    }

    #[test]
    fn failure_counts_nothing() {
        let mut it = Probe::new(vec![1, 2, 3]).fail_at(0).limit(1);
        assert_eq!(it.next(), Err(NextError::Failed(ProbeError::Element(0))));
        assert_eq!(it.remaining(), 1);
        assert_eq!(it.has_next(), Ok(false));
        it.close().unwrap();
        assert_eq!(it.remaining(), 0);
    }

    #[test]
    fn close_twice() {
        let (probe, handle) = Probe::new(vec![1, 2, 3]).with_handle();
        let mut it = probe.limit(2);
        assert_eq!(it.next(), Ok(1));
        it.close().unwrap();
        it.close().unwrap();
        assert_eq!(handle.releases(), 1);
        assert_eq!(handle.close_calls(), 2);
        assert_eq!(it.has_next(), Ok(false));
    }
}
