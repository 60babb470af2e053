//! Implement [`Unique`], which skips elements that were already seen.

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::hash::Hash;

use crate::Iteration;
use crate::lazy::{Compute, Lazy, delegate_to_lazy};

/// The [`Compute`] behind a [`Unique`].
#[derive(Debug)]
struct Deduplicating<I: Iteration> {
    /// The iteration we're taking elements from.
    inner: I,
    /// Every element we have yielded so far.
    seen: HashSet<I::Item>,
}

impl<I> Compute for Deduplicating<I>
where
    I: Iteration,
    I::Item: Eq + Hash + Clone,
{
    type Item = I::Item;
    type Error = I::Error;

    fn compute_next(&mut self) -> Result<Option<I::Item>, I::Error> {
        while let Some(item) = self.inner.try_next()? {
            if !self.seen.contains(&item) {
                self.seen.insert(item.clone());
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn release(&mut self) -> Result<(), I::Error> {
        self.seen = HashSet::new();
        self.inner.close()
    }
}

/// An [`Iteration`] that yields each distinct element of another iteration
/// once, the first time it appears.
///
/// Returned by [`IterationExt::unique`](crate::IterationExt::unique).
///
/// Remembers every element it has yielded, so its memory use grows with the
/// number of distinct elements.  The memory is freed when it is closed.
pub struct Unique<I>(Lazy<Deduplicating<I>>)
where
    I: Iteration,
    I::Item: Eq + Hash + Clone;

impl<I> Unique<I>
where
    I: Iteration,
    I::Item: Eq + Hash + Clone,
{
    /// Return a new `Unique` over `inner`.
    pub(crate) fn new(inner: I) -> Self {
        Unique(Lazy::new(Deduplicating {
            inner,
            seen: HashSet::new(),
        }))
    }

    /// Return the number of distinct elements yielded so far.
    pub fn n_seen(&self) -> usize {
        self.0.get_ref().seen.len()
    }
}

impl<I> Debug for Unique<I>
where
    I: Iteration + Debug,
    I::Item: Eq + Hash + Clone + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Unique").field(&self.0).finish()
    }
}

delegate_to_lazy! {
    Unique [I] where [I: Iteration, I::Item: Eq + Hash + Clone]
    item = I::Item, error = I::Error
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
    use crate::{IterationExt as _, NextError, sink};
    use rand::Rng as _;

    #[test]
    fn first_occurrences() {
        let (probe, handle) = Probe::new(vec![3, 1, 3, 2, 1]).with_handle();
        assert_eq!(sink::to_vec(probe.unique()), Ok(vec![3, 1, 2]));
        assert_eq!(handle.releases(), 1);
    }

    #[test]
    fn all_the_same() {
        let mut it = Probe::new(vec!["z"; 10]).unique();
        assert_eq!(it.next(), Ok("z"));
        assert_eq!(it.has_next(), Ok(false));
        assert_eq!(it.next(), Err(NextError::Exhausted));
        assert_eq!(it.n_seen(), 1);
        it.close().unwrap();
        assert_eq!(it.n_seen(), 0);
    }

    #[test]
    fn failure_after_duplicates() {
        let mut it = Probe::new(vec![1, 1, 1, 2]).fail_at(2).unique();
        assert_eq!(it.next(), Ok(1));
        assert_eq!(it.next(), Err(NextError::Failed(ProbeError::Element(2))));
        assert_eq!(it.has_next(), Ok(false));
        it.close().unwrap();
    }

    #[test]
    fn close_twice() {
        let (probe, handle) = Probe::new(vec![4, 4, 5]).with_handle();
        let mut it = probe.unique();
        assert_eq!(it.next(), Ok(4));
        it.close().unwrap();
        it.close().unwrap();
        assert_eq!(handle.releases(), 1);
        assert_eq!(it.n_seen(), 0);
        assert_eq!(it.has_next(), Ok(false));
    }

    #[test]
    fn random_sequences() {
        let mut rng = testing_rng();
        for _ in 0..100 {
            let len = rng.random_range(0..50);
            let input: Vec<u8> = (0..len).map(|_| rng.random_range(0..10)).collect();

            let got = sink::to_vec(Probe::new(input.clone()).unique()).unwrap();

            let mut expected = vec![];
            for n in input {
                if !expected.contains(&n) {
                    expected.push(n);
                }
            }
            assert_eq!(got, expected);
        }
    }
}
