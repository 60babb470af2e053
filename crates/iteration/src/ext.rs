//! Extension trait for building chains of combinators.

use std::hash::Hash;

use crate::{
    BoxIteration, Concat, Filter, Iteration, Limit, Map, MapErr, Peekable, TranslateErr, Unique,
    Untranslated, concat,
};

/// Extension trait providing combinators on every [`Iteration`].
///
/// Every method takes the iteration by value: the combinator it returns
/// becomes the owner, and closing the combinator closes it.
///
/// # Example
///
/// ```
/// use iteration::{IterationExt as _, of_vec, sink};
///
/// let words = of_vec::<_, void::Void>(vec!["ab", "c", "ab", "def", "c"]);
/// let lens = words.unique().filter(|w| w.len() > 1).map(str::len);
/// assert_eq!(sink::to_vec(lens), Ok(vec![2, 3]));
/// ```
pub trait IterationExt: Iteration {
    /// Return an iteration over the elements of this one that satisfy `pred`.
    fn filter<P>(self, pred: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        Filter::new(self, pred)
    }

    /// Return an iteration that applies `f` to every element of this one.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U,
    {
        Map::new(self, f)
    }

    /// Return an iteration that applies `f` to every error of this one.
    fn map_err<F, E2>(self, f: F) -> MapErr<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Error) -> E2,
    {
        MapErr::new(self, f)
    }

    /// Return an iteration that translates the errors of this one with `f`,
    /// wrapping any error that `f` declines in [`Untranslated`].
    ///
    /// See [`TranslateErr`].
    fn translate_err<F, E2>(self, f: F) -> TranslateErr<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Error) -> Result<E2, Self::Error>,
        E2: From<Untranslated<Self::Error>>,
    {
        TranslateErr::new(self, f)
    }

    /// Return an iteration over the distinct elements of this one, in order
    /// of first appearance.
    fn unique(self) -> Unique<Self>
    where
        Self: Sized,
        Self::Item: Eq + Hash + Clone,
    {
        Unique::new(self)
    }

    /// Return an iteration that lets callers peek at its next element.
    fn peekable(self) -> Peekable<Self>
    where
        Self: Sized,
    {
        Peekable::new(self)
    }

    /// Return an iteration over at most the first `n` elements of this one.
    fn limit(self, n: usize) -> Limit<Self>
    where
        Self: Sized,
    {
        Limit::new(self, n)
    }

    /// Return an iteration over the elements of this one, followed by the
    /// elements of `other`.
    ///
    /// Both must have the same type; use [`boxed`](IterationExt::boxed) or
    /// [`concat`] to join iterations of different types.
    fn chain(self, other: Self) -> Concat<std::array::IntoIter<Self, 2>>
    where
        Self: Sized,
    {
        concat([self, other])
    }

    /// Return this iteration as a boxed trait object.
    fn boxed<'a>(self) -> BoxIteration<'a, Self::Item, Self::Error>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<I: Iteration> IterationExt for I {}
