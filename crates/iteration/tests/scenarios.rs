//! End-to-end checks of producers, combinators and sinks working together.

use std::cell::Cell;
use std::rc::Rc;

use iteration::{
    Iteration, IterationExt as _, NextError, concat, empty, from_fn, from_fn_with_release,
    of_array, of_vec, once, sink,
};
use void::Void;

/// A declared error for the producers below.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
#[error("row {0} is corrupt")]
struct Corrupt(usize);

/// Return a producer over `items` and a count of how many times it has
/// released its resources.
fn tracked(items: Vec<i32>) -> (impl Iteration<Item = i32, Error = Corrupt>, Rc<Cell<usize>>) {
    let released = Rc::new(Cell::new(0));
    let counter = Rc::clone(&released);
    let mut items = items.into_iter();
    let it = from_fn_with_release(
        move || Ok(items.next()),
        move || {
            counter.set(counter.get() + 1);
            Ok(())
        },
    );
    (it, released)
}

#[test]
fn filter_evens() {
    let evens = of_array::<_, Void, 5>([1, 2, 3, 4, 5]).filter(|n| n % 2 == 0);
    assert_eq!(sink::to_vec(evens), Ok(vec![2, 4]));
}

#[test]
fn transform_lengths() {
    let lens = of_vec::<_, Void>(vec!["a", "bb", "ccc"]).map(str::len);
    assert_eq!(sink::to_vec(lens), Ok(vec![1, 2, 3]));
}

#[test]
fn concatenate_and_close_children() {
    let (children, released): (Vec<_>, Vec<_>) =
        [vec![1, 2], vec![], vec![3]].into_iter().map(tracked).unzip();
    assert_eq!(sink::to_vec(concat(children)), Ok(vec![1, 2, 3]));
    for r in &released {
        assert_eq!(r.get(), 1);
    }
}

#[test]
fn early_close_of_concatenation() {
    let (children, released): (Vec<_>, Vec<_>) =
        [vec![1, 2], vec![3], vec![4]].into_iter().map(tracked).unzip();
    let mut it = concat(children);
    assert_eq!(it.next(), Ok(1));
    it.close().unwrap();
    it.close().unwrap();
    for r in &released {
        assert_eq!(r.get(), 1);
    }
}

#[test]
fn zero_children() {
    let mut it = concat(Vec::<iteration::Empty<u8, Void>>::new());
    assert_eq!(it.has_next(), Ok(false));
    assert!(matches!(it.next(), Err(NextError::Exhausted)));
}

#[test]
fn unique_first_occurrences() {
    let it = of_vec::<_, Void>(vec![1, 1, 2, 2, 3]).unique();
    assert_eq!(sink::to_vec(it), Ok(vec![1, 2, 3]));
}

#[test]
fn equality() {
    let mut a = of_vec::<_, Void>(vec![1, 2, 3]);
    let mut b = of_vec::<_, Void>(vec![1, 2, 3]);
    assert_eq!(sink::equals(&mut a, &mut b), Ok(true));

    let mut a = of_vec::<_, Void>(vec![1, 2, 3]);
    let mut b = of_vec::<_, Void>(vec![1, 2]);
    assert_eq!(sink::equals(&mut a, &mut b), Ok(false));
}

#[test]
fn failure_on_third_element() {
    let mut n = 0;
    let mut it = from_fn(|| {
        n += 1;
        if n == 3 { Err(Corrupt(n)) } else { Ok(Some(n)) }
    });

    assert_eq!(it.has_next(), Ok(true));
    assert_eq!(it.next(), Ok(1));
    assert_eq!(it.has_next(), Ok(true));
    assert_eq!(it.next(), Ok(2));
    assert_eq!(it.has_next(), Err(Corrupt(3)));
    assert_eq!(it.close(), Ok(()));

    let mut n = 0;
    let mut it = from_fn(|| {
        n += 1;
        if n == 3 { Err(Corrupt(n)) } else { Ok(Some(n)) }
    });
    assert_eq!(it.next(), Ok(1));
    assert_eq!(it.next(), Ok(2));
    assert_eq!(it.next(), Err(NextError::Failed(Corrupt(3))));
    assert_eq!(it.close(), Ok(()));
}

#[test]
fn empty_sources() {
    assert_eq!(sink::to_vec(empty::<u8, Void>()), Ok(vec![]));
    assert_eq!(sink::count(of_vec::<u8, Void>(vec![])), Ok(0));

    let mut single = once::<_, Void>("x");
    assert_eq!(single.next(), Ok("x"));
    assert!(matches!(single.next(), Err(NextError::Exhausted)));
}

#[test]
fn has_next_is_idempotent() {
    let calls = Cell::new(0);
    let mut it = from_fn(|| {
        calls.set(calls.get() + 1);
        Ok::<_, Void>(if calls.get() <= 2 { Some(calls.get()) } else { None })
    });
    for _ in 0..10 {
        assert_eq!(it.has_next(), Ok(true));
    }
    assert_eq!(calls.get(), 1);
    assert_eq!(it.next(), Ok(1));
    assert_eq!(it.next(), Ok(2));
    assert_eq!(it.has_next(), Ok(false));
    assert_eq!(it.has_next(), Ok(false));
    assert_eq!(calls.get(), 3);
}

#[test]
fn std_round_trip() {
    let input = vec![4, 8, 15, 16, 23, 42];
    let iter = sink::into_std_iter(iteration::from_iter(input.clone()));
    let output: Result<Vec<_>, Void> = iter.collect();
    assert_eq!(output, Ok(input));
}
