//! Helpers for testing code that uses iterations.
//!
//! This module is only available with the `testing` feature.
//!
//! [`Probe`] is an iteration over a vector that keeps count of what was done
//! to it, and can be told to fail.  [`testing_rng`] returns a PRNG for
//! randomized tests, whose seed can be fixed from the environment.

// We allow printing to stdout and stderr in this module, since it's intended to
// be used by tests, where this is the preferred means of communication with the user.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::{self, Debug};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::{RngCore, SeedableRng};
use thiserror::Error;

use crate::lazy::{Compute, Lazy};
use crate::{Iteration, NextError};

/// An error injected by a [`Probe`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ProbeError {
    /// The probe was told to fail when computing the element at this index.
    #[error("injected failure at element {0}")]
    Element(usize),
    /// The probe was told to fail when it is closed.
    #[error("injected failure while closing")]
    Close,
}

/// Counters shared between a [`Probe`] and its [`ProbeHandle`]s.
#[derive(Debug, Default)]
struct Counters {
    /// Number of elements computed (including the final end-of-data).
    computed: AtomicUsize,
    /// Number of times resources were released.
    releases: AtomicUsize,
    /// Number of calls to `close`.
    close_calls: AtomicUsize,
}

/// The [`Compute`] behind a [`Probe`].
struct Script<T> {
    /// The elements not yet computed.
    items: std::vec::IntoIter<T>,
    /// Index of the next element.
    position: usize,
    /// If set, computing the element at this index fails.
    fail_at: Option<usize>,
    /// If true, releasing fails.
    fail_on_close: bool,
    /// What has happened so far.
    counters: Arc<Counters>,
}

impl<T> Compute for Script<T> {
    type Item = T;
    type Error = ProbeError;

    fn compute_next(&mut self) -> Result<Option<T>, ProbeError> {
        self.counters.computed.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(self.position) {
            return Err(ProbeError::Element(self.position));
        }
        let item = self.items.next();
        if item.is_some() {
            self.position += 1;
        }
        Ok(item)
    }

    fn release(&mut self) -> Result<(), ProbeError> {
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_close {
            Err(ProbeError::Close)
        } else {
            Ok(())
        }
    }
}

/// An [`Iteration`] over a vector, for tests.
///
/// A probe records how many elements it has computed, how many times it has
/// been closed, and how many times it has actually released its resources;
/// use [`with_handle`](Probe::with_handle) to read those counts after the
/// probe has been handed to a combinator.
pub struct Probe<T>(Lazy<Script<T>>);

impl<T> Probe<T> {
    /// Return a new probe that yields `items`.
    pub fn new(items: Vec<T>) -> Self {
        Probe(Lazy::new(Script {
            items: items.into_iter(),
            position: 0,
            fail_at: None,
            fail_on_close: false,
            counters: Arc::default(),
        }))
    }

    /// Make this probe fail with [`ProbeError::Element`] instead of computing
    /// the element at `index`.
    ///
    /// An `index` equal to the number of elements makes the probe fail
    /// instead of reporting end-of-data.
    pub fn fail_at(mut self, index: usize) -> Self {
        self.0.get_mut().fail_at = Some(index);
        self
    }

    /// Make this probe fail with [`ProbeError::Close`] when it releases its
    /// resources.
    pub fn fail_on_close(mut self) -> Self {
        self.0.get_mut().fail_on_close = true;
        self
    }

    /// Return this probe, and a handle to observe it.
    pub fn with_handle(self) -> (Self, ProbeHandle) {
        let handle = ProbeHandle(Arc::clone(&self.0.get_ref().counters));
        (self, handle)
    }
}

impl<T> Iteration for Probe<T> {
    type Item = T;
    type Error = ProbeError;

    fn has_next(&mut self) -> Result<bool, ProbeError> {
        self.0.has_next()
    }

    fn next(&mut self) -> Result<T, NextError<ProbeError>> {
        self.0.next()
    }

    fn close(&mut self) -> Result<(), ProbeError> {
        self.0
            .get_ref()
            .counters
            .close_calls
            .fetch_add(1, Ordering::SeqCst);
        self.0.close()
    }
}

impl<T: Debug> Debug for Probe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let script = self.0.get_ref();
        f.debug_struct("Probe")
            .field("remaining", &script.items.as_slice())
            .field("closed", &self.0.is_closed())
            .finish_non_exhaustive()
    }
}

/// A handle to observe a [`Probe`].
#[derive(Clone, Debug)]
pub struct ProbeHandle(Arc<Counters>);

impl ProbeHandle {
    /// Return the number of times the probe was asked to compute an element.
    ///
    /// This includes the computation that discovered end-of-data, and any
    /// that failed.
    pub fn computed(&self) -> usize {
        self.0.computed.load(Ordering::SeqCst)
    }

    /// Return the number of times the probe released its resources.
    ///
    /// For a correctly closed probe, this is exactly 1.
    pub fn releases(&self) -> usize {
        self.0.releases.load(Ordering::SeqCst)
    }

    /// Return the number of times `close` was called on the probe.
    pub fn close_calls(&self) -> usize {
        self.0.close_calls.load(Ordering::SeqCst)
    }
}

// Named explicitly (not `StdRng`) so that a seed keeps reproducing the same
// values after `rand` upgrades.
pub use rand_chacha::ChaCha12Rng as TestingRng;

/// The seed type for the RNG we're returning.
type Seed = <TestingRng as SeedableRng>::Seed;

/// Default seed for deterministic RNG usage.
const DEFAULT_SEED: Seed = *b"iteration tests, fixed seed #001";

/// The environment variable that we inspect.
const PRNG_VAR: &str = "ITERATION_TEST_PRNG";

/// Return a new, possibly deterministic, RNG for use in tests.
///
/// The type of this RNG will depend on the value of `ITERATION_TEST_PRNG`:
///   * If it is `random` or unset, we'll use a randomly seeded PRNG.
///   * If it is `deterministic`, we'll use a fixed seed.
///   * If it is a hexadecimal string, we'll use that as the seed.
///
/// The seed is printed to stdout, so that a failing test can be reproduced.
///
/// This function is **only** for testing.
///
/// # Panics
///
/// Panics if the environment variable is set to an invalid value.
pub fn testing_rng() -> TestingRng {
    Config::from_env().unwrap_or(Config::Random).into_rng()
}

/// How to seed a [`TestingRng`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[non_exhaustive]
pub enum Config {
    /// Use a randomly chosen seed.
    Random,
    /// Use a fixed, pre-selected seed.
    Deterministic,
    /// Use this seed.
    Seeded(Seed),
}

impl Config {
    /// Return the configuration from the environment, if one is set.
    ///
    /// # Panics
    ///
    /// Panics if the environment variable is set to an invalid value.
    pub fn from_env() -> Option<Self> {
        match Self::from_env_result(std::env::var(PRNG_VAR)) {
            Ok(c) => c,
            Err(e) => {
                panic!(
                    "Bad value for {}: {}\n\
                    We recognize `random`, `deterministic`, or a hexadecimal seed.",
                    PRNG_VAR, e
                );
            }
        }
    }

    /// Read the configuration from the result of `std::env::var()`.
    fn from_env_result(
        var: Result<String, std::env::VarError>,
    ) -> Result<Option<Self>, ConfigError> {
        match var {
            Ok(s) if s.is_empty() => Ok(None),
            Ok(s) => Ok(Some(s.parse()?)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidUnicode),
        }
    }

    /// Consume this `Config` and return a seed.
    fn into_seed(self) -> Seed {
        match self {
            Config::Deterministic => DEFAULT_SEED,
            Config::Seeded(seed) => seed,
            Config::Random => {
                let mut seed = Seed::default();
                rand::rng().fill_bytes(&mut seed[..]);
                seed
            }
        }
    }

    /// Consume this `Config` and return a `TestingRng`.
    pub fn into_rng(self) -> TestingRng {
        let seed = self.into_seed();
        println!("  Using RNG seed {}={}", PRNG_VAR, hex::encode(seed));
        TestingRng::from_seed(seed)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    /// Read the configuration from a string, as described in [`testing_rng`].
    fn from_str(s: &str) -> Result<Self, ConfigError> {
        Ok(match s {
            "random" => Self::Random,
            "deterministic" => Self::Deterministic,
            _ => Self::Seeded(
                decode_seed_bytes(s).ok_or_else(|| ConfigError::UnrecognizedValue(s.into()))?,
            ),
        })
    }
}

/// Decode a hexadecimal seed, truncating or zero-extending it as needed.
fn decode_seed_bytes(s: &str) -> Option<Seed> {
    if s.is_empty() {
        return None;
    }
    let bytes = hex::decode(s).ok()?;
    let mut seed = Seed::default();
    let n = std::cmp::min(seed.len(), bytes.len());
    seed[..n].copy_from_slice(&bytes[..n]);
    Some(seed)
}

/// An error from trying to decode a [`Config`] from a string.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// We got a value that wasn't unicode.
    #[error("Value was not UTF-8")]
    InvalidUnicode,
    /// We got a value that we otherwise couldn't decode.
    #[error("Could not interpret {0:?} as a PRNG seed.")]
    UnrecognizedValue(String),
}
