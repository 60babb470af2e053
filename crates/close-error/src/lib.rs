#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
// @@ begin lint list maintained by maint/add_warning @@
#![allow(renamed_and_removed_lints)]
#![allow(unknown_lints)]
#![warn(missing_docs)]
#![warn(noop_method_call)]
#![warn(unreachable_pub)]
#![warn(clippy::all)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::cargo_common_metadata)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::checked_conversions)]
#![warn(clippy::cognitive_complexity)]
#![deny(clippy::debug_assert_with_mut_call)]
#![deny(clippy::exhaustive_enums)]
#![deny(clippy::exhaustive_structs)]
#![deny(clippy::expl_impl_clone_on_copy)]
#![deny(clippy::fallible_impl_from)]
#![deny(clippy::implicit_clone)]
#![deny(clippy::large_stack_arrays)]
#![warn(clippy::manual_ok_or)]
#![deny(clippy::missing_docs_in_private_items)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::option_option)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![warn(clippy::rc_buffer)]
#![deny(clippy::ref_option_ref)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::trait_duplication_in_bounds)]
#![deny(clippy::unnecessary_wraps)]
#![warn(clippy::unseparated_literal_suffix)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::mod_module_files)]
#![allow(clippy::let_unit_value)] // This can reasonably be done for explicitness
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::result_large_err)]
#![allow(clippy::needless_lifetimes)]
//! <!-- @@ end lint list maintained by maint/add_warning @@ -->

mod report;

pub use report::{ErrorReport, Report, ReportHelper};

use std::error::Error;
use std::fmt::{self, Display, Error as FmtError, Formatter};
use std::iter;

/// An error type for use when we're closing several resources,
/// and more than one of them might fail to close.
///
/// To use this error type, create a new `CloseErrors` before you start the
/// cleanup pass.  Then, every time closing a resource fails, use
/// [`CloseErrors::push()`] (or [`CloseErrors::push_indexed()`]) to record the
/// failure, and *keep going* with the remaining resources.  At the end, use
/// [`CloseErrors::into_result()`] to find out whether the pass succeeded.
///
/// Failures are kept in the order in which they were recorded.
#[derive(Debug, Clone)]
pub struct CloseErrors<E> {
    /// A short description of what we were closing.
    closing: String,
    /// The failures we encountered, with the resource each belongs to.
    errors: Vec<(Resource, E)>,
}

/// Which resource a recorded failure belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Resource {
    /// The caller didn't say; this is the n'th failure (counting from 1).
    Nth(usize),
    /// The resource at this position in the caller's collection.
    Indexed(usize),
}

impl<E: Error + 'static> Error for CloseErrors<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.errors[..] {
            [(_, e)] => Some(e),
            _ => None,
        }
    }
}

impl<E> Default for CloseErrors<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> CloseErrors<E> {
    /// Create a new `CloseErrors` with no failures, describing what is being
    /// closed as "resources".
    pub fn new() -> Self {
        Self::while_closing("resources")
    }

    /// Create a new `CloseErrors` with no failures.
    ///
    /// The `closing` argument is a short phrase describing what is being
    /// closed; it is used to format the final error message, and should be
    /// something that can follow "Unable to close".
    pub fn while_closing<T: Into<String>>(closing: T) -> Self {
        CloseErrors {
            closing: closing.into(),
            errors: Vec::new(),
        }
    }

    /// Record a failure to close some resource.
    pub fn push<T>(&mut self, err: T)
    where
        T: Into<E>,
    {
        let nth = self.errors.len() + 1;
        self.errors.push((Resource::Nth(nth), err.into()));
    }

    /// Record a failure to close the resource at position `index` in the
    /// caller's collection.
    ///
    /// # Example
    /// ```
    /// # use close_error::CloseErrors;
    /// let mut errs: CloseErrors<std::io::Error> = CloseErrors::while_closing("log files");
    /// errs.push_indexed(3, std::io::Error::other("disk full"));
    /// assert_eq!(errs.to_string(), "Unable to close log files: resource #3: disk full");
    /// ```
    pub fn push_indexed<T>(&mut self, index: usize, err: T)
    where
        T: Into<E>,
    {
        self.errors.push((Resource::Indexed(index), err.into()));
    }

    /// Record the outcome of closing one resource: do nothing on success,
    /// record the error on failure.
    pub fn record<T>(&mut self, outcome: Result<(), T>)
    where
        T: Into<E>,
    {
        if let Err(e) = outcome {
            self.push(e);
        }
    }

    /// Return an iterator over every recorded failure, in order.
    pub fn sources(&self) -> impl Iterator<Item = &E> {
        self.errors.iter().map(|(_, e)| e)
    }

    /// Return the number of recorded failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Return true if no failures have been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consume this `CloseErrors` and return the first recorded failure,
    /// discarding the rest.
    pub fn into_first(self) -> Option<E> {
        self.errors.into_iter().next().map(|(_, e)| e)
    }

    /// Return `Ok(())` if nothing failed to close, and `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl<E, T> Extend<T> for CloseErrors<E>
where
    T: Into<E>,
{
    fn extend<C>(&mut self, iter: C)
    where
        C: IntoIterator<Item = T>,
    {
        for item in iter.into_iter() {
            self.push(item);
        }
    }
}

/// Owning iterator over the failures recorded in a [`CloseErrors`].
#[derive(Debug)]
pub struct IntoIter<E>(std::vec::IntoIter<(Resource, E)>);

impl<E> Iterator for IntoIter<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        self.0.next().map(|(_, e)| e)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<E> ExactSizeIterator for IntoIter<E> {}

impl<E> IntoIterator for CloseErrors<E> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self.errors.into_iter())
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Resource::Nth(n) => write!(f, "failure {}", n),
            Resource::Indexed(idx) => write!(f, "resource #{}", idx),
        }
    }
}

impl<E: Error + 'static> Display for CloseErrors<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match &self.errors[..] {
            [] => write!(f, "Unable to close {}. (No errors given)", self.closing),
            [(Resource::Nth(_), e)] => {
                write!(f, "Unable to close {}: ", self.closing)?;
                fmt_error_with_sources(e, f)
            }
            [(which, e)] => {
                write!(f, "Unable to close {}: {}: ", self.closing, which)?;
                fmt_error_with_sources(e, f)
            }
            errors => {
                write!(
                    f,
                    "Unable to close {}: {} failures",
                    self.closing,
                    errors.len()
                )?;
                for (which, e) in errors {
                    let which = which.to_string();
                    let mut chars = which.chars();
                    // Capitalise the label, since it starts a line.
                    if let Some(c) = chars.next() {
                        write!(f, "\n{}{}: ", c.to_ascii_uppercase(), chars.as_str())?;
                    }
                    fmt_error_with_sources(e, f)?;
                }
                Ok(())
            }
        }
    }
}

/// Helper: formats a [`std::error::Error`] and its sources (as `"error: source"`)
///
/// Avoids duplication in messages by not printing messages which are
/// wholly-contained (textually) within already-printed messages.
///
/// This is used by the `Display` impls of [`CloseErrors`] and [`Report`].
///
/// # Example
///
/// ```
/// use std::fmt::{self, Display};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("socket reset")]
/// struct Reset;
///
/// #[derive(Debug, thiserror::Error)]
/// enum CursorError {
///     #[error("could not release cursor")]
///     Release(#[source] Reset),
/// }
///
/// struct Wrapper(CursorError);
/// impl Display for Wrapper {
///     fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
///         close_error::fmt_error_with_sources(&self.0, f)
///     }
/// }
///
/// let printed = Wrapper(CursorError::Release(Reset)).to_string();
/// assert_eq!(printed, "could not release cursor: socket reset");
/// ```
pub fn fmt_error_with_sources(mut e: &dyn Error, f: &mut fmt::Formatter) -> fmt::Result {
    let mut last = String::new();
    let mut sep = iter::once("").chain(iter::repeat(": "));
    loop {
        let this = e.to_string();
        if !last.contains(&this) {
            if let Some(sep) = sep.next() {
                write!(f, "{}{}", sep, &this)?;
            }
        }
        last = this;

        if let Some(ne) = e.source() {
            e = ne;
        } else {
            break;
        }
    }
    Ok(())
}
