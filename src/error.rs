//! Error aggregation for composed validators
//!
//! A composed validator runs every member and reports all of their failures
//! at once. [`join_errors`] folds the collected failures into one outcome:
//!
//! - no failures: `Ok(())`
//! - one failure: that error, untouched
//! - several failures: a [`MultiError`] holding each of them, in order
//!
//! [`find`] and [`contains`] look through source chains and into nested
//! [`MultiError`] values, so callers can ask whether a failure of a given
//! type happened anywhere in a composite.

use std::error::Error as StdError;
use std::fmt;
use std::slice;
use std::vec;

/// Several validation failures reported together
///
/// Produced by [`join_errors`] when two or more members of a composed
/// validator fail. Always holds at least two errors, in the order the
/// failing members were run.
#[derive(Debug)]
pub struct MultiError {
    errors: Vec<anyhow::Error>,
}

impl MultiError {
    /// Number of failures held
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false` for a value built by [`join_errors`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate the failures in the order they were collected
    pub fn iter(&self) -> slice::Iter<'_, anyhow::Error> {
        self.errors.iter()
    }

    /// Borrow the failures as a slice
    #[must_use]
    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }

    /// Take ownership of the failures
    #[must_use]
    pub fn into_errors(self) -> Vec<anyhow::Error> {
        self.errors
    }

    /// Whether any failure (or any of its causes) is an `E`
    #[must_use]
    pub fn contains<E>(&self) -> bool
    where
        E: StdError + Send + Sync + 'static,
    {
        self.errors.iter().any(contains::<E>)
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err:#}")?;
        }
        Ok(())
    }
}

impl StdError for MultiError {}

impl<'a> IntoIterator for &'a MultiError {
    type Item = &'a anyhow::Error;
    type IntoIter = slice::Iter<'a, anyhow::Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for MultiError {
    type Item = anyhow::Error;
    type IntoIter = vec::IntoIter<anyhow::Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Fold collected failures into a single outcome
///
/// Order is preserved. A single failure is returned as-is rather than
/// wrapped, so callers see exactly what the failing check produced.
pub fn join_errors(mut errors: Vec<anyhow::Error>) -> anyhow::Result<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.swap_remove(0)),
        _ => Err(anyhow::Error::new(MultiError { errors })),
    }
}

/// Find the first `E` in `err`'s source chain, descending into composites
///
/// Composites are searched depth-first in constituent order.
#[must_use]
pub fn find<E>(err: &anyhow::Error) -> Option<&E>
where
    E: StdError + Send + Sync + 'static,
{
    for cause in err.chain() {
        if let Some(found) = cause.downcast_ref::<E>() {
            return Some(found);
        }
        if let Some(multi) = cause.downcast_ref::<MultiError>() {
            return multi.iter().find_map(find::<E>);
        }
    }
    None
}

/// Whether `err` is, wraps, or (for composites) contains an `E`
#[must_use]
pub fn contains<E>(err: &anyhow::Error) -> bool
where
    E: StdError + Send + Sync + 'static,
{
    find::<E>(err).is_some()
}
