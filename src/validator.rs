//! Validators over a plain value
//!
//! - [`Validator`] - anything that can check a `T`
//! - [`Func`] - adapts a single check function
//! - [`NoOp`] - always passes; what composing nothing produces
//! - [`Multi`] - runs several validators and reports every failure
//!
//! Build composites with [`new`] (from check functions) or [`join`] (from
//! existing validators). Both collapse to [`NoOp`] or to a lone validator
//! when there is nothing to combine, so a [`Multi`] always has two or more
//! members and never contains another [`Multi`].

use std::fmt;
use std::marker::PhantomData;
use std::slice;
use std::sync::Arc;

use crate::error::join_errors;

/// Shared handle to a validator, as returned by the factories
pub type SharedValidator<T> = Arc<dyn Validator<T>>;

/// Checks a value of type `T`
pub trait Validator<T: ?Sized>: Send + Sync {
    /// Return an error if `value` holds invalid or missing data
    fn validate(&self, value: &T) -> anyhow::Result<()>;

    /// Which kind of validator this is
    ///
    /// Caller-written validators keep the default, [`Kind::Custom`].
    fn kind(&self) -> Kind<'_, T> {
        Kind::Custom
    }
}

/// The shape of a validator, as reported by [`Validator::kind`]
pub enum Kind<'a, T: ?Sized> {
    /// A [`NoOp`]
    NoOp,
    /// A [`Func`]
    Func,
    /// A [`Multi`], with access to its members
    Multi(&'a Multi<T>),
    /// Any other implementation
    Custom,
}

impl<T: ?Sized> Kind<'_, T> {
    /// Whether this is [`Kind::NoOp`]
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// Number of members for [`Kind::Multi`], `None` otherwise
    #[must_use]
    pub fn multi_len(&self) -> Option<usize> {
        match self {
            Self::Multi(multi) => Some(multi.len()),
            _ => None,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Kind<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => f.write_str("NoOp"),
            Self::Func => f.write_str("Func"),
            Self::Multi(multi) => f.debug_tuple("Multi").field(&multi.len()).finish(),
            Self::Custom => f.write_str("Custom"),
        }
    }
}

/// A single check function used as a validator
///
/// An empty `Func` passes every value.
pub struct Func<T: ?Sized> {
    check: Option<Arc<dyn Fn(&T) -> anyhow::Result<()> + Send + Sync>>,
}

impl<T: ?Sized> Func<T> {
    /// Wrap a check function
    #[must_use]
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            check: Some(Arc::new(check)),
        }
    }

    /// A `Func` with no check function
    #[must_use]
    pub const fn empty() -> Self {
        Self { check: None }
    }

    /// Whether there is no check function
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.check.is_none()
    }
}

impl<T: ?Sized> Validator<T> for Func<T> {
    fn validate(&self, value: &T) -> anyhow::Result<()> {
        match &self.check {
            Some(check) => check(value),
            None => Ok(()),
        }
    }

    fn kind(&self) -> Kind<'_, T> {
        Kind::Func
    }
}

impl<T: ?Sized> Default for Func<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Clone for Func<T> {
    fn clone(&self) -> Self {
        Self {
            check: self.check.clone(),
        }
    }
}

impl<T: ?Sized, F> From<Option<F>> for Func<T>
where
    F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn from(check: Option<F>) -> Self {
        check.map_or_else(Self::empty, Self::new)
    }
}

impl<T: ?Sized> fmt::Debug for Func<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func").field("empty", &self.is_empty()).finish()
    }
}

/// A validator that always passes
pub struct NoOp<T: ?Sized> {
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized> NoOp<T> {
    /// Create a no-op validator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> Validator<T> for NoOp<T> {
    fn validate(&self, _value: &T) -> anyhow::Result<()> {
        Ok(())
    }

    fn kind(&self) -> Kind<'_, T> {
        Kind::NoOp
    }
}

impl<T: ?Sized> Default for NoOp<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for NoOp<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for NoOp<T> {}

impl<T: ?Sized> fmt::Debug for NoOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NoOp")
    }
}

/// Runs every member validator against the same value
///
/// Members run in order and all of them run, even after a failure. Failures
/// are combined with [`join_errors`](crate::error::join_errors).
pub struct Multi<T: ?Sized> {
    validators: Vec<SharedValidator<T>>,
}

impl<T: ?Sized> Multi<T> {
    /// Number of member validators
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Always `false`: a `Multi` has at least two members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// The member validators, in run order
    #[must_use]
    pub fn validators(&self) -> &[SharedValidator<T>] {
        &self.validators
    }

    /// Iterate the member validators in run order
    pub fn iter(&self) -> slice::Iter<'_, SharedValidator<T>> {
        self.validators.iter()
    }
}

impl<T: ?Sized> Validator<T> for Multi<T> {
    fn validate(&self, value: &T) -> anyhow::Result<()> {
        let errors = self
            .validators
            .iter()
            .filter_map(|validator| validator.validate(value).err())
            .collect();

        join_errors(errors)
    }

    fn kind(&self) -> Kind<'_, T> {
        Kind::Multi(self)
    }
}

impl<'a, T: ?Sized> IntoIterator for &'a Multi<T> {
    type Item = &'a SharedValidator<T>;
    type IntoIter = slice::Iter<'a, SharedValidator<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: ?Sized> fmt::Debug for Multi<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.validators.iter().map(|validator| validator.kind()))
            .finish()
    }
}

/// A shared no-op validator
#[must_use]
pub fn noop<T: ?Sized + 'static>() -> SharedValidator<T> {
    Arc::new(NoOp::new())
}

/// Build a validator from check functions
///
/// Empty [`Func`]s are dropped. Nothing left gives a [`NoOp`], one function
/// gives that [`Func`] on its own, and two or more give a [`Multi`] that
/// runs them in the order supplied.
#[must_use]
pub fn new<T, I>(checks: I) -> SharedValidator<T>
where
    T: ?Sized + 'static,
    I: IntoIterator<Item = Func<T>>,
{
    let mut checks: Vec<Func<T>> = checks.into_iter().filter(|check| !check.is_empty()).collect();

    if checks.len() < 2 {
        let Some(check) = checks.pop() else {
            log::trace!("no check functions supplied, using no-op validator");
            return noop();
        };
        log::trace!("validator built from a single check function");
        return Arc::new(check);
    }

    log::trace!("built multi-validator from {} check functions", checks.len());

    Arc::new(Multi {
        validators: checks
            .into_iter()
            .map(|check| -> SharedValidator<T> { Arc::new(check) })
            .collect(),
    })
}

/// Join existing validators into one
///
/// `None` entries and [`NoOp`] validators are dropped. Nothing left gives a
/// [`NoOp`]; a single survivor is returned as it is. Otherwise the result is
/// a [`Multi`] in which every [`Multi`] input has been replaced by its own
/// members, keeping the composite one level deep.
#[must_use]
pub fn join<T, I>(validators: I) -> SharedValidator<T>
where
    T: ?Sized + 'static,
    I: IntoIterator<Item = Option<SharedValidator<T>>>,
{
    let mut validators: Vec<SharedValidator<T>> = validators
        .into_iter()
        .flatten()
        .filter(|validator| !validator.kind().is_noop())
        .collect();

    if validators.len() < 2 {
        let Some(validator) = validators.pop() else {
            log::trace!("nothing to join, using no-op validator");
            return noop();
        };
        log::trace!("single validator passed through join");
        return validator;
    }

    let mut members = Vec::with_capacity(validators.len());
    for validator in &validators {
        match validator.kind() {
            Kind::Multi(multi) => {
                log::trace!("flattening multi-validator with {} members", multi.len());
                members.extend_from_slice(multi.validators());
            },
            _ => members.push(Arc::clone(validator)),
        }
    }

    log::trace!("joined {} validators into {} members", validators.len(), members.len());

    Arc::new(Multi {
        validators: members,
    })
}
