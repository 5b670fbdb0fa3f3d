//! Validators that carry a cancellation [`Context`]
//!
//! Mirrors [`crate::validator`] with a [`Context`] passed to every check.
//! Composites hand the same token to each member and never look at it
//! themselves: a cancelled token does not stop later members from running.
//! Checks that care return [`ContextError`](crate::ContextError) once the
//! token is done.

use std::fmt;
use std::marker::PhantomData;
use std::slice;
use std::sync::Arc;

use crate::context::Context;
use crate::error::join_errors;

/// Shared handle to a context validator, as returned by the factories
pub type SharedContextValidator<T> = Arc<dyn ContextValidator<T>>;

/// Checks a value of type `T` under a cancellation [`Context`]
pub trait ContextValidator<T: ?Sized>: Send + Sync {
    /// Return an error if `value` holds invalid or missing data
    fn validate(&self, ctx: &Context, value: &T) -> anyhow::Result<()>;

    /// Which kind of validator this is
    fn kind(&self) -> ContextKind<'_, T> {
        ContextKind::Custom
    }
}

/// The shape of a context validator, as reported by [`ContextValidator::kind`]
pub enum ContextKind<'a, T: ?Sized> {
    /// A [`ContextNoOp`]
    NoOp,
    /// A [`ContextFunc`]
    Func,
    /// A [`ContextMulti`], with access to its members
    Multi(&'a ContextMulti<T>),
    /// Any other implementation
    Custom,
}

impl<T: ?Sized> ContextKind<'_, T> {
    /// Whether this is [`ContextKind::NoOp`]
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// Number of members for [`ContextKind::Multi`], `None` otherwise
    #[must_use]
    pub fn multi_len(&self) -> Option<usize> {
        match self {
            Self::Multi(multi) => Some(multi.len()),
            _ => None,
        }
    }
}

impl<T: ?Sized> fmt::Debug for ContextKind<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => f.write_str("NoOp"),
            Self::Func => f.write_str("Func"),
            Self::Multi(multi) => f.debug_tuple("Multi").field(&multi.len()).finish(),
            Self::Custom => f.write_str("Custom"),
        }
    }
}

/// A single context-aware check function used as a validator
///
/// An empty `ContextFunc` passes every value.
pub struct ContextFunc<T: ?Sized> {
    check: Option<Arc<dyn Fn(&Context, &T) -> anyhow::Result<()> + Send + Sync>>,
}

impl<T: ?Sized> ContextFunc<T> {
    /// Wrap a check function
    #[must_use]
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Context, &T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            check: Some(Arc::new(check)),
        }
    }

    /// A `ContextFunc` with no check function
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

impl<T: ?Sized> ContextValidator<T> for ContextFunc<T> {
    fn validate(&self, ctx: &Context, value: &T) -> anyhow::Result<()> {
        match &self.check {
            Some(check) => check(ctx, value),
            None => Ok(()),
        }
    }

    fn kind(&self) -> ContextKind<'_, T> {
        ContextKind::Func
    }
}

impl<T: ?Sized> Default for ContextFunc<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Clone for ContextFunc<T> {
    fn clone(&self) -> Self {
        Self {
            check: self.check.clone(),
        }
    }
}

impl<T: ?Sized, F> From<Option<F>> for ContextFunc<T>
where
    F: Fn(&Context, &T) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn from(check: Option<F>) -> Self {
        check.map_or_else(Self::empty, Self::new)
    }
}

impl<T: ?Sized> fmt::Debug for ContextFunc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextFunc").field("empty", &self.is_empty()).finish()
    }
}

/// A context validator that always passes, whatever the token's state
pub struct ContextNoOp<T: ?Sized> {
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized> ContextNoOp<T> {
    /// Create a no-op context validator
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> ContextValidator<T> for ContextNoOp<T> {
    fn validate(&self, _ctx: &Context, _value: &T) -> anyhow::Result<()> {
        Ok(())
    }

    fn kind(&self) -> ContextKind<'_, T> {
        ContextKind::NoOp
    }
}

impl<T: ?Sized> Default for ContextNoOp<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for ContextNoOp<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ContextNoOp<T> {}

impl<T: ?Sized> fmt::Debug for ContextNoOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContextNoOp")
    }
}

/// Runs every member context validator against the same value and token
pub struct ContextMulti<T: ?Sized> {
    validators: Vec<SharedContextValidator<T>>,
}

impl<T: ?Sized> ContextMulti<T> {
    /// Number of member validators
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Always `false`: a `ContextMulti` has at least two members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// The member validators, in run order
    #[must_use]
    pub fn validators(&self) -> &[SharedContextValidator<T>] {
        &self.validators
    }

    /// Iterate the member validators in run order
    pub fn iter(&self) -> slice::Iter<'_, SharedContextValidator<T>> {
        self.validators.iter()
    }
}

impl<T: ?Sized> ContextValidator<T> for ContextMulti<T> {
    fn validate(&self, ctx: &Context, value: &T) -> anyhow::Result<()> {
        let errors = self
            .validators
            .iter()
            .filter_map(|validator| validator.validate(ctx, value).err())
            .collect();

        join_errors(errors)
    }

    fn kind(&self) -> ContextKind<'_, T> {
        ContextKind::Multi(self)
    }
}

impl<'a, T: ?Sized> IntoIterator for &'a ContextMulti<T> {
    type Item = &'a SharedContextValidator<T>;
    type IntoIter = slice::Iter<'a, SharedContextValidator<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: ?Sized> fmt::Debug for ContextMulti<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.validators.iter().map(|validator| validator.kind()))
            .finish()
    }
}

/// A shared no-op context validator
#[must_use]
pub fn noop_context<T: ?Sized + 'static>() -> SharedContextValidator<T> {
    Arc::new(ContextNoOp::new())
}

/// Build a context validator from check functions
///
/// Same shape rules as [`new`](crate::new): empty functions are dropped,
/// then zero, one or several survivors give a [`ContextNoOp`], a lone
/// [`ContextFunc`] or a [`ContextMulti`].
#[must_use]
pub fn new_context<T, I>(checks: I) -> SharedContextValidator<T>
where
    T: ?Sized + 'static,
    I: IntoIterator<Item = ContextFunc<T>>,
{
    let mut checks: Vec<ContextFunc<T>> =
        checks.into_iter().filter(|check| !check.is_empty()).collect();

    if checks.len() < 2 {
        let Some(check) = checks.pop() else {
            log::trace!("no check functions supplied, using no-op context validator");
            return noop_context();
        };
        log::trace!("context validator built from a single check function");
        return Arc::new(check);
    }

    log::trace!("built context multi-validator from {} check functions", checks.len());

    Arc::new(ContextMulti {
        validators: checks
            .into_iter()
            .map(|check| -> SharedContextValidator<T> { Arc::new(check) })
            .collect(),
    })
}

/// Join existing context validators into one
///
/// Same rules as [`join`](crate::join): `None` and no-op inputs are dropped,
/// a lone survivor is returned untouched, and [`ContextMulti`] inputs are
/// spliced in member by member.
#[must_use]
pub fn join_context<T, I>(validators: I) -> SharedContextValidator<T>
where
    T: ?Sized + 'static,
    I: IntoIterator<Item = Option<SharedContextValidator<T>>>,
{
    let mut validators: Vec<SharedContextValidator<T>> = validators
        .into_iter()
        .flatten()
        .filter(|validator| !validator.kind().is_noop())
        .collect();

    if validators.len() < 2 {
        let Some(validator) = validators.pop() else {
            log::trace!("nothing to join, using no-op context validator");
            return noop_context();
        };
        log::trace!("single context validator passed through join");
        return validator;
    }

    let mut members = Vec::with_capacity(validators.len());
    for validator in &validators {
        match validator.kind() {
            ContextKind::Multi(multi) => {
                log::trace!("flattening context multi-validator with {} members", multi.len());
                members.extend_from_slice(multi.validators());
            },
            _ => members.push(Arc::clone(validator)),
        }
    }

    log::trace!(
        "joined {} context validators into {} members",
        validators.len(),
        members.len()
    );

    Arc::new(ContextMulti {
        validators: members,
    })
}
