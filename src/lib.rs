//! valigator - Compose independent validation checks into a single validator
//!
//! Callers supply small check functions (or their own [`Validator`]
//! implementations); this crate combines them so that one call runs every
//! check and reports every failure.
//!
//! ## Layout
//!
//! - [`validator`] - [`Validator`], [`Func`], [`NoOp`], [`Multi`] and the
//!   [`new`] / [`join`] factories
//! - [`context_validator`] - the same algebra with a cancellation
//!   [`Context`] threaded through every check (feature `context`)
//! - [`context`] - the [`Context`] token itself
//! - [`error`] - [`MultiError`] and the [`join_errors`] combinator
//!
//! ## Example
//!
//! ```
//! use anyhow::ensure;
//! use valigator::{Func, Validator, error::MultiError};
//!
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let validator = valigator::new([
//!     Func::new(|s: &Server| {
//!         ensure!(!s.host.is_empty(), "host is empty");
//!         Ok(())
//!     }),
//!     Func::new(|s: &Server| {
//!         ensure!(s.port != 0, "port is zero");
//!         Ok(())
//!     }),
//! ]);
//!
//! let err = validator.validate(&Server { host: String::new(), port: 0 }).unwrap_err();
//! let multi = err.downcast_ref::<MultiError>().unwrap();
//! assert_eq!(multi.len(), 2);
//! ```

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "context")]
pub mod context;
#[cfg(feature = "context")]
pub mod context_validator;
pub mod error;
pub mod validator;

#[cfg(feature = "context")]
pub use context::{Context, ContextError};
#[cfg(feature = "context")]
pub use context_validator::{
    ContextFunc, ContextKind, ContextMulti, ContextNoOp, ContextValidator, SharedContextValidator,
    join_context, new_context, noop_context,
};
pub use error::{MultiError, join_errors};
pub use validator::{Func, Kind, Multi, NoOp, SharedValidator, Validator, join, new, noop};
