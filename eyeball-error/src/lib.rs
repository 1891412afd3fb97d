//! Error types and utilities for eyeball.
//!
//! The [`BoxError`] type is a type-erased error type that can be used to represent any error that
//! implements the `std::error::Error` trait. It is the currency used between the eyeball crates,
//! for cases where it is usually not that important what specific error type is returned,
//! but rather that an error occurred and in what context.
//!
//! That said, one can use downcasting, [`ErrorExt::has`] or [`chain`] to inspect the cause of an error.
//!
//! # Context
//!
//! Use [`ErrorContext`] to attach a message to an error as it bubbles up:
//!
//! ```
//! use eyeball_error::ErrorContext;
//!
//! let result = "hello".parse::<u16>().context("parse port");
//! assert_eq!("parse port: invalid digit found in string", result.unwrap_err().to_string());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(
    not(test),
    warn(clippy::print_stdout, clippy::dbg_macro),
    deny(clippy::unwrap_used, clippy::expect_used)
)]

/// Alias for a type-erased error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

mod ext;
#[doc(inline)]
pub use ext::{Chain, ErrorContext, ErrorExt, OpaqueError, chain, has, root_cause};

#[doc(hidden)]
pub mod macros;
