//! # mefx-error
//!
//! Unified error handling for mefx.
//!
//! ## Design
//!
//! - **ErrorKind**: what went wrong (e.g. PartNotFound, InvalidExtension)
//! - **ErrorStatus**: whether the caller reports and moves on, or aborts
//! - **Error Context**: key/value pairs that locate the cause
//! - **Error Source**: the wrapped underlying error, if any
//!
//! ## Usage
//!
//! ```rust
//! use mefx_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::InvalidExtension, "expected a .dgml file")
//!         .with_operation("dgml::export_graph")
//!         .with_context("path", "out/AllErrors.txt"))
//! }
//! ```
//!
//! ## Principles
//!
//! - Library functions return `Result<T, mefx_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - An error is handled once; callers further up only append context

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the mefx Error
pub type Result<T> = std::result::Result<T, Error>;
