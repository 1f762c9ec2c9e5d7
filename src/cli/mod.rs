//! CLI command handlers.
//!
//! Testable command handlers invoked by main.rs. Each handler takes a typed
//! configuration struct, returns the desired exit code, and leaves the actual
//! `std::process::exit` call to the caller.

#[cfg(feature = "publish")]
mod comment;
mod diff;

#[cfg(feature = "publish")]
pub use comment::run_comment;
pub use diff::run_diff;
