//! Per-test temporary directory fixtures built on top of [`std::fs`] with improved error handling.
//! Each fixture owns one uniquely named directory, created on construction
//! and recursively removed on teardown - on every exit path, including panics.
//!
//!
//! # Main features
//! - one isolated, writable directory per fixture, with:
//!     - collision-resistant naming (safe under parallel test execution), and
//!     - an optional parent directory override,
//! - safe child-path helpers (`new_file`, `new_directory`) that create
//!   intermediate directories and reject traversal out of the root, and
//! - guaranteed cleanup: explicit via [`close`][TempDirectoryFixture::close],
//!   implicit via [`Drop`] when the test body fails.
//!
//! <br>
//!
//! Visit [`TempDirectoryFixture`] for the full lifecycle contract
//! and the [`error`] module for the error taxonomy.
//!
//!
//! <br>
//!
//! # Feature flags
//! The following feature flags enable optional functionality:
//! - `dunce` (*enabled by default*): enables the optional [`dunce`](../dunce/index.html) support:
//!   This automatically strips Windows' UNC paths if they can be represented
//!   using the usual type of path (e.g. `\\?\C:\foo -> C:\foo`) when the fixture root
//!   is canonicalized (this is recommended because path canonicalization
//!   very commonly returns UNC paths, which then leak into test assertions).
//!   This crate only has an effect when compiling for Windows targets.
//! - `fs-err` (*disabled by default*): enables the optional [`fs-err`](../fs_err/index.html) support.
//!   While `temp-fixture` already provides quite extensive [error types](crate::error),
//!   this does enable more helpful error messages for underlying IO errors.
//! - `miette` (*disabled by default*): derives
//!   [`miette::Diagnostic`](https://docs.rs/miette/latest/miette/derive.Diagnostic.html)
//!   on all error types.
//!
//!
//! <br>
//!
//! # Examples
//!
//! A test preparing a small directory tree and asserting over it:
//! ```
//! # use temp_fixture::TempDirectoryFixture;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fixture = TempDirectoryFixture::new()?;
//!
//! let log_directory = fixture.new_directory("logs")?;
//! let log_path = fixture.new_file_with_contents("logs/app.log", "boot ok\n")?;
//!
//! assert!(log_directory.is_dir());
//! assert_eq!(std::fs::read_to_string(&log_path)?, "boot ok\n");
//!
//! // Removes the root and everything under it. Simply dropping
//! // the fixture would have the same effect.
//! fixture.close()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]


/// This brings in the README's doctests (and is present only when testing).
#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;


pub mod error;
pub mod fixture;
mod macros;

pub use fixture::TempDirectoryFixture;
