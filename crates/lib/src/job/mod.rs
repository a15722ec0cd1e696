//! Build jobs.
//!
//! A job pairs a name with a bundler configuration whose paths are relative to
//! the package that declares it. Running a job resolves those paths against the
//! package directory, hands the result to a [`Bundler`](crate::bundler::Bundler)
//! and materializes the artifacts it returns.
//!
//! # Submodules
//!
//! - [`lua`] - `zel.app()` factory and the discriminator for module exports
//! - [`resolve`] - Path resolution against a base directory
//! - [`run`] - Execution and artifact materialization

pub mod lua;
pub mod resolve;
pub mod run;
mod types;

pub use resolve::{ResolveError, resolve_config};
pub use run::JobContext;
pub use types::*;
