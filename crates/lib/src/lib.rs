//! zel-lib: Core types and logic for zel
//!
//! zel is a Bazel-like target runner. A target names a package directory in the
//! workspace; the package's `zel.lua` module declares build jobs, and every job
//! found there is resolved against the package directory and handed to a bundler.
//!
//! - `Target`: a parsed `//path/to/pkg` label
//! - `Job`: a named bundler configuration recognized among module exports
//! - `Bundler`: the engine that turns a resolved configuration into artifacts
//! - `TargetReport`: per-job outcomes of one `build` invocation

pub mod bundler;
pub mod config;
pub mod consts;
pub mod events;
pub mod fs;
pub mod job;
pub mod lua;
pub mod runner;
pub mod target;
