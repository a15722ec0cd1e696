//! Lua runtime for target modules.
//!
//! A target's `zel.lua` is evaluated in a fresh Lua VM with the `zel` global
//! available. Its top-level globals (and any returned table) are collected as
//! the module's exports.
//!
//! # Submodules
//!
//! - [`globals`] - The `zel` global table
//! - [`helpers`] - Lua helper tables exposed to target modules
//! - [`runtime`] - VM creation and module evaluation

pub mod globals;
pub mod helpers;
pub mod runtime;

pub use runtime::{ModuleExports, create_runtime, load_module};
