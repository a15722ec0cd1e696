//! The `zel` global table.
//!
//! - `zel.app(name?, config)` - Declare a build job
//! - `zel.job_key` - Tag value that marks a table as a job
//! - `zel.dir` - Absolute path of the package being built
//! - `zel.target` - Normalized label of the target being built
//! - `zel.path` - Path manipulation utilities

use std::path::Path;

use mlua::prelude::*;

use super::helpers;
use crate::consts::JOB_KEY;
use crate::job::lua::create_app_function;
use crate::target::Target;

/// Register the `zel` global table for a module in `package_dir`.
pub fn register_globals(lua: &Lua, package_dir: &Path, target: &Target) -> LuaResult<()> {
  let zel = lua.create_table()?;

  zel.set("app", create_app_function(lua)?)?;
  zel.set("job_key", JOB_KEY)?;
  zel.set("dir", package_dir.to_string_lossy().into_owned())?;
  zel.set("target", target.to_string())?;
  zel.set("path", helpers::path::create_path_helpers(lua)?)?;

  lua.globals().set("zel", zel)?;

  Ok(())
}
