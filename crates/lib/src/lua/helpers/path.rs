use std::path::{Path, PathBuf};

use mlua::prelude::*;

/// Create the `zel.path` table with path manipulation utilities.
///
/// None of these touch the filesystem.
pub fn create_path_helpers(lua: &Lua) -> LuaResult<LuaTable> {
  let path = lua.create_table()?;

  // zel.path.join(...) - Join multiple path segments
  path.set(
    "join",
    lua.create_function(|_, segments: LuaMultiValue| {
      let mut result = PathBuf::new();
      for segment in segments {
        match segment {
          LuaValue::String(s) => result.push(&*s.to_str()?),
          other => {
            return Err(LuaError::external(format!(
              "zel.path.join expects strings, got {}",
              other.type_name()
            )));
          }
        }
      }
      Ok(result.to_string_lossy().into_owned())
    })?,
  )?;

  // zel.path.dirname(path) - Get parent directory
  path.set(
    "dirname",
    lua.create_function(|_, path_str: String| {
      Ok(
        Path::new(&path_str)
          .parent()
          .map(|p| p.to_string_lossy().into_owned())
          .unwrap_or_default(),
      )
    })?,
  )?;

  // zel.path.basename(path) - Get file name
  path.set(
    "basename",
    lua.create_function(|_, path_str: String| {
      Ok(
        Path::new(&path_str)
          .file_name()
          .map(|n| n.to_string_lossy().into_owned())
          .unwrap_or_default(),
      )
    })?,
  )?;

  // zel.path.extname(path) - Get file extension (including the dot)
  path.set(
    "extname",
    lua.create_function(|_, path_str: String| {
      Ok(
        Path::new(&path_str)
          .extension()
          .map(|e| format!(".{}", e.to_string_lossy()))
          .unwrap_or_default(),
      )
    })?,
  )?;

  path.set(
    "is_absolute",
    lua.create_function(|_, path_str: String| Ok(Path::new(&path_str).is_absolute()))?,
  )?;

  Ok(path)
}
