use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::debug;

use crate::lua::globals;
use crate::target::Target;

/// Bindings exported by a target module, in declaration order.
///
/// Top-level globals come first, ordered by their first assignment. If the
/// module returns a table, its array part follows (named `"1"`, `"2"`, ...)
/// and then its string keys in sorted order. A table reachable under several
/// names is exported once, under the first.
#[derive(Debug, Default)]
pub struct ModuleExports {
  entries: Vec<(String, LuaValue)>,
}

impl ModuleExports {
  pub fn iter(&self) -> impl Iterator<Item = (&str, &LuaValue)> {
    self.entries.iter().map(|(name, value)| (name.as_str(), value))
  }

  pub fn names(&self) -> Vec<&str> {
    self.entries.iter().map(|(name, _)| name.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Append an export unless the same table was already exported.
  fn push(&mut self, name: String, value: LuaValue) {
    if let LuaValue::Table(table) = &value {
      let ptr = table.to_pointer();
      if self
        .entries
        .iter()
        .any(|(_, seen)| matches!(seen, LuaValue::Table(t) if t.to_pointer() == ptr))
      {
        return;
      }
    }
    self.entries.push((name, value));
  }
}

/// Create a Lua runtime for evaluating the module of `target`.
///
/// `require` resolves modules relative to `package_dir` before the default
/// search path.
pub fn create_runtime(package_dir: &Path, target: &Target) -> LuaResult<Lua> {
  let lua = Lua::new();

  let package: LuaTable = lua.globals().get("package")?;
  let package_path = package.get::<String>("path")?;
  let dir = package_dir.to_string_lossy().replace('\\', "/");
  package.set("path", format!("{dir}/?.lua;{dir}/?/init.lua;{package_path}"))?;

  globals::register_globals(&lua, package_dir, target)?;

  Ok(lua)
}

/// Evaluate the module at `path` and collect its exports.
pub fn load_module(lua: &Lua, path: &Path) -> LuaResult<ModuleExports> {
  let content = std::fs::read_to_string(path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", path.display(), e)))?;

  let order = Rc::new(RefCell::new(Vec::<String>::new()));
  let env = module_env(lua, order.clone())?;

  let returned = lua
    .load(&content)
    .set_name(format!("@{}", path.display()))
    .set_environment(env.clone())
    .call::<LuaValue>(())?;

  let mut exports = ModuleExports::default();
  for name in order.borrow().iter() {
    let value: LuaValue = env.raw_get(name.as_str())?;
    if !value.is_nil() {
      exports.push(name.clone(), value);
    }
  }

  if let LuaValue::Table(table) = returned {
    for i in 1..=table.raw_len() {
      exports.push(i.to_string(), table.raw_get(i)?);
    }

    let mut named = Vec::new();
    for pair in table.pairs::<LuaValue, LuaValue>() {
      let (key, value) = pair?;
      if let LuaValue::String(key) = key {
        named.push((key.to_str()?.to_string(), value));
      }
    }
    named.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in named {
      exports.push(name, value);
    }
  }

  debug!(path = %path.display(), exports = exports.len(), "loaded module");
  Ok(exports)
}

/// Environment table for a module chunk.
///
/// Reads fall through to the real globals; writes land in the environment and
/// record the name the first time it is assigned.
fn module_env(lua: &Lua, order: Rc<RefCell<Vec<String>>>) -> LuaResult<LuaTable> {
  let env = lua.create_table()?;
  let meta = lua.create_table()?;

  meta.set("__index", lua.globals())?;
  meta.set(
    "__newindex",
    lua.create_function(move |_, (table, key, value): (LuaTable, LuaValue, LuaValue)| {
      if let LuaValue::String(name) = &key {
        let name = name.to_str()?.to_string();
        let mut order = order.borrow_mut();
        if !order.contains(&name) {
          order.push(name);
        }
      }
      table.raw_set(key, value)
    })?,
  )?;

  env.set_metatable(Some(meta))?;
  Ok(env)
}
