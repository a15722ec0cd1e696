//! Lua bindings for jobs.
//!
//! Target modules create jobs with `zel.app`:
//!
//! ```lua
//! web = zel.app("web", {
//!   entrypoints = { "src/index.ts" },
//!   outdir = "dist",
//!   minify = true,        -- passed through to the bundler
//! })
//!
//! worker = zel.app({ entrypoints = { "worker.ts" }, outdir = "dist" })
//! ```
//!
//! A job is a plain table `{ key = "zel-job", name = ..., config = ... }`.
//! Exports reach Rust as untyped Lua values, so recognition is structural:
//! [`is_build_job`] checks the tag and [`Job::from_lua`] validates the shape.

use mlua::prelude::*;

use super::{Job, JobConfig, JobError, Options, generate_name};
use crate::consts::JOB_KEY;

const RESERVED_FIELDS: &[&str] = &["entrypoints", "outdir", "root"];

/// True if `value` is a table tagged as a zel job.
pub fn is_build_job(value: &LuaValue) -> bool {
  match value {
    LuaValue::Table(table) => match table.raw_get::<LuaValue>("key") {
      Ok(LuaValue::String(key)) => key.to_str().is_ok_and(|k| &*k == JOB_KEY),
      _ => false,
    },
    _ => false,
  }
}

impl Job {
  /// Convert a Lua value into a job.
  ///
  /// Returns `Ok(None)` for values that are not tagged as jobs. A tagged value
  /// with a malformed name or configuration is an error.
  pub fn from_lua(lua: &Lua, value: &LuaValue) -> Result<Option<Job>, JobError> {
    if !is_build_job(value) {
      return Ok(None);
    }
    let LuaValue::Table(table) = value else {
      return Ok(None);
    };

    let name = match table.raw_get::<LuaValue>("name")? {
      LuaValue::Nil => None,
      LuaValue::String(s) => Some(s.to_str()?.to_string()),
      other => {
        return Err(JobError::InvalidConfig {
          job: "<unnamed>".to_string(),
          message: format!("name must be a string, got {}", other.type_name()),
        });
      }
    };
    let label = name.clone().unwrap_or_else(|| "<unnamed>".to_string());

    let config = match table.raw_get::<LuaValue>("config")? {
      LuaValue::Table(config) => parse_config(lua, &label, &config)?,
      other => return Err(invalid(&label, format!("config must be a table, got {}", other.type_name()))),
    };

    Ok(Some(Job::app(name, config)))
  }
}

fn parse_config(lua: &Lua, job: &str, table: &LuaTable) -> Result<JobConfig, JobError> {
  let entrypoints = match table.raw_get::<LuaValue>("entrypoints")? {
    LuaValue::Table(list) => {
      let mut entrypoints = Vec::with_capacity(list.raw_len());
      for (i, value) in list.sequence_values::<LuaValue>().enumerate() {
        match value? {
          LuaValue::String(s) => entrypoints.push(s.to_str()?.to_string()),
          other => {
            return Err(invalid(
              job,
              format!("entrypoints[{}] must be a string, got {}", i + 1, other.type_name()),
            ));
          }
        }
      }
      entrypoints
    }
    LuaValue::Nil => return Err(invalid(job, "missing 'entrypoints'")),
    other => {
      return Err(invalid(
        job,
        format!("entrypoints must be a list of strings, got {}", other.type_name()),
      ));
    }
  };

  let outdir = match table.raw_get::<LuaValue>("outdir")? {
    LuaValue::String(s) => s.to_str()?.to_string(),
    LuaValue::Nil => return Err(invalid(job, "missing 'outdir'")),
    other => return Err(invalid(job, format!("outdir must be a string, got {}", other.type_name()))),
  };

  let mut options = Options::new();
  for pair in table.pairs::<LuaValue, LuaValue>() {
    let (key, value) = pair?;
    let key = match key {
      LuaValue::String(s) => s.to_str()?.to_string(),
      other => return Err(invalid(job, format!("option keys must be strings, got {}", other.type_name()))),
    };
    if RESERVED_FIELDS.contains(&key.as_str()) {
      continue;
    }
    let value: serde_json::Value = lua
      .from_value(value)
      .map_err(|e| invalid(job, format!("option '{}' is not serializable: {}", key, e)))?;
    options.insert(key, value);
  }

  Ok(JobConfig {
    entrypoints,
    outdir,
    options,
  })
}

fn invalid(job: &str, message: impl Into<String>) -> JobError {
  JobError::InvalidConfig {
    job: job.to_string(),
    message: message.into(),
  }
}

/// Create the `zel.app(name?, config)` factory function.
///
/// Accepts `(name, config)`, `(nil, config)` or `(config)`. An omitted name is
/// generated.
pub fn create_app_function(lua: &Lua) -> LuaResult<LuaFunction> {
  lua.create_function(|lua, args: LuaMultiValue| {
    let mut args = args.into_iter();
    let first = args.next().unwrap_or(LuaValue::Nil);
    let second = args.next().unwrap_or(LuaValue::Nil);

    let (name, config) = match (first, second) {
      (LuaValue::Table(config), LuaValue::Nil) => (None, config),
      (LuaValue::Nil, LuaValue::Table(config)) => (None, config),
      (LuaValue::String(name), LuaValue::Table(config)) => (Some(name.to_str()?.to_string()), config),
      _ => return Err(LuaError::external("zel.app expects (name, config) or (config)")),
    };

    let job = lua.create_table()?;
    job.set("key", JOB_KEY)?;
    job.set("name", name.filter(|n| !n.is_empty()).unwrap_or_else(generate_name))?;
    job.set("config", config)?;
    Ok(job)
  })
}
