pub const APP_NAME: &str = "zel";

/// File name of the build-definition module inside every target package.
pub const MODULE_FILE: &str = "zel.lua";

/// Reserved value of the `key` field that marks a Lua table as a build job.
pub const JOB_KEY: &str = "zel-job";

/// Marker file that identifies the workspace root during discovery.
pub const WORKSPACE_MARKER: &str = "ZEL_WORKSPACE";

/// Environment variable overriding the workspace root.
pub const WORKSPACE_ENV: &str = "ZEL_WORKSPACE";

/// Environment variable selecting an external bundler command.
pub const BUNDLER_CMD_ENV: &str = "ZEL_BUNDLER_CMD";

/// Echo logged in place of an artifact whose read-back content is empty.
pub const EMPTY_ARTIFACT: &str = "<EMPTY>";
