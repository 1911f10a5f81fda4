pub const TOP_LEVEL_DOMAIN: &str = "com";
pub const AUTHOR: &str = "autofocus";
pub const APP_NAME: &str = "autofocus";

pub const CLIENT_CONFIG_FILE_NAME: &str = "autofocus.toml";

/// Points at an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "AUTOFOCUS_CONFIG";
/// Overrides the `api-key` found in the configuration file.
pub const API_KEY_ENV: &str = "AUTOFOCUS_API_KEY";
