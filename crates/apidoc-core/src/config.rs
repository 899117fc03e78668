use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Project configuration loaded from `.apidoc.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApidocConfig {
    /// Documents to transform, merged in list order.
    pub inputs: Vec<String>,
    /// Where `transform` writes the merged groups. Stdout when unset.
    pub output: Option<String>,
    pub validation: ValidationConfig,
}

/// Request validation options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Router group prefixes; declared paths containing one are never
    /// prefix-stripped when matching.
    pub router_groups: Vec<String>,
    /// Reduce `prefix-name` operation ids to `name`.
    pub strip_event_prefix: bool,
}

impl From<&ValidationConfig> for crate::validate::ValidateOptions {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            router_groups: config.router_groups.clone(),
            strip_event_prefix: config.strip_event_prefix,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apidoc.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ApidocConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: ApidocConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# apidoc configuration
inputs:
  - openapi.yaml
# output: portal.json    # defaults to stdout

validation:
  router_groups: []      # e.g. [/v1, /internal]
  strip_event_prefix: false
"#
}
