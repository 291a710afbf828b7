use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub plugin: PluginConfig,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    /// Name used to tag diagnostic output for this plugin.
    #[serde(default = "default_plugin_name")]
    pub name: String,
}

/// Bounds for the simulated per-call processing latency.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyConfig {
    #[serde(default = "default_latency_enabled")]
    pub enabled: bool,
    #[serde(default = "default_latency_min_ms")]
    pub min_ms: u64,
    #[serde(default = "default_latency_max_ms")]
    pub max_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Build script name, resolved relative to the plugin source directory.
    #[serde(default = "default_build_script")]
    pub script: String,
    /// Directory the build script leaves its output in.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            name: default_plugin_name(),
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: default_latency_enabled(),
            min_ms: default_latency_min_ms(),
            max_ms: default_latency_max_ms(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            script: default_build_script(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_plugin_name() -> String {
    "plugin-worker".to_string()
}

fn default_latency_enabled() -> bool {
    true
}

fn default_latency_min_ms() -> u64 {
    10
}

fn default_latency_max_ms() -> u64 {
    250
}

fn default_build_script() -> String {
    "build".to_string()
}

fn default_output_dir() -> String {
    "out".to_string()
}
