use std::path::Path;

use figment::providers::{Env, Format, Json, Toml, Yaml};
use figment::Figment;

use crate::error::{ConfigError, Result};

use super::schema::Config;

const ENV_PREFIX: &str = "PLUGIN_WORKER_";

pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(ConfigError::Parse(format!("{} not found", path.display())).into());
    }

    let figment = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Figment::new().merge(Json::file(path)),
        Some("yaml") | Some("yml") => Figment::new().merge(Yaml::file(path)),
        _ => Figment::new().merge(Toml::file(path)),
    };

    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("_"))
        .extract()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate(&config)?;

    Ok(config)
}

pub fn load_from_env_or_file() -> Result<Config> {
    let config: Config = Figment::new()
        // Try the default config file locations
        .merge(Toml::file("plugin-worker.toml"))
        .merge(Json::file("plugin-worker.json"))
        .merge(Yaml::file("plugin-worker.yaml"))
        .merge(Yaml::file("plugin-worker.yml"))
        // Override with environment variables (PLUGIN_WORKER_ prefix)
        .merge(Env::prefixed(ENV_PREFIX).split("_"))
        .extract()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate(&config)?;

    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.plugin.name.is_empty() {
        return Err(ConfigError::Validation("plugin name must not be empty".into()).into());
    }

    if config.latency.min_ms > config.latency.max_ms {
        return Err(ConfigError::Validation(format!(
            "latency minMs ({}) must not exceed maxMs ({})",
            config.latency.min_ms, config.latency.max_ms
        ))
        .into());
    }

    if config.build.script.is_empty() {
        return Err(ConfigError::Validation("build script must not be empty".into()).into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerError;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();

        assert!(validate(&config).is_ok());
        assert_eq!(config.plugin.name, "plugin-worker");
        assert!(config.latency.enabled);
        assert!(config.latency.min_ms <= config.latency.max_ms);
        assert_eq!(config.build.script, "build");
        assert_eq!(config.build.output_dir, "out");
    }

    #[test]
    fn inverted_latency_bounds_are_rejected() {
        let mut config = Config::default();
        config.latency.min_ms = 500;
        config.latency.max_ms = 100;

        let error = validate(&config).unwrap_err();

        assert!(matches!(error, WorkerError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_plugin_name_is_rejected() {
        let mut config = Config::default();
        config.plugin.name = String::new();

        assert!(validate(&config).is_err());
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worker.toml");
        std::fs::write(
            &path,
            "[plugin]\nname = \"adder\"\n\n[latency]\nenabled = false\n",
        )
        .unwrap();

        let config = load_from_path(&path).unwrap();

        assert_eq!(config.plugin.name, "adder");
        assert!(!config.latency.enabled);
        // Untouched keys keep their defaults.
        assert_eq!(config.latency.max_ms, 250);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = load_from_path(&dir.path().join("nope.toml"));

        assert!(result.is_err());
    }
}
