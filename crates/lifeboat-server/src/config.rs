//! YAML configuration loading for the form server.
//!
//! Loads [`AppConfig`] from a YAML file on disk, falling back to defaults
//! when no file is specified.

use lifeboat_core::AppConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "LIFEBOAT_CONFIG";

/// Load an [`AppConfig`] from a YAML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
    let config: AppConfig = serde_yaml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config YAML: {}", e))?;
    Ok(config)
}

/// Load configuration from, in order: the first CLI argument, the
/// [`CONFIG_ENV`] environment variable, or defaults.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let config_path: Option<PathBuf> = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from);

    match config_path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration from file");
            load_config(&path)
        }
        None => {
            info!("No config file specified, using defaults");
            Ok(AppConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to write YAML to a temp file and return the path.
    fn write_yaml(yaml: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_load_config_full() {
        let yaml = r#"
listen_addr: "127.0.0.1:9000"
model_path: "/srv/lifeboat/titanic_model.json"
max_request_size_bytes: 4096
overrides:
  always_survive: ["Rose", "kartik"]
  never_survive: ["Jack"]
"#;
        let f = write_yaml(yaml);
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.model_path, "/srv/lifeboat/titanic_model.json");
        assert_eq!(config.max_request_size_bytes, 4096);
        assert_eq!(config.overrides.always_survive, ["Rose", "kartik"]);
        assert_eq!(config.overrides.never_survive, ["Jack"]);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let f = write_yaml("listen_addr: \"127.0.0.1:1234\"\n");
        let config = load_config(f.path()).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.listen_addr, "127.0.0.1:1234");
        assert_eq!(config.model_path, defaults.model_path);
        assert_eq!(config.overrides, defaults.overrides);
    }

    #[test]
    fn test_partial_overrides_keep_other_default_list() {
        let f = write_yaml("overrides:\n  never_survive: [\"Cal\"]\n");
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.overrides.never_survive, ["Cal"]);
        assert_eq!(config.overrides.always_survive, ["kartik"]);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/lifeboat.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let f = write_yaml("not: [valid: yaml: {{{}}}");
        let result = load_config(f.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_example_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config.example.yaml");
        let config = load_config(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../models")
            .join(&config.model_path)
            .is_file());
    }
}
