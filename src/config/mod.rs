pub mod schema;

pub use schema::{
    AssistantConfig, KnowledgeBaseConfig, KnowledgeFileConfig, ModelConfig, ProvisionConfig,
    ToolConfig, VoiceConfig,
};

use anyhow::{Context, Result};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "vapi.toml";

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<ProvisionConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ProvisionConfig =
            toml::from_str(&contents).context("Failed to parse provisioner config (TOML)")?;
        Ok(config)
    } else {
        Ok(ProvisionConfig::default())
    }
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &ProvisionConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, ProvisionConfig::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vapi.toml");

        let mut cfg = ProvisionConfig::default();
        cfg.assistant.name = "Margaret".into();
        cfg.tools.truncate(1);
        save_config(&cfg, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vapi.toml");
        std::fs::write(&path, "api_url = [").unwrap();
        assert!(load_config(&path).is_err());
    }
}
