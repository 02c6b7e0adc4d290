//! Configuration schema for vapi.toml.

use crate::error::{ProvisionError, ProvisionResult};
use crate::prompts;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Vapi API base URL.
    pub api_url: String,

    /// Environment variable holding the Vapi API key.
    pub api_key_env: String,

    /// Local files uploaded as knowledge-base documents, in upload order.
    pub knowledge_files: Vec<KnowledgeFileConfig>,

    pub assistant: AssistantConfig,

    /// Query tools created and attached to the assistant, in creation order.
    pub tools: Vec<ToolConfig>,
}

/// A local file to upload, addressed by `key` from tool bindings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeFileConfig {
    pub key: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AssistantConfig {
    pub name: String,
    pub first_message: String,
    pub model: ModelConfig,
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VoiceConfig {
    pub provider: String,
    pub voice_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolConfig {
    pub name: String,
    pub description: String,
    pub knowledge_bases: Vec<KnowledgeBaseConfig>,
}

/// One knowledge base a tool can query. `files` lists knowledge-file keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeBaseConfig {
    #[serde(default = "default_kb_provider")]
    pub provider: String,
    pub name: String,
    pub description: String,
    pub files: Vec<String>,
}

fn default_kb_provider() -> String {
    "google".into()
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        let renters_info = || KnowledgeBaseConfig {
            provider: default_kb_provider(),
            name: "renters_info".into(),
            description: "Use this to retrieve account information".into(),
            files: vec!["renters_info".into()],
        };
        // The two-source tools label the renters base differently on the platform.
        let renters_info_info = || KnowledgeBaseConfig {
            name: "renters_info info".into(),
            ..renters_info()
        };
        let rental_schedule = || KnowledgeBaseConfig {
            provider: default_kb_provider(),
            name: "rental_schedule".into(),
            description: "Use this to retrieve transactions".into(),
            files: vec!["rental_schedule".into()],
        };

        Self {
            api_url: "https://api.vapi.ai".into(),
            api_key_env: "VAPI_API_KEY".into(),
            knowledge_files: vec![
                KnowledgeFileConfig {
                    key: "renters_info".into(),
                    path: "renters_info.csv".into(),
                },
                KnowledgeFileConfig {
                    key: "rental_schedule".into(),
                    path: "rental_schedule.csv".into(),
                },
            ],
            assistant: AssistantConfig::default(),
            tools: vec![
                ToolConfig {
                    name: "account_lookup".into(),
                    description: prompts::ACCOUNT_LOOKUP_TOOL_PROMPT.into(),
                    knowledge_bases: vec![renters_info()],
                },
                ToolConfig {
                    name: "get_rental_start_and_end".into(),
                    description: prompts::RENTAL_START_AND_END_TOOL_PROMPT.into(),
                    knowledge_bases: vec![renters_info_info(), rental_schedule()],
                },
                ToolConfig {
                    name: "get_extended_cost".into(),
                    description: prompts::GET_EXTENDED_COST_TOOL_PROMPT.into(),
                    knowledge_bases: vec![renters_info_info(), rental_schedule()],
                },
            ],
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "Elizabeth".into(),
            first_message: prompts::FIRST_MESSAGE.into(),
            model: ModelConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            model: "gpt-4o".into(),
            system_prompt: prompts::SYSTEM_PROMPT.into(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            provider: "vapi".into(),
            voice_id: "Kylie".into(),
        }
    }
}

impl ProvisionConfig {
    /// Resolve a path that may contain `~`. Relative paths stay relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).into_owned())
    }

    /// Knowledge files with resolved paths, in upload order.
    pub fn resolved_knowledge_files(&self) -> Vec<(String, PathBuf)> {
        self.knowledge_files
            .iter()
            .map(|f| (f.key.clone(), self.resolve_path(&f.path)))
            .collect()
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> ProvisionResult<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ProvisionError::MissingCredential(self.api_key_env.clone())),
        }
    }

    /// Check the structural rules a run depends on before anything is sent.
    pub fn validate(&self) -> ProvisionResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(ProvisionError::Config("api_url is empty".into()));
        }
        if self.knowledge_files.is_empty() {
            return Err(ProvisionError::Config(
                "at least one knowledge file is required".into(),
            ));
        }

        let mut keys = HashSet::new();
        for file in &self.knowledge_files {
            if file.key.is_empty() {
                return Err(ProvisionError::Config(format!(
                    "knowledge file {} has an empty key",
                    file.path
                )));
            }
            if !keys.insert(file.key.as_str()) {
                return Err(ProvisionError::Config(format!(
                    "duplicate knowledge file key '{}'",
                    file.key
                )));
            }
        }

        if self.tools.is_empty() {
            return Err(ProvisionError::Config("at least one tool is required".into()));
        }
        for tool in &self.tools {
            if tool.name.is_empty() {
                return Err(ProvisionError::Config("tool with empty name".into()));
            }
            for kb in &tool.knowledge_bases {
                if kb.files.is_empty() {
                    return Err(ProvisionError::Config(format!(
                        "knowledge base '{}' of tool '{}' lists no files",
                        kb.name, tool.name
                    )));
                }
                if let Some(unknown) = kb.files.iter().find(|k| !keys.contains(k.as_str())) {
                    return Err(ProvisionError::Config(format!(
                        "tool '{}' references unknown knowledge file '{}'",
                        tool.name, unknown
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_rental_agent() {
        let cfg = ProvisionConfig::default();
        assert_eq!(cfg.api_url, "https://api.vapi.ai");
        assert_eq!(cfg.assistant.name, "Elizabeth");
        assert_eq!(cfg.assistant.model.model, "gpt-4o");
        assert_eq!(cfg.assistant.voice.voice_id, "Kylie");

        let names: Vec<&str> = cfg.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["account_lookup", "get_rental_start_and_end", "get_extended_cost"]
        );
        assert_eq!(cfg.tools[0].knowledge_bases.len(), 1);
        assert_eq!(cfg.tools[1].knowledge_bases.len(), 2);
        assert_eq!(cfg.tools[2].knowledge_bases.len(), 2);

        let kb_names: Vec<Vec<&str>> = cfg
            .tools
            .iter()
            .map(|t| t.knowledge_bases.iter().map(|kb| kb.name.as_str()).collect())
            .collect();
        assert_eq!(
            kb_names,
            vec![
                vec!["renters_info"],
                vec!["renters_info info", "rental_schedule"],
                vec!["renters_info info", "rental_schedule"],
            ]
        );
        cfg.validate().unwrap();
    }

    #[test]
    fn unknown_file_key_is_rejected() {
        let mut cfg = ProvisionConfig::default();
        cfg.tools[0].knowledge_bases[0].files = vec!["payments".into()];
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("unknown knowledge file 'payments'"));
    }

    #[test]
    fn duplicate_file_key_is_rejected() {
        let mut cfg = ProvisionConfig::default();
        cfg.knowledge_files[1].key = "renters_info".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_tool_list_is_rejected() {
        let cfg = ProvisionConfig {
            tools: Vec::new(),
            ..ProvisionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_api_key_is_a_credential_error() {
        let cfg = ProvisionConfig {
            api_key_env: "VAPI_PROVISIONER_TEST_UNSET_KEY".into(),
            ..ProvisionConfig::default()
        };
        let err = cfg.api_key().unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::Credential);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: ProvisionConfig = toml::from_str(
            r#"
            api_url = "http://localhost:9999"

            [assistant.voice]
            voice_id = "Elliot"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api_url, "http://localhost:9999");
        assert_eq!(cfg.assistant.voice.voice_id, "Elliot");
        assert_eq!(cfg.assistant.voice.provider, "vapi");
        assert_eq!(cfg.tools.len(), 3);
    }
}
