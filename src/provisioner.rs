//! The four-step provisioning run.
//!
//! Steps, in order:
//! 1. Upload knowledge files
//! 2. Create the assistant
//! 3. Create query tools bound to the uploaded files
//! 4. Attach the tools to the assistant
//!
//! Each step returns its own result; [`Provisioner::run`] stops at the first
//! failure and reports which step failed. Nothing created before the failure
//! is cleaned up, and running twice creates everything twice.

use crate::config::{ProvisionConfig, ToolConfig};
use crate::error::{ProvisionError, ProvisionResult, StepError};
use crate::types::{PlannedRequest, ProvisionReport, ProvisionStep, StepEvent, UploadedFile};
use crate::vapi::types::{MessagePayload, ModelPayload, ToolIdsPayload, VoicePayload};
use crate::vapi::{
    AttachToolsRequest, CreateAssistantRequest, CreateToolRequest, KnowledgeBase, VapiClient,
};
use std::path::Path;
use tracing::info;

pub struct Provisioner {
    client: VapiClient,
    config: ProvisionConfig,
}

impl Provisioner {
    /// Validate `config` and pair it with a client.
    pub fn new(client: VapiClient, config: ProvisionConfig) -> ProvisionResult<Self> {
        config.validate()?;
        Ok(Self { client, config })
    }

    /// Build a client from the config's API URL and the API key in the environment.
    pub fn from_config(config: ProvisionConfig) -> ProvisionResult<Self> {
        let api_key = config.api_key()?;
        let client = VapiClient::new(&config.api_url, &api_key);
        Self::new(client, config)
    }

    // -- Step 1 ---------------------------------------------------------------

    /// Upload one file. Returns its platform id.
    pub async fn upload_file(&self, path: &Path) -> ProvisionResult<String> {
        let id = self.client.upload_file(path).await?;
        info!("Uploaded {} as {}", path.display(), id);
        Ok(id)
    }

    /// Upload every configured knowledge file, in config order.
    pub async fn upload_files(&self) -> ProvisionResult<Vec<UploadedFile>> {
        let mut uploaded = Vec::with_capacity(self.config.knowledge_files.len());
        for (key, path) in self.config.resolved_knowledge_files() {
            let id = self.upload_file(&path).await?;
            uploaded.push(UploadedFile { key, path, id });
        }
        Ok(uploaded)
    }

    // -- Step 2 ---------------------------------------------------------------

    pub fn assistant_request(&self) -> CreateAssistantRequest {
        let assistant = &self.config.assistant;
        CreateAssistantRequest {
            name: assistant.name.clone(),
            first_message: assistant.first_message.clone(),
            model: ModelPayload {
                provider: assistant.model.provider.clone(),
                model: assistant.model.model.clone(),
                messages: vec![MessagePayload {
                    role: "system".into(),
                    content: assistant.model.system_prompt.clone(),
                }],
            },
            voice: VoicePayload {
                provider: assistant.voice.provider.clone(),
                voice_id: assistant.voice.voice_id.clone(),
            },
        }
    }

    /// Create the assistant. Returns its platform id.
    pub async fn create_assistant(&self) -> ProvisionResult<String> {
        let id = self.client.create_assistant(&self.assistant_request()).await?;
        info!("Created assistant '{}' as {}", self.config.assistant.name, id);
        Ok(id)
    }

    // -- Step 3 ---------------------------------------------------------------

    /// Create one query tool. Returns its platform id.
    pub async fn create_tool(
        &self,
        name: &str,
        description: &str,
        knowledge_bases: Vec<KnowledgeBase>,
    ) -> ProvisionResult<String> {
        let request = CreateToolRequest::query(name, description, knowledge_bases);
        let id = self.client.create_tool(&request).await?;
        info!("Created tool '{}' as {}", name, id);
        Ok(id)
    }

    /// Create every configured tool with bindings resolved against `files`.
    ///
    /// With the default config this creates `account_lookup` (renters info
    /// only), then `get_rental_start_and_end` and `get_extended_cost` (renters
    /// info and rental schedule).
    pub async fn create_tools(&self, files: &[UploadedFile]) -> ProvisionResult<Vec<String>> {
        let requests = self.tool_requests(|key| {
            files
                .iter()
                .find(|f| f.key == key)
                .map(|f| f.id.clone())
        })?;

        let mut tool_ids = Vec::with_capacity(requests.len());
        for request in requests {
            let id = self
                .create_tool(
                    &request.function.name,
                    &request.function.description,
                    request.knowledge_bases,
                )
                .await?;
            tool_ids.push(id);
        }
        Ok(tool_ids)
    }

    fn tool_requests<F>(&self, resolve: F) -> ProvisionResult<Vec<CreateToolRequest>>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.config
            .tools
            .iter()
            .map(|tool| {
                let knowledge_bases = resolve_bindings(tool, &resolve)?;
                Ok(CreateToolRequest::query(
                    &tool.name,
                    &tool.description,
                    knowledge_bases,
                ))
            })
            .collect()
    }

    // -- Step 4 ---------------------------------------------------------------

    /// Replace the assistant's tool list with `tool_ids`.
    pub async fn attach_tools(&self, assistant_id: &str, tool_ids: &[String]) -> ProvisionResult<()> {
        self.client
            .update_assistant(assistant_id, &attach_request(tool_ids))
            .await?;
        info!("Attached {} tools to assistant {}", tool_ids.len(), assistant_id);
        Ok(())
    }

    // -- Driver ---------------------------------------------------------------

    /// Run all four steps, calling `on_event` after each one succeeds.
    pub async fn run<F>(&self, mut on_event: F) -> Result<ProvisionReport, StepError>
    where
        F: FnMut(StepEvent<'_>),
    {
        let files = self
            .upload_files()
            .await
            .map_err(|e| StepError::new(ProvisionStep::UploadFiles, e))?;
        on_event(StepEvent::FilesUploaded(&files));

        let assistant_id = self
            .create_assistant()
            .await
            .map_err(|e| StepError::new(ProvisionStep::CreateAssistant, e))?;
        on_event(StepEvent::AssistantCreated(&assistant_id));

        let tool_ids = self
            .create_tools(&files)
            .await
            .map_err(|e| StepError::new(ProvisionStep::CreateTools, e))?;
        on_event(StepEvent::ToolsCreated(&tool_ids));

        self.attach_tools(&assistant_id, &tool_ids)
            .await
            .map_err(|e| StepError::new(ProvisionStep::AttachTools, e))?;
        on_event(StepEvent::ToolsAttached {
            assistant_id: &assistant_id,
            tool_ids: &tool_ids,
        });

        Ok(ProvisionReport {
            files,
            assistant_id,
            tool_ids,
        })
    }

    /// The requests a run would send, with `<...>` placeholders for ids the
    /// platform has not assigned yet. Sends nothing.
    pub fn plan(&self) -> ProvisionResult<Vec<PlannedRequest>> {
        let mut plan = Vec::new();

        for (_, path) in self.config.resolved_knowledge_files() {
            plan.push(PlannedRequest {
                step: ProvisionStep::UploadFiles,
                method: "POST",
                path: "/file".into(),
                body: None,
                file: Some(path),
            });
        }

        plan.push(PlannedRequest {
            step: ProvisionStep::CreateAssistant,
            method: "POST",
            path: "/assistant".into(),
            body: Some(to_json(&self.assistant_request())?),
            file: None,
        });

        let tool_requests = self.tool_requests(|key| {
            self.config
                .knowledge_files
                .iter()
                .any(|f| f.key == key)
                .then(|| format!("<file:{}>", key))
        })?;
        let mut placeholder_ids = Vec::with_capacity(tool_requests.len());
        for request in &tool_requests {
            placeholder_ids.push(format!("<tool:{}>", request.function.name));
            plan.push(PlannedRequest {
                step: ProvisionStep::CreateTools,
                method: "POST",
                path: "/tool".into(),
                body: Some(to_json(request)?),
                file: None,
            });
        }

        plan.push(PlannedRequest {
            step: ProvisionStep::AttachTools,
            method: "PATCH",
            path: "/assistant/<assistant>".into(),
            body: Some(to_json(&attach_request(&placeholder_ids))?),
            file: None,
        });

        Ok(plan)
    }
}

fn attach_request(tool_ids: &[String]) -> AttachToolsRequest {
    AttachToolsRequest {
        model: ToolIdsPayload {
            tool_ids: tool_ids.to_vec(),
        },
    }
}

fn resolve_bindings<F>(tool: &ToolConfig, resolve: &F) -> ProvisionResult<Vec<KnowledgeBase>>
where
    F: Fn(&str) -> Option<String>,
{
    tool.knowledge_bases
        .iter()
        .map(|kb| {
            let file_ids = kb
                .files
                .iter()
                .map(|key| {
                    resolve(key).ok_or_else(|| {
                        ProvisionError::Config(format!(
                            "tool '{}' references knowledge file '{}' which was not uploaded",
                            tool.name, key
                        ))
                    })
                })
                .collect::<ProvisionResult<Vec<_>>>()?;
            Ok(KnowledgeBase {
                provider: kb.provider.clone(),
                name: kb.name.clone(),
                description: kb.description.clone(),
                file_ids,
            })
        })
        .collect()
}

fn to_json<T: serde::Serialize>(value: &T) -> ProvisionResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ProvisionError::Config(e.to_string()))
}
