//! Shared types used across the provisioner.

use serde::Serialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Provisioning steps
// ---------------------------------------------------------------------------

/// The four ordered steps of a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStep {
    /// Upload knowledge files.
    UploadFiles,
    /// Create the assistant.
    CreateAssistant,
    /// Create the query tools bound to the uploaded files.
    CreateTools,
    /// Point the assistant's model at the created tools.
    AttachTools,
}

impl ProvisionStep {
    pub const ALL: [ProvisionStep; 4] = [
        Self::UploadFiles,
        Self::CreateAssistant,
        Self::CreateTools,
        Self::AttachTools,
    ];

    /// 1-based position in the run.
    pub fn number(self) -> usize {
        match self {
            Self::UploadFiles => 1,
            Self::CreateAssistant => 2,
            Self::CreateTools => 3,
            Self::AttachTools => 4,
        }
    }

    /// Heading printed once the step succeeds.
    pub fn success_message(self) -> &'static str {
        match self {
            Self::UploadFiles => "Files successfully uploaded",
            Self::CreateAssistant => "Agent created",
            Self::CreateTools => "Tools created",
            Self::AttachTools => "Tools attached to agent",
        }
    }

    /// Prefix used when reporting a failure of this step.
    pub fn error_prefix(self) -> &'static str {
        match self {
            Self::UploadFiles => "Error uploading files",
            Self::CreateAssistant => "Error creating agent",
            Self::CreateTools => "Error creating tools",
            Self::AttachTools => "Error attaching tools",
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A knowledge file after upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    /// Config key tool bindings refer to.
    pub key: String,
    pub path: PathBuf,
    /// Platform-assigned file id.
    pub id: String,
}

/// Everything a successful run created, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub files: Vec<UploadedFile>,
    pub assistant_id: String,
    pub tool_ids: Vec<String>,
}

impl ProvisionReport {
    /// Look up an uploaded file id by its config key.
    pub fn file_id(&self, key: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.id.as_str())
    }
}

/// Emitted after each step completes, so the caller can report progress.
#[derive(Debug, Clone, Copy)]
pub enum StepEvent<'a> {
    FilesUploaded(&'a [UploadedFile]),
    AssistantCreated(&'a str),
    ToolsCreated(&'a [String]),
    ToolsAttached {
        assistant_id: &'a str,
        tool_ids: &'a [String],
    },
}

impl StepEvent<'_> {
    pub fn step(&self) -> ProvisionStep {
        match self {
            Self::FilesUploaded(_) => ProvisionStep::UploadFiles,
            Self::AssistantCreated(_) => ProvisionStep::CreateAssistant,
            Self::ToolsCreated(_) => ProvisionStep::CreateTools,
            Self::ToolsAttached { .. } => ProvisionStep::AttachTools,
        }
    }
}

/// A request the provisioner would send, used for dry runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRequest {
    pub step: ProvisionStep,
    pub method: &'static str,
    pub path: String,
    /// JSON body, or `None` for multipart uploads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Local file sent as the multipart `file` part.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}
