//! Request and response bodies for the Vapi REST API.

use serde::{Deserialize, Serialize};

// -- Assistant ---------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssistantRequest {
    pub name: String,
    pub first_message: String,
    pub model: ModelPayload,
    pub voice: VoicePayload,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelPayload {
    pub provider: String,
    pub model: String,
    pub messages: Vec<MessagePayload>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MessagePayload {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoicePayload {
    pub provider: String,
    pub voice_id: String,
}

/// Partial update that only replaces the model's tool list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttachToolsRequest {
    pub model: ToolIdsPayload,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolIdsPayload {
    pub tool_ids: Vec<String>,
}

// -- Tools -------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateToolRequest {
    pub r#type: String,
    pub function: FunctionPayload,
    pub knowledge_bases: Vec<KnowledgeBase>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FunctionPayload {
    pub name: String,
    pub description: String,
}

/// A knowledge-base binding with concrete file ids.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    pub provider: String,
    pub name: String,
    pub description: String,
    pub file_ids: Vec<String>,
}

impl CreateToolRequest {
    pub fn query(name: &str, description: &str, knowledge_bases: Vec<KnowledgeBase>) -> Self {
        Self {
            r#type: "query".into(),
            function: FunctionPayload {
                name: name.to_string(),
                description: description.to_string(),
            },
            knowledge_bases,
        }
    }
}

// -- Responses ---------------------------------------------------------------

/// The only part of a created resource the provisioner relies on.
#[derive(Debug, Deserialize)]
pub struct CreatedResource {
    pub id: Option<String>,
}
