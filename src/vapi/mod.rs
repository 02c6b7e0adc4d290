pub mod client;
pub mod types;

pub use client::VapiClient;
pub use types::{
    AttachToolsRequest, CreateAssistantRequest, CreateToolRequest, KnowledgeBase,
};
