//! Vapi REST API client for files, assistants and tools.
//!
//! Every request builds its own headers: bearer auth always, and a content
//! type only from the body it carries (JSON or multipart).

use crate::error::{ProvisionError, ProvisionResult};
use crate::vapi::types::{AttachToolsRequest, CreateAssistantRequest, CreateToolRequest, CreatedResource};
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tracing::debug;

/// Vapi API client.
#[derive(Debug, Clone)]
pub struct VapiClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl VapiClient {
    /// Create a new Vapi client.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Upload a local file as a knowledge-base document. Returns the file id.
    pub async fn upload_file(&self, path: &Path) -> ProvisionResult<String> {
        let endpoint = "POST /file".to_string();
        debug!("Vapi upload: {}", path.display());

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ProvisionError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for_path(path))
            .map_err(|source| ProvisionError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let request = self
            .http
            .post(self.url("file"))
            .bearer_auth(&self.api_key)
            .multipart(Form::new().part("file", part));

        self.send_for_id(endpoint, request).await
    }

    /// Create an assistant. Returns the assistant id.
    pub async fn create_assistant(&self, body: &CreateAssistantRequest) -> ProvisionResult<String> {
        debug!("Vapi create assistant: {}", body.name);
        let request = self
            .http
            .post(self.url("assistant"))
            .bearer_auth(&self.api_key)
            .json(body);
        self.send_for_id("POST /assistant".into(), request).await
    }

    /// Create a tool. Returns the tool id.
    pub async fn create_tool(&self, body: &CreateToolRequest) -> ProvisionResult<String> {
        debug!("Vapi create tool: {}", body.function.name);
        let request = self
            .http
            .post(self.url("tool"))
            .bearer_auth(&self.api_key)
            .json(body);
        self.send_for_id("POST /tool".into(), request).await
    }

    /// Partially update an assistant's model with a tool-id list.
    pub async fn update_assistant(
        &self,
        assistant_id: &str,
        body: &AttachToolsRequest,
    ) -> ProvisionResult<()> {
        let endpoint = format!("PATCH /assistant/{}", assistant_id);
        debug!("Vapi {}", endpoint);

        let resp = self
            .http
            .patch(self.url(&format!("assistant/{}", assistant_id)))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|source| ProvisionError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProvisionError::Http {
                endpoint,
                status,
                body,
            });
        }

        Ok(())
    }

    /// Send a create request and pull the `id` out of a successful response.
    async fn send_for_id(
        &self,
        endpoint: String,
        request: reqwest::RequestBuilder,
    ) -> ProvisionResult<String> {
        let resp = request
            .send()
            .await
            .map_err(|source| ProvisionError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProvisionError::Http {
                endpoint,
                status,
                body,
            });
        }

        let text = resp
            .text()
            .await
            .map_err(|source| ProvisionError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;
        let created: CreatedResource =
            serde_json::from_str(&text).map_err(|source| ProvisionError::Decode {
                endpoint: endpoint.clone(),
                source,
            })?;

        match created.id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ProvisionError::MissingId { endpoint }),
        }
    }
}

/// MIME type for an uploaded knowledge file, from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("txt") | Some("md") => "text/plain",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_path(&PathBuf::from("renters_info.csv")), "text/csv");
        assert_eq!(mime_for_path(&PathBuf::from("RATES.CSV")), "text/csv");
        assert_eq!(mime_for_path(&PathBuf::from("notes.md")), "text/plain");
        assert_eq!(mime_for_path(&PathBuf::from("blob")), "application/octet-stream");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = VapiClient::new("https://api.vapi.ai/", "key");
        assert_eq!(client.base_url(), "https://api.vapi.ai");
        assert_eq!(client.url("/assistant/a1"), "https://api.vapi.ai/assistant/a1");
    }

    #[tokio::test]
    async fn missing_file_fails_before_any_request() {
        // Port 9 is discard; nothing is sent because the read fails first.
        let client = VapiClient::new("http://127.0.0.1:9", "key");
        let err = client
            .upload_file(Path::new("definitely/not/here.csv"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::Io);
    }
}
