//! Applying replies from the layout-generation endpoint.
//!
//! The host performs the HTTP call. The editor builds the request body and
//! validates the reply; a reply that does not have the expected shape
//! leaves the document and history untouched.

use crate::editor::Editor;
use ld_core::ElementData;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown to the user for any generation failure.
pub const GENERATE_FAILED_MESSAGE: &str =
    "Failed to generate layout, please try submitting your query again.";

/// Body sent to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_document: Option<ElementData>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    reply: Reply,
}

#[derive(Debug, Deserialize)]
struct Reply {
    content: String,
}

/// A layout produced by the endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLayout {
    #[serde(default)]
    pub system_message: Option<String>,
    pub root: ElementData,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    /// The response body is not `{ reply: { content } }`.
    #[error("Failed to generate layout, please try submitting your query again.")]
    Response(#[source] serde_json::Error),
    /// `content` is not `{ systemMessage?, root }`.
    #[error("Failed to generate layout, please try submitting your query again.")]
    Content(#[source] serde_json::Error),
    /// The request itself failed, as reported by the host.
    #[error("Failed to generate layout, please try submitting your query again.")]
    Transport(String),
}

/// Validate a raw endpoint response.
pub fn parse_generate_reply(body: &str) -> Result<GeneratedLayout, GenerateError> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(GenerateError::Response)?;
    serde_json::from_str(&response.reply.content).map_err(GenerateError::Content)
}

impl Editor {
    /// Request body for `message`, carrying the current document.
    pub fn generate_request(&self, message: &str) -> GenerateRequest {
        GenerateRequest {
            message: message.to_string(),
            current_document: Some(self.document.to_data()),
        }
    }

    /// Replace the document with a generated layout. Returns the layout
    /// (including any system message for the chat log) on success.
    pub fn apply_generate_reply(&mut self, body: &str) -> Result<GeneratedLayout, GenerateError> {
        let layout = parse_generate_reply(body).inspect_err(|e| {
            log::warn!("generation reply rejected: {:?}", e);
        })?;
        self.replace_root(&layout.root);
        self.flush();
        Ok(layout)
    }
}
