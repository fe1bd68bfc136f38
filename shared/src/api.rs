//! Backend API types and client trait
//!
//! This module defines the contract with the chat backend. The WASM client
//! in the frontend implements [`ChatBackend`] with gloo-net; tests use an
//! in-process mock.

use serde::{Deserialize, Serialize};

use crate::ChatMode;

/// API error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Network or connection error
    #[error("Network error: {0}")]
    Network(String),
    /// Server returned an error status with no usable body
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// Failed to build the request or parse the response
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Response from `POST /upload`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl UploadResponse {
    /// The backend signals success with a non-empty `message`
    pub fn is_success(&self) -> bool {
        self.message.as_deref().is_some_and(|m| !m.is_empty())
    }
}

/// Body of `POST /chat` and `POST /chatbot`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatQuery {
    pub query: String,
}

/// Response from `POST /chat` and `POST /chatbot`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatReply {
    /// Reply text, if the backend produced a non-empty one
    pub fn text(&self) -> Option<&str> {
        self.response.as_deref().filter(|r| !r.is_empty())
    }
}

/// API endpoint definitions
pub mod endpoints {
    use crate::ChatMode;

    pub const UPLOAD: &str = "/upload";
    pub const CHAT: &str = "/chat";
    pub const CHATBOT: &str = "/chatbot";

    /// Multipart field name carrying the uploaded file
    pub const UPLOAD_FIELD: &str = "file";

    /// Stored ids are not validated on load, so they are always encoded
    fn with_chat_id(route: &str, chat_id: &str) -> String {
        format!("{}?chat_id={}", route, urlencoding::encode(chat_id))
    }

    pub fn upload(chat_id: &str) -> String {
        with_chat_id(UPLOAD, chat_id)
    }

    /// Chat route for a session mode
    pub fn chat(mode: ChatMode, chat_id: &str) -> String {
        let route = match mode {
            ChatMode::Pdf => CHAT,
            ChatMode::Direct => CHATBOT,
        };
        with_chat_id(route, chat_id)
    }
}

/// Trait defining the chat backend API
///
/// `Attachment` is whatever the implementation uploads: a browser `File`
/// for the WASM client, plain data in tests.
#[allow(async_fn_in_trait)]
pub trait ChatBackend {
    type Attachment;

    /// Upload a document for a session
    async fn upload(
        &self,
        chat_id: &str,
        attachment: Self::Attachment,
    ) -> Result<UploadResponse, ApiError>;

    /// Ask a question in the given mode
    async fn ask(&self, mode: ChatMode, chat_id: &str, query: &str)
        -> Result<ChatReply, ApiError>;
}

/// Configuration for creating an API client
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiClientConfig {
    /// Base URL of the server (e.g., "http://localhost:5000"). Empty means
    /// same-origin relative URLs.
    pub base_url: String,
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}
