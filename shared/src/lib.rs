use serde::{Deserialize, Serialize};

// Backend wire types and client trait
pub mod api;
pub use api::{ApiClientConfig, ApiError, ChatBackend, ChatQuery, ChatReply, UploadResponse};

// Widget configuration
pub mod config;
pub use config::WidgetConfig;

// Keyed session persistence
pub mod store;
pub use store::{KeyValueStorage, MemoryStorage, SessionStore, StoreError};

/// Title shown in the sidebar for sessions without a user message
pub const UNTITLED_SESSION: &str = "New Chat";

/// Number of words taken from the first user message for the sidebar title
const TITLE_WORDS: usize = 3;

/// Which backend a session talks to. Fixed once the session has any message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Document-grounded chat against an uploaded PDF
    #[default]
    Pdf,
    /// Plain chatbot, no attachment
    Direct,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Pdf => "pdf",
            ChatMode::Direct => "direct",
        }
    }

    /// Human-readable model name used in the selector and the locked label
    pub fn label(&self) -> &'static str {
        match self {
            ChatMode::Pdf => "PDFChat",
            ChatMode::Direct => "DirectChat",
        }
    }

    pub fn from_value(s: &str) -> Option<Self> {
        match s {
            "pdf" => Some(ChatMode::Pdf),
            "direct" => Some(ChatMode::Direct),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    /// One-time bubble announcing an attached file; text is the file name
    Document,
}

/// A single transcript entry. Never mutated after it is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text)
    }

    pub fn document(file_name: impl Into<String>) -> Self {
        Self::new(Sender::Document, file_name)
    }
}

/// One persisted conversation thread.
///
/// Field names match the JSON layout already present in browsers'
/// `chat_sessions` entries, so existing histories keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Creation time in milliseconds, as a string
    pub chat_id: String,
    #[serde(rename = "type")]
    pub mode: ChatMode,
    #[serde(default)]
    pub uploaded_file_name: Option<String>,
    #[serde(default)]
    pub has_uploaded_file: bool,
    /// Set once the document bubble for the current upload has been shown
    #[serde(default)]
    pub doc_used: bool,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(chat_id: impl Into<String>, mode: ChatMode) -> Self {
        Self {
            chat_id: chat_id.into(),
            mode,
            uploaded_file_name: None,
            has_uploaded_file: false,
            doc_used: false,
            messages: Vec::new(),
        }
    }

    /// Sidebar title: first words of the first non-blank user message.
    pub fn title(&self) -> String {
        let Some(first) = self
            .messages
            .iter()
            .find(|m| m.sender == Sender::User && !m.text.trim().is_empty())
        else {
            return UNTITLED_SESSION.to_string();
        };

        let words: Vec<&str> = first.text.split_whitespace().take(TITLE_WORDS).collect();
        format!("{}...", words.join(" "))
    }

    /// Once a session has messages its mode can no longer change
    pub fn is_mode_locked(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Record a successful upload. Re-arms the document bubble.
    pub fn attach_file(&mut self, file_name: impl Into<String>) {
        self.uploaded_file_name = Some(file_name.into());
        self.has_uploaded_file = true;
        self.doc_used = false;
    }

    /// File name of an attachment whose bubble has not been shown yet
    pub fn pending_document(&self) -> Option<&str> {
        if self.mode != ChatMode::Pdf || !self.has_uploaded_file || self.doc_used {
            return None;
        }
        self.uploaded_file_name.as_deref()
    }

    /// Append the document bubble for the current upload, at most once.
    ///
    /// Returns the appended message, or `None` if there was nothing to show.
    pub fn take_document_bubble(&mut self) -> Option<ChatMessage> {
        let message = ChatMessage::document(self.pending_document()?);
        self.messages.push(message.clone());
        self.doc_used = true;
        Some(message)
    }
}
