//! UI state threaded through every controller call

use shared::ChatMode;

/// File attachment lifecycle for the input bar's preview chip
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    /// Upload in flight for `chat_id`; sending is blocked
    Uploading { file_name: String, chat_id: String },
    Attached { file_name: String },
    Failed { file_name: String, error: String },
}

impl UploadState {
    pub fn file_name(&self) -> Option<&str> {
        match self {
            UploadState::Idle => None,
            UploadState::Uploading { file_name, .. }
            | UploadState::Attached { file_name }
            | UploadState::Failed { file_name, .. } => Some(file_name),
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, UploadState::Uploading { .. })
    }

    /// Whether the preview chip is shown
    pub fn is_visible(&self) -> bool {
        !matches!(self, UploadState::Idle)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UploadState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Which session is open, which mode new sessions get, and the upload chip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatContext {
    pub active_chat_id: Option<String>,
    /// Mode chosen in the model dropdown; bound to the active session on load
    pub selected_mode: ChatMode,
    pub upload: UploadState,
}

impl ChatContext {
    pub fn new(selected_mode: ChatMode) -> Self {
        Self {
            active_chat_id: None,
            selected_mode,
            upload: UploadState::Idle,
        }
    }

    pub fn is_active(&self, chat_id: &str) -> bool {
        self.active_chat_id.as_deref() == Some(chat_id)
    }

    /// Hide the preview chip. An in-flight upload keeps its chip until it
    /// resolves, otherwise the send lock would be lost with it.
    pub fn hide_preview(&mut self) {
        if !self.upload.is_uploading() {
            self.upload = UploadState::Idle;
        }
    }
}
