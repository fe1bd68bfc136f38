//! DOM-free chat logic.
//!
//! Every operation takes the [`ChatContext`] and the [`SessionStore`](shared::SessionStore)
//! explicitly; components own both and only translate events and render.

mod context;
pub mod conversation;
pub mod sessions;
pub mod upload;

pub use context::{ChatContext, UploadState};
pub use conversation::{PendingChat, ReplyOutcome, SendError};
pub use sessions::{ModelBinding, SidebarEntry};
pub use upload::{PendingUpload, UploadOutcome};

#[cfg(test)]
pub(crate) mod testing {
    use shared::{
        ApiError, ChatBackend, ChatMode, ChatReply, MemoryStorage, SessionStore, UploadResponse,
    };
    use std::cell::RefCell;

    pub fn memory_store() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new(), shared::config::SESSIONS_STORAGE_KEY)
    }

    /// Backend double recording every call
    pub struct MockBackend {
        pub upload_result: Result<UploadResponse, ApiError>,
        pub reply: Result<ChatReply, ApiError>,
        pub uploads: RefCell<Vec<(String, String)>>,
        pub questions: RefCell<Vec<(ChatMode, String, String)>>,
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self {
                upload_result: Ok(UploadResponse {
                    message: Some("File successfully uploaded".to_string()),
                    ..Default::default()
                }),
                reply: Ok(ChatReply::default()),
                uploads: RefCell::new(Vec::new()),
                questions: RefCell::new(Vec::new()),
            }
        }
    }

    impl MockBackend {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(ChatReply {
                    response: Some(text.to_string()),
                }),
                ..Default::default()
            }
        }
    }

    impl ChatBackend for MockBackend {
        type Attachment = String;

        async fn upload(
            &self,
            chat_id: &str,
            attachment: String,
        ) -> Result<UploadResponse, ApiError> {
            self.uploads
                .borrow_mut()
                .push((chat_id.to_string(), attachment));
            self.upload_result.clone()
        }

        async fn ask(
            &self,
            mode: ChatMode,
            chat_id: &str,
            query: &str,
        ) -> Result<ChatReply, ApiError> {
            self.questions
                .borrow_mut()
                .push((mode, chat_id.to_string(), query.to_string()));
            self.reply.clone()
        }
    }
}
