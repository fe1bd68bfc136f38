//! Sending a query: validation, the one-time document bubble, the user
//! message, and the backend reply.

use shared::{
    ApiError, ChatBackend, ChatMessage, ChatMode, ChatReply, ChatSession, KeyValueStorage,
    SessionStore, StoreError,
};

use super::sessions::ensure_active_session;
use super::ChatContext;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Please upload a PDF first!")]
    MissingDocument,
    #[error("File is still uploading. Please wait...")]
    UploadInProgress,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SendError {
    /// Validation failures are shown to the user; the rest are only logged
    pub fn is_user_facing(&self) -> bool {
        matches!(self, SendError::MissingDocument | SendError::UploadInProgress)
    }
}

/// A question waiting for the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChat {
    pub chat_id: String,
    pub mode: ChatMode,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// The session after all local appends
    pub session: ChatSession,
    /// Messages appended by this send, in order
    pub appended: Vec<ChatMessage>,
    /// Request to dispatch, if a query was typed
    pub request: Option<PendingChat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Reply stored; `visible` when its session is still on screen
    Appended {
        session: ChatSession,
        message: ChatMessage,
        visible: bool,
    },
    /// Request failed or the backend had nothing to say
    NoReply,
    SessionGone,
}

/// Validate and record a send. The caller clears the input on `Ok` and
/// dispatches `request` if there is one.
pub fn begin_send<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
    raw_query: &str,
) -> Result<SendOutcome, SendError> {
    let query = raw_query.trim();
    let mut session = ensure_active_session(ctx, store)?;

    if session.mode == ChatMode::Pdf && !session.has_uploaded_file && !query.is_empty() {
        return Err(SendError::MissingDocument);
    }
    if ctx.upload.is_uploading() {
        return Err(SendError::UploadInProgress);
    }

    let mut appended = Vec::new();
    if let Some(bubble) = session.take_document_bubble() {
        store.upsert(&session)?;
        appended.push(bubble);
    }

    let mut request = None;
    if !query.is_empty() {
        let message = ChatMessage::user(query);
        session.push(message.clone());
        store.upsert(&session)?;
        appended.push(message);

        request = Some(PendingChat {
            chat_id: session.chat_id.clone(),
            mode: session.mode,
            query: query.to_string(),
        });
    }

    ctx.hide_preview();
    Ok(SendOutcome {
        session,
        appended,
        request,
    })
}

/// Ask the backend route matching the session mode
pub async fn dispatch<B: ChatBackend>(
    backend: &B,
    request: &PendingChat,
) -> Result<ChatReply, ApiError> {
    backend
        .ask(request.mode, &request.chat_id, &request.query)
        .await
}

/// Store the reply on the session the question was asked in.
pub fn finish_send<S: KeyValueStorage>(
    ctx: &ChatContext,
    store: &SessionStore<S>,
    request: &PendingChat,
    result: Result<ChatReply, ApiError>,
) -> Result<ReplyOutcome, StoreError> {
    let reply = match result {
        Ok(reply) => reply,
        Err(e) => {
            log::error!("Chat request for {} failed: {}", request.chat_id, e);
            return Ok(ReplyOutcome::NoReply);
        }
    };
    let Some(text) = reply.text() else {
        log::warn!("Backend returned no response for chat {}", request.chat_id);
        return Ok(ReplyOutcome::NoReply);
    };

    let message = ChatMessage::ai(text);
    let Some(session) = store.update(&request.chat_id, |s| s.push(message.clone()))? else {
        log::warn!("Dropping reply for deleted chat {}", request.chat_id);
        return Ok(ReplyOutcome::SessionGone);
    };

    Ok(ReplyOutcome::Appended {
        visible: ctx.is_active(&session.chat_id),
        session,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::sessions::{delete_session, sidebar_entries, start_new_chat_at};
    use crate::controller::testing::{memory_store, MockBackend};
    use crate::controller::upload::{begin_upload, finish_upload, perform_upload};
    use crate::controller::UploadState;
    use shared::{Sender, UploadResponse};

    #[test]
    fn pdf_send_without_upload_is_rejected() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        start_new_chat_at(&mut ctx, &store, 1).unwrap();

        let err = begin_send(&mut ctx, &store, "hi").unwrap_err();
        assert!(matches!(err, SendError::MissingDocument));
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "Please upload a PDF first!");
        assert!(store.get("1").unwrap().unwrap().messages.is_empty());
    }

    #[test]
    fn rejected_send_without_session_still_opens_one() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        assert!(sidebar_entries(&ctx, &store).unwrap().is_empty());

        let err = begin_send(&mut ctx, &store, "hi").unwrap_err();
        assert!(matches!(err, SendError::MissingDocument));

        let chat_id = ctx.active_chat_id.clone().unwrap();
        let entries = sidebar_entries(&ctx, &store).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].chat_id, chat_id);
        assert_eq!(entries[0].title, "New Chat");
        assert!(entries[0].active);

        let session = store.get(&chat_id).unwrap().unwrap();
        assert_eq!(session.mode, ChatMode::Pdf);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn send_while_uploading_is_rejected() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Direct);
        start_new_chat_at(&mut ctx, &store, 1).unwrap();
        ctx.upload = UploadState::Uploading {
            file_name: "a.pdf".into(),
            chat_id: "1".into(),
        };

        let err = begin_send(&mut ctx, &store, "hi").unwrap_err();
        assert_eq!(err.to_string(), "File is still uploading. Please wait...");
        assert!(store.get("1").unwrap().unwrap().messages.is_empty());
        assert!(ctx.upload.is_uploading());
    }

    #[tokio::test]
    async fn upload_then_send_stores_bubble_query_and_reply_in_order() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        start_new_chat_at(&mut ctx, &store, 1).unwrap();
        let backend = MockBackend::replying("hello");

        let pending = begin_upload(&mut ctx, &store, "paper.pdf")
            .unwrap()
            .unwrap();
        let result = perform_upload(&backend, &pending, "bytes".to_string()).await;
        finish_upload(&mut ctx, &store, &pending, result).unwrap();

        let outcome = begin_send(&mut ctx, &store, "  hi  ").unwrap();
        assert_eq!(
            outcome.appended,
            vec![ChatMessage::document("paper.pdf"), ChatMessage::user("hi")]
        );
        assert_eq!(ctx.upload, UploadState::Idle);

        let request = outcome.request.unwrap();
        assert_eq!(request.mode, ChatMode::Pdf);
        assert_eq!(request.query, "hi");

        let reply = dispatch(&backend, &request).await;
        let outcome = finish_send(&ctx, &store, &request, reply).unwrap();
        assert!(matches!(
            outcome,
            ReplyOutcome::Appended { visible: true, .. }
        ));

        let session = store.get("1").unwrap().unwrap();
        assert_eq!(
            session.messages,
            vec![
                ChatMessage::document("paper.pdf"),
                ChatMessage::user("hi"),
                ChatMessage::ai("hello"),
            ]
        );
        assert!(session.doc_used);
        assert_eq!(
            backend.questions.borrow().as_slice(),
            &[(ChatMode::Pdf, "1".to_string(), "hi".to_string())]
        );
    }

    #[test]
    fn document_bubble_is_not_repeated() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        start_new_chat_at(&mut ctx, &store, 1).unwrap();
        store.update("1", |s| s.attach_file("paper.pdf")).unwrap();

        begin_send(&mut ctx, &store, "first").unwrap();
        let second = begin_send(&mut ctx, &store, "second").unwrap();
        assert_eq!(second.appended, vec![ChatMessage::user("second")]);

        let documents = store
            .get("1")
            .unwrap()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.sender == Sender::Document)
            .count();
        assert_eq!(documents, 1);
    }

    #[test]
    fn empty_query_with_fresh_upload_only_shows_bubble() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        start_new_chat_at(&mut ctx, &store, 1).unwrap();
        store.update("1", |s| s.attach_file("paper.pdf")).unwrap();

        let outcome = begin_send(&mut ctx, &store, "   ").unwrap();
        assert_eq!(outcome.appended, vec![ChatMessage::document("paper.pdf")]);
        assert!(outcome.request.is_none());
    }

    #[test]
    fn empty_query_without_upload_does_nothing() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        ctx.upload = UploadState::Failed {
            file_name: "a.pdf".into(),
            error: "Error uploading PDF".into(),
        };

        let outcome = begin_send(&mut ctx, &store, "").unwrap();
        assert!(outcome.appended.is_empty());
        assert!(outcome.request.is_none());
        // Preview is hidden on every accepted send
        assert_eq!(ctx.upload, UploadState::Idle);
        // A session was still created for the send
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn direct_mode_asks_chatbot_route() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Direct);
        let backend = MockBackend::replying("sure");

        let outcome = begin_send(&mut ctx, &store, "hello there").unwrap();
        assert_eq!(outcome.appended, vec![ChatMessage::user("hello there")]);
        let request = outcome.request.unwrap();
        assert_eq!(request.mode, ChatMode::Direct);

        let reply = dispatch(&backend, &request).await;
        finish_send(&ctx, &store, &request, reply).unwrap();
        let session = store.get(&request.chat_id).unwrap().unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.title(), "hello there...");
    }

    #[test]
    fn failed_request_appends_nothing() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Direct);
        let request = begin_send(&mut ctx, &store, "hi").unwrap().request.unwrap();

        let outcome = finish_send(
            &ctx,
            &store,
            &request,
            Err(ApiError::Parse("expected value".into())),
        )
        .unwrap();
        assert_eq!(outcome, ReplyOutcome::NoReply);

        let outcome = finish_send(&ctx, &store, &request, Ok(ChatReply::default())).unwrap();
        assert_eq!(outcome, ReplyOutcome::NoReply);
        assert_eq!(store.get(&request.chat_id).unwrap().unwrap().messages.len(), 1);
    }

    #[test]
    fn reply_for_background_session_is_stored_but_hidden() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Direct);
        start_new_chat_at(&mut ctx, &store, 1).unwrap();
        let request = begin_send(&mut ctx, &store, "hi").unwrap().request.unwrap();
        start_new_chat_at(&mut ctx, &store, 2).unwrap();

        let reply = Ok(ChatReply {
            response: Some("later".into()),
        });
        let outcome = finish_send(&ctx, &store, &request, reply).unwrap();
        assert!(matches!(
            outcome,
            ReplyOutcome::Appended { visible: false, .. }
        ));
        assert_eq!(store.get("1").unwrap().unwrap().messages.len(), 2);
        assert!(store.get("2").unwrap().unwrap().messages.is_empty());
    }

    #[test]
    fn reply_for_deleted_session_is_dropped() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Direct);
        let request = begin_send(&mut ctx, &store, "hi").unwrap().request.unwrap();
        assert!(delete_session(&mut ctx, &store, &request.chat_id).unwrap());

        let reply = Ok(ChatReply {
            response: Some("hello".into()),
        });
        let outcome = finish_send(&ctx, &store, &request, reply).unwrap();
        assert_eq!(outcome, ReplyOutcome::SessionGone);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn messages_only_grow_across_sends() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Direct);
        let mut last_len = 0;
        for query in ["one", "", "two", "three"] {
            let outcome = begin_send(&mut ctx, &store, query).unwrap();
            assert!(outcome.session.messages.len() >= last_len);
            last_len = outcome.session.messages.len();
        }
        assert_eq!(last_len, 3);
    }

    #[tokio::test]
    async fn new_upload_shows_a_second_bubble() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        let backend = MockBackend::replying("ok");
        let uploaded = || {
            Ok::<_, ApiError>(UploadResponse {
                message: Some("File successfully uploaded".into()),
                ..Default::default()
            })
        };

        let pending = begin_upload(&mut ctx, &store, "a.pdf").unwrap().unwrap();
        finish_upload(&mut ctx, &store, &pending, uploaded()).unwrap();
        let request = begin_send(&mut ctx, &store, "q1").unwrap().request.unwrap();
        let reply = dispatch(&backend, &request).await;
        finish_send(&ctx, &store, &request, reply).unwrap();

        let pending = begin_upload(&mut ctx, &store, "b.pdf").unwrap().unwrap();
        finish_upload(&mut ctx, &store, &pending, uploaded()).unwrap();
        let outcome = begin_send(&mut ctx, &store, "q2").unwrap();
        assert_eq!(
            outcome.appended,
            vec![ChatMessage::document("b.pdf"), ChatMessage::user("q2")]
        );
    }
}
