//! Session lifecycle and sidebar state: create, load, rebind, delete, list.

use shared::{ChatMode, ChatSession, KeyValueStorage, SessionStore, StoreError};

use super::ChatContext;

/// One row of the sidebar list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub chat_id: String,
    pub title: String,
    pub active: bool,
}

/// What the sidebar shows in place of the model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelBinding {
    /// Empty (or no) session: the dropdown is editable
    Selectable(ChatMode),
    /// Session has messages: read-only label
    Locked(ChatMode),
}

impl ModelBinding {
    pub fn for_session(session: Option<&ChatSession>, selected: ChatMode) -> Self {
        match session {
            Some(s) if s.is_mode_locked() => ModelBinding::Locked(s.mode),
            Some(s) => ModelBinding::Selectable(s.mode),
            None => ModelBinding::Selectable(selected),
        }
    }

    pub fn mode(&self) -> ChatMode {
        match self {
            ModelBinding::Selectable(mode) | ModelBinding::Locked(mode) => *mode,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, ModelBinding::Locked(_))
    }

    pub fn label(&self) -> String {
        format!("Model: {}", self.mode().label())
    }

    /// The attach button only exists in pdf mode
    pub fn allows_attachment(&self) -> bool {
        self.mode() == ChatMode::Pdf
    }
}

pub fn sidebar_entries<S: KeyValueStorage>(
    ctx: &ChatContext,
    store: &SessionStore<S>,
) -> Result<Vec<SidebarEntry>, StoreError> {
    Ok(store
        .list()?
        .into_iter()
        .map(|session| SidebarEntry {
            active: ctx.is_active(&session.chat_id),
            title: session.title(),
            chat_id: session.chat_id,
        })
        .collect())
}

/// Millisecond timestamp id, bumped past any id already in use
fn next_chat_id<S: KeyValueStorage>(
    store: &SessionStore<S>,
    now_ms: i64,
) -> Result<String, StoreError> {
    let taken: Vec<String> = store.list()?.into_iter().map(|s| s.chat_id).collect();
    let mut candidate = now_ms;
    while taken.contains(&candidate.to_string()) {
        candidate += 1;
    }
    Ok(candidate.to_string())
}

/// Create a session with the selected mode, persist it and make it active
pub fn start_new_chat<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
) -> Result<ChatSession, StoreError> {
    start_new_chat_at(ctx, store, chrono::Utc::now().timestamp_millis())
}

pub(crate) fn start_new_chat_at<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
    now_ms: i64,
) -> Result<ChatSession, StoreError> {
    let session = ChatSession::new(next_chat_id(store, now_ms)?, ctx.selected_mode);
    store.upsert(&session)?;
    log::info!("Created {} chat {}", session.mode, session.chat_id);

    ctx.active_chat_id = Some(session.chat_id.clone());
    ctx.hide_preview();
    Ok(session)
}

/// Make a stored session active. Unknown ids leave the context untouched.
pub fn load_session<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
    chat_id: &str,
) -> Result<Option<ChatSession>, StoreError> {
    let Some(session) = store.get(chat_id)? else {
        log::warn!("Chat {} not found", chat_id);
        return Ok(None);
    };
    ctx.active_chat_id = Some(session.chat_id.clone());
    ctx.selected_mode = session.mode;
    ctx.hide_preview();
    Ok(Some(session))
}

/// Open the most recently created session, if any (startup)
pub fn restore_most_recent<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
) -> Result<Option<ChatSession>, StoreError> {
    match store.most_recent()? {
        Some(latest) => load_session(ctx, store, &latest.chat_id),
        None => Ok(None),
    }
}

/// The active session, freshly read, creating one if there is none
pub fn ensure_active_session<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
) -> Result<ChatSession, StoreError> {
    if let Some(chat_id) = ctx.active_chat_id.clone() {
        if let Some(session) = store.get(&chat_id)? {
            return Ok(session);
        }
        log::warn!("Active chat {} disappeared from storage", chat_id);
        ctx.active_chat_id = None;
    }
    start_new_chat(ctx, store)
}

/// Change the dropdown mode. An empty active session is rebound to it;
/// sessions with messages keep their mode.
pub fn select_mode<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
    mode: ChatMode,
) -> Result<Option<ChatSession>, StoreError> {
    ctx.selected_mode = mode;
    let Some(chat_id) = ctx.active_chat_id.clone() else {
        return Ok(None);
    };
    let session = store.update(&chat_id, |session| {
        if !session.is_mode_locked() {
            session.mode = mode;
        }
    })?;
    if let Some(session) = &session {
        // A locked session wins over the dropdown
        ctx.selected_mode = session.mode;
    }
    Ok(session)
}

/// Delete a session. Returns whether it was the active one, in which case
/// the active pointer has been cleared.
pub fn delete_session<S: KeyValueStorage>(
    ctx: &mut ChatContext,
    store: &SessionStore<S>,
    chat_id: &str,
) -> Result<bool, StoreError> {
    if store.delete(chat_id)? {
        log::info!("Deleted chat {}", chat_id);
    }
    if !ctx.is_active(chat_id) {
        return Ok(false);
    }
    ctx.active_chat_id = None;
    ctx.hide_preview();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::memory_store;
    use crate::controller::UploadState;
    use shared::ChatMessage;

    #[test]
    fn new_chat_uses_selected_mode_and_becomes_active() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Direct);

        let session = start_new_chat_at(&mut ctx, &store, 1_700_000_000_000).unwrap();
        assert_eq!(session.chat_id, "1700000000000");
        assert_eq!(session.mode, ChatMode::Direct);
        assert!(ctx.is_active("1700000000000"));
        assert_eq!(store.get("1700000000000").unwrap(), Some(session));
    }

    #[test]
    fn colliding_timestamps_get_distinct_ids() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);

        let a = start_new_chat_at(&mut ctx, &store, 5).unwrap();
        let b = start_new_chat_at(&mut ctx, &store, 5).unwrap();
        assert_eq!(a.chat_id, "5");
        assert_eq!(b.chat_id, "6");
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn sidebar_lists_titles_and_marks_active() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);

        start_new_chat_at(&mut ctx, &store, 1).unwrap();
        store
            .update("1", |s| s.push(ChatMessage::user("Tell me about cats please")))
            .unwrap();
        start_new_chat_at(&mut ctx, &store, 2).unwrap();

        let entries = sidebar_entries(&ctx, &store).unwrap();
        assert_eq!(
            entries,
            vec![
                SidebarEntry {
                    chat_id: "1".into(),
                    title: "Tell me about...".into(),
                    active: false,
                },
                SidebarEntry {
                    chat_id: "2".into(),
                    title: "New Chat".into(),
                    active: true,
                },
            ]
        );
    }

    #[test]
    fn load_binds_mode_and_hides_preview() {
        let store = memory_store();
        store.upsert(&ChatSession::new("9", ChatMode::Direct)).unwrap();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        ctx.upload = UploadState::Attached {
            file_name: "a.pdf".into(),
        };

        let loaded = load_session(&mut ctx, &store, "9").unwrap().unwrap();
        assert_eq!(loaded.chat_id, "9");
        assert_eq!(ctx.selected_mode, ChatMode::Direct);
        assert_eq!(ctx.upload, UploadState::Idle);

        assert!(load_session(&mut ctx, &store, "missing").unwrap().is_none());
        assert!(ctx.is_active("9"));
    }

    #[test]
    fn restore_opens_last_created_session() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        assert!(restore_most_recent(&mut ctx, &store).unwrap().is_none());
        assert!(ctx.active_chat_id.is_none());

        store.upsert(&ChatSession::new("1", ChatMode::Pdf)).unwrap();
        store.upsert(&ChatSession::new("2", ChatMode::Direct)).unwrap();
        let restored = restore_most_recent(&mut ctx, &store).unwrap().unwrap();
        assert_eq!(restored.chat_id, "2");
        assert_eq!(ctx.selected_mode, ChatMode::Direct);
    }

    #[test]
    fn ensure_reuses_active_or_creates() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);

        let created = ensure_active_session(&mut ctx, &store).unwrap();
        let again = ensure_active_session(&mut ctx, &store).unwrap();
        assert_eq!(created, again);
        assert_eq!(store.list().unwrap().len(), 1);

        // Active id pointing at a deleted record starts over
        store.delete(&created.chat_id).unwrap();
        let replacement = ensure_active_session(&mut ctx, &store).unwrap();
        assert!(ctx.is_active(&replacement.chat_id));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn mode_change_rebinds_only_empty_sessions() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);

        // No active session: only the dropdown changes
        assert!(select_mode(&mut ctx, &store, ChatMode::Direct)
            .unwrap()
            .is_none());
        assert_eq!(ctx.selected_mode, ChatMode::Direct);

        let session = start_new_chat_at(&mut ctx, &store, 1).unwrap();
        assert_eq!(session.mode, ChatMode::Direct);
        let rebound = select_mode(&mut ctx, &store, ChatMode::Pdf).unwrap().unwrap();
        assert_eq!(rebound.mode, ChatMode::Pdf);

        store.update("1", |s| s.push(ChatMessage::user("hi"))).unwrap();
        let locked = select_mode(&mut ctx, &store, ChatMode::Direct)
            .unwrap()
            .unwrap();
        assert_eq!(locked.mode, ChatMode::Pdf);
        assert_eq!(ctx.selected_mode, ChatMode::Pdf);
    }

    #[test]
    fn deleting_active_session_clears_pointer() {
        let store = memory_store();
        let mut ctx = ChatContext::new(ChatMode::Pdf);
        start_new_chat_at(&mut ctx, &store, 1).unwrap();
        start_new_chat_at(&mut ctx, &store, 2).unwrap();

        assert!(!delete_session(&mut ctx, &store, "1").unwrap());
        assert!(ctx.is_active("2"));

        assert!(delete_session(&mut ctx, &store, "2").unwrap());
        assert!(ctx.active_chat_id.is_none());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn model_binding_locks_after_first_message() {
        let mut session = ChatSession::new("1", ChatMode::Direct);
        let binding = ModelBinding::for_session(Some(&session), ChatMode::Pdf);
        assert_eq!(binding, ModelBinding::Selectable(ChatMode::Direct));
        assert!(!binding.allows_attachment());

        session.push(ChatMessage::user("hi"));
        let binding = ModelBinding::for_session(Some(&session), ChatMode::Pdf);
        assert!(binding.is_locked());
        assert_eq!(binding.label(), "Model: DirectChat");

        let binding = ModelBinding::for_session(None, ChatMode::Pdf);
        assert_eq!(binding, ModelBinding::Selectable(ChatMode::Pdf));
        assert!(binding.allows_attachment());
    }
}
