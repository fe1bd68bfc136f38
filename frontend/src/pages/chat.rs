//! Chat page - owns the session context and wires controllers to the views

use crate::client::HttpChatBackend;
use crate::components::{ChatInputBar, Sidebar, Transcript};
use crate::controller::conversation::{self, PendingChat, ReplyOutcome};
use crate::controller::sessions::{self, ModelBinding, SidebarEntry};
use crate::controller::upload::{self, PendingUpload, UploadOutcome};
use crate::controller::ChatContext;
use crate::storage::LocalStorage;
use shared::{
    ApiError, ChatMessage, ChatMode, ChatReply, ChatSession, SessionStore, StoreError,
    UploadResponse, WidgetConfig,
};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this chat?";

#[derive(Properties, PartialEq)]
pub struct ChatPageProps {
    pub config: WidgetConfig,
}

pub enum ChatMsg {
    NewChat,
    SelectSession(String),
    DeleteSession(String),
    SelectMode(ChatMode),
    UpdateInput(String),
    Send,
    FileSelected(web_sys::File),
    RemoveFile,
    UploadFinished(PendingUpload, Result<UploadResponse, ApiError>),
    ReplyReceived(PendingChat, Result<ChatReply, ApiError>),
}

pub struct ChatPage {
    context: ChatContext,
    store: SessionStore<LocalStorage>,
    backend: Rc<HttpChatBackend>,
    /// Messages of the active session, in display order
    transcript: Vec<ChatMessage>,
    sidebar: Vec<SidebarEntry>,
    binding: ModelBinding,
    input_value: String,
}

impl ChatPage {
    fn refresh_sidebar(&mut self) {
        match sessions::sidebar_entries(&self.context, &self.store) {
            Ok(entries) => self.sidebar = entries,
            Err(e) => log::error!("Failed to list chats: {}", e),
        }
    }

    /// Replay a session into the transcript and rebind the model UI.
    /// `None` clears the view.
    fn show_session(&mut self, session: Option<&ChatSession>) {
        self.transcript = session.map(|s| s.messages.clone()).unwrap_or_default();
        self.binding = ModelBinding::for_session(session, self.context.selected_mode);
        self.refresh_sidebar();
    }

    /// Re-read the active session after a controller may have created it
    fn show_active_session(&mut self) {
        let Some(chat_id) = self.context.active_chat_id.clone() else {
            self.refresh_sidebar();
            return;
        };
        match self.store.get(&chat_id) {
            Ok(session) => self.show_session(session.as_ref()),
            Err(e) => {
                Self::report_store_error(e);
            }
        }
    }

    fn report_store_error(e: StoreError) -> bool {
        log::error!("Chat storage failed: {}", e);
        false
    }

    fn handle_send(&mut self, ctx: &Context<Self>) -> bool {
        match conversation::begin_send(&mut self.context, &self.store, &self.input_value) {
            Ok(outcome) => {
                self.input_value.clear();
                self.show_session(Some(&outcome.session));

                if let Some(request) = outcome.request {
                    let backend = self.backend.clone();
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        let result = conversation::dispatch(backend.as_ref(), &request).await;
                        link.send_message(ChatMsg::ReplyReceived(request, result));
                    });
                }
                true
            }
            Err(e) => {
                // A rejected send may still have opened a new session
                self.show_active_session();
                if e.is_user_facing() {
                    gloo::dialogs::alert(&e.to_string());
                } else {
                    log::error!("Send failed: {}", e);
                }
                true
            }
        }
    }

    fn handle_file_selected(&mut self, ctx: &Context<Self>, file: web_sys::File) -> bool {
        let file_name = file.name();
        let pending = match upload::begin_upload(&mut self.context, &self.store, &file_name) {
            Ok(pending) => pending,
            Err(e) => return Self::report_store_error(e),
        };

        // A session may have been created for the upload
        self.show_active_session();

        if let Some(pending) = pending {
            let backend = self.backend.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = upload::perform_upload(backend.as_ref(), &pending, file).await;
                link.send_message(ChatMsg::UploadFinished(pending, result));
            });
        }
        true
    }
}

impl Component for ChatPage {
    type Message = ChatMsg;
    type Properties = ChatPageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = &ctx.props().config;
        let mut page = Self {
            context: ChatContext::new(config.default_mode),
            store: SessionStore::new(LocalStorage, config.sessions_key.clone()),
            backend: Rc::new(HttpChatBackend::new(config.api.clone())),
            transcript: Vec::new(),
            sidebar: Vec::new(),
            binding: ModelBinding::Selectable(config.default_mode),
            input_value: String::new(),
        };

        match sessions::restore_most_recent(&mut page.context, &page.store) {
            Ok(session) => page.show_session(session.as_ref()),
            Err(e) => {
                Self::report_store_error(e);
            }
        }
        page
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ChatMsg::NewChat => match sessions::start_new_chat(&mut self.context, &self.store) {
                Ok(session) => {
                    self.show_session(Some(&session));
                    true
                }
                Err(e) => Self::report_store_error(e),
            },
            ChatMsg::SelectSession(chat_id) => {
                match sessions::load_session(&mut self.context, &self.store, &chat_id) {
                    Ok(Some(session)) => {
                        self.show_session(Some(&session));
                        true
                    }
                    Ok(None) => false,
                    Err(e) => Self::report_store_error(e),
                }
            }
            ChatMsg::DeleteSession(chat_id) => {
                if !gloo::dialogs::confirm(DELETE_CONFIRMATION) {
                    return false;
                }
                match sessions::delete_session(&mut self.context, &self.store, &chat_id) {
                    Ok(true) => {
                        self.show_session(None);
                        true
                    }
                    Ok(false) => {
                        self.refresh_sidebar();
                        true
                    }
                    Err(e) => Self::report_store_error(e),
                }
            }
            ChatMsg::SelectMode(mode) => {
                match sessions::select_mode(&mut self.context, &self.store, mode) {
                    Ok(session) => {
                        self.binding =
                            ModelBinding::for_session(session.as_ref(), self.context.selected_mode);
                        true
                    }
                    Err(e) => Self::report_store_error(e),
                }
            }
            ChatMsg::UpdateInput(value) => {
                self.input_value = value;
                true
            }
            ChatMsg::Send => self.handle_send(ctx),
            ChatMsg::FileSelected(file) => self.handle_file_selected(ctx, file),
            ChatMsg::RemoveFile => {
                upload::remove_file(&mut self.context);
                true
            }
            ChatMsg::UploadFinished(pending, result) => {
                match upload::finish_upload(&mut self.context, &self.store, &pending, result) {
                    Ok(UploadOutcome::SessionGone) => self.refresh_sidebar(),
                    Ok(UploadOutcome::Attached(_)) | Ok(UploadOutcome::Failed) => {}
                    Err(e) => {
                        Self::report_store_error(e);
                    }
                }
                // The chip and send lock change in every case
                true
            }
            ChatMsg::ReplyReceived(request, result) => {
                match conversation::finish_send(&self.context, &self.store, &request, result) {
                    Ok(ReplyOutcome::Appended {
                        session, visible, ..
                    }) => {
                        if visible {
                            self.transcript = session.messages;
                        }
                        self.refresh_sidebar();
                        true
                    }
                    Ok(ReplyOutcome::NoReply) | Ok(ReplyOutcome::SessionGone) => false,
                    Err(e) => Self::report_store_error(e),
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <div class="chat-layout">
                <Sidebar
                    entries={self.sidebar.clone()}
                    binding={self.binding}
                    on_new_chat={link.callback(|_: ()| ChatMsg::NewChat)}
                    on_select={link.callback(ChatMsg::SelectSession)}
                    on_delete={link.callback(ChatMsg::DeleteSession)}
                    on_mode_change={link.callback(ChatMsg::SelectMode)}
                />
                <main class="chat-main">
                    <Transcript messages={self.transcript.clone()} />
                    <ChatInputBar
                        value={self.input_value.clone()}
                        upload={self.context.upload.clone()}
                        allow_attachment={self.binding.allows_attachment()}
                        on_input={link.callback(ChatMsg::UpdateInput)}
                        on_send={link.callback(|_: ()| ChatMsg::Send)}
                        on_file_selected={link.callback(ChatMsg::FileSelected)}
                        on_remove_file={link.callback(|_: ()| ChatMsg::RemoveFile)}
                    />
                </main>
            </div>
        }
    }
}
