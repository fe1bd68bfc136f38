//! Sidebar: new chat button, model selector or locked label, session list

use super::icons::TrashIcon;
use crate::controller::{ModelBinding, SidebarEntry};
use shared::ChatMode;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub entries: Vec<SidebarEntry>,
    pub binding: ModelBinding,
    pub on_new_chat: Callback<()>,
    pub on_select: Callback<String>,
    pub on_delete: Callback<String>,
    pub on_mode_change: Callback<ChatMode>,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let on_new_chat = {
        let on_new_chat = props.on_new_chat.clone();
        Callback::from(move |_: MouseEvent| on_new_chat.emit(()))
    };

    let on_mode_change = {
        let on_mode_change = props.on_mode_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            match ChatMode::from_value(&select.value()) {
                Some(mode) => on_mode_change.emit(mode),
                None => log::warn!("Unknown model option {:?}", select.value()),
            }
        })
    };

    let model_ui = match props.binding {
        ModelBinding::Locked(_) => html! {
            <div id="currentModelLabel" class="current-model-label">{ props.binding.label() }</div>
        },
        ModelBinding::Selectable(selected) => html! {
            <>
                <label id="modelSelectLabel" for="chatModel">{ "Model" }</label>
                <select id="chatModel" onchange={on_mode_change}>
                    { [ChatMode::Pdf, ChatMode::Direct].into_iter().map(|mode| html! {
                        <option value={mode.as_str()} selected={mode == selected}>
                            { mode.label() }
                        </option>
                    }).collect::<Html>() }
                </select>
            </>
        },
    };

    let render_entry = |entry: &SidebarEntry| -> Html {
        let on_click = {
            let on_select = props.on_select.clone();
            let chat_id = entry.chat_id.clone();
            Callback::from(move |_: MouseEvent| on_select.emit(chat_id.clone()))
        };

        let on_delete = {
            let on_delete = props.on_delete.clone();
            let chat_id = entry.chat_id.clone();
            Callback::from(move |e: MouseEvent| {
                // Don't load the chat we're deleting
                e.stop_propagation();
                on_delete.emit(chat_id.clone());
            })
        };

        html! {
            <div
                class={classes!("chat-session-item", entry.active.then_some("active"))}
                key={entry.chat_id.clone()}
                onclick={on_click}
            >
                <span>{ &entry.title }</span>
                <button class="delete-chat-btn" title="Delete chat" onclick={on_delete}>
                    <TrashIcon />
                </button>
            </div>
        }
    };

    html! {
        <aside class="sidebar">
            <button id="newChatButton" class="new-chat-btn" onclick={on_new_chat}>
                { "New Chat" }
            </button>
            <div class="model-select">{ model_ui }</div>
            <div id="chatSessionsList" class="chat-sessions-list">
                { props.entries.iter().map(render_entry).collect::<Html>() }
            </div>
        </aside>
    }
}
