//! Input bar: attach button, file preview chip, query field, send button

use super::icons::{FileIcon, PaperclipIcon};
use crate::controller::UploadState;
use web_sys::{File, HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ChatInputBarProps {
    pub value: String,
    pub upload: UploadState,
    /// Show the attach button (pdf mode only)
    pub allow_attachment: bool,
    pub on_input: Callback<String>,
    pub on_send: Callback<()>,
    pub on_file_selected: Callback<File>,
    pub on_remove_file: Callback<()>,
}

#[function_component(ChatInputBar)]
pub fn chat_input_bar(props: &ChatInputBarProps) -> Html {
    let file_input_ref = use_node_ref();
    let is_uploading = props.upload.is_uploading();

    let on_attach = {
        let file_input_ref = file_input_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let on_file_change = {
        let on_file_selected = props.on_file_selected.clone();
        let on_remove_file = props.on_remove_file.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let file = input.files().and_then(|files| files.get(0));
            // Reset so picking the same file again still fires change
            input.set_value("");
            match file {
                Some(file) => on_file_selected.emit(file),
                None => on_remove_file.emit(()),
            }
        })
    };

    let on_remove = {
        let on_remove_file = props.on_remove_file.clone();
        Callback::from(move |_: MouseEvent| on_remove_file.emit(()))
    };

    let on_input = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_input.emit(input.value());
        })
    };

    let on_keyup = {
        let on_send = props.on_send.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                on_send.emit(());
            }
        })
    };

    let on_send_click = {
        let on_send = props.on_send.clone();
        Callback::from(move |_: MouseEvent| on_send.emit(()))
    };

    let preview = if let Some(file_name) = props.upload.file_name() {
        let icon = match props.upload {
            UploadState::Uploading { .. } => html! { <span class="spinner"></span> },
            UploadState::Attached { .. } => html! { <FileIcon class="pdf-icon-svg" /> },
            _ => html! {},
        };
        html! {
            <div id="selectedFilePreview" class="selected-file-preview">
                <div id="fileIconContainer" class="file-icon-container">{ icon }</div>
                <span id="selectedFileName">{ file_name }</span>
                <span id="filePreviewStatus" class="file-preview-status">
                    { props.upload.error().unwrap_or_default() }
                </span>
                <button
                    id="removeFileButton"
                    class="remove-file-btn"
                    title="Remove file"
                    disabled={is_uploading}
                    onclick={on_remove}
                >
                    { "\u{00d7}" }
                </button>
            </div>
        }
    } else {
        html! {}
    };

    html! {
        <div class="chat-input-bar">
            { preview }
            <div class="chat-input-row">
                <input
                    ref={file_input_ref}
                    id="fileInput"
                    type="file"
                    accept="application/pdf"
                    class="hidden"
                    onchange={on_file_change}
                />
                {
                    if props.allow_attachment {
                        html! {
                            <button
                                id="attachDocButton"
                                class="attach-doc-btn"
                                title="Attach PDF"
                                disabled={is_uploading}
                                onclick={on_attach}
                            >
                                <PaperclipIcon />
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
                <input
                    id="userQueryInput"
                    type="text"
                    placeholder="Type your message..."
                    value={props.value.clone()}
                    oninput={on_input}
                    onkeyup={on_keyup}
                />
                <button
                    id="sendMessageButton"
                    class="send-button"
                    disabled={is_uploading}
                    onclick={on_send_click}
                >
                    { "Send" }
                </button>
            </div>
        </div>
    }
}
