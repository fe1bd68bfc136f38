//! Transcript view: one bubble per stored message, pinned to the bottom.

use super::icons::FileIcon;
use shared::{ChatMessage, Sender};
use web_sys::Element;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct MessageBubbleProps {
    pub message: ChatMessage,
}

#[function_component(MessageBubble)]
pub fn message_bubble(props: &MessageBubbleProps) -> Html {
    let message = &props.message;
    match message.sender {
        Sender::Document => html! {
            <div class="message document-message file-message">
                <div class="file-icon"><FileIcon /></div>
                <span>{ &message.text }</span>
            </div>
        },
        Sender::User => html! {
            <div class="message user-message">{ &message.text }</div>
        },
        Sender::Ai => html! {
            <div class="message ai-message">{ &message.text }</div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct TranscriptProps {
    pub messages: Vec<ChatMessage>,
}

#[function_component(Transcript)]
pub fn transcript(props: &TranscriptProps) -> Html {
    let box_ref = use_node_ref();

    // Scroll to the newest message whenever the transcript changes
    {
        let box_ref = box_ref.clone();
        use_effect_with(props.messages.clone(), move |_| {
            if let Some(element) = box_ref.cast::<Element>() {
                element.set_scroll_top(element.scroll_height());
            }
            || ()
        });
    }

    html! {
        <div class="chat-box" ref={box_ref}>
            { props.messages.iter().enumerate().map(|(index, message)| html! {
                <MessageBubble key={index} message={message.clone()} />
            }).collect::<Html>() }
        </div>
    }
}
