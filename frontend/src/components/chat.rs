use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::integrations;

#[derive(Debug, Clone, PartialEq)]
enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
struct ChatMessage {
    speaker: Speaker,
    text: String,
}

/// Conversation with the assistant webhook. History lives only in this component.
#[function_component(ChatPanel)]
pub fn chat_panel() -> Html {
    let messages = use_state(Vec::<ChatMessage>::new);
    let draft = use_state(String::new);
    let sending = use_state(|| false);
    let error = use_state(|| None::<String>);

    let oninput = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let onsubmit = {
        let messages = messages.clone();
        let draft = draft.clone();
        let sending = sending.clone();
        let error = error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let text = draft.trim().to_string();
            if text.is_empty() || *sending {
                return;
            }

            let mut history = (*messages).clone();
            history.push(ChatMessage {
                speaker: Speaker::User,
                text: text.clone(),
            });
            messages.set(history.clone());
            draft.set(String::new());
            sending.set(true);
            error.set(None);

            let messages = messages.clone();
            let sending = sending.clone();
            let error = error.clone();
            spawn_local(async move {
                match integrations::chat(&text).await {
                    Ok(reply) => {
                        history.push(ChatMessage {
                            speaker: Speaker::Assistant,
                            text: reply.response,
                        });
                        messages.set(history);
                    }
                    Err(err) => {
                        gloo::console::error!(format!("Chat request failed: {}", err));
                        error.set(Some(err.message));
                    }
                }
                sending.set(false);
            });
        })
    };

    html! {
        <div class="bg-white rounded-lg shadow flex flex-col h-96">
            <div class="px-4 py-3 border-b border-gray-200">
                <h3 class="font-medium text-gray-900">{"Ask SpeakerDrive"}</h3>
            </div>
            <div class="flex-1 overflow-y-auto p-4 space-y-3">
                { for messages.iter().map(|message| {
                    let class = match message.speaker {
                        Speaker::User => "ml-auto bg-blue-600 text-white",
                        Speaker::Assistant => "mr-auto bg-gray-100 text-gray-900",
                    };
                    html! {
                        <div class={classes!("max-w-xs", "rounded-lg", "px-3", "py-2", "text-sm", "whitespace-pre-wrap", class)}>
                            {message.text.clone()}
                        </div>
                    }
                }) }
                if *sending {
                    <div class="mr-auto text-sm text-gray-400">{"Thinking..."}</div>
                }
            </div>
            if let Some(message) = (*error).clone() {
                <div class="px-4 py-2 text-sm text-red-600">{message}</div>
            }
            <form class="border-t border-gray-200 p-3 flex space-x-2" {onsubmit}>
                <input type="text" class="flex-1 border border-gray-300 rounded px-3 py-2 text-sm"
                    placeholder="Type a message" value={(*draft).clone()} {oninput} />
                <button type="submit" disabled={*sending}
                    class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded text-sm disabled:opacity-50">
                    {"Send"}
                </button>
            </form>
        </div>
    }
}
