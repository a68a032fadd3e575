use speakerdrive_shared::{Prompt, PromptDeck};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::{catalog, integrations};

#[derive(Properties, PartialEq)]
pub struct SmartToolsProps {
    pub deck: String,
}

/// One prompt deck: cards grouped by section, each with its own input.
#[function_component(SmartToolsPage)]
pub fn smart_tools_page(props: &SmartToolsProps) -> Html {
    let deck = use_state(|| None::<PromptDeck>);
    let error = use_state(|| None::<String>);

    {
        let deck = deck.clone();
        let error = error.clone();
        use_effect_with(props.deck.clone(), move |id| {
            let id = id.clone();
            deck.set(None);
            error.set(None);
            spawn_local(async move {
                match catalog::prompt_deck(&id).await {
                    Ok(fetched) => deck.set(Some(fetched)),
                    Err(err) => {
                        gloo::console::error!(format!("Error fetching prompt deck {}: {}", id, err));
                        error.set(Some(err.message));
                    }
                }
            });
            || ()
        });
    }

    let Some(deck) = (*deck).clone() else {
        return html! {
            <div class="p-6">
                if let Some(message) = (*error).clone() {
                    <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded">{message}</div>
                } else {
                    <p class="text-gray-500">{"Loading..."}</p>
                }
            </div>
        };
    };

    html! {
        <div class="p-6 space-y-8">
            <div>
                <h1 class="text-2xl font-bold text-gray-900">{deck.title.clone()}</h1>
                <p class="text-gray-600 mt-1">{deck.instructions.clone()}</p>
            </div>
            { for deck.sections.iter().map(|section| html! {
                <section key={section.id.clone()} class="space-y-3">
                    <div>
                        <h2 class="text-lg font-semibold text-gray-900">{section.title.clone()}</h2>
                        <p class="text-sm text-gray-500">{section.subheadline.clone()}</p>
                    </div>
                    <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4">
                        { for section.prompts.iter().map(|prompt| html! {
                            <PromptCard
                                prompt={prompt.clone()}
                                pill={section.pill().to_string()}
                                action_label={deck.action_label.clone()}
                            />
                        }) }
                    </div>
                </section>
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PromptCardProps {
    prompt: Prompt,
    pill: String,
    action_label: String,
}

#[function_component(PromptCard)]
fn prompt_card(props: &PromptCardProps) -> Html {
    let input = use_state(String::new);
    let running = use_state(|| false);
    let answer = use_state(|| None::<String>);
    let error = use_state(|| None::<String>);

    let oninput = {
        let input = input.clone();
        Callback::from(move |e: InputEvent| {
            let field: HtmlInputElement = e.target_unchecked_into();
            input.set(field.value());
        })
    };

    let rendered = props.prompt.render(&input);

    let onclick = {
        let rendered = rendered.clone();
        let running = running.clone();
        let answer = answer.clone();
        let error = error.clone();
        let has_input = !input.trim().is_empty();
        Callback::from(move |_: MouseEvent| {
            if !has_input {
                error.set(Some("Please fill in the card first".to_string()));
                return;
            }
            running.set(true);
            error.set(None);
            let rendered = rendered.clone();
            let running = running.clone();
            let answer = answer.clone();
            let error = error.clone();
            spawn_local(async move {
                match integrations::chat(&rendered).await {
                    Ok(reply) => answer.set(Some(reply.response)),
                    Err(err) => {
                        gloo::console::error!(format!("Prompt request failed: {}", err));
                        error.set(Some(err.message));
                    }
                }
                running.set(false);
            });
        })
    };

    html! {
        <div class="bg-white rounded-lg shadow p-4 flex flex-col space-y-3">
            <span class="self-start text-xs bg-blue-50 text-blue-700 rounded-full px-2 py-0.5">{props.pill.clone()}</span>
            <p class="text-sm text-gray-800 flex-1">{rendered}</p>
            <input type="text" class="w-full border border-gray-300 rounded px-3 py-2 text-sm"
                placeholder={props.prompt.input_placeholder.clone()}
                value={(*input).clone()} {oninput} />
            <button {onclick} disabled={*running}
                class="bg-blue-600 hover:bg-blue-700 text-white px-3 py-1.5 rounded text-sm disabled:opacity-50">
                {if *running { "Working..." } else { props.action_label.as_str() }}
            </button>
            if let Some(message) = (*error).clone() {
                <p class="text-xs text-red-600">{message}</p>
            }
            if let Some(text) = (*answer).clone() {
                <div class="text-sm text-gray-700 bg-gray-50 rounded p-3 whitespace-pre-wrap">{text}</div>
            }
        </div>
    }
}
