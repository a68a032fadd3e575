use std::collections::HashMap;

use speakerdrive_shared::{Catalog, OnboardingRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_hooks::{use_async_with_options, UseAsyncOptions};
use yew_router::prelude::*;

use crate::components::auth::use_auth;
use crate::components::forms::ChoiceGroup;
use crate::services::{auth, catalog, profile};
use crate::Route;

#[function_component(OnboardingPage)]
pub fn onboarding_page() -> Html {
    let auth_ctx = use_auth();
    let navigator = use_navigator();
    let form = use_state(OnboardingRequest::default);
    let errors = use_state(HashMap::<String, String>::new);
    let submitting = use_state(|| false);
    let submit_error = use_state(|| None::<String>);
    let options = use_async_with_options(
        async move { catalog::get().await },
        UseAsyncOptions::enable_auto(),
    );
    let options: Catalog = options.data.clone().unwrap_or_default();

    let on_name = {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.full_name = input.value();
            form.set(next);
        })
    };

    let on_services = {
        let form = form.clone();
        Callback::from(move |services: Vec<String>| {
            let mut next = (*form).clone();
            next.services = services;
            form.set(next);
        })
    };

    let on_industries = {
        let form = form.clone();
        Callback::from(move |industries: Vec<String>| {
            let mut next = (*form).clone();
            next.industries = industries;
            form.set(next);
        })
    };

    let onsubmit = {
        let form = form.clone();
        let errors = errors.clone();
        let submitting = submitting.clone();
        let submit_error = submit_error.clone();
        let set_user = auth_ctx.set_user.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = (*form).clone();
            let problems = request.validate();
            if !problems.is_empty() {
                errors.set(problems);
                return;
            }
            errors.set(HashMap::new());
            submitting.set(true);
            submit_error.set(None);

            let submitting = submitting.clone();
            let submit_error = submit_error.clone();
            let set_user = set_user.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                match profile::complete_onboarding(&request).await {
                    Ok(_) => {
                        if let Ok(user) = auth::session().await {
                            set_user.emit(user);
                        }
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Dashboard);
                        }
                    }
                    Err(err) => {
                        gloo::console::error!(format!("Error completing onboarding: {}", err));
                        submit_error.set(Some(err.message));
                    }
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <div class="p-6 max-w-2xl space-y-6">
            <div>
                <h1 class="text-2xl font-bold text-gray-900">{"Welcome to SpeakerDrive"}</h1>
                <p class="text-gray-600">{"Tell us what you offer so we can match you with the right leads."}</p>
            </div>

            <form class="bg-white rounded-lg shadow p-6 space-y-6" {onsubmit}>
                <label class="block">
                    <span class="text-sm font-medium text-gray-700">{"Full name"}</span>
                    <input type="text" class="mt-1 w-full border border-gray-300 rounded px-3 py-2 text-sm"
                        value={form.full_name.clone()} oninput={on_name} />
                    if let Some(error) = errors.get("full_name").cloned() {
                        <p class="text-xs text-red-600 mt-1">{error}</p>
                    }
                </label>

                <ChoiceGroup label="Services" options={options.services.clone()}
                    selected={form.services.clone()} error={errors.get("services").cloned()}
                    on_change={on_services} />

                <ChoiceGroup label="Industries" options={options.industries.clone()}
                    selected={form.industries.clone()} max={Some(OnboardingRequest::MAX_INDUSTRIES)}
                    error={errors.get("industries").cloned()} on_change={on_industries} />

                if let Some(message) = (*submit_error).clone() {
                    <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded">{message}</div>
                }

                <button type="submit" disabled={*submitting}
                    class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded text-sm disabled:opacity-50">
                    {if *submitting { "Saving..." } else { "Continue" }}
                </button>
            </form>
        </div>
    }
}
