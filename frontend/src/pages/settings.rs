use gloo_timers::callback::Timeout;
use speakerdrive_shared::{Catalog, OnboardingRequest, ProfileUpdate, ProfileUpdateOutcome, ProfileView};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_hooks::{use_async_with_options, UseAsyncOptions};

use crate::components::auth::use_auth;
use crate::components::avatar::AvatarUploader;
use crate::components::forms::ChoiceGroup;
use crate::hooks::use_profile;
use crate::services::{auth, catalog};

const NOTICE_MS: u32 = 3_000;

/// Only the fields that differ from the loaded profile.
pub fn changed_fields(
    loaded: &ProfileView,
    display_name: &str,
    services: &[String],
    industries: &[String],
) -> ProfileUpdate {
    let display_name = display_name.trim();
    ProfileUpdate {
        display_name: (display_name != loaded.display_name).then(|| display_name.to_string()),
        services: (services != loaded.services.as_slice()).then(|| services.to_vec()),
        industries: (industries != loaded.industries.as_slice()).then(|| industries.to_vec()),
        ..Default::default()
    }
}

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let auth_ctx = use_auth();
    let profile = use_profile();
    let display_name = use_state(String::new);
    let services = use_state(Vec::<String>::new);
    let industries = use_state(Vec::<String>::new);
    let saving = use_state(|| false);
    let notice = use_state(|| None::<String>);
    let error = use_state(|| None::<String>);
    let options = use_async_with_options(
        async move { catalog::get().await },
        UseAsyncOptions::enable_auto(),
    );
    let options: Catalog = options.data.clone().unwrap_or_default();

    // Seed the form whenever a profile (re)loads.
    {
        let display_name = display_name.clone();
        let services = services.clone();
        let industries = industries.clone();
        use_effect_with(profile.profile(), move |loaded| {
            if let Some(loaded) = loaded {
                display_name.set(loaded.display_name.clone());
                services.set(loaded.services.clone());
                industries.set(loaded.industries.clone());
            }
            || ()
        });
    }

    let on_name = {
        let display_name = display_name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            display_name.set(input.value());
        })
    };
    let on_services = {
        let services = services.clone();
        Callback::from(move |next: Vec<String>| services.set(next))
    };
    let on_industries = {
        let industries = industries.clone();
        Callback::from(move |next: Vec<String>| industries.set(next))
    };

    let on_saved = {
        let saving = saving.clone();
        let notice = notice.clone();
        let error = error.clone();
        let set_user = auth_ctx.set_user.clone();
        Callback::from(move |outcome: ProfileUpdateOutcome| {
            saving.set(false);
            error.set(outcome.error.clone());
            if !outcome.saved {
                return;
            }
            notice.set(Some("Profile updated".to_string()));
            let notice = notice.clone();
            Timeout::new(NOTICE_MS, move || notice.set(None)).forget();

            let set_user = set_user.clone();
            spawn_local(async move {
                if let Ok(user) = auth::session().await {
                    set_user.emit(user);
                }
            });
        })
    };

    let onsubmit = {
        let profile = profile.clone();
        let display_name = display_name.clone();
        let services = services.clone();
        let industries = industries.clone();
        let saving = saving.clone();
        let error = error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(loaded) = profile.profile() else {
                return;
            };
            if display_name.trim().chars().count() < 2 {
                error.set(Some("Display name must be at least 2 characters".to_string()));
                return;
            }
            let update = changed_fields(&loaded, &display_name, &services, &industries);
            if update.is_empty() {
                error.set(Some("Nothing to save".to_string()));
                return;
            }
            saving.set(true);
            error.set(None);
            profile.update(update, on_saved.clone());
        })
    };

    let on_avatar_change = {
        let profile = profile.clone();
        Callback::from(move |_| profile.reload())
    };

    let on_logout = {
        let logout = auth_ctx.logout.clone();
        Callback::from(move |_: MouseEvent| logout.emit(()))
    };

    let Some(loaded) = profile.profile() else {
        return html! {
            <div class="p-6">
                if let Some(message) = profile.error() {
                    <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded">{message}</div>
                } else {
                    <p class="text-gray-500">{"Loading..."}</p>
                }
            </div>
        };
    };

    html! {
        <div class="p-6 max-w-2xl space-y-6">
            <h1 class="text-2xl font-bold text-gray-900">{"Settings"}</h1>

            <div class="bg-white rounded-lg shadow p-6">
                <AvatarUploader avatar_url={loaded.avatar_url.clone()}
                    display_name={loaded.display_name.clone()} on_change={on_avatar_change} />
            </div>

            <form class="bg-white rounded-lg shadow p-6 space-y-6" {onsubmit}>
                <label class="block">
                    <span class="text-sm font-medium text-gray-700">{"Display name"}</span>
                    <input type="text" class="mt-1 w-full border border-gray-300 rounded px-3 py-2 text-sm"
                        value={(*display_name).clone()} oninput={on_name} />
                </label>
                <label class="block">
                    <span class="text-sm font-medium text-gray-700">{"Email"}</span>
                    <input type="email" disabled=true value={loaded.email.clone()}
                        class="mt-1 w-full border border-gray-200 bg-gray-50 rounded px-3 py-2 text-sm text-gray-500" />
                </label>

                <ChoiceGroup label="Services" options={options.services.clone()}
                    selected={(*services).clone()} on_change={on_services} />
                <ChoiceGroup label="Industries" options={options.industries.clone()}
                    selected={(*industries).clone()} max={Some(OnboardingRequest::MAX_INDUSTRIES)}
                    on_change={on_industries} />

                if let Some(message) = (*error).clone() {
                    <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded">{message}</div>
                }
                if let Some(message) = (*notice).clone() {
                    <div class="bg-green-50 border border-green-200 text-green-700 px-4 py-3 rounded">{message}</div>
                }

                <button type="submit" disabled={*saving || profile.loading()}
                    class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded text-sm disabled:opacity-50">
                    {if *saving { "Saving..." } else { "Save changes" }}
                </button>
            </form>

            <button onclick={on_logout} class="text-sm text-red-600 hover:underline">{"Sign out"}</button>
        </div>
    }
}
