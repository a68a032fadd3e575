use speakerdrive_shared::profile::validate_avatar;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::auth::use_auth;
use crate::services::{auth, profile};

#[derive(Properties, PartialEq)]
pub struct AvatarUploaderProps {
    pub avatar_url: Option<String>,
    pub display_name: String,
    /// Fired after an upload or removal so the owner can reload the profile.
    pub on_change: Callback<()>,
}

/// Profile photo with upload and remove controls.
#[function_component(AvatarUploader)]
pub fn avatar_uploader(props: &AvatarUploaderProps) -> Html {
    let auth_ctx = use_auth();
    let uploading = use_state(|| false);
    let error = use_state(|| None::<String>);

    // The identity copy of the avatar drives the sidebar; pull it fresh.
    let refresh_user = {
        let set_user = auth_ctx.set_user.clone();
        move || {
            let set_user = set_user.clone();
            spawn_local(async move {
                match auth::session().await {
                    Ok(user) => set_user.emit(user),
                    Err(err) => gloo::console::warn!(format!("Error refreshing session: {}", err)),
                }
            });
        }
    };

    let on_file = {
        let uploading = uploading.clone();
        let error = error.clone();
        let on_change = props.on_change.clone();
        let refresh_user = refresh_user.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };

            if let Err(problem) = validate_avatar(file.size() as usize, &file.type_()) {
                error.set(Some(problem));
                return;
            }

            uploading.set(true);
            error.set(None);
            let uploading = uploading.clone();
            let error = error.clone();
            let on_change = on_change.clone();
            let refresh_user = refresh_user.clone();
            spawn_local(async move {
                match profile::upload_avatar(&file).await {
                    Ok(_) => {
                        on_change.emit(());
                        refresh_user();
                    }
                    Err(err) => {
                        gloo::console::error!(format!("Error uploading avatar: {}", err));
                        error.set(Some(err.message));
                    }
                }
                uploading.set(false);
            });
        })
    };

    let on_remove = {
        let error = error.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| {
            let error = error.clone();
            let on_change = on_change.clone();
            let refresh_user = refresh_user.clone();
            spawn_local(async move {
                match profile::remove_avatar().await {
                    Ok(()) => {
                        on_change.emit(());
                        refresh_user();
                    }
                    Err(err) => {
                        gloo::console::error!(format!("Error removing avatar: {}", err));
                        error.set(Some(err.message));
                    }
                }
            });
        })
    };

    let initial = props
        .display_name
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('U');

    html! {
        <div class="flex items-center space-x-4">
            if let Some(src) = props.avatar_url.clone() {
                <img src={src} alt="Profile photo" class="w-20 h-20 rounded-full object-cover" />
            } else {
                <div class="w-20 h-20 rounded-full bg-blue-500 flex items-center justify-center">
                    <span class="text-white text-2xl font-medium">{initial}</span>
                </div>
            }
            <div class="space-y-2">
                <label class="inline-block bg-white border border-gray-300 rounded px-3 py-1 text-sm cursor-pointer hover:bg-gray-50">
                    {if *uploading { "Uploading..." } else { "Upload photo" }}
                    <input type="file" accept="image/jpeg,image/png,image/gif" class="hidden"
                        disabled={*uploading} onchange={on_file} />
                </label>
                if props.avatar_url.is_some() {
                    <button onclick={on_remove} class="block text-sm text-red-600 hover:underline">
                        {"Remove photo"}
                    </button>
                }
                <p class="text-xs text-gray-500">{"JPEG, PNG or GIF, up to 2MB"}</p>
                if let Some(message) = (*error).clone() {
                    <p class="text-xs text-red-600">{message}</p>
                }
            </div>
        </div>
    }
}
