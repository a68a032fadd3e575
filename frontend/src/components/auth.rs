use gloo_storage::{LocalStorage, Storage};
use speakerdrive_shared::{AuthResponse, User};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::services::{auth, ApiClient};
use crate::Route;

const USER_KEY: &str = "speakerdrive_user";
const MIN_PASSWORD_LENGTH: usize = 8;

// Auth context for managing authentication state across the app
#[derive(Clone, Debug, PartialEq)]
pub struct AuthContext {
    pub user: Option<User>,
    pub login: Callback<AuthResponse>,
    pub logout: Callback<()>,
    /// Replace the cached user after an identity-metadata write.
    pub set_user: Callback<User>,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self {
            user: None,
            login: Callback::noop(),
            logout: Callback::noop(),
            set_user: Callback::noop(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub children: Children,
}

#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let user = use_state(|| {
        // Try to restore auth from localStorage
        ApiClient::auth_token().and_then(|_| LocalStorage::get::<User>(USER_KEY).ok())
    });

    // Renew a restored session; a rejected token signs the user out.
    {
        let user = user.clone();
        use_effect_with((), move |_| {
            if ApiClient::auth_token().is_some() {
                spawn_local(async move {
                    match auth::refresh().await {
                        Ok(renewed) => {
                            let _ = LocalStorage::set(USER_KEY, &renewed.user);
                            user.set(Some(renewed.user));
                        }
                        Err(err) => {
                            gloo::console::warn!(format!("Session expired: {}", err));
                            ApiClient::clear_auth_token();
                            LocalStorage::delete(USER_KEY);
                            user.set(None);
                        }
                    }
                });
            }
            || ()
        });
    }

    let login = {
        let user = user.clone();
        Callback::from(move |response: AuthResponse| {
            ApiClient::set_auth_token(&response.token);
            let _ = LocalStorage::set(USER_KEY, &response.user);
            user.set(Some(response.user));
        })
    };

    let logout = {
        let user = user.clone();
        Callback::from(move |_| {
            let user = user.clone();
            spawn_local(async move {
                if let Err(err) = auth::logout().await {
                    gloo::console::error!(format!("Error signing out: {}", err));
                }
                LocalStorage::delete(USER_KEY);
                user.set(None);
            });
        })
    };

    let set_user = {
        let user = user.clone();
        Callback::from(move |updated: User| {
            let _ = LocalStorage::set(USER_KEY, &updated);
            user.set(Some(updated));
        })
    };

    let context = AuthContext {
        user: (*user).clone(),
        login,
        logout,
        set_user,
    };

    html! {
        <ContextProvider<AuthContext> {context}>
            {props.children.clone()}
        </ContextProvider<AuthContext>>
    }
}

#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_default()
}

fn bind_input(handle: &UseStateHandle<String>) -> Callback<InputEvent> {
    let handle = handle.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        handle.set(input.value());
    })
}

#[derive(Clone, Copy, PartialEq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    fn title(&self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign in to SpeakerDrive",
            AuthMode::SignUp => "Create your SpeakerDrive account",
        }
    }

    fn action(&self, loading: bool) -> &'static str {
        match (self, loading) {
            (AuthMode::SignIn, false) => "Sign in",
            (AuthMode::SignIn, true) => "Signing in...",
            (AuthMode::SignUp, false) => "Sign up",
            (AuthMode::SignUp, true) => "Creating account...",
        }
    }
}

/// Client-side checks run before the request goes out.
pub fn check_credentials(mode: AuthMode, email: &str, password: &str, confirm: &str) -> Option<String> {
    if email.trim().is_empty() || password.is_empty() {
        return Some("Please fill in all fields".to_string());
    }
    if mode == AuthMode::SignUp {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Some("Password must be at least 8 characters".to_string());
        }
        if password != confirm {
            return Some("Passwords do not match".to_string());
        }
    }
    None
}

#[derive(Properties, PartialEq)]
pub struct AuthFormProps {
    pub mode: AuthMode,
    pub on_success: Callback<AuthResponse>,
}

#[function_component(AuthForm)]
pub fn auth_form(props: &AuthFormProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);
    let confirm = use_state(String::new);
    let error_message = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let mode = props.mode;

    let onsubmit = {
        let email = email.clone();
        let password = password.clone();
        let confirm = confirm.clone();
        let error_message = error_message.clone();
        let loading = loading.clone();
        let on_success = props.on_success.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let email = (*email).trim().to_string();
            let password = (*password).clone();

            if let Some(problem) = check_credentials(mode, &email, &password, &confirm) {
                error_message.set(Some(problem));
                return;
            }

            loading.set(true);
            error_message.set(None);

            let error_message = error_message.clone();
            let loading = loading.clone();
            let on_success = on_success.clone();
            spawn_local(async move {
                let result = match mode {
                    AuthMode::SignIn => auth::login(&email, &password).await,
                    AuthMode::SignUp => auth::signup(&email, &password).await,
                };
                loading.set(false);
                match result {
                    Ok(response) => on_success.emit(response),
                    Err(err) => {
                        gloo::console::error!(format!("Authentication failed: {}", err));
                        error_message.set(Some(err.message));
                    }
                }
            });
        })
    };

    let input_class = "appearance-none relative block w-full px-3 py-2 border border-gray-300 placeholder-gray-500 text-gray-900 rounded-md focus:outline-none focus:ring-blue-500 focus:border-blue-500 sm:text-sm";

    html! {
        <div class="min-h-screen flex items-center justify-center bg-gray-50 py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-md w-full space-y-8">
                <div>
                    <h2 class="mt-6 text-center text-3xl font-extrabold text-gray-900">
                        {mode.title()}
                    </h2>
                    <p class="mt-2 text-center text-sm text-gray-600">
                        {"Speaking leads, contacts and event intel"}
                    </p>
                </div>

                <form class="mt-8 space-y-4" {onsubmit}>
                    <input
                        id="email-address"
                        name="email"
                        type="email"
                        autocomplete="email"
                        required=true
                        class={input_class}
                        placeholder="Email address"
                        value={(*email).clone()}
                        oninput={bind_input(&email)}
                    />
                    <input
                        id="password"
                        name="password"
                        type="password"
                        autocomplete={if mode == AuthMode::SignIn { "current-password" } else { "new-password" }}
                        required=true
                        class={input_class}
                        placeholder="Password"
                        value={(*password).clone()}
                        oninput={bind_input(&password)}
                    />
                    if mode == AuthMode::SignUp {
                        <input
                            id="confirm-password"
                            name="confirm"
                            type="password"
                            autocomplete="new-password"
                            required=true
                            class={input_class}
                            placeholder="Confirm password"
                            value={(*confirm).clone()}
                            oninput={bind_input(&confirm)}
                        />
                    }

                    if let Some(error) = (*error_message).clone() {
                        <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded relative">
                            {error}
                        </div>
                    }

                    <button
                        type="submit"
                        disabled={*loading}
                        class="w-full flex justify-center py-2 px-4 border border-transparent text-sm font-medium rounded-md text-white bg-blue-600 hover:bg-blue-700 disabled:opacity-50 disabled:cursor-not-allowed"
                    >
                        {mode.action(*loading)}
                    </button>
                </form>

                <p class="text-center text-sm text-gray-600">
                    if mode == AuthMode::SignIn {
                        {"No account yet? "}
                        <Link<Route> to={Route::Signup} classes="text-blue-600 hover:underline">{"Sign up"}</Link<Route>>
                    } else {
                        {"Already registered? "}
                        <Link<Route> to={Route::Login} classes="text-blue-600 hover:underline">{"Sign in"}</Link<Route>>
                    }
                </p>
            </div>
        </div>
    }
}
