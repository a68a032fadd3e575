use wasm_bindgen::JsValue;
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod hooks;
mod pages;
mod services;

use components::{
    auth::{use_auth, AuthForm, AuthMode, AuthProvider},
    layout::Layout,
};
use pages::{
    contact_finder::ContactFinderPage,
    dashboard::DashboardPage,
    lead_details::LeadDetailsPage,
    leads::{FindLeadsPage, MyLeadsPage},
    onboarding::OnboardingPage,
    settings::SettingsPage,
    smart_tools::SmartToolsPage,
};
use speakerdrive_shared::AuthResponse;

#[derive(Clone, Debug, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/signup")]
    Signup,
    #[at("/dashboard")]
    Dashboard,
    #[at("/find-leads")]
    FindLeads,
    #[at("/my-leads")]
    MyLeads,
    #[at("/leads/:id")]
    LeadDetails { id: String },
    #[at("/contact-finder")]
    ContactFinder,
    #[at("/smart-tools/:deck")]
    SmartTools { deck: String },
    #[at("/onboarding")]
    Onboarding,
    #[at("/settings")]
    Settings,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Signup)
    }
}

/// Where the auth gate sends a request for `route`, if anywhere.
///
/// Signed-out sessions only reach the public routes. Signed-in sessions skip
/// the auth screens and never land on the root or an unknown path.
pub fn gate(route: &Route, authenticated: bool) -> Option<Route> {
    match (authenticated, route) {
        (false, route) if route.is_public() => None,
        (false, _) => Some(Route::Login),
        (true, Route::Login | Route::Signup | Route::Home | Route::NotFound) => {
            Some(Route::Dashboard)
        }
        (true, _) => None,
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Login => html! { <AuthPage mode={AuthMode::SignIn} /> },
        Route::Signup => html! { <AuthPage mode={AuthMode::SignUp} /> },
        Route::Dashboard => html! { <DashboardPage /> },
        Route::FindLeads => html! { <FindLeadsPage /> },
        Route::MyLeads => html! { <MyLeadsPage /> },
        Route::LeadDetails { id } => html! { <LeadDetailsPage {id} /> },
        Route::ContactFinder => html! { <ContactFinderPage /> },
        Route::SmartTools { deck } => html! { <SmartToolsPage {deck} /> },
        Route::Onboarding => html! { <OnboardingPage /> },
        Route::Settings => html! { <SettingsPage /> },
        Route::Home | Route::NotFound => html! { <Redirect<Route> to={Route::Dashboard} /> },
    }
}

#[derive(Properties, PartialEq)]
struct AuthPageProps {
    mode: AuthMode,
}

#[function_component(AuthPage)]
fn auth_page(props: &AuthPageProps) -> Html {
    let auth_ctx = use_auth();
    let navigator = use_navigator();
    let mode = props.mode;

    let on_success = Callback::from(move |response: AuthResponse| {
        auth_ctx.login.emit(response);
        let next = match mode {
            AuthMode::SignIn => Route::Dashboard,
            AuthMode::SignUp => Route::Onboarding,
        };
        if let Some(navigator) = &navigator {
            navigator.push(&next);
        }
    });

    html! { <AuthForm {mode} {on_success} /> }
}

#[function_component(GatedSwitch)]
fn gated_switch() -> Html {
    let auth_ctx = use_auth();
    let authenticated = auth_ctx.is_authenticated();
    let route = use_route::<Route>().unwrap_or(Route::NotFound);

    if let Some(target) = gate(&route, authenticated) {
        return html! { <Redirect<Route> to={target} /> };
    }

    if authenticated {
        html! {
            <Layout>
                <Switch<Route> render={switch} />
            </Layout>
        }
    } else {
        html! { <Switch<Route> render={switch} /> }
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <AuthProvider>
            <BrowserRouter>
                <GatedSwitch />
            </BrowserRouter>
        </AuthProvider>
    }
}

fn load_stylesheet(href: &str) -> Result<(), JsValue> {
    let link = gloo::utils::document().create_element("link")?;
    link.set_attribute("href", href)?;
    link.set_attribute("rel", "stylesheet")?;
    gloo::utils::head().append_child(&link)?;
    Ok(())
}

fn main() {
    // Load Tailwind CSS
    if let Err(err) = load_stylesheet("https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css") {
        gloo::console::error!("Failed to load stylesheet", err);
    }

    yew::Renderer::<App>::new().render();
}
