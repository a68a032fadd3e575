use yew::prelude::*;
use yew_router::prelude::*;

use super::auth::use_auth;
use crate::Route;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Html,
}

/// Sidebar navigation around every signed-in page.
#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    let auth_ctx = use_auth();
    let current_route = use_route::<Route>().unwrap_or(Route::Dashboard);
    let sidebar_collapsed = use_state(|| false);

    let toggle_sidebar = {
        let sidebar_collapsed = sidebar_collapsed.clone();
        Callback::from(move |_| sidebar_collapsed.set(!*sidebar_collapsed))
    };

    let on_logout = {
        let logout = auth_ctx.logout.clone();
        Callback::from(move |_| logout.emit(()))
    };

    let display_name = auth_ctx
        .user
        .as_ref()
        .map(|u| u.display_name())
        .unwrap_or_default();
    let avatar_url = auth_ctx
        .user
        .as_ref()
        .and_then(|u| u.metadata.avatar_url.clone());
    let initial = display_name
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('U');

    let sidebar_width = if *sidebar_collapsed { "w-16" } else { "w-64" };
    let collapsed = *sidebar_collapsed;

    html! {
        <div class="min-h-screen bg-gray-100 flex">
            <aside class={classes!(sidebar_width, "bg-gray-900", "text-gray-300", "flex", "flex-col", "flex-shrink-0")}>
                <div class="h-14 flex items-center justify-between px-4 border-b border-gray-800">
                    if !collapsed {
                        <span class="text-white font-semibold text-lg">{"SpeakerDrive"}</span>
                    }
                    <button onclick={toggle_sidebar} class="text-gray-400 hover:text-white">
                        {if collapsed { "»" } else { "«" }}
                    </button>
                </div>

                <nav class="flex-1 py-4 space-y-1">
                    <NavItem route={Route::Dashboard} label="Dashboard" current={current_route.clone()} {collapsed} />
                    <NavItem route={Route::FindLeads} label="Find Leads" current={current_route.clone()} {collapsed} />
                    <NavItem route={Route::MyLeads} label="My Leads" current={current_route.clone()} {collapsed} />
                    <NavItem route={Route::ContactFinder} label="Contact Finder" current={current_route.clone()} {collapsed} />
                    <NavItem route={Route::SmartTools { deck: "strategic".to_string() }} label="Instant Intel" current={current_route.clone()} {collapsed} />
                    <NavItem route={Route::SmartTools { deck: "coach".to_string() }} label="Sales Coach" current={current_route.clone()} {collapsed} />
                    <NavItem route={Route::Settings} label="Settings" current={current_route.clone()} {collapsed} />
                </nav>

                <div class="border-t border-gray-800 p-4 flex items-center space-x-3">
                    if let Some(src) = avatar_url {
                        <img src={src} alt="avatar" class="w-8 h-8 rounded-full object-cover" />
                    } else {
                        <div class="w-8 h-8 bg-blue-500 rounded-full flex items-center justify-center">
                            <span class="text-white text-sm font-medium">{initial}</span>
                        </div>
                    }
                    if !collapsed {
                        <div class="flex-1 min-w-0">
                            <p class="text-sm text-white truncate">{display_name}</p>
                            <button onclick={on_logout} class="text-xs text-gray-400 hover:text-white">
                                {"Sign out"}
                            </button>
                        </div>
                    }
                </div>
            </aside>

            <main class="flex-1 overflow-y-auto">
                {props.children.clone()}
            </main>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct NavItemProps {
    route: Route,
    label: &'static str,
    current: Route,
    collapsed: bool,
}

#[function_component(NavItem)]
fn nav_item(props: &NavItemProps) -> Html {
    let class = if props.route == props.current {
        "bg-blue-600 text-white"
    } else {
        "text-gray-300 hover:bg-gray-700 hover:text-white"
    };
    let text = if props.collapsed {
        props.label.chars().take(1).collect::<String>()
    } else {
        props.label.to_string()
    };

    html! {
        <Link<Route> to={props.route.clone()} classes={classes!("block", "px-4", "py-2", "text-sm", class)}>
            {text}
        </Link<Route>>
    }
}
