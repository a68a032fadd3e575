use speakerdrive_shared::UnlockStatus;
use yew::prelude::*;
use yew_hooks::{use_async_with_options, UseAsyncOptions};
use yew_router::prelude::*;

use crate::components::auth::use_auth;
use crate::components::chat::ChatPanel;
use crate::components::leads::LeadTable;
use crate::hooks::use_lead_unlock;
use crate::services::dashboard;
use crate::Route;

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let auth_ctx = use_auth();
    let unlock = use_lead_unlock();
    let stats = use_async_with_options(
        async move { dashboard::stats().await },
        UseAsyncOptions::enable_auto(),
    );

    // Credits and counts move with every unlock.
    let on_unlocked = {
        let stats = stats.clone();
        Callback::from(move |_: UnlockStatus| stats.run())
    };

    let greeting = auth_ctx
        .user
        .as_ref()
        .map(|u| format!("Welcome back, {}", u.display_name()))
        .unwrap_or_else(|| "Welcome".to_string());

    html! {
        <div class="p-6 space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold text-gray-900">{greeting}</h1>
                <Link<Route> to={Route::FindLeads}
                    classes="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded-lg text-sm font-medium">
                    {"Find Leads"}
                </Link<Route>>
            </div>

            if let Some(error) = &stats.error {
                <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded">
                    {format!("Failed to load dashboard: {}", error)}
                </div>
            }

            if let Some(data) = &stats.data {
                <div class="grid grid-cols-2 md:grid-cols-5 gap-4">
                    <StatCard label="Total Leads" value={data.total_leads.to_string()} />
                    <StatCard label="Contacts" value={data.contact_leads.to_string()} />
                    <StatCard label="Events" value={data.event_leads.to_string()} />
                    <StatCard label="Unlocked" value={data.unlocked_leads.to_string()} />
                    <StatCard label="Credits Left" value={data.credits_remaining.to_string()} />
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                    <div class="lg:col-span-2 space-y-3">
                        <h2 class="text-lg font-semibold text-gray-900">{"Added this week"}</h2>
                        <LeadTable leads={data.added_last_week.clone()} unlock={unlock.clone()} {on_unlocked} />
                    </div>
                    <ChatPanel />
                </div>
            } else if stats.loading {
                <p class="text-gray-500">{"Loading..."}</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    label: &'static str,
    value: String,
}

#[function_component(StatCard)]
fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-white rounded-lg shadow p-4">
            <p class="text-sm text-gray-500">{props.label}</p>
            <p class="text-2xl font-semibold text-gray-900">{props.value.clone()}</p>
        </div>
    }
}
