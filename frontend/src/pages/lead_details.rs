use speakerdrive_shared::Lead;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::leads::{lead_location, UnlockCell};
use crate::hooks::use_lead_unlock;
use crate::services::leads;
use crate::Route;

#[derive(Properties, PartialEq)]
pub struct LeadDetailsProps {
    pub id: String,
}

#[function_component(LeadDetailsPage)]
pub fn lead_details_page(props: &LeadDetailsProps) -> Html {
    let lead = use_state(|| None::<Lead>);
    let error = use_state(|| None::<String>);
    let unlock = use_lead_unlock();

    {
        let lead = lead.clone();
        let error = error.clone();
        let unlock = unlock.clone();
        use_effect_with(props.id.clone(), move |id| {
            let id = id.clone();
            unlock.check_status(&id);
            spawn_local(async move {
                match leads::get(&id).await {
                    Ok(fetched) => lead.set(Some(fetched)),
                    Err(err) => {
                        gloo::console::error!(format!("Error fetching lead {}: {}", id, err));
                        error.set(Some(err.message));
                    }
                }
            });
            || ()
        });
    }

    let back = html! {
        <Link<Route> to={Route::FindLeads} classes="text-sm text-blue-600 hover:underline">
            {"← Back to leads"}
        </Link<Route>>
    };

    let Some(lead) = (*lead).clone() else {
        return html! {
            <div class="p-6 space-y-4">
                {back}
                if let Some(message) = (*error).clone() {
                    <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded">{message}</div>
                } else {
                    <p class="text-gray-500">{"Loading..."}</p>
                }
            </div>
        };
    };

    let detail = |label: &'static str, value: Option<String>| -> Html {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => html! {
                <div>
                    <dt class="text-xs font-medium text-gray-500 uppercase">{label}</dt>
                    <dd class="text-sm text-gray-900">{value}</dd>
                </div>
            },
            None => html! {},
        }
    };

    html! {
        <div class="p-6 space-y-6">
            {back}
            <div class="bg-white rounded-lg shadow p-6 space-y-6">
                <div class="flex items-start space-x-4">
                    <img src={lead.image_url.clone()} alt="" class="w-20 h-20 rounded-lg object-cover" />
                    <div class="flex-1">
                        <h1 class="text-2xl font-bold text-gray-900">{lead.name.clone()}</h1>
                        <p class="text-gray-600">{lead.focus.clone()}</p>
                        <span class="inline-block mt-2 text-xs bg-gray-100 text-gray-700 rounded px-2 py-1">
                            {format!("{} · {}", lead.lead_type.label(), lead.unlock_type.label())}
                        </span>
                    </div>
                    <UnlockCell lead={lead.clone()} unlock={unlock.clone()} />
                </div>

                <dl class="grid grid-cols-1 md:grid-cols-2 gap-4">
                    {detail("Industry", Some(lead.industry_category.clone()))}
                    {detail("Location", Some(lead_location(&lead)))}
                    {detail("Purpose", Some(lead.event_purpose.clone()))}
                    {detail("Host Organization", lead.host_organization.clone())}
                    {detail("Target Audience", lead.target_audience.clone())}
                    {detail("Company Size", lead.company_size.clone())}
                    {detail("LinkedIn", lead.linkedin_url.clone())}
                    {detail("Added", Some(lead.added_at.format("%B %d, %Y").to_string()))}
                    if let Some(event) = lead.event_details.clone() {
                        {detail("Event Type", Some(event.event_type))}
                        {detail("Format", Some(event.format))}
                    }
                </dl>

                if let Some(info) = lead.detailed_info.clone() {
                    <div>
                        <h2 class="text-sm font-medium text-gray-500 uppercase mb-1">{"About"}</h2>
                        <p class="text-sm text-gray-800 whitespace-pre-wrap">{info}</p>
                    </div>
                }
            </div>
        </div>
    }
}
