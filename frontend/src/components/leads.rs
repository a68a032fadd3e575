use speakerdrive_shared::{
    AddedWindow, Catalog, FilterCriteria, FilterDimension, Lead, LeadType, LeadUnlockState,
    UnlockStatus, UnlockType, UnlockValueKind,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::hooks::UseLeadUnlockHandle;
use crate::Route;

/// The value to show for a lead: what this session unlocked, else what the
/// server already returned for the viewer.
pub fn revealed_value(lead: &Lead, state: &LeadUnlockState) -> Option<String> {
    state
        .value
        .clone()
        .or_else(|| lead.unlock_value.clone())
        .filter(|_| state.unlocked || lead.is_unlocked)
}

#[derive(Properties, PartialEq)]
pub struct UnlockValueProps {
    pub kind: UnlockValueKind,
    pub value: String,
}

#[function_component(UnlockValue)]
pub fn unlock_value(props: &UnlockValueProps) -> Html {
    match props.kind {
        UnlockValueKind::Email => html! {
            <a href={format!("mailto:{}", props.value)} class="text-blue-600 hover:underline break-all">
                {props.value.clone()}
            </a>
        },
        UnlockValueKind::Url => html! {
            <a href={props.value.clone()} target="_blank" rel="noopener noreferrer" class="text-blue-600 hover:underline break-all">
                {props.value.clone()}
            </a>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct UnlockCellProps {
    pub lead: Lead,
    pub unlock: UseLeadUnlockHandle,
    #[prop_or_default]
    pub on_unlocked: Callback<UnlockStatus>,
}

/// Unlock button, in-flight marker, revealed value or error for one lead.
#[function_component(UnlockCell)]
pub fn unlock_cell(props: &UnlockCellProps) -> Html {
    let state = props.unlock.state(&props.lead.id);
    let kind = props.lead.unlock_type.value_kind();

    if let Some(value) = revealed_value(&props.lead, &state) {
        return html! { <UnlockValue {kind} {value} /> };
    }

    let onclick = {
        let unlock = props.unlock.clone();
        let lead_id = props.lead.id.clone();
        let on_unlocked = props.on_unlocked.clone();
        Callback::from(move |_: MouseEvent| unlock.unlock(&lead_id, on_unlocked.clone()))
    };

    html! {
        <div class="flex flex-col items-start">
            <button
                {onclick}
                disabled={state.unlocking}
                class="bg-blue-600 hover:bg-blue-700 text-white px-3 py-1 rounded text-sm disabled:opacity-50 disabled:cursor-not-allowed"
            >
                if state.unlocking {
                    {"Unlocking..."}
                } else {
                    {format!("Unlock {}", props.lead.unlock_type.label())}
                }
            </button>
            if let Some(error) = state.error {
                <span class="text-xs text-red-600 mt-1">{error}</span>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LeadTableProps {
    pub leads: Vec<Lead>,
    pub unlock: UseLeadUnlockHandle,
    #[prop_or_default]
    pub on_unlocked: Callback<UnlockStatus>,
}

#[function_component(LeadTable)]
pub fn lead_table(props: &LeadTableProps) -> Html {
    if props.leads.is_empty() {
        return html! {
            <div class="bg-white rounded-lg shadow p-8 text-center text-gray-500">
                {"No leads match the current filters."}
            </div>
        };
    }

    html! {
        <div class="bg-white rounded-lg shadow overflow-x-auto">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>
                        <th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase">{"Name"}</th>
                        <th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase">{"Type"}</th>
                        <th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase">{"Industry"}</th>
                        <th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase">{"Location"}</th>
                        <th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase">{"Added"}</th>
                        <th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase">{"Contact"}</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-gray-200">
                    { for props.leads.iter().map(|lead| html! {
                        <tr key={lead.id.clone()}>
                            <td class="px-4 py-3">
                                <div class="flex items-center space-x-3">
                                    <img src={lead.image_url.clone()} alt="" class="w-10 h-10 rounded-full object-cover" />
                                    <div>
                                        <Link<Route> to={Route::LeadDetails { id: lead.id.clone() }} classes="font-medium text-gray-900 hover:text-blue-600">
                                            {lead.name.clone()}
                                        </Link<Route>>
                                        <p class="text-sm text-gray-500">{lead.focus.clone()}</p>
                                    </div>
                                </div>
                            </td>
                            <td class="px-4 py-3 text-sm text-gray-700">{lead.lead_type.label()}</td>
                            <td class="px-4 py-3 text-sm text-gray-700">{lead.industry_category.clone()}</td>
                            <td class="px-4 py-3 text-sm text-gray-700">{lead_location(lead)}</td>
                            <td class="px-4 py-3 text-sm text-gray-700">{lead.added_at.format("%b %d, %Y").to_string()}</td>
                            <td class="px-4 py-3">
                                <UnlockCell lead={lead.clone()} unlock={props.unlock.clone()} on_unlocked={props.on_unlocked.clone()} />
                            </td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

/// Contact location, else the event's venue.
pub fn lead_location(lead: &Lead) -> String {
    lead.location
        .clone()
        .or_else(|| lead.event_details.as_ref().map(|d| d.location.clone()))
        .unwrap_or_default()
}

#[derive(Properties, PartialEq)]
pub struct LeadFiltersProps {
    pub criteria: FilterCriteria,
    #[prop_or_default]
    pub catalog: Option<Catalog>,
    pub on_change: Callback<FilterCriteria>,
}

/// Sidebar of text and select filters. Every edit emits the full criteria.
#[function_component(LeadFilters)]
pub fn lead_filters(props: &LeadFiltersProps) -> Html {
    let on_input = |dimension: FilterDimension| {
        let criteria = props.criteria.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = criteria.clone();
            next.set(dimension, &input.value());
            on_change.emit(next);
        })
    };

    let on_select = |dimension: FilterDimension| {
        let criteria = props.criteria.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = criteria.clone();
            next.set(dimension, &select.value());
            on_change.emit(next);
        })
    };

    let on_clear = {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(FilterCriteria::default()))
    };

    let catalog = props.catalog.clone().unwrap_or_default();
    let lead_types: Vec<(String, String)> = LeadType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), t.label().to_string()))
        .collect();
    let unlock_types: Vec<(String, String)> = UnlockType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), t.label().to_string()))
        .collect();
    let windows: Vec<(String, String)> = AddedWindow::ALL
        .iter()
        .map(|w| (w.as_str().to_string(), w.label().to_string()))
        .collect();
    let as_options = |values: &[String]| -> Vec<(String, String)> {
        values.iter().map(|v| (v.clone(), v.clone())).collect()
    };

    let criteria = &props.criteria;
    let text_class = "w-full border border-gray-300 rounded px-3 py-2 text-sm";

    html! {
        <div class="bg-white rounded-lg shadow p-4 space-y-4">
            <div class="flex items-center justify-between">
                <h3 class="font-medium text-gray-900">{"Filters"}</h3>
                if !criteria.is_empty() {
                    <button onclick={on_clear} class="text-sm text-blue-600 hover:underline">{"Clear all"}</button>
                }
            </div>

            <input type="text" class={text_class} placeholder="Search leads"
                value={criteria.get(FilterDimension::Search)}
                oninput={on_input(FilterDimension::Search)} />
            <input type="text" class={text_class} placeholder="Search events by name"
                value={criteria.get(FilterDimension::EventSearch)}
                oninput={on_input(FilterDimension::EventSearch)} />

            <FilterSelect label="Lead Type" value={criteria.get(FilterDimension::LeadType)}
                options={lead_types} onchange={on_select(FilterDimension::LeadType)} />
            <FilterSelect label="Unlock Type" value={criteria.get(FilterDimension::UnlockType)}
                options={unlock_types} onchange={on_select(FilterDimension::UnlockType)} />
            <FilterSelect label="Industry" value={criteria.get(FilterDimension::Industry)}
                options={as_options(&catalog.industries)} onchange={on_select(FilterDimension::Industry)} />
            <FilterSelect label="Location" value={criteria.get(FilterDimension::Location)}
                options={as_options(&catalog.locations)} onchange={on_select(FilterDimension::Location)} />
            <FilterSelect label="Added to SpeakerDrive" value={criteria.get(FilterDimension::AddedWithin)}
                options={windows} onchange={on_select(FilterDimension::AddedWithin)} />

            <input type="text" class={text_class} placeholder="Organization"
                value={criteria.get(FilterDimension::Organization)}
                oninput={on_input(FilterDimension::Organization)} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct FilterSelectProps {
    label: &'static str,
    value: String,
    /// `(value, label)` pairs; an empty "Any" option is always first.
    options: Vec<(String, String)>,
    onchange: Callback<Event>,
}

#[function_component(FilterSelect)]
fn filter_select(props: &FilterSelectProps) -> Html {
    html! {
        <label class="block">
            <span class="text-xs font-medium text-gray-500 uppercase">{props.label}</span>
            <select class="mt-1 w-full border border-gray-300 rounded px-3 py-2 text-sm" onchange={props.onchange.clone()}>
                <option value="" selected={props.value.is_empty()}>{"Any"}</option>
                { for props.options.iter().map(|(value, label)| html! {
                    <option value={value.clone()} selected={*value == props.value}>{label.clone()}</option>
                }) }
            </select>
        </label>
    }
}
