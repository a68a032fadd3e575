use chrono::Utc;
use speakerdrive_shared::{
    Catalog, FilterCriteria, Lead, LeadSort, SortDirection, SortField, UnlockStatus,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::leads::{LeadFilters, LeadTable};
use crate::hooks::use_lead_unlock;
use crate::services::{catalog, leads, ApiResult};

const PAGE_SIZE: usize = 10;

/// Filter, sort and slice one page out of the loaded leads.
pub fn visible_page(
    leads: &[Lead],
    criteria: &FilterCriteria,
    sort: LeadSort,
    page: usize,
) -> (Vec<Lead>, usize) {
    let mut narrowed = criteria.apply(leads, Utc::now());
    sort.sort(&mut narrowed);
    let total_pages = narrowed.len().div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, total_pages);
    let rows = narrowed
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();
    (rows, total_pages)
}

fn parse_sort(value: &str) -> LeadSort {
    let (field, direction) = value.split_once(':').unwrap_or((value, "desc"));
    let field = match field {
        "name" => SortField::Name,
        "industry" => SortField::Industry,
        _ => SortField::AddedAt,
    };
    let direction = if direction == "asc" {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };
    LeadSort::new(field, direction)
}

#[derive(Clone, Copy, PartialEq)]
pub enum LeadSource {
    All,
    Unlocked,
}

impl LeadSource {
    fn title(&self) -> &'static str {
        match self {
            LeadSource::All => "Find Leads",
            LeadSource::Unlocked => "My Leads",
        }
    }

    async fn load(self) -> ApiResult<Vec<Lead>> {
        match self {
            LeadSource::All => leads::list().await,
            LeadSource::Unlocked => leads::mine().await,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LeadListProps {
    pub source: LeadSource,
}

#[function_component(LeadList)]
pub fn lead_list(props: &LeadListProps) -> Html {
    let all_leads = use_state(Vec::<Lead>::new);
    let catalog_state = use_state(|| None::<Catalog>);
    let criteria = use_state(FilterCriteria::default);
    let sort = use_state(LeadSort::default);
    let page = use_state(|| 1usize);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let unlock = use_lead_unlock();
    let source = props.source;

    // Fetch leads and filter options on mount
    {
        let all_leads = all_leads.clone();
        let catalog_state = catalog_state.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_effect_with(source, move |source| {
            let source = *source;
            spawn_local(async move {
                match source.load().await {
                    Ok(fetched) => all_leads.set(fetched),
                    Err(err) => {
                        gloo::console::error!(format!("Error fetching leads: {}", err));
                        error.set(Some(err.message));
                    }
                }
                loading.set(false);

                match catalog::get().await {
                    Ok(fetched) => catalog_state.set(Some(fetched)),
                    Err(err) => gloo::console::warn!(format!("Error fetching catalog: {}", err)),
                }
            });
            || ()
        });
    }

    let on_filter_change = {
        let criteria = criteria.clone();
        let page = page.clone();
        Callback::from(move |next: FilterCriteria| {
            criteria.set(next);
            page.set(1);
        })
    };

    let on_sort_change = {
        let sort = sort.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            sort.set(parse_sort(&select.value()));
        })
    };

    // A fresh unlock only changes this row; the list is reloaded when the page remounts.
    let on_unlocked = Callback::from(|status: UnlockStatus| {
        gloo::console::log!(format!("Unlocked lead {}", status.lead_id));
    });

    let (rows, total_pages) = visible_page(&all_leads, &criteria, *sort, *page);
    let current_page = (*page).min(total_pages);

    let go_to = |target: usize| {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| page.set(target))
    };

    html! {
        <div class="p-6 space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold text-gray-900">{source.title()}</h1>
                <select class="border border-gray-300 rounded px-3 py-2 text-sm" onchange={on_sort_change}>
                    <option value="added_at:desc">{"Newest first"}</option>
                    <option value="added_at:asc">{"Oldest first"}</option>
                    <option value="name:asc">{"Name A-Z"}</option>
                    <option value="name:desc">{"Name Z-A"}</option>
                    <option value="industry:asc">{"Industry"}</option>
                </select>
            </div>

            if let Some(message) = (*error).clone() {
                <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded">{message}</div>
            }

            <div class="grid grid-cols-1 lg:grid-cols-4 gap-6">
                <LeadFilters criteria={(*criteria).clone()} catalog={(*catalog_state).clone()} on_change={on_filter_change} />
                <div class="lg:col-span-3 space-y-4">
                    if *loading {
                        <p class="text-gray-500">{"Loading leads..."}</p>
                    } else {
                        <LeadTable leads={rows} unlock={unlock.clone()} {on_unlocked} />
                        <div class="flex items-center justify-between text-sm text-gray-600">
                            <button disabled={current_page <= 1} onclick={go_to(current_page.saturating_sub(1))}
                                class="px-3 py-1 border rounded disabled:opacity-50">{"Previous"}</button>
                            <span>{format!("Page {} of {}", current_page, total_pages)}</span>
                            <button disabled={current_page >= total_pages} onclick={go_to(current_page + 1)}
                                class="px-3 py-1 border rounded disabled:opacity-50">{"Next"}</button>
                        </div>
                    }
                </div>
            </div>
        </div>
    }
}

#[function_component(FindLeadsPage)]
pub fn find_leads_page() -> Html {
    html! { <LeadList source={LeadSource::All} /> }
}

#[function_component(MyLeadsPage)]
pub fn my_leads_page() -> Html {
    html! { <LeadList source={LeadSource::Unlocked} /> }
}
