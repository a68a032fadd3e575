use speakerdrive_shared::{ContactFinderResult, ContactSearch};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::integrations;

#[derive(Clone, Copy, PartialEq)]
enum SearchMode {
    Manual,
    Linkedin,
}

fn build_search(mode: SearchMode, full_name: &str, domain: &str, linkedin_url: &str) -> ContactSearch {
    match mode {
        SearchMode::Manual => ContactSearch::Manual {
            full_name: full_name.to_string(),
            company_domain: domain.to_string(),
        },
        SearchMode::Linkedin => ContactSearch::Linkedin {
            linkedin_url: linkedin_url.to_string(),
        },
    }
}

#[function_component(ContactFinderPage)]
pub fn contact_finder_page() -> Html {
    let mode = use_state(|| SearchMode::Manual);
    let full_name = use_state(String::new);
    let domain = use_state(String::new);
    let linkedin_url = use_state(String::new);
    let searching = use_state(|| false);
    let result = use_state(|| None::<ContactFinderResult>);
    let error = use_state(|| None::<String>);

    let bind = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
        })
    };

    let select_mode = |target: SearchMode| {
        let mode = mode.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            mode.set(target);
            error.set(None);
        })
    };

    let onsubmit = {
        let mode = mode.clone();
        let full_name = full_name.clone();
        let domain = domain.clone();
        let linkedin_url = linkedin_url.clone();
        let searching = searching.clone();
        let result = result.clone();
        let error = error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let search = build_search(*mode, &full_name, &domain, &linkedin_url);

            let problems = search.validate();
            if let Some(problem) = problems.values().next() {
                error.set(Some(problem.clone()));
                return;
            }

            searching.set(true);
            error.set(None);
            result.set(None);
            let searching = searching.clone();
            let result = result.clone();
            let error = error.clone();
            spawn_local(async move {
                match integrations::find_contact(&search).await {
                    Ok(found) => result.set(Some(found)),
                    Err(err) => {
                        gloo::console::error!(format!("Contact search failed: {}", err));
                        error.set(Some(err.message));
                    }
                }
                searching.set(false);
            });
        })
    };

    let tab_class = |target: SearchMode| {
        if *mode == target {
            "px-4 py-2 text-sm font-medium border-b-2 border-blue-600 text-blue-600"
        } else {
            "px-4 py-2 text-sm font-medium text-gray-500 hover:text-gray-700"
        }
    };
    let input_class = "w-full border border-gray-300 rounded px-3 py-2 text-sm";

    html! {
        <div class="p-6 space-y-6 max-w-2xl">
            <h1 class="text-2xl font-bold text-gray-900">{"Contact Finder"}</h1>

            <div class="bg-white rounded-lg shadow">
                <div class="flex border-b border-gray-200">
                    <button class={tab_class(SearchMode::Manual)} onclick={select_mode(SearchMode::Manual)}>
                        {"Name & Company"}
                    </button>
                    <button class={tab_class(SearchMode::Linkedin)} onclick={select_mode(SearchMode::Linkedin)}>
                        {"LinkedIn URL"}
                    </button>
                </div>

                <form class="p-6 space-y-4" {onsubmit}>
                    if *mode == SearchMode::Manual {
                        <input type="text" class={input_class} placeholder="Full name"
                            value={(*full_name).clone()} oninput={bind(&full_name)} />
                        <input type="text" class={input_class} placeholder="Company domain, e.g. crowe.com"
                            value={(*domain).clone()} oninput={bind(&domain)} />
                    } else {
                        <input type="url" class={input_class} placeholder="https://www.linkedin.com/in/..."
                            value={(*linkedin_url).clone()} oninput={bind(&linkedin_url)} />
                    }

                    if let Some(message) = (*error).clone() {
                        <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded">{message}</div>
                    }

                    <button type="submit" disabled={*searching}
                        class="bg-blue-600 hover:bg-blue-700 text-white px-4 py-2 rounded text-sm disabled:opacity-50">
                        {if *searching { "Searching..." } else { "Find Email" }}
                    </button>
                </form>
            </div>

            if let Some(found) = (*result).clone() {
                <div class="bg-white rounded-lg shadow p-6 space-y-2">
                    if let Some(email) = found.email.clone() {
                        <p class="text-lg font-medium">
                            <a href={format!("mailto:{}", email)} class="text-blue-600 hover:underline">{email.clone()}</a>
                        </p>
                    } else {
                        <p class="text-gray-600">{"No email found for this contact."}</p>
                    }
                    if let Some(name) = found.full_name.clone() {
                        <p class="text-sm text-gray-700">{name}</p>
                    }
                    if let Some(company) = found.company_domain.clone() {
                        <p class="text-sm text-gray-500">{company}</p>
                    }
                    if let Some(status) = found.status.clone() {
                        <span class="inline-block text-xs bg-gray-100 rounded px-2 py-1">{status}</span>
                    }
                </div>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_mode_ignores_linkedin_field() {
        let search = build_search(SearchMode::Manual, "Tiffany Hiscock", "crowe.com", "ignored");
        assert_eq!(
            search.query_params(),
            ("Tiffany Hiscock".to_string(), Some("crowe.com".to_string()))
        );
    }

    #[test]
    fn linkedin_mode_needs_a_linkedin_url() {
        let search = build_search(SearchMode::Linkedin, "", "", "https://example.com/in/x");
        assert!(search.validate().contains_key("linkedin_url"));
    }
}
