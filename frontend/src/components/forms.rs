use yew::prelude::*;

/// Add or remove `value`, refusing to grow past `max`.
pub fn toggle_choice(selected: &[String], value: &str, max: Option<usize>) -> Vec<String> {
    if selected.iter().any(|s| s == value) {
        return selected.iter().filter(|s| *s != value).cloned().collect();
    }
    if max.is_some_and(|max| selected.len() >= max) {
        return selected.to_vec();
    }
    let mut next = selected.to_vec();
    next.push(value.to_string());
    next
}

#[derive(Properties, PartialEq)]
pub struct ChoiceGroupProps {
    pub label: &'static str,
    pub options: Vec<String>,
    pub selected: Vec<String>,
    #[prop_or_default]
    pub max: Option<usize>,
    #[prop_or_default]
    pub error: Option<String>,
    pub on_change: Callback<Vec<String>>,
}

#[function_component(ChoiceGroup)]
pub fn choice_group(props: &ChoiceGroupProps) -> Html {
    let at_limit = props.max.is_some_and(|max| props.selected.len() >= max);

    html! {
        <fieldset class="space-y-2">
            <legend class="text-sm font-medium text-gray-700">
                {props.label}
                if let Some(max) = props.max {
                    <span class="text-gray-400 font-normal">{format!(" (up to {})", max)}</span>
                }
            </legend>
            <div class="grid grid-cols-1 sm:grid-cols-2 gap-2">
                { for props.options.iter().map(|option| {
                    let checked = props.selected.contains(option);
                    let onchange = {
                        let selected = props.selected.clone();
                        let option = option.clone();
                        let max = props.max;
                        let on_change = props.on_change.clone();
                        Callback::from(move |_: Event| on_change.emit(toggle_choice(&selected, &option, max)))
                    };
                    html! {
                        <label key={option.clone()} class="flex items-center space-x-2 text-sm text-gray-700">
                            <input type="checkbox" {checked} disabled={!checked && at_limit} {onchange} />
                            <span>{option.clone()}</span>
                        </label>
                    }
                }) }
            </div>
            if let Some(error) = props.error.clone() {
                <p class="text-xs text-red-600">{error}</p>
            }
        </fieldset>
    }
}
