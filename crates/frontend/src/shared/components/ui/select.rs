use leptos::prelude::*;

/// Filter select: a labelled `<select>` whose first option clears the filter
#[component]
pub fn Select(
    /// Label text
    #[prop(into)]
    label: String,
    /// Current value, empty string for "no filter"
    #[prop(into)]
    value: Signal<String>,
    /// Change event handler, receives the selected value
    on_change: Callback<String>,
    /// Selectable values
    #[prop(into)]
    options: Signal<Vec<String>>,
    /// Caption of the empty option
    #[prop(optional, into)]
    placeholder: MaybeProp<String>,
) -> impl IntoView {
    let placeholder = move || placeholder.get().unwrap_or_else(|| "All".to_string());

    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <select
                class="form__select"
                on:change=move |ev| on_change.run(event_target_value(&ev))
                prop:value=move || value.get()
            >
                <option value="" selected=move || value.get().is_empty()>
                    {placeholder}
                </option>
                <For
                    each=move || options.get()
                    key=|option| option.clone()
                    children=move |option| {
                        let option_clone = option.clone();
                        let is_selected = move || value.get() == option_clone;
                        let option_value = option.clone();
                        view! {
                            <option value=option_value selected=is_selected>
                                {option}
                            </option>
                        }
                    }
                />
            </select>
        </div>
    }
}
