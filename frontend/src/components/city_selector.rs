use leptos::prelude::*;

#[component]
pub fn CitySelector(
    /// 下拉选项，首项为 "All Cities"
    #[prop(into)]
    options: Signal<Vec<String>>,
    #[prop(into)] selected: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="form-control min-w-[200px]">
            <label for="city-select" class="label justify-end">
                <span class="label-text">"Select City for Forecast"</span>
            </label>
            <select
                id="city-select"
                class="select select-bordered w-full"
                prop:value=move || selected.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
            >
                <For
                    each=move || options.get()
                    key=|city| city.clone()
                    children=move |city| {
                        let value = city.clone();
                        let is_selected = {
                            let city = city.clone();
                            move || selected.with(|s| *s == city)
                        };
                        view! { <option value=value selected=is_selected>{city}</option> }
                    }
                />
            </select>
        </div>
    }
}
