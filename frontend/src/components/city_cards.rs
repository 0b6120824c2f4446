use cleanair::aqi;
use cleanair_shared::StationReading;
use leptos::prelude::*;

#[component]
pub fn CityCards(
    #[prop(into)] stations: Signal<Vec<StationReading>>,
    #[prop(into)] selected: Signal<String>,
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
    let is_empty = move || stations.with(Vec::is_empty);

    move || {
        if loading.get() && is_empty() {
            return view! {
                <div class="p-8 text-center">
                    <div class="animate-pulse">
                        <div class="h-6 bg-base-300 rounded w-1/3 mx-auto mb-4"></div>
                        <div class="h-4 bg-base-300 rounded w-1/2 mx-auto"></div>
                    </div>
                </div>
            }
            .into_any();
        }
        if is_empty() {
            return view! {
                <div class="p-6 text-center">
                    <p class="text-base-content/70">"No city data available"</p>
                </div>
            }
            .into_any();
        }

        view! {
            <div class="w-full">
                <div class="flex justify-between items-center mb-6 px-2">
                    <h2 class="text-2xl font-bold">"Pakistan Air Quality"</h2>
                    <span class="badge badge-ghost">
                        {move || stations.with(Vec::len)} " cities monitoring"
                    </span>
                </div>
                <div class="carousel carousel-center w-full gap-5 pb-4">
                    <For
                        each=move || stations.get()
                        key=|s| (s.station_id.clone(), s.aqi, s.last_updated)
                        children=move |station| view! {
                            <CityCard station=station selected=selected on_select=on_select />
                        }
                    />
                </div>
            </div>
        }
        .into_any()
    }
}

#[component]
fn CityCard(
    station: StationReading,
    selected: Signal<String>,
    on_select: Callback<String>,
) -> impl IntoView {
    let category = aqi::category(station.aqi);
    let city = station.city.clone();
    let is_selected = {
        let city = city.clone();
        Memo::new(move |_| selected.with(|s| *s == city))
    };
    let card_class = move || {
        if is_selected.get() {
            "card bg-base-100 shadow-md w-72 cursor-pointer border-2 border-primary ring-2 ring-primary/20"
        } else {
            "card bg-base-100 shadow-md w-72 cursor-pointer border-2 border-transparent hover:border-base-300"
        }
    };

    view! {
        <div class="carousel-item">
            <div class=card_class on:click=move |_| on_select.run(city.clone())>
                <div class=format!("p-4 rounded-t-2xl text-white {}", category.color())>
                    <h3 class="text-lg font-semibold">{station.city.clone()}</h3>
                    <p class="text-sm opacity-90">{station.station_name.clone()}</p>
                </div>
                <div class="card-body p-4">
                    <div class="flex justify-between items-center mb-3">
                        <div>
                            <p class="text-3xl font-bold">{station.aqi}</p>
                            <p class="text-sm text-base-content/70">"AQI"</p>
                        </div>
                        <span class=format!("badge border-none text-white {}", category.color())>
                            {category.level()}
                        </span>
                    </div>
                    <div class="space-y-2 text-sm">
                        <div class="flex justify-between">
                            <span class="text-base-content/70">"PM2.5:"</span>
                            <span class="font-semibold">{format!("{} μg/m³", station.pm25)}</span>
                        </div>
                        <div class="flex justify-between">
                            <span class="text-base-content/70">"Updated:"</span>
                            <span class="text-xs text-base-content/60">
                                {station.last_updated.format_time()}
                            </span>
                        </div>
                    </div>
                    <button class=move || {
                        if is_selected.get() { "btn btn-primary btn-sm w-full mt-4" } else { "btn btn-ghost btn-sm w-full mt-4" }
                    }>
                        {move || if is_selected.get() { "✓ Viewing Forecast" } else { "View Forecast" }}
                    </button>
                </div>
            </div>
        </div>
    }
}
