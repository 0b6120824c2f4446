use crate::api::{use_api, use_config};
use crate::auth::{logout, use_auth};
use crate::components::alert_banner::AlertBanner;
use crate::components::alert_settings::AlertSettings;
use crate::components::city_cards::CityCards;
use crate::components::city_selector::CitySelector;
use crate::components::forecast_chart::ForecastChart;
use crate::components::icons::{LogOut, RefreshCw, UserIcon, Wind};
use crate::components::map_view::MapView;
use crate::web::SignalCell;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use cleanair::aqi::AqiCategory;
use cleanair::dashboard::{self, DashboardState, DashboardView};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let config = use_config();
    let horizon = config.forecast_hours;
    let email = auth.email();

    let state = SignalCell::new(DashboardState::new());

    // 派生只读视图，避免整页随任意字段变化重渲染
    let stations = Memo::new(move |_| state.0.with(|s| s.stations().to_vec()));
    let loading = Memo::new(move |_| state.0.with(DashboardState::is_loading_stations));
    let selected = Memo::new(move |_| state.0.with(|s| s.selected_city().to_string()));
    let options = Memo::new(move |_| state.0.with(DashboardState::city_options));
    let forecast = Memo::new(move |_| state.0.with(|s| s.forecast().cloned()));
    let forecast_loading = Memo::new(move |_| state.0.with(DashboardState::is_forecast_loading));
    let forecast_visible = Memo::new(move |_| state.0.with(DashboardState::forecast_visible));
    let heading = Memo::new(move |_| {
        state.0.with(|s| s.forecast_heading().unwrap_or_default().to_string())
    });
    let view_mode = Memo::new(move |_| state.0.with(|s| s.view));

    let refresh = {
        let api = api.clone();
        move || {
            let api = api.clone();
            spawn_local(async move { dashboard::refresh_stations(&api, &state, horizon).await });
        }
    };
    // 挂载时加载
    refresh();

    let on_city = {
        let api = api.clone();
        Callback::new(move |city: String| {
            let api = api.clone();
            spawn_local(async move { dashboard::change_city(&api, &state, &city, horizon).await });
        })
    };

    let on_logout = {
        let api = api.clone();
        move |_| logout(&auth, &api)
    };

    let refresh_button = {
        let refresh = refresh.clone();
        move |class: &'static str| {
            let refresh = refresh.clone();
            view! {
                <button class=class disabled=move || loading.get() on:click=move |_| refresh()>
                    <RefreshCw attr:class=move || {
                        if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" }
                    } />
                    {move || if loading.get() { "Loading..." } else { "Refresh" }}
                </button>
            }
        }
    };

    let tab_class = move |tab: DashboardView| {
        if view_mode.get() == tab { "tab tab-active" } else { "tab" }
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="container mx-auto px-4 py-8">
                <div class="flex flex-col lg:flex-row justify-between items-start lg:items-center mb-8 gap-4">
                    <div>
                        <h1 class="text-3xl font-bold flex items-center gap-2">
                            <Wind attr:class="h-8 w-8 text-primary" /> "Pakistan Air Quality"
                        </h1>
                        <p class="text-base-content/70">"Welcome, " {move || email.get()}</p>
                    </div>
                    <div class="flex flex-col sm:flex-row gap-4 items-start sm:items-end">
                        <CitySelector options=options selected=selected on_change=on_city />
                        <div class="flex gap-2">
                            {refresh_button("btn btn-primary gap-2")}
                            <Link to=AppRoute::Profile class="btn btn-success gap-2">
                                <UserIcon attr:class="h-4 w-4" /> "Profile"
                            </Link>
                            <button class="btn btn-neutral gap-2" on:click=on_logout>
                                <LogOut attr:class="h-4 w-4" /> "Logout"
                            </button>
                        </div>
                    </div>
                </div>

                <AlertBanner />

                {move || state.0.with(|s| s.error().map(str::to_string)).map(|err| view! {
                    <div class="alert alert-error mb-6"><span>{err}</span></div>
                })}

                <div role="tablist" class="tabs tabs-bordered mb-6">
                    <a
                        role="tab"
                        class=move || tab_class(DashboardView::Cards)
                        on:click=move |_| state.0.update(|s| s.view = DashboardView::Cards)
                    >
                        "📊 City Cards"
                    </a>
                    <a
                        role="tab"
                        class=move || tab_class(DashboardView::Map)
                        on:click=move |_| state.0.update(|s| s.view = DashboardView::Map)
                    >
                        "🗺️ Map View"
                    </a>
                </div>

                {move || match view_mode.get() {
                    DashboardView::Cards => view! {
                        <div class="mb-8 card bg-base-100 shadow-lg p-6">
                            <CityCards stations=stations selected=selected loading=loading on_select=on_city />
                        </div>
                    }
                    .into_any(),
                    DashboardView::Map => view! {
                        <div class="mb-8">
                            <MapView stations=stations selected=selected loading=loading on_select=on_city />
                        </div>
                    }
                    .into_any(),
                }}

                <Show when=move || forecast_visible.get()>
                    <div class="mb-8">
                        <div class="flex justify-between items-center mb-4">
                            <h2 class="text-2xl font-semibold">"PM2.5 Forecast for " {move || heading.get()}</h2>
                            <span class="text-sm text-base-content/60">
                                {move || match forecast.get() {
                                    Some(series) => format!("Updated: {}", series.generated_at.format_time()),
                                    None => "Loading...".to_string(),
                                }}
                            </span>
                        </div>
                        {move || {
                            if forecast_loading.get() {
                                return view! {
                                    <div class="card bg-base-100 shadow p-6 text-center">
                                        <p class="text-base-content/70">
                                            {format!("Loading {}...", selected.get_untracked())}
                                        </p>
                                    </div>
                                }
                                .into_any();
                            }
                            match forecast.get() {
                                Some(series) => {
                                    let city = series.city.clone();
                                    view! { <ForecastChart series=series city=city /> }.into_any()
                                }
                                None => view! {
                                    <div class="card bg-base-100 shadow p-6 text-center">
                                        <p class="text-base-content/70">"Select a city to view its forecast"</p>
                                    </div>
                                }
                                .into_any(),
                            }
                        }}
                    </div>
                </Show>

                <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-8">
                    <div class="card bg-base-100 shadow p-6">
                        <h3 class="text-xl font-semibold mb-4">"AQI Scale Guide"</h3>
                        <div class="space-y-2">
                            {AqiCategory::ALL
                                .iter()
                                .map(|cat| view! {
                                    <div class="flex items-start justify-between p-3 rounded-lg border border-base-200">
                                        <div class="flex items-start gap-3">
                                            <div class=format!("w-4 h-4 {} rounded mt-1 flex-shrink-0", cat.color())></div>
                                            <div>
                                                <div class="font-medium">{cat.level()}</div>
                                                <div class="text-sm text-base-content/70">{cat.guidance()}</div>
                                            </div>
                                        </div>
                                        <span class="font-mono text-sm bg-base-200 px-2 py-1 rounded">
                                            {cat.range_label()}
                                        </span>
                                    </div>
                                })
                                .collect_view()}
                        </div>
                    </div>

                    <div class="card bg-base-100 shadow p-6">
                        <h3 class="text-xl font-semibold mb-4">"Quick Actions"</h3>
                        <div class="space-y-4">
                            <Link to=AppRoute::Profile class="btn btn-primary w-full">"Update Profile"</Link>
                            {refresh_button("btn btn-success w-full gap-2")}
                            <div class="bg-info/10 border border-info/30 rounded-lg p-4">
                                <h4 class="font-semibold text-info mb-2">"💡 Health Tips"</h4>
                                <p class="text-sm">
                                    {move || {
                                        state
                                            .0
                                            .with(DashboardState::health_tip)
                                            .unwrap_or_else(|| "Select a city to see health tips".to_string())
                                    }}
                                </p>
                            </div>
                        </div>
                    </div>

                    <div class="card bg-base-100 shadow p-6">
                        <AlertSettings />
                    </div>
                </div>
            </div>
        </div>
    }
}
