use cleanair::aqi;
use cleanair::map::{ATTRIBUTION, LatLng, Viewport};
use cleanair_shared::StationReading;
use leptos::prelude::*;

// 视口逻辑尺寸，容器按比例缩放
const MAP_WIDTH: f64 = 960.0;
const MAP_HEIGHT: f64 = 384.0;

fn px(v: f64) -> String {
    format!("{:.1}px", v)
}

#[component]
pub fn MapView(
    #[prop(into)] stations: Signal<Vec<StationReading>>,
    #[prop(into)] selected: Signal<String>,
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
    let viewport = RwSignal::new(Viewport::default());
    let (popup, set_popup) = signal(Option::<String>::None);

    // 外部选中城市变化时重新定位，站点刷新不覆盖用户的缩放
    Effect::new(move |_| {
        let city = selected.get();
        stations.with(|list| {
            viewport.maybe_update(|vp| vp.focus(&city, list))
        });
    });

    let is_empty = move || stations.with(Vec::is_empty);

    move || {
        if loading.get() && is_empty() {
            return view! {
                <div class="card bg-base-100 shadow p-6 h-96 flex items-center justify-center">
                    <div class="animate-pulse">
                        <div class="h-6 bg-base-300 rounded w-48 mx-auto mb-4"></div>
                        <div class="h-4 bg-base-300 rounded w-32 mx-auto"></div>
                    </div>
                </div>
            }
            .into_any();
        }
        if is_empty() {
            return view! {
                <div class="card bg-base-100 shadow p-6 h-96 flex items-center justify-center">
                    <p class="text-base-content/70">"No station data available for the map"</p>
                </div>
            }
            .into_any();
        }

        view! {
            <div class="card bg-base-100 shadow-lg overflow-hidden">
                <div class="p-4 border-b border-base-200 flex justify-between items-center">
                    <div>
                        <h3 class="text-xl font-semibold">"Pakistan Air Quality Map"</h3>
                        <p class="text-sm text-base-content/70">"Click on markers to view station details"</p>
                    </div>
                    <div class="join">
                        <button class="btn btn-sm join-item" on:click=move |_| viewport.update(Viewport::zoom_out)>"−"</button>
                        <button class="btn btn-sm join-item" on:click=move |_| viewport.update(Viewport::zoom_in)>"+"</button>
                    </div>
                </div>

                <div
                    class="relative overflow-hidden bg-base-200 w-full"
                    style=format!("aspect-ratio: {} / {};", MAP_WIDTH, MAP_HEIGHT)
                >
                    <div
                        class="absolute top-0 left-0 origin-top-left"
                        style=format!("width:{};height:{};", px(MAP_WIDTH), px(MAP_HEIGHT))
                    >
                        {move || {
                            viewport
                                .get()
                                .tiles(MAP_WIDTH, MAP_HEIGHT)
                                .into_iter()
                                .map(|tile| view! {
                                    <img
                                        src=tile.url()
                                        alt=""
                                        draggable="false"
                                        class="absolute select-none"
                                        style=format!(
                                            "left:{};top:{};width:256px;height:256px;",
                                            px(tile.left),
                                            px(tile.top),
                                        )
                                    />
                                })
                                .collect_view()
                        }}
                        <For
                            each=move || stations.get()
                            key=|s| (s.station_id.clone(), s.aqi)
                            children=move |station| view! {
                                <Marker
                                    station=station
                                    viewport=viewport
                                    popup=popup
                                    set_popup=set_popup
                                    on_select=on_select
                                />
                            }
                        />
                    </div>
                    <div class="absolute bottom-0 right-0 bg-base-100/80 text-[10px] px-1">
                        {ATTRIBUTION}
                    </div>
                </div>
            </div>
        }
        .into_any()
    }
}

#[component]
fn Marker(
    station: StationReading,
    viewport: RwSignal<Viewport>,
    popup: ReadSignal<Option<String>>,
    set_popup: WriteSignal<Option<String>>,
    on_select: Callback<String>,
) -> impl IntoView {
    let category = aqi::category(station.aqi);
    let position = LatLng::of(&station);
    let StationReading {
        station_id: id,
        city,
        station_name,
        aqi,
        pm25,
        last_updated,
        ..
    } = station;
    let aqi_label = format!("{} - {}", aqi, category.level());
    let aqi_class = format!("font-bold {}", category.text_color());
    let pm25_label = format!("{} μg/m³", pm25);
    let updated = last_updated.format_time();
    let title = city.clone();

    let is_open = {
        let id = id.clone();
        move || popup.with(|p| p.as_deref() == Some(id.as_str()))
    };

    let placement = move || {
        let (x, y) = viewport.get().project(position, MAP_WIDTH, MAP_HEIGHT);
        format!("left:{};top:{};", px(x), px(y))
    };

    let toggle = {
        let city = city.clone();
        move |_| {
            set_popup.update(|p| {
                *p = if p.as_deref() == Some(id.as_str()) { None } else { Some(id.clone()) };
            });
            on_select.run(city.clone());
        }
    };

    view! {
        <div class="absolute -translate-x-1/2 -translate-y-1/2" style=placement>
            <button
                class="w-4 h-4 rounded-full border-2 border-white shadow"
                style=format!("background:{};", category.marker_color())
                title=title
                on:click=toggle
            ></button>
            <Show when=is_open>
                <div class="absolute z-10 left-1/2 -translate-x-1/2 bottom-6 card bg-base-100 shadow-xl p-3 min-w-[200px]">
                    <h4 class="font-bold text-lg">{city.clone()}</h4>
                    <p class="text-sm text-base-content/70 mb-2">{station_name.clone()}</p>
                    <div class="space-y-1 text-sm">
                        <div class="flex justify-between">
                            <span>"AQI:"</span>
                            <span class=aqi_class.clone()>{aqi_label.clone()}</span>
                        </div>
                        <div class="flex justify-between">
                            <span>"PM2.5:"</span>
                            <span class="font-semibold">{pm25_label.clone()}</span>
                        </div>
                        <div class="flex justify-between">
                            <span>"Last Updated:"</span>
                            <span class="text-xs">{updated.clone()}</span>
                        </div>
                    </div>
                    <button class="btn btn-primary btn-xs w-full mt-3" on:click={
                        let city = city.clone();
                        move |_| on_select.run(city.clone())
                    }>
                        "View Forecast"
                    </button>
                </div>
            </Show>
        </div>
    }
}
