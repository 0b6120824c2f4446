use cleanair::forecast::{ChartFrame, ChartGeometry, ForecastStats, svg_points};
use cleanair_shared::ForecastSeries;
use leptos::prelude::*;

const LINE_COLOR: &str = "#8884d8";
const BAND_COLOR: &str = "#82ca9d";

fn num(v: f64) -> String {
    format!("{:.1}", v)
}

#[component]
pub fn ForecastChart(series: ForecastSeries, city: String) -> impl IntoView {
    let Some(stats) = ForecastStats::from_series(&series.forecast) else {
        return view! {
            <div class="card bg-base-100 shadow p-6 text-center">
                <p class="text-base-content/70">"No forecast points returned for this city."</p>
            </div>
        }
        .into_any();
    };

    let frame = ChartFrame::default();
    let geometry = ChartGeometry::build(&series.forecast, frame);
    let plot_bottom = frame.height - frame.bottom;
    let plot_right = frame.width - frame.right;
    let axis_mid = frame.top + (plot_bottom - frame.top) / 2.0;

    view! {
        <div class="card bg-base-100 shadow p-6">
            <div class="flex justify-between items-center mb-4">
                <h3 class="text-xl font-semibold">
                    {format!("PM2.5 Forecast for {} - Next {} hours", city, series.forecast_hours)}
                </h3>
                <div class="text-sm text-base-content/60">
                    "Generated: " {series.generated_at.format_time()}
                </div>
            </div>

            <div class="grid grid-cols-3 gap-4 mb-6">
                <div class="text-center p-3 bg-blue-50 rounded-lg">
                    <div class="text-2xl font-bold text-blue-600">{format!("{:.1}", stats.average)}</div>
                    <div class="text-sm text-blue-800">"Average PM2.5"</div>
                </div>
                <div class="text-center p-3 bg-red-50 rounded-lg">
                    <div class="text-2xl font-bold text-red-600">{stats.peak}</div>
                    <div class="text-sm text-red-800">"Peak PM2.5"</div>
                </div>
                <div class="text-center p-3 bg-green-50 rounded-lg">
                    <div class="text-2xl font-bold text-green-600">{stats.lowest}</div>
                    <div class="text-sm text-green-800">"Lowest PM2.5"</div>
                </div>
            </div>

            <svg
                viewBox=format!("0 0 {} {}", frame.width, frame.height)
                class="w-full h-[300px]"
                preserveAspectRatio="none"
                role="img"
            >
                // 网格与 Y 轴
                {geometry
                    .y_ticks
                    .iter()
                    .map(|tick| view! {
                        <line
                            x1=num(frame.left) x2=num(plot_right) y1=num(tick.position) y2=num(tick.position)
                            stroke="#e5e7eb" stroke-dasharray="3 3"
                        />
                        <text x=num(frame.left - 6.0) y=num(tick.position + 4.0) text-anchor="end" font-size="11" fill="#6b7280">
                            {tick.label.clone()}
                        </text>
                    })
                    .collect_view()}
                // X 轴刻度
                {geometry
                    .x_ticks
                    .iter()
                    .map(|tick| view! {
                        <text x=num(tick.position) y=num(plot_bottom + 18.0) text-anchor="middle" font-size="11" fill="#6b7280">
                            {tick.label.clone()}
                        </text>
                    })
                    .collect_view()}
                <text
                    x="14" y=num(axis_mid)
                    transform=format!("rotate(-90 14 {})", num(axis_mid))
                    text-anchor="middle" font-size="11" fill="#6b7280"
                >
                    "PM2.5 (μg/m³)"
                </text>
                <polygon points=svg_points(&geometry.band) fill=BAND_COLOR fill-opacity="0.3" stroke=BAND_COLOR />
                <polyline points=svg_points(&geometry.line) fill="none" stroke=LINE_COLOR stroke-width="2" />
                {geometry
                    .line
                    .iter()
                    .zip(series.forecast.iter())
                    .map(|(pt, raw)| view! {
                        <circle cx=num(pt.x) cy=num(pt.y) r="3" fill=LINE_COLOR>
                            <title>
                                {format!("{}: {} μg/m³", raw.timestamp.format_date_time(), raw.pm25)}
                            </title>
                        </circle>
                    })
                    .collect_view()}
            </svg>

            <div class="flex gap-6 justify-center text-sm mt-2">
                <span class="flex items-center gap-2">
                    <span class="inline-block w-4 h-1" style=format!("background:{}", LINE_COLOR)></span>
                    "PM2.5 Forecast"
                </span>
                <span class="flex items-center gap-2">
                    <span class="inline-block w-4 h-3 opacity-50" style=format!("background:{}", BAND_COLOR)></span>
                    "Confidence Range"
                </span>
            </div>

            <div class="mt-4 p-4 bg-base-200 rounded-lg">
                <h4 class="font-semibold mb-2">"Forecast Analysis"</h4>
                <p class="text-sm text-base-content/70">{stats.analysis()}</p>
            </div>
        </div>
    }
    .into_any()
}
