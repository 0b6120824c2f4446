use super::*;
use crate::error::{ClientError, ClientErrorStatus};
use crate::request::{HttpMethod, MockHttpClient};
use crate::session::SessionContext;
use cleanair_shared::ApiTimestamp;
use serde_json::json;
use std::cell::RefCell;

const BASE: &str = "http://api.test";
const HORIZON: u32 = 48;

// =========================================================
// 辅助函数
// =========================================================

fn reading(city: &str, aqi: u32) -> StationReading {
    StationReading {
        station_id: format!("{}-1", city.to_lowercase()),
        city: city.to_string(),
        station_name: format!("{} Central", city),
        aqi,
        pm25: aqi as f64 / 3.0,
        latitude: 31.5,
        longitude: 74.3,
        last_updated: ApiTimestamp::parse("2024-11-02T09:00:00").unwrap(),
    }
}

fn series(city: &str, pm25: f64) -> ForecastSeries {
    ForecastSeries {
        city: city.to_string(),
        forecast_hours: 1,
        generated_at: ApiTimestamp::parse("2024-11-02T09:00:00").unwrap(),
        forecast: vec![cleanair_shared::ForecastPoint {
            timestamp: ApiTimestamp::parse("2024-11-02T10:00:00").unwrap(),
            pm25,
            confidence_lower: pm25 - 5.0,
            confidence_upper: pm25 + 5.0,
        }],
    }
}

fn readings_json(cities: &[(&str, u32)]) -> serde_json::Value {
    let data: Vec<_> = cities
        .iter()
        .map(|(city, aqi)| serde_json::to_value(reading(city, *aqi)).unwrap())
        .collect();
    json!({ "data": data, "source": "sample_data" })
}

fn series_json(city: &str, pm25: f64) -> serde_json::Value {
    serde_json::to_value(series(city, pm25)).unwrap()
}

fn forecast_url(city: &str) -> String {
    format!("{}/api/forecast/?city={}&hours={}", BASE, city, HORIZON)
}

fn create_client() -> ApiClient<MockHttpClient> {
    ApiClient::new(BASE, MockHttpClient::new(), SessionContext::in_memory())
}

fn loaded_state(cities: &[(&str, u32)]) -> DashboardState {
    let mut state = DashboardState::new();
    state.begin_station_load();
    let stations = cities.iter().map(|(c, a)| reading(c, *a)).collect();
    // 不关心默认选择触发的预测
    let _ = state.finish_station_load(Ok(stations));
    state
}

// =========================================================
// 默认城市
// =========================================================

#[test]
fn test_default_city_prefers_islamabad_case_insensitive() {
    let stations = vec![reading("Lahore", 150), reading("ISLAMABAD", 70)];
    assert_eq!(default_city(&stations).as_deref(), Some("ISLAMABAD"));
}

#[test]
fn test_default_city_falls_back_to_first_station() {
    let stations = vec![reading("Karachi", 90), reading("Lahore", 150)];
    assert_eq!(default_city(&stations).as_deref(), Some("Karachi"));
    assert_eq!(default_city(&[]), None);
}

// =========================================================
// 站点流程
// =========================================================

#[test]
fn test_initial_state_is_loading_with_sentinel_selected() {
    let state = DashboardState::new();
    assert!(state.is_loading_stations());
    assert_eq!(state.selected_city(), ALL_CITIES);
    assert!(!state.forecast_visible());
    assert!(state.health_tip().is_none());
}

#[test]
fn test_first_load_selects_default_city_and_issues_ticket() {
    let mut state = DashboardState::new();
    let ticket = state
        .finish_station_load(Ok(vec![reading("Lahore", 150), reading("Islamabad", 70)]))
        .unwrap();

    assert_eq!(ticket.city, "Islamabad");
    assert_eq!(state.selected_city(), "Islamabad");
    assert!(state.is_forecast_loading());
    assert!(!state.is_loading_stations());
}

#[test]
fn test_reload_keeps_still_valid_selection() {
    let mut state = loaded_state(&[("Islamabad", 70), ("Lahore", 150)]);
    state.select_city("Lahore");

    state.begin_station_load();
    let ticket = state.finish_station_load(Ok(vec![reading("Lahore", 160), reading("Islamabad", 75)]));

    assert!(ticket.is_none());
    assert_eq!(state.selected_city(), "Lahore");
    assert_eq!(state.selected_station().unwrap().aqi, 160);
}

#[test]
fn test_reload_keeps_explicit_sentinel_selection() {
    let mut state = loaded_state(&[("Islamabad", 70), ("Lahore", 150)]);
    assert_eq!(state.selected_city(), "Islamabad");
    assert!(state.select_city(ALL_CITIES).is_none());

    state.begin_station_load();
    let ticket = state.finish_station_load(Ok(vec![reading("Islamabad", 75), reading("Lahore", 160)]));

    assert!(ticket.is_none());
    assert_eq!(state.selected_city(), ALL_CITIES);
    assert!(!state.forecast_visible());
}

#[test]
fn test_empty_station_list_stays_on_sentinel() {
    let mut state = DashboardState::new();
    assert!(state.finish_station_load(Ok(vec![])).is_none());
    assert_eq!(state.selected_city(), ALL_CITIES);
    assert_eq!(state.city_options(), vec![ALL_CITIES.to_string()]);
}

#[test]
fn test_failed_load_keeps_previous_stations() {
    let mut state = loaded_state(&[("Islamabad", 70)]);
    state.begin_station_load();
    let ticket = state.finish_station_load(Err(ClientError::network("offline")));

    assert!(ticket.is_none());
    assert_eq!(state.error(), Some(STATION_LOAD_ERROR));
    assert_eq!(state.stations().len(), 1);
    assert!(!state.is_loading_stations());

    // 重新加载时清除错误
    state.begin_station_load();
    assert!(state.error().is_none());
}

// =========================================================
// 选择
// =========================================================

#[test]
fn test_city_options_are_sentinel_plus_distinct_cities() {
    let state = loaded_state(&[("Islamabad", 70), ("Lahore", 150), ("Lahore", 180)]);
    assert_eq!(
        state.city_options(),
        vec![ALL_CITIES.to_string(), "Islamabad".to_string(), "Lahore".to_string()]
    );
}

#[test]
fn test_select_unknown_city_is_rejected() {
    let mut state = loaded_state(&[("Islamabad", 70)]);
    assert!(state.select_city("Atlantis").is_none());
    assert_eq!(state.selected_city(), "Islamabad");
}

#[test]
fn test_select_same_city_is_noop() {
    let mut state = loaded_state(&[("Islamabad", 70)]);
    assert!(state.select_city("Islamabad").is_none());
}

#[test]
fn test_select_sentinel_clears_forecast_and_invalidates_in_flight() {
    let mut state = loaded_state(&[("Islamabad", 70), ("Lahore", 150)]);
    let ticket = state.select_city("Lahore").unwrap();

    assert!(state.select_city(ALL_CITIES).is_none());
    assert!(!state.forecast_visible());
    assert!(!state.is_forecast_loading());

    // 在途请求完成后不得复活预测区
    assert!(!state.finish_forecast(&ticket, Ok(series("Lahore", 80.0))));
    assert!(state.forecast().is_none());
}

#[test]
fn test_stale_forecast_is_discarded() {
    let mut state = loaded_state(&[("Islamabad", 70), ("Lahore", 150), ("Karachi", 95)]);
    let lahore = state.select_city("Lahore").unwrap();
    let karachi = state.select_city("Karachi").unwrap();
    assert!(karachi.seq > lahore.seq);

    // Karachi 先返回，Lahore 的迟到响应被丢弃
    assert!(state.finish_forecast(&karachi, Ok(series("Karachi", 40.0))));
    assert!(!state.finish_forecast(&lahore, Ok(series("Lahore", 80.0))));

    assert_eq!(state.forecast().unwrap().city, "Karachi");
    assert!(!state.is_forecast_loading());
}

#[test]
fn test_failed_forecast_keeps_previous_series() {
    let mut state = loaded_state(&[("Islamabad", 70), ("Lahore", 150)]);
    let first = state.select_city("Lahore").unwrap();
    state.finish_forecast(&first, Ok(series("Lahore", 80.0)));

    state.select_city("Islamabad");
    let second = state.select_city("Lahore").unwrap();
    assert!(state.finish_forecast(&second, Err(ClientError::network("offline"))));

    assert!(!state.is_forecast_loading());
    assert_eq!(state.forecast().unwrap().forecast[0].pm25, 80.0);
}

#[test]
fn test_forecast_heading_follows_displayed_series() {
    let mut state = loaded_state(&[("Islamabad", 70), ("Lahore", 150)]);
    let first = state.select_city("Lahore").unwrap();
    assert_eq!(state.forecast_heading(), Some("Lahore"));
    state.finish_forecast(&first, Ok(series("Lahore", 80.0)));

    let second = state.select_city("Islamabad").unwrap();
    assert_eq!(state.forecast_heading(), Some("Islamabad"));
    state.finish_forecast(&second, Err(ClientError::network("offline")));

    // 失败后仍展示 Lahore 的序列，标题跟随序列
    assert_eq!(state.selected_city(), "Islamabad");
    assert_eq!(state.forecast().unwrap().city, "Lahore");
    assert_eq!(state.forecast_heading(), Some("Lahore"));

    state.select_city(ALL_CITIES);
    assert_eq!(state.forecast_heading(), None);
}

#[test]
fn test_health_tip_for_selected_city() {
    let mut state = loaded_state(&[("Islamabad", 70), ("Lahore", 180)]);
    state.select_city("Lahore");
    let tip = state.health_tip().unwrap();
    assert!(tip.starts_with("Lahore: "));
    assert_eq!(
        tip.trim_start_matches("Lahore: "),
        aqi::AqiCategory::from_aqi(180).health_advice()
    );
}

// =========================================================
// 异步流程
// =========================================================

#[tokio::test]
async fn test_refresh_loads_stations_then_default_forecast() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &format!("{}/api/aqi/current", BASE),
        200,
        readings_json(&[("Lahore", 150), ("Islamabad", 70)]),
    );
    client.http().mock_response(
        HttpMethod::Get,
        &forecast_url("Islamabad"),
        200,
        series_json("Islamabad", 30.0),
    );

    let state = RefCell::new(DashboardState::new());
    refresh_stations(&client, &state, HORIZON).await;

    let state = state.borrow();
    assert_eq!(state.stations().len(), 2);
    assert_eq!(state.selected_city(), "Islamabad");
    assert_eq!(state.forecast().unwrap().city, "Islamabad");
    assert_eq!(client.http().request_count(), 2);
}

#[tokio::test]
async fn test_refresh_failure_sets_error() {
    let client = create_client();
    client
        .http()
        .mock_network_error(HttpMethod::Get, &format!("{}/api/aqi/current", BASE));

    let state = RefCell::new(DashboardState::new());
    refresh_stations(&client, &state, HORIZON).await;

    let state = state.borrow();
    assert_eq!(state.error(), Some(STATION_LOAD_ERROR));
    assert!(state.stations().is_empty());
    assert!(!state.is_loading_stations());
}

#[tokio::test]
async fn test_change_city_fetches_forecast_for_new_city() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &forecast_url("Lahore"),
        200,
        series_json("Lahore", 90.0),
    );

    let state = RefCell::new(loaded_state(&[("Islamabad", 70), ("Lahore", 150)]));
    change_city(&client, &state, "Lahore", HORIZON).await;

    let req = client.http().last_request().unwrap();
    assert_eq!(req.url, forecast_url("Lahore"));
    assert_eq!(state.borrow().forecast().unwrap().city, "Lahore");
}

#[tokio::test]
async fn test_change_to_sentinel_sends_no_request() {
    let client = create_client();
    let state = RefCell::new(loaded_state(&[("Islamabad", 70)]));

    change_city(&client, &state, ALL_CITIES, HORIZON).await;

    assert_eq!(client.http().request_count(), 0);
    assert!(!state.borrow().forecast_visible());
}

#[tokio::test]
async fn test_refresh_after_choosing_all_cities_fetches_no_forecast() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &format!("{}/api/aqi/current", BASE),
        200,
        readings_json(&[("Lahore", 150), ("Islamabad", 70)]),
    );
    client.http().mock_response(
        HttpMethod::Get,
        &forecast_url("Islamabad"),
        200,
        series_json("Islamabad", 30.0),
    );

    let state = RefCell::new(DashboardState::new());
    refresh_stations(&client, &state, HORIZON).await;
    change_city(&client, &state, ALL_CITIES, HORIZON).await;
    assert_eq!(client.http().request_count(), 2);

    // 周期刷新只重新拉取站点
    refresh_stations(&client, &state, HORIZON).await;

    assert_eq!(client.http().request_count(), 3);
    assert_eq!(
        client.http().last_request().unwrap().url,
        format!("{}/api/aqi/current", BASE)
    );
    assert_eq!(state.borrow().selected_city(), ALL_CITIES);
    assert!(!state.borrow().forecast_visible());
}

#[tokio::test]
async fn test_unauthorized_forecast_is_reported_as_unauthorized() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &forecast_url("Lahore"),
        401,
        json!({ "detail": "Could not validate credentials" }),
    );

    let err = client.forecast("Lahore", HORIZON).await.unwrap_err();
    assert_eq!(err.status, ClientErrorStatus::Unauthorized);
}
