//! 控制面板状态机
//!
//! 两条独立的流程：
//! - 站点：loading -> ready
//! - 预测：每次选择具体城市时 none -> loading -> ready
//!
//! 每次预测请求携带单调递增的序号，迟到的旧响应不会覆盖新选择的状态。

use crate::api::ApiClient;
use crate::aqi;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::state::StateCell;
use cleanair_shared::protocol::CurrentAqiRequest;
use cleanair_shared::{ALL_CITIES, DEFAULT_CITY, ForecastSeries, StationReading, is_all_cities};

/// 一次预测请求的凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastTicket {
    pub seq: u64,
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardView {
    #[default]
    Cards,
    Map,
}

pub const STATION_LOAD_ERROR: &str = "Failed to load AQI data";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    stations: Vec<StationReading>,
    stations_loaded: bool,
    loading_stations: bool,
    error: Option<String>,
    selected_city: String,
    forecast: Option<ForecastSeries>,
    forecast_loading: bool,
    forecast_seq: u64,
    pub view: DashboardView,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

/// 默认选中城市：站点中有 Islamabad（忽略大小写）则选它，否则选第一个站点的城市
pub fn default_city(stations: &[StationReading]) -> Option<String> {
    stations
        .iter()
        .find(|s| s.city.eq_ignore_ascii_case(DEFAULT_CITY))
        .or_else(|| stations.first())
        .map(|s| s.city.clone())
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            stations: Vec::new(),
            stations_loaded: false,
            loading_stations: true,
            error: None,
            selected_city: ALL_CITIES.to_string(),
            forecast: None,
            forecast_loading: false,
            forecast_seq: 0,
            view: DashboardView::default(),
        }
    }

    // --- 站点流程 ---

    pub fn begin_station_load(&mut self) {
        self.loading_stations = true;
        self.error = None;
    }

    /// 写回站点结果
    ///
    /// 成功时若当前选择仍有效则保留，否则切换到默认城市；
    /// 返回需要发起的预测请求（如有）。失败时保留已有站点数据。
    pub fn finish_station_load(
        &mut self,
        result: ClientResult<Vec<StationReading>>,
    ) -> Option<ForecastTicket> {
        self.loading_stations = false;
        match result {
            Ok(stations) => {
                let first_load = !self.stations_loaded;
                self.stations = stations;
                self.stations_loaded = true;
                // 默认城市只在首次加载时套用，之后用户选的“全部城市”保持不变
                if !first_load && is_all_cities(&self.selected_city) {
                    return None;
                }
                if self.has_city(&self.selected_city) {
                    return None;
                }
                match default_city(&self.stations) {
                    Some(city) => self.select_city(&city),
                    None => self.select_city(ALL_CITIES),
                }
            }
            Err(_) => {
                self.error = Some(STATION_LOAD_ERROR.to_string());
                None
            }
        }
    }

    // --- 选择与预测流程 ---

    fn has_city(&self, city: &str) -> bool {
        self.stations.iter().any(|s| s.city == city)
    }

    /// 切换选中城市
    ///
    /// - 哨兵值：清除预测并使在途请求失效
    /// - 不在站点列表中的城市：拒绝
    /// - 与当前相同：无操作
    pub fn select_city(&mut self, city: &str) -> Option<ForecastTicket> {
        if is_all_cities(city) {
            self.selected_city = ALL_CITIES.to_string();
            self.forecast = None;
            self.forecast_loading = false;
            self.forecast_seq += 1;
            return None;
        }
        if !self.has_city(city) {
            log::warn!("ignoring selection of unknown city {}", city);
            return None;
        }
        if self.selected_city == city {
            return None;
        }
        self.selected_city = city.to_string();
        self.forecast_loading = true;
        self.forecast_seq += 1;
        Some(ForecastTicket {
            seq: self.forecast_seq,
            city: city.to_string(),
        })
    }

    /// 写回预测结果，返回是否被采纳
    ///
    /// 序号过期的结果被丢弃；失败时保留上一次的预测。
    pub fn finish_forecast(
        &mut self,
        ticket: &ForecastTicket,
        result: ClientResult<ForecastSeries>,
    ) -> bool {
        if ticket.seq != self.forecast_seq {
            return false;
        }
        self.forecast_loading = false;
        if let Ok(series) = result {
            self.forecast = Some(series);
        }
        true
    }

    // --- 读取 ---

    pub fn stations(&self) -> &[StationReading] {
        &self.stations
    }

    pub fn is_loading_stations(&self) -> bool {
        self.loading_stations
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_city(&self) -> &str {
        &self.selected_city
    }

    pub fn selected_station(&self) -> Option<&StationReading> {
        self.stations.iter().find(|s| s.city == self.selected_city)
    }

    /// 仅在选中具体城市时展示预测区
    pub fn forecast_visible(&self) -> bool {
        !is_all_cities(&self.selected_city)
    }

    pub fn forecast(&self) -> Option<&ForecastSeries> {
        if self.forecast_visible() {
            self.forecast.as_ref()
        } else {
            None
        }
    }

    pub fn is_forecast_loading(&self) -> bool {
        self.forecast_loading
    }

    /// 预测区标题所属城市：加载中为选中城市，否则为当前展示序列的城市
    pub fn forecast_heading(&self) -> Option<&str> {
        if !self.forecast_visible() {
            return None;
        }
        if self.forecast_loading {
            return Some(self.selected_city.as_str());
        }
        Some(
            self.forecast
                .as_ref()
                .map_or(self.selected_city.as_str(), |series| series.city.as_str()),
        )
    }

    /// 下拉框选项：哨兵 + 站点城市（去重，保持顺序）
    pub fn city_options(&self) -> Vec<String> {
        let mut options = vec![ALL_CITIES.to_string()];
        for station in &self.stations {
            if !options.contains(&station.city) {
                options.push(station.city.clone());
            }
        }
        options
    }

    pub fn health_tip(&self) -> Option<String> {
        if !self.forecast_visible() {
            return None;
        }
        let stations = self.stations_loaded.then_some(self.stations.as_slice());
        Some(format!(
            "{}: {}",
            self.selected_city,
            aqi::health_advice_for(&self.selected_city, stations)
        ))
    }
}

// =========================================================
// 异步流程
// =========================================================

/// 拉取站点并在需要时接着拉取默认城市的预测
pub async fn refresh_stations<C, S>(api: &ApiClient<C>, state: &S, horizon_hours: u32)
where
    C: HttpClient,
    S: StateCell<DashboardState>,
{
    if state.update_with(|s| s.begin_station_load()).is_none() {
        return;
    }

    let result = api
        .current_aqi(&CurrentAqiRequest::default())
        .await
        .map(|r| r.data);
    if let Err(e) = &result {
        log::error!("AQI data error: {}", e);
    }

    let ticket = state
        .update_with(|s| s.finish_station_load(result))
        .flatten();
    if let Some(ticket) = ticket {
        load_forecast(api, state, ticket, horizon_hours).await;
    }
}

/// 用户切换城市
pub async fn change_city<C, S>(api: &ApiClient<C>, state: &S, city: &str, horizon_hours: u32)
where
    C: HttpClient,
    S: StateCell<DashboardState>,
{
    let ticket = state.update_with(|s| s.select_city(city)).flatten();
    if let Some(ticket) = ticket {
        load_forecast(api, state, ticket, horizon_hours).await;
    }
}

pub async fn load_forecast<C, S>(
    api: &ApiClient<C>,
    state: &S,
    ticket: ForecastTicket,
    horizon_hours: u32,
) where
    C: HttpClient,
    S: StateCell<DashboardState>,
{
    let result = api.forecast(&ticket.city, horizon_hours).await;
    if let Err(e) = &result {
        log::error!("Forecast data error: {}", e);
    }
    if state.update_with(|s| s.finish_forecast(&ticket, result)) == Some(false) {
        log::debug!("discarding stale forecast for {}", ticket.city);
    }
}

#[cfg(test)]
mod tests;
