use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

pub use date::ApiTimestamp;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_USER_KEY: &str = "user";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// 代表"未选择具体城市"的哨兵值
pub const ALL_CITIES: &str = "All Cities";
/// 站点列表中存在时优先选中的城市
pub const DEFAULT_CITY: &str = "Islamabad";

pub fn is_all_cities(city: &str) -> bool {
    city == ALL_CITIES
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 单个监测站的当前读数，每次拉取整体替换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReading {
    pub station_id: String,
    pub city: String,
    pub station_name: String,
    pub aqi: u32,
    pub pm25: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub last_updated: ApiTimestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentAqiResponse {
    pub data: Vec<StationReading>,
    #[serde(default)]
    pub source: Option<String>,
}

/// 站点元数据（不含读数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationsResponse {
    pub stations: Vec<Station>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub timestamp: ApiTimestamp,
    pub pm25: f64,
    pub aqi: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalResponse {
    pub station_id: String,
    pub data: Vec<HistoricalPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: ApiTimestamp,
    pub pm25: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
}

/// 某城市的 PM2.5 预测序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub city: String,
    pub forecast_hours: u32,
    pub generated_at: ApiTimestamp,
    pub forecast: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// 用户档案；风险字段由服务端计算
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub has_chronic_conditions: bool,
    pub is_smoker: bool,
    pub daily_outdoor_hours: Option<u32>,
    pub risk_score: Option<i32>,
    pub risk_category: Option<String>,
    pub advice: Option<String>,
    pub alert_threshold: Option<u32>,
}

impl UserProfile {
    pub fn risk_assessment(&self) -> Option<RiskAssessment> {
        Some(RiskAssessment {
            score: self.risk_score?,
            category: self.risk_category.clone()?,
            advice: self.advice.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserInfo,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: i32,
    pub category: String,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub risk_assessment: RiskAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub message: String,
    #[serde(default)]
    pub aqi_level: Option<u32>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: ApiTimestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckAlertsResponse {
    pub alerts_created: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub user: Option<UserInfo>,
}
