use crate::{
    AlertsResponse, CheckAlertsResponse, CurrentAqiResponse, ForecastSeries, HistoricalResponse,
    MessageResponse, ProfileResponse, StationsResponse, TokenResponse, UpdateProfileResponse,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// How the request value travels in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// No body; fields (if any) go to the path or query string.
    None,
    Json,
    /// `application/x-www-form-urlencoded`, used by the login endpoint.
    Form,
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    const ENCODING: BodyEncoding = BodyEncoding::None;

    /// The URL path, including any path parameters.
    fn path(&self) -> String;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Percent-encodes one path segment. `/`, `#`, `?` and spaces never leak into the URL structure.
fn path_segment(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub const DEFAULT_HISTORY_DAYS: u32 = 7;
pub const DEFAULT_FORECAST_HOURS: u32 = 48;
/// The backend rejects longer horizons.
pub const MAX_FORECAST_HOURS: u32 = 168;

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENCODING: BodyEncoding = BodyEncoding::Json;

    fn path(&self) -> String {
        "/api/auth/register".to_string()
    }
}

/// Registration acknowledgement. Every field is optional so that any JSON object is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterResponse {
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Login credentials, sent as form fields. The backend names the email field `username`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: email.into(),
            password: password.into(),
        }
    }
}

impl ApiRequest for LoginRequest {
    type Response = TokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENCODING: BodyEncoding = BodyEncoding::Form;

    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }
}

// =========================================================
// Users
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProfileRequest;

impl ApiRequest for GetProfileRequest {
    type Response = ProfileResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/users/profile".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub age: u32,
    pub has_chronic_conditions: bool,
    pub is_smoker: bool,
    pub daily_outdoor_hours: u32,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = UpdateProfileResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENCODING: BodyEncoding = BodyEncoding::Json;

    fn path(&self) -> String {
        "/api/users/profile".to_string()
    }
}

// =========================================================
// AQI
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentAqiRequest {
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ApiRequest for CurrentAqiRequest {
    type Response = CurrentAqiResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/aqi/current".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(lat) = self.latitude {
            query.push(("latitude", lat.to_string()));
        }
        if let Some(lon) = self.longitude {
            query.push(("longitude", lon.to_string()));
        }
        if let Some(city) = &self.city {
            query.push(("city", city.clone()));
        }
        query
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationsRequest;

impl ApiRequest for StationsRequest {
    type Response = StationsResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/aqi/stations".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalAqiRequest {
    pub station_id: String,
    pub days: u32,
}

impl HistoricalAqiRequest {
    pub fn new(station_id: impl Into<String>) -> Self {
        Self {
            station_id: station_id.into(),
            days: DEFAULT_HISTORY_DAYS,
        }
    }
}

impl ApiRequest for HistoricalAqiRequest {
    type Response = HistoricalResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/aqi/historical/{}", path_segment(&self.station_id))
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("days", self.days.to_string())]
    }
}

// =========================================================
// Forecast
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub city: String,
    pub hours: u32,
}

impl ForecastRequest {
    pub fn new(city: impl Into<String>, hours: u32) -> Self {
        Self {
            city: city.into(),
            hours: hours.min(MAX_FORECAST_HOURS),
        }
    }
}

impl ApiRequest for ForecastRequest {
    type Response = ForecastSeries;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/forecast/".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("city", self.city.clone()), ("hours", self.hours.to_string())]
    }
}

// =========================================================
// Alerts
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAlertsRequest;

impl ApiRequest for ListAlertsRequest {
    type Response = AlertsResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/alerts/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetThresholdRequest {
    pub threshold: u32,
}

impl ApiRequest for SetThresholdRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const ENCODING: BodyEncoding = BodyEncoding::Json;

    fn path(&self) -> String {
        "/api/alerts/threshold".to_string()
    }
}

/// Ask the server to evaluate current AQI against the stored threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAlertsRequest;

impl ApiRequest for CheckAlertsRequest {
    type Response = CheckAlertsResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/alerts/check".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAlertReadRequest {
    pub id: String,
}

impl ApiRequest for MarkAlertReadRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/alerts/mark-read/{}", path_segment(&self.id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllAlertsReadRequest;

impl ApiRequest for MarkAllAlertsReadRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/alerts/mark-all-read".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_hours_capped() {
        let req = ForecastRequest::new("Lahore", 500);
        assert_eq!(req.hours, MAX_FORECAST_HOURS);
        assert_eq!(
            req.query(),
            vec![("city", "Lahore".to_string()), ("hours", "168".to_string())]
        );
    }

    #[test]
    fn test_path_parameters() {
        let read = MarkAlertReadRequest { id: "a-1".to_string() };
        assert_eq!(read.path(), "/api/alerts/mark-read/a-1");

        let history = HistoricalAqiRequest::new("sample-2");
        assert_eq!(history.path(), "/api/aqi/historical/sample-2");
        assert_eq!(history.query(), vec![("days", "7".to_string())]);
    }

    #[test]
    fn test_path_parameters_are_percent_encoded() {
        let history = HistoricalAqiRequest::new("Lahore Town/2#a");
        assert_eq!(history.path(), "/api/aqi/historical/Lahore%20Town%2F2%23a");

        let read = MarkAlertReadRequest { id: "a?b+c".to_string() };
        assert_eq!(read.path(), "/api/alerts/mark-read/a%3Fb%2Bc");
    }

    #[test]
    fn test_current_aqi_query_skips_missing() {
        assert!(CurrentAqiRequest::default().query().is_empty());
        let req = CurrentAqiRequest {
            city: Some("Karachi".to_string()),
            ..Default::default()
        };
        assert_eq!(req.query(), vec![("city", "Karachi".to_string())]);
    }

    #[test]
    fn test_login_is_form_encoded() {
        assert_eq!(LoginRequest::ENCODING, BodyEncoding::Form);
        let req = LoginRequest::new("user@example.pk", "pw");
        assert_eq!(req.username, "user@example.pk");
    }
}
