use super::*;
use crate::error::ClientErrorStatus;
use crate::request::{HttpMethod, MockHttpClient};
use crate::session::Session;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

const BASE: &str = "http://api.test";

// =========================================================
// 辅助函数
// =========================================================

fn create_client() -> ApiClient<MockHttpClient> {
    ApiClient::new(format!("{}/", BASE), MockHttpClient::new(), SessionContext::in_memory())
}

fn sign_in(client: &ApiClient<MockHttpClient>, token: &str) {
    client
        .session()
        .begin(&Session {
            token: token.to_string(),
            user: None,
        })
        .unwrap();
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

// =========================================================
// 认证头
// =========================================================

#[tokio::test]
async fn test_request_without_token_has_no_auth_header() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &url("/api/alerts/"),
        200,
        json!({ "alerts": [] }),
    );

    client.alerts().await.unwrap();

    let req = client.http().last_request().unwrap();
    assert!(!req.headers.contains_key("Authorization"));
}

#[tokio::test]
async fn test_login_then_requests_carry_token_automatically() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Post,
        &url("/api/auth/login"),
        200,
        json!({ "access_token": "jwt-123", "token_type": "bearer" }),
    );
    client.http().mock_response(
        HttpMethod::Get,
        &url("/api/aqi/current"),
        200,
        json!({ "data": [], "source": "sample_data" }),
    );

    let session = client.login("ali@example.pk", "s3cret").await.unwrap();
    assert_eq!(session.token, "jwt-123");
    assert_eq!(session.email(), Some("ali@example.pk"));

    // 登录请求本身为表单编码
    let login_req = client.http().last_request().unwrap();
    assert_eq!(
        login_req.headers.get("Content-Type").map(String::as_str),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        login_req.body.as_deref(),
        Some("username=ali%40example.pk&password=s3cret")
    );

    client.current_aqi(&Default::default()).await.unwrap();
    let req = client.http().last_request().unwrap();
    assert_eq!(
        req.headers.get("Authorization").map(String::as_str),
        Some("Bearer jwt-123")
    );
}

// =========================================================
// 401 集中处理
// =========================================================

#[tokio::test]
async fn test_unauthorized_clears_session_and_fires_hook() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let client = create_client().with_unauthorized_hook(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    sign_in(&client, "expired");
    client.http().mock_response(
        HttpMethod::Get,
        &url("/api/users/profile"),
        401,
        json!({ "detail": "Could not validate credentials" }),
    );

    let err = client.profile().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Could not validate credentials");
    assert!(client.session().load().is_none());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejection_keeps_session() {
    let client = create_client();
    sign_in(&client, "tok");
    client.http().mock_response(
        HttpMethod::Get,
        &url("/api/forecast/?city=Lahore&hours=48"),
        500,
        json!({ "detail": "Forecast generation failed: boom" }),
    );

    let err = client.forecast("Lahore", 48).await.unwrap_err();

    assert_eq!(err.status, ClientErrorStatus::Rejected);
    assert_eq!(err.http_status, Some(500));
    assert_eq!(err.message(), "Forecast generation failed: boom");
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_network_error_is_propagated() {
    let client = create_client();
    client
        .http()
        .mock_network_error(HttpMethod::Get, &url("/api/aqi/current"));

    let err = client.current_aqi(&Default::default()).await.unwrap_err();
    assert_eq!(err.status, ClientErrorStatus::Network);
    assert_eq!(err.spans().last().map(|s| s.operation.as_str()), Some("aqi.current"));
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &url("/api/aqi/stations"),
        200,
        json!({ "unexpected": true }),
    );

    let err = client.stations().await.unwrap_err();
    assert_eq!(err.status, ClientErrorStatus::Serialization);
}

// =========================================================
// 服务映射
// =========================================================

#[tokio::test]
async fn test_forecast_query_string() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &url("/api/forecast/?city=Islamabad&hours=48"),
        200,
        json!({
            "city": "Islamabad",
            "forecast_hours": 48,
            "generated_at": "2024-11-02T10:00:00",
            "forecast": [
                { "timestamp": "2024-11-02T11:00:00", "pm25": 35.2,
                  "confidence_lower": 28.2, "confidence_upper": 42.2 }
            ]
        }),
    );

    let series = client.forecast("Islamabad", 48).await.unwrap();
    assert_eq!(series.city, "Islamabad");
    assert_eq!(series.forecast.len(), 1);
}

#[tokio::test]
async fn test_unread_alerts_filters_read() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &url("/api/alerts/"),
        200,
        json!({ "alerts": [
            { "id": "a1", "message": "Lahore 180", "is_read": false, "created_at": "2024-11-02T10:00:00" },
            { "id": "a2", "message": "Karachi 160", "is_read": true, "created_at": "2024-11-02T09:00:00" }
        ]}),
    );

    let unread = client.unread_alerts().await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].id, "a1");
}

#[tokio::test]
async fn test_alert_mutations_hit_expected_endpoints() {
    let client = create_client();
    let ok = json!({ "message": "ok" });
    client
        .http()
        .mock_response(HttpMethod::Post, &url("/api/alerts/mark-read/a1"), 200, ok.clone());
    client
        .http()
        .mock_response(HttpMethod::Post, &url("/api/alerts/mark-all-read"), 200, ok.clone());
    client
        .http()
        .mock_response(HttpMethod::Post, &url("/api/alerts/threshold"), 200, ok);

    client.mark_read("a1").await.unwrap();
    client.mark_all_read().await.unwrap();
    client.set_threshold(150).await.unwrap();

    let requests = client.http().requests.borrow();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].url, url("/api/alerts/mark-read/a1"));
    assert!(requests[0].body.is_none());
    assert_eq!(requests[2].body.as_deref(), Some(r#"{"threshold":150}"#));
}

#[tokio::test]
async fn test_historical_uses_days_query() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &url("/api/aqi/historical/sample-2?days=3"),
        200,
        json!({ "station_id": "sample-2", "data": [
            { "timestamp": "2024-11-01T00:00:00", "pm25": 180.0, "aqi": 230 }
        ]}),
    );

    let history = client.historical("sample-2", 3).await.unwrap();
    assert_eq!(history.data[0].aqi, 230);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let client = create_client();
    sign_in(&client, "tok");
    client.logout();
    assert!(!client.session().is_authenticated());
}
