use super::*;
use crate::request::{HttpMethod, MockHttpClient};
use crate::session::SessionContext;
use async_trait::async_trait;
use cleanair_shared::ApiTimestamp;
use serde_json::json;
use std::cell::RefCell;

const BASE: &str = "http://api.test";

// =========================================================
// 辅助函数
// =========================================================

fn alert(id: &str, minute: u32, is_read: bool) -> Alert {
    Alert {
        id: id.to_string(),
        message: format!("AQI high ({})", id),
        aqi_level: Some(180),
        is_read,
        created_at: ApiTimestamp::parse(&format!("2024-11-02T09:{:02}:00", minute)).unwrap(),
    }
}

fn alerts_json(alerts: &[Alert]) -> serde_json::Value {
    json!({ "alerts": serde_json::to_value(alerts).unwrap() })
}

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn create_client() -> ApiClient<MockHttpClient> {
    ApiClient::new(BASE, MockHttpClient::new(), SessionContext::in_memory())
}

fn feed_with(ids: &[&str]) -> AlertFeed {
    let mut feed = AlertFeed::new();
    feed.apply_poll(
        ids.iter()
            .enumerate()
            .map(|(i, id)| alert(id, i as u32, false))
            .collect(),
    );
    feed
}

struct RecordingNotifier {
    permission: NotificationPermission,
    shown: RefCell<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn new(permission: NotificationPermission) -> Self {
        Self {
            permission,
            shown: RefCell::new(Vec::new()),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn show(&self, title: &str, body: &str) -> bool {
        self.shown
            .borrow_mut()
            .push((title.to_string(), body.to_string()));
        true
    }
}

struct TokioSleeper;

#[async_trait(?Send)]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// =========================================================
// AlertFeed
// =========================================================

#[test]
fn test_apply_poll_keeps_unread_and_returns_newest() {
    let mut feed = AlertFeed::new();
    let latest = feed
        .apply_poll(vec![alert("a", 5, false), alert("b", 30, false), alert("c", 59, true)])
        .unwrap();

    assert_eq!(latest.id, "b");
    assert_eq!(feed.unread_count(), 2);
    assert!(feed.is_visible());
}

#[test]
fn test_empty_poll_hides_banner() {
    let mut feed = feed_with(&["a"]);
    assert!(feed.apply_poll(vec![]).is_none());
    assert!(!feed.is_visible());
    assert_eq!(feed.unread_count(), 0);
}

#[test]
fn test_mark_read_is_idempotent() {
    let mut feed = feed_with(&["a", "b", "c"]);

    assert!(feed.mark_read("b"));
    assert_eq!(feed.unread_count(), 2);
    assert!(feed.unread().iter().all(|a| a.id != "b"));

    assert!(!feed.mark_read("b"));
    assert_eq!(feed.unread_count(), 2);
}

#[test]
fn test_mark_all_read_empties_feed() {
    let mut feed = feed_with(&["a", "b"]);
    feed.mark_all_read();
    assert_eq!(feed.unread_count(), 0);
    assert!(feed.unread().is_empty());
    assert!(!feed.is_visible());
}

#[test]
fn test_dismiss_hides_until_next_poll() {
    let mut feed = feed_with(&["a"]);
    feed.dismiss();
    assert!(!feed.is_visible());
    assert_eq!(feed.unread_count(), 1);

    feed.apply_poll(vec![alert("a", 0, false)]);
    assert!(feed.is_visible());
}

#[test]
fn test_preview_and_overflow() {
    let feed = feed_with(&["a", "b", "c", "d", "e"]);
    assert_eq!(feed.preview().len(), PREVIEW_LIMIT);
    assert_eq!(feed.overflow(), 2);
    assert!(feed.offers_mark_all());

    let single = feed_with(&["a"]);
    assert_eq!(single.preview().len(), 1);
    assert_eq!(single.overflow(), 0);
    assert!(!single.offers_mark_all());
}

#[test]
fn test_history_removes_marked_alerts() {
    let mut history = AlertHistory::new(vec![alert("a", 0, false), alert("b", 1, false), alert("c", 2, true)]);
    assert_eq!(history.unread_count(), 2);

    history.mark_read("a");
    assert_eq!(history.unread_count(), 1);
    assert_eq!(history.alerts().len(), 2);

    history.mark_all_read();
    assert!(history.is_empty());
}

// =========================================================
// 阈值
// =========================================================

#[test]
fn test_threshold_defaults_to_150() {
    assert_eq!(ThresholdSetting::default().value(), 150);
}

#[test]
fn test_threshold_clamps_and_quantizes() {
    assert_eq!(ThresholdSetting::new(10).value(), 50);
    assert_eq!(ThresholdSetting::new(500).value(), 300);
    assert_eq!(ThresholdSetting::new(154).value(), 150);
    assert_eq!(ThresholdSetting::new(155).value(), 160);
    assert_eq!(ThresholdSetting::new(299).value(), 300);
    assert_eq!(ThresholdSetting::new(200).value(), 200);
}

// =========================================================
// 通知
// =========================================================

#[test]
fn test_notify_only_when_granted() {
    let latest = alert("a", 0, false);

    let denied = RecordingNotifier::new(NotificationPermission::Default);
    assert!(!notify_latest(&denied, &latest));
    assert!(denied.shown.borrow().is_empty());

    let granted = RecordingNotifier::new(NotificationPermission::Granted);
    assert!(notify_latest(&granted, &latest));
    assert_eq!(
        granted.shown.borrow()[0],
        (NOTIFICATION_TITLE.to_string(), latest.message.clone())
    );
}

#[test]
fn test_test_notification_text() {
    let notifier = RecordingNotifier::new(NotificationPermission::Granted);
    assert!(send_test_notification(&notifier));
    assert_eq!(notifier.shown.borrow()[0].0, TEST_NOTIFICATION_TITLE);
    assert_eq!(notifier.shown.borrow()[0].1, TEST_NOTIFICATION_BODY);

    let unsupported = RecordingNotifier::new(NotificationPermission::Unsupported);
    assert!(!send_test_notification(&unsupported));
}

// =========================================================
// 异步流程
// =========================================================

#[tokio::test]
async fn test_poll_updates_feed_and_notifies_once() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Get,
        &url("/api/alerts/"),
        200,
        alerts_json(&[alert("a", 1, false), alert("b", 2, false), alert("old", 0, true)]),
    );
    let notifier = RecordingNotifier::new(NotificationPermission::Granted);
    let state = RefCell::new(AlertFeed::new());

    poll_alerts(&client, &state, &notifier).await;

    assert_eq!(state.borrow().unread_count(), 2);
    assert_eq!(notifier.shown.borrow().len(), 1);
    assert_eq!(notifier.shown.borrow()[0].1, "AQI high (b)");
}

#[tokio::test]
async fn test_failed_poll_leaves_feed_untouched() {
    let client = create_client();
    client
        .http()
        .mock_network_error(HttpMethod::Get, &url("/api/alerts/"));
    let notifier = RecordingNotifier::new(NotificationPermission::Granted);
    let state = RefCell::new(feed_with(&["a"]));

    poll_alerts(&client, &state, &notifier).await;

    assert_eq!(state.borrow().unread_count(), 1);
    assert!(notifier.shown.borrow().is_empty());
}

#[tokio::test]
async fn test_dismiss_one_removes_after_server_confirms() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Post,
        &url("/api/alerts/mark-read/a"),
        200,
        json!({ "message": "Alert marked as read" }),
    );
    let state = RefCell::new(feed_with(&["a", "b"]));

    dismiss_one(&client, &state, "a").await;

    assert_eq!(state.borrow().unread_count(), 1);
    assert_eq!(state.borrow().unread()[0].id, "b");
}

#[tokio::test]
async fn test_dismiss_one_failure_keeps_alert() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Post,
        &url("/api/alerts/mark-read/a"),
        500,
        json!({ "detail": "boom" }),
    );
    let state = RefCell::new(feed_with(&["a", "b"]));

    dismiss_one(&client, &state, "a").await;

    assert_eq!(state.borrow().unread_count(), 2);
}

#[tokio::test]
async fn test_dismiss_all_clears_feed() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Post,
        &url("/api/alerts/mark-all-read"),
        200,
        json!({ "message": "All alerts marked as read" }),
    );
    let state = RefCell::new(feed_with(&["a", "b", "c"]));

    dismiss_all(&client, &state).await;

    assert_eq!(state.borrow().unread_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_check_fires_after_delay() {
    let client = create_client();
    client.http().mock_response(
        HttpMethod::Post,
        &url("/api/alerts/check"),
        200,
        json!({ "alerts_created": 1, "message": "Alert check complete" }),
    );

    let (fut, _handle) = schedule_check(client.clone(), TokioSleeper, Duration::from_secs(1));
    fut.await;

    let req = client.http().last_request().unwrap();
    assert_eq!(req.url, url("/api/alerts/check"));
    assert_eq!(req.method, HttpMethod::Post);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_check_cancelled_on_teardown() {
    let client = create_client();
    let (fut, handle) = schedule_check(client.clone(), TokioSleeper, Duration::from_secs(1));

    drop(handle);
    fut.await;

    assert_eq!(client.http().request_count(), 0);
}
