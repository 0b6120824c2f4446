//! 提醒横幅、阈值设置与桌面通知

use crate::api::ApiClient;
use crate::request::HttpClient;
use crate::schedule::{Sleeper, TaskHandle, delayed};
use crate::state::StateCell;
use cleanair_shared::Alert;
use futures::Future;
use std::time::Duration;

pub const NOTIFICATION_TITLE: &str = "CleanAirPK Alert";
pub const TEST_NOTIFICATION_TITLE: &str = "CleanAirPK Test";
pub const TEST_NOTIFICATION_BODY: &str =
    "🧪 Test Alert: Your notification system is working correctly!";

/// 横幅中直接展示的条数
pub const PREVIEW_LIMIT: usize = 3;

// =========================================================
// 横幅
// =========================================================

/// 横幅持有的未读提醒列表
///
/// 未读数始终等于列表长度。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFeed {
    unread: Vec<Alert>,
    dismissed: bool,
}

impl AlertFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用一次轮询结果替换本地列表
    ///
    /// 轮询会重新显示被手动关闭的横幅；返回最新的一条未读作为通知候选。
    pub fn apply_poll(&mut self, alerts: Vec<Alert>) -> Option<Alert> {
        self.unread = alerts.into_iter().filter(|a| !a.is_read).collect();
        self.dismissed = false;
        self.latest().cloned()
    }

    pub fn latest(&self) -> Option<&Alert> {
        self.unread.iter().max_by_key(|a| a.created_at)
    }

    /// 移除一条，返回是否确实移除
    pub fn mark_read(&mut self, id: &str) -> bool {
        let before = self.unread.len();
        self.unread.retain(|a| a.id != id);
        self.unread.len() != before
    }

    pub fn mark_all_read(&mut self) {
        self.unread.clear();
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    pub fn is_visible(&self) -> bool {
        !self.dismissed && !self.unread.is_empty()
    }

    pub fn unread(&self) -> &[Alert] {
        &self.unread
    }

    pub fn unread_count(&self) -> usize {
        self.unread.len()
    }

    pub fn preview(&self) -> &[Alert] {
        &self.unread[..self.unread.len().min(PREVIEW_LIMIT)]
    }

    /// 预览之外还剩几条
    pub fn overflow(&self) -> usize {
        self.unread.len().saturating_sub(PREVIEW_LIMIT)
    }

    /// 多于一条时才提供"全部已读"
    pub fn offers_mark_all(&self) -> bool {
        self.unread.len() > 1
    }
}

/// 个人页中的完整提醒列表（含已读）
///
/// 标记已读后条目从列表中移除，与横幅行为一致。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertHistory {
    alerts: Vec<Alert>,
}

impl AlertHistory {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn mark_read(&mut self, id: &str) {
        self.alerts.retain(|a| a.id != id);
    }

    pub fn mark_all_read(&mut self) {
        self.alerts.clear();
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.is_read).count()
    }
}

// =========================================================
// 阈值
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdSetting {
    value: u32,
}

impl ThresholdSetting {
    pub const MIN: u32 = 50;
    pub const MAX: u32 = 300;
    pub const STEP: u32 = 10;
    pub const DEFAULT: u32 = 150;

    pub fn new(value: u32) -> Self {
        let mut setting = Self::default();
        setting.set(value);
        setting
    }

    /// 钳制到范围内并按步长取整
    pub fn set(&mut self, value: u32) {
        let clamped = value.clamp(Self::MIN, Self::MAX);
        let steps = (clamped - Self::MIN + Self::STEP / 2) / Self::STEP;
        self.value = (Self::MIN + steps * Self::STEP).min(Self::MAX);
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

impl Default for ThresholdSetting {
    fn default() -> Self {
        Self {
            value: Self::DEFAULT,
        }
    }
}

// =========================================================
// 通知
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    Granted,
    Denied,
    Default,
    /// 当前环境没有通知 API
    Unsupported,
}

impl NotificationPermission {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationPermission::Granted => "granted",
            NotificationPermission::Denied => "denied",
            NotificationPermission::Default => "default",
            NotificationPermission::Unsupported => "unsupported",
        }
    }
}

pub trait Notifier {
    fn permission(&self) -> NotificationPermission;
    /// 返回通知是否成功弹出
    fn show(&self, title: &str, body: &str) -> bool;
}

/// 仅在已授权时弹出，不主动申请权限
pub fn notify_latest<N: Notifier + ?Sized>(notifier: &N, alert: &Alert) -> bool {
    if notifier.permission() != NotificationPermission::Granted {
        return false;
    }
    notifier.show(NOTIFICATION_TITLE, &alert.message)
}

pub fn send_test_notification<N: Notifier + ?Sized>(notifier: &N) -> bool {
    if notifier.permission() != NotificationPermission::Granted {
        return false;
    }
    notifier.show(TEST_NOTIFICATION_TITLE, TEST_NOTIFICATION_BODY)
}

// =========================================================
// 异步流程
// =========================================================

/// 一次轮询；失败只记录日志
pub async fn poll_alerts<C, S, N>(api: &ApiClient<C>, state: &S, notifier: &N)
where
    C: HttpClient,
    S: StateCell<AlertFeed>,
    N: Notifier + ?Sized,
{
    let alerts = match api.unread_alerts().await {
        Ok(alerts) => alerts,
        Err(e) => {
            log::error!("Error fetching alerts: {}", e);
            return;
        }
    };
    if let Some(latest) = state.update_with(|feed| feed.apply_poll(alerts)).flatten() {
        notify_latest(notifier, &latest);
    }
}

/// 标记单条已读，服务端确认后才从本地移除
pub async fn dismiss_one<C, S>(api: &ApiClient<C>, state: &S, id: &str)
where
    C: HttpClient,
    S: StateCell<AlertFeed>,
{
    match api.mark_read(id).await {
        Ok(_) => {
            state.update_with(|feed| feed.mark_read(id));
        }
        Err(e) => log::error!("Error marking alert as read: {}", e),
    }
}

pub async fn dismiss_all<C, S>(api: &ApiClient<C>, state: &S)
where
    C: HttpClient,
    S: StateCell<AlertFeed>,
{
    match api.mark_all_read().await {
        Ok(_) => {
            state.update_with(AlertFeed::mark_all_read);
        }
        Err(e) => log::error!("Error marking all alerts as read: {}", e),
    }
}

/// 阈值保存成功后延迟触发服务端检查
///
/// 返回的句柄需由设置视图持有，视图销毁时检查随之取消。
pub fn schedule_check<C, S>(
    api: ApiClient<C>,
    sleeper: S,
    delay: Duration,
) -> (impl Future<Output = ()>, TaskHandle)
where
    C: HttpClient,
    S: Sleeper,
{
    delayed(sleeper, delay, async move {
        match api.check_alerts().await {
            Ok(resp) => log::info!("alert check: {}", resp.message),
            Err(e) => log::error!("Error checking alerts: {}", e),
        }
    })
}

#[cfg(test)]
mod tests;
