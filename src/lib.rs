//! CleanAir 客户端核心
//!
//! 与平台无关：HTTP、存储、计时与通知都通过 trait 注入，
//! 浏览器实现位于 `frontend` crate，测试中使用 mock。

use std::time::Duration;

pub mod alerts;
pub mod api;
pub mod aqi;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod map;
pub mod profile;
pub mod request;
pub mod schedule;
pub mod service;
pub mod session;
pub mod state;

pub use api::ApiClient;
pub use error::{ClientError, ClientErrorStatus, ClientResult};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use session::{Session, SessionContext, SessionStore};
pub use state::StateCell;

// =========================================================
// 运行时配置 (Client Configuration)
// =========================================================

/// 默认值，构建环境中没有对应变量时使用
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
const DEFAULT_POLL_SECS: u64 = 5 * 60;
const DEFAULT_CHECK_DELAY_MS: u64 = 1000;

pub const VAR_API_BASE: &str = "CLEANAIR_API_BASE";
pub const VAR_FORECAST_HOURS: &str = "CLEANAIR_FORECAST_HOURS";
pub const VAR_ALERT_POLL_SECS: &str = "CLEANAIR_ALERT_POLL_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    /// 预测时长（小时）
    pub forecast_hours: u32,
    pub alert_poll_interval: Duration,
    /// 保存阈值后触发服务端检查的延迟
    pub alert_check_delay: Duration,
    pub default_city: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            forecast_hours: cleanair_shared::protocol::DEFAULT_FORECAST_HOURS,
            alert_poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            alert_check_delay: Duration::from_millis(DEFAULT_CHECK_DELAY_MS),
            default_city: cleanair_shared::DEFAULT_CITY.to_string(),
        }
    }
}

impl ClientConfig {
    /// 从变量表读取配置，缺失或无法解析的项使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_base: lookup(VAR_API_BASE)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base),

            forecast_hours: lookup(VAR_FORECAST_HOURS)
                .and_then(|v| v.parse().ok())
                .map(|h: u32| h.clamp(1, cleanair_shared::protocol::MAX_FORECAST_HOURS))
                .unwrap_or(defaults.forecast_hours),

            alert_poll_interval: lookup(VAR_ALERT_POLL_SECS)
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.alert_poll_interval),

            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.forecast_hours, 48);
        assert_eq!(config.alert_poll_interval, Duration::from_secs(300));
        assert_eq!(config.alert_check_delay, Duration::from_secs(1));
        assert_eq!(config.default_city, "Islamabad");
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (VAR_API_BASE, "https://api.cleanair.pk"),
            (VAR_FORECAST_HOURS, "24"),
            (VAR_ALERT_POLL_SECS, "60"),
        ]));
        assert_eq!(config.api_base, "https://api.cleanair.pk");
        assert_eq!(config.forecast_hours, 24);
        assert_eq!(config.alert_poll_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (VAR_API_BASE, "  "),
            (VAR_FORECAST_HOURS, "lots"),
            (VAR_ALERT_POLL_SECS, "0"),
        ]));
        assert_eq!(config, ClientConfig::default());

        let capped = ClientConfig::from_lookup(lookup_from(&[(VAR_FORECAST_HOURS, "999")]));
        assert_eq!(capped.forecast_hours, 168);
    }
}
