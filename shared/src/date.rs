//! 时间类型模块
//!
//! 后端混用两种时间格式：
//! - 带时区的 RFC 3339 字符串
//! - 不带时区的 ISO 8601 字符串（按 UTC 处理）
//!
//! `ApiTimestamp` 统一解析两者，并提供界面所需的格式化方法。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// 可传输的 UTC 时间戳
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiTimestamp(DateTime<Utc>);

impl ApiTimestamp {
    #[inline]
    pub const fn new(inner: DateTime<Utc>) -> Self {
        Self(inner)
    }

    /// 从字符串解析
    ///
    /// 返回 None 如果两种格式都无法解析
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    #[inline]
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    #[inline]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// `HH:MM`
    pub fn format_time(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// `YYYY-MM-DD`
    pub fn format_date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    pub fn format_date_time(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M").to_string()
    }
}

impl From<DateTime<Utc>> for ApiTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for ApiTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for ApiTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for ApiTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}
