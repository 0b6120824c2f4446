use std::fmt;

use serde_json::Value;

// =========================================================
// 错误状态枚举
// =========================================================

/// 客户端错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorStatus {
    /// 网络/传输失败（请求未得到任何 HTTP 响应）
    Network,
    /// 401: 会话失效，已被集中处理（清除会话并跳转登录）
    Unauthorized,
    /// 服务端拒绝（校验失败、业务规则、5xx 等非 2xx 响应）
    Rejected,
    /// 响应或本地存储内容无法解析
    Serialization,
    /// 本地持久化存储不可用
    Storage,
}

impl ClientErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientErrorStatus::Network => "NETWORK_ERROR",
            ClientErrorStatus::Unauthorized => "UNAUTHORIZED",
            ClientErrorStatus::Rejected => "REQUEST_REJECTED",
            ClientErrorStatus::Serialization => "PARSE_ERROR",
            ClientErrorStatus::Storage => "STORAGE_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "aqi.current", "alerts.mark_read"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端统一错误
///
/// - status: 错误分类
/// - message: 面向用户/日志的消息
/// - http_status: 服务端响应码（如有）
/// - source: 原始错误（可选）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct ClientError {
    pub status: ClientErrorStatus,
    pub message: String,
    pub http_status: Option<u16>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ClientError {
    pub fn new(status: ClientErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            http_status: None,
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Network, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        let mut err = Self::new(ClientErrorStatus::Unauthorized, message);
        err.http_status = Some(401);
        err
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Serialization, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Storage, message)
    }

    /// 由非 2xx 响应构造；优先使用后端 `detail` 字段作为消息
    pub fn rejected(http_status: u16, body: &str) -> Self {
        let message = extract_detail(body)
            .unwrap_or_else(|| format!("request failed with status {}", http_status));
        let mut err = Self::new(ClientErrorStatus::Rejected, message);
        err.http_status = Some(http_status);
        err
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == ClientErrorStatus::Unauthorized
    }
}

/// FastAPI 风格的错误体：`{"detail": "..."}` 或 `{"detail": [{"msg": "..."}]}`
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::serialization(e.to_string()).with_source(e)
    }
}

impl From<serde_urlencoded::ser::Error> for ClientError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        ClientError::serialization(e.to_string()).with_source(e)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_uses_string_detail() {
        let err = ClientError::rejected(400, r#"{"detail":"Hours cannot exceed 168 (1 week)"}"#);
        assert_eq!(err.status, ClientErrorStatus::Rejected);
        assert_eq!(err.http_status, Some(400));
        assert_eq!(err.message(), "Hours cannot exceed 168 (1 week)");
    }

    #[test]
    fn test_rejected_joins_validation_messages() {
        let body = r#"{"detail":[{"loc":["query","city"],"msg":"field required"},{"msg":"bad hours"}]}"#;
        let err = ClientError::rejected(422, body);
        assert_eq!(err.message(), "field required; bad hours");
    }

    #[test]
    fn test_rejected_falls_back_to_status() {
        let err = ClientError::rejected(502, "<html>Bad Gateway</html>");
        assert_eq!(err.message(), "request failed with status 502");
    }

    #[test]
    fn test_display_includes_trace() {
        let err = ClientError::network("connection refused")
            .in_op("forecast.get")
            .in_op_with("dashboard.select", "Lahore");
        assert_eq!(
            err.to_string(),
            "[NETWORK_ERROR] connection refused | trace: forecast.get -> dashboard.select(Lahore)"
        );
    }
}
