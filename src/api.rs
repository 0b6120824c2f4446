//! API 客户端
//!
//! 所有出站请求的唯一出口：
//! - 存在 token 时自动附加 `Authorization: Bearer <token>`
//! - 401 响应集中处理：清除会话并触发过期钩子（前端据此跳转登录页）
//! - 其余错误原样返回给调用方，由调用方记录日志或展示

use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpRequest};
use crate::session::SessionContext;
use cleanair_shared::HEADER_AUTHORIZATION;
use cleanair_shared::protocol::{ApiRequest, BodyEncoding};
use std::sync::Arc;

/// 会话过期回调
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

pub struct ApiClient<C> {
    base_url: String,
    http: Arc<C>,
    session: SessionContext,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            http: self.http.clone(),
            session: self.session.clone(),
            on_unauthorized: self.on_unauthorized.clone(),
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(base_url: impl Into<String>, http: C, session: SessionContext) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: Arc::new(http),
            session,
            on_unauthorized: None,
        }
    }

    pub fn with_unauthorized_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    fn url(&self, path: &str, query: &[(&'static str, String)]) -> ClientResult<String> {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        if !query.is_empty() {
            url.push('?');
            url.push_str(&serde_urlencoded::to_string(query)?);
        }
        Ok(url)
    }

    /// 构建请求（不发送）
    pub fn build_request<R: ApiRequest>(&self, req: &R) -> ClientResult<HttpRequest> {
        let url = self.url(&req.path(), &req.query())?;
        let mut http_req = HttpRequest::new(&url, R::METHOD).with_header("Accept", "application/json");

        if let Some(token) = self.session.token() {
            http_req = http_req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        match R::ENCODING {
            BodyEncoding::None => {}
            BodyEncoding::Json => {
                http_req = http_req
                    .with_header("Content-Type", "application/json")
                    .with_body(serde_json::to_string(req)?);
            }
            BodyEncoding::Form => {
                http_req = http_req
                    .with_header("Content-Type", "application/x-www-form-urlencoded")
                    .with_body(serde_urlencoded::to_string(req)?);
            }
        }
        Ok(http_req)
    }

    /// 发送请求并解析响应
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ClientResult<R::Response> {
        let path = req.path();
        let http_req = self.build_request(req)?;
        let resp = self
            .http
            .send(http_req)
            .await
            .map_err(|e| e.in_op_with("api.send", path.clone()))?;

        if resp.status == 401 {
            self.expire();
            let detail = ClientError::rejected(401, &resp.body).message;
            return Err(ClientError::unauthorized(detail).in_op_with("api.send", path));
        }

        if !resp.is_success() {
            return Err(ClientError::rejected(resp.status, &resp.body).in_op_with("api.send", path));
        }

        resp.json::<R::Response>()
            .map_err(|e| e.in_op_with("api.decode", path))
    }

    /// 会话失效：清除持久化状态并通知界面
    fn expire(&self) {
        log::warn!("session rejected by server, clearing stored credentials");
        self.session.end();
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }
}

#[cfg(test)]
mod tests;
