//! 基于 `window.fetch` 的 `HttpClient` 实现

use async_trait::async_trait;
use cleanair::request::{HttpClient, HttpRequest, HttpResponse};
use cleanair::{ClientError, ClientResult};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// fetch 各阶段的失败，统一折算为网络错误
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("请求构建失败: {0}")]
    Build(String),
    #[error("网络错误: {0}")]
    Network(String),
    #[error("响应读取失败: {0}")]
    Read(String),
}

impl From<HttpError> for ClientError {
    fn from(e: HttpError) -> Self {
        ClientError::network(e.to_string()).with_source(e)
    }
}

fn js_detail(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn build_request(req: &HttpRequest) -> Result<Request, HttpError> {
    let headers = Headers::new().map_err(|e| HttpError::Build(js_detail(e)))?;
    for (key, value) in &req.headers {
        headers
            .set(key, value)
            .map_err(|e| HttpError::Build(format!("{}: {}", key, js_detail(e))))?;
    }

    let init = RequestInit::new();
    init.set_method(req.method.as_str());
    init.set_headers(&headers.into());
    if let Some(body) = &req.body {
        init.set_body(&JsValue::from_str(body));
    }

    Request::new_with_str_and_init(&req.url, &init).map_err(|e| HttpError::Build(js_detail(e)))
}

/// 任何状态码都按响应返回，状态码由核心库解释
async fn read_response(value: JsValue) -> Result<HttpResponse, HttpError> {
    let response: Response = value
        .dyn_into()
        .map_err(|_| HttpError::Read("fetch 未返回 Response".to_string()))?;
    let status = response.status();
    let text = response.text().map_err(|e| HttpError::Read(js_detail(e)))?;
    let body = JsFuture::from(text)
        .await
        .map_err(|e| HttpError::Read(js_detail(e)))?
        .as_string()
        .unwrap_or_default();
    Ok(HttpResponse { status, body })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let attempt = async {
            let request = build_request(&req)?;
            let window =
                web_sys::window().ok_or_else(|| HttpError::Network("window 不可用".to_string()))?;
            let value = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(|e| HttpError::Network(js_detail(e)))?;
            Ok::<HttpResponse, HttpError>(read_response(value).await?)
        };
        attempt
            .await
            .map_err(|e| ClientError::from(e).in_op_with("fetch", req.url.as_str()))
    }
}
