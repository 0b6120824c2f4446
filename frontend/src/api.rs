//! 浏览器端 API 客户端装配

use crate::auth::AuthContext;
use crate::web::{FetchClient, LocalStorage};
use cleanair::{
    ApiClient, ClientConfig, SessionContext, VAR_ALERT_POLL_SECS, VAR_API_BASE,
    VAR_FORECAST_HOURS,
};
use leptos::prelude::*;
use std::sync::Arc;

pub type Api = ApiClient<FetchClient>;

/// 读取构建时注入的配置
pub fn load_config() -> ClientConfig {
    ClientConfig::from_lookup(|key| {
        let value = match key {
            VAR_API_BASE => option_env!("CLEANAIR_API_BASE"),
            VAR_FORECAST_HOURS => option_env!("CLEANAIR_FORECAST_HOURS"),
            VAR_ALERT_POLL_SECS => option_env!("CLEANAIR_ALERT_POLL_SECS"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

/// 创建 API 客户端
///
/// 任何请求收到 401 时，客户端清除存储中的会话并通知认证上下文，
/// 路由服务随后把受保护页面重定向到登录页。
pub fn create_api(config: &ClientConfig, auth: AuthContext) -> Api {
    let session = SessionContext::new(Arc::new(LocalStorage));
    ApiClient::new(config.api_base.clone(), FetchClient, session)
        .with_unauthorized_hook(move || auth.expire())
}

pub fn use_api() -> Api {
    expect_context::<Api>()
}

pub fn use_config() -> ClientConfig {
    expect_context::<ClientConfig>()
}
