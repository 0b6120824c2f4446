//! 认证模块
//!
//! 会话由核心库的 `SessionContext` 持久化，这里只维护一份响应式镜像，
//! 路由服务通过注入的认证信号来检查认证状态。

use crate::api::Api;
use cleanair::{ClientResult, Session};
use cleanair_shared::protocol::RegisterRequest;
use leptos::prelude::*;

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前会话（只读）
    pub session: ReadSignal<Option<Session>>,
    set_session: WriteSignal<Option<Session>>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (session, set_session) = signal(None);
        Self {
            session,
            set_session,
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(Option::is_some))
    }

    pub fn email(&self) -> Signal<String> {
        let session = self.session;
        Signal::derive(move || {
            session.with(|s| {
                s.as_ref()
                    .and_then(Session::email)
                    .unwrap_or_default()
                    .to_string()
            })
        })
    }

    /// 会话过期：存储已由 API 客户端清除，这里只同步内存状态
    pub fn expire(&self) {
        self.set_session.set(None);
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// 初始化认证状态
///
/// 从 LocalStorage 恢复上次的会话。
pub fn init_auth(ctx: &AuthContext, api: &Api) {
    let restored = api.session().load();
    if restored.is_some() {
        log::debug!("restored session from storage");
    }
    ctx.set_session.set(restored);
}

/// 登录并保存状态
pub async fn login(ctx: &AuthContext, api: &Api, email: &str, password: &str) -> ClientResult<()> {
    let session = api.login(email, password).await?;
    ctx.set_session.set(Some(session));
    Ok(())
}

/// 注册后自动登录
pub async fn register(ctx: &AuthContext, api: &Api, req: RegisterRequest) -> ClientResult<()> {
    let email = req.email.clone();
    let password = req.password.clone();
    api.register(&req).await?;
    login(ctx, api, &email, &password).await
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext, api: &Api) {
    api.logout();
    ctx.set_session.set(None);
}
