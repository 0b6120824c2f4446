//! CleanAir 浏览器客户端
//!
//! 页面状态机、请求与定时逻辑都在核心库 `cleanair` 中，这里只做三件事：
//! 用 web_sys 实现核心库的接口（`web`），装配上下文（`api`、`auth`），渲染页面（`components`）。
//! 会话过期由 API 客户端回调认证上下文，路由服务据此把受保护页面送回登录页。

mod api;
mod auth;
mod components {
    pub mod alert_banner;
    pub mod alert_settings;
    pub mod city_cards;
    pub mod city_selector;
    pub mod dashboard;
    pub mod forecast_chart;
    pub mod home;
    mod icons;
    pub mod login;
    pub mod map_view;
    pub mod profile;
    pub mod register;
}

use crate::api::{create_api, load_config};
use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;

use leptos::prelude::*;

pub(crate) mod web {
    mod http;
    mod notify;
    pub mod route;
    pub mod router;
    mod state;
    mod storage;
    mod timer;

    pub use http::FetchClient;
    pub use notify::{BrowserNotifier, request_permission};
    pub use state::SignalCell;
    pub use storage::LocalStorage;
    pub use timer::BrowserSleeper;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to=AppRoute::Home class="btn btn-primary mt-6">"Back to home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 配置与认证上下文
    let config = load_config();
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. API 客户端：401 时通过认证上下文广播会话失效
    let api = create_api(&config, auth_ctx);
    log::info!("CleanAir client using API at {}", api.base_url());

    // 3. 从 LocalStorage 恢复会话
    init_auth(&auth_ctx, &api);
    provide_context(api);
    provide_context(config);

    // 4. 获取认证状态信号，用于注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
