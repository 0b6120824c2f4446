//! 客户端路由
//!
//! 当前路由保存在信号中，地址栏通过 History API 同步。
//! 每次路由变化（主动导航、前进后退、认证状态变化）都先经过 `AppRoute::guard`。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

fn location_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
}

fn write_history(path: &str, mode: HistoryMode) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = match mode {
        HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(path)),
        HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(path)),
    };
    if let Err(e) = result {
        log::warn!("[Router] history update failed for {}: {:?}", path, e);
    }
}

#[derive(Clone, Copy)]
pub struct RouterService {
    route: RwSignal<AppRoute>,
    /// 由 App 注入，路由本身不依赖认证模块
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let requested = AppRoute::from_path(&location_path());
        let service = Self {
            route: RwSignal::new(AppRoute::NotFound),
            is_authenticated,
        };
        // 首屏也要过守卫，直接打开 /dashboard 的未登录用户会被送去登录页
        service.apply(requested, HistoryMode::Replace);
        service
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.route.read_only()
    }

    pub fn navigate(&self, path: &str) {
        self.apply(AppRoute::from_path(path), HistoryMode::Push);
    }

    /// 守卫后更新地址栏与路由信号
    fn apply(&self, requested: AppRoute, mode: HistoryMode) {
        let target = requested.clone().guard(self.is_authenticated.get_untracked());
        if target != requested {
            log::info!("[Router] {} redirected to {}", requested, target);
        }
        write_history(target.to_path(), mode);
        self.route.set(target);
    }

    fn listen_popstate(&self) {
        let service = *self;
        let on_popstate = Closure::<dyn Fn()>::new(move || {
            service.apply(AppRoute::from_path(&location_path()), HistoryMode::Replace);
        });
        if let Some(window) = web_sys::window() {
            if let Err(e) = window
                .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())
            {
                log::warn!("[Router] popstate listener not installed: {:?}", e);
            }
        }
        // 监听器与页面同寿命
        on_popstate.forget();
    }

    /// 登录、登出或会话过期（401）时重新评估当前页面
    fn follow_auth(&self) {
        let service = *self;
        Effect::new(move |_| {
            let is_auth = service.is_authenticated.get();
            let current = service.route.get_untracked();
            if current.clone().guard(is_auth) != current {
                service.apply(current, HistoryMode::Push);
            }
        });
    }
}

pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

/// 返回一个按路由跳转的闭包
pub fn use_navigate() -> impl Fn(AppRoute) + Clone + Copy {
    let router = use_router();
    move |to: AppRoute| router.navigate(to.to_path())
}

#[component]
pub fn Router(is_authenticated: Signal<bool>, children: Children) -> impl IntoView {
    let router = RouterService::new(is_authenticated);
    router.listen_popstate();
    router.follow_auth();
    provide_context(router);

    children()
}

/// 按当前路由渲染页面，路由变化时旧页面被卸载
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();
    move || matcher(router.current_route().get())
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let path = to.to_path();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(path);
    };

    view! {
        <a href=path class=class on:click=on_click>
            {children()}
        </a>
    }
}
