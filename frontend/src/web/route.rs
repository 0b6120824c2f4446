//! 路由表与访问守卫
//!
//! 不依赖 DOM，守卫规则可直接单元测试。

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Home,
    Login,
    Register,
    /// 控制面板 (需要认证)
    Dashboard,
    /// 个人档案 (需要认证)
    Profile,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 末尾斜杠忽略，未知路径映射到 NotFound
    pub fn from_path(path: &str) -> Self {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::NotFound => "/404",
        }
    }

    /// 受保护页面：Dashboard、Profile
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Profile)
    }

    /// 已登录用户访问登录/注册页时应被送往面板
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 给定认证状态，返回实际应展示的路由
    ///
    /// 未登录访问受保护页面去登录页，已登录访问登录/注册页去面板，其余原样放行。
    pub fn guard(self, is_authenticated: bool) -> Self {
        if self.requires_auth() && !is_authenticated {
            Self::Login
        } else if self.should_redirect_when_authenticated() && is_authenticated {
            Self::Dashboard
        } else {
            self
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::Profile,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/dashboard/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_guard_redirects() {
        assert_eq!(AppRoute::Dashboard.guard(false), AppRoute::Login);
        assert_eq!(AppRoute::Profile.guard(false), AppRoute::Login);
        assert_eq!(AppRoute::Profile.guard(true), AppRoute::Profile);
        assert_eq!(AppRoute::Login.guard(true), AppRoute::Dashboard);
        assert_eq!(AppRoute::Register.guard(true), AppRoute::Dashboard);
        assert_eq!(AppRoute::Register.guard(false), AppRoute::Register);
        assert_eq!(AppRoute::Home.guard(true), AppRoute::Home);
        assert_eq!(AppRoute::NotFound.guard(false), AppRoute::NotFound);
    }

    #[test]
    fn test_guards() {
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(AppRoute::Profile.requires_auth());
        assert!(!AppRoute::Home.requires_auth());
        assert!(AppRoute::Register.should_redirect_when_authenticated());
        assert!(!AppRoute::Home.should_redirect_when_authenticated());
    }
}
