//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、屏幕可见性以及守卫决策函数。

use std::fmt::Display;

/// 屏幕可见性标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// 无需认证即可访问（如登录页）
    Public,
    /// 仅认证用户可访问
    Protected,
}

/// 守卫决策
///
/// 每次导航意图在目标屏幕挂载前同步求值一次。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 允许挂载目标屏幕
    Allow,
    /// 未认证访问受保护屏幕：重定向到登录页
    RedirectToLogin,
    /// 已认证访问登录页：重定向到控制面板
    RedirectToHome,
}

/// **核心守卫逻辑：根据屏幕可见性与认证状态做出决策**
///
/// 无状态的纯函数。重定向目标是固定路径（见
/// [`AppRoute::auth_failure_redirect`] / [`AppRoute::auth_success_redirect`]），
/// 不从历史记录推导。
pub fn decide(visibility: Visibility, is_authenticated: bool) -> GuardDecision {
    match (visibility, is_authenticated) {
        (Visibility::Protected, false) => GuardDecision::RedirectToLogin,
        (Visibility::Public, true) => GuardDecision::RedirectToHome,
        _ => GuardDecision::Allow,
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 控制面板 (需要认证)
    Dashboard,
    /// 用户列表 (需要认证)
    Users,
    /// 设置页面 (需要认证)
    Settings,
    /// 页面未找到：未声明路径的终端屏幕，属于正常情况而非错误
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 声明路径优先匹配；全部落空才归入 `NotFound`。
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/dashboard" => Self::Dashboard,
            "/login" => Self::Login,
            "/users" => Self::Users,
            "/settings" => Self::Settings,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Users => "/users",
            Self::Settings => "/settings",
            Self::NotFound => "/404",
        }
    }

    /// 认证失败时的固定重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 已认证用户离开登录页时的固定重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests;
