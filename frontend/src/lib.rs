//! Panoptic 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由与守卫决策（领域模型）
//! - `web::screens`: 屏幕全集与按需加载
//! - `web::router`: 路由服务（核心引擎）
//! - `session`: 会话状态管理与持久化
//! - `components`: UI 组件层

mod api;
mod session;
mod components {
    pub mod dashboard;
    pub mod failure;
    mod icons;
    pub mod login;
    mod nav;
    pub mod settings;
    pub mod users;
}

use std::sync::Arc;

use leptos::prelude::*;

use crate::components::dashboard::DashboardPage;
use crate::components::failure::FailurePage;
use crate::components::login::LoginPage;
use crate::components::settings::SettingsPage;
use crate::components::users::UsersPage;
use crate::session::SessionStore;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod screens;
    mod storage;
    mod timer;

    pub use storage::LocalStorage;
    pub use timer::{Interval, sleep};
}

use web::route::{AppRoute, Visibility};
use web::router::{Router, RouterOutlet, ScreenFactory};
use web::screens::{LoadError, ScreenDescriptor, ScreenSet};

// ============================================================================
// 屏幕工厂
// ============================================================================

fn login_screen() -> AnyView {
    view! { <LoginPage /> }.into_any()
}

fn dashboard_screen() -> AnyView {
    view! { <DashboardPage /> }.into_any()
}

fn users_screen() -> AnyView {
    view! { <UsersPage /> }.into_any()
}

fn settings_screen() -> AnyView {
    view! { <SettingsPage /> }.into_any()
}

fn not_found_screen() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"页面未找到"</p>
            </div>
        </div>
    }
    .into_any()
}

/// 声明全部可导航屏幕：路径、可见性与按需加载器
///
/// 启动时构造一次，之后只有加载器状态会变化。
fn screen_table() -> Arc<ScreenSet<ScreenFactory>> {
    Arc::new(ScreenSet::new(vec![
        ScreenDescriptor::new(AppRoute::Login, Visibility::Public, || {
            Ok(login_screen as ScreenFactory)
        }),
        ScreenDescriptor::new(AppRoute::Dashboard, Visibility::Protected, || {
            Ok(dashboard_screen as ScreenFactory)
        }),
        ScreenDescriptor::new(AppRoute::Users, Visibility::Protected, || {
            Ok(users_screen as ScreenFactory)
        }),
        ScreenDescriptor::new(AppRoute::Settings, Visibility::Protected, || {
            Ok(settings_screen as ScreenFactory)
        }),
        ScreenDescriptor::new(AppRoute::NotFound, Visibility::Public, || {
            Ok(not_found_screen as ScreenFactory)
        }),
    ]))
}

/// 按需加载失败时的兜底视图
fn failure_fallback(error: LoadError, retry: Callback<()>) -> AnyView {
    view! { <FailurePage message=error.to_string() on_retry=retry /> }.into_any()
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话容器（显式注入存储后端）并完成启动期还原
    let session = SessionStore::new(Arc::new(web::LocalStorage));
    provide_context(session.clone());

    // 2. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = session.is_authenticated_signal();

    view! {
        // 3. 路由器组件：注入认证信号与屏幕全集实现守卫
        <Router is_authenticated=is_authenticated screens=screen_table()>
            <RouterOutlet fallback=failure_fallback />
        </Router>
    }
}
