//! 顶部导航栏
//!
//! 受保护页面共用的导航：页面切换、当前用户徽标与注销按钮。
//! 注销后不需要手动导航，路由服务会监听认证状态变化并自动重定向。

use leptos::prelude::*;

use super::icons::{Activity, LogOut};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::{use_navigate, use_router};

#[component]
fn NavLink(route: AppRoute, label: &'static str) -> impl IntoView {
    let navigate = use_navigate();
    let current = use_router().current_route();

    let class = move || {
        if current.get() == route {
            "btn btn-sm btn-primary"
        } else {
            "btn btn-sm btn-ghost"
        }
    };

    view! {
        <button class=class on:click=move |_| navigate(route.to_path())>
            {label}
        </button>
    }
}

#[component]
pub fn NavBar() -> impl IntoView {
    let session = use_session();
    let user = session.user_signal();

    let on_logout = move |_| session.logout();

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <Activity attr:class="text-primary h-6 w-6" />
                <a class="btn btn-ghost text-xl">"Panoptic 控制台"</a>
                <span class="badge badge-neutral hidden md:inline-flex">
                    {move || user.get().map(|u| u.display_name).unwrap_or_default()}
                </span>
            </div>
            <div class="flex-none gap-1">
                <NavLink route=AppRoute::Dashboard label="面板" />
                <NavLink route=AppRoute::Users label="用户" />
                <NavLink route=AppRoute::Settings label="设置" />
                <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2 ml-2">
                    <LogOut attr:class="h-4 w-4" /> "注销"
                </button>
            </div>
        </div>
    }
}
