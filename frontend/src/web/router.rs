//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 守卫 -> 处理 -> 加载"的导航流程：
//! 守卫决策总是在任何按需加载开始之前同步完成，
//! 重定向绝不触发目标屏幕的加载器。

use std::sync::Arc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, GuardDecision};
use super::screens::{LoadError, ScreenSet};

/// 屏幕工厂：加载器解析出的稳定引用，每次渲染时调用
pub type ScreenFactory = fn() -> AnyView;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 对导航意图求守卫决策，返回最终要挂载的路由
///
/// 此时绝不触碰加载器；重定向目标是固定路径。
fn resolve_guard(
    screens: &ScreenSet<ScreenFactory>,
    target: AppRoute,
    is_authenticated: bool,
) -> AppRoute {
    match screens.guard(target, is_authenticated) {
        GuardDecision::Allow => target,
        GuardDecision::RedirectToLogin => {
            web_sys::console::log_1(&"[Router] Access denied. Redirecting to login.".into());
            AppRoute::auth_failure_redirect()
        }
        GuardDecision::RedirectToHome => {
            web_sys::console::log_1(
                &"[Router] Already authenticated. Redirecting to dashboard.".into(),
            );
            AppRoute::auth_success_redirect()
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证检查信号由外部注入，与认证系统解耦。
#[derive(Clone)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
    /// 屏幕全集：可见性与按需加载器
    screens: Arc<ScreenSet<ScreenFactory>>,
    /// 失败屏幕"重试"后递增，促使 outlet 重新解析
    retry_epoch: RwSignal<u32>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// 启动路径同样先过守卫：带着受保护的 URL 冷启动时，
    /// 直接以 replace 方式落到登录页，不触发目标加载器。
    fn new(is_authenticated: Signal<bool>, screens: Arc<ScreenSet<ScreenFactory>>) -> Self {
        let target = AppRoute::from_path(&current_path());
        let initial = resolve_guard(&screens, target, is_authenticated.get_untracked());
        if initial != target {
            replace_history_state(initial.to_path());
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            is_authenticated,
            screens,
            retry_epoch: RwSignal::new(0),
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 守卫 -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let is_auth = self.is_authenticated.get_untracked();
        let resolved = resolve_guard(&self.screens, target, is_auth);

        if use_push {
            push_history_state(resolved.to_path());
        } else {
            replace_history_state(resolved.to_path());
        }
        self.set_route.set(resolved);
    }

    /// 解析当前路由对应的屏幕
    ///
    /// 只会在守卫放行、路由信号更新之后由 outlet 调用，
    /// 因此按需加载永远发生在守卫决策之后。
    fn screen_for(&self, route: AppRoute) -> Result<ScreenFactory, LoadError> {
        self.screens.screen_for(route)
    }

    /// 失败屏幕的"重试"：清除失败状态并重新挂载
    ///
    /// 只提供一次全新开始，不恢复失败时的导航上下文。
    pub fn retry(&self, route: AppRoute) {
        self.screens.reset(route);
        self.retry_epoch.update(|n| *n += 1);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = self.clone();
        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let is_auth = router.is_authenticated.get_untracked();

            // popstate 时也执行守卫逻辑
            let resolved = resolve_guard(&router.screens, target, is_auth);
            if resolved != target {
                // 阻止访问并在历史记录中覆盖被拦截的条目
                replace_history_state(resolved.to_path());
            }
            router.set_route.set(resolved);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    ///
    /// 登录后停留在登录页则跳转面板；注销后停留在受保护页
    /// 则跳转登录页。组件内不需要手动导航。
    fn setup_auth_redirect(&self) {
        let router = self.clone();
        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();

            let resolved = resolve_guard(&router.screens, route, is_auth);
            if resolved != route {
                push_history_state(resolved.to_path());
                router.set_route.set(resolved);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    is_authenticated: Signal<bool>,
    screens: Arc<ScreenSet<ScreenFactory>>,
) -> RouterService {
    let router = RouterService::new(is_authenticated, screens);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router.clone());
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 屏幕全集
    screens: Arc<ScreenSet<ScreenFactory>>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(is_authenticated, screens);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态解析并渲染对应的屏幕；
/// 按需加载失败时渲染兜底视图。
#[component]
pub fn RouterOutlet(
    /// 加载失败时的兜底视图：收到错误信息与"重试"回调
    fallback: fn(LoadError, Callback<()>) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route.get();
        // 重试后重新解析
        router.retry_epoch.track();

        match router.screen_for(current) {
            Ok(factory) => factory(),
            Err(err) => {
                let retry_router = router.clone();
                let retry = Callback::new(move |_| retry_router.retry(current));
                fallback(err, retry)
            }
        }
    }
}
