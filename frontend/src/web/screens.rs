//! 屏幕集合模块
//!
//! 声明式的 路由 -> 屏幕 映射表，带按需加载语义：
//! 每个屏幕的加载器在首次导航时才被调用，结果缓存，
//! 之后的重复导航不再触发加载。加载器状态是描述符中唯一可变的部分。

use std::fmt;
use std::sync::Mutex;

use super::route::{AppRoute, GuardDecision, Visibility, decide};

/// 按需加载失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// 加载器在执行过程中再次进入了同一描述符
    Reentered,
    /// 加载器本身执行失败
    Failed(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Reentered => write!(f, "屏幕加载器重入"),
            LoadError::Failed(msg) => write!(f, "屏幕加载失败: {}", msg),
        }
    }
}

/// 加载器状态机
enum LoaderState<S> {
    NotLoaded,
    Loading,
    Loaded(S),
    Failed(LoadError),
}

/// 单个可导航屏幕的描述符
///
/// 路由、可见性在启动时声明后不可变；只有加载器状态会随
/// 首次导航而迁移。对屏幕实现的类型做了泛化，测试中可以用
/// 任意轻量句柄代替视图工厂。
pub struct ScreenDescriptor<S> {
    pub route: AppRoute,
    pub visibility: Visibility,
    loader: Box<dyn Fn() -> Result<S, LoadError> + Send + Sync>,
    state: Mutex<LoaderState<S>>,
}

impl<S: Clone> ScreenDescriptor<S> {
    pub fn new(
        route: AppRoute,
        visibility: Visibility,
        loader: impl Fn() -> Result<S, LoadError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            route,
            visibility,
            loader: Box::new(loader),
            state: Mutex::new(LoaderState::NotLoaded),
        }
    }

    /// 解析屏幕实现
    ///
    /// 首次调用触发加载器并缓存结果（成功或失败都缓存）；
    /// 之后的调用直接命中缓存，加载器在一个进程生命周期内
    /// 至多执行一次。
    pub fn resolve(&self) -> Result<S, LoadError> {
        {
            let mut state = self.state.lock().expect("loader state poisoned");
            match &*state {
                LoaderState::Loaded(screen) => return Ok(screen.clone()),
                LoaderState::Failed(err) => return Err(err.clone()),
                LoaderState::Loading => return Err(LoadError::Reentered),
                LoaderState::NotLoaded => *state = LoaderState::Loading,
            }
        }

        // 锁已释放：加载器可以自由访问其他描述符
        let result = (self.loader)();

        let mut state = self.state.lock().expect("loader state poisoned");
        *state = match &result {
            Ok(screen) => LoaderState::Loaded(screen.clone()),
            Err(err) => LoaderState::Failed(err.clone()),
        };
        result
    }

    /// 清除失败状态，允许下一次解析重新执行加载器（"重试"路径）
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("loader state poisoned");
        *state = LoaderState::NotLoaded;
    }
}

/// 可导航屏幕的全集
///
/// 启动时声明一次，之后不可变。路径两两不同由 [`AppRoute`]
/// 枚举天然保证，这里只在启动期断言一次。
pub struct ScreenSet<S> {
    screens: Vec<ScreenDescriptor<S>>,
}

impl<S: Clone> ScreenSet<S> {
    pub fn new(screens: Vec<ScreenDescriptor<S>>) -> Self {
        debug_assert!(
            {
                let mut routes: Vec<AppRoute> = screens.iter().map(|s| s.route).collect();
                routes.sort_by_key(|r| *r as u8);
                routes.windows(2).all(|w| w[0] != w[1])
            },
            "screen routes must be disjoint"
        );
        Self { screens }
    }

    fn descriptor(&self, route: AppRoute) -> Option<&ScreenDescriptor<S>> {
        self.screens.iter().find(|s| s.route == route)
    }

    /// 对一次导航意图求守卫决策
    ///
    /// 未声明路径（以及 404 终端屏幕本身）无论会话状态如何都放行，
    /// 这是正常情况而非错误；其余屏幕按可见性与认证状态裁决。
    /// 求值过程绝不触碰加载器：重定向不会触发目标屏幕的按需加载。
    pub fn guard(&self, route: AppRoute, is_authenticated: bool) -> GuardDecision {
        if route == AppRoute::NotFound {
            return GuardDecision::Allow;
        }
        match self.descriptor(route) {
            Some(screen) => decide(screen.visibility, is_authenticated),
            // 未声明的路由会回落到 404 屏幕
            None => GuardDecision::Allow,
        }
    }

    /// 解析路由对应的屏幕实现，未声明路由回落到 404 描述符
    pub fn screen_for(&self, route: AppRoute) -> Result<S, LoadError> {
        match self
            .descriptor(route)
            .or_else(|| self.descriptor(AppRoute::NotFound))
        {
            Some(screen) => screen.resolve(),
            None => Err(LoadError::Failed("屏幕表缺少 404 条目".to_string())),
        }
    }

    /// 清除指定路由的加载失败状态
    pub fn reset(&self, route: AppRoute) {
        if let Some(screen) = self.descriptor(route) {
            screen.reset();
        }
    }
}

#[cfg(test)]
mod tests;
