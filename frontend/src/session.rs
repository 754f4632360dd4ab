//! 会话模块
//!
//! 管理当前登录会话，与路由系统解耦：路由服务只通过注入的
//! 认证信号读取认证状态。认证标志由构造保证——user 与 token
//! 要么同时存在，要么同时缺失，不存在可单独置位的布尔字段。
//!
//! 持久化只覆盖 `{user, token}` 子集；认证标志在还原时重新推导，
//! 存储被外部改坏时最多退化为未登录，绝不报错。

use std::fmt;
use std::sync::Arc;

use leptos::prelude::*;
use panoptic_shared::{User, UserPatch};
use serde::{Deserialize, Serialize};

/// 持久化键（固定常量）
pub const STORAGE_SESSION_KEY: &str = "panoptic_session";

/// 会话操作错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// login 调用缺少有效凭据（空 token 或空用户 id）。
    /// 这是调用方的契约违例，调用方应在认证交换成功后再调用。
    MissingCredentials,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingCredentials => write!(f, "登录凭据不完整"),
        }
    }
}

/// 键值持久化后端
///
/// 写入是 fire-and-forget：失败时内存状态仍然权威，
/// 下次启动还原失败只会安静地退化为未登录。
pub trait SessionStorage: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// 已认证的凭据对：user 与 token 绑定存在
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub user: User,
    pub token: String,
}

/// 会话状态
///
/// `is_authenticated` 不是独立字段，而是从凭据是否存在推导。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    credentials: Option<Credentials>,
}

/// 会话的只读快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user().cloned(),
            token: self.token().map(str::to_string),
            is_authenticated: self.is_authenticated(),
        }
    }

    /// 登录：user 与 token 必须同时有效
    pub fn login(&mut self, user: User, token: String) -> Result<(), SessionError> {
        if user.id.trim().is_empty() || token.trim().is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        self.credentials = Some(Credentials { user, token });
        Ok(())
    }

    /// 注销。幂等：已注销时再次调用不改变可观察状态。
    pub fn logout(&mut self) {
        self.credentials = None;
    }

    /// 部分更新用户信息
    ///
    /// 未登录时为 no-op；补丁中未设置的字段保留原值；
    /// 永远不会改变认证状态。
    pub fn update_user(&mut self, patch: &UserPatch) {
        if let Some(credentials) = &mut self.credentials {
            patch.apply_to(&mut credentials.user);
        }
    }

    /// 序列化持久化子集；未登录时返回 `None`（对应删除存储记录）
    pub fn to_persisted(&self) -> Option<String> {
        self.credentials
            .as_ref()
            .and_then(|c| serde_json::to_string(c).ok())
    }

    /// 从持久化文本还原
    ///
    /// 缺失、截断或字段为空的数据一律退化为未登录。
    pub fn from_persisted(text: Option<&str>) -> Self {
        let credentials = text
            .and_then(|t| serde_json::from_str::<Credentials>(t).ok())
            .filter(|c| !c.user.id.trim().is_empty() && !c.token.trim().is_empty());
        Self { credentials }
    }
}

/// 将会话写入存储；写失败被忽略，内存状态保持权威
pub fn persist(storage: &dyn SessionStorage, session: &Session) {
    match session.to_persisted() {
        Some(text) => {
            storage.write(STORAGE_SESSION_KEY, &text);
        }
        None => {
            storage.delete(STORAGE_SESSION_KEY);
        }
    }
}

/// 启动时从存储还原会话
pub fn rehydrate(storage: &dyn SessionStorage) -> Session {
    Session::from_persisted(storage.read(STORAGE_SESSION_KEY).as_deref())
}

/// 响应式会话容器
///
/// 在应用启动时构造一次，通过 Context 显式传递给路由器与组件，
/// 不依赖全局单例。所有变更在 UI 线程内同步完成。
#[derive(Clone)]
pub struct SessionStore {
    state: RwSignal<Session>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// 构造并完成启动期还原
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let initial = rehydrate(storage.as_ref());
        Self {
            state: RwSignal::new(initial),
            storage,
        }
    }

    pub fn login(&self, user: User, token: String) -> Result<(), SessionError> {
        let mut session = self.state.get_untracked();
        session.login(user, token)?;
        persist(self.storage.as_ref(), &session);
        self.state.set(session);
        Ok(())
    }

    pub fn logout(&self) {
        let mut session = self.state.get_untracked();
        session.logout();
        persist(self.storage.as_ref(), &session);
        self.state.set(session);
    }

    pub fn update_user(&self, patch: &UserPatch) {
        let mut session = self.state.get_untracked();
        if !session.is_authenticated() {
            return;
        }
        session.update_user(patch);
        persist(self.storage.as_ref(), &session);
        self.state.set(session);
    }

    /// 当前快照（非响应式读取）
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.with_untracked(|s| s.snapshot())
    }

    /// 认证状态信号（用于注入路由服务，保持解耦）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_authenticated()))
    }

    /// 当前用户信号
    pub fn user_signal(&self) -> Signal<Option<User>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user().cloned()))
    }
}

/// 从 Context 获取会话容器
pub fn use_session() -> SessionStore {
    use_context::<SessionStore>().expect("SessionStore should be provided")
}

#[cfg(test)]
mod tests;
