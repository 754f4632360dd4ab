//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 直接访问浏览器 LocalStorage，
//! 以 [`SessionStorage`] 后端的身份注入会话容器。

use crate::session::SessionStorage;

/// 浏览器 LocalStorage 后端
///
/// 无状态：每次操作都重新获取 Storage 实例，
/// 任何一步失败都按"键不存在 / 写入失败"处理，不会 panic。
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl SessionStorage for LocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn write(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
