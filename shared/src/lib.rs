use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 认证头名称，值为 `Bearer <token>`
pub const HEADER_AUTH: &str = "Authorization";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Operator,
    Viewer,
}

impl Default for Role {
    fn default() -> Self {
        Role::Viewer
    }
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "管理员",
            Role::Operator => "运维",
            Role::Viewer => "访客",
        }
    }
}

/// 用户身份记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    /// 账号创建时间（由服务端填充）
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// 最近一次登录时间（由服务端填充）
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// 用户字段的部分更新
///
/// 所有字段都是可选的：`None` 表示保留原值。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserPatch {
    /// 将补丁合并到已有用户记录，未设置的字段保留原值
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.display_name {
            user.display_name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
    }

    /// 补丁是否为空（不会改变任何字段）
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.email.is_none() && self.role.is_none()
    }
}

// =========================================================
// 认证交换 (Auth Exchange)
// =========================================================

/// 登录请求：凭据交换
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录成功后服务端返回的会话凭据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

// =========================================================
// 面板数据 (Dashboard Payloads)
// =========================================================

/// 控制面板统计摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_users: u64,
    pub active_sessions: u64,
    /// 最近 24 小时内的 API 请求数
    pub requests_24h: u64,
    /// 服务端运行时长（秒）
    pub uptime_secs: u64,
}

impl StatsSummary {
    /// 运行时长的人类可读格式（如 "3d 7h"）
    pub fn uptime_label(&self) -> String {
        let days = self.uptime_secs / 86_400;
        let hours = (self.uptime_secs % 86_400) / 3_600;
        if days > 0 {
            format!("{}d {}h", days, hours)
        } else {
            let mins = (self.uptime_secs % 3_600) / 60;
            format!("{}h {}m", hours, mins)
        }
    }
}
