//! API 客户端
//!
//! 基于 shared 协议定义发送类型化请求。错误按可重试性分类：
//! 请求本身有问题（4xx）永不重试，瞬时故障（网络错误、5xx）
//! 按有界指数退避重试。

use std::fmt;

use panoptic_shared::HEADER_AUTH;
use panoptic_shared::protocol::{ApiRequest, HttpMethod};

use crate::web::http::{HttpClient, HttpError, HttpMethod as WebMethod};
use crate::web::sleep;

/// API 错误分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401/403：凭据无效或过期，调用方应注销会话
    Unauthorized,
    /// 其他 4xx：请求本身有问题，永不重试
    Rejected(u16, String),
    /// 网络错误或 5xx：瞬时故障，可重试
    Transient(String),
    /// 请求或响应体编解码失败
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "认证失败，请重新登录"),
            ApiError::Rejected(status, msg) => write!(f, "请求被拒绝 ({}): {}", status, msg),
            ApiError::Transient(msg) => write!(f, "暂时无法连接: {}", msg),
            ApiError::Decode(msg) => write!(f, "数据解析失败: {}", msg),
        }
    }
}

impl ApiError {
    /// 是否值得重试
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transient(_))
    }
}

/// 将传输层错误映射到 API 错误分类
fn classify_http(error: HttpError) -> ApiError {
    match error {
        HttpError::NetworkError(msg) => ApiError::Transient(msg),
        HttpError::RequestBuildFailed(msg) => ApiError::Rejected(0, msg),
        HttpError::ResponseParseFailed(msg) => ApiError::Decode(msg),
    }
}

/// 将非 2xx 状态码映射到 API 错误分类
fn classify_status(status: u16) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized,
        500..=599 => ApiError::Transient(format!("服务端错误: {}", status)),
        _ => ApiError::Rejected(status, "服务端拒绝了请求".to_string()),
    }
}

/// 有界指数退避策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 总尝试次数上限（含首次）
    pub max_attempts: u32,
    /// 首次重试前的等待毫秒数，之后逐次翻倍
    pub base_delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
        }
    }
}

impl RetryPolicy {
    /// 第 `attempt` 次失败后的等待时长（attempt 从 0 开始）
    pub fn delay_ms(&self, attempt: u32) -> u32 {
        self.base_delay_ms.saturating_mul(1 << attempt.min(10))
    }

    /// 该错误在第 `attempt` 次失败后是否还应重试
    pub fn should_retry(&self, error: &ApiError, attempt: u32) -> bool {
        error.is_transient() && attempt + 1 < self.max_attempts
    }
}

/// Panoptic API 客户端
///
/// 控制台与它的 API 同源部署，请求直接走相对路径。
#[derive(Debug, Clone, PartialEq)]
pub struct PanopticApi {
    token: Option<String>,
    retry: RetryPolicy,
}

impl PanopticApi {
    /// 未认证客户端：仅能访问公开端点（登录交换）
    pub fn public() -> Self {
        Self {
            token: None,
            retry: RetryPolicy::default(),
        }
    }

    /// 携带会话 token 的客户端
    pub fn authorized(token: String) -> Self {
        Self {
            token: Some(token),
            retry: RetryPolicy::default(),
        }
    }

    /// 发送类型化请求，瞬时故障按退避策略重试
    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await {
                Ok(response) => return Ok(response),
                Err(err) if self.retry.should_retry(&err, attempt) => {
                    sleep(self.retry.delay_ms(attempt) as i32).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let method = match R::METHOD {
            HttpMethod::Get => WebMethod::Get,
            HttpMethod::Post => WebMethod::Post,
            HttpMethod::Put => WebMethod::Put,
            HttpMethod::Delete => WebMethod::Delete,
            HttpMethod::Patch => WebMethod::Patch,
        };
        let mut builder = HttpClient::request(method, R::PATH);

        if let Some(token) = &self.token {
            builder = builder.header(HEADER_AUTH, &format!("Bearer {}", token));
        }

        // GET / DELETE 不携带请求体
        builder = match R::METHOD {
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                let body =
                    serde_json::to_string(request).map_err(|e| ApiError::Decode(e.to_string()))?;
                builder.header("Content-Type", "application/json").body(body)
            }
            _ => builder,
        };

        let response = builder.send().await.map_err(classify_http)?;
        if !response.ok() {
            return Err(classify_status(response.status()));
        }

        let text = response.text().await.map_err(classify_http)?;
        serde_json::from_str::<R::Response>(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests;
