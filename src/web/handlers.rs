//! Web 路由处理函数
//!
//! 实现 Web 服务器的路由处理逻辑

use super::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

/// 出口可用时的响应消息
pub const AVAILABLE_MESSAGE: &str = "Lokinet exits are available";

/// 出口不可用时的响应消息
pub const UNAVAILABLE_MESSAGE: &str = "No Lokinet exits available";

/// 状态端点响应结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// 状态描述
    pub status: String,
}

impl StatusResponse {
    /// 出口可用响应
    pub fn available() -> Self {
        Self {
            status: AVAILABLE_MESSAGE.to_string(),
        }
    }

    /// 出口不可用响应
    pub fn unavailable() -> Self {
        Self {
            status: UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

/// 状态端点处理函数
///
/// 每个请求都会触发一整轮出口轮询，轮询结束后才返回响应：
/// 出口可用返回 `200 OK`，不可用返回 `503 Service Unavailable`。
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let outcome = state.poller.poll().await;

    if outcome.is_available() {
        (StatusCode::OK, Json(StatusResponse::available()))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(StatusResponse::unavailable()),
        )
    }
}
