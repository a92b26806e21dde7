//! Web服务模块
//!
//! 提供出口可用性状态的HTTP查询接口

use crate::probe::HealthPoller;
use std::sync::Arc;

pub mod handlers;
pub mod server;

// 重新导出主要类型
pub use handlers::{StatusResponse, AVAILABLE_MESSAGE, UNAVAILABLE_MESSAGE};
pub use server::WebServer;

/// Web服务器共享状态
#[derive(Clone)]
pub struct AppState {
    /// 出口轮询器
    pub poller: Arc<HealthPoller>,
}

impl AppState {
    /// 创建新的Web服务器状态
    pub fn new(poller: Arc<HealthPoller>) -> Self {
        Self { poller }
    }
}
