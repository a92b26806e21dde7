//! Lokinet Vitals - Lokinet出口可用性健康检测服务
//!
//! 这是一个用Rust编写的Lokinet出口健康检测服务，支持：
//! - 通过外部状态命令探测默认路由出口
//! - 有界次数、固定间隔的轮询重试
//! - 单一HTTP健康检测端点（GET /status）
//! - TOML配置文件与环境变量替换
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod web;

// 重新导出主要类型
pub use config::{Config, PollPolicy, ProbeConfig, ServerConfig};
pub use error::LokinetVitalsError;
pub use probe::{CommandStatusProbe, HealthPoller, PollOutcome, ProbeResult, StatusProbe};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
