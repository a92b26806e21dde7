//! 出口探测模块
//!
//! 提供Lokinet出口状态探测、结果处理和有界重试轮询功能

pub mod checker;
pub mod poller;
pub mod result;

// 重新导出主要类型
pub use checker::{contains_exit_marker, CommandStatusProbe, StatusProbe, EXIT_MARKER};
pub use poller::HealthPoller;
pub use result::{PollOutcome, PollReport, ProbeResult};
