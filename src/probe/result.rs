//! 探测结果数据结构
//!
//! 定义单次探测的结果类型和整轮轮询的结论类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// 单次探测结果
///
/// 探测过程中的所有失败（命令不存在、执行异常、超时）都会被吸收为
/// [`ProbeResult::ProbeError`]，不会作为错误向调用方传播。轮询器对
/// `Unhealthy` 和 `ProbeError` 的处理完全一致，都视为本次未发现可用出口。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ProbeResult {
    /// 发现可用出口
    Healthy,
    /// 未发现可用出口
    Unhealthy,
    /// 探测本身失败（附带失败原因）
    ProbeError(String),
}

impl std::fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeResult::Healthy => write!(f, "出口可用"),
            ProbeResult::Unhealthy => write!(f, "无可用出口"),
            ProbeResult::ProbeError(detail) => write!(f, "探测失败: {}", detail),
        }
    }
}

impl ProbeResult {
    /// 判断是否发现了可用出口
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeResult::Healthy)
    }

    /// 获取探测失败原因（如果有）
    pub fn error_detail(&self) -> Option<&str> {
        match self {
            ProbeResult::ProbeError(detail) => Some(detail),
            _ => None,
        }
    }
}

/// 整轮轮询的结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollOutcome {
    /// 至少一次探测发现可用出口
    Available,
    /// 所有探测都未发现可用出口
    Unavailable,
}

impl std::fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollOutcome::Available => write!(f, "可用"),
            PollOutcome::Unavailable => write!(f, "不可用"),
        }
    }
}

impl PollOutcome {
    /// 判断出口是否可用
    pub fn is_available(&self) -> bool {
        matches!(self, PollOutcome::Available)
    }
}

/// 整轮轮询的详细报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollReport {
    /// 轮询ID
    pub id: Uuid,
    /// 轮询结论
    pub outcome: PollOutcome,
    /// 实际执行的探测次数
    pub attempts: u32,
    /// 轮询开始时间戳
    pub started_at: DateTime<Utc>,
    /// 轮询总耗时
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
}

impl PollReport {
    /// 获取轮询总耗时（毫秒）
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// 转换为JSON字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从JSON字符串创建
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Duration序列化模块
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
