//! 有界重试轮询器实现
//!
//! 一轮轮询最多执行 `max_attempts` 次探测，相邻两次探测之间等待固定间隔，
//! 首次发现可用出口立即结束整轮。最后一次探测之后不再等待。

use crate::config::PollPolicy;
use crate::probe::checker::StatusProbe;
use crate::probe::result::{PollOutcome, PollReport, ProbeResult};
use chrono::Utc;
use std::sync::Arc;
use tokio::time::Instant;
use uuid::Uuid;

/// 有界重试轮询器
pub struct HealthPoller {
    /// 出口探测器
    probe: Arc<dyn StatusProbe>,
    /// 轮询策略
    policy: PollPolicy,
}

impl HealthPoller {
    /// 创建新的轮询器
    ///
    /// # 参数
    /// * `probe` - 出口探测器
    /// * `policy` - 轮询策略
    ///
    /// # 返回
    /// * `Self` - 轮询器实例
    pub fn new(probe: Arc<dyn StatusProbe>, policy: PollPolicy) -> Self {
        Self { probe, policy }
    }

    /// 执行一轮轮询，只返回结论
    ///
    /// # 返回
    /// * `PollOutcome` - 轮询结论
    pub async fn poll(&self) -> PollOutcome {
        self.poll_detailed().await.outcome
    }

    /// 执行一轮轮询，返回详细报告
    ///
    /// # 返回
    /// * `PollReport` - 轮询报告
    pub async fn poll_detailed(&self) -> PollReport {
        let poll_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        let mut attempts = 0u32;
        let mut outcome = PollOutcome::Unavailable;

        for attempt in 1..=self.policy.max_attempts {
            attempts = attempt;

            match self.probe.probe().await {
                ProbeResult::Healthy => {
                    log::info!("[{}] 第{}次探测发现可用出口", poll_id, attempt);
                    outcome = PollOutcome::Available;
                    break;
                }
                ProbeResult::Unhealthy => {
                    log::debug!("[{}] 第{}次探测未发现可用出口", poll_id, attempt);
                }
                ProbeResult::ProbeError(detail) => {
                    // 探测失败与未发现出口同样处理，继续下一次探测
                    log::warn!("[{}] 第{}次探测失败: {}", poll_id, attempt, detail);
                }
            }

            // 最后一次探测之后不再等待
            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.poll_interval()).await;
            }
        }

        let elapsed = start.elapsed();

        if outcome.is_available() {
            log::info!(
                "[{}] 轮询结束: 出口可用（共{}次探测，耗时{}毫秒）",
                poll_id,
                attempts,
                elapsed.as_millis()
            );
        } else {
            log::warn!(
                "[{}] 轮询结束: {}次探测均未发现可用出口（耗时{}毫秒）",
                poll_id,
                attempts,
                elapsed.as_millis()
            );
        }

        PollReport {
            id: poll_id,
            outcome,
            attempts,
            started_at,
            elapsed,
        }
    }
}
