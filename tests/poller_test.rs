//! 轮询器集成测试
//!
//! 使用tokio虚拟时钟验证完整轮询周期的时序行为

use async_trait::async_trait;
use lokinet_vitals::config::PollPolicy;
use lokinet_vitals::probe::{HealthPoller, PollOutcome, ProbeResult, StatusProbe};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 按预设序列返回结果的探测器，序列耗尽后返回Unhealthy
struct ScriptedProbe {
    results: Mutex<VecDeque<ProbeResult>>,
    calls: AtomicU32,
}

impl ScriptedProbe {
    fn new(results: Vec<ProbeResult>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
            calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusProbe for ScriptedProbe {
    async fn probe(&self) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ProbeResult::Unhealthy)
    }
}

fn policy(max_attempts: u32, interval_secs: u64) -> PollPolicy {
    PollPolicy {
        max_attempts,
        poll_interval_seconds: interval_secs,
    }
}

#[tokio::test(start_paused = true)]
async fn first_probe_healthy_returns_immediately() {
    let probe = Arc::new(ScriptedProbe::new(vec![ProbeResult::Healthy]));
    let poller = HealthPoller::new(probe.clone(), policy(6, 10));

    let start = tokio::time::Instant::now();
    let outcome = poller.poll().await;

    assert_eq!(outcome, PollOutcome::Available);
    assert_eq!(probe.call_count(), 1);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn exhausted_round_waits_only_between_attempts() {
    // 6次探测全部未发现出口：5个间隔共50秒，最后一次探测之后不再等待
    let probe = Arc::new(ScriptedProbe::new(vec![]));
    let poller = HealthPoller::new(probe.clone(), policy(6, 10));

    let start = tokio::time::Instant::now();
    let outcome = poller.poll().await;
    let elapsed = start.elapsed();

    assert_eq!(outcome, PollOutcome::Unavailable);
    assert_eq!(probe.call_count(), 6);
    assert!(elapsed >= Duration::from_secs(50), "实际耗时: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(51), "实际耗时: {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn recovery_on_fourth_attempt() {
    let probe = Arc::new(ScriptedProbe::new(vec![
        ProbeResult::Unhealthy,
        ProbeResult::Unhealthy,
        ProbeResult::ProbeError("连接失败".to_string()),
        ProbeResult::Healthy,
    ]));
    let poller = HealthPoller::new(probe.clone(), policy(6, 10));

    let start = tokio::time::Instant::now();
    let report = poller.poll_detailed().await;
    let elapsed = start.elapsed();

    assert_eq!(report.outcome, PollOutcome::Available);
    assert_eq!(report.attempts, 4);
    assert_eq!(probe.call_count(), 4);
    // 前3次探测各带一个10秒间隔
    assert!(elapsed >= Duration::from_secs(30));
    assert!(elapsed < Duration::from_secs(31));
    assert!(report.elapsed >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn single_attempt_never_waits() {
    let probe = Arc::new(ScriptedProbe::new(vec![ProbeResult::Unhealthy]));
    let poller = HealthPoller::new(probe.clone(), policy(1, 3600));

    let start = tokio::time::Instant::now();
    let outcome = poller.poll().await;

    assert_eq!(outcome, PollOutcome::Unavailable);
    assert_eq!(probe.call_count(), 1);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn probe_errors_consume_full_round() {
    // 探测失败与未发现出口同样消耗探测次数
    let probe = Arc::new(ScriptedProbe::new(vec![
        ProbeResult::ProbeError("命令不存在".to_string()),
        ProbeResult::ProbeError("命令不存在".to_string()),
        ProbeResult::ProbeError("命令不存在".to_string()),
    ]));
    let poller = HealthPoller::new(probe.clone(), policy(3, 10));

    let start = tokio::time::Instant::now();
    let report = poller.poll_detailed().await;
    let elapsed = start.elapsed();

    assert_eq!(report.outcome, PollOutcome::Unavailable);
    assert_eq!(report.attempts, 3);
    assert!(elapsed >= Duration::from_secs(20));
    assert!(elapsed < Duration::from_secs(21));
}
