//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 主配置结构，包含全局配置、探测配置、轮询策略和Web服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 全局配置项
    #[serde(default)]
    pub global: GlobalConfig,
    /// 出口探测配置
    #[serde(default)]
    pub probe: ProbeConfig,
    /// 轮询策略
    #[serde(default)]
    pub poll: PollPolicy,
    /// Web 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            probe: ProbeConfig::default(),
            poll: PollPolicy::default(),
            server: ServerConfig::default(),
        }
    }
}

/// 全局配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// 出口探测配置结构
///
/// 描述如何调用外部命令查询Lokinet出口状态。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// 探测命令
    #[serde(default = "default_probe_command")]
    pub command: String,
    /// 命令参数
    #[serde(default = "default_probe_args")]
    pub args: Vec<String>,
    /// 单次探测超时时间（秒，None表示不限制）
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: default_probe_command(),
            args: default_probe_args(),
            timeout_seconds: None,
        }
    }
}

impl ProbeConfig {
    /// 单次探测超时时间
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// 轮询策略结构
///
/// 控制一轮探测最多尝试几次、相邻两次之间等待多久。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollPolicy {
    /// 最大探测次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// 相邻两次探测之间的等待时间（秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

impl PollPolicy {
    /// 相邻两次探测之间的等待时间
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

/// Web 服务器配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// 绑定地址
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 是否启用CORS
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            cors_enabled: default_cors_enabled(),
        }
    }
}

// 默认值函数
fn default_log_level() -> String {
    "info".to_string()
}

fn default_probe_command() -> String {
    "lokinet-vpn".to_string()
}

fn default_probe_args() -> Vec<String> {
    vec!["--status".to_string()]
}

fn default_max_attempts() -> u32 {
    6
}

fn default_poll_interval() -> u64 {
    10
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_enabled() -> bool {
    false
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    // 验证日志级别
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.global.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.global.log_level, valid_log_levels
        ));
    }

    // 验证探测配置
    if config.probe.command.trim().is_empty() {
        return Err("探测命令不能为空".to_string());
    }

    if let Some(timeout) = config.probe.timeout_seconds {
        if timeout == 0 {
            return Err("探测超时时间不能为0".to_string());
        }
    }

    // 验证轮询策略
    if config.poll.max_attempts == 0 {
        return Err("最大探测次数不能为0".to_string());
    }

    if config.poll.poll_interval_seconds == 0 {
        return Err("探测间隔不能为0".to_string());
    }

    // 验证Web服务器配置
    if config.server.port == 0 {
        return Err(format!(
            "无效的Web服务器端口: {}，端口不能为0",
            config.server.port
        ));
    }

    if config.server.bind_address.is_empty() {
        return Err("Web服务器绑定地址不能为空".to_string());
    }

    Ok(())
}
