//! 命令行出口探测器实现
//!
//! 通过调用外部命令（默认 `lokinet-vpn --status`）并检查其输出
//! 判断Lokinet出口是否可用

use crate::config::ProbeConfig;
use crate::probe::result::ProbeResult;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as AsyncCommand;

/// 出口路由标记
///
/// 命令输出中出现默认路由（`::/0 via ...`）即认为存在可用出口。
/// 匹配前输出会先转为小写。
pub const EXIT_MARKER: &str = "::/0 via";

/// 判断命令输出中是否包含出口路由标记
///
/// # 参数
/// * `output` - 命令的标准输出内容
///
/// # 返回
/// * `bool` - 是否包含标记
pub fn contains_exit_marker(output: &str) -> bool {
    output.to_lowercase().contains(EXIT_MARKER)
}

/// 出口探测器trait，定义探测接口
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// 执行一次出口探测
    ///
    /// 探测失败不会返回错误，而是以 [`ProbeResult::ProbeError`] 的形式
    /// 出现在返回值中。
    ///
    /// # 返回
    /// * `ProbeResult` - 本次探测结果
    async fn probe(&self) -> ProbeResult;
}

/// 基于外部命令的出口探测器实现
pub struct CommandStatusProbe {
    /// 探测命令
    command: String,
    /// 命令参数
    args: Vec<String>,
    /// 单次探测超时时间（None表示不限制）
    timeout: Option<Duration>,
}

impl CommandStatusProbe {
    /// 创建新的命令探测器
    ///
    /// # 参数
    /// * `command` - 探测命令
    /// * `args` - 命令参数
    ///
    /// # 返回
    /// * `Self` - 探测器实例
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            timeout: None,
        }
    }

    /// 设置单次探测超时时间
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 从探测配置创建探测器
    ///
    /// # 参数
    /// * `config` - 探测配置
    ///
    /// # 返回
    /// * `Self` - 探测器实例
    pub fn from_config(config: &ProbeConfig) -> Self {
        let mut probe = Self::new(config.command.clone(), config.args.clone());
        if let Some(timeout) = config.timeout() {
            probe = probe.with_timeout(timeout);
        }
        probe
    }

    /// 执行探测命令并收集输出
    async fn run_command(&self) -> std::io::Result<std::process::Output> {
        let mut command = AsyncCommand::new(&self.command);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, command.output()).await {
                Ok(result) => result,
                Err(_) => Err(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("超过{}秒未返回", limit.as_secs()),
                )),
            },
            None => command.output().await,
        }
    }

    /// 格式化探测命令的执行错误，使其更加清晰易读
    fn format_probe_error(&self, error: &std::io::Error) -> String {
        match error.kind() {
            std::io::ErrorKind::NotFound => {
                format!("探测命令不存在: {}", self.command)
            }
            std::io::ErrorKind::PermissionDenied => {
                format!("探测命令无执行权限: {}", self.command)
            }
            std::io::ErrorKind::TimedOut => {
                format!("探测命令执行超时: {}", error)
            }
            _ => format!("探测命令执行失败: {}", error),
        }
    }
}

#[async_trait]
impl StatusProbe for CommandStatusProbe {
    async fn probe(&self) -> ProbeResult {
        log::debug!("执行探测命令: {} {}", self.command, self.args.join(" "));

        let output = match self.run_command().await {
            Ok(output) => output,
            Err(e) => {
                return ProbeResult::ProbeError(self.format_probe_error(&e));
            }
        };

        // 判定只依据标准输出内容，退出码不参与判定
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::debug!("探测命令标准错误输出: {}", stderr.trim_end());
        }

        if contains_exit_marker(&stdout) {
            ProbeResult::Healthy
        } else {
            ProbeResult::Unhealthy
        }
    }
}
