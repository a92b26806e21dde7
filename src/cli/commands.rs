//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat};
use crate::config::{
    get_default_config_path, load_config_or_default, validate_config, ConfigLoader,
    TomlConfigLoader,
};
use crate::error::{ConfigError, Result};
use crate::probe::{CommandStatusProbe, HealthPoller};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// 默认配置文件模板
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Lokinet Vitals 配置文件

[global]
# 日志级别: trace, debug, info, warn, error
log_level = "info"

[probe]
# 出口探测命令及参数
command = "lokinet-vpn"
args = ["--status"]
# 单次探测超时时间（秒），注释掉表示不限制
# timeout_seconds = 30

[poll]
# 一轮轮询的最大探测次数
max_attempts = 6
# 相邻两次探测之间的等待时间（秒）
poll_interval_seconds = 10

[server]
# Web服务器绑定地址和端口
bind_address = "0.0.0.0"
port = 5000
# 是否启用CORS
cors_enabled = false
"#;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Version { format } = &args.command {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                OutputFormat::Text => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}

/// 初始化命令
pub struct InitCommand;

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Init { config_path, force } = &args.command {
            self.create_config_file(config_path, *force).await
        } else {
            Ok(())
        }
    }
}

impl InitCommand {
    /// 创建配置文件
    async fn create_config_file(&self, config_path: &Path, force: bool) -> Result<()> {
        // 检查文件是否已存在
        if config_path.exists() && !force {
            eprintln!("配置文件已存在: {}", config_path.display());
            eprintln!("使用 --force 参数覆盖现有文件");
            return Ok(());
        }

        // 创建目录（如果不存在）
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // 写入配置文件
        tokio::fs::write(config_path, DEFAULT_CONFIG_TEMPLATE).await?;

        println!("配置文件已创建: {}", config_path.display());
        println!("请根据实际环境调整探测命令和轮询策略");

        Ok(())
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Validate {
            config_path,
            verbose,
        } = &args.command
        {
            let config_file = config_path
                .clone()
                .or_else(|| args.config.clone())
                .unwrap_or_else(get_default_config_path);

            self.validate_config_file(&config_file, *verbose).await
        } else {
            Ok(())
        }
    }
}

impl ValidateCommand {
    /// 验证配置文件
    async fn validate_config_file(&self, config_path: &Path, verbose: bool) -> Result<()> {
        println!("验证配置文件: {}", config_path.display());

        // 加载配置
        let loader = TomlConfigLoader::new(true);
        let config = loader.load_from_file(config_path).await?;

        if verbose {
            println!("配置验证通过！");
            println!("全局配置:");
            println!("  日志级别: {}", config.global.log_level);

            println!("探测配置:");
            println!(
                "  探测命令: {} {}",
                config.probe.command,
                config.probe.args.join(" ")
            );
            match config.probe.timeout_seconds {
                Some(timeout) => println!("  探测超时: {}秒", timeout),
                None => println!("  探测超时: 不限制"),
            }

            println!("轮询策略:");
            println!("  最大探测次数: {}", config.poll.max_attempts);
            println!("  探测间隔: {}秒", config.poll.poll_interval_seconds);

            println!("Web服务器:");
            println!(
                "  监听地址: {}:{}",
                config.server.bind_address, config.server.port
            );
            println!(
                "  CORS: {}",
                if config.server.cors_enabled {
                    "启用"
                } else {
                    "禁用"
                }
            );
        } else {
            println!("✓ 配置文件验证通过");
        }

        Ok(())
    }
}

/// 检测命令
///
/// 执行一轮完整的出口轮询并输出结果。出口可用时进程退出码为0，
/// 不可用时为1，便于脚本和自动化工具判断。
pub struct CheckCommand;

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Check {
            format,
            interval,
            max_attempts,
        } = &args.command
        {
            self.perform_poll(args, format, *interval, *max_attempts)
                .await
        } else {
            Ok(())
        }
    }
}

impl CheckCommand {
    /// 执行一轮出口轮询
    async fn perform_poll(
        &self,
        args: &Args,
        format: &OutputFormat,
        interval: Option<u64>,
        max_attempts: Option<u32>,
    ) -> Result<()> {
        // 加载配置
        let mut config = load_config_or_default(args.config.as_deref()).await?;

        // 应用命令行参数覆盖
        if let Some(interval_secs) = interval {
            config.poll.poll_interval_seconds = interval_secs;
        }
        if let Some(attempts) = max_attempts {
            config.poll.max_attempts = attempts;
        }

        // 覆盖后重新验证
        validate_config(&config).map_err(ConfigError::ValidationError)?;

        // 创建探测器和轮询器
        let probe = Arc::new(CommandStatusProbe::from_config(&config.probe));
        let poller = HealthPoller::new(probe, config.poll.clone());

        println!("开始出口探测...");
        let report = poller.poll_detailed().await;

        // 输出结果
        match format {
            OutputFormat::Json => {
                println!("{}", report.to_json()?);
            }
            OutputFormat::Text => {
                let status_icon = if report.outcome.is_available() {
                    "✓"
                } else {
                    "✗"
                };
                println!(
                    "{} 出口{} - {}次探测，耗时{}毫秒",
                    status_icon,
                    report.outcome,
                    report.attempts,
                    report.elapsed_ms()
                );
            }
        }

        // 出口不可用时以非零退出码结束
        if !report.outcome.is_available() {
            std::process::exit(1);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_default_template_parses_and_validates() {
        let config: Config =
            toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("默认配置模板解析失败");

        assert!(validate_config(&config).is_ok());
        assert_eq!(config.probe.command, "lokinet-vpn");
        assert_eq!(config.probe.args, vec!["--status".to_string()]);
        assert_eq!(config.poll.max_attempts, 6);
        assert_eq!(config.poll.poll_interval_seconds, 10);
        assert_eq!(config.server.port, 5000);
    }

    #[tokio::test]
    async fn test_init_creates_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let command = InitCommand;
        command
            .create_config_file(&config_path, false)
            .await
            .unwrap();

        assert!(config_path.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.poll.max_attempts, 6);
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite_without_force() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        std::fs::write(&config_path, "# 已有内容").unwrap();

        let command = InitCommand;
        command
            .create_config_file(&config_path, false)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, "# 已有内容");

        // 使用force后覆盖
        command
            .create_config_file(&config_path, true)
            .await
            .unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("lokinet-vpn"));
    }
}
