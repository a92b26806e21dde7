//! Lokinet Vitals 主程序入口
//!
//! Lokinet出口可用性检测服务

use anyhow::{Context, Result};
use lokinet_vitals::cli::args::{Args, Commands};
use lokinet_vitals::cli::commands::{
    CheckCommand, Command, InitCommand, ValidateCommand, VersionCommand,
};
use lokinet_vitals::config::{load_config_or_default, validate_config, Config};
use lokinet_vitals::logging::{LogConfig, LoggingSystem};
use lokinet_vitals::probe::{CommandStatusProbe, HealthPoller};
use lokinet_vitals::web::WebServer;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 初始化日志系统，--verbose 至少提升到debug级别
    let mut log_level: log::LevelFilter = args.log_level.clone().into();
    if args.is_verbose() {
        log_level = log_level.max(log::LevelFilter::Debug);
    }

    let log_config = LogConfig {
        level: log_level,
        console: true,
        json_format: false,
        ..Default::default()
    };

    LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("Lokinet Vitals v{} 启动", lokinet_vitals::VERSION);

    // 执行命令
    if let Err(e) = execute_command(&args).await {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 执行CLI命令
async fn execute_command(args: &Args) -> Result<()> {
    match &args.command {
        Commands::Start {
            interval,
            max_attempts,
            port,
        } => execute_start_command(args, *interval, *max_attempts, *port).await,
        Commands::Check { .. } => {
            let command = CheckCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Init { .. } => {
            let command = InitCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Validate { .. } => {
            let command = ValidateCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Version { .. } => {
            let command = VersionCommand;
            command.execute(args).await.map_err(|e| anyhow::anyhow!(e))
        }
    }
}

/// 执行启动命令
///
/// 启动Web服务器并阻塞运行，直到收到中断信号。
async fn execute_start_command(
    args: &Args,
    interval: Option<u64>,
    max_attempts: Option<u32>,
    port: Option<u16>,
) -> Result<()> {
    info!("启动出口可用性服务...");

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    // 设置Ctrl+C信号处理
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("收到中断信号，正在停止服务...");
                let _ = shutdown_tx_clone.send(());
            }
            Err(err) => {
                error!("监听中断信号失败: {}", err);
            }
        }
    });

    // 1. 加载和验证配置
    let config = load_and_validate_config(args, interval, max_attempts, port).await?;

    // 2. 创建探测器和轮询器
    let probe = Arc::new(CommandStatusProbe::from_config(&config.probe));
    let poller = Arc::new(HealthPoller::new(probe, config.poll.clone()));

    info!(
        "轮询策略: 最多{}次探测，间隔{}秒",
        config.poll.max_attempts, config.poll.poll_interval_seconds
    );

    // 3. 启动Web服务器，阻塞直到收到关闭信号
    let server = WebServer::new(config.server.clone(), poller);
    server
        .start(shutdown_rx)
        .await
        .context("Web服务器运行失败")?;

    info!("服务已停止");
    Ok(())
}

/// 加载和验证配置
///
/// 从配置文件加载配置（文件不存在时使用内置默认值），并应用命令行参数覆盖。
///
/// # 参数
///
/// * `args` - 命令行参数，包含配置文件路径
/// * `interval` - 可选的探测间隔覆盖值（秒）
/// * `max_attempts` - 可选的最大探测次数覆盖值
/// * `port` - 可选的Web服务器端口覆盖值
///
/// # 返回值
///
/// 返回加载并验证后的配置对象。
async fn load_and_validate_config(
    args: &Args,
    interval: Option<u64>,
    max_attempts: Option<u32>,
    port: Option<u16>,
) -> Result<Config> {
    let mut config = load_config_or_default(args.config.as_deref())
        .await
        .context("加载配置失败")?;

    // 应用命令行参数覆盖
    if let Some(interval_secs) = interval {
        config.poll.poll_interval_seconds = interval_secs;
    }
    if let Some(attempts) = max_attempts {
        config.poll.max_attempts = attempts;
    }
    if let Some(port_override) = port {
        config.server.port = port_override;
    }

    // 覆盖后重新验证
    validate_config(&config).map_err(|e| anyhow::anyhow!("配置验证失败: {}", e))?;

    info!(
        "配置加载完成: 探测命令 {} {}",
        config.probe.command,
        config.probe.args.join(" ")
    );
    Ok(config)
}
