//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lokinet Vitals - Lokinet出口可用性健康检测服务
#[derive(Parser, Debug, Clone)]
#[command(
    name = "lokinet-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "LOKINET_VITALS_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "LOKINET_VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 是否启用详细输出
    #[arg(short, long, help = "启用详细输出")]
    pub verbose: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 跟踪级别
    Trace,
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 启动健康检测服务
    Start {
        /// 探测间隔（秒）
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            help = "相邻两次探测之间的等待时间（秒）",
            env = "LOKINET_VITALS_INTERVAL"
        )]
        interval: Option<u64>,

        /// 最大探测次数
        #[arg(
            long,
            value_name = "COUNT",
            help = "一轮轮询的最大探测次数",
            env = "LOKINET_VITALS_MAX_ATTEMPTS"
        )]
        max_attempts: Option<u32>,

        /// 监听端口
        #[arg(
            short,
            long,
            value_name = "PORT",
            help = "Web服务器监听端口",
            env = "LOKINET_VITALS_PORT"
        )]
        port: Option<u16>,
    },

    /// 执行一轮出口探测并退出
    ///
    /// 出口可用时退出码为0，不可用时退出码为1
    Check {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,

        /// 探测间隔（秒）
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            help = "相邻两次探测之间的等待时间（秒）"
        )]
        interval: Option<u64>,

        /// 最大探测次数
        #[arg(long, value_name = "COUNT", help = "一轮轮询的最大探测次数")]
        max_attempts: Option<u32>,
    },

    /// 初始化配置文件
    Init {
        /// 配置文件路径
        #[arg(
            value_name = "FILE",
            help = "配置文件路径",
            default_value = "config.toml"
        )]
        config_path: PathBuf,

        /// 是否覆盖现有文件
        #[arg(short, long, help = "覆盖现有文件")]
        force: bool,
    },

    /// 验证配置文件
    Validate {
        /// 配置文件路径
        #[arg(value_name = "FILE", help = "配置文件路径")]
        config_path: Option<PathBuf>,

        /// 是否显示详细信息
        #[arg(short, long, help = "显示详细信息")]
        verbose: bool,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl Args {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 是否启用详细输出
    pub fn is_verbose(&self) -> bool {
        self.verbose || matches!(self.log_level, LogLevel::Debug | LogLevel::Trace)
    }
}
