//! 错误处理模块
//!
//! 定义应用程序的统一错误类型。
//!
//! 注意：探测层的失败（外部命令不存在、执行异常、输出中无可用出口标记）
//! 不属于这里的错误类型，它们在探测器内部被吸收为 [`crate::probe::ProbeResult`]
//! 的值，永远不会作为错误向上传播。

use thiserror::Error;

/// Lokinet Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum LokinetVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// Web服务器错误
    #[error("Web服务器错误: {0}")]
    Server(String),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, LokinetVitalsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::FileNotFound {
            path: "/etc/lokinet-vitals/config.toml".to_string(),
        };
        assert!(error.to_string().contains("/etc/lokinet-vitals/config.toml"));

        let error = ConfigError::ValidationError("轮询次数不能为0".to_string());
        assert!(error.to_string().contains("轮询次数不能为0"));
    }

    #[test]
    fn test_error_conversion() {
        let config_error = ConfigError::ParseError("无效的TOML".to_string());
        let app_error: LokinetVitalsError = config_error.into();
        assert!(matches!(app_error, LokinetVitalsError::Config(_)));

        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_error: LokinetVitalsError = io_error.into();
        assert!(matches!(app_error, LokinetVitalsError::Io(_)));
    }
}
