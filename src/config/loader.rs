//! 配置加载器实现
//!
//! 提供TOML配置文件解析、环境变量替换和错误处理功能

use crate::config::types::{validate_config, Config};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config>;

    /// 从字符串加载配置
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_string(&self, content: &str) -> Result<Config>;

    /// 验证配置
    ///
    /// # 参数
    /// * `config` - 要验证的配置
    ///
    /// # 返回
    /// * `Result<()>` - 验证结果
    fn validate(&self, config: &Config) -> Result<()>;
}

/// TOML配置加载器实现
#[derive(Debug, Clone)]
pub struct TomlConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl TomlConfigLoader {
    /// 创建新的TOML配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    ///
    /// # 返回
    /// * `Self` - 配置加载器实例
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的环境变量
    ///
    /// # 参数
    /// * `content` - 要处理的字符串
    ///
    /// # 返回
    /// * `Result<String>` - 替换后的字符串或错误
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        // 匹配 ${VAR_NAME} 格式的环境变量
        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析TOML内容
    ///
    /// # 参数
    /// * `content` - TOML内容
    ///
    /// # 返回
    /// * `Result<Config>` - 解析的配置或错误
    fn parse_toml(&self, content: &str) -> Result<Config> {
        // 替换环境变量
        let processed_content = self.substitute_env_vars(content)?;

        // 解析TOML
        let config: Config = toml::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e)))?;

        Ok(config)
    }
}

#[async_trait]
impl ConfigLoader for TomlConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();

        // 检查文件是否存在
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        // 读取文件内容
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        // 解析配置
        let config = self.parse_toml(&content)?;

        // 验证配置
        self.validate(&config)?;

        log::info!("成功加载配置文件: {}", path.display());
        log::debug!("配置内容: {:?}", config);

        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<Config> {
        // 解析配置
        let config = self.parse_toml(content)?;

        // 验证配置
        self.validate(&config)?;

        log::debug!("成功解析配置字符串");

        Ok(config)
    }

    fn validate(&self, config: &Config) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

/// 加载配置，未指定路径时回退到默认配置
///
/// 路径处理规则：
/// * 显式指定的路径必须存在，文件缺失时返回 [`ConfigError::FileNotFound`]
/// * 未指定路径时尝试默认路径，文件缺失则使用内置默认配置
///
/// # 参数
/// * `path` - 显式指定的配置文件路径（可选）
///
/// # 返回
/// * `Result<Config>` - 加载的配置或错误
pub async fn load_config_or_default(path: Option<&Path>) -> Result<Config> {
    let loader = TomlConfigLoader::new(true);

    match path {
        Some(explicit) => loader.load_from_file(explicit).await,
        None => {
            let default_path = get_default_config_path();
            if default_path.exists() {
                loader.load_from_file(&default_path).await
            } else {
                log::info!(
                    "未找到配置文件 {}，使用内置默认配置",
                    default_path.display()
                );
                Ok(Config::default())
            }
        }
    }
}

/// 获取默认配置文件路径
pub fn get_default_config_path() -> std::path::PathBuf {
    #[cfg(unix)]
    {
        // Linux/macOS: 先检测当前目录是否存在config.toml，
        // 不存在则检测~/.config/lokinet-vitals/config.toml
        if std::path::Path::new("config.toml").exists() {
            std::path::PathBuf::from("config.toml")
        } else {
            dirs::config_dir()
                .map(|config_dir| config_dir.join("lokinet-vitals").join("config.toml"))
                .unwrap_or_else(|| std::path::PathBuf::from("config.toml"))
        }
    }

    #[cfg(not(unix))]
    {
        // Windows: %APPDATA%\lokinet-vitals\config.toml
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("lokinet-vitals").join("config.toml")
        } else {
            std::path::PathBuf::from("config.toml")
        }
    }
}
