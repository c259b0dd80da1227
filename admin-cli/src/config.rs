//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::{Path, PathBuf};

use play_import::PreludePolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 存储文件路径
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// 第一个 ACT 之前出现对白时的处理策略
    #[serde(default)]
    pub prelude_policy: PreludePolicy,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// 最低日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否输出 ANSI 颜色
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

// 默认值函数
fn default_store_path() -> PathBuf {
    PathBuf::from("data/store.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ansi() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            prelude_policy: PreludePolicy::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            ansi: default_ansi(),
        }
    }
}

impl LogConfig {
    /// 解析日志级别
    pub fn max_level(&self) -> Result<Level, ConfigError> {
        self.level
            .parse()
            .map_err(|_| ConfigError::ValidationFailed(format!("无效的日志级别: {}", self.level)))
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 文件不存在时返回 `Ok(None)`，由调用方决定是否使用默认配置。
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;
        Ok(Some(config))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "必须配置 store_path（存储文件路径）".to_string(),
            ));
        }

        self.log.max_level()?;

        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store_path, PathBuf::from("data/store.json"));
        assert_eq!(config.prelude_policy, PreludePolicy::Defer);
        assert_eq!(config.log.max_level(), Ok(Level::INFO));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "prelude_policy": "reject", "log": { "ansi": false } }"#)
                .unwrap();
        assert_eq!(config.prelude_policy, PreludePolicy::Reject);
        assert_eq!(config.store_path, PathBuf::from("data/store.json"));
        assert_eq!(config.log.level, "info");
        assert!(!config.log.ansi);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.log.level = "loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));

        config.log.level = "debug".to_string();
        config.store_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert_eq!(AppConfig::load(&path), Ok(None));

        let mut config = AppConfig::default();
        config.prelude_policy = PreludePolicy::DefaultConversation;
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path), Ok(Some(config)));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::SerializationFailed(_))
        ));
    }
}
