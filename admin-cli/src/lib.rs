//! # Admin CLI
//!
//! 剧本导入管理工具 `play-admin` 的库部分：配置、存储文件和子命令。
//!
//! ## 模块结构
//!
//! - [`config`]：配置文件加载与校验
//! - [`store_file`]：存储的 JSON 持久化
//! - [`commands`]：`import` / `stats` / `check` 子命令

pub mod commands;
pub mod config;
pub mod store_file;

pub use commands::CheckSummary;
pub use config::{AppConfig, ConfigError, LogConfig};
pub use store_file::{StoreFile, StoreFileError};
