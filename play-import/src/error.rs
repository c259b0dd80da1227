//! # Error 模块
//!
//! 定义 play-import 中使用的错误类型。

use thiserror::Error;

/// 存储错误
///
/// 由 [`EntityStore`](crate::store::EntityStore) 的实现返回，表示后端本身出了问题
/// （而不是"实体不存在"，后者用 [`Lookup::NotFound`](crate::store::Lookup) 表达）。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// 后端访问失败
    #[error("存储后端错误: {message}")]
    Backend { message: String },

    /// 序列化 / 反序列化失败
    #[error("存储序列化失败: {0}")]
    Serialization(String),
}

impl StoreError {
    /// 创建后端错误
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// 导入错误
#[derive(Error, Debug)]
pub enum ImportError {
    /// 输入流读取失败（致命，已写入的实体不会回滚）
    #[error("第 {line} 行：读取输入流失败")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// 第一个 ACT 之前出现了需要落库的对白
    #[error("第 {line} 行：'{speaker}' 的对白出现在第一个 ACT 之前，没有可归属的对话")]
    DialogueBeforeAct { line: usize, speaker: String },

    /// 存储写入失败
    #[error("存储写入失败: {0}")]
    Store(#[from] StoreError),
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
