//! # Play Import
//!
//! 把剧本文本导入为聊天数据模型（用户、对话、消息）的核心库。
//!
//! ## 架构概述
//!
//! `play-import` 是纯逻辑核心，不读写文件、不打日志。
//! 它通过 [`EntityStore`] 与存储交互：
//!
//! ```text
//! 剧本行流 ──► classify ──► ScriptImporter ──► EntityStore
//!                              │  ├─ EntityResolver      add_user
//!                              │  ├─ ConversationBuilder add_conversation
//!                              │  └─ MessageEmitter      add_message
//!                              ▼
//!                         ImportReport
//! ```
//!
//! ## 核心类型
//!
//! - [`ScriptImporter`]：逐行驱动的导入状态机
//! - [`LineKind`]：行分类结果
//! - [`EntityStore`] / [`MemoryStore`]：存储边界与进程内实现
//! - [`User`] / [`Conversation`] / [`Message`]：数据模型
//!
//! ## 使用示例
//!
//! ```ignore
//! use play_import::{ImportOptions, MemoryStore, ScriptImporter};
//!
//! let mut store = MemoryStore::new();
//! let report = ScriptImporter::new(&mut store, ImportOptions::new("R&J"))
//!     .import(reader)?;
//!
//! for warning in &report.warnings {
//!     eprintln!("{warning}");
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`model`]：数据模型
//! - [`store`]：存储边界
//! - [`entity`]：用户解析、对话创建、消息写入
//! - [`script`]：行分类与导入状态机
//! - [`stats`]：存储统计
//! - [`diagnostic`]：剧本静态检查
//! - [`error`]：错误类型定义

pub mod diagnostic;
pub mod entity;
pub mod error;
pub mod model;
pub mod script;
pub mod stats;
pub mod store;

// 重导出核心类型
pub use diagnostic::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, ScriptOutline, analyze_script, outline,
};
pub use entity::{ConversationBuilder, EntityResolver, MessageEmitter};
pub use error::{ImportError, ImportResult, StoreError};
pub use model::{
    Conversation, ConversationId, Message, MessageId, NARRATOR, User, UserId,
};
pub use script::{
    ImportOptions, ImportReport, LineKind, ParseState, PreludePolicy, ScriptImporter, classify,
    import_script,
};
pub use stats::StoreStats;
pub use store::{EntityStore, Lookup, MemoryStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let mut store = MemoryStore::new();
        let options = ImportOptions::new("R&J").with_prelude_policy(PreludePolicy::Defer);
        let report = import_script(&mut store, "ACT I\nROMEO\nHi.".as_bytes(), options).unwrap();

        assert_eq!(report.messages_emitted, 1);
        assert_eq!(classify("ROMEO"), LineKind::SpeakerCue("ROMEO"));
        assert_eq!(StoreStats::collect(&store).num_messages, 1);
        assert!(!analyze_script("r.txt", "ACT I").has_errors());
    }
}
