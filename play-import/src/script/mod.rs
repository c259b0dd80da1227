//! # Script 模块
//!
//! 剧本导入：行分类与导入状态机。
//!
//! ## 模块结构
//!
//! - [`classifier`]：纯函数行分类
//! - [`state`]：导入运行状态、选项与结果
//! - [`importer`]：逐行驱动的导入状态机

pub mod classifier;
pub mod importer;
pub mod state;


pub use classifier::{LineKind, STAGE_DIRECTION_MARKERS, classify, is_all_caps_word, leading_token};
pub use importer::{PROLOGUE_ACT_LINE, ScriptImporter, import_script};
pub use state::{ImportOptions, ImportReport, ParseState, PreludePolicy, Speaker};
