//! # Entity 模块
//!
//! 导入过程中调用的实体服务。它们本身不持有存储，每次调用都显式传入 `&mut` 存储。
//!
//! - [`resolver`]：角色名 → 用户标识，首次出现时创建
//! - [`conversation`]：在幕边界创建对话
//! - [`message`]：把累积的对白写成消息

pub mod conversation;
pub mod message;
pub mod resolver;

pub use conversation::ConversationBuilder;
pub use message::MessageEmitter;
pub use resolver::EntityResolver;
