//! # Model 模块
//!
//! 聊天数据模型：用户、对话、消息。
//!
//! ## 设计原则
//!
//! - 三种标识各自独立成类型，不会混用
//! - 用户标识由名字确定性派生，同名即同一用户
//! - 对话和消息标识随机生成
//! - 所有数据可序列化

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 旁白用户名
///
/// 旁白拥有所有对话，并承接舞台指示和幕/场切换。
pub const NARRATOR: &str = "NARRATOR";

/// 新建用户的占位凭据
pub const PLACEHOLDER_PASSWORD: &str = "password";

/// 派生用户标识使用的命名空间
const USER_NAMESPACE: Uuid = Uuid::from_u128(0x6f3c_1b2a_9d4e_4c57_8a61_2e0b_7d95_c431);

/// 用户标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// 由显示名派生标识
    ///
    /// 同一名字在任何一次运行中都得到同一标识。
    pub fn from_name(name: &str) -> Self {
        Self(Uuid::new_v3(&USER_NAMESPACE, name.as_bytes()))
    }
}

/// 对话标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(Uuid);

impl ConversationId {
    /// 生成新的随机标识
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

/// 消息标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// 生成新的随机标识
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// 用户
///
/// 创建后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// 显示名（剧本中的角色提示行原文）
    pub name: String,
    /// 占位凭据
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 以当前时间创建用户
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: UserId::from_name(&name),
            name,
            password: PLACEHOLDER_PASSWORD.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// 对话
///
/// 每遇到一个 ACT 创建一次。消息通过 `conversation_id` 反向引用对话。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    /// 所有者（总是旁白）
    pub owner_id: UserId,
    /// 标题：`{前缀}_{ACT 行原文}`
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// 以随机标识和当前时间创建对话
    pub fn new(owner_id: UserId, title: impl Into<String>) -> Self {
        Self {
            id: ConversationId::random(),
            owner_id,
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}

/// 消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// 以随机标识和当前时间创建消息
    pub fn new(
        conversation_id: ConversationId,
        author_id: UserId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::random(),
            conversation_id,
            author_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
