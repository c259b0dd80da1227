//! # 统计模块
//!
//! 管理页展示用的存储统计：各类实体数量、最新用户、最活跃用户。

use std::collections::HashMap;
use std::fmt;

use crate::model::UserId;
use crate::store::MemoryStore;

/// 存储统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub num_users: usize,
    pub num_conversations: usize,
    pub num_messages: usize,
    /// 最后注册的用户名
    pub newest_user: Option<String>,
    /// 发言最多的用户名
    pub most_active_user: Option<String>,
}

impl StoreStats {
    /// 统计存储
    pub fn collect(store: &MemoryStore) -> Self {
        Self {
            num_users: store.num_users(),
            num_conversations: store.num_conversations(),
            num_messages: store.num_messages(),
            newest_user: store.last_user().map(|u| u.name.clone()),
            most_active_user: most_active_user(store)
                .and_then(|id| store.user(&id))
                .map(|u| u.name.clone()),
        }
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "用户数: {}", self.num_users)?;
        writeln!(f, "对话数: {}", self.num_conversations)?;
        writeln!(f, "消息数: {}", self.num_messages)?;
        writeln!(
            f,
            "最新用户: {}",
            self.newest_user.as_deref().unwrap_or("-")
        )?;
        write!(
            f,
            "最活跃用户: {}",
            self.most_active_user.as_deref().unwrap_or("-")
        )
    }
}

/// 发言最多的用户
///
/// 按对话顺序逐条计数；并列时取最先达到最大值的用户。没有消息时返回 `None`。
pub fn most_active_user(store: &MemoryStore) -> Option<UserId> {
    let mut counts: HashMap<UserId, usize> = HashMap::new();
    let mut best: Option<(UserId, usize)> = None;

    for conversation in store.conversations() {
        for message in store.messages_in_conversation(&conversation.id) {
            let count = counts.entry(message.author_id).or_insert(0);
            *count += 1;
            if best.is_none_or(|(_, max)| *count > max) {
                best = Some((message.author_id, *count));
            }
        }
    }

    best.map(|(id, _)| id)
}
