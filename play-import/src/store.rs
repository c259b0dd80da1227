//! # Store 模块
//!
//! 实体存储的边界。
//!
//! 导入器只通过 [`EntityStore`] 与存储交互：按标识查找、追加写入。
//! 查找结果显式区分"找到 / 不存在"（[`Lookup`]）与"后端出错"（`Err`）。
//!
//! [`MemoryStore`] 是进程内实现，按写入顺序保存实体，并可整体序列化为 JSON。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{Conversation, ConversationId, Message, MessageId, User, UserId};

/// 查找结果
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// 实体存在
    Found(T),
    /// 实体不存在
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// 转换为 `Option`
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::NotFound,
        }
    }
}

/// 实体存储
///
/// 三类实体都是只追加的。写入对同一标识是幂等的：重复写入同一标识不会产生副本。
pub trait EntityStore {
    /// 按标识查找用户
    fn find_user(&self, id: &UserId) -> Result<Lookup<User>, StoreError>;

    /// 按标识查找对话
    fn find_conversation(&self, id: &ConversationId) -> Result<Lookup<Conversation>, StoreError>;

    /// 写入用户
    fn add_user(&mut self, user: User) -> Result<(), StoreError>;

    /// 写入对话
    fn add_conversation(&mut self, conversation: Conversation) -> Result<(), StoreError>;

    /// 写入消息
    fn add_message(&mut self, message: Message) -> Result<(), StoreError>;
}

/// 进程内存储
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    users: Vec<User>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,

    #[serde(skip)]
    user_index: HashMap<UserId, usize>,
    #[serde(skip)]
    conversation_index: HashMap<ConversationId, usize>,
    #[serde(skip)]
    message_index: HashMap<MessageId, usize>,
}

impl MemoryStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// 从 JSON 反序列化
    ///
    /// 索引不参与序列化，加载后重建。
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let mut store: Self =
            serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))?;
        store.rebuild_indexes();
        Ok(store)
    }

    fn rebuild_indexes(&mut self) {
        self.user_index = self
            .users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.id, i))
            .collect();
        self.conversation_index = self
            .conversations
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        self.message_index = self
            .messages
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id, i))
            .collect();
    }

    /// 所有用户（按写入顺序）
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// 所有对话（按写入顺序）
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// 所有消息（按写入顺序）
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.user_index.get(id).map(|&i| &self.users[i])
    }

    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversation_index
            .get(id)
            .map(|&i| &self.conversations[i])
    }

    /// 按标题查找对话（重复导入时可能有多个，返回第一个）
    pub fn conversation_by_title(&self, title: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.title == title)
    }

    /// 某个对话内的消息（按写入顺序）
    pub fn messages_in_conversation(&self, id: &ConversationId) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.conversation_id == *id)
            .collect()
    }

    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    pub fn num_conversations(&self) -> usize {
        self.conversations.len()
    }

    pub fn num_messages(&self) -> usize {
        self.messages.len()
    }

    /// 最后写入的用户
    pub fn last_user(&self) -> Option<&User> {
        self.users.last()
    }
}

impl EntityStore for MemoryStore {
    fn find_user(&self, id: &UserId) -> Result<Lookup<User>, StoreError> {
        Ok(self.user(id).cloned().into())
    }

    fn find_conversation(&self, id: &ConversationId) -> Result<Lookup<Conversation>, StoreError> {
        Ok(self.conversation(id).cloned().into())
    }

    fn add_user(&mut self, user: User) -> Result<(), StoreError> {
        if !self.user_index.contains_key(&user.id) {
            self.user_index.insert(user.id, self.users.len());
            self.users.push(user);
        }
        Ok(())
    }

    fn add_conversation(&mut self, conversation: Conversation) -> Result<(), StoreError> {
        if !self.conversation_index.contains_key(&conversation.id) {
            self.conversation_index
                .insert(conversation.id, self.conversations.len());
            self.conversations.push(conversation);
        }
        Ok(())
    }

    fn add_message(&mut self, message: Message) -> Result<(), StoreError> {
        if !self.message_index.contains_key(&message.id) {
            self.message_index.insert(message.id, self.messages.len());
            self.messages.push(message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NARRATOR;

    #[test]
    fn test_add_and_find_user() {
        let mut store = MemoryStore::new();
        let id = UserId::from_name("ROMEO");
        assert_eq!(store.find_user(&id).unwrap(), Lookup::NotFound);

        store.add_user(User::new("ROMEO")).unwrap();
        let found = store.find_user(&id).unwrap().found().unwrap();
        assert_eq!(found.name, "ROMEO");
    }

    #[test]
    fn test_writes_are_idempotent_by_id() {
        let mut store = MemoryStore::new();
        let user = User::new("ROMEO");
        store.add_user(user.clone()).unwrap();
        store.add_user(user).unwrap();
        assert_eq!(store.num_users(), 1);

        let conversation = Conversation::new(UserId::from_name(NARRATOR), "R&J_ACT I");
        store.add_conversation(conversation.clone()).unwrap();
        store.add_conversation(conversation.clone()).unwrap();
        assert_eq!(store.num_conversations(), 1);

        let message = Message::new(conversation.id, UserId::from_name("ROMEO"), "hi");
        store.add_message(message.clone()).unwrap();
        store.add_message(message).unwrap();
        assert_eq!(store.num_messages(), 1);
    }

    #[test]
    fn test_messages_in_conversation() {
        let mut store = MemoryStore::new();
        let narrator = UserId::from_name(NARRATOR);
        let act1 = Conversation::new(narrator, "T_ACT I");
        let act2 = Conversation::new(narrator, "T_ACT II");
        let (id1, id2) = (act1.id, act2.id);
        store.add_conversation(act1).unwrap();
        store.add_conversation(act2).unwrap();

        store.add_message(Message::new(id1, narrator, "a")).unwrap();
        store.add_message(Message::new(id2, narrator, "b")).unwrap();
        store.add_message(Message::new(id1, narrator, "c")).unwrap();

        let contents: Vec<_> = store
            .messages_in_conversation(&id1)
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["a", "c"]);
        assert_eq!(store.conversation_by_title("T_ACT II").unwrap().id, id2);
    }

    #[test]
    fn test_last_user() {
        let mut store = MemoryStore::new();
        assert!(store.last_user().is_none());
        store.add_user(User::new("ROMEO")).unwrap();
        store.add_user(User::new("JULIET")).unwrap();
        assert_eq!(store.last_user().unwrap().name, "JULIET");
    }

    #[test]
    fn test_json_reload_rebuilds_indexes() {
        let mut store = MemoryStore::new();
        store.add_user(User::new("ROMEO")).unwrap();
        let json = store.to_json().unwrap();

        let mut loaded = MemoryStore::from_json(&json).unwrap();
        assert!(
            loaded
                .find_user(&UserId::from_name("ROMEO"))
                .unwrap()
                .is_found()
        );

        // 重建后的索引仍然去重
        loaded.add_user(User::new("ROMEO")).unwrap();
        assert_eq!(loaded.num_users(), 1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = MemoryStore::from_json("not json").unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
