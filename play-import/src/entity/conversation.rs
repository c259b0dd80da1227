//! # 对话创建
//!
//! 每个幕边界创建一个对话，所有者为旁白，标题为 `{前缀}_{ACT 行原文}`。

use crate::entity::resolver::EntityResolver;
use crate::error::StoreError;
use crate::model::{Conversation, ConversationId};
use crate::store::EntityStore;

/// 对话创建器
#[derive(Debug, Default, Clone, Copy)]
pub struct ConversationBuilder;

impl ConversationBuilder {
    /// 拼接对话标题
    pub fn title(title_prefix: &str, raw_act_line: &str) -> String {
        format!("{}_{}", title_prefix, raw_act_line)
    }

    /// 创建并写入新对话，返回其标识
    pub fn start_conversation<S>(
        &self,
        store: &mut S,
        resolver: &mut EntityResolver,
        title_prefix: &str,
        raw_act_line: &str,
    ) -> Result<ConversationId, StoreError>
    where
        S: EntityStore + ?Sized,
    {
        let owner = resolver.resolve_narrator(store)?;
        let conversation = Conversation::new(owner, Self::title(title_prefix, raw_act_line));
        let id = conversation.id;
        store.add_conversation(conversation)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NARRATOR, UserId};
    use crate::store::MemoryStore;

    #[test]
    fn test_title() {
        assert_eq!(ConversationBuilder::title("R&J", "ACT I"), "R&J_ACT I");
        assert_eq!(ConversationBuilder::title("", "ACT I"), "_ACT I");
    }

    #[test]
    fn test_start_conversation_owned_by_narrator() {
        let mut store = MemoryStore::new();
        let mut resolver = EntityResolver::new();

        let id = ConversationBuilder
            .start_conversation(&mut store, &mut resolver, "Tempest", "ACT I")
            .unwrap();

        let conversation = store.conversation(&id).unwrap();
        assert_eq!(conversation.title, "Tempest_ACT I");
        assert_eq!(conversation.owner_id, UserId::from_name(NARRATOR));
        assert!(store.user(&conversation.owner_id).is_some());
    }

    #[test]
    fn test_each_call_creates_a_new_conversation() {
        let mut store = MemoryStore::new();
        let mut resolver = EntityResolver::new();

        let a = ConversationBuilder
            .start_conversation(&mut store, &mut resolver, "JulC", "ACT I")
            .unwrap();
        let b = ConversationBuilder
            .start_conversation(&mut store, &mut resolver, "JulC", "ACT I")
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(store.num_conversations(), 2);
        assert_eq!(store.num_users(), 1);
    }
}
