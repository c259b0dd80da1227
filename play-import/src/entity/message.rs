//! # 消息写入
//!
//! 把累积的对白写成一条消息。空白缓冲区不产生消息。

use crate::error::StoreError;
use crate::model::{ConversationId, Message, MessageId, UserId};
use crate::store::EntityStore;

/// 消息写入器
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageEmitter;

impl MessageEmitter {
    /// 写出缓冲区
    ///
    /// 缓冲区为空或只有空白时不做任何事，返回 `None`；
    /// 否则写入消息、清空缓冲区，返回消息标识。
    pub fn flush<S>(
        &self,
        store: &mut S,
        buffer: &mut String,
        speaker: UserId,
        conversation: ConversationId,
    ) -> Result<Option<MessageId>, StoreError>
    where
        S: EntityStore + ?Sized,
    {
        if buffer.trim().is_empty() {
            return Ok(None);
        }

        let message = Message::new(conversation, speaker, std::mem::take(buffer));
        let id = message.id;
        store.add_message(message)?;
        Ok(Some(id))
    }
}
