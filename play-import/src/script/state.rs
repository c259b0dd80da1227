//! # 导入状态
//!
//! 一次导入的全部运行状态都在 [`ParseState`] 里，由导入调用独占，
//! 不跨导入共享，也没有隐式的全局状态。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{ConversationId, UserId};

/// 第一个 ACT 之前出现对白时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreludePolicy {
    /// 直接报错，终止导入
    Reject,
    /// 暂存，等第一个 ACT 创建对话后按原顺序写入；直到结束都没有 ACT 则丢弃
    #[default]
    Defer,
    /// 按需创建一个 `{前缀}_PROLOGUE` 对话
    DefaultConversation,
}

impl fmt::Display for PreludePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Defer => write!(f, "defer"),
            Self::DefaultConversation => write!(f, "default_conversation"),
        }
    }
}

impl FromStr for PreludePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reject" => Ok(Self::Reject),
            "defer" => Ok(Self::Defer),
            "default_conversation" => Ok(Self::DefaultConversation),
            other => Err(format!(
                "未知的策略 '{}'，可选值: reject, defer, default_conversation",
                other
            )),
        }
    }
}

/// 导入选项
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportOptions {
    /// 对话标题前缀（整次导入不变）
    pub title_prefix: String,
    pub prelude_policy: PreludePolicy,
}

impl ImportOptions {
    pub fn new(title_prefix: impl Into<String>) -> Self {
        Self {
            title_prefix: title_prefix.into(),
            prelude_policy: PreludePolicy::default(),
        }
    }

    pub fn with_prelude_policy(mut self, policy: PreludePolicy) -> Self {
        self.prelude_policy = policy;
        self
    }
}

/// 当前说话人
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub id: UserId,
    pub name: String,
}

/// 暂存的对白（还没有对话可归属）
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeferredMessage {
    pub author: UserId,
    pub content: String,
}

/// 导入运行状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseState {
    pub title_prefix: String,
    pub current_speaker: Option<Speaker>,
    pub current_conversation: Option<ConversationId>,
    /// 自上次换人以来累积的对白（可能以场标记行开头）
    pub pending: String,
    /// 已读取的行数（1-based 的当前行号）
    pub line_number: usize,
    pub(crate) deferred: Vec<DeferredMessage>,
}

impl ParseState {
    /// 初始状态：无说话人、无对话、空缓冲区
    pub fn new(title_prefix: impl Into<String>) -> Self {
        Self {
            title_prefix: title_prefix.into(),
            current_speaker: None,
            current_conversation: None,
            pending: String::new(),
            line_number: 0,
            deferred: Vec::new(),
        }
    }

    /// 追加一行对白
    ///
    /// 非空缓冲区与新行之间用一个空格分隔；空白行不改变缓冲区。
    pub fn append_dialogue(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if !self.pending.is_empty() {
            self.pending.push(' ');
        }
        self.pending.push_str(line);
    }

    pub fn has_pending_text(&self) -> bool {
        !self.pending.trim().is_empty()
    }

    /// 暂存的对白条数
    pub fn deferred_count(&self) -> usize {
        self.deferred.len()
    }
}

/// 导入结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// 读取的行数
    pub lines_read: usize,
    /// 本次创建的对话（按创建顺序）
    pub conversations: Vec<ConversationId>,
    /// 本次写入的消息数
    pub messages_emitted: usize,
    /// 本次解析到的不同角色名数量（含旁白）
    pub users_resolved: usize,
    /// 非致命警告
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_dialogue_separator() {
        let mut state = ParseState::new("R&J");
        state.append_dialogue("But soft,");
        state.append_dialogue("what light");
        assert_eq!(state.pending, "But soft, what light");
    }

    #[test]
    fn test_append_dialogue_ignores_blank_lines() {
        let mut state = ParseState::new("R&J");
        state.append_dialogue("");
        assert!(state.pending.is_empty());
        state.append_dialogue("O Romeo");
        state.append_dialogue("   ");
        assert_eq!(state.pending, "O Romeo");
        assert!(state.has_pending_text());
    }

    #[test]
    fn test_initial_state() {
        let state = ParseState::new("Tempest");
        assert_eq!(state.title_prefix, "Tempest");
        assert!(state.current_speaker.is_none());
        assert!(state.current_conversation.is_none());
        assert!(!state.has_pending_text());
        assert_eq!(state.deferred_count(), 0);
    }

    #[test]
    fn test_prelude_policy_parse() {
        assert_eq!("reject".parse(), Ok(PreludePolicy::Reject));
        assert_eq!("Defer".parse(), Ok(PreludePolicy::Defer));
        assert_eq!(
            "default-conversation".parse(),
            Ok(PreludePolicy::DefaultConversation)
        );
        assert!("sometimes".parse::<PreludePolicy>().is_err());
        assert_eq!(PreludePolicy::default(), PreludePolicy::Defer);
    }

    #[test]
    fn test_prelude_policy_display_round_trips() {
        for policy in [
            PreludePolicy::Reject,
            PreludePolicy::Defer,
            PreludePolicy::DefaultConversation,
        ] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }

    #[test]
    fn test_prelude_policy_serde_names() {
        let json = serde_json::to_string(&PreludePolicy::DefaultConversation).unwrap();
        assert_eq!(json, "\"default_conversation\"");
    }
}
