//! # 导入状态机
//!
//! 逐行读取剧本，驱动行分类、用户解析、对话创建和消息写入。
//!
//! ## 状态转换
//!
//! ```text
//! ActMarker      → 换人到旁白（写出上一位的对白）→ 清空缓冲 → 新建对话并设为当前
//! SceneMarker    → 换人到旁白 → 缓冲区 := 场标记行
//! SpeakerCue(名) → 换人到该角色 → 清空缓冲
//! StageDirection → 同 SpeakerCue(旁白)
//! Dialogue       → 追加到缓冲区
//! 流结束         → 以当前说话人写出剩余缓冲
//! ```
//!
//! "换人"：当前没有说话人时只解析新说话人；否则先以**被替换的**说话人写出缓冲，
//! 再解析并切换到新说话人。

use std::io::BufRead;

use crate::entity::{ConversationBuilder, EntityResolver, MessageEmitter};
use crate::error::{ImportError, ImportResult};
use crate::model::NARRATOR;
use crate::script::classifier::{LineKind, classify};
use crate::script::state::{
    DeferredMessage, ImportOptions, ImportReport, ParseState, PreludePolicy, Speaker,
};
use crate::store::EntityStore;

/// `DefaultConversation` 策略创建的对话使用的"幕行"
pub const PROLOGUE_ACT_LINE: &str = "PROLOGUE";

/// 剧本导入器
///
/// 一个导入器只做一次导入（[`import`](Self::import) 会消耗它），
/// 用户解析缓存和运行状态都不会泄漏到下一次导入。
pub struct ScriptImporter<'s, S: EntityStore + ?Sized> {
    store: &'s mut S,
    options: ImportOptions,
    resolver: EntityResolver,
    conversations: ConversationBuilder,
    emitter: MessageEmitter,
}

impl<'s, S: EntityStore + ?Sized> ScriptImporter<'s, S> {
    pub fn new(store: &'s mut S, options: ImportOptions) -> Self {
        Self {
            store,
            options,
            resolver: EntityResolver::new(),
            conversations: ConversationBuilder,
            emitter: MessageEmitter,
        }
    }

    /// 导入整个输入流
    ///
    /// 非 UTF-8 字节按替换字符解码，不会中断导入。只含空白的对白行会被忽略，
    /// 不会在消息内容里留下多余的空格。
    ///
    /// 读取失败时立即返回错误，已写入的实体保留在存储中。
    pub fn import<R: BufRead>(mut self, mut reader: R) -> ImportResult<ImportReport> {
        let mut state = ParseState::new(self.options.title_prefix.clone());
        let mut report = ImportReport::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let line_number = state.line_number + 1;
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ImportError::Io {
                    line: line_number,
                    source,
                })?;
            if read == 0 {
                break;
            }

            state.line_number = line_number;
            let line = String::from_utf8_lossy(strip_line_ending(&buf));
            self.step(&mut state, &mut report, &line)?;
        }

        self.finish(&mut state, &mut report)?;

        report.lines_read = state.line_number;
        report.users_resolved = self.resolver.resolved_count();
        report.warnings.extend(self.resolver.take_warnings());
        Ok(report)
    }

    /// 导入字符串
    pub fn import_str(self, text: &str) -> ImportResult<ImportReport> {
        self.import(text.as_bytes())
    }

    /// 处理一行
    fn step(
        &mut self,
        state: &mut ParseState,
        report: &mut ImportReport,
        line: &str,
    ) -> ImportResult<()> {
        match classify(line) {
            LineKind::ActMarker => {
                self.switch_speaker(state, report, NARRATOR)?;
                state.pending.clear();
                let id = self.conversations.start_conversation(
                    &mut *self.store,
                    &mut self.resolver,
                    &state.title_prefix,
                    line,
                )?;
                state.current_conversation = Some(id);
                report.conversations.push(id);
                self.drain_deferred(state, report)?;
            }
            LineKind::SceneMarker => {
                self.switch_speaker(state, report, NARRATOR)?;
                state.pending = line.to_string();
            }
            LineKind::SpeakerCue(name) => {
                self.switch_speaker(state, report, name)?;
                state.pending.clear();
            }
            LineKind::StageDirection => {
                self.switch_speaker(state, report, NARRATOR)?;
                state.pending.clear();
            }
            LineKind::Dialogue => state.append_dialogue(line),
        }
        Ok(())
    }

    /// 换人
    fn switch_speaker(
        &mut self,
        state: &mut ParseState,
        report: &mut ImportReport,
        name: &str,
    ) -> ImportResult<()> {
        if state.current_speaker.is_some() {
            self.flush(state, report)?;
        } else if state.has_pending_text() {
            report.warnings.push(format!(
                "第 {} 行：之前的文本没有说话人，已丢弃: {}",
                state.line_number, state.pending
            ));
        }

        let id = self.resolver.resolve(&mut *self.store, name)?;
        state.current_speaker = Some(Speaker {
            id,
            name: name.to_string(),
        });
        Ok(())
    }

    /// 以当前说话人写出缓冲区
    fn flush(&mut self, state: &mut ParseState, report: &mut ImportReport) -> ImportResult<()> {
        if !state.has_pending_text() {
            return Ok(());
        }

        let Some(speaker) = state.current_speaker.clone() else {
            report.warnings.push(format!(
                "第 {} 行：结尾的文本没有说话人，已丢弃: {}",
                state.line_number, state.pending
            ));
            state.pending.clear();
            return Ok(());
        };

        let conversation = match state.current_conversation {
            Some(conversation) => conversation,
            None => match self.options.prelude_policy {
                PreludePolicy::Reject => {
                    return Err(ImportError::DialogueBeforeAct {
                        line: state.line_number,
                        speaker: speaker.name,
                    });
                }
                PreludePolicy::Defer => {
                    state.deferred.push(DeferredMessage {
                        author: speaker.id,
                        content: std::mem::take(&mut state.pending),
                    });
                    return Ok(());
                }
                PreludePolicy::DefaultConversation => {
                    let id = self.conversations.start_conversation(
                        &mut *self.store,
                        &mut self.resolver,
                        &state.title_prefix,
                        PROLOGUE_ACT_LINE,
                    )?;
                    state.current_conversation = Some(id);
                    report.conversations.push(id);
                    id
                }
            },
        };

        if self
            .emitter
            .flush(&mut *self.store, &mut state.pending, speaker.id, conversation)?
            .is_some()
        {
            report.messages_emitted += 1;
        }
        Ok(())
    }

    /// 把暂存的对白写入刚创建的对话
    fn drain_deferred(
        &mut self,
        state: &mut ParseState,
        report: &mut ImportReport,
    ) -> ImportResult<()> {
        let Some(conversation) = state.current_conversation else {
            return Ok(());
        };

        for mut deferred in std::mem::take(&mut state.deferred) {
            if self
                .emitter
                .flush(
                    &mut *self.store,
                    &mut deferred.content,
                    deferred.author,
                    conversation,
                )?
                .is_some()
            {
                report.messages_emitted += 1;
            }
        }
        Ok(())
    }

    /// 流结束：写出剩余缓冲
    fn finish(&mut self, state: &mut ParseState, report: &mut ImportReport) -> ImportResult<()> {
        self.flush(state, report)?;

        if !state.deferred.is_empty() {
            report.warnings.push(format!(
                "剧本中没有 ACT，{} 条暂存的对白没有可归属的对话，已丢弃",
                state.deferred.len()
            ));
            state.deferred.clear();
        }
        Ok(())
    }
}

/// 去掉行尾的 `\n` 或 `\r\n`
fn strip_line_ending(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

/// 导入输入流的便捷函数
pub fn import_script<S, R>(
    store: &mut S,
    reader: R,
    options: ImportOptions,
) -> ImportResult<ImportReport>
where
    S: EntityStore + ?Sized,
    R: BufRead,
{
    ScriptImporter::new(store, options).import(reader)
}
