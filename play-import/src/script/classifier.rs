//! # 行分类
//!
//! 纯函数：一行原文 → 行类型。对任何输入都有结果，不会失败。
//!
//! ## 规则
//!
//! ```text
//! 首词：行内含 "ACT" → "ACT"；否则取第一个空格之前的部分（无空格则整行）
//!
//! 首词为全大写单词（全部是大写字母，且至少 2 个字符）：
//!   "ACT"   → ActMarker
//!   "SCENE" → SceneMarker
//!   其他    → SpeakerCue（名字取整行）
//! 否则：
//!   首词是舞台指示标记 → StageDirection
//!   其他              → Dialogue
//! ```

/// 舞台指示标记（首词完全匹配）
pub const STAGE_DIRECTION_MARKERS: [&str; 4] = ["**Exit", "Enter", "**Exeunt", "Re-enter"];

const ACT_TOKEN: &str = "ACT";
const SCENE_TOKEN: &str = "SCENE";

/// 行类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// 幕标记，开启新对话
    ActMarker,
    /// 场标记
    SceneMarker,
    /// 角色提示行，携带完整行作为角色名
    SpeakerCue(&'a str),
    /// 舞台指示（入场 / 退场）
    StageDirection,
    /// 普通对白，续接到当前说话人
    Dialogue,
}

impl LineKind<'_> {
    /// 是否为提示行（首词全大写）
    pub fn is_cue(&self) -> bool {
        matches!(
            self,
            Self::ActMarker | Self::SceneMarker | Self::SpeakerCue(_)
        )
    }
}

/// 提取首词
pub fn leading_token(line: &str) -> &str {
    if line.contains(ACT_TOKEN) {
        return ACT_TOKEN;
    }
    match line.find(' ') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// 判断是否为全大写单词
///
/// 每个字符都必须是字母且为大写，长度至少为 2。
pub fn is_all_caps_word(token: &str) -> bool {
    token.chars().count() >= 2
        && token
            .chars()
            .all(|c| c.is_alphabetic() && c.is_uppercase())
}

/// 分类一行
pub fn classify(line: &str) -> LineKind<'_> {
    let token = leading_token(line);

    if is_all_caps_word(token) {
        return match token {
            ACT_TOKEN => LineKind::ActMarker,
            SCENE_TOKEN => LineKind::SceneMarker,
            _ => LineKind::SpeakerCue(line),
        };
    }

    if STAGE_DIRECTION_MARKERS.iter().any(|marker| *marker == token) {
        LineKind::StageDirection
    } else {
        LineKind::Dialogue
    }
}
