//! # 诊断模块
//!
//! 提供剧本静态检查和诊断 API，不依赖 IO 或存储。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 复用行分类，不重复判断逻辑

use std::collections::BTreeSet;

use crate::script::{LineKind, classify};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 剧本 ID / 文件路径
    pub script_id: String,
    /// 行号（如果可定位，从 1 开始）
    pub line: Option<usize>,
    /// 诊断消息
    pub message: String,
    /// 触发诊断的原始行
    pub source_line: Option<String>,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            script_id: script_id.into(),
            line: None,
            message: message.into(),
            source_line: None,
        }
    }

    /// 创建错误诊断
    pub fn error(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, script_id, message)
    }

    /// 创建警告诊断
    pub fn warn(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, script_id, message)
    }

    /// 创建信息诊断
    pub fn info(script_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, script_id, message)
    }

    /// 设置行号
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// 附上原始行
    pub fn with_source_line(mut self, line: impl Into<String>) -> Self {
        self.source_line = Some(line.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.script_id)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(line) = &self.source_line {
            write!(f, "\n  | {}", line)?;
        }
        Ok(())
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 级别不低于 `min_level` 的诊断
    pub fn at_least(&self, min_level: DiagnosticLevel) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.level >= min_level)
    }
}

//=============================================================================
// 剧本分析 API
//=============================================================================

/// 剧本结构概要
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOutline {
    pub acts: usize,
    pub scenes: usize,
    /// 出现过的角色名（去重、排序）
    pub speakers: BTreeSet<String>,
    /// 第一个幕标记所在行
    pub first_act_line: Option<usize>,
}

/// 统计剧本结构
pub fn outline(text: &str) -> ScriptOutline {
    let mut outline = ScriptOutline::default();

    for (index, line) in text.lines().enumerate() {
        match classify(line) {
            LineKind::ActMarker => {
                outline.acts += 1;
                outline.first_act_line.get_or_insert(index + 1);
            }
            LineKind::SceneMarker => outline.scenes += 1,
            LineKind::SpeakerCue(name) => {
                outline.speakers.insert(name.to_string());
            }
            LineKind::StageDirection | LineKind::Dialogue => {}
        }
    }

    outline
}

/// 分析剧本，返回诊断结果
///
/// 执行以下检查：
/// - 没有任何幕标记（不会创建对话）
/// - 第一个幕标记之前出现角色提示或对白
/// - 行内含 "ACT" 但不以 "ACT" 开头（会被当作幕标记）
pub fn analyze_script(script_id: &str, text: &str) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    let mut seen_act = false;
    let mut reported_prelude = false;

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let kind = classify(line);

        match kind {
            LineKind::ActMarker => {
                if !line.trim_start().starts_with("ACT") {
                    result.push(
                        Diagnostic::warn(script_id, "行内包含 ACT，将被当作幕标记并开启新对话")
                            .with_line(line_number)
                            .with_source_line(line),
                    );
                }
                seen_act = true;
            }
            LineKind::SpeakerCue(_) | LineKind::Dialogue
                if !seen_act && !reported_prelude && !line.trim().is_empty() =>
            {
                result.push(
                    Diagnostic::warn(script_id, "第一个 ACT 之前出现了角色提示或对白")
                        .with_line(line_number)
                        .with_source_line(line),
                );
                reported_prelude = true;
            }
            _ => {}
        }
    }

    let outline = outline(text);
    if outline.acts == 0 {
        result.push(Diagnostic::error(
            script_id,
            "剧本中没有幕标记（ACT），导入时不会创建任何对话",
        ));
    }
    result.push(Diagnostic::info(
        script_id,
        format!(
            "{} 幕, {} 场, {} 个角色",
            outline.acts,
            outline.scenes,
            outline.speakers.len()
        ),
    ));

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(result: &DiagnosticResult) -> String {
        result
            .diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("romandjul.txt", "没有幕标记")
            .with_line(10)
            .with_source_line("ROMEO");

        let display = format!("{}", diag);
        assert!(display.contains("[ERROR]"));
        assert!(display.contains("romandjul.txt:10"));
        assert!(display.contains("没有幕标记"));
        assert!(display.ends_with("\n  | ROMEO"));
    }

    #[test]
    fn test_outline() {
        let text = "ACT I\nSCENE I.\nROMEO\nHi.\nJULIET\nHello.\nROMEO\nACT II\n";
        let outline = outline(text);
        assert_eq!(outline.acts, 2);
        assert_eq!(outline.scenes, 1);
        assert_eq!(outline.first_act_line, Some(1));
        assert_eq!(
            outline.speakers.iter().map(String::as_str).collect::<Vec<_>>(),
            ["JULIET", "ROMEO"]
        );
    }

    #[test]
    fn test_analyze_clean_script() {
        let text = "ACT I\nSCENE I.\nROMEO\nBut soft.\n";
        let result = analyze_script("romandjul.txt", text);

        assert!(!result.has_errors());
        assert_eq!(result.warn_count(), 0);
        insta::assert_snapshot!(render(&result), @"[INFO] romandjul.txt: 1 幕, 1 场, 1 个角色");
    }

    #[test]
    fn test_analyze_script_without_act() {
        let text = "ROMEO\nBut soft.\n";
        let result = analyze_script("notes.txt", text);

        assert!(result.has_errors());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warn_count(), 1);
        insta::assert_snapshot!(render(&result), @r"
        [WARN] notes.txt:1: 第一个 ACT 之前出现了角色提示或对白
          | ROMEO
        [ERROR] notes.txt: 剧本中没有幕标记（ACT），导入时不会创建任何对话
        [INFO] notes.txt: 0 幕, 0 场, 1 个角色
        ");
    }

    #[test]
    fn test_prelude_reported_once() {
        let text = "\nTHE TRAGEDY\nby Shakespeare\nCHORUS\nTwo households\nACT I\n";
        let result = analyze_script("r.txt", text);

        let warns: Vec<_> = result.at_least(DiagnosticLevel::Warn).collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].line, Some(2));
    }

    #[test]
    fn test_embedded_act_is_flagged() {
        let text = "ACT I\nBRUTUS\nThe PACT is sealed.\n";
        let result = analyze_script("julc.txt", text);

        let warns: Vec<_> = result.at_least(DiagnosticLevel::Warn).collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].line, Some(3));
        assert_eq!(warns[0].source_line.as_deref(), Some("The PACT is sealed."));
    }

    #[test]
    fn test_diagnostic_result_merge_and_filter() {
        let mut result = DiagnosticResult::new();
        result.push(Diagnostic::error("a", "错误1"));
        result.push(Diagnostic::warn("a", "警告1"));

        let mut other = DiagnosticResult::new();
        other.push(Diagnostic::info("b", "信息1"));
        result.merge(other);

        assert_eq!(result.at_least(DiagnosticLevel::Error).count(), 1);
        assert_eq!(result.at_least(DiagnosticLevel::Warn).count(), 2);
        assert_eq!(result.at_least(DiagnosticLevel::Info).count(), 3);
        assert!(result.has_errors());
    }
}
