//! # 子命令实现
//!
//! `import`、`stats`、`check` 三个子命令的逻辑。输出由调用方负责，
//! 这里只返回结果并记录日志。

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use play_import::{
    Diagnostic, DiagnosticResult, ImportOptions, ImportReport, PreludePolicy, ScriptImporter,
    StoreStats, analyze_script,
};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::store_file::StoreFile;

/// 剧本文件扩展名
pub const SCRIPT_EXTENSION: &str = "txt";

/// 导入一个剧本文件
///
/// 未指定标题前缀时使用文件名（不含扩展名）。导入中途失败时，
/// 已写入的用户、对话和消息仍会保存。
pub fn import(
    store_file: &StoreFile,
    script: &Path,
    title: Option<&str>,
    policy: PreludePolicy,
) -> anyhow::Result<ImportReport> {
    let title = match title {
        Some(title) => title.to_string(),
        None => default_title(script)?,
    };

    let file = File::open(script).with_context(|| format!("无法打开剧本: {}", script.display()))?;
    let mut store = store_file.load()?;

    info!(script = ?script, title = %title, policy = %policy, "开始导入剧本");
    let options = ImportOptions::new(title).with_prelude_policy(policy);
    let outcome = ScriptImporter::new(&mut store, options).import(BufReader::new(file));

    let report = match outcome {
        Ok(report) => {
            store_file.save(&store)?;
            report
        }
        Err(e) => {
            if let Err(save_err) = store_file.save(&store) {
                warn!(error = %save_err, "导入失败后保存部分结果也失败");
            }
            return Err(e).with_context(|| format!("导入剧本失败: {}", script.display()));
        }
    };

    for warning in &report.warnings {
        warn!(script = ?script, warning = %warning, "导入警告");
    }
    info!(
        lines = report.lines_read,
        conversations = report.conversations.len(),
        messages = report.messages_emitted,
        users = report.users_resolved,
        "剧本导入完成"
    );

    Ok(report)
}

fn default_title(script: &Path) -> anyhow::Result<String> {
    match script.file_stem() {
        Some(stem) => Ok(stem.to_string_lossy().into_owned()),
        None => bail!("无法从路径推断标题，请使用 --title: {}", script.display()),
    }
}

/// 统计存储
pub fn stats(store_file: &StoreFile) -> anyhow::Result<StoreStats> {
    let store = store_file.load()?;
    Ok(StoreStats::collect(&store))
}

/// 检查结果
#[derive(Debug, Default)]
pub struct CheckSummary {
    pub scripts_checked: usize,
    pub diagnostics: DiagnosticResult,
}

/// 检查剧本文件或目录
///
/// 目录会被递归遍历，只检查 `.txt` 文件。无法读取的文件记为错误，不中断检查。
pub fn check(path: &Path) -> anyhow::Result<CheckSummary> {
    let files = collect_script_files(path)?;
    let mut summary = CheckSummary::default();

    for file in &files {
        let script_id = file.display().to_string();
        summary.scripts_checked += 1;

        match std::fs::read_to_string(file) {
            Ok(content) => {
                debug!(script = %script_id, "检查剧本");
                summary.diagnostics.merge(analyze_script(&script_id, &content));
            }
            Err(e) => {
                summary
                    .diagnostics
                    .push(Diagnostic::error(&script_id, format!("无法读取文件: {e}")));
            }
        }
    }

    info!(
        scripts = summary.scripts_checked,
        errors = summary.diagnostics.error_count(),
        warnings = summary.diagnostics.warn_count(),
        "剧本检查完成"
    );
    Ok(summary)
}

/// 收集要检查的剧本文件（排序）
pub fn collect_script_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("路径不存在: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == SCRIPT_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_title_uses_file_stem() {
        assert_eq!(
            default_title(Path::new("plays/romandjul.txt")).unwrap(),
            "romandjul"
        );
        assert!(default_title(Path::new("/")).is_err());
    }

    #[test]
    fn test_collect_script_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tragedies")).unwrap();
        std::fs::write(dir.path().join("tragedies/hamlet.txt"), "ACT I").unwrap();
        std::fs::write(dir.path().join("allswell.txt"), "ACT I").unwrap();
        std::fs::write(dir.path().join("README.md"), "# plays").unwrap();

        let files = collect_script_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["allswell.txt", "hamlet.txt"]);
    }

    #[test]
    fn test_collect_script_files_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_script_files(&dir.path().join("nope")).is_err());
    }
}
