//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-core`: 运行 play-import 覆盖率
//! - `script-check`: 检查剧本文件（幕标记、开场对白、疑似误判的 ACT 行）

use std::path::PathBuf;
use std::process::ExitCode;

use admin_cli::commands;
use xshell::{Shell, cmd};

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let sh = Shell::new()?;

            eprintln!("\n==> cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            eprintln!("\n==> cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            eprintln!("\n==> cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        "cov-core" => {
            let sh = Shell::new()?;
            if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_err() {
                anyhow::bail!(
                    "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
                );
            }

            eprintln!("\n==> cargo llvm-cov -p play-import --html");
            cmd!(sh, "cargo llvm-cov -p play-import --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "script-check" => {
            let path = args.next();
            script_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-core        运行 play-import 覆盖率报告
  script-check    检查剧本文件

SCRIPT-CHECK:
  cargo xtask script-check [path]

  不带参数：检查 plays/ 下所有 .txt 文件
  带路径参数：检查指定文件或目录

ALIASES (in .cargo/config.toml):
  cargo check-all    -> cargo xtask check-all
  cargo cov-core     -> cargo xtask cov-core
  cargo script-check -> cargo xtask script-check
"#
    );
}

//=============================================================================
// script-check 命令实现
//=============================================================================

/// 默认剧本目录（相对于 workspace root）
const DEFAULT_PLAYS_DIR: &str = "plays";

/// 执行剧本检查
fn script_check(path: Option<&str>) -> anyhow::Result<()> {
    let path = match path {
        Some(p) => PathBuf::from(p),
        None => {
            let dir = PathBuf::from(DEFAULT_PLAYS_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认剧本目录不存在: {}\n请在 workspace 根目录运行，或指定剧本路径",
                    dir.display()
                );
            }
            dir
        }
    };

    let summary = commands::check(&path)?;
    if summary.scripts_checked == 0 {
        eprintln!("未找到剧本文件（.txt）");
        return Ok(());
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个剧本", summary.scripts_checked);
    eprintln!();

    for diag in &summary.diagnostics.diagnostics {
        eprintln!("{}", diag);
    }

    let error_count = summary.diagnostics.error_count();
    let warn_count = summary.diagnostics.warn_count();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
        anyhow::bail!("剧本检查发现错误");
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }

    Ok(())
}
