//! # play-admin
//!
//! 剧本导入管理工具。
//!
//! ## 用法
//!
//! ```bash
//! play-admin import plays/romandjul.txt --title "R&J"
//! play-admin --policy default-conversation import plays/tempest.txt
//! play-admin stats
//! play-admin check plays/
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use admin_cli::{AppConfig, StoreFile, commands};
use clap::{Parser, Subcommand};
use play_import::{DiagnosticLevel, PreludePolicy};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "play-admin")]
#[command(about = "剧本导入管理工具 - 把剧本导入为用户、对话和消息")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件（默认：config.json，不存在时使用默认配置）
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// 存储文件（覆盖配置文件中的 store_path）
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// 开场对白策略：reject / defer / default-conversation
    #[arg(short, long, global = true)]
    policy: Option<PreludePolicy>,
}

#[derive(Subcommand)]
enum Commands {
    /// 导入剧本
    Import {
        /// 剧本文件路径
        script: PathBuf,

        /// 对话标题前缀（默认：文件名）
        #[arg(short, long)]
        title: Option<String>,
    },

    /// 显示存储统计
    Stats,

    /// 检查剧本文件或目录
    Check {
        /// 文件或目录（默认：当前目录）
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("play-admin error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load(&cli.config)?;
    let from_file = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    if let Some(policy) = cli.policy {
        config.prelude_policy = policy;
    }
    config.validate()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log.max_level()?)
        .with_ansi(config.log.ansi)
        .with_writer(std::io::stderr)
        .init();

    if from_file {
        info!(path = ?cli.config, "配置加载成功");
    } else {
        debug!(path = ?cli.config, "配置文件不存在，使用默认配置");
    }

    let store_file = StoreFile::new(&config.store_path);

    match cli.command {
        Commands::Import { script, title } => {
            let report =
                commands::import(&store_file, &script, title.as_deref(), config.prelude_policy)?;
            println!(
                "导入完成: {} 行, {} 个对话, {} 条消息, {} 个角色, {} 条警告",
                report.lines_read,
                report.conversations.len(),
                report.messages_emitted,
                report.users_resolved,
                report.warnings.len()
            );
        }
        Commands::Stats => {
            let stats = commands::stats(&store_file)?;
            println!("{stats}");
        }
        Commands::Check { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from("."));
            let summary = commands::check(&path)?;

            for diag in summary.diagnostics.at_least(DiagnosticLevel::Warn) {
                println!("{diag}");
            }

            println!(
                "检查完成: {} 个剧本, {} 个错误, {} 个警告",
                summary.scripts_checked,
                summary.diagnostics.error_count(),
                summary.diagnostics.warn_count()
            );
            if summary.diagnostics.has_errors() {
                anyhow::bail!("剧本检查发现错误");
            }
        }
    }

    Ok(())
}
