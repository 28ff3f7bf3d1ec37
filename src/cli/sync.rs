// ============================================================================
// LocaleSync - 同步命令处理
// ============================================================================
//
// 文件: src/cli/sync.rs
// 职责: 处理 sync 命令
// 边界:
//   - ✅ 同步命令参数解析
//   - ✅ 必填配置校验
//   - ✅ 组装表格客户端、翻译目录与进度条
//   - ✅ 结果输出（文本或 JSON）
//   - ❌ 不应包含行/树转换逻辑
//   - ❌ 不应包含 HTTP 细节
//
// ============================================================================

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;

use super::auth::access_token;
use crate::core::locale_files::LocaleFiles;
use crate::core::sheets::GoogleSheetsClient;
use crate::core::sync::SyncRunner;
use crate::models::config::Config;
use crate::models::report::SyncDirection;
use crate::ui::progress::SyncProgress;
use crate::ui::summary::{render_json, render_sync_report};
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 同步命令参数
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// 同步方向 (to-json, to-sheet)
    #[arg(short, long, default_value = "to-json")]
    pub direction: String,

    /// 只显示将要写入的内容，不修改文件或表格
    #[arg(long)]
    pub dry_run: bool,

    /// 输出格式 (table, json)
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// 处理同步命令
pub async fn handle_sync(args: SyncArgs, config: &Config) -> Result<()> {
    let direction = SyncDirection::from_str(&args.direction).map_err(anyhow::Error::msg)?;

    let missing = config.missing_sync_settings();
    if !missing.is_empty() {
        bail!(tf!("sync.missing_settings", missing.join(", ")));
    }

    let json_output = args.format == "json";
    if !json_output {
        Logger::info(tf!("sync.start", direction));
        if args.dry_run {
            Logger::info(t!("sync.dry_run"));
        }
    }

    let files = LocaleFiles::from_config(&config.locales);
    let (message, detail) = match direction {
        SyncDirection::ToJson => (
            t!("sync.progress_fetch"),
            tf!("sync.fetching", config.sheet.id),
        ),
        SyncDirection::ToSheet => (
            t!("sync.progress_update"),
            tf!("sync.reading_files", files.dir().display(), files.layout()),
        ),
    };
    if !json_output {
        Logger::info(detail);
    }

    let token = access_token(config).await?;
    let timeout = Duration::from_secs(config.execution.request_timeout);
    let client = GoogleSheetsClient::new(&config.sheet.id, token, timeout)?;

    let progress = SyncProgress::new(config.output.show_progress && !json_output, message);
    let mut runner = SyncRunner::new(&client, &files)
        .with_max_concurrency(config.max_concurrency())
        .with_dry_run(args.dry_run);
    if let Some(callback) = progress.callback() {
        runner = runner.with_progress_callback(callback);
    }

    let result = runner.run(direction).await;
    progress.finish();
    let report = result?;

    if json_output {
        render_json(&report)?;
    } else {
        render_sync_report(&report, config.output.verbose);
    }
    Ok(())
}
