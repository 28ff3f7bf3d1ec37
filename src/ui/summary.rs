// ============================================================================
// LocaleSync - 同步结果汇总组件
// ============================================================================
//
// 文件: src/ui/summary.rs
// 职责: 同步结果汇总显示
// 边界:
//   - ✅ 汇总统计格式化输出
//   - ✅ 警告列表显示
//   - ✅ JSON 格式输出
//   - ✅ 国际化文本支持
//   - ❌ 不应包含同步执行逻辑
//   - ❌ 不应包含文件操作
//
// ============================================================================

use anyhow::Result;
use std::io::{self, Write};

use crate::core::diagnostics::SyncWarning;
use crate::models::report::{SyncDirection, SyncReport};
use crate::utils::colors::Colors;
use crate::utils::constants::icons;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 渲染同步汇总
pub fn render_sync_report(report: &SyncReport, verbose: bool) {
    if report.is_noop() {
        Logger::warn(t!("summary.nothing"));
        return;
    }

    let informational = report.warnings.iter().filter(|w| w.is_informational()).count();
    let attention = report.warnings.len() - informational;

    let mut lines = vec![
        "".to_string(),
        Colors::bold(&t!("summary.title")),
        "═══════════════════════════════════════".to_string(),
        format!(
            "{} {}",
            icons::ARROW,
            tf!("summary.direction", direction_label(report.direction))
        ),
        format!(
            "{} {}",
            icons::SHEET,
            tf!("summary.categories", report.categories.len())
        ),
        format!(
            "{} {}",
            icons::LANGUAGE,
            tf!("summary.languages", report.languages().join(", "))
        ),
        format!("{} {}", icons::SUMMARY, tf!("summary.rows", report.total_rows())),
    ];

    lines.push(match (report.direction, report.dry_run) {
        (SyncDirection::ToJson, false) => format!(
            "{} {}",
            icons::FILE,
            tf!("summary.files_written", report.files.len())
        ),
        (SyncDirection::ToJson, true) => format!(
            "{} {}",
            icons::SKIP,
            tf!("summary.files_planned", report.files.len())
        ),
        (SyncDirection::ToSheet, false) => format!(
            "{} {}",
            icons::SHEET,
            tf!("summary.sheets_written", report.sheets.len())
        ),
        (SyncDirection::ToSheet, true) => format!(
            "{} {}",
            icons::SKIP,
            tf!("summary.sheets_planned", report.sheets.len())
        ),
    });

    let warning_icon = if attention > 0 { icons::WARNING } else { icons::SUCCESS };
    lines.push(format!("{} {}", warning_icon, tf!("summary.warnings", attention)));
    if informational > 0 {
        lines.push(format!(
            "{} {}",
            icons::SKIP,
            tf!("summary.notices", informational)
        ));
    }
    lines.push(format!(
        "{} {}",
        icons::TIME,
        tf!("summary.duration", report.duration_ms as f64 / 1000.0)
    ));

    for line in lines {
        Logger::info(line);
    }

    if verbose {
        render_categories(report);
    }
    render_warnings(&report.warnings, verbose);

    let _ = io::stdout().flush();
}

/// 以 JSON 输出汇总
pub fn render_json(report: &SyncReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    println!("{}", json_output);
    Ok(())
}

fn render_categories(report: &SyncReport) {
    Logger::info("───────────────────────────────────────");
    for category in &report.categories {
        Logger::info(tf!(
            "summary.category_line",
            Colors::info(&category.category),
            category.rows,
            category.languages.join(", ")
        ));
    }
    for path in &report.files {
        Logger::info(format!("  {} {}", icons::FILE, Colors::dim(&path.display().to_string())));
    }
}

/// 显示警告详情；提示类警告只在详细模式下显示
fn render_warnings(warnings: &[SyncWarning], verbose: bool) {
    let shown: Vec<&SyncWarning> = warnings
        .iter()
        .filter(|w| verbose || !w.is_informational())
        .collect();
    if shown.is_empty() {
        return;
    }

    Logger::info("");
    Logger::warn(t!("summary.warning_details"));
    for warning in shown {
        Logger::warn(format!("  {} [{}] {}", icons::WARNING, warning.kind(), warning));
    }
}

fn direction_label(direction: SyncDirection) -> &'static str {
    match direction {
        SyncDirection::ToJson => "sheet → json",
        SyncDirection::ToSheet => "json → sheet",
    }
}
