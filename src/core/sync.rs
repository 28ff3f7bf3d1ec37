// ============================================================================
// LocaleSync - 同步执行器
// ============================================================================
//
// 文件: src/core/sync.rs
// 职责: 串联表格后端、行/树转换和本地文件，完成一次同步
// 边界:
//   - ✅ 表格 → JSON：并发拉取标签页，构建树并写入文件
//   - ✅ JSON → 表格：读取文件，展平后逐个覆盖标签页
//   - ✅ 演练模式（不写入任何目标）
//   - ✅ 进度回调与结果汇总
//   - ❌ 不应包含授权流程
//   - ❌ 不应包含终端渲染
//
// ============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};

use super::builder::build_from_grids;
use super::diagnostics::Diagnostics;
use super::flattener::flatten;
use super::locale_files::LocaleFiles;
use super::sheets::SheetBackend;
use crate::models::report::{CategorySummary, SyncDirection, SyncReport};
use crate::models::table::{RowTable, SheetGrid};

/// 进度回调函数类型 (已完成, 总数)
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// 同步执行器
pub struct SyncRunner<'a, B> {
    backend: &'a B,
    files: &'a LocaleFiles,
    max_concurrency: usize,
    dry_run: bool,
    progress_callback: Option<ProgressCallback>,
}

impl<'a, B: SheetBackend> SyncRunner<'a, B> {
    pub fn new(backend: &'a B, files: &'a LocaleFiles) -> Self {
        Self {
            backend,
            files,
            max_concurrency: 1,
            dry_run: false,
            progress_callback: None,
        }
    }

    /// 设置同时拉取的标签页数量
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// 设置演练模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 设置进度回调函数
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn run(&self, direction: SyncDirection) -> Result<SyncReport> {
        match direction {
            SyncDirection::ToJson => self.pull().await,
            SyncDirection::ToSheet => self.push().await,
        }
    }

    /// 表格 → JSON
    pub async fn pull(&self) -> Result<SyncReport> {
        let started = Instant::now();
        let mut report = SyncReport::new(SyncDirection::ToJson, self.dry_run);

        let grids = self.fetch_grids().await?;
        if grids.is_empty() {
            tracing::warn!("spreadsheet has no sheets, locale files left untouched");
            report.duration_ms = elapsed_ms(started);
            return Ok(report);
        }

        let (tables, store, diagnostics) = build_from_grids(&grids)?;
        report.categories = tables.iter().map(summarize).collect();
        report.warnings = diagnostics.into_warnings();

        if store.tree_count() == 0 {
            tracing::warn!("no language columns found, locale files left untouched");
            report.duration_ms = elapsed_ms(started);
            return Ok(report);
        }

        report.files = if self.dry_run {
            self.files.planned_files(&store)
        } else {
            self.files
                .write(&store)
                .with_context(|| format!("failed to write {}", self.files.dir().display()))?
        };

        report.duration_ms = elapsed_ms(started);
        tracing::info!(
            categories = report.categories.len(),
            files = report.files.len(),
            "sheet to json finished"
        );
        Ok(report)
    }

    /// JSON → 表格
    pub async fn push(&self) -> Result<SyncReport> {
        let started = Instant::now();
        let mut report = SyncReport::new(SyncDirection::ToSheet, self.dry_run);

        let mut diagnostics = Diagnostics::new();
        let store = self.files.read(&mut diagnostics)?;
        let (tables, flatten_diagnostics) = flatten(&store);
        diagnostics.extend(flatten_diagnostics);

        if tables.is_empty() {
            tracing::warn!(dir = %self.files.dir().display(), "no translation files found");
        }

        let total = tables.len();
        for (index, table) in tables.iter().enumerate() {
            if !self.dry_run {
                self.backend
                    .update_sheet(&table.category, &table.headers(), &table.to_grid())
                    .await
                    .with_context(|| format!("failed to update sheet '{}'", table.category))?;
            }
            report.sheets.push(table.category.clone());
            self.report_progress(index + 1, total);
        }

        report.categories = tables.iter().map(summarize).collect();
        report.warnings = diagnostics.into_warnings();
        report.duration_ms = elapsed_ms(started);
        tracing::info!(sheets = report.sheets.len(), "json to sheet finished");
        Ok(report)
    }

    /// 并发拉取所有标签页，结果保持表格中的顺序
    pub async fn fetch_grids(&self) -> Result<Vec<SheetGrid>> {
        let names = self
            .backend
            .sheet_names()
            .await
            .context("failed to list sheets")?;
        let total = names.len();
        let completed = AtomicUsize::new(0);
        let completed = &completed;

        stream::iter(names)
            .map(|name| async move {
                let cells = self
                    .backend
                    .sheet_values(&name)
                    .await
                    .with_context(|| format!("failed to read sheet '{}'", name))?;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                self.report_progress(done, total);
                Ok::<_, anyhow::Error>(SheetGrid::new(name, cells))
            })
            .buffered(self.max_concurrency)
            .try_collect()
            .await
    }

    fn report_progress(&self, completed: usize, total: usize) {
        if let Some(callback) = &self.progress_callback {
            callback(completed, total);
        }
    }
}

fn summarize(table: &RowTable) -> CategorySummary {
    CategorySummary {
        category: table.category.clone(),
        languages: table.languages.clone(),
        rows: table.len(),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::core::sheets::MemorySheets;
    use crate::models::config::LocaleLayout;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn sample_sheets() -> MemorySheets {
        MemorySheets::new()
            .with_sheet(
                "common",
                grid(&[
                    &["key", "en", "vi"],
                    &["greeting.hello", "Hello", "Xin chào"],
                    &["greeting.bye", "Bye", "Tạm biệt"],
                ]),
            )
            .with_sheet(
                "errors",
                grid(&[&["Key", "en"], &["notFound", "Not found"]]),
            )
    }

    fn read(path: &Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn pull_writes_locale_files() {
        let temp_dir = TempDir::new().unwrap();
        let sheets = sample_sheets();
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);

        let report = SyncRunner::new(&sheets, &files)
            .with_max_concurrency(4)
            .pull()
            .await
            .unwrap();

        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.files.len(), 3);
        assert!(report.warnings.is_empty());
        assert_eq!(
            read(&temp_dir.path().join("vi/common.json"))["greeting"]["bye"],
            "Tạm biệt"
        );
        assert_eq!(
            read(&temp_dir.path().join("en/errors.json"))["notFound"],
            "Not found"
        );
    }

    #[tokio::test]
    async fn dry_run_pull_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let locales = temp_dir.path().join("locales");
        let sheets = sample_sheets();
        let files = LocaleFiles::new(&locales, LocaleLayout::PerCategory);

        let report = SyncRunner::new(&sheets, &files)
            .with_dry_run(true)
            .pull()
            .await
            .unwrap();

        assert_eq!(report.files.len(), 3);
        assert!(!locales.exists());
    }

    #[tokio::test]
    async fn pull_aborts_on_sheet_without_key_column() {
        let temp_dir = TempDir::new().unwrap();
        let sheets = sample_sheets().with_sheet("broken", grid(&[&["id", "en"], &["a", "b"]]));
        let files = LocaleFiles::new(temp_dir.path().join("locales"), LocaleLayout::PerCategory);

        let result = SyncRunner::new(&sheets, &files).pull().await;

        assert!(result.is_err());
        assert!(!temp_dir.path().join("locales").exists());
    }

    #[tokio::test]
    async fn empty_spreadsheet_leaves_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("en")).unwrap();
        std::fs::write(temp_dir.path().join("en/common.json"), "{}").unwrap();
        let sheets = MemorySheets::new();
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);

        let report = SyncRunner::new(&sheets, &files).pull().await.unwrap();

        assert!(report.is_noop());
        assert!(temp_dir.path().join("en/common.json").exists());
    }

    #[tokio::test]
    async fn sheets_without_languages_leave_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("en")).unwrap();
        std::fs::write(temp_dir.path().join("en/common.json"), "{}").unwrap();
        let sheets = MemorySheets::new().with_sheet("common", grid(&[&["key"], &["a"]]));
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);

        let report = SyncRunner::new(&sheets, &files).pull().await.unwrap();

        assert!(report.files.is_empty());
        assert!(temp_dir.path().join("en/common.json").exists());
    }

    #[tokio::test]
    async fn pull_keeps_ignored_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("en")).unwrap();
        std::fs::write(temp_dir.path().join("en/draft.json"), r#"{"b":"wip"}"#).unwrap();
        let sheets = MemorySheets::new().with_sheet("common", grid(&[&["key", "en"], &["a", "1"]]));
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory)
            .with_ignore(&["*/draft.json".to_string()]);

        let report = SyncRunner::new(&sheets, &files).pull().await.unwrap();

        assert_eq!(report.files, vec![temp_dir.path().join("en/common.json")]);
        assert_eq!(read(&temp_dir.path().join("en/draft.json"))["b"], "wip");
    }

    #[tokio::test]
    async fn push_then_pull_restores_the_sheets() {
        let temp_dir = TempDir::new().unwrap();
        let source = sample_sheets();
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);
        SyncRunner::new(&source, &files).pull().await.unwrap();

        let target = MemorySheets::new();
        let report = SyncRunner::new(&target, &files).push().await.unwrap();

        assert_eq!(report.sheets, vec!["common", "errors"]);
        assert_eq!(target.sheet("common"), source.sheet("common"));
        assert_eq!(
            target.sheet("errors").unwrap(),
            grid(&[&["key", "en"], &["notFound", "Not found"]])
        );
    }

    #[tokio::test]
    async fn dry_run_push_does_not_write_sheets() {
        let temp_dir = TempDir::new().unwrap();
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);
        SyncRunner::new(&sample_sheets(), &files).pull().await.unwrap();

        let target = MemorySheets::new();
        let report = SyncRunner::new(&target, &files)
            .with_dry_run(true)
            .push()
            .await
            .unwrap();

        assert_eq!(report.sheets.len(), 2);
        assert!(target.names().is_empty());
    }

    #[tokio::test]
    async fn progress_reaches_total() {
        let temp_dir = TempDir::new().unwrap();
        let sheets = sample_sheets();
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();

        SyncRunner::new(&sheets, &files)
            .with_progress_callback(Arc::new(move |done: usize, total: usize| {
                sink.lock().unwrap().push((done, total));
            }))
            .pull()
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }
}
