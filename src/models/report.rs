// ============================================================================
// LocaleSync - 同步结果数据模型
// ============================================================================
//
// 文件: src/models/report.rs
// 职责: 一次同步运行的方向与结果汇总
// 边界:
//   - ✅ 同步方向定义与解析
//   - ✅ 分类统计、写入目标与警告的汇总结构
//   - ✅ JSON 序列化（--format json）
//   - ❌ 不应包含终端渲染（见 ui::summary）
//   - ❌ 不应包含同步执行逻辑
//
// ============================================================================

use std::path::PathBuf;

use serde::Serialize;

use crate::core::diagnostics::SyncWarning;

/// 同步方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    /// 表格 → 本地 JSON
    ToJson,
    /// 本地 JSON → 表格
    ToSheet,
}

impl SyncDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::ToJson => "to-json",
            SyncDirection::ToSheet => "to-sheet",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "to-json" | "json" | "pull" => Ok(SyncDirection::ToJson),
            "to-sheet" | "sheet" | "push" => Ok(SyncDirection::ToSheet),
            _ => Err(format!(
                "unsupported direction: {}, expected to-json or to-sheet",
                s
            )),
        }
    }
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单个分类的统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub languages: Vec<String>,
    pub rows: usize,
}

/// 同步结果
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub direction: SyncDirection,
    pub dry_run: bool,
    pub categories: Vec<CategorySummary>,
    /// 写入（或将写入）的本地文件
    pub files: Vec<PathBuf>,
    /// 写入（或将写入）的标签页
    pub sheets: Vec<String>,
    pub warnings: Vec<SyncWarning>,
    pub duration_ms: u64,
}

impl SyncReport {
    pub fn new(direction: SyncDirection, dry_run: bool) -> Self {
        Self {
            direction,
            dry_run,
            categories: Vec::new(),
            files: Vec::new(),
            sheets: Vec::new(),
            warnings: Vec::new(),
            duration_ms: 0,
        }
    }

    /// 所有分类的总行数
    pub fn total_rows(&self) -> usize {
        self.categories.iter().map(|c| c.rows).sum()
    }

    /// 出现过的语言（去重，保持首次出现顺序）
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = Vec::new();
        for language in self.categories.iter().flat_map(|c| c.languages.iter()) {
            if !languages.contains(&language.as_str()) {
                languages.push(language);
            }
        }
        languages
    }

    /// 需要用户关注的警告（不含提示类）
    pub fn attention_warnings(&self) -> impl Iterator<Item = &SyncWarning> {
        self.warnings.iter().filter(|w| !w.is_informational())
    }

    pub fn is_noop(&self) -> bool {
        self.categories.is_empty()
    }
}
