// ============================================================================
// LocaleSync - 翻译树构建器（正向投影）
// ============================================================================
//
// 文件: src/core/builder.rs
// 职责: 表格行 → 语言/分类 翻译树
// 边界:
//   - ✅ 原始网格表头解析（key 列、语言列）
//   - ✅ 按键路径逐段创建分支并写入叶子
//   - ✅ 重复键与叶子/分支冲突的覆盖与警告
//   - ❌ 不应包含表格 API 调用
//   - ❌ 不应包含文件写入
//
// 算法设计:
// 1. 表头中不区分大小写等于 key 的列为键列，其余非空表头为语言列
// 2. 每行每种语言都记录叶子，空字符串同样保留
// 3. 拆分键路径，在 store[语言][分类] 中逐段查找或创建分支
// 4. 冲突时后处理的行覆盖先前内容，记录警告后继续
//
// ============================================================================

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::diagnostics::{CodecError, Diagnostics, SyncWarning};
use super::key_path;
use super::store::TranslationStore;
use super::tree::InsertOutcome;
use crate::models::table::{Row, RowTable, SheetGrid, KEY_HEADER};

/// 把原始网格解析为分类表
///
/// 少于两行（只有表头）时返回 `EmptySheet`，找不到 key 列时返回
/// `MissingKeyColumn`。缺失的尾部单元格按空字符串处理。
pub fn resolve_grid(
    category: &str,
    cells: &[Vec<String>],
    diagnostics: &mut Diagnostics,
) -> Result<RowTable, CodecError> {
    if cells.len() < 2 {
        return Err(CodecError::EmptySheet {
            category: category.to_string(),
        });
    }

    let headers = &cells[0];
    let key_index = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(KEY_HEADER))
        .ok_or_else(|| CodecError::MissingKeyColumn {
            category: category.to_string(),
        })?;

    let language_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != key_index && !h.is_empty())
        .map(|(i, h)| (i, h.as_str()))
        .collect();

    let mut languages: Vec<String> = Vec::new();
    for (_, language) in &language_columns {
        if !languages.iter().any(|l| l == *language) {
            languages.push(language.to_string());
        }
    }

    let mut table = RowTable::new(category, languages);

    for (offset, line) in cells.iter().enumerate().skip(1) {
        let cell = |index: usize| line.get(index).map(String::as_str).unwrap_or("");
        let key = cell(key_index);

        let mut row = Row::new(key);
        for (index, language) in &language_columns {
            row.values.insert(language.to_string(), cell(*index).to_string());
        }

        if key.is_empty() && row.values.values().all(String::is_empty) {
            tracing::debug!(category, row = offset + 1, "skipping blank row");
            continue;
        }

        if !key_path::is_valid(key) {
            diagnostics.push(SyncWarning::MalformedKey {
                category: category.to_string(),
                key: key.to_string(),
                row: Some(offset + 1),
            });
            continue;
        }

        table.rows.push(row);
    }

    Ok(table)
}

/// 逐表累积构建翻译存储
#[derive(Debug, Default)]
pub struct TreeBuilder {
    store: TranslationStore,
    diagnostics: Diagnostics,
    /// 分类 → 已出现的键
    seen_keys: HashMap<String, HashSet<String>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一张分类表
    pub fn add_table(&mut self, table: &RowTable) {
        let category = table.category.as_str();

        if table.languages.is_empty() {
            tracing::warn!(category, "sheet has no language columns");
        }

        // 没有任何有效行的分类也要生成空文档
        for language in &table.languages {
            self.store.tree_mut(language, category);
        }

        for row in &table.rows {
            self.add_row(category, &table.languages, row);
        }

        tracing::debug!(
            category,
            rows = table.rows.len(),
            languages = table.languages.len(),
            "sheet projected into trees"
        );
    }

    fn add_row(&mut self, category: &str, languages: &[String], row: &Row) {
        let segments = match key_path::split(&row.key) {
            Ok(segments) => segments,
            Err(_) => {
                self.diagnostics.push(SyncWarning::MalformedKey {
                    category: category.to_string(),
                    key: row.key.clone(),
                    row: None,
                });
                return;
            }
        };

        let is_new = self
            .seen_keys
            .entry(category.to_string())
            .or_default()
            .insert(row.key.clone());
        if !is_new {
            self.diagnostics.push(SyncWarning::KeyCollision {
                category: category.to_string(),
                key: row.key.clone(),
                language: None,
            });
        }

        let mut conflict = false;
        for language in languages {
            let value = Value::String(row.value(language).to_string());
            let tree = self.store.tree_mut(language, category);
            if tree.insert(&segments, value) == InsertOutcome::Conflict {
                conflict = true;
            }
        }

        if conflict {
            self.diagnostics.push(SyncWarning::LeafBranchConflict {
                category: category.to_string(),
                key: row.key.clone(),
            });
        }
    }

    pub fn finish(self) -> (TranslationStore, Diagnostics) {
        (self.store, self.diagnostics)
    }
}

/// 把若干分类表投影为翻译存储
pub fn build(tables: &[RowTable]) -> (TranslationStore, Diagnostics) {
    let mut builder = TreeBuilder::new();
    for table in tables {
        builder.add_table(table);
    }
    builder.finish()
}

/// 从原始网格构建，任何一张表出现致命错误即中止
pub fn build_from_grids(
    sheets: &[SheetGrid],
) -> Result<(Vec<RowTable>, TranslationStore, Diagnostics), CodecError> {
    let mut diagnostics = Diagnostics::new();
    let mut tables = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        tables.push(resolve_grid(&sheet.name, &sheet.cells, &mut diagnostics)?);
    }

    let (store, build_diagnostics) = build(&tables);
    diagnostics.extend(build_diagnostics);
    Ok((tables, store, diagnostics))
}
