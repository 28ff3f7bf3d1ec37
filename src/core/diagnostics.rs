// ============================================================================
// LocaleSync - 诊断信息
// ============================================================================
//
// 文件: src/core/diagnostics.rs
// 职责: 编解码错误分类与可恢复警告收集
// 边界:
//   - ✅ 致命错误类型定义（键格式、缺少 key 列、空表）
//   - ✅ 可恢复警告类型定义（冲突、无效文档、类型转换）
//   - ✅ 警告收集与 tracing 日志输出
//   - ❌ 不应包含转换算法
//   - ❌ 不应包含终端输出格式
//
// ============================================================================

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// 致命的编解码错误
///
/// `MalformedKey` 只对单行致命，调用方跳过该行；
/// `MissingKeyColumn` 和 `EmptySheet` 对整张表致命。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed key path '{key}'")]
    MalformedKey { key: String },

    #[error("no 'key' column found in sheet '{category}'")]
    MissingKeyColumn { category: String },

    #[error("no data found in sheet '{category}'")]
    EmptySheet { category: String },
}

/// 可恢复或仅提示性的同步警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncWarning {
    /// 行被跳过：键为空或格式错误
    MalformedKey {
        category: String,
        key: String,
        /// 表格中的行号（从 1 开始，含表头），来自文件时为 None
        row: Option<usize>,
    },
    /// 同一分类下重复的键，后出现的覆盖先出现的
    KeyCollision {
        category: String,
        key: String,
        language: Option<String>,
    },
    /// 同一路径既是叶子又是分支，后处理的行覆盖冲突子树
    LeafBranchConflict { category: String, key: String },
    /// JSON 解析失败，整个文档被跳过
    InvalidJsonDocument { path: PathBuf, reason: String },
    /// 顶层不是对象，文档被跳过
    NonObjectJsonDocument { path: PathBuf },
    /// 非字符串叶子写入表格时被转为字符串
    TypeCoercionLoss {
        language: String,
        category: String,
        key: String,
        original: String,
    },
    /// 对象键本身包含 `.`，写回文件时会变成嵌套结构
    ReshapedKey {
        language: String,
        category: String,
        key: String,
    },
}

impl SyncWarning {
    /// 是否只是提示信息（不影响数据完整性）
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            SyncWarning::TypeCoercionLoss { .. } | SyncWarning::ReshapedKey { .. }
        )
    }

    /// 警告类别名称
    pub fn kind(&self) -> &'static str {
        match self {
            SyncWarning::MalformedKey { .. } => "malformed_key",
            SyncWarning::KeyCollision { .. } => "key_collision",
            SyncWarning::LeafBranchConflict { .. } => "leaf_branch_conflict",
            SyncWarning::InvalidJsonDocument { .. } => "invalid_json_document",
            SyncWarning::NonObjectJsonDocument { .. } => "non_object_json_document",
            SyncWarning::TypeCoercionLoss { .. } => "type_coercion_loss",
            SyncWarning::ReshapedKey { .. } => "reshaped_key",
        }
    }
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::MalformedKey { category, key, row } => match row {
                Some(row) => write!(f, "[{category}] row {row}: malformed key '{key}', row skipped"),
                None => write!(f, "[{category}] malformed key '{key}', leaf skipped"),
            },
            SyncWarning::KeyCollision {
                category,
                key,
                language,
            } => match language {
                Some(language) => write!(
                    f,
                    "[{category}/{language}] duplicate key '{key}', later value wins"
                ),
                None => write!(f, "[{category}] duplicate key '{key}', later row wins"),
            },
            SyncWarning::LeafBranchConflict { category, key } => write!(
                f,
                "[{category}] key '{key}' conflicts with an existing leaf or branch, overwritten"
            ),
            SyncWarning::InvalidJsonDocument { path, reason } => write!(
                f,
                "{} contains invalid JSON ({reason}), skipping",
                path.display()
            ),
            SyncWarning::NonObjectJsonDocument { path } => write!(
                f,
                "{} does not contain a translation object, skipping",
                path.display()
            ),
            SyncWarning::TypeCoercionLoss {
                language,
                category,
                key,
                original,
            } => write!(
                f,
                "[{category}/{language}] '{key}' holds non-string value {original}, written as text"
            ),
            SyncWarning::ReshapedKey {
                language,
                category,
                key,
            } => write!(
                f,
                "[{category}/{language}] '{key}' contains a dotted object key and will be nested on the way back"
            ),
        }
    }
}

/// 警告收集器
///
/// 每条警告在记录时同时输出到 tracing，调用方最后可统一展示。
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<SyncWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一条警告
    pub fn push(&mut self, warning: SyncWarning) {
        if warning.is_informational() {
            tracing::info!(kind = warning.kind(), "{}", warning);
        } else {
            tracing::warn!(kind = warning.kind(), "{}", warning);
        }
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[SyncWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<SyncWarning> {
        self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// 统计某一类警告的数量
    pub fn count_kind(&self, kind: &str) -> usize {
        self.warnings.iter().filter(|w| w.kind() == kind).count()
    }

    /// 合并另一组警告（不重复输出日志）
    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }
}
