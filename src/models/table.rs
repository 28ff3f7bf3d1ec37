// ============================================================================
// LocaleSync - 表格数据模型
// ============================================================================
//
// 文件: src/models/table.rs
// 职责: 表格行、分类表和原始单元格网格的数据结构
// 边界:
//   - ✅ 行与表结构定义
//   - ✅ 表与矩形网格之间的转换
//   - ❌ 不应包含表头解析和校验（见 core::builder）
//   - ❌ 不应包含表格 API 调用
//
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;

/// key 列的表头（匹配时不区分大小写）
pub const KEY_HEADER: &str = "key";

/// 一行翻译：键加上每种语言的值
///
/// 空字符串表示“没有值”，与键不存在不同。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub key: String,
    pub values: BTreeMap<String, String>,
}

impl Row {
    pub fn new<K: Into<String>>(key: K) -> Self {
        Self {
            key: key.into(),
            values: BTreeMap::new(),
        }
    }

    /// 链式设置某个语言的值
    pub fn with<L: Into<String>, V: Into<String>>(mut self, language: L, value: V) -> Self {
        self.values.insert(language.into(), value.into());
        self
    }

    /// 读取某个语言的值，缺失时为空字符串
    pub fn value(&self, language: &str) -> &str {
        self.values.get(language).map(String::as_str).unwrap_or("")
    }
}

/// 一个分类（表格中的一个标签页）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowTable {
    pub category: String,
    /// 语言列，按表头顺序
    pub languages: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowTable {
    pub fn new<C: Into<String>>(category: C, languages: Vec<String>) -> Self {
        Self {
            category: category.into(),
            languages,
            rows: Vec::new(),
        }
    }

    /// 表头：`key` 加上所有语言列
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(KEY_HEADER.to_string())
            .chain(self.languages.iter().cloned())
            .collect()
    }

    /// 转换为写入表格用的矩形网格（不含表头）
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(row.key.clone())
                    .chain(self.languages.iter().map(|l| row.value(l).to_string()))
                    .collect()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 表格 API 返回的原始单元格网格，第一行是表头
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetGrid {
    pub name: String,
    pub cells: Vec<Vec<String>>,
}

impl SheetGrid {
    pub fn new<N: Into<String>>(name: N, cells: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_rectangular_with_empty_fill() {
        let mut table = RowTable::new("common", vec!["en".into(), "vi".into()]);
        table.rows.push(Row::new("greeting.hello").with("en", "Hello"));
        table
            .rows
            .push(Row::new("greeting.bye").with("en", "Bye").with("vi", "Tạm biệt"));

        assert_eq!(table.headers(), vec!["key", "en", "vi"]);
        assert_eq!(
            table.to_grid(),
            vec![
                vec!["greeting.hello", "Hello", ""],
                vec!["greeting.bye", "Bye", "Tạm biệt"],
            ]
        );
    }
}
