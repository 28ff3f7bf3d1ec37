// ============================================================================
// LocaleSync - 翻译树展平器（反向投影）
// ============================================================================
//
// 文件: src/core/flattener.rs
// 职责: 语言/分类 翻译树 → 每个分类一张表
// 边界:
//   - ✅ 分类并集与语言并集计算
//   - ✅ 前序遍历生成稳定的行顺序
//   - ✅ 非字符串叶子的显式转换与提示
//   - ❌ 不应包含表格 API 调用
//   - ❌ 不应包含文件读取
//
// 算法设计:
// 1. 分类 = 所有语言下分类的并集
// 2. 每个分类的语言按字典序处理，各自做前序深度优先遍历
// 3. 行顺序 = 按语言字典序首次出现的键顺序
// 4. 某语言缺少该键时填空字符串
//
// ============================================================================

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::diagnostics::{Diagnostics, SyncWarning};
use super::key_path;
use super::store::TranslationStore;
use crate::models::table::{Row, RowTable};

/// 把整个存储展平为分类表（分类按字典序）
pub fn flatten(store: &TranslationStore) -> (Vec<RowTable>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tables = store
        .categories()
        .into_iter()
        .map(|category| flatten_category(store, category, &mut diagnostics))
        .collect();
    (tables, diagnostics)
}

/// 展平单个分类
pub fn flatten_category(
    store: &TranslationStore,
    category: &str,
    diagnostics: &mut Diagnostics,
) -> RowTable {
    let languages: Vec<String> = store.languages_for(category).map(str::to_string).collect();

    let mut order: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut cells: HashMap<&str, HashMap<String, String>> = HashMap::new();

    for language in &languages {
        let Some(tree) = store.get(language, category) else {
            continue;
        };
        let column = cells.entry(language.as_str()).or_default();

        for (segments, value) in tree.leaves() {
            let key = key_path::join(&segments);

            if segments.is_empty() || segments.iter().any(String::is_empty) {
                diagnostics.push(SyncWarning::MalformedKey {
                    category: category.to_string(),
                    key,
                    row: None,
                });
                continue;
            }

            if segments.iter().any(|s| s.contains(key_path::SEPARATOR)) {
                diagnostics.push(SyncWarning::ReshapedKey {
                    language: language.clone(),
                    category: category.to_string(),
                    key: key.clone(),
                });
            }

            let (text, lossy) = leaf_text(value);
            if lossy {
                diagnostics.push(SyncWarning::TypeCoercionLoss {
                    language: language.clone(),
                    category: category.to_string(),
                    key: key.clone(),
                    original: value.to_string(),
                });
            }

            if column.insert(key.clone(), text).is_some() {
                diagnostics.push(SyncWarning::KeyCollision {
                    category: category.to_string(),
                    key: key.clone(),
                    language: Some(language.clone()),
                });
            }

            if seen.insert(key.clone()) {
                order.push(key);
            }
        }
    }

    let mut table = RowTable::new(category, languages.clone());
    for key in order {
        let mut row = Row::new(key.as_str());
        for language in &languages {
            let value = cells
                .get(language.as_str())
                .and_then(|column| column.get(&key))
                .cloned()
                .unwrap_or_default();
            row.values.insert(language.clone(), value);
        }
        table.rows.push(row);
    }

    tracing::debug!(
        category,
        rows = table.rows.len(),
        languages = table.languages.len(),
        "category flattened"
    );

    table
}

/// 叶子的单元格文本，第二个值表示转换是否有损
///
/// 字符串原样返回；数字和布尔值取 JSON 文本；null 为空字符串；
/// 数组取紧凑 JSON 文本。
pub fn leaf_text(value: &Value) -> (String, bool) {
    match value {
        Value::String(s) => (s.clone(), false),
        Value::Null => (String::new(), true),
        other => (other.to_string(), true),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::tree::TranslationNode;

    fn store_of(entries: &[(&str, &str, Value)]) -> TranslationStore {
        let mut store = TranslationStore::new();
        for (language, category, value) in entries {
            store.put(*language, *category, TranslationNode::from_json(value.clone()));
        }
        store
    }

    #[test]
    fn reproduces_rows_in_traversal_order() {
        let store = store_of(&[
            ("en", "common", json!({ "greeting": { "hello": "Hello", "bye": "Bye" } })),
            ("vi", "common", json!({ "greeting": { "hello": "Xin chào", "bye": "Tạm biệt" } })),
        ]);

        let (tables, diagnostics) = flatten(&store);

        assert!(diagnostics.is_empty());
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.headers(), vec!["key", "en", "vi"]);
        assert_eq!(
            table.to_grid(),
            vec![
                vec!["greeting.hello", "Hello", "Xin chào"],
                vec!["greeting.bye", "Bye", "Tạm biệt"],
            ]
        );
    }

    #[test]
    fn languages_are_unioned_and_missing_cells_are_empty() {
        let store = store_of(&[
            ("vi", "common", json!({ "a": "vi-a", "c": "vi-c" })),
            ("en", "common", json!({ "a": "en-a" })),
            ("de", "common", json!({ "b": "de-b" })),
        ]);

        let (tables, _) = flatten(&store);
        let table = &tables[0];

        assert_eq!(table.headers(), vec!["key", "de", "en", "vi"]);
        assert_eq!(
            table.to_grid(),
            vec![
                vec!["b", "de-b", "", ""],
                vec!["a", "", "en-a", "vi-a"],
                vec!["c", "", "", "vi-c"],
            ]
        );
    }

    #[test]
    fn categories_are_the_union_across_languages() {
        let store = store_of(&[
            ("en", "common", json!({ "a": "1" })),
            ("vi", "errors", json!({ "b": "2" })),
        ]);

        let (tables, _) = flatten(&store);

        let categories: Vec<&str> = tables.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(categories, vec!["common", "errors"]);
        assert_eq!(tables[0].languages, vec!["en"]);
        assert_eq!(tables[1].languages, vec!["vi"]);
    }

    #[test]
    fn cross_language_shape_mismatch_is_not_an_error() {
        let store = store_of(&[
            ("en", "common", json!({ "a": "leaf" })),
            ("vi", "common", json!({ "a": { "b": "nested" } })),
        ]);

        let (tables, diagnostics) = flatten(&store);

        assert!(diagnostics.is_empty());
        assert_eq!(
            tables[0].to_grid(),
            vec![vec!["a", "leaf", ""], vec!["a.b", "", "nested"]]
        );
    }

    #[test]
    fn non_string_leaves_are_coerced_with_a_warning() {
        let store = store_of(&[(
            "en",
            "common",
            json!({ "count": 3, "enabled": false, "missing": null, "list": ["x", "y"] }),
        )]);

        let (tables, diagnostics) = flatten(&store);

        assert_eq!(
            tables[0].to_grid(),
            vec![
                vec!["count", "3"],
                vec!["enabled", "false"],
                vec!["missing", ""],
                vec!["list", r#"["x","y"]"#],
            ]
        );
        assert_eq!(diagnostics.count_kind("type_coercion_loss"), 4);
    }

    #[test]
    fn dotted_object_keys_are_flagged_and_collisions_reported() {
        let store = store_of(&[(
            "en",
            "common",
            json!({ "a.b": "dotted", "a": { "b": "nested" } }),
        )]);

        let (tables, diagnostics) = flatten(&store);

        assert_eq!(tables[0].to_grid(), vec![vec!["a.b", "nested"]]);
        assert_eq!(diagnostics.count_kind("reshaped_key"), 1);
        assert_eq!(diagnostics.count_kind("key_collision"), 1);
    }

    #[test]
    fn empty_object_keys_are_skipped() {
        let store = store_of(&[("en", "common", json!({ "": "blank", "ok": "fine" }))]);

        let (tables, diagnostics) = flatten(&store);

        assert_eq!(tables[0].to_grid(), vec![vec!["ok", "fine"]]);
        assert_eq!(diagnostics.count_kind("malformed_key"), 1);
    }

    #[test]
    fn empty_branches_produce_no_rows() {
        let store = store_of(&[("en", "common", json!({ "section": {} }))]);

        let (tables, _) = flatten(&store);

        assert!(tables[0].is_empty());
        assert_eq!(tables[0].headers(), vec!["key", "en"]);
    }
}
