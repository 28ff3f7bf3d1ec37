// ============================================================================
// LocaleSync - 翻译存储
// ============================================================================
//
// 文件: src/core/store.rs
// 职责: 语言 → 分类 → 翻译树 的内存聚合
// 边界:
//   - ✅ 树的存取（覆盖写入）
//   - ✅ 语言与分类的有序枚举
//   - ❌ 不应包含多次同步之间的合并逻辑
//   - ❌ 不应包含文件或表格读写
//
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};

use super::tree::TranslationNode;

/// 一次同步运行期间的翻译数据
///
/// 语言和分类都按字典序保存，遍历顺序与哈希无关。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationStore {
    languages: BTreeMap<String, BTreeMap<String, TranslationNode>>,
}

impl TranslationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一棵树，已存在时覆盖
    pub fn put<L, C>(&mut self, language: L, category: C, tree: TranslationNode)
    where
        L: Into<String>,
        C: Into<String>,
    {
        self.languages
            .entry(language.into())
            .or_default()
            .insert(category.into(), tree);
    }

    pub fn get(&self, language: &str, category: &str) -> Option<&TranslationNode> {
        self.languages.get(language)?.get(category)
    }

    /// 取得可写的树，不存在时创建空分支
    pub fn tree_mut(&mut self, language: &str, category: &str) -> &mut TranslationNode {
        self.languages
            .entry(language.to_string())
            .or_default()
            .entry(category.to_string())
            .or_default()
    }

    /// 所有语言（字典序）
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// 所有语言中出现过的分类的并集（字典序）
    pub fn categories(&self) -> BTreeSet<&str> {
        self.languages
            .values()
            .flat_map(|categories| categories.keys().map(String::as_str))
            .collect()
    }

    /// 含有指定分类的语言（字典序）
    pub fn languages_for<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.languages
            .iter()
            .filter(move |(_, categories)| categories.contains_key(category))
            .map(|(language, _)| language.as_str())
    }

    /// 某个语言下的所有分类及其树
    pub fn categories_of(
        &self,
        language: &str,
    ) -> impl Iterator<Item = (&str, &TranslationNode)> {
        self.languages
            .get(language)
            .into_iter()
            .flat_map(|categories| categories.iter().map(|(c, t)| (c.as_str(), t)))
    }

    /// (语言, 分类, 树) 三元组遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &TranslationNode)> {
        self.languages.iter().flat_map(|(language, categories)| {
            categories
                .iter()
                .map(move |(category, tree)| (language.as_str(), category.as_str(), tree))
        })
    }

    /// 为语言登记一个空条目（目录存在但没有可用文件时使用）
    pub fn ensure_language(&mut self, language: &str) {
        self.languages.entry(language.to_string()).or_default();
    }

    pub fn is_empty(&self) -> bool {
        self.languages.values().all(BTreeMap::is_empty)
    }

    /// 树的总数（语言 × 分类）
    pub fn tree_count(&self) -> usize {
        self.languages.values().map(BTreeMap::len).sum()
    }
}
