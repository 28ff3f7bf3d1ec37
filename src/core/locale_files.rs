// ============================================================================
// LocaleSync - 本地翻译文件读写
// ============================================================================
//
// 文件: src/core/locale_files.rs
// 职责: 翻译目录 ⇄ TranslationStore
// 边界:
//   - ✅ 按目录布局扫描并解析 JSON 文件
//   - ✅ 忽略模式匹配
//   - ✅ 写入前清理目录，两空格缩进写出
//   - ✅ 无效或非对象文档的诊断
//   - ❌ 不应包含行/树转换逻辑
//   - ❌ 不应包含表格 API 调用
//
// 目录布局:
//   per-category: <dir>/<lang>/<category>.json
//   flat:         <dir>/<lang>.json，顶层成员为分类
//
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use walkdir::WalkDir;

use super::diagnostics::{Diagnostics, SyncWarning};
use super::store::TranslationStore;
use super::tree::TranslationNode;
use crate::models::config::{LocaleLayout, LocalesConfig};

const JSON_EXTENSION: &str = "json";

/// 翻译目录读写器
#[derive(Debug, Clone)]
pub struct LocaleFiles {
    dir: PathBuf,
    layout: LocaleLayout,
    clean: bool,
    ignore: Vec<glob::Pattern>,
}

impl LocaleFiles {
    pub fn new<P: Into<PathBuf>>(dir: P, layout: LocaleLayout) -> Self {
        Self {
            dir: dir.into(),
            layout,
            clean: true,
            ignore: Vec::new(),
        }
    }

    /// 从配置构建
    pub fn from_config(config: &LocalesConfig) -> Self {
        Self::new(&config.dir, config.layout)
            .with_clean(config.clean)
            .with_ignore(&config.ignore)
    }

    /// 设置写入前是否清空目录
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// 设置忽略模式，无效模式记录警告后跳过
    pub fn with_ignore(mut self, patterns: &[String]) -> Self {
        self.ignore = patterns
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "invalid ignore pattern");
                    None
                }
            })
            .collect();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn layout(&self) -> LocaleLayout {
        self.layout
    }

    // ========================================================================
    // 读取
    // ========================================================================

    /// 读取整个翻译目录
    ///
    /// 目录不存在时返回空存储。无法解析的文件记录诊断后跳过。
    pub fn read(&self, diagnostics: &mut Diagnostics) -> Result<TranslationStore> {
        let mut store = TranslationStore::new();

        if !self.dir.is_dir() {
            tracing::warn!(dir = %self.dir.display(), "locales directory not found");
            return Ok(store);
        }

        match self.layout {
            LocaleLayout::PerCategory => self.read_per_category(&mut store, diagnostics)?,
            LocaleLayout::Flat => self.read_flat(&mut store, diagnostics)?,
        }

        tracing::info!(
            dir = %self.dir.display(),
            languages = store.languages().count(),
            trees = store.tree_count(),
            "locale files loaded"
        );
        Ok(store)
    }

    fn read_per_category(
        &self,
        store: &mut TranslationStore,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("failed to scan {}", self.dir.display()))?;
            let path = entry.path();

            if self.should_ignore(path) {
                tracing::debug!(path = %path.display(), "ignored");
                continue;
            }

            if entry.depth() == 1 {
                if entry.file_type().is_dir() {
                    store.ensure_language(&file_name(path));
                } else {
                    tracing::debug!(path = %path.display(), "skipping top-level file");
                }
                continue;
            }

            if !entry.file_type().is_file() || !is_json(path) {
                continue;
            }

            let Some(language) = path.parent().map(file_name) else {
                continue;
            };
            let category = file_stem(path);

            match parse_object(path, diagnostics) {
                Some(object) => {
                    store.put(language, category, TranslationNode::from_json(Value::Object(object)))
                }
                None => continue,
            }
        }
        Ok(())
    }

    fn read_flat(&self, store: &mut TranslationStore, diagnostics: &mut Diagnostics) -> Result<()> {
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("failed to scan {}", self.dir.display()))?;
            let path = entry.path();

            if !entry.file_type().is_file() || !is_json(path) || self.should_ignore(path) {
                continue;
            }

            let language = file_stem(path);
            let Some(object) = parse_object(path, diagnostics) else {
                continue;
            };

            store.ensure_language(&language);
            for (category, tree) in object {
                if tree.is_object() {
                    store.put(language.as_str(), category, TranslationNode::from_json(tree));
                } else {
                    diagnostics.push(SyncWarning::NonObjectJsonDocument {
                        path: PathBuf::from(format!("{}#{}", path.display(), category)),
                    });
                }
            }
        }
        Ok(())
    }

    fn should_ignore(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.dir).unwrap_or(path);
        self.ignore.iter().any(|pattern| pattern.matches_path(relative))
    }

    // ========================================================================
    // 写入
    // ========================================================================

    /// 写入时会生成的文件路径（不触碰磁盘）
    pub fn planned_files(&self, store: &TranslationStore) -> Vec<PathBuf> {
        match self.layout {
            LocaleLayout::PerCategory => store
                .iter()
                .map(|(language, category, _)| self.category_path(language, category))
                .collect(),
            LocaleLayout::Flat => store
                .languages()
                .filter(|language| store.categories_of(language).next().is_some())
                .map(|language| self.language_path(language))
                .collect(),
        }
    }

    /// 把存储写入目录，返回已写入的文件
    pub fn write(&self, store: &TranslationStore) -> Result<Vec<PathBuf>> {
        for (language, category, _) in store.iter() {
            ensure_safe_name(language)?;
            ensure_safe_name(category)?;
        }

        if self.clean && self.dir.exists() {
            self.clean_dir()?;
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;

        let mut written = Vec::new();
        match self.layout {
            LocaleLayout::PerCategory => {
                for (language, category, tree) in store.iter() {
                    let language_dir = self.dir.join(language);
                    fs::create_dir_all(&language_dir)
                        .with_context(|| format!("failed to create {}", language_dir.display()))?;

                    let path = self.category_path(language, category);
                    write_json(&path, &tree.to_json())?;
                    written.push(path);
                }
            }
            LocaleLayout::Flat => {
                for language in store.languages() {
                    let mut merged = Map::new();
                    for (category, tree) in store.categories_of(language) {
                        merged.insert(category.to_string(), tree.to_json());
                    }
                    if merged.is_empty() {
                        continue;
                    }

                    let path = self.language_path(language);
                    write_json(&path, &Value::Object(merged))?;
                    written.push(path);
                }
            }
        }

        Ok(written)
    }

    /// 清空翻译目录，匹配忽略模式的文件和目录保留
    fn clean_dir(&self) -> Result<()> {
        let walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_entry(|entry| !self.should_ignore(entry.path()));

        let mut removed = 0usize;
        for entry in walker {
            let entry = entry.with_context(|| format!("failed to clean {}", self.dir.display()))?;
            let path = entry.path();

            if entry.file_type().is_dir() {
                // 仍有保留文件的目录不删除
                if is_empty_dir(path) {
                    fs::remove_dir(path)
                        .with_context(|| format!("failed to remove {}", path.display()))?;
                }
            } else {
                fs::remove_file(path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
                removed += 1;
            }
        }

        tracing::info!(dir = %self.dir.display(), removed, "locales directory cleaned");
        Ok(())
    }

    fn category_path(&self, language: &str, category: &str) -> PathBuf {
        self.dir
            .join(language)
            .join(format!("{}.{}", category, JSON_EXTENSION))
    }

    fn language_path(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", language, JSON_EXTENSION))
    }
}

/// 读取并解析为 JSON 对象，失败时记录诊断并返回 None
fn parse_object(path: &Path, diagnostics: &mut Diagnostics) -> Option<Map<String, Value>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            diagnostics.push(SyncWarning::InvalidJsonDocument {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return None;
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(object)) => Some(object),
        Ok(_) => {
            diagnostics.push(SyncWarning::NonObjectJsonDocument {
                path: path.to_path_buf(),
            });
            None
        }
        Err(e) => {
            diagnostics.push(SyncWarning::InvalidJsonDocument {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            None
        }
    }
}

/// 两空格缩进并以换行结尾
fn write_json(path: &Path, value: &Value) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "created");
    Ok(())
}

/// 语言和分类名会成为路径的一部分
fn ensure_safe_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        bail!("refusing to write translations under unsafe name '{}'", name);
    }
    Ok(())
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(JSON_EXTENSION))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_store() -> TranslationStore {
        let mut store = TranslationStore::new();
        store.put(
            "en",
            "common",
            TranslationNode::from_json(json!({ "greeting": { "hello": "Hello", "bye": "Bye" } })),
        );
        store.put(
            "vi",
            "common",
            TranslationNode::from_json(json!({ "greeting": { "hello": "Xin chào" } })),
        );
        store.put(
            "en",
            "errors",
            TranslationNode::from_json(json!({ "notFound": "Not found" })),
        );
        store
    }

    #[test]
    fn writes_per_category_files_with_two_space_indent() {
        let temp_dir = TempDir::new().unwrap();
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);

        let written = files.write(&sample_store()).unwrap();

        assert_eq!(written.len(), 3);
        let content = fs::read_to_string(temp_dir.path().join("en/common.json")).unwrap();
        assert_eq!(
            content,
            "{\n  \"greeting\": {\n    \"hello\": \"Hello\",\n    \"bye\": \"Bye\"\n  }\n}\n"
        );
        assert!(temp_dir.path().join("vi/common.json").exists());
        assert!(temp_dir.path().join("en/errors.json").exists());
    }

    #[test]
    fn per_category_round_trip_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);
        let store = sample_store();

        files.write(&store).unwrap();
        let mut diagnostics = Diagnostics::new();
        let loaded = files.read(&mut diagnostics).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(loaded, store);
    }

    #[test]
    fn flat_layout_merges_categories_per_language() {
        let temp_dir = TempDir::new().unwrap();
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::Flat);
        let store = sample_store();

        let written = files.write(&store).unwrap();
        assert_eq!(
            written,
            vec![temp_dir.path().join("en.json"), temp_dir.path().join("vi.json")]
        );

        let en: Value =
            serde_json::from_str(&fs::read_to_string(temp_dir.path().join("en.json")).unwrap())
                .unwrap();
        assert_eq!(en["errors"]["notFound"], json!("Not found"));

        let mut diagnostics = Diagnostics::new();
        assert_eq!(files.read(&mut diagnostics).unwrap(), store);
    }

    #[test]
    fn clean_removes_stale_files() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "fr/old.json", "{}");

        LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory)
            .write(&sample_store())
            .unwrap();

        assert!(!temp_dir.path().join("fr").exists());
    }

    #[test]
    fn without_clean_stale_files_survive() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "fr/old.json", "{}");

        LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory)
            .with_clean(false)
            .write(&sample_store())
            .unwrap();

        assert!(temp_dir.path().join("fr/old.json").exists());
    }

    #[test]
    fn invalid_and_non_object_documents_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "en/common.json", r#"{ "a": "ok" }"#);
        write(temp_dir.path(), "en/broken.json", "{ not json");
        write(temp_dir.path(), "en/list.json", r#"["x"]"#);
        write(temp_dir.path(), "en/notes.txt", "ignored");
        write(temp_dir.path(), "README.json", "{}");

        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);
        let mut diagnostics = Diagnostics::new();
        let store = files.read(&mut diagnostics).unwrap();

        assert_eq!(store.tree_count(), 1);
        assert!(store.get("en", "common").is_some());
        assert_eq!(diagnostics.count_kind("invalid_json_document"), 1);
        assert_eq!(diagnostics.count_kind("non_object_json_document"), 1);
    }

    #[test]
    fn flat_members_that_are_not_objects_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "en.json",
            r#"{ "common": { "a": "ok" }, "title": "Loose string" }"#,
        );

        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::Flat);
        let mut diagnostics = Diagnostics::new();
        let store = files.read(&mut diagnostics).unwrap();

        assert_eq!(store.tree_count(), 1);
        assert!(store.get("en", "common").is_some());
        assert!(store.get("en", "title").is_none());

        let warnings = diagnostics.into_warnings();
        assert_eq!(warnings.len(), 1);
        match &warnings[0] {
            SyncWarning::NonObjectJsonDocument { path } => assert_eq!(
                path,
                &PathBuf::from(format!("{}#title", temp_dir.path().join("en.json").display()))
            ),
            other => panic!("unexpected warning: {other:?}"),
        }
    }

    #[test]
    fn clean_keeps_ignored_files() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "en/draft.json", r#"{ "b": "wip" }"#);
        write(temp_dir.path(), "en/stale.json", "{}");
        write(temp_dir.path(), "fr/old.json", "{}");
        write(temp_dir.path(), "vendor/third_party.json", "{}");

        LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory)
            .with_ignore(&["*/draft.json".to_string(), "vendor".to_string()])
            .write(&sample_store())
            .unwrap();

        assert!(temp_dir.path().join("en/draft.json").exists());
        assert!(temp_dir.path().join("vendor/third_party.json").exists());
        assert!(!temp_dir.path().join("en/stale.json").exists());
        assert!(!temp_dir.path().join("fr").exists());
        assert!(temp_dir.path().join("en/common.json").exists());
    }

    #[test]
    fn ignore_patterns_skip_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "en/common.json", r#"{ "a": "ok" }"#);
        write(temp_dir.path(), "en/draft.json", r#"{ "b": "wip" }"#);

        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory)
            .with_ignore(&["*/draft.json".to_string()]);
        let mut diagnostics = Diagnostics::new();
        let store = files.read(&mut diagnostics).unwrap();

        assert!(store.get("en", "draft").is_none());
        assert!(store.get("en", "common").is_some());
    }

    #[test]
    fn missing_directory_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = LocaleFiles::new(temp_dir.path().join("nope"), LocaleLayout::PerCategory);

        let mut diagnostics = Diagnostics::new();
        assert!(files.read(&mut diagnostics).unwrap().is_empty());
    }

    #[test]
    fn unsafe_category_names_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = TranslationStore::new();
        store.put("en", "../escape", TranslationNode::branch());

        let result = LocaleFiles::new(temp_dir.path().join("locales"), LocaleLayout::PerCategory)
            .write(&store);

        assert!(result.is_err());
        assert!(!temp_dir.path().join("escape.json").exists());
    }

    #[test]
    fn planned_files_match_written_files() {
        let temp_dir = TempDir::new().unwrap();
        let files = LocaleFiles::new(temp_dir.path(), LocaleLayout::PerCategory);
        let store = sample_store();

        let planned = files.planned_files(&store);
        let written = files.write(&store).unwrap();

        assert_eq!(planned, written);
    }
}
