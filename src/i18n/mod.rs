// ============================================================================
// LocaleSync - 国际化模块
// ============================================================================
//
// 文件: src/i18n/mod.rs
// 职责: 界面文本的国际化支持
// 边界:
//   - ✅ 翻译表选择和查找
//   - ✅ 翻译宏定义和实现
//   - ✅ 启动时设置界面语言
//   - ✅ 参数化翻译支持
//   - ❌ 不应包含具体翻译内容
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

use std::sync::OnceLock;

pub mod en_us;
pub mod zh_cn;

/// 支持的界面语言
pub const SUPPORTED_LANGUAGES: &[&str] = &["en_us", "zh_cn"];

static LANGUAGE: OnceLock<String> = OnceLock::new();

/// 设置界面语言（只在启动时生效一次），不支持的语言回退到英文
pub fn set_language(language: &str) {
    let normalized = language.to_lowercase().replace('-', "_");
    let chosen = if SUPPORTED_LANGUAGES.contains(&normalized.as_str()) {
        normalized
    } else {
        tracing::warn!(language, "unsupported interface language, falling back to en_us");
        "en_us".to_string()
    };
    let _ = LANGUAGE.set(chosen);
}

/// 当前界面语言
pub fn current_language() -> &'static str {
    LANGUAGE.get().map(String::as_str).unwrap_or("en_us")
}

fn table_for(language: &str) -> &'static [(&'static str, &'static str)] {
    match language {
        "zh_cn" => zh_cn::TRANSLATIONS,
        _ => en_us::TRANSLATIONS,
    }
}

/// 获取翻译文本
pub fn get_translation(key: &str) -> String {
    lookup(table_for(current_language()), key)
        .or_else(|| lookup(en_us::TRANSLATIONS, key))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unknown translation key: {}", key))
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// 简单翻译宏
#[macro_export]
macro_rules! t {
    ($key:expr) => {
        $crate::i18n::get_translation($key)
    };
}

/// 带参数翻译的辅助函数
pub fn format_with_args(template: String, args: Vec<String>) -> String {
    let mut result = template;
    let mut cursor = 0;
    for arg in args.iter() {
        // 依次替换 {} 占位符，替换内容中的 {} 不再参与匹配
        if let Some(pos) = result[cursor..].find("{}") {
            let start = cursor + pos;
            result.replace_range(start..start + 2, arg);
            cursor = start + arg.len();
        }
    }
    result
}

/// 带参数的翻译宏
#[macro_export]
macro_rules! tf {
    ($key:expr, $($arg:expr),*) => {{
        let template = $crate::i18n::get_translation($key);
        let args = vec![$(format!("{}", $arg)),*];
        $crate::i18n::format_with_args(template, args)
    }};
}
