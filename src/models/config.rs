// ============================================================================
// LocaleSync - 配置数据模型
// ============================================================================
//
// 文件: src/models/config.rs
// 职责: 配置文件数据结构定义和操作
// 边界:
//   - ✅ 配置文件数据结构定义
//   - ✅ 配置序列化/反序列化
//   - ✅ 配置默认值与环境变量回填
//   - ✅ 配置文件读写操作
//   - ✅ 同步前的必填项校验
//   - ❌ 不应包含全局状态（配置在启动时构建一次并按引用传递）
//   - ❌ 不应包含 CLI 参数解析
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::constants::{
    CONFIG_FILE_NAME, DEFAULT_LOCALES_DIR, DEFAULT_OAUTH_PORT, DEFAULT_TOKEN_PATH,
};

/// LocaleSync 配置文件结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 表格与授权配置
    #[serde(default)]
    pub sheet: SheetConfig,
    /// 本地翻译文件配置
    #[serde(default)]
    pub locales: LocalesConfig,
    /// 执行配置
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
    /// 界面语言配置
    #[serde(default)]
    pub i18n: I18nConfig,
}

/// 表格配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetConfig {
    /// 表格 ID
    #[serde(default)]
    pub id: String,
    /// Google API 客户端凭据文件路径
    #[serde(default)]
    pub credentials: String,
    /// OAuth 客户端 ID（覆盖凭据文件）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// OAuth 客户端密钥（覆盖凭据文件）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// 令牌保存路径
    #[serde(default = "default_token_path")]
    pub token_path: String,
    /// 授权回调端口
    #[serde(default = "default_oauth_port")]
    pub oauth_port: u16,
}

/// 本地翻译文件配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalesConfig {
    /// 翻译文件根目录
    #[serde(default = "default_locales_dir")]
    pub dir: String,
    /// 目录布局
    #[serde(default)]
    pub layout: LocaleLayout,
    /// 写入前是否清空目录
    #[serde(default = "default_true")]
    pub clean: bool,
    /// 忽略的文件模式（相对于翻译目录）：读取时跳过，清理时保留
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// 执行配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionConfig {
    /// 同时拉取的表格页数量
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// 单个请求超时时间（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// 是否显示进度条
    #[serde(default = "default_true")]
    pub show_progress: bool,
    /// 是否详细输出
    #[serde(default)]
    pub verbose: bool,
    /// 是否彩色输出
    #[serde(default = "default_true")]
    pub colored: bool,
}

/// 国际化配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct I18nConfig {
    /// 界面语言
    #[serde(default = "default_language")]
    pub language: String,
}

/// CLI 运行时参数（用于覆盖配置文件）
#[derive(Debug, Clone, Default)]
pub struct RuntimeArgs {
    pub verbose: Option<bool>,
    pub colored: Option<bool>,
    pub show_progress: Option<bool>,
    pub max_concurrency: Option<usize>,
    pub sheet_id: Option<String>,
    pub credentials: Option<String>,
    pub locales_dir: Option<String>,
    pub layout: Option<LocaleLayout>,
    pub language: Option<String>,
}

/// 翻译文件目录布局
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LocaleLayout {
    /// 每种语言一个目录，每个分类一个文件: `<lang>/<category>.json`
    #[default]
    PerCategory,
    /// 每种语言一个文件，所有分类合并: `<lang>.json`
    Flat,
}

impl LocaleLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocaleLayout::PerCategory => "per-category",
            LocaleLayout::Flat => "flat",
        }
    }

    /// 从字符串解析布局
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "per-category" | "per_category" | "directory" => Ok(LocaleLayout::PerCategory),
            "flat" | "file" => Ok(LocaleLayout::Flat),
            _ => Err(format!(
                "unsupported locale layout: {}, expected per-category or flat",
                s
            )),
        }
    }
}

impl std::fmt::Display for LocaleLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 配置默认值 trait
pub trait ConfigDefaults {
    fn default_locales_dir() -> String {
        DEFAULT_LOCALES_DIR.to_string()
    }

    fn default_token_path() -> String {
        DEFAULT_TOKEN_PATH.to_string()
    }

    fn default_oauth_port() -> u16 {
        DEFAULT_OAUTH_PORT
    }

    /// 默认并发数
    fn default_max_concurrency() -> usize {
        num_cpus::get()
    }

    fn default_request_timeout() -> u64 {
        30
    }

    fn default_language() -> String {
        "en_us".to_string()
    }
}

impl ConfigDefaults for Config {}

fn default_locales_dir() -> String {
    Config::default_locales_dir()
}

fn default_token_path() -> String {
    Config::default_token_path()
}

fn default_oauth_port() -> u16 {
    Config::default_oauth_port()
}

fn default_max_concurrency() -> usize {
    Config::default_max_concurrency()
}

fn default_request_timeout() -> u64 {
    Config::default_request_timeout()
}

fn default_language() -> String {
    Config::default_language()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// 加载配置：显式路径 > 当前目录下的默认配置文件 > 默认值，再用环境变量回填
    pub fn load(explicit_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = PathBuf::from(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// 读取并解析配置文件
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// 用环境变量回填配置文件未设置的项
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if self.sheet.id.is_empty() {
            if let Some(id) = non_empty("GOOGLE_SHEET_ID") {
                self.sheet.id = id;
            }
        }
        if self.sheet.credentials.is_empty() {
            if let Some(path) = non_empty("GOOGLE_API_CREDENTIALS") {
                self.sheet.credentials = path;
            }
        }
        if self.sheet.client_id.is_none() {
            self.sheet.client_id = non_empty("GOOGLE_CLIENT_ID");
        }
        if self.sheet.client_secret.is_none() {
            self.sheet.client_secret = non_empty("GOOGLE_CLIENT_SECRET");
        }
        if self.sheet.oauth_port == Self::default_oauth_port() {
            if let Some(port) = non_empty("OAUTH_PORT").and_then(|p| p.parse().ok()) {
                self.sheet.oauth_port = port;
            }
        }
        if self.locales.dir == Self::default_locales_dir() {
            if let Some(dir) = non_empty("LOCALES_DIR") {
                self.locales.dir = dir;
            }
        }
    }

    /// 合并运行时参数
    pub fn merge_runtime_args(&mut self, args: RuntimeArgs) {
        if let Some(verbose) = args.verbose {
            self.output.verbose = verbose;
        }
        if let Some(colored) = args.colored {
            self.output.colored = colored;
        }
        if let Some(show_progress) = args.show_progress {
            self.output.show_progress = show_progress;
        }
        if let Some(max_concurrency) = args.max_concurrency {
            self.execution.max_concurrency = max_concurrency;
        }
        if let Some(sheet_id) = args.sheet_id {
            self.sheet.id = sheet_id;
        }
        if let Some(credentials) = args.credentials {
            self.sheet.credentials = credentials;
        }
        if let Some(dir) = args.locales_dir {
            self.locales.dir = dir;
        }
        if let Some(layout) = args.layout {
            self.locales.layout = layout;
        }
        if let Some(language) = args.language {
            self.i18n.language = language;
        }
    }

    /// 同步前检查必填项，返回缺失项名称列表
    pub fn missing_sync_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sheet.id.trim().is_empty() {
            missing.push("sheet.id (GOOGLE_SHEET_ID)");
        }
        if self.sheet.credentials.trim().is_empty()
            && (self.sheet.client_id.is_none() || self.sheet.client_secret.is_none())
        {
            missing.push("sheet.credentials (GOOGLE_API_CREDENTIALS)");
        }
        missing
    }

    /// 翻译目录
    pub fn locales_dir(&self) -> PathBuf {
        PathBuf::from(&self.locales.dir)
    }

    /// 并发数（至少为 1）
    pub fn max_concurrency(&self) -> usize {
        self.execution.max_concurrency.max(1)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// 生成默认配置模板
    pub fn generate_default_template() -> Self {
        let mut config = Self::default();
        config.sheet.credentials = "./credentials.json".to_string();
        config
    }

    /// 生成默认配置模板并保存到文件
    pub fn create_default_config_file(config_path: &Path) -> anyhow::Result<()> {
        Self::generate_default_template().save_to_file(config_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet: SheetConfig::default(),
            locales: LocalesConfig::default(),
            execution: ExecutionConfig::default(),
            output: OutputConfig::default(),
            i18n: I18nConfig::default(),
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            credentials: String::new(),
            client_id: None,
            client_secret: None,
            token_path: Config::default_token_path(),
            oauth_port: Config::default_oauth_port(),
        }
    }
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            dir: Config::default_locales_dir(),
            layout: LocaleLayout::default(),
            clean: true,
            ignore: Vec::new(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_concurrency: Config::default_max_concurrency(),
            request_timeout: Config::default_request_timeout(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            verbose: false,
            colored: true,
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: Config::default_language(),
        }
    }
}
