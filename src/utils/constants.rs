// ============================================================================
// LocaleSync - 常量定义
// ============================================================================
//
// 文件: src/utils/constants.rs
// 职责: 应用程序常量定义
// 边界:
//   - ✅ 应用程序常量定义
//   - ✅ 默认路径与端口
//   - ✅ 图标字符定义
//   - ❌ 不应包含动态配置
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

/// 应用名称常量
pub const APP_NAME: &str = "LOCALE-SYNC";

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "locale-sync.toml";

/// 默认翻译目录
pub const DEFAULT_LOCALES_DIR: &str = "./locales";

/// 默认令牌文件
pub const DEFAULT_TOKEN_PATH: &str = ".google-token.json";

/// 默认授权回调端口
pub const DEFAULT_OAUTH_PORT: u16 = 8591;

/// 授权回调路径
pub const OAUTH_CALLBACK_PATH: &str = "/oauth2callback";

/// 像素风格图标
pub mod icons {
    /// 成功图标
    pub const SUCCESS: &str = "✓";
    /// 错误图标
    pub const ERROR: &str = "✗";
    /// 警告图标
    pub const WARNING: &str = "!";
    /// 文件图标
    pub const FILE: &str = "▪";
    /// 表格图标
    pub const SHEET: &str = "▦";
    /// 语言图标
    pub const LANGUAGE: &str = "◦";
    /// 时间图标
    pub const TIME: &str = "⧖";
    /// 箭头图标
    pub const ARROW: &str = "→";
    /// 汇总图标
    pub const SUMMARY: &str = "◈";
    /// 跳过图标
    pub const SKIP: &str = "○";
}

/// 进度条字符
pub mod progress_chars {
    /// 已完成块 / 当前块 / 未完成块
    pub const BAR: &str = "█▓░";
}
