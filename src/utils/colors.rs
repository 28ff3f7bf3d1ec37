// ============================================================================
// LocaleSync - 颜色工具
// ============================================================================
//
// 文件: src/utils/colors.rs
// 职责: 终端颜色输出和主题管理
// 边界:
//   - ✅ 日志级别颜色主题
//   - ✅ 全局彩色输出开关
//   - ❌ 不应包含业务逻辑
//   - ❌ 不应包含 UI 组件实现
//
// ============================================================================

use colored::Colorize;

/// 颜色工具函数
pub struct Colors;

impl Colors {
    /// 设置是否输出颜色（非终端输出时自动关闭）
    pub fn configure(enabled: bool) {
        if enabled && atty::is(atty::Stream::Stdout) {
            colored::control::unset_override();
        } else {
            colored::control::set_override(false);
        }
    }

    /// 信息颜色
    pub fn info(text: &str) -> String {
        text.cyan().to_string()
    }

    /// 警告颜色
    pub fn warn(text: &str) -> String {
        text.yellow().to_string()
    }

    /// 错误颜色
    pub fn error(text: &str) -> String {
        text.red().to_string()
    }

    /// 成功颜色
    pub fn success(text: &str) -> String {
        text.green().to_string()
    }

    /// 次要信息
    pub fn dim(text: &str) -> String {
        text.bright_black().to_string()
    }

    pub fn bold(text: &str) -> String {
        text.bold().to_string()
    }
}
