// ============================================================================
// LocaleSync - 日志工具
// ============================================================================
//
// 文件: src/utils/logger.rs
// 职责: 日志输出和格式化工具
// 边界:
//   - ✅ 面向用户的控制台输出
//   - ✅ tracing 订阅器初始化
//   - ❌ 不应包含业务逻辑
//   - ❌ 不应包含文件日志写入
//
// ============================================================================

use std::io::{self, Write};

use tracing_subscriber::EnvFilter;

use super::colors::Colors;

/// 简单的日志工具
pub struct Logger;

impl Logger {
    pub fn info<S: AsRef<str>>(msg: S) {
        println!("{} {}", Colors::info("[SYNC]"), msg.as_ref());
    }

    pub fn warn<S: AsRef<str>>(msg: S) {
        println!("{} {}", Colors::warn("[WARN]"), msg.as_ref());
    }

    pub fn error<S: AsRef<str>>(msg: S) {
        eprintln!("{} {}", Colors::error("[ERROR]"), msg.as_ref());
    }

    pub fn success<S: AsRef<str>>(msg: S) {
        println!("{} {}", Colors::success("[SYNC]"), msg.as_ref());
    }

    /// 写入指定输出，stdout 需要留给机器可读结果时使用
    pub fn info_to<W: Write + ?Sized, S: AsRef<str>>(out: &mut W, msg: S) -> io::Result<()> {
        writeln!(out, "{} {}", Colors::info("[SYNC]"), msg.as_ref())
    }

    pub fn warn_to<W: Write + ?Sized, S: AsRef<str>>(out: &mut W, msg: S) -> io::Result<()> {
        writeln!(out, "{} {}", Colors::warn("[WARN]"), msg.as_ref())
    }

    pub fn success_to<W: Write + ?Sized, S: AsRef<str>>(out: &mut W, msg: S) -> io::Result<()> {
        writeln!(out, "{} {}", Colors::success("[SYNC]"), msg.as_ref())
    }
}

/// 初始化诊断日志（输出到 stderr）
///
/// `RUST_LOG` 优先；否则详细模式为 info，默认 warn。
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: bool) -> String {
    let level = if verbose { "info" } else { "warn" };
    format!("locale_sync={}", level)
}
