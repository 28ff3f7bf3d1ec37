// ============================================================================
// LocaleSync - 程序入口
// ============================================================================
//
// 文件: src/main.rs
// 职责: 启动异步运行时并执行 CLI
//
// ============================================================================

use locale_sync::cli::run_cli;
use locale_sync::utils::logger::Logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run_cli().await {
        Logger::error(format!("{:#}", e));
        std::process::exit(1);
    }
}
