// ============================================================================
// LocaleSync - 库入口
// ============================================================================
//
// 文件: src/lib.rs
// 职责: 模块声明与公共接口导出
//
// ============================================================================

pub mod cli;
pub mod core;
pub mod i18n;
pub mod models;
pub mod ui;
pub mod utils;
