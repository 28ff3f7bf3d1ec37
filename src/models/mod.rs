// ============================================================================
// LocaleSync - 数据模型模块
// ============================================================================
//
// 文件: src/models/mod.rs
// 职责: 数据模型模块入口和导出
// 边界:
//   - ✅ 子模块导出
//   - ✅ 常用类型重新导出
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod config;
pub mod report;
pub mod table;

pub use config::{Config, LocaleLayout, RuntimeArgs};
pub use report::{CategorySummary, SyncDirection, SyncReport};
pub use table::{Row, RowTable, SheetGrid};
