// ============================================================================
// LocaleSync - Core 核心模块
// ============================================================================
//
// 文件: src/core/mod.rs
// 职责: 核心业务逻辑模块入口和导出
// 边界:
//   - ✅ 核心子模块导出
//   - ✅ 常用类型重新导出
//   - ❌ 不应包含具体业务实现
//   - ❌ 不应包含 CLI 相关逻辑
//   - ❌ 不应包含 UI 相关逻辑
//
// ============================================================================

pub mod builder;
pub mod diagnostics;
pub mod flattener;
pub mod key_path;
pub mod locale_files;
pub mod oauth;
pub mod sheets;
pub mod store;
pub mod sync;
pub mod tree;

// 重新导出常用类型
pub use builder::{build, build_from_grids, resolve_grid, TreeBuilder};
pub use diagnostics::{CodecError, Diagnostics, SyncWarning};
pub use flattener::{flatten, flatten_category};
pub use locale_files::LocaleFiles;
pub use oauth::{AuthError, ClientSecrets, OAuthClient, StoredToken, TokenStore};
pub use sheets::{GoogleSheetsClient, MemorySheets, SheetBackend, SheetsError};
pub use store::TranslationStore;
pub use sync::{ProgressCallback, SyncRunner};
pub use tree::{InsertOutcome, TranslationNode};
