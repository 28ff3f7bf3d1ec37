// ============================================================================
// LocaleSync - 工具模块
// ============================================================================
//
// 文件: src/utils/mod.rs
// 职责: 通用工具模块入口
// 边界:
//   - ✅ 日志、颜色和常量导出
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

pub mod colors;
pub mod constants;
pub mod logger;
