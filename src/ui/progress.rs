// ============================================================================
// LocaleSync - 进度条组件
// ============================================================================
//
// 文件: src/ui/progress.rs
// 职责: 同步过程中的终端进度条
// 边界:
//   - ✅ 进度条创建与样式
//   - ✅ 转换为核心层的进度回调
//   - ✅ 非终端环境自动关闭
//   - ❌ 不应包含业务逻辑
//
// ============================================================================

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::core::sync::ProgressCallback;
use crate::utils::constants::{progress_chars, APP_NAME};

const TEMPLATE: &str = "{prefix:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}";

/// 同步进度条，未启用时所有操作为空
pub struct SyncProgress {
    bar: Option<ProgressBar>,
}

impl SyncProgress {
    /// 创建进度条，只在 stderr 是终端时显示
    pub fn new(enabled: bool, message: String) -> Self {
        if !enabled || !atty::is(atty::Stream::Stderr) {
            return Self { bar: None };
        }

        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(progress_chars::BAR);
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(style)
            .with_prefix(format!("[{}]", APP_NAME))
            .with_message(message);

        Self { bar: Some(bar) }
    }

    /// 不显示任何内容
    pub fn hidden() -> Self {
        Self { bar: None }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// 核心层使用的进度回调
    pub fn callback(&self) -> Option<ProgressCallback> {
        let bar = self.bar.clone()?;
        Some(Arc::new(move |completed: usize, total: usize| {
            bar.set_length(total as u64);
            bar.set_position(completed as u64);
        }))
    }

    /// 完成并清除进度条
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
