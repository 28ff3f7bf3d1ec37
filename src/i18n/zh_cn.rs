// ============================================================================
// LocaleSync - 中文翻译表
// ============================================================================
//
// 文件: src/i18n/zh_cn.rs
// 职责: 中文翻译内容定义
// 边界:
//   - ✅ 中文翻译字符串定义
//   - ❌ 不应包含翻译逻辑
//   - ❌ 不应包含其他语言翻译
//
// ============================================================================

/// 中文翻译表
pub const TRANSLATIONS: &[(&str, &str)] = &[
    // 同步
    ("sync.start", "开始同步 ({})..."),
    ("sync.fetching", "正在读取表格 {}"),
    ("sync.reading_files", "正在读取翻译目录 {}（{} 布局）"),
    ("sync.dry_run", "演练模式：不会写入任何内容"),
    ("sync.missing_settings", "缺少必要配置: {}"),
    ("sync.progress_fetch", "拉取标签页"),
    ("sync.progress_update", "更新标签页"),
    ("sync.failed", "同步失败: {}"),
    // 授权
    ("auth.start", "开始 Google OAuth 授权..."),
    ("auth.open_url", "请在浏览器中打开以下链接完成授权:"),
    ("auth.waiting", "正在端口 {} 等待授权回调..."),
    (
        "auth.paste_code",
        "授权后复制 code 参数并运行: locale-sync auth --code <CODE>",
    ),
    ("auth.exchanging", "正在用授权码换取令牌..."),
    ("auth.token_saved", "令牌已保存到 {}"),
    (
        "auth.no_refresh_token",
        "未返回刷新令牌，令牌过期后需要重新授权",
    ),
    // 初始化
    ("init.start", "正在初始化配置文件..."),
    ("init.config_exists", "配置文件已存在: {}"),
    ("init.use_force_hint", "使用 --force 覆盖"),
    ("init.config_created", "配置文件已创建: {}"),
    (
        "init.next_steps",
        "下一步: 填写 sheet.id 和 sheet.credentials，然后运行 `locale-sync auth`",
    ),
    ("init.create_failed", "创建配置文件失败: {}"),
    // 汇总
    ("summary.title", "同步汇总"),
    ("summary.direction", "方向: {}"),
    ("summary.categories", "分类: {}"),
    ("summary.languages", "语言: {}"),
    ("summary.rows", "行数: {}"),
    ("summary.files_written", "已写入文件: {}"),
    ("summary.files_planned", "将写入文件: {}"),
    ("summary.sheets_written", "已更新标签页: {}"),
    ("summary.sheets_planned", "将更新标签页: {}"),
    ("summary.warnings", "警告: {}"),
    ("summary.notices", "提示: {}"),
    ("summary.duration", "耗时: {}s"),
    ("summary.nothing", "没有需要同步的内容"),
    ("summary.warning_details", "警告详情"),
    ("summary.category_line", "{}: {} 行, {}"),
];
