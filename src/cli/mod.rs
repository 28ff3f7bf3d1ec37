// ============================================================================
// LocaleSync - CLI 模块
// ============================================================================
//
// 文件: src/cli/mod.rs
// 职责: CLI 命令行接口模块入口和路由
// 边界:
//   - ✅ CLI 结构定义和命令枚举
//   - ✅ 命令行参数解析配置
//   - ✅ 配置加载与运行时覆盖
//   - ✅ 命令路由分发
//   - ❌ 不应包含具体命令实现逻辑
//   - ❌ 不应包含数据模型定义
//
// ============================================================================

pub mod auth;
pub mod init;
pub mod sync;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::i18n;
use crate::models::config::{Config, LocaleLayout, RuntimeArgs};
use crate::utils::colors::Colors;
use crate::utils::logger::init_tracing;
use auth::{handle_auth, AuthArgs};
use init::{handle_init, InitArgs};
use sync::{handle_sync, SyncArgs};

/// LocaleSync - Translation spreadsheet ⇄ JSON locale files
#[derive(Debug, Parser)]
#[command(name = "locale-sync")]
#[command(about = "Sync translation spreadsheets with per-language JSON locale files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Global verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Interface language (zh_cn, en_us)
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Configuration file (defaults to ./locale-sync.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Spreadsheet ID
    #[arg(short = 's', long, global = true)]
    pub sheet_id: Option<String>,

    /// Path to the Google API client credentials JSON
    #[arg(short = 'c', long, global = true)]
    pub credentials: Option<String>,

    /// Locales directory
    #[arg(short = 'o', long, global = true)]
    pub output_dir: Option<String>,

    /// Locale file layout (per-category, flat)
    #[arg(long, global = true)]
    pub layout: Option<String>,

    /// Maximum number of sheets fetched concurrently
    #[arg(short = 'j', long, global = true)]
    pub max_concurrency: Option<usize>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Commands
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synchronize translations between the spreadsheet and locale files
    Sync(SyncArgs),
    /// Authorize access to Google Sheets and store the token
    Auth(AuthArgs),
    /// Initialize configuration file
    Init(InitArgs),
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // init 不依赖已有配置文件
    if let Commands::Init(args) = cli.command {
        init_tracing(cli.verbose);
        i18n::set_language(cli.language.as_deref().unwrap_or("en_us"));
        Colors::configure(!cli.no_color);
        return handle_init(args);
    }

    let config = load_config(&cli)?;
    init_tracing(config.output.verbose);

    i18n::set_language(&config.i18n.language);
    Colors::configure(config.output.colored);

    match cli.command {
        Commands::Sync(args) => handle_sync(args, &config).await,
        Commands::Auth(args) => handle_auth(args, &config).await,
        Commands::Init(args) => handle_init(args),
    }
}

/// Load the configuration and apply command line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let runtime_args = build_runtime_args(cli)?;
    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_runtime_args(runtime_args);
    Ok(config)
}

/// Build runtime args from CLI arguments
fn build_runtime_args(cli: &Cli) -> Result<RuntimeArgs> {
    let layout = cli
        .layout
        .as_deref()
        .map(LocaleLayout::from_str)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    Ok(RuntimeArgs {
        verbose: if cli.verbose { Some(true) } else { None },
        colored: if cli.no_color { Some(false) } else { None },
        show_progress: if cli.no_progress { Some(false) } else { None },
        max_concurrency: cli.max_concurrency,
        sheet_id: cli.sheet_id.clone(),
        credentials: cli.credentials.clone(),
        locales_dir: cli.output_dir.clone(),
        layout,
        language: cli.language.clone(),
    })
}
