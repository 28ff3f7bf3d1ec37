// ============================================================================
// LocaleSync - 授权命令处理
// ============================================================================
//
// 文件: src/cli/auth.rs
// 职责: 处理 Google OAuth 授权命令
// 边界:
//   - ✅ 授权命令参数解析
//   - ✅ 授权链接提示、回调等待、令牌保存
//   - ✅ 为同步命令提供可用的访问令牌
//   - ❌ 不应包含 HTTP 协议细节（见 core::oauth）
//
// ============================================================================

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::core::oauth::{wait_for_code, AuthError, ClientSecrets, OAuthClient, TokenStore};
use crate::models::config::Config;
use crate::utils::logger::Logger;
use crate::{t, tf};

/// 授权命令参数
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// 直接使用已获得的授权码
    #[arg(long)]
    pub code: Option<String>,

    /// 只打印授权链接，不启动本地回调监听
    #[arg(long)]
    pub no_listen: bool,
}

/// 处理授权命令
pub async fn handle_auth(args: AuthArgs, config: &Config) -> Result<()> {
    let client = oauth_client(config)?;
    let store = TokenStore::new(&config.sheet.token_path);

    let mut out = io::stdout();
    authorize(
        &client,
        &store,
        config.sheet.oauth_port,
        args.code,
        !args.no_listen,
        &mut out,
    )
    .await?;
    Ok(())
}

/// 取得访问令牌；尚未授权时进入交互式授权
///
/// 授权提示写到 stderr，stdout 只留给同步结果。
pub async fn access_token(config: &Config) -> Result<String> {
    let client = oauth_client(config)?;
    let store = TokenStore::new(&config.sheet.token_path);

    match client.access_token(&store).await {
        Ok(token) => Ok(token),
        Err(AuthError::NotAuthorized) | Err(AuthError::RefreshUnavailable) => {
            let mut out = io::stderr();
            match authorize(&client, &store, config.sheet.oauth_port, None, true, &mut out).await? {
                Some(token) => Ok(token),
                None => Err(AuthError::NotAuthorized.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// 根据配置构建 OAuth 客户端
pub fn oauth_client(config: &Config) -> Result<OAuthClient> {
    let credentials = if config.sheet.credentials.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(&config.sheet.credentials))
    };
    let secrets = ClientSecrets::resolve(
        credentials.as_deref(),
        config.sheet.client_id.as_deref(),
        config.sheet.client_secret.as_deref(),
    )?;
    let timeout = Duration::from_secs(config.execution.request_timeout);
    Ok(OAuthClient::new(secrets, config.sheet.oauth_port, timeout)?)
}

/// 执行授权流程，返回新的访问令牌；只打印链接时返回 None
async fn authorize<W: Write>(
    client: &OAuthClient,
    store: &TokenStore,
    port: u16,
    code: Option<String>,
    listen: bool,
    out: &mut W,
) -> Result<Option<String>> {
    let code = match code {
        Some(code) => code,
        None => {
            Logger::info_to(out, t!("auth.start"))?;
            Logger::info_to(out, t!("auth.open_url"))?;
            writeln!(out, "{}", client.authorization_url())?;

            if !listen {
                Logger::info_to(out, t!("auth.paste_code"))?;
                return Ok(None);
            }

            Logger::info_to(out, tf!("auth.waiting", port))?;
            out.flush()?;
            wait_for_code(port).await?
        }
    };

    Logger::info_to(out, t!("auth.exchanging"))?;
    let token = client.exchange_code(code.trim()).await?;
    if token.refresh_token.is_none() {
        Logger::warn_to(out, t!("auth.no_refresh_token"))?;
    }
    store.save(&token)?;
    Logger::success_to(out, tf!("auth.token_saved", store.path().display()))?;

    Ok(Some(token.access_token))
}
