// ============================================================================
// LocaleSync - Google OAuth2 授权
// ============================================================================
//
// 文件: src/core/oauth.rs
// 职责: 已安装应用的 OAuth2 授权流程与令牌管理
// 边界:
//   - ✅ 客户端凭据文件解析
//   - ✅ 授权链接生成、授权码交换、令牌刷新
//   - ✅ 令牌文件读写
//   - ✅ 本地一次性回调监听
//   - ❌ 不应包含表格读写
//   - ❌ 不应包含浏览器启动等交互逻辑
//
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::utils::constants::OAUTH_CALLBACK_PATH;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// 表格读写权限
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// 令牌提前刷新的余量（毫秒）
const EXPIRY_MARGIN_MS: i64 = 60_000;

/// 授权错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to read credentials file {path}: {reason}")]
    Credentials { path: PathBuf, reason: String },

    #[error("no OAuth client configured: provide a credentials file or GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET")]
    MissingClient,

    #[error("not authorized yet: run `locale-sync auth` first")]
    NotAuthorized,

    #[error("stored token has expired and has no refresh token: run `locale-sync auth` again")]
    RefreshUnavailable,

    #[error("authorization was denied: {0}")]
    Denied(String),

    #[error("token endpoint rejected the request: {0}")]
    TokenEndpoint(String),

    #[error("token file {path}: {reason}")]
    TokenFile { path: PathBuf, reason: String },

    #[error("callback listener failed: {0}")]
    Callback(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// 客户端凭据
// ============================================================================

/// OAuth 客户端 ID 与密钥
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientSecrets {
    /// 解析 Google Cloud Console 下载的凭据 JSON（`installed`、`web` 或平铺格式）
    pub fn parse(content: &str) -> Result<Self, String> {
        let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
        let section = value
            .get("installed")
            .or_else(|| value.get("web"))
            .unwrap_or(&value);
        serde_json::from_value(section.clone())
            .map_err(|_| "missing client_id/client_secret".to_string())
    }

    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let content = std::fs::read_to_string(path).map_err(|e| AuthError::Credentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content).map_err(|reason| AuthError::Credentials {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// 显式的 ID/密钥优先，其次读取凭据文件
    pub fn resolve(
        credentials: Option<&Path>,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> Result<Self, AuthError> {
        if let (Some(id), Some(secret)) = (client_id, client_secret) {
            return Ok(Self {
                client_id: id.to_string(),
                client_secret: secret.to_string(),
            });
        }
        match credentials {
            Some(path) => Self::from_file(path),
            None => Err(AuthError::MissingClient),
        }
    }
}

// ============================================================================
// 令牌
// ============================================================================

/// 保存在磁盘上的令牌，字段与 googleapis 的 Credentials 一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// 过期时间（Unix 毫秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl StoredToken {
    /// 没有过期时间的令牌视为有效
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expiry_date
            .is_some_and(|expiry| expiry - EXPIRY_MARGIN_MS <= now_ms)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<String>) -> StoredToken {
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expiry_date: self.expires_in.map(|secs| now_millis() + secs * 1000),
            scope: self.scope,
            token_type: self.token_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// 令牌文件
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取令牌，文件不存在时返回 None
    pub fn load(&self) -> Result<Option<StoredToken>, AuthError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.file_error(e))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| self.file_error(e))
    }

    pub fn save(&self, token: &StoredToken) -> Result<(), AuthError> {
        let content = serde_json::to_string_pretty(token).map_err(|e| self.file_error(e))?;
        std::fs::write(&self.path, content).map_err(|e| self.file_error(e))?;
        tracing::info!(path = %self.path.display(), "token saved");
        Ok(())
    }

    fn file_error<E: std::fmt::Display>(&self, e: E) -> AuthError {
        AuthError::TokenFile {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

// ============================================================================
// OAuth 客户端
// ============================================================================

/// 已安装应用的 OAuth2 客户端
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    secrets: ClientSecrets,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(secrets: ClientSecrets, port: u16, timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            secrets,
            redirect_uri: redirect_uri(port),
        })
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// 用户需要在浏览器中打开的授权链接
    pub fn authorization_url(&self) -> String {
        let params = [
            ("client_id", self.secrets.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", SHEETS_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ];
        match Url::parse_with_params(AUTH_ENDPOINT, &params) {
            Ok(url) => url.to_string(),
            Err(_) => AUTH_ENDPOINT.to_string(),
        }
    }

    /// 用授权码换取令牌
    pub async fn exchange_code(&self, code: &str) -> Result<StoredToken, AuthError> {
        let form = [
            ("code", code),
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let response = self.request_token(&form).await?;
        Ok(response.into_token(None))
    }

    /// 刷新令牌，新响应没有 refresh_token 时沿用旧的
    pub async fn refresh(&self, token: &StoredToken) -> Result<StoredToken, AuthError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or(AuthError::RefreshUnavailable)?;
        let form = [
            ("refresh_token", refresh_token),
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let response = self.request_token(&form).await?;
        tracing::info!("access token refreshed");
        Ok(response.into_token(token.refresh_token.clone()))
    }

    /// 取得可用的访问令牌，必要时刷新并保存
    pub async fn access_token(&self, store: &TokenStore) -> Result<String, AuthError> {
        let token = store.load()?.ok_or(AuthError::NotAuthorized)?;
        if !token.is_expired() {
            return Ok(token.access_token);
        }

        let refreshed = self.refresh(&token).await?;
        store.save(&refreshed)?;
        Ok(refreshed.access_token)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self.http.post(TOKEN_ENDPOINT).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => format!("{} {}", status.as_u16(), body),
            };
            return Err(AuthError::TokenEndpoint(reason));
        }

        serde_json::from_str(&body).map_err(|e| AuthError::TokenEndpoint(e.to_string()))
    }
}

pub fn redirect_uri(port: u16) -> String {
    format!("http://localhost:{}{}", port, OAUTH_CALLBACK_PATH)
}

// ============================================================================
// 回调监听
// ============================================================================

/// 回调请求的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Code(String),
    Denied(String),
    /// 不是回调路径或缺少授权码，继续等待
    Ignored,
}

/// 解析 HTTP 请求行中的目标，例如 `/oauth2callback?code=...`
pub fn parse_callback_target(target: &str) -> CallbackOutcome {
    let Ok(url) = Url::parse(&format!("http://localhost{}", target)) else {
        return CallbackOutcome::Ignored;
    };
    if url.path() != OAUTH_CALLBACK_PATH {
        return CallbackOutcome::Ignored;
    }

    let mut code = None;
    let mut error = None;
    for (name, value) in url.query_pairs() {
        match name.as_ref() {
            "code" if !value.is_empty() => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, error) {
        (Some(code), _) => CallbackOutcome::Code(code),
        (None, Some(error)) => CallbackOutcome::Denied(error),
        (None, None) => CallbackOutcome::Ignored,
    }
}

/// 在本地端口等待一次授权回调，返回授权码
pub async fn wait_for_code(port: u16) -> Result<String, AuthError> {
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::info!(port, "waiting for OAuth callback");

    loop {
        let (mut stream, peer) = listener.accept().await?;
        tracing::debug!(%peer, "callback connection");

        let target = match read_request_target(&mut stream).await {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable callback request");
                continue;
            }
        };

        match parse_callback_target(&target) {
            CallbackOutcome::Code(code) => {
                respond(&mut stream, "200 OK", "Authorization successful! You can close this window.")
                    .await?;
                return Ok(code);
            }
            CallbackOutcome::Denied(error) => {
                respond(&mut stream, "400 Bad Request", "Authorization was denied.").await?;
                return Err(AuthError::Denied(error));
            }
            CallbackOutcome::Ignored => {
                respond(&mut stream, "400 Bad Request", "No authorization code provided.").await?;
            }
        }
    }
}

async fn read_request_target(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    while !buffer.windows(4).any(|w| w == b"\r\n\r\n") && buffer.len() < 16 * 1024 {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    let request = String::from_utf8_lossy(&buffer);
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "empty request"))
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
