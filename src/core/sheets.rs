// ============================================================================
// LocaleSync - 表格后端
// ============================================================================
//
// 文件: src/core/sheets.rs
// 职责: 表格存储的抽象接口与 Google Sheets v4 实现
// 边界:
//   - ✅ 列出标签页、读取单元格、覆盖写入标签页
//   - ✅ 标签页名称到 A1 区域的转换
//   - ✅ API 错误解析
//   - ✅ 内存后端（离线演练与测试）
//   - ❌ 不应包含授权流程（见 core::oauth）
//   - ❌ 不应包含表头解析和树转换
//
// ============================================================================

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// 表格后端错误
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("request to the sheets API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid sheets API url: {0}")]
    Url(String),
}

/// 表格存储接口
///
/// 每个标签页对应一个分类，第一行是表头。
pub trait SheetBackend {
    /// 所有标签页名称（按表格中的顺序）
    fn sheet_names(&self) -> impl Future<Output = Result<Vec<String>, SheetsError>> + Send;

    /// 读取整个标签页的单元格，行可能参差不齐
    fn sheet_values(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Vec<String>>, SheetsError>> + Send;

    /// 覆盖写入标签页，不存在时创建
    fn update_sheet(
        &self,
        name: &str,
        headers: &[String],
        rows: &[Vec<String>],
    ) -> impl Future<Output = Result<(), SheetsError>> + Send;
}

/// 标签页名称转换为 A1 区域（整页）
pub fn a1_range(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Google Sheets v4 REST 客户端
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    spreadsheet_id: String,
    access_token: String,
}

impl GoogleSheetsClient {
    pub fn new<S, T>(spreadsheet_id: S, access_token: T, timeout: Duration) -> Result<Self, SheetsError>
    where
        S: Into<String>,
        T: Into<String>,
    {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// 在表格地址后追加路径段
    fn url(&self, segments: &[&str]) -> Result<Url, SheetsError> {
        let mut url = Url::parse(SHEETS_API_BASE).map_err(|e| SheetsError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::Url(SHEETS_API_BASE.to_string()))?
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, SheetsError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|parsed| parsed.error.message)
            .unwrap_or(body);
        Err(SheetsError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn clear_sheet(&self, name: &str) -> Result<(), SheetsError> {
        let range = format!("{}:clear", a1_range(name));
        let url = self.url(&[self.spreadsheet_id.as_str(), "values", range.as_str()])?;
        self.send(self.request(Method::POST, url).json(&json!({})))
            .await?;
        Ok(())
    }

    async fn add_sheet(&self, name: &str) -> Result<(), SheetsError> {
        let batch = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = self.url(&[batch.as_str()])?;
        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": name } } }]
        });
        self.send(self.request(Method::POST, url).json(&body))
            .await?;
        tracing::info!(sheet = name, "sheet created");
        Ok(())
    }
}

impl SheetBackend for GoogleSheetsClient {
    async fn sheet_names(&self) -> Result<Vec<String>, SheetsError> {
        let mut url = self.url(&[self.spreadsheet_id.as_str()])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");

        let metadata: SpreadsheetMetadata = self
            .send(self.request(Method::GET, url))
            .await?
            .json()
            .await?;

        Ok(metadata
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    async fn sheet_values(&self, name: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.url(&[self.spreadsheet_id.as_str(), "values", a1_range(name).as_str()])?;
        let range: ValueRange = self
            .send(self.request(Method::GET, url))
            .await?
            .json()
            .await?;

        tracing::debug!(sheet = name, rows = range.values.len(), "sheet values fetched");
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn update_sheet(
        &self,
        name: &str,
        headers: &[String],
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        let exists = self.sheet_names().await?.iter().any(|title| title == name);
        if exists {
            if let Err(e) = self.clear_sheet(name).await {
                tracing::warn!(sheet = name, error = %e, "failed to clear sheet, overwriting in place");
            }
        } else {
            self.add_sheet(name).await?;
        }

        let range = a1_range(name);
        let mut url = self.url(&[self.spreadsheet_id.as_str(), "values", range.as_str()])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let mut values: Vec<&[String]> = Vec::with_capacity(rows.len() + 1);
        values.push(headers);
        values.extend(rows.iter().map(Vec::as_slice));
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });

        self.send(self.request(Method::PUT, url).json(&body)).await?;
        tracing::info!(sheet = name, rows = rows.len(), "sheet updated");
        Ok(())
    }
}

/// 内存中的表格，标签页保持插入顺序
#[derive(Debug, Default)]
pub struct MemorySheets {
    sheets: Mutex<Vec<(String, Vec<Vec<String>>)>>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个标签页
    pub fn with_sheet<N: Into<String>>(self, name: N, cells: Vec<Vec<String>>) -> Self {
        self.lock().push((name.into(), cells));
        self
    }

    /// 读取标签页的全部单元格（含表头）
    pub fn sheet(&self, name: &str) -> Option<Vec<Vec<String>>> {
        self.lock()
            .iter()
            .find(|(title, _)| title == name)
            .map(|(_, cells)| cells.clone())
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|(title, _)| title.clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, Vec<Vec<String>>)>> {
        self.sheets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SheetBackend for MemorySheets {
    async fn sheet_names(&self) -> Result<Vec<String>, SheetsError> {
        Ok(self.names())
    }

    async fn sheet_values(&self, name: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        self.sheet(name).ok_or_else(|| SheetsError::Api {
            status: 400,
            message: format!("Unable to parse range: {}", a1_range(name)),
        })
    }

    async fn update_sheet(
        &self,
        name: &str,
        headers: &[String],
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        let cells: Vec<Vec<String>> = std::iter::once(headers.to_vec())
            .chain(rows.iter().cloned())
            .collect();

        let mut sheets = self.lock();
        match sheets.iter_mut().find(|(title, _)| title == name) {
            Some((_, existing)) => *existing = cells,
            None => sheets.push((name.to_string(), cells)),
        }
        Ok(())
    }
}

/// 单元格文本：字符串原样保留，其他值取 JSON 文本
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("common", "'common'")]
    #[case("Error Messages", "'Error Messages'")]
    #[case("user's", "'user''s'")]
    fn quotes_sheet_names(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(a1_range(name), expected);
    }

    #[test]
    fn builds_encoded_value_urls() {
        let client =
            GoogleSheetsClient::new("sheet-id", "token", Duration::from_secs(5)).unwrap();
        let url = client
            .url(&["sheet-id", "values", a1_range("Error Messages").as_str()])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/'Error%20Messages'"
        );
    }

    #[test]
    fn value_ranges_tolerate_missing_values() {
        let range: ValueRange = serde_json::from_value(json!({ "range": "'empty'!A1:Z1000" })).unwrap();
        assert!(range.values.is_empty());
    }

    #[test]
    fn non_string_cells_become_text() {
        assert_eq!(cell_text(json!("Hello")), "Hello");
        assert_eq!(cell_text(json!(42)), "42");
        assert_eq!(cell_text(json!(true)), "true");
        assert_eq!(cell_text(Value::Null), "");
    }

    #[tokio::test]
    async fn memory_sheets_create_then_overwrite() {
        let sheets = MemorySheets::new();
        let headers = vec!["key".to_string(), "en".to_string()];

        sheets
            .update_sheet("common", &headers, &[vec!["a".into(), "1".into()]])
            .await
            .unwrap();
        sheets
            .update_sheet("common", &headers, &[vec!["b".into(), "2".into()]])
            .await
            .unwrap();

        assert_eq!(sheets.sheet_names().await.unwrap(), vec!["common"]);
        assert_eq!(
            sheets.sheet_values("common").await.unwrap(),
            vec![vec!["key", "en"], vec!["b", "2"]]
        );
        assert!(sheets.sheet_values("missing").await.is_err());
    }
}
