//! Spreadsheet API client backing the signup ledger.
//!
//! Speaks the Google Sheets REST API (v4) over HTTPS with a bearer token.
//! The spreadsheet id is injected via configuration; when it is absent, or
//! the configured spreadsheet no longer exists, a fresh spreadsheet is
//! created and its id kept for the lifetime of the process.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::RwLock;

use nigela_beta_core::LEDGER_HEADER;

use crate::config::LedgerConfig;

use super::{LedgerError, SignupLedger};

/// Pixel widths of the seven ledger columns, in header order.
const COLUMN_WIDTHS: [u32; 7] = [250, 150, 120, 100, 200, 200, 150];

/// Header background shade (the classic `#f0f0f0`).
const HEADER_SHADE: f64 = 0.94;

/// Spreadsheet-backed [`SignupLedger`].
pub struct SheetsLedger {
    client: reqwest::Client,
    api_base: String,
    sheet_title: String,
    spreadsheet_title: String,
    spreadsheet_id: RwLock<Option<String>>,
}

impl SheetsLedger {
    /// Create a new ledger client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.access_token.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| LedgerError::Parse(format!("Invalid access token format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            sheet_title: config.sheet_title.clone(),
            spreadsheet_title: config.spreadsheet_title.clone(),
            spreadsheet_id: RwLock::new(config.spreadsheet_id.clone()),
        })
    }

    /// A1-notation range scoped to the signup sheet, URL-encoded.
    fn range(&self, cells: &str) -> String {
        urlencoding::encode(&format!("'{}'!{cells}", self.sheet_title)).into_owned()
    }

    /// The resolved spreadsheet id.
    async fn current_id(&self) -> Result<String, LedgerError> {
        self.spreadsheet_id.read().await.clone().ok_or_else(|| {
            LedgerError::Parse("spreadsheet not resolved; ensure_exists must run first".to_string())
        })
    }

    /// Open the configured spreadsheet, or create a fresh one when there is
    /// no configured id or the configured spreadsheet is gone.
    async fn resolve_spreadsheet(&self) -> Result<(String, Vec<SheetProperties>), LedgerError> {
        let configured = self.spreadsheet_id.read().await.clone();

        if let Some(id) = configured {
            match self.fetch_sheets(&id).await {
                Ok(sheets) => return Ok((id, sheets)),
                Err(LedgerError::Api { status: 404, .. }) => {
                    tracing::warn!(
                        spreadsheet_id = %id,
                        "configured spreadsheet not found, creating a fresh one"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let id = self.create_spreadsheet().await?;
        *self.spreadsheet_id.write().await = Some(id.clone());
        Ok((id, Vec::new()))
    }

    /// List the sheets of a spreadsheet.
    async fn fetch_sheets(&self, id: &str) -> Result<Vec<SheetProperties>, LedgerError> {
        let url = format!(
            "{}/v4/spreadsheets/{id}?fields=sheets.properties",
            self.api_base
        );

        let response = error_for_status(self.client.get(&url).send().await?).await?;
        let meta: SpreadsheetMeta = response
            .json()
            .await
            .map_err(|e| LedgerError::Parse(e.to_string()))?;

        Ok(meta.sheets.into_iter().map(|s| s.properties).collect())
    }

    /// Create a fresh spreadsheet and return its id.
    async fn create_spreadsheet(&self) -> Result<String, LedgerError> {
        let url = format!("{}/v4/spreadsheets", self.api_base);
        let body = serde_json::json!({
            "properties": { "title": self.spreadsheet_title }
        });

        let response = error_for_status(self.client.post(&url).json(&body).send().await?).await?;
        let created: CreatedSpreadsheet = response
            .json()
            .await
            .map_err(|e| LedgerError::Parse(e.to_string()))?;

        tracing::info!(spreadsheet_id = %created.spreadsheet_id, "created new signup spreadsheet");
        Ok(created.spreadsheet_id)
    }

    /// Add the signup sheet and return its numeric sheet id.
    async fn add_sheet(&self, id: &str) -> Result<i64, LedgerError> {
        let url = format!("{}/v4/spreadsheets/{id}:batchUpdate", self.api_base);
        let body = serde_json::json!({
            "requests": [{
                "addSheet": { "properties": { "title": self.sheet_title } }
            }]
        });

        let response = error_for_status(self.client.post(&url).json(&body).send().await?).await?;
        let reply: BatchUpdateResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Parse(e.to_string()))?;

        reply
            .replies
            .into_iter()
            .find_map(|r| r.add_sheet)
            .map(|sheet| sheet.properties.sheet_id)
            .ok_or_else(|| LedgerError::Parse("addSheet reply missing sheet id".to_string()))
    }

    /// Write the fixed header row into row 1 of the signup sheet.
    async fn write_header(&self, id: &str) -> Result<(), LedgerError> {
        let url = format!(
            "{}/v4/spreadsheets/{id}/values/{}?valueInputOption=RAW",
            self.api_base,
            self.range("A1:G1")
        );
        let body = serde_json::json!({ "values": [LEDGER_HEADER] });

        error_for_status(self.client.put(&url).json(&body).send().await?).await?;
        Ok(())
    }

    /// Bold + shade the header row and pin the column widths.
    ///
    /// Presentation metadata only; the data contract is the 7-column schema.
    async fn format_header(&self, id: &str, sheet_id: i64) -> Result<(), LedgerError> {
        let url = format!("{}/v4/spreadsheets/{id}:batchUpdate", self.api_base);

        let mut requests = vec![serde_json::json!({
            "repeatCell": {
                "range": {
                    "sheetId": sheet_id,
                    "startRowIndex": 0,
                    "endRowIndex": 1,
                    "startColumnIndex": 0,
                    "endColumnIndex": LEDGER_HEADER.len(),
                },
                "cell": {
                    "userEnteredFormat": {
                        "textFormat": { "bold": true },
                        "backgroundColor": {
                            "red": HEADER_SHADE,
                            "green": HEADER_SHADE,
                            "blue": HEADER_SHADE,
                        },
                    }
                },
                "fields": "userEnteredFormat(textFormat,backgroundColor)",
            }
        })];

        for (index, width) in COLUMN_WIDTHS.iter().enumerate() {
            requests.push(serde_json::json!({
                "updateDimensionProperties": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "COLUMNS",
                        "startIndex": index,
                        "endIndex": index + 1,
                    },
                    "properties": { "pixelSize": width },
                    "fields": "pixelSize",
                }
            }));
        }

        let body = serde_json::json!({ "requests": requests });
        error_for_status(self.client.post(&url).json(&body).send().await?).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SignupLedger for SheetsLedger {
    async fn ensure_exists(&self) -> Result<(), LedgerError> {
        let (id, sheets) = self.resolve_spreadsheet().await?;

        if sheets.iter().any(|s| s.title == self.sheet_title) {
            return Ok(());
        }

        let sheet_id = self.add_sheet(&id).await?;
        self.write_header(&id).await?;
        self.format_header(&id, sheet_id).await?;

        tracing::info!(sheet = %self.sheet_title, "created signup sheet with header row");
        Ok(())
    }

    async fn email_column(&self) -> Result<Vec<String>, LedgerError> {
        let id = self.current_id().await?;
        let url = format!(
            "{}/v4/spreadsheets/{id}/values/{}",
            self.api_base,
            self.range("A:A")
        );

        let response = error_for_status(self.client.get(&url).send().await?).await?;
        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| LedgerError::Parse(e.to_string()))?;

        // Row 1 is the header.
        Ok(range
            .values
            .into_iter()
            .skip(1)
            .filter_map(|row| row.into_iter().next())
            .collect())
    }

    async fn append_row(&self, row: [String; 7]) -> Result<(), LedgerError> {
        let id = self.current_id().await?;
        let url = format!(
            "{}/v4/spreadsheets/{id}/values/{}:append?valueInputOption=RAW",
            self.api_base,
            self.range("A:G")
        );
        let body = serde_json::json!({ "values": [row] });

        error_for_status(self.client.post(&url).json(&body).send().await?).await?;
        Ok(())
    }
}

/// Map non-success responses to [`LedgerError::Api`].
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, LedgerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(LedgerError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Spreadsheet metadata, trimmed to the sheet list.
#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId", default)]
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct CreatedSpreadsheet {
    #[serde(rename = "spreadsheetId")]
    spreadsheet_id: String,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<BatchUpdateReply>,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateReply {
    #[serde(rename = "addSheet")]
    add_sheet: Option<SheetEntry>,
}

/// Values payload of a column read.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}
