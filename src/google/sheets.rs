//! Google Sheets API（値の読み取り）

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use super::auth::{service_account_token, AccessToken, ServiceAccountKey, SHEETS_READONLY_SCOPE};
use super::check_response;
use crate::config::SheetsAccess;
use crate::error::SheetpostError;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// サービスアカウントで認証済みのSheetsクライアント
#[derive(Debug)]
pub struct SheetsClient {
    http: Client,
    token: AccessToken,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// 資格情報を検証し、アクセストークンを取得する
    pub fn connect(access: &SheetsAccess) -> Result<Self, SheetpostError> {
        let key = ServiceAccountKey::from_json(&access.credential_json)?;
        let http = Client::new();
        let token = service_account_token(&http, &key, SHEETS_READONLY_SCOPE)?;
        Ok(Self {
            http,
            token,
            spreadsheet_id: access.spreadsheet_id.clone(),
        })
    }

    /// A1記法の範囲（例: `Aba!A1:C5`）の値を行ごとに取得する
    ///
    /// 値のない範囲では空のベクタを返します。
    pub fn fetch_values(&self, range: &str) -> Result<Vec<Vec<String>>, SheetpostError> {
        let url = values_url(&self.spreadsheet_id, range);
        debug!("GET {}", url);

        let response = self.http.get(&url).bearer_auth(&self.token.token).send()?;
        let body: ValueRange = check_response(response)?.json()?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

fn values_url(spreadsheet_id: &str, range: &str) -> String {
    format!(
        "{}/{}/values/{}",
        SHEETS_API,
        urlencoding::encode(spreadsheet_id),
        urlencoding::encode(range)
    )
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
