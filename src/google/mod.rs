//! Google API Module
//!
//! Google SheetsとBloggerのREST APIを呼び出す薄いクライアント。
//! HTTPはブロッキングクライアントで1リクエストずつ送信し、リトライは行いません。

mod auth;
mod blogger;
mod sheets;

pub use auth::{
    refresh_access_token, service_account_token, AccessToken, ServiceAccountKey, BLOGGER_SCOPE,
    SHEETS_READONLY_SCOPE, TOKEN_URI,
};
pub use blogger::{submit_post, BlogService, BloggerClient, Post};
pub use sheets::SheetsClient;

use reqwest::blocking::Response;
use serde_json::Value;

use crate::error::SheetpostError;

/// 成功以外のレスポンスを `SheetpostError::Api` に変換する
pub(crate) fn check_response(response: Response) -> Result<Response, SheetpostError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(SheetpostError::Api {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

/// エラーレスポンスの本文からメッセージを取り出す
///
/// 次の形式に対応し、いずれにも当てはまらない場合は本文をそのまま返します。
///
/// - `{"error": {"message": "..."}}`（REST API）
/// - `{"error": "invalid_grant", "error_description": "..."}`（トークンエンドポイント）
pub(crate) fn api_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|json| {
        match json.get("error")? {
            Value::Object(error) => error.get("message")?.as_str().map(str::to_string),
            Value::String(code) => Some(
                match json.get("error_description").and_then(Value::as_str) {
                    Some(description) => format!("{}: {}", code, description),
                    None => code.clone(),
                },
            ),
            _ => None,
        }
    });

    message.unwrap_or_else(|| body.trim().to_string())
}
