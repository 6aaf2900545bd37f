//! OAuth 2.0 アクセストークンの取得

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::check_response;
use crate::config::BloggerCredentials;
use crate::error::SheetpostError;

/// GoogleのOAuth 2.0 トークンエンドポイント
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Sheetsの読み取り専用スコープ
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// Bloggerのスコープ
pub const BLOGGER_SCOPE: &str = "https://www.googleapis.com/auth/blogger";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// JWTアサーションの有効期間（秒）
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// 取得したアクセストークン
#[derive(Clone)]
pub struct AccessToken {
    /// Bearerトークン
    pub token: String,
    /// 有効期限（レスポンスに `expires_in` がない場合は `None`）
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &self.preview(8))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl AccessToken {
    /// トークンの先頭 `chars` 文字に `...` を付けた表示用文字列
    pub fn preview(&self, chars: usize) -> String {
        let head: String = self.token.chars().take(chars).collect();
        format!("{}...", head)
    }

    /// 有効期限のRFC 3339表記（不明な場合は `N/A`）
    pub fn expiry_display(&self) -> String {
        self.expires_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, issued_at: DateTime<Utc>) -> AccessToken {
        AccessToken {
            token: self.access_token,
            expires_at: self
                .expires_in
                .map(|secs| issued_at + Duration::seconds(secs)),
        }
    }
}

/// サービスアカウント資格情報（JSONキーファイルの必要な部分）
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// 資格情報JSONを解析する
    ///
    /// `private_key` 中のリテラル `\n`（バックスラッシュとn）は改行に置き換えます。
    /// 環境変数に1行で格納された鍵をそのまま扱うためです。
    pub fn from_json(json: &str) -> Result<Self, SheetpostError> {
        let mut key: ServiceAccountKey = serde_json::from_str(json).map_err(|e| {
            SheetpostError::Credential(format!(
                "expected the complete service account JSON: {}",
                e
            ))
        })?;
        key.private_key = key.private_key.replace("\\n", "\n");
        Ok(key)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// 署名済みJWTアサーションを作成する
fn sign_assertion(
    key: &ServiceAccountKey,
    scope: &str,
    issued_at: DateTime<Utc>,
) -> Result<String, SheetpostError> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let claims = Claims {
        iss: &key.client_email,
        scope,
        aud: key.token_uri.as_deref().unwrap_or(TOKEN_URI),
        iat: issued_at.timestamp(),
        exp: issued_at.timestamp() + ASSERTION_LIFETIME_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &encoding_key)?)
}

/// サービスアカウントのJWTアサーションでアクセストークンを取得する
pub fn service_account_token(
    client: &Client,
    key: &ServiceAccountKey,
    scope: &str,
) -> Result<AccessToken, SheetpostError> {
    let issued_at = Utc::now();
    let assertion = sign_assertion(key, scope, issued_at)?;
    let token_uri = key.token_uri.as_deref().unwrap_or(TOKEN_URI);

    debug!("requesting service account token for {}", key.client_email);
    let response = client
        .post(token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
        .send()?;
    let token: TokenResponse = check_response(response)?.json()?;
    Ok(token.into_token(issued_at))
}

/// リフレッシュトークンを交換してアクセストークンを取得する
pub fn refresh_access_token(
    client: &Client,
    credentials: &BloggerCredentials,
    scope: &str,
) -> Result<AccessToken, SheetpostError> {
    let issued_at = Utc::now();

    debug!("refreshing access token for client {}", credentials.client_id);
    let response = client
        .post(TOKEN_URI)
        .form(&[
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
            ("scope", scope),
        ])
        .send()?;
    let token: TokenResponse = check_response(response)?.json()?;
    Ok(token.into_token(issued_at))
}
