//! Configuration Module
//!
//! 環境変数ファイルとプロセス環境から、起動時に一度だけ設定を構築するモジュール。
//! 必須項目の検証はネットワーク呼び出しより前に行います。

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::api::SourceEncoding;
use crate::error::SheetpostError;

/// 環境変数ファイルの候補（先に見つかったものを使用）
pub const ENV_CANDIDATES: [&str; 2] = [".env", ".env.example"];

pub const SHEETS_SPREADSHEET_ID: &str = "SHEETS_SPREADSHEET_ID";
pub const SERVICE_ACCOUNT_KEY: &str = "GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY";
pub const SERVICE_ACCOUNT_KEY_PATH: &str = "GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY_PATH";
pub const BLOGGER_BLOG_ID: &str = "BLOGGER_BLOG_ID";
pub const BLOGGER_CLIENT_ID: &str = "BLOGGER_CLIENT_ID";
pub const BLOGGER_CLIENT_SECRET: &str = "BLOGGER_CLIENT_SECRET";
pub const BLOGGER_REFRESH_TOKEN: &str = "BLOGGER_REFRESH_TOKEN";
pub const MARKDOWN_FALLBACK_ENCODING: &str = "MARKDOWN_FALLBACK_ENCODING";

/// アプリケーション設定
///
/// 値が空文字列の項目は未設定として扱います。
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Google SheetsのスプレッドシートID
    pub spreadsheet_id: Option<String>,
    /// サービスアカウント資格情報のJSON（インライン）
    pub service_account_key: Option<String>,
    /// サービスアカウント資格情報のファイルパス（インラインより優先）
    pub service_account_key_path: Option<PathBuf>,
    /// BloggerのブログID
    pub blog_id: Option<String>,
    /// OAuthクライアントID
    pub blogger_client_id: Option<String>,
    /// OAuthクライアントシークレット
    pub blogger_client_secret: Option<String>,
    /// OAuthリフレッシュトークン
    pub blogger_refresh_token: Option<String>,
    /// Markdownファイルのエンコーディング戦略
    pub markdown_encoding: SourceEncoding,
}

/// Sheets APIへのアクセスに必要な値
#[derive(Debug, Clone)]
pub struct SheetsAccess {
    pub spreadsheet_id: String,
    /// サービスアカウント資格情報のJSON
    pub credential_json: String,
}

/// Blogger APIのOAuthクライアント資格情報
#[derive(Clone)]
pub struct BloggerCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl fmt::Debug for BloggerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloggerCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// 環境変数ファイルとプロセス環境から設定を読み込む
    ///
    /// `env_file` を指定した場合はそのファイルのみを、指定しない場合は
    /// [`ENV_CANDIDATES`] のうち最初に存在するファイルを読み込みます。
    /// プロセス環境の値はファイルの値より優先されます。
    ///
    /// # 戻り値
    ///
    /// * `Err(SheetpostError::FileNotFound)` - 明示したファイルが存在しない場合
    /// * `Err(SheetpostError::Config)` - ファイルの書式が不正、または値が不正な場合
    pub fn load(env_file: Option<&Path>) -> Result<Self, SheetpostError> {
        let mut vars = HashMap::new();

        match env_file {
            Some(path) => {
                if !path.exists() {
                    return Err(SheetpostError::FileNotFound(path.to_path_buf()));
                }
                read_env_file(path, &mut vars)?;
            }
            None => match ENV_CANDIDATES.iter().map(Path::new).find(|p| p.exists()) {
                Some(path) => read_env_file(path, &mut vars)?,
                None => warn!(
                    "no env file found (tried {}); using process environment only",
                    ENV_CANDIDATES.join(", ")
                ),
            },
        }

        // Unicodeでない値は無視
        vars.extend(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }));
        Self::from_vars(vars)
    }

    /// キーと値の組から設定を構築する
    ///
    /// ```rust
    /// use sheetpost::Config;
    ///
    /// let config = Config::from_vars([
    ///     ("BLOGGER_BLOG_ID".to_string(), "123".to_string()),
    /// ]).unwrap();
    /// assert_eq!(config.resolve_blog_id(None).unwrap(), "123");
    /// assert_eq!(config.resolve_blog_id(Some("456")).unwrap(), "456");
    /// ```
    pub fn from_vars<I>(vars: I) -> Result<Self, SheetpostError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();

        let markdown_encoding = match vars.remove(MARKDOWN_FALLBACK_ENCODING) {
            Some(label) => SourceEncoding::from_label(&label)?,
            None => SourceEncoding::default(),
        };

        Ok(Self {
            spreadsheet_id: vars.remove(SHEETS_SPREADSHEET_ID),
            service_account_key: vars.remove(SERVICE_ACCOUNT_KEY),
            service_account_key_path: vars.remove(SERVICE_ACCOUNT_KEY_PATH).map(PathBuf::from),
            blog_id: vars.remove(BLOGGER_BLOG_ID),
            blogger_client_id: vars.remove(BLOGGER_CLIENT_ID),
            blogger_client_secret: vars.remove(BLOGGER_CLIENT_SECRET),
            blogger_refresh_token: vars.remove(BLOGGER_REFRESH_TOKEN),
            markdown_encoding,
        })
    }

    /// Sheets APIに必要な値を検証して取り出す
    ///
    /// 資格情報ファイルのパスが設定されている場合はインラインJSONより優先して読み込みます。
    pub fn sheets_access(&self) -> Result<SheetsAccess, SheetpostError> {
        let credential_json = match &self.service_account_key_path {
            Some(path) => {
                if !path.exists() {
                    return Err(SheetpostError::FileNotFound(path.clone()));
                }
                debug!("reading service account key from {}", path.display());
                Some(fs::read_to_string(path)?)
            }
            None => self.service_account_key.clone(),
        };

        match (self.spreadsheet_id.clone(), credential_json) {
            (Some(spreadsheet_id), Some(credential_json)) => Ok(SheetsAccess {
                spreadsheet_id,
                credential_json,
            }),
            _ => Err(SheetpostError::Config(format!(
                "{} and {} (or {}) are required",
                SHEETS_SPREADSHEET_ID, SERVICE_ACCOUNT_KEY, SERVICE_ACCOUNT_KEY_PATH
            ))),
        }
    }

    /// BloggerのOAuth資格情報を検証して取り出す
    pub fn blogger_credentials(&self) -> Result<BloggerCredentials, SheetpostError> {
        match (
            &self.blogger_client_id,
            &self.blogger_client_secret,
            &self.blogger_refresh_token,
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => Ok(BloggerCredentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                refresh_token: refresh_token.clone(),
            }),
            _ => Err(SheetpostError::Config(format!(
                "{}, {} and {} are required",
                BLOGGER_CLIENT_ID, BLOGGER_CLIENT_SECRET, BLOGGER_REFRESH_TOKEN
            ))),
        }
    }

    /// ブログIDを決定する（引数の指定を設定値より優先）
    pub fn resolve_blog_id(&self, override_id: Option<&str>) -> Result<String, SheetpostError> {
        override_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| self.blog_id.clone())
            .ok_or_else(|| SheetpostError::Config(format!("{} is not set", BLOGGER_BLOG_ID)))
    }
}

fn read_env_file(path: &Path, vars: &mut HashMap<String, String>) -> Result<(), SheetpostError> {
    debug!("loading environment from {}", path.display());
    let iter = dotenvy::from_path_iter(path).map_err(|e| env_file_error(path, e))?;
    for item in iter {
        let (key, value) = item.map_err(|e| env_file_error(path, e))?;
        vars.insert(key, value);
    }
    Ok(())
}

fn env_file_error(path: &Path, err: dotenvy::Error) -> SheetpostError {
    SheetpostError::Config(format!("failed to read {}: {}", path.display(), err))
}
