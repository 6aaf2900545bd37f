//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// sheetpostクレート全体で使用するエラー型
///
/// XLSXパッケージの読み込み、Markdownファイルのデコード、設定の検証、
/// Google API呼び出しで発生するすべてのエラーを統一的に扱います。
/// いずれのエラーも呼び出し元のコマンドにとって終端的であり、リトライは行いません。
///
/// # エラーの種類
///
/// - 設定エラー: `Config`
/// - リソース不在: `FileNotFound`, `MissingPart`, `SheetNotFound`, `WorksheetNotLocated`
/// - デコードエラー: `Credential`, `Encoding`, `Xml`, `Zip`, `Utf8`, `Json`
/// - 上流サービスのエラー: `Http`, `Api`, `Token`
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetpost::SheetpostError;
/// use std::fs::File;
///
/// fn open_workbook(path: &str) -> Result<(), SheetpostError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum SheetpostError {
    /// I/O操作中に発生したエラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 指定されたローカルファイルが存在しない
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// UTF-8文字列の変換エラー
    ///
    /// XML属性値などのバイト列をUTF-8として解釈できなかった場合に発生します。
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// XMLパーツの解析エラー
    ///
    /// 不正なXML、または共有文字列インデックスが範囲外のセルなど、
    /// パーツの内容が解釈できない場合に発生します。
    #[error("XML parse error: {0}")]
    Xml(String),

    /// パッケージ内に必要なパーツが存在しない
    ///
    /// 例: `xl/workbook.xml` が欠落している場合
    #[error("Package part not found: {0}")]
    MissingPart(String),

    /// 指定されたシート名がワークブックに存在しない
    ///
    /// エラーメッセージには利用可能なシート名の一覧が含まれます。
    ///
    /// # 例
    ///
    /// ```rust
    /// use sheetpost::SheetpostError;
    ///
    /// let error = SheetpostError::SheetNotFound {
    ///     name: "Summary".to_string(),
    ///     available: vec!["Sheet1".to_string(), "Data".to_string()],
    /// };
    /// assert_eq!(
    ///     error.to_string(),
    ///     "Sheet 'Summary' not found. Available: [\"Sheet1\", \"Data\"]"
    /// );
    /// ```
    #[error("Sheet '{name}' not found. Available: {available:?}")]
    SheetNotFound {
        /// 要求されたシート名
        name: String,
        /// ワークブックに存在するシート名（定義順）
        available: Vec<String>,
    },

    /// シートのリレーションシップIDに対応するワークシートパーツが見つからない
    #[error("Could not locate worksheet XML for sheet '{sheet}' (relationship '{relationship_id}')")]
    WorksheetNotLocated {
        /// シート名
        sheet: String,
        /// `xl/workbook.xml` に記載されていたリレーションシップID
        relationship_id: String,
    },

    /// セキュリティ制限に違反したエラー
    ///
    /// パーツ数の上限、展開後サイズの上限、危険なパーツ名などを検出した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// 設定の検証に失敗したエラー
    ///
    /// 必須の環境変数が欠落している、値の形式が不正である場合などに発生します。
    /// ネットワーク呼び出しより前に報告されます。
    #[error("Configuration error: {0}")]
    Config(String),

    /// サービスアカウント資格情報のデコードエラー
    #[error("Invalid service account credential: {0}")]
    Credential(String),

    /// Markdownファイルのテキストエンコーディングエラー
    #[error("Text encoding error: {0}")]
    Encoding(String),

    /// JSONのシリアライズ/デシリアライズエラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JWTアサーションの署名エラー
    #[error("Failed to sign token assertion: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// HTTPクライアントのエラー（そのまま伝播）
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google APIがエラーレスポンスを返した
    #[error("API request failed with status {status}: {message}")]
    Api {
        /// HTTPステータスコード
        status: u16,
        /// レスポンスから取り出したエラーメッセージ
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: SheetpostError = io_err.into();

        match error {
            SheetpostError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_sheet_not_found_lists_available_names() {
        let error = SheetpostError::SheetNotFound {
            name: "Missing".to_string(),
            available: vec!["Sheet1".to_string(), "Sheet2".to_string()],
        };

        let msg = error.to_string();
        assert!(msg.contains("'Missing'"));
        assert!(msg.contains("Sheet1"));
        assert!(msg.contains("Sheet2"));
    }

    #[test]
    fn test_worksheet_not_located_display() {
        let error = SheetpostError::WorksheetNotLocated {
            sheet: "Data".to_string(),
            relationship_id: "rId9".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.starts_with("Could not locate worksheet XML"));
        assert!(msg.contains("Data"));
        assert!(msg.contains("rId9"));
    }

    #[test]
    fn test_file_not_found_display() {
        let error = SheetpostError::FileNotFound(PathBuf::from("posts/hello.md"));
        assert_eq!(error.to_string(), "File not found: posts/hello.md");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: SheetpostError = json_err.into();
        assert!(matches!(error, SheetpostError::Json(_)));
        assert!(error.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), SheetpostError> {
            let _file = std::fs::File::open("nonexistent_workbook.xlsx")?;
            Ok(())
        }

        match io_operation() {
            Err(SheetpostError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    #[test]
    fn test_all_error_formats() {
        let config_err = SheetpostError::Config("BLOGGER_CLIENT_ID is required".to_string());
        assert!(config_err.to_string().starts_with("Configuration error"));

        let api_err = SheetpostError::Api {
            status: 404,
            message: "Blog not found".to_string(),
        };
        assert_eq!(
            api_err.to_string(),
            "API request failed with status 404: Blog not found"
        );

        let xml_err = SheetpostError::Xml("unexpected EOF".to_string());
        assert!(xml_err.to_string().starts_with("XML parse error"));

        let part_err = SheetpostError::MissingPart("xl/workbook.xml".to_string());
        assert_eq!(
            part_err.to_string(),
            "Package part not found: xl/workbook.xml"
        );
    }
}
