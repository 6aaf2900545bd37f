//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::warn;

use crate::error::SheetpostError;

/// Markdownファイルの文字エンコーディング戦略
///
/// 投稿用のMarkdownファイルをテキストとして読み込む際の扱いを指定します。
/// 設定では `MARKDOWN_FALLBACK_ENCODING`、CLIでは `--encoding` で選択できます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceEncoding {
    /// UTF-8のみを受け付ける
    ///
    /// 不正なバイト列を含むファイルは `SheetpostError::Encoding` になります。
    Utf8,

    /// UTF-8として読めない場合に指定のエンコーディングで再デコードする（デフォルトは`windows-1252`）
    ///
    /// フォールバックが使われた場合は警告ログを出力します。
    /// フォールバック先でもデコードできないバイト列がある場合はエラーになります。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use sheetpost::SourceEncoding;
    ///
    /// let encoding = SourceEncoding::from_label("windows-1252").unwrap();
    /// assert_eq!(encoding.decode(b"caf\xe9").unwrap(), "café");
    /// ```
    Utf8WithFallback(&'static Encoding),
}

impl Default for SourceEncoding {
    fn default() -> Self {
        SourceEncoding::Utf8WithFallback(WINDOWS_1252)
    }
}

impl SourceEncoding {
    /// ラベルから戦略を決定する
    ///
    /// `none` / `strict` / `utf-8` は `Utf8`、それ以外は WHATWG Encoding のラベル
    /// （`windows-1252`, `latin1`, `shift_jis` など）として解釈します。
    ///
    /// # 戻り値
    ///
    /// * `Err(SheetpostError::Config)` - 未知のラベルの場合
    pub fn from_label(label: &str) -> Result<Self, SheetpostError> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("none") || label.eq_ignore_ascii_case("strict") {
            return Ok(SourceEncoding::Utf8);
        }

        match Encoding::for_label(label.as_bytes()) {
            Some(encoding) if encoding == UTF_8 => Ok(SourceEncoding::Utf8),
            Some(encoding) => Ok(SourceEncoding::Utf8WithFallback(encoding)),
            None => Err(SheetpostError::Config(format!(
                "Unknown text encoding label: '{}'",
                label
            ))),
        }
    }

    /// バイト列をテキストにデコードする
    pub fn decode(&self, bytes: &[u8]) -> Result<String, SheetpostError> {
        let utf8_error = match std::str::from_utf8(bytes) {
            Ok(text) => return Ok(text.to_string()),
            Err(e) => e,
        };

        match self {
            SourceEncoding::Utf8 => Err(SheetpostError::Encoding(format!(
                "input is not valid UTF-8: {}",
                utf8_error
            ))),
            SourceEncoding::Utf8WithFallback(encoding) => {
                let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
                if had_errors {
                    return Err(SheetpostError::Encoding(format!(
                        "input is neither valid UTF-8 nor valid {}",
                        encoding.name()
                    )));
                }
                warn!(
                    "input is not valid UTF-8 ({}), decoded as {}",
                    utf8_error,
                    encoding.name()
                );
                Ok(text.into_owned())
            }
        }
    }

    /// 表示用のエンコーディング名
    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8 (strict)",
            SourceEncoding::Utf8WithFallback(encoding) => encoding.name(),
        }
    }
}

/// 出力フォーマット
///
/// 取得した行をコマンドの標準出力に書き出す際の形式を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// 1行ごとにセルを ` | ` で区切ったテキスト（デフォルト）
    ///
    /// # 出力例
    ///
    /// ```text
    /// Nome | Cidade
    /// Ana | Recife
    /// ```
    #[default]
    Text,

    /// 整形済みJSON
    ///
    /// # 出力例
    ///
    /// ```json
    /// [
    ///   ["Nome", "Cidade"],
    ///   ["Ana", "Recife"]
    /// ]
    /// ```
    Json,
}
