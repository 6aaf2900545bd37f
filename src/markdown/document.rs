//! 投稿文書（タイトルと本文）の扱い

use std::fs;
use std::path::Path;

use log::debug;

use crate::api::SourceEncoding;
use crate::error::SheetpostError;

/// タイトル行がない文書に使うタイトル
pub const UNTITLED: &str = "Untitled";

/// Markdownテキストからタイトルと本文を分離する
///
/// `# `（シャープ1つと空白）で始まる最初の行をタイトルとし、それより後の行を本文とします。
/// タイトル行がない場合、またはタイトルが空の場合は [`UNTITLED`] を使い、入力全体を本文とします。
/// 本文は前後の空白を除いて返します。
///
/// ```rust
/// use sheetpost::split_title;
///
/// let (title, body) = split_title("intro\n# Novidades\n\nTexto");
/// assert_eq!(title, "Novidades");
/// assert_eq!(body, "Texto");
/// ```
pub fn split_title(text: &str) -> (String, String) {
    let lines: Vec<&str> = text.lines().collect();

    let heading = lines
        .iter()
        .position(|line| line.starts_with("# "))
        .map(|index| (index, lines[index][2..].trim()));

    match heading {
        Some((index, title)) if !title.is_empty() => (
            title.to_string(),
            lines[index + 1..].join("\n").trim().to_string(),
        ),
        _ => (UNTITLED.to_string(), lines.join("\n").trim().to_string()),
    }
}

/// Markdownファイルを読み込む
///
/// # 戻り値
///
/// * `Err(SheetpostError::FileNotFound)` - ファイルが存在しない場合
/// * `Err(SheetpostError::Encoding)` - 指定の戦略でデコードできない場合
pub fn read_markdown<P: AsRef<Path>>(
    path: P,
    encoding: &SourceEncoding,
) -> Result<String, SheetpostError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SheetpostError::FileNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    encoding.decode(&bytes).map_err(|e| match e {
        SheetpostError::Encoding(msg) => {
            SheetpostError::Encoding(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}
