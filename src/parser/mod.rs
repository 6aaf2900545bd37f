//! Parser Module
//!
//! XLSXパッケージ（ZIP + XML）を直接解析し、シート一覧・共有文字列・セル値を抽出します。
//! スプレッドシート用の外部ライブラリは使用せず、`zip`と`quick-xml`のみで処理します。

mod package;
mod shared_strings;
mod workbook;
mod worksheet;

pub use package::XlsxPackage;

use quick_xml::events::attributes::Attribute;

use crate::error::SheetpostError;
use crate::types::Row;

/// 先頭から最大`limit`行を元の順序のまま返す
pub fn preview_rows(rows: Vec<Row>, limit: usize) -> Vec<Row> {
    rows.into_iter().take(limit).collect()
}

/// quick-xmlのエラーをクレートのエラー型に変換する
fn xml_error(err: impl std::fmt::Display) -> SheetpostError {
    SheetpostError::Xml(err.to_string())
}

/// 属性値をUTF-8として読み、実体参照を展開する
///
/// `Attribute::unescape_value` はquick-xmlの `encoding` フィーチャーが有効だと存在しないため、
/// フィーチャーの組み合わせに依存しないこの形で読み取ります。
fn attribute_value(attr: &Attribute<'_>) -> Result<String, SheetpostError> {
    let raw = std::str::from_utf8(&attr.value)?;
    let value = quick_xml::escape::unescape(raw).map_err(xml_error)?;
    Ok(value.into_owned())
}
