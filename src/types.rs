//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::fmt;

use serde::{Serialize, Serializer};

/// デコード済みのセル値
///
/// JSON出力では型を保ったまま出力されます（`Empty`は空文字列）。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 文字列（共有文字列、または数値変換に失敗した生の値）
    Text(String),

    /// 整数
    Int(i64),

    /// 浮動小数点数
    Float(f64),

    /// `<v>`要素を持たないセル
    Empty,
}

impl CellValue {
    /// 生の値から数値への変換を試みる
    ///
    /// 小数点を含む場合は浮動小数点数、それ以外は整数として解釈します。
    /// どちらにも変換できない場合は元の文字列をそのまま保持します。
    /// `i64` に収まらない整数と、有限でない浮動小数点数（JSONでは `null` になる）も文字列のままです。
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        let parsed = if trimmed.contains('.') {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(CellValue::Float)
        } else {
            trimmed.parse::<i64>().ok().map(CellValue::Int)
        };
        parsed.unwrap_or_else(|| CellValue::Text(raw.to_string()))
    }

    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Empty => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Int(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Empty => serializer.serialize_str(""),
        }
    }
}

/// 1行分のセル値
pub type Row = Vec<CellValue>;

/// `xl/workbook.xml` に記載されたシート記述子
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    /// シート名
    pub name: String,
    /// `sheetId` 属性
    pub sheet_id: String,
    /// `r:id` 属性（パッケージリレーションシップID）
    pub relationship_id: String,
}
