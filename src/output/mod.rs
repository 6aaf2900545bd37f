//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use std::fmt::Display;
use std::io::Write;

use serde::Serialize;

use crate::api::OutputFormat;
use crate::error::SheetpostError;

pub use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（テキスト, JSON）をenumとして表現します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatter {
    Text,
    Json,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => OutputFormatter::Text,
            OutputFormat::Json => OutputFormatter::Json,
        }
    }

    /// 行の列を指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `rows` - 出力する行（セルは表示とシリアライズの両方に対応している必要があります）
    /// * `writer` - 出力先のライター
    pub fn render_rows<T, W>(&self, rows: &[Vec<T>], writer: &mut W) -> Result<(), SheetpostError>
    where
        T: Display + Serialize,
        W: Write,
    {
        match self {
            OutputFormatter::Text => TextFormatter.render_rows(rows, writer),
            OutputFormatter::Json => JsonFormatter.render(rows, writer),
        }
    }
}
