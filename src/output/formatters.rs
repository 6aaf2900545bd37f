//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use std::fmt::Display;
use std::io::Write;

use serde::Serialize;

use crate::error::SheetpostError;

/// 行が1つもない場合のテキスト出力
pub const NO_DATA_NOTICE: &str = "No data found for the given range.";

/// テキスト形式のフォーマッター
pub struct TextFormatter;

impl TextFormatter {
    pub fn render_rows<T: Display, W: Write>(
        &self,
        rows: &[Vec<T>],
        writer: &mut W,
    ) -> Result<(), SheetpostError> {
        if rows.is_empty() {
            writeln!(writer, "{}", NO_DATA_NOTICE)?;
            return Ok(());
        }

        for row in rows {
            let line = row
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(writer, "{}", line)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// JSON形式のフォーマッター
pub struct JsonFormatter;

impl JsonFormatter {
    /// 任意の値を整形済みJSONとして出力する（非ASCII文字はエスケープしない）
    pub fn render<T: Serialize + ?Sized, W: Write>(
        &self,
        value: &T,
        writer: &mut W,
    ) -> Result<(), SheetpostError> {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
