//! `xl/worksheets/*.xml` の解析

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::xml_error;
use crate::error::SheetpostError;
use crate::types::{CellValue, Row};

/// 解析中のセル（`<c>` 開始から終了まで）
struct PendingCell {
    /// `t="s"`（共有文字列参照）かどうか
    shared: bool,
    /// `<v>` のテキスト。`<v>` 要素がない場合は `None`
    value: Option<String>,
}

impl PendingCell {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, SheetpostError> {
        let mut shared = false;
        for attr in e.attributes() {
            let attr = attr.map_err(xml_error)?;
            if attr.key.as_ref() == b"t" {
                shared = attr.value.as_ref() == b"s";
            }
        }
        Ok(Self {
            shared,
            value: None,
        })
    }

    /// 共有文字列の解決、または数値変換を行う
    fn resolve(self, shared_strings: &[String]) -> Result<CellValue, SheetpostError> {
        let Some(raw) = self.value else {
            return Ok(CellValue::Empty);
        };

        if !self.shared {
            return Ok(CellValue::coerce(&raw));
        }

        let index: usize = raw.trim().parse().map_err(|_| {
            SheetpostError::Xml(format!("Invalid shared string index: '{}'", raw))
        })?;
        shared_strings
            .get(index)
            .map(|s| CellValue::Text(s.clone()))
            .ok_or_else(|| {
                SheetpostError::Xml(format!(
                    "Shared string index {} out of range (table has {} entries)",
                    index,
                    shared_strings.len()
                ))
            })
    }
}

/// ワークシートのセル値を行ごとに抽出する
///
/// 各 `<row>` の `<c>` 要素を出現順に並べます（列参照 `r="B2"` による位置合わせは行いません）。
///
/// # 引数
///
/// * `xml` - ワークシートパーツの内容
/// * `shared_strings` - `t="s"` セルの参照先となる共有文字列テーブル
pub(crate) fn parse_worksheet(
    xml: &[u8],
    shared_strings: &[String],
) -> Result<Vec<Row>, SheetpostError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut current_row: Option<Row> = None;
    let mut current_cell: Option<PendingCell> = None;
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => current_row = Some(Vec::new()),
                b"c" if current_row.is_some() => current_cell = Some(PendingCell::from_start(&e)?),
                b"v" => {
                    if let Some(cell) = current_cell.as_mut() {
                        cell.value = Some(String::new());
                        in_value = true;
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => rows.push(Vec::new()),
                b"c" => {
                    if let Some(row) = current_row.as_mut() {
                        row.push(CellValue::Empty);
                    }
                }
                b"v" => {
                    if let Some(cell) = current_cell.as_mut() {
                        cell.value = Some(String::new());
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_value => {
                let text = e.unescape().map_err(xml_error)?;
                if let Some(value) = current_cell.as_mut().and_then(|c| c.value.as_mut()) {
                    value.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"c" => {
                    if let Some(cell) = current_cell.take() {
                        let value = cell.resolve(shared_strings)?;
                        if let Some(row) = current_row.as_mut() {
                            row.push(value);
                        }
                    }
                }
                b"row" => {
                    if let Some(row) = current_row.take() {
                        rows.push(row);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <dimension ref="A1:C2"/>
  <sheetData>{}</sheetData>
</worksheet>"#,
            rows
        )
    }

    #[test]
    fn test_shared_string_lookup() {
        let xml = sheet(r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>"#);
        let shared = vec!["Hello".to_string()];
        let rows = parse_worksheet(xml.as_bytes(), &shared).unwrap();
        assert_eq!(rows, vec![vec![CellValue::Text("Hello".to_string())]]);
    }

    #[test]
    fn test_numeric_coercion() {
        let xml = sheet(
            r#"<row r="1"><c r="A1"><v>42</v></c><c r="B1" t="n"><v>3.14</v></c><c r="C1" t="str"><v>N/A</v></c></row>"#,
        );
        let rows = parse_worksheet(xml.as_bytes(), &[]).unwrap();
        assert_eq!(rows[0][0], CellValue::Int(42));
        assert_eq!(rows[0][1], CellValue::Float("3.14".parse().unwrap()));
        assert_eq!(rows[0][2], CellValue::Text("N/A".to_string()));
    }

    #[test]
    fn test_cells_without_value_are_empty() {
        let xml = sheet(
            r#"<row r="1"><c r="A1" s="2"/><c r="B1" t="inlineStr"><is><t>inline</t></is></c><c r="C1"><v></v></c></row>"#,
        );
        let rows = parse_worksheet(xml.as_bytes(), &[]).unwrap();
        assert_eq!(
            rows,
            vec![vec![
                CellValue::Empty,
                CellValue::Empty,
                CellValue::Text(String::new()),
            ]]
        );
    }

    #[test]
    fn test_formula_text_is_ignored() {
        let xml = sheet(r#"<row r="1"><c r="A1"><f>SUM(B1:C1)</f><v>7</v></c></row>"#);
        let rows = parse_worksheet(xml.as_bytes(), &[]).unwrap();
        assert_eq!(rows, vec![vec![CellValue::Int(7)]]);
    }

    #[test]
    fn test_rows_keep_document_order_and_empty_rows() {
        let xml = sheet(
            r#"<row r="1"><c r="A1"><v>1</v></c></row><row r="2"/><row r="3"><c r="A3"><v>3</v></c><c r="B3"><v>4</v></c></row>"#,
        );
        let rows = parse_worksheet(xml.as_bytes(), &[]).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![CellValue::Int(1)],
                vec![],
                vec![CellValue::Int(3), CellValue::Int(4)],
            ]
        );
    }

    #[test]
    fn test_shared_string_index_out_of_range() {
        let xml = sheet(r#"<row r="1"><c r="A1" t="s"><v>5</v></c></row>"#);
        let result = parse_worksheet(xml.as_bytes(), &["only".to_string()]);
        assert!(matches!(result, Err(SheetpostError::Xml(msg)) if msg.contains("out of range")));
    }

    #[test]
    fn test_invalid_shared_string_index() {
        let xml = sheet(r#"<row r="1"><c r="A1" t="s"><v>abc</v></c></row>"#);
        assert!(parse_worksheet(xml.as_bytes(), &[]).is_err());
    }
}
