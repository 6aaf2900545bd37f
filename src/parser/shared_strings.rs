//! `xl/sharedStrings.xml` の解析

use quick_xml::events::Event;
use quick_xml::Reader;

use super::xml_error;
use crate::error::SheetpostError;

/// 共有文字列テーブルを解析する
///
/// `<si>`要素ごとに1エントリを生成し、要素内のすべての`<t>`（リッチテキストの
/// 各ラン`<r><t>`を含む）のテキストを連結します。
///
/// ふりがな（`<rPh>`）配下の`<t>`は含めません。子孫の`<t>`をすべて集める読み方
/// （`.//t` 相当）ではふりがなが本文に連結されますが、ここではExcelの表示や
/// calamineと同じく本文のテキストのみを返します。
pub(crate) fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, SheetpostError> {
    let mut reader = Reader::from_reader(xml);
    // xml:space="preserve" の空白を保持するため、トリムは行わない
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut phonetic_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" if in_si => phonetic_depth += 1,
                b"t" if in_si && phonetic_depth == 0 => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                // <si/> も1エントリとして数える
                if e.local_name().as_ref() == b"si" {
                    strings.push(String::new());
                }
            }
            Ok(Event::Text(e)) if in_t => {
                let text = e.unescape().map_err(xml_error)?;
                current.push_str(&text);
            }
            Ok(Event::CData(e)) if in_t => {
                current.push_str(std::str::from_utf8(&e)?);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}
