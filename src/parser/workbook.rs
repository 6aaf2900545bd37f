//! `xl/workbook.xml` と `xl/_rels/workbook.xml.rels` の解析

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Reader};

use super::{attribute_value, xml_error};
use crate::error::SheetpostError;
use crate::types::SheetInfo;

/// `r:id` 属性が属するリレーションシップ名前空間
const RELATIONSHIPS_NS: &[u8] =
    b"http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// `<sheets>` 配下の `<sheet>` 要素からシート記述子を定義順に抽出する
///
/// リレーションシップIDは接頭辞ではなく名前空間URIで判定するため、
/// `r:id` 以外の接頭辞を使うパッケージでも取得できます。
pub(crate) fn parse_sheets(xml: &[u8]) -> Result<Vec<SheetInfo>, SheetpostError> {
    let mut reader = NsReader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    let mut in_sheets = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheets" => in_sheets = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"sheets" => in_sheets = false,
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if in_sheets && e.local_name().as_ref() == b"sheet" =>
            {
                // <sheet name="Sheet1" sheetId="1" r:id="rId1"/>
                let mut info = SheetInfo {
                    name: String::new(),
                    sheet_id: String::new(),
                    relationship_id: String::new(),
                };

                for attr in e.attributes() {
                    let attr = attr.map_err(xml_error)?;
                    let value = attribute_value(&attr)?;
                    match reader.resolve_attribute(attr.key) {
                        (ResolveResult::Bound(Namespace(ns)), local)
                            if ns == RELATIONSHIPS_NS && local.as_ref() == b"id" =>
                        {
                            info.relationship_id = value;
                        }
                        (ResolveResult::Unbound, local) => match local.as_ref() {
                            b"name" => info.name = value,
                            b"sheetId" => info.sheet_id = value,
                            _ => {}
                        },
                        _ => {}
                    }
                }

                sheets.push(info);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// ワークブックのリレーションシップから、ワークシートを指すものだけを抽出する
///
/// # 戻り値
///
/// リレーションシップID -> ワークシートのリソース名（ファイル名の拡張子を除いた部分）
pub(crate) fn parse_worksheet_relationships(
    xml: &[u8],
) -> Result<HashMap<String, String>, SheetpostError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut relationships = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;

                for attr in e.attributes() {
                    let attr = attr.map_err(xml_error)?;
                    match attr.key.as_ref() {
                        b"Id" => id = Some(attribute_value(&attr)?),
                        b"Target" => target = Some(attribute_value(&attr)?),
                        _ => {}
                    }
                }

                if let (Some(id), Some(target)) = (id, target) {
                    if let Some(resource) = worksheet_resource_name(&target) {
                        relationships.insert(id, resource);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// `worksheets/sheet1.xml` -> `sheet1`
///
/// 相対パス（`worksheets/...`）と絶対パス（`/xl/worksheets/...`）の両方を受け付けます。
/// ワークシート以外のターゲット（styles、theme など）は `None` になります。
fn worksheet_resource_name(target: &str) -> Option<String> {
    let relative = target.strip_prefix("/xl/").unwrap_or(target);
    let file = relative.strip_prefix("worksheets/")?;
    let stem = Path::new(file).file_stem()?.to_str()?;
    Some(stem.to_string())
}
