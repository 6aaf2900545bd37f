//! Security Tests
//!
//! 信頼できないパッケージを開く際の制限を検証します。
//! ZIP bomb攻撃、パストラバーサル攻撃などへの対策を確認します。

use std::io::{Cursor, Write};

use sheetpost::{SheetpostError, XlsxPackage};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// 指定した名前と内容のパーツを持つZIPアーカイブを作成
fn zip_with_parts<'a>(parts: impl IntoIterator<Item = (String, &'a [u8])>) -> Vec<u8> {
    let mut zip_data = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut zip_data));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap();
    }
    zip_data
}

fn open(zip_data: Vec<u8>) -> Result<XlsxPackage<Cursor<Vec<u8>>>, SheetpostError> {
    XlsxPackage::from_reader(Cursor::new(zip_data))
}

/// ZIP bomb攻撃のテスト: 大量のパーツを含むZIPアーカイブ
#[test]
fn test_zip_bomb_too_many_parts() {
    // 10,001個のパーツ（上限: 10,000）
    let zip_data = zip_with_parts((0..10_001).map(|i| (format!("xl/part{}.xml", i), &b"test"[..])));

    match open(zip_data) {
        Err(SheetpostError::SecurityViolation(msg)) => {
            assert!(msg.contains("too many parts"));
        }
        Err(e) => panic!("Expected SecurityViolation, got {:?}", e),
        Ok(_) => panic!("Expected SecurityViolation, got Ok"),
    }
}

/// ZIP bomb攻撃のテスト: 展開後のサイズが大きすぎるパーツ
#[test]
#[ignore] // 大きなデータを作成するため、通常のテストではスキップ
fn test_zip_bomb_large_part() {
    // 100MB + 1バイト
    let large_data = vec![0u8; 104_857_601];
    let zip_data = zip_with_parts([("xl/large.xml".to_string(), &large_data[..])]);

    match open(zip_data) {
        Err(SheetpostError::SecurityViolation(msg)) => {
            assert!(msg.contains("exceeds maximum size"));
        }
        _ => panic!("Expected SecurityViolation error"),
    }
}

/// パストラバーサル攻撃のテスト: `..`を含むパス
#[test]
fn test_path_traversal_dotdot() {
    let zip_data = zip_with_parts([("../etc/passwd".to_string(), &b"test"[..])]);

    match open(zip_data) {
        Err(SheetpostError::SecurityViolation(msg)) => {
            assert!(msg.contains("Invalid ZIP path"));
            assert!(msg.contains("path traversal"));
        }
        _ => panic!("Expected SecurityViolation error"),
    }
}

/// パストラバーサル攻撃のテスト: 絶対パス
#[test]
fn test_path_traversal_absolute_path() {
    let zip_data = zip_with_parts([("/etc/passwd".to_string(), &b"test"[..])]);

    match open(zip_data) {
        Err(SheetpostError::SecurityViolation(msg)) => {
            assert!(msg.contains("absolute part name"));
        }
        _ => panic!("Expected SecurityViolation error"),
    }
}

/// パストラバーサル攻撃のテスト: Windows形式の絶対パス
#[test]
fn test_path_traversal_windows_absolute_path() {
    let zip_data = zip_with_parts([("C:\\Windows\\system32".to_string(), &b"test"[..])]);

    match open(zip_data) {
        Err(SheetpostError::SecurityViolation(msg)) => {
            assert!(msg.contains("Invalid ZIP path"));
        }
        _ => panic!("Expected SecurityViolation error"),
    }
}

/// 正常なパッケージの処理でセキュリティエラーにならないことを確認
#[test]
fn test_valid_package_processing() {
    let zip_data = zip_with_parts([
        (
            "xl/workbook.xml".to_string(),
            &br#"<?xml version="1.0"?><workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="S" sheetId="1" r:id="rId1"/></sheets></workbook>"#[..],
        ),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            &br#"<?xml version="1.0"?><Relationships><Relationship Id="rId1" Target="worksheets/sheet1.xml"/></Relationships>"#[..],
        ),
        (
            "xl/worksheets/sheet1.xml".to_string(),
            &b"<?xml version=\"1.0\"?><worksheet><sheetData/></worksheet>"[..],
        ),
    ]);

    let mut package = open(zip_data).unwrap();
    assert!(package.sheet_rows("S").unwrap().is_empty());
}
