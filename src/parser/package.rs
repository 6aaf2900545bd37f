//! XLSXパッケージ（ZIPアーカイブ）へのアクセス

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use super::shared_strings::parse_shared_strings;
use super::workbook::{parse_sheets, parse_worksheet_relationships};
use super::worksheet::parse_worksheet;
use crate::error::SheetpostError;
use crate::security::{validate_part_name, PackageLimits};
use crate::types::{Row, SheetInfo};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// 開いたXLSXパッケージ
///
/// アーカイブのハンドルはこの値が所有し、ドロップ時に解放されます。
/// 各メソッドは必要なパーツをその都度読み込み、結果をキャッシュしません。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetpost::XlsxPackage;
///
/// # fn main() -> Result<(), sheetpost::SheetpostError> {
/// let mut package = XlsxPackage::open("planilha.xlsx")?;
/// for sheet in package.list_sheets()? {
///     println!("{} ({})", sheet.name, sheet.relationship_id);
/// }
/// let rows = package.sheet_rows("Clientes")?;
/// # Ok(())
/// # }
/// ```
pub struct XlsxPackage<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl XlsxPackage<BufReader<File>> {
    /// ファイルパスからパッケージを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(XlsxPackage)` - アーカイブとして読み込めた場合
    /// * `Err(SheetpostError::FileNotFound)` - ファイルが存在しない場合
    /// * `Err(SheetpostError)` - ZIPとして不正、または制限に違反した場合
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SheetpostError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SheetpostError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> XlsxPackage<R> {
    /// 任意のリーダーからパッケージを開く
    ///
    /// 開く時点で、パーツ数・各パーツのサイズ・パーツ名を検証します。
    pub fn from_reader(reader: R) -> Result<Self, SheetpostError> {
        let limits = PackageLimits::default();
        let mut archive = ZipArchive::new(reader).map_err(zip_error)?;

        limits.check_part_count(archive.len())?;

        let mut total_size = 0u64;
        for i in 0..archive.len() {
            let part = archive.by_index(i).map_err(zip_error)?;
            validate_part_name(part.name())?;
            limits.check_part_size(part.name(), part.size(), &mut total_size)?;
        }

        debug!(
            "opened XLSX package: {} parts, {} bytes uncompressed",
            archive.len(),
            total_size
        );
        Ok(Self { archive })
    }

    /// シート一覧を定義順に取得する
    pub fn list_sheets(&mut self) -> Result<Vec<SheetInfo>, SheetpostError> {
        let xml = self.read_part(WORKBOOK_PART)?;
        parse_sheets(&xml)
    }

    /// 共有文字列テーブルを読み込む
    ///
    /// 共有文字列を1つも持たないワークブックには `xl/sharedStrings.xml` が存在しないため、
    /// その場合は空のテーブルを返します。
    pub fn load_shared_strings(&mut self) -> Result<Vec<String>, SheetpostError> {
        match self.read_part(SHARED_STRINGS_PART) {
            Ok(xml) => parse_shared_strings(&xml),
            Err(SheetpostError::MissingPart(_)) => {
                debug!("{} not present, using empty table", SHARED_STRINGS_PART);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// リレーションシップID -> ワークシートのリソース名 のマッピングを読み込む
    pub fn load_relationships(&mut self) -> Result<HashMap<String, String>, SheetpostError> {
        let xml = self.read_part(WORKBOOK_RELS_PART)?;
        parse_worksheet_relationships(&xml)
    }

    /// ワークシートのセル値を読み込む
    ///
    /// # 引数
    ///
    /// * `resource_name` - `load_relationships` が返すリソース名（例: `sheet1`）
    /// * `shared_strings` - `load_shared_strings` が返すテーブル
    pub fn read_sheet(
        &mut self,
        resource_name: &str,
        shared_strings: &[String],
    ) -> Result<Vec<Row>, SheetpostError> {
        let part_name = format!("xl/worksheets/{}.xml", resource_name);
        let xml = self.read_part(&part_name)?;
        let rows = parse_worksheet(&xml, shared_strings)?;
        debug!("read {} rows from {}", rows.len(), part_name);
        Ok(rows)
    }

    /// シート名を指定してセル値を読み込む
    ///
    /// # 戻り値
    ///
    /// * `Err(SheetpostError::SheetNotFound)` - シート名が存在しない場合（利用可能なシート名を含む）
    /// * `Err(SheetpostError::WorksheetNotLocated)` - リレーションシップIDに対応するワークシートがない場合
    pub fn sheet_rows(&mut self, sheet_name: &str) -> Result<Vec<Row>, SheetpostError> {
        let shared_strings = self.load_shared_strings()?;
        let sheets = self.list_sheets()?;
        let relationships = self.load_relationships()?;

        let resource = locate_worksheet(&sheets, &relationships, sheet_name)?.to_string();
        self.read_sheet(&resource, &shared_strings)
    }

    /// パーツの内容をメモリに読み込む
    fn read_part(&mut self, name: &str) -> Result<Vec<u8>, SheetpostError> {
        let mut part = match self.archive.by_name(name) {
            Ok(part) => part,
            Err(ZipError::FileNotFound) => {
                return Err(SheetpostError::MissingPart(name.to_string()))
            }
            Err(e) => return Err(zip_error(e)),
        };

        let mut content = Vec::with_capacity(part.size() as usize);
        part.read_to_end(&mut content)?;
        Ok(content)
    }
}

/// シート名からワークシートのリソース名を解決する
fn locate_worksheet<'a>(
    sheets: &[SheetInfo],
    relationships: &'a HashMap<String, String>,
    sheet_name: &str,
) -> Result<&'a str, SheetpostError> {
    let sheet = sheets
        .iter()
        .find(|sheet| sheet.name == sheet_name)
        .ok_or_else(|| SheetpostError::SheetNotFound {
            name: sheet_name.to_string(),
            available: sheets.iter().map(|s| s.name.clone()).collect(),
        })?;

    relationships
        .get(&sheet.relationship_id)
        .map(String::as_str)
        .ok_or_else(|| SheetpostError::WorksheetNotLocated {
            sheet: sheet.name.clone(),
            relationship_id: sheet.relationship_id.clone(),
        })
}

fn zip_error(err: ZipError) -> SheetpostError {
    SheetpostError::Zip(err.to_string())
}
