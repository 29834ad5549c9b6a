//! XML Metadata Parser Module
//!
//! XLSX内部のXMLファイルから、calamineで取得不可能な情報を抽出するモジュール。
//! フォント・水平アライメントなどのセル書式、非表示行/列、シート名とXMLパスの対応を提供します。

use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek};

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::SheetToMdError;
use crate::security::{validate_zip_path, SecurityConfig};

/// フォント情報（fonts/font要素）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FontInfo {
    pub name: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub underline: bool,
}

/// セル書式情報（cellXfs/xf要素）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CellXf {
    pub font_id: Option<usize>,
    /// 表示形式ID（164未満は組み込み形式）
    pub num_fmt_id: u32,
    /// alignment要素のhorizontal属性
    pub horizontal: Option<String>,
}

/// styles.xml の解析結果
#[derive(Debug, Clone, Default)]
pub(crate) struct StyleSheet {
    pub fonts: Vec<FontInfo>,
    pub cell_xfs: Vec<CellXf>,
    /// numFmtId -> formatCode（numFmts要素のカスタム形式）
    pub num_formats: HashMap<u32, String>,
}

/// シート単位のレイアウト情報
#[derive(Debug, Clone, Default)]
pub(crate) struct SheetLayout {
    /// 非表示行（0始まり）
    pub hidden_rows: HashSet<u32>,
    /// 非表示列（0始まり）
    pub hidden_cols: HashSet<u32>,
    /// セル座標 -> スタイルインデックス（c要素のs属性）
    pub cell_styles: HashMap<(u32, u32), usize>,
}

/// XLSXメタデータパーサー
///
/// XLSXファイル（ZIPアーカイブ）からXMLを直接解析し、
/// calamineで取得できない書式情報を抽出します。
#[derive(Debug, Clone)]
pub(crate) struct XlsxMetadataParser {
    fonts: Vec<FontInfo>,
    cell_xfs: Vec<CellXf>,
    num_formats: HashMap<u32, String>,
    /// シート名 -> レイアウト情報
    layouts: HashMap<String, SheetLayout>,
}

impl XlsxMetadataParser {
    /// XLSXファイル（ZIPアーカイブ）からメタデータを解析
    ///
    /// アーカイブの検証（ファイル数、パス、展開サイズ）を最初に行い、
    /// 違反があれば解析前に`SecurityViolation`を返します。
    pub fn new<R: Read + Seek>(xlsx_reader: R) -> Result<Self, SheetToMdError> {
        let security_config = SecurityConfig::default();
        let mut archive = ZipArchive::new(xlsx_reader)?;

        Self::check_archive(&mut archive, &security_config)?;

        let styles = match read_entry(&mut archive, "xl/styles.xml")? {
            Some(xml) => parse_styles(&xml)?,
            None => StyleSheet::default(),
        };

        let sheet_paths = Self::resolve_sheet_paths(&mut archive)?;

        let mut layouts = HashMap::new();
        for (sheet_name, path) in sheet_paths {
            if let Some(xml) = read_entry(&mut archive, &path)? {
                layouts.insert(sheet_name, parse_worksheet(&xml)?);
            }
        }

        Ok(Self {
            fonts: styles.fonts,
            cell_xfs: styles.cell_xfs,
            num_formats: styles.num_formats,
            layouts,
        })
    }

    /// セキュリティチェック: ファイル数、パス、単一ファイルサイズ、展開後サイズの累計
    fn check_archive<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        config: &SecurityConfig,
    ) -> Result<(), SheetToMdError> {
        if archive.len() > config.max_file_count {
            return Err(SheetToMdError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                config.max_file_count
            )));
        }

        let mut total_decompressed_size = 0u64;
        for i in 0..archive.len() {
            let file = archive.by_index(i)?;

            let file_name = file.name();
            validate_zip_path(file_name).map_err(|e| {
                SheetToMdError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;

            let file_size = file.size();
            if file_size > config.max_file_size {
                return Err(SheetToMdError::SecurityViolation(format!(
                    "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                    file_name, file_size, config.max_file_size
                )));
            }

            total_decompressed_size =
                total_decompressed_size
                    .checked_add(file_size)
                    .ok_or_else(|| {
                        SheetToMdError::SecurityViolation(
                            "Total decompressed size calculation overflow".to_string(),
                        )
                    })?;

            if total_decompressed_size > config.max_decompressed_size {
                return Err(SheetToMdError::SecurityViolation(format!(
                    "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                    total_decompressed_size, config.max_decompressed_size
                )));
            }
        }

        Ok(())
    }

    /// シート名 -> ワークシートXMLパスの対応を解決
    ///
    /// xl/workbook.xml の`sheet`要素の`r:id`を、xl/_rels/workbook.xml.rels の
    /// `Relationship`要素の`Target`に対応付けます。
    fn resolve_sheet_paths<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
    ) -> Result<Vec<(String, String)>, SheetToMdError> {
        let Some(workbook_xml) = read_entry(archive, "xl/workbook.xml")? else {
            return Ok(Vec::new());
        };
        let relationships = match read_entry(archive, "xl/_rels/workbook.xml.rels")? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        Ok(parse_workbook_sheets(&workbook_xml)?
            .into_iter()
            .filter_map(|(name, rel_id)| {
                relationships
                    .get(&rel_id)
                    .map(|target| (name, resolve_target(target)))
            })
            .collect())
    }

    /// スタイルインデックスからフォント情報を取得
    ///
    /// 範囲外のインデックスやフォント未定義の場合は既定フォント（fontId 0）を返します。
    pub fn font(&self, style_id: usize) -> Option<&FontInfo> {
        let font_id = self
            .cell_xfs
            .get(style_id)
            .and_then(|xf| xf.font_id)
            .unwrap_or(0);
        self.fonts.get(font_id).or_else(|| self.fonts.first())
    }

    /// スタイルインデックスから水平アライメントを取得
    pub fn horizontal(&self, style_id: usize) -> Option<&str> {
        self.cell_xfs
            .get(style_id)
            .and_then(|xf| xf.horizontal.as_deref())
    }

    /// スタイルインデックスの表示形式がパーセントなら、その小数桁数を返す
    ///
    /// 組み込み形式9（`0%`）と10（`0.00%`）、および`%`を含むカスタム形式が対象です。
    pub fn percent_decimals(&self, style_id: usize) -> Option<usize> {
        let xf = self.cell_xfs.get(style_id)?;
        match xf.num_fmt_id {
            9 => Some(0),
            10 => Some(2),
            id if id >= 164 => self
                .num_formats
                .get(&id)
                .and_then(|code| percent_format_decimals(code)),
            _ => None,
        }
    }

    /// シートのレイアウト情報を取得
    pub fn layout(&self, sheet_name: &str) -> Option<&SheetLayout> {
        self.layouts.get(sheet_name)
    }
}

/// ZIPエントリを読み込む（存在しない場合は`None`）
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, SheetToMdError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut xml_content = Vec::new();
    file.read_to_end(&mut xml_content)?;
    Ok(Some(xml_content))
}

/// 指定した属性の値を取得
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, SheetToMdError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| SheetToMdError::Xml(format!("XML attribute error: {}", e)))?;
        if attr.key.as_ref() == key {
            let raw = std::str::from_utf8(&attr.value)?;
            let value = unescape(raw)
                .map_err(|e| SheetToMdError::Xml(format!("XML escape error: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// 真偽値属性の判定（`1` / `true`）
fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// `<b/>`などのフラグ要素の判定（`val="0"`のみ偽）
fn flag_element(e: &BytesStart<'_>) -> Result<bool, SheetToMdError> {
    Ok(match attribute(e, b"val")? {
        Some(val) => !(val == "0" || val.eq_ignore_ascii_case("false")),
        None => true,
    })
}

/// xl/styles.xml の解析
///
/// `<numFmts>`、`<fonts>`、`<cellXfs>` を解析します。`<dxfs>`内のフォントや
/// `<cellStyleXfs>`内のxfは対象外です。
pub(crate) fn parse_styles(xml: &[u8]) -> Result<StyleSheet, SheetToMdError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut fonts = Vec::new();
    let mut cell_xfs = Vec::new();
    let mut num_formats = HashMap::new();
    let mut in_num_fmts = false;
    let mut in_fonts = false;
    let mut in_cell_xfs = false;
    let mut current_font: Option<FontInfo> = None;
    let mut current_xf: Option<CellXf> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"numFmts" => in_num_fmts = true,
                b"fonts" => in_fonts = true,
                b"font" if in_fonts => current_font = Some(FontInfo::default()),
                b"cellXfs" => in_cell_xfs = true,
                b"xf" if in_cell_xfs => current_xf = Some(parse_xf(&e)?),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                // <numFmt numFmtId="165" formatCode="0.0%"/>
                b"numFmt" if in_num_fmts => {
                    if let (Some(id), Some(code)) =
                        (attribute(&e, b"numFmtId")?, attribute(&e, b"formatCode")?)
                    {
                        num_formats.insert(id.parse()?, code);
                    }
                }
                b"font" if in_fonts => fonts.push(FontInfo::default()),
                b"xf" if in_cell_xfs => cell_xfs.push(parse_xf(&e)?),
                b"alignment" => {
                    if let Some(xf) = current_xf.as_mut() {
                        xf.horizontal = attribute(&e, b"horizontal")?;
                    }
                }
                name => {
                    if let Some(font) = current_font.as_mut() {
                        match name {
                            b"name" => font.name = attribute(&e, b"val")?,
                            b"b" => font.bold = flag_element(&e)?,
                            b"i" => font.italic = flag_element(&e)?,
                            b"strike" => font.strike = flag_element(&e)?,
                            b"u" => {
                                font.underline = attribute(&e, b"val")?.as_deref() != Some("none")
                            }
                            _ => {}
                        }
                    }
                }
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"numFmts" => in_num_fmts = false,
                b"fonts" => in_fonts = false,
                b"font" if in_fonts => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
                    }
                }
                b"cellXfs" => in_cell_xfs = false,
                b"xf" if in_cell_xfs => {
                    if let Some(xf) = current_xf.take() {
                        cell_xfs.push(xf);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(SheetToMdError::Xml(format!("styles.xml: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(StyleSheet {
        fonts,
        cell_xfs,
        num_formats,
    })
}

fn parse_xf(e: &BytesStart<'_>) -> Result<CellXf, SheetToMdError> {
    let font_id = match attribute(e, b"fontId")? {
        Some(id) => Some(id.parse()?),
        None => None,
    };
    let num_fmt_id = match attribute(e, b"numFmtId")? {
        Some(id) => id.parse()?,
        None => 0,
    };
    Ok(CellXf {
        font_id,
        num_fmt_id,
        horizontal: None,
    })
}

/// パーセント形式コードの小数桁数（`0.0%` -> 1）
///
/// 正の値のセクション（最初の`;`まで）だけを見ます。引用符内やエスケープされた`%`は数えません。
fn percent_format_decimals(code: &str) -> Option<usize> {
    let section = code.split(';').next().unwrap_or_default();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut after_point = false;
    let mut decimals = 0;
    let mut is_percent = false;

    for ch in section.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '\\' => escaped = true,
            '.' => after_point = true,
            '0' | '#' | '?' if after_point => decimals += 1,
            '%' => is_percent = true,
            _ => {}
        }
    }

    is_percent.then_some(decimals)
}

/// xl/workbook.xml の解析
///
/// シート名と`r:id`の組をシート順に返します。
fn parse_workbook_sheets(xml: &[u8]) -> Result<Vec<(String, String)>, SheetToMdError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"sheet" => {
                if let (Some(name), Some(rel_id)) = (attribute(&e, b"name")?, attribute(&e, b"r:id")?)
                {
                    sheets.push((name, rel_id));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SheetToMdError::Xml(format!("workbook.xml: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// リレーションシップファイルを解析（Id -> Target）
fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, SheetToMdError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut relationships = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attribute(&e, b"Id")?, attribute(&e, b"Target")?)
                {
                    relationships.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SheetToMdError::Xml(format!("workbook.xml.rels: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// リレーションシップのTargetをアーカイブ内パスに変換
///
/// `/xl/worksheets/sheet1.xml` のような絶対指定はそのまま、
/// `worksheets/sheet1.xml` のような相対指定は`xl/`基準で解決します。
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// ワークシートXMLの解析
///
/// 非表示行（`<row hidden="1">`）、非表示列（`<col hidden="1">`）、
/// セルごとのスタイルインデックス（`<c s="N">`）を収集します。
pub(crate) fn parse_worksheet(xml: &[u8]) -> Result<SheetLayout, SheetToMdError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut layout = SheetLayout::default();
    let mut in_cols = false;
    let mut next_row: u32 = 0;
    let mut next_col: u32 = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"cols" => in_cols = true,
                b"col" if in_cols => {
                    if attribute(&e, b"hidden")?.as_deref().is_some_and(is_truthy) {
                        let min = attribute(&e, b"min")?;
                        let max = attribute(&e, b"max")?;
                        if let (Some(min), Some(max)) = (min, max) {
                            // Excelの列番号は1始まり
                            let min = min.parse::<u32>()?.saturating_sub(1);
                            let max = max.parse::<u32>()?.saturating_sub(1);
                            layout.hidden_cols.extend(min..=max);
                        }
                    }
                }
                b"row" => {
                    let row = match attribute(&e, b"r")? {
                        Some(r) => r.parse::<u32>()?.saturating_sub(1),
                        None => next_row,
                    };
                    if attribute(&e, b"hidden")?.as_deref().is_some_and(is_truthy) {
                        layout.hidden_rows.insert(row);
                    }
                    next_row = row + 1;
                    next_col = 0;
                }
                b"c" => {
                    let (row, col) = match attribute(&e, b"r")?.as_deref().and_then(parse_cell_ref)
                    {
                        Some(coord) => coord,
                        None => (next_row.saturating_sub(1), next_col),
                    };
                    next_col = col + 1;
                    if let Some(style) = attribute(&e, b"s")? {
                        layout.cell_styles.insert((row, col), style.parse()?);
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"cols" {
                    in_cols = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SheetToMdError::Xml(format!("worksheet: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(layout)
}

/// セル参照文字列を座標に変換（例: "A1" -> (0, 0)、"AA10" -> (9, 26)）
fn parse_cell_ref(ref_str: &str) -> Option<(u32, u32)> {
    let split = ref_str.find(|c: char| c.is_ascii_digit())?;
    let (col_str, row_str) = ref_str.split_at(split);
    if col_str.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for ch in col_str.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let val = (ch.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        col = col.checked_mul(26)?.checked_add(val)?;
    }

    let row = row_str.parse::<u32>().ok()?.checked_sub(1)?;
    Some((row, col - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("B3"), Some((2, 1)));
        assert_eq!(parse_cell_ref("Z1"), Some((0, 25)));
        assert_eq!(parse_cell_ref("AA10"), Some((9, 26)));
        assert_eq!(parse_cell_ref("a1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref("A"), None);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("/xl/worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
    }

    #[test]
    fn test_parse_styles_fonts_and_xfs() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="3">
    <font><sz val="11"/><name val="Calibri"/></font>
    <font><b/><i/><sz val="11"/><name val="Courier New"/></font>
    <font><b val="0"/><strike/><u/><name val="Arial"/></font>
  </fonts>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="1"/></cellStyleXfs>
  <cellXfs count="3">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>
    <xf numFmtId="0" fontId="2" applyAlignment="1"><alignment horizontal="center"/></xf>
  </cellXfs>
  <dxfs count="1"><dxf><font><b/></font></dxf></dxfs>
</styleSheet>"#;

        let styles = parse_styles(xml).unwrap();
        let (fonts, xfs) = (styles.fonts, styles.cell_xfs);

        assert_eq!(fonts.len(), 3);
        assert_eq!(fonts[0].name.as_deref(), Some("Calibri"));
        assert!(!fonts[0].bold);
        assert!(fonts[1].bold && fonts[1].italic);
        assert_eq!(fonts[1].name.as_deref(), Some("Courier New"));
        assert!(!fonts[2].bold);
        assert!(fonts[2].strike && fonts[2].underline);

        assert_eq!(xfs.len(), 3);
        assert_eq!(xfs[1].font_id, Some(1));
        assert_eq!(xfs[1].horizontal, None);
        assert_eq!(xfs[2].font_id, Some(2));
        assert_eq!(xfs[2].horizontal.as_deref(), Some("center"));
    }

    #[test]
    fn test_parse_styles_percent_formats() {
        let xml = br#"<styleSheet>
  <numFmts count="2">
    <numFmt numFmtId="164" formatCode="0.0%"/>
    <numFmt numFmtId="165" formatCode="yyyy-mm-dd"/>
  </numFmts>
  <fonts count="1"><font><name val="Calibri"/></font></fonts>
  <cellXfs count="5">
    <xf numFmtId="0" fontId="0"/>
    <xf numFmtId="9" fontId="0" applyNumberFormat="1"/>
    <xf numFmtId="10" fontId="0" applyNumberFormat="1"/>
    <xf numFmtId="164" fontId="0" applyNumberFormat="1"/>
    <xf numFmtId="165" fontId="0" applyNumberFormat="1"/>
  </cellXfs>
</styleSheet>"#;

        let styles = parse_styles(xml).unwrap();
        assert_eq!(styles.num_formats.get(&164).map(String::as_str), Some("0.0%"));

        let parser = XlsxMetadataParser {
            fonts: styles.fonts,
            cell_xfs: styles.cell_xfs,
            num_formats: styles.num_formats,
            layouts: HashMap::new(),
        };
        assert_eq!(parser.percent_decimals(0), None);
        assert_eq!(parser.percent_decimals(1), Some(0));
        assert_eq!(parser.percent_decimals(2), Some(2));
        assert_eq!(parser.percent_decimals(3), Some(1));
        assert_eq!(parser.percent_decimals(4), None);
        assert_eq!(parser.percent_decimals(99), None);
    }

    #[test]
    fn test_percent_format_decimals() {
        assert_eq!(percent_format_decimals("0%"), Some(0));
        assert_eq!(percent_format_decimals("0.000%;-0.000%"), Some(3));
        assert_eq!(percent_format_decimals(r#"0.0"%""#), None);
        assert_eq!(percent_format_decimals(r"0\%"), None);
        assert_eq!(percent_format_decimals("#,##0.00"), None);
    }

    #[test]
    fn test_parse_worksheet_hidden_and_styles() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <cols>
    <col min="2" max="3" width="0" hidden="1" customWidth="1"/>
    <col min="5" max="5" width="12"/>
  </cols>
  <sheetData>
    <row r="1"><c r="A1" s="1" t="s"><v>0</v></c><c r="B1" s="2"/></row>
    <row r="2" hidden="1"><c r="A2"><v>1</v></c></row>
    <row r="4" hidden="true"/>
  </sheetData>
</worksheet>"#;

        let layout = parse_worksheet(xml).unwrap();

        assert_eq!(layout.hidden_cols, HashSet::from([1, 2]));
        assert_eq!(layout.hidden_rows, HashSet::from([1, 3]));
        assert_eq!(layout.cell_styles.get(&(0, 0)), Some(&1));
        assert_eq!(layout.cell_styles.get(&(0, 1)), Some(&2));
        assert_eq!(layout.cell_styles.get(&(1, 0)), None);
    }

    #[test]
    fn test_parse_workbook_sheets_and_relationships() {
        let workbook = br#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Data" sheetId="1" r:id="rId2"/>
    <sheet name="Q1 &amp; Q2" sheetId="2" r:id="rId1"/>
  </sheets>
</workbook>"#;
        let rels = br#"<Relationships>
  <Relationship Id="rId1" Type="worksheet" Target="worksheets/sheet2.xml"/>
  <Relationship Id="rId2" Type="worksheet" Target="/xl/worksheets/sheet1.xml"/>
</Relationships>"#;

        let sheets = parse_workbook_sheets(workbook).unwrap();
        assert_eq!(
            sheets,
            vec![
                ("Data".to_string(), "rId2".to_string()),
                ("Q1 & Q2".to_string(), "rId1".to_string()),
            ]
        );

        let relationships = parse_relationships(rels).unwrap();
        assert_eq!(relationships.get("rId1").map(String::as_str), Some("worksheets/sheet2.xml"));
        assert_eq!(
            relationships.get("rId2").map(String::as_str),
            Some("/xl/worksheets/sheet1.xml")
        );
    }

    #[test]
    fn test_attribute_decoding() {
        let element = BytesStart::new("sheet").with_attributes([
            (&b"name"[..], &b"R&amp;D"[..]),
            (&b"bad"[..], &b"\xff\xfe"[..]),
            (&b"entity"[..], &b"&bogus;"[..]),
        ]);

        assert_eq!(attribute(&element, b"name").unwrap().as_deref(), Some("R&D"));
        assert_eq!(attribute(&element, b"missing").unwrap(), None);
        assert!(matches!(
            attribute(&element, b"bad"),
            Err(SheetToMdError::Utf8(_))
        ));
        assert!(matches!(
            attribute(&element, b"entity"),
            Err(SheetToMdError::Xml(_))
        ));
    }

    #[test]
    fn test_font_lookup_falls_back_to_default() {
        let parser = XlsxMetadataParser {
            fonts: vec![
                FontInfo {
                    name: Some("Calibri".to_string()),
                    ..FontInfo::default()
                },
                FontInfo {
                    bold: true,
                    ..FontInfo::default()
                },
            ],
            cell_xfs: vec![
                CellXf::default(),
                CellXf {
                    font_id: Some(1),
                    horizontal: Some("left".to_string()),
                    ..CellXf::default()
                },
            ],
            num_formats: HashMap::new(),
            layouts: HashMap::new(),
        };

        assert!(parser.font(1).is_some_and(|f| f.bold));
        assert_eq!(parser.font(0).and_then(|f| f.name.as_deref()), Some("Calibri"));
        assert_eq!(parser.font(99).and_then(|f| f.name.as_deref()), Some("Calibri"));
        assert_eq!(parser.horizontal(1), Some("left"));
        assert_eq!(parser.horizontal(0), None);
        assert!(parser.layout("missing").is_none());
    }
}
