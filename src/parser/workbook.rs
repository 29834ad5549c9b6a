//! Workbook Parser Module
//!
//! calamineでセル値を、XMLメタデータパーサーで書式と可視性を取得し、
//! XLSXワークシート1枚を入力ドキュメントに変換します。

use std::io::Cursor;
use std::path::PathBuf;

use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader, Sheets};
use chrono::Timelike;
use log::debug;

use super::{DocumentSource, InputData};
use crate::api::SheetSelector;
use crate::error::SheetToMdError;
use crate::parser::XlsxMetadataParser;
use crate::types::{AttributeGrid, Document, TextGrid, VisibilityMask};

/// XLSXワークブックから1シートを読み込むソース
///
/// グリッドは常にA1を原点とし、データ範囲の右下端までを含みます。
/// 非表示行・列は`<row hidden>` / `<col hidden>`から、太字・斜体・取り消し線・フォント名は
/// セルのスタイル（cellXfs → fonts）から取得します。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetmd::{DocumentSource, SheetSelector, XlsxDocumentSource};
///
/// let document = XlsxDocumentSource::from_path("report.xlsx")
///     .with_sheet(SheetSelector::Name("Summary".to_string()))
///     .load_document()?;
/// println!("{} x {}", document.row_count(), document.col_count());
/// # Ok::<(), sheetmd::SheetToMdError>(())
/// ```
#[derive(Debug, Clone)]
pub struct XlsxDocumentSource {
    input: InputData,
    selector: SheetSelector,
}

impl XlsxDocumentSource {
    /// ファイルパスから生成（最初のシートを選択）
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            input: InputData::Path(path.into()),
            selector: SheetSelector::default(),
        }
    }

    /// メモリ上のバイト列から生成（最初のシートを選択）
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            input: InputData::Bytes(bytes.into()),
            selector: SheetSelector::default(),
        }
    }

    /// 変換対象のシートを指定
    pub fn with_sheet(mut self, selector: SheetSelector) -> Self {
        self.selector = selector;
        self
    }
}

impl DocumentSource for XlsxDocumentSource {
    fn load_document(&self) -> Result<Document, SheetToMdError> {
        let buffer = self.input.read()?;

        // アーカイブ検証を含むため、calamineより先に解析する
        let metadata = XlsxMetadataParser::new(Cursor::new(buffer.as_slice()))?;

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        let mut workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(SheetToMdError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        let sheet_name = select_sheet(&workbook.sheet_names(), &self.selector)?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| SheetToMdError::Parse(e.into()))?;

        let document = build_document(&sheet_name, &range, &metadata);
        debug!(
            "loaded sheet '{}' ({} rows x {} cols, {} hidden rows, {} hidden cols)",
            document.name,
            document.row_count(),
            document.col_count(),
            document.hidden_rows.hidden_count(),
            document.hidden_columns.hidden_count()
        );

        Ok(document)
    }
}

/// シート選択方式に基づいてシート名を決定
fn select_sheet(sheet_names: &[String], selector: &SheetSelector) -> Result<String, SheetToMdError> {
    match selector {
        SheetSelector::Index(index) => sheet_names.get(*index).cloned().ok_or_else(|| {
            SheetToMdError::Config(format!(
                "Sheet index {} is out of range (total: {})",
                index,
                sheet_names.len()
            ))
        }),
        SheetSelector::Name(name) => {
            if sheet_names.contains(name) {
                Ok(name.clone())
            } else {
                Err(SheetToMdError::Config(format!("Sheet '{}' not found", name)))
            }
        }
    }
}

/// セル値とメタデータからドキュメントを組み立てる
fn build_document(sheet_name: &str, range: &Range<Data>, metadata: &XlsxMetadataParser) -> Document {
    let (rows, cols) = match range.end() {
        Some((last_row, last_col)) if !range.is_empty() => (last_row + 1, last_col + 1),
        _ => (0, 0),
    };

    let layout = metadata.layout(sheet_name);
    let style_of = |row: u32, col: u32| {
        layout
            .and_then(|l| l.cell_styles.get(&(row, col)).copied())
            .unwrap_or(0)
    };

    let mut values: TextGrid = Vec::with_capacity(rows as usize);
    let mut font_families: AttributeGrid = Vec::with_capacity(rows as usize);
    let mut font_weights: AttributeGrid = Vec::with_capacity(rows as usize);
    let mut font_styles: AttributeGrid = Vec::with_capacity(rows as usize);
    let mut line_decorations: AttributeGrid = Vec::with_capacity(rows as usize);
    let mut alignments: AttributeGrid = Vec::with_capacity(rows as usize);

    for row in 0..rows {
        let mut value_row = Vec::with_capacity(cols as usize);
        let mut family_row = Vec::with_capacity(cols as usize);
        let mut weight_row = Vec::with_capacity(cols as usize);
        let mut style_row = Vec::with_capacity(cols as usize);
        let mut line_row = Vec::with_capacity(cols as usize);
        let mut align_row = Vec::with_capacity(cols as usize);

        for col in 0..cols {
            let cell = range.get_value((row, col)).unwrap_or(&Data::Empty);
            let style_id = style_of(row, col);
            let font = metadata.font(style_id);

            let weight = if font.is_some_and(|f| f.bold) {
                "bold"
            } else {
                "normal"
            };
            let style = if font.is_some_and(|f| f.italic) {
                "italic"
            } else {
                "normal"
            };
            let line = match font {
                Some(f) if f.strike => "line-through",
                Some(f) if f.underline => "underline",
                _ => "none",
            };

            value_row.push(cell_text(cell, metadata.percent_decimals(style_id)));
            family_row.push(font.and_then(|f| f.name.clone()));
            weight_row.push(Some(weight.to_string()));
            style_row.push(Some(style.to_string()));
            line_row.push(Some(line.to_string()));
            align_row.push(Some(
                metadata
                    .horizontal(style_id)
                    .unwrap_or_else(|| default_alignment(cell))
                    .to_string(),
            ));
        }

        values.push(value_row);
        font_families.push(family_row);
        font_weights.push(weight_row);
        font_styles.push(style_row);
        line_decorations.push(line_row);
        alignments.push(align_row);
    }

    let mut hidden_rows = VisibilityMask::visible(rows as usize);
    let mut hidden_columns = VisibilityMask::visible(cols as usize);
    if let Some(layout) = layout {
        for &row in layout.hidden_rows.iter().filter(|r| **r < rows) {
            hidden_rows = hidden_rows.with_hidden(row as usize);
        }
        for &col in layout.hidden_cols.iter().filter(|c| **c < cols) {
            hidden_columns = hidden_columns.with_hidden(col as usize);
        }
    }

    Document {
        name: sheet_name.to_string(),
        values,
        font_families,
        font_weights,
        font_styles,
        line_decorations,
        alignments,
        hidden_rows,
        hidden_columns,
    }
}

/// セルの表示テキスト
///
/// 日時はISO 8601形式、パーセント書式の数値は`25%`のように表示値へ変換します。
fn cell_text(cell: &Data, percent_decimals: Option<usize>) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::Float(n) => match percent_decimals {
            Some(decimals) => format_percent(*n, decimals),
            None => n.to_string(),
        },
        Data::Int(n) => match percent_decimals {
            Some(decimals) => format_percent(*n as f64, decimals),
            None => n.to_string(),
        },
        Data::DateTime(dt) => format_date_time(dt),
        other => other.to_string(),
    }
}

fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

/// Excelの日時シリアル値を表示テキストに変換
///
/// 時刻部分がなければ`%Y-%m-%d`、日付部分がなければ`%H:%M:%S`、
/// 経過時間（`[h]:mm:ss`）は`h:mm:ss`で表示します。
/// 変換できないシリアル値はそのまま数値で表示します。
fn format_date_time(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        return match dt.as_duration() {
            Some(duration) => {
                let seconds = duration.num_seconds();
                let sign = if seconds < 0 { "-" } else { "" };
                let seconds = seconds.unsigned_abs();
                format!(
                    "{}{}:{:02}:{:02}",
                    sign,
                    seconds / 3600,
                    seconds % 3600 / 60,
                    seconds % 60
                )
            }
            None => dt.as_f64().to_string(),
        };
    }

    match dt.as_datetime() {
        Some(datetime) if dt.as_f64() < 1.0 => datetime.format("%H:%M:%S").to_string(),
        Some(datetime) if datetime.num_seconds_from_midnight() == 0 => {
            datetime.format("%Y-%m-%d").to_string()
        }
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}

/// 書式でアライメントが指定されていない場合の既定値
///
/// 表計算ソフトの「標準」配置と同様に、文字列は左、数値と日時は右に寄せます。
fn default_alignment(cell: &Data) -> &'static str {
    match cell {
        Data::String(_) => "general-left",
        Data::Int(_)
        | Data::Float(_)
        | Data::DateTime(_)
        | Data::DateTimeIso(_)
        | Data::DurationIso(_) => "general-right",
        _ => "general",
    }
}
