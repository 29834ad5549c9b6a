//! Boundary Tests
//!
//! 空のグリッド、全非表示、形状不一致、破損ファイルなどの境界条件を検証します。

use rust_xlsxwriter::*;
use sheetmd::{
    ConverterBuilder, Document, DocumentSource, JsonDocumentSource, MemorySink, SheetToMdError,
    VisibilityMask, XlsxDocumentSource,
};

mod fixtures {
    use super::*;

    /// Generate a workbook with an empty sheet
    pub fn generate_empty_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let _worksheet = workbook.add_worksheet();
        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a table whose data starts away from A1
    pub fn generate_offset_table() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(1, 1, "B2")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a long cell
    pub fn generate_long_cell() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "x".repeat(10_000))?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Generate a corrupted file (not a valid ZIP)
    pub fn generate_corrupted_file() -> Vec<u8> {
        b"This is not a valid XLSX file".to_vec()
    }

    pub fn grid(rows: usize, cols: usize) -> Vec<Vec<String>> {
        (0..rows)
            .map(|r| (0..cols).map(|c| format!("r{}c{}", r, c)).collect())
            .collect()
    }
}

#[test]
fn test_empty_document() {
    let converter = ConverterBuilder::new().build().unwrap();
    let document = Document::from_values("empty", Vec::new());

    assert_eq!(converter.convert_to_string(&document).unwrap(), "");
}

#[test]
fn test_empty_document_still_written() {
    let converter = ConverterBuilder::new().build().unwrap();
    let sink = MemorySink::new();

    converter
        .run(&Document::from_values("empty", Vec::new()), &sink)
        .unwrap();

    assert_eq!(sink.get("table-empty.md").as_deref(), Some(""));
}

#[test]
fn test_all_rows_hidden() {
    let mut document = Document::from_values("hidden", fixtures::grid(3, 2));
    document.hidden_rows = VisibilityMask::from_flags(vec![true; 3]);

    let converter = ConverterBuilder::new().build().unwrap();
    assert_eq!(converter.convert_to_string(&document).unwrap(), "");
}

#[test]
fn test_all_columns_hidden() {
    let mut document = Document::from_values("hidden", fixtures::grid(3, 2));
    document.hidden_columns = VisibilityMask::from_flags(vec![true; 2]);

    let converter = ConverterBuilder::new().build().unwrap();
    assert_eq!(converter.convert_to_string(&document).unwrap(), "");
}

#[test]
fn test_single_row() {
    let document = Document::from_values("one", fixtures::grid(1, 3));

    let converter = ConverterBuilder::new().build().unwrap();
    assert_eq!(
        converter.convert_to_string(&document).unwrap(),
        "| r0c0 | r0c1 | r0c2 |\n| :--: | :--: | :--: |\n"
    );
}

#[test]
fn test_hidden_first_row_keeps_its_alignments() {
    let mut document = Document::from_values("head", fixtures::grid(3, 2));
    document.alignments[0] = vec![Some("right".to_string()), Some("LEFT".to_string())];
    document.alignments[1] = vec![Some("left".to_string()), Some("center".to_string())];
    document.hidden_rows = VisibilityMask::visible(3).with_hidden(0);

    let converter = ConverterBuilder::new().build().unwrap();
    assert_eq!(
        converter.convert_to_string(&document).unwrap(),
        "| r1c0 | r1c1 |\n| :--: | :-- |\n| r2c0 | r2c1 |\n"
    );
}

#[test]
fn test_empty_cell_text() {
    let document = Document::from_values("blank", vec![vec![String::new(), "x".to_string()]]);

    let converter = ConverterBuilder::new().build().unwrap();
    assert_eq!(
        converter.convert_to_string(&document).unwrap(),
        "|  | x |\n| :--: | :--: |\n"
    );
}

#[test]
fn test_ragged_values_shape_mismatch() {
    let mut document = Document::from_values("ragged", fixtures::grid(2, 2));
    document.values[1].push("extra".to_string());

    let converter = ConverterBuilder::new().build().unwrap();
    match converter.convert(&document) {
        Err(SheetToMdError::ShapeMismatch {
            grid,
            index,
            expected,
            actual,
        }) => {
            assert_eq!(grid, "dvals");
            assert_eq!(index, Some(1));
            assert_eq!(expected, 2);
            assert_eq!(actual, 3);
        }
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_json_mask_length_mismatch() {
    let json = br#"{
        "dvals": [["a"]],
        "ffams": [[null]],
        "fweights": [[null]],
        "fstyles": [[null]],
        "fontlines": [[null]],
        "aligns": [[null]],
        "hiderows": [false, false],
        "hidecols": [false]
    }"#;
    let converter = ConverterBuilder::new().build().unwrap();
    let sink = MemorySink::new();

    match converter.run(&JsonDocumentSource::from_bytes(json.to_vec()), &sink) {
        Err(SheetToMdError::ShapeMismatch { grid, .. }) => assert_eq!(grid, "hiderows"),
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
    assert!(sink.names().is_empty());
}

#[test]
fn test_unknown_style_values_fall_back() {
    let json = br#"{
        "name": "odd",
        "dvals": [["a"]],
        "ffams": [["Wingdings"]],
        "fweights": [["700"]],
        "fstyles": [["oblique"]],
        "fontlines": [["underline"]],
        "aligns": [["justify"]],
        "hiderows": [false],
        "hidecols": [false]
    }"#;
    let document = JsonDocumentSource::from_bytes(json.to_vec())
        .load_document()
        .unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    assert_eq!(
        converter.convert_to_string(&document).unwrap(),
        "| a |\n| :--: |\n"
    );
}

#[test]
fn test_empty_sheet() {
    let data = fixtures::generate_empty_sheet().unwrap();
    let document = XlsxDocumentSource::from_bytes(data).load_document().unwrap();

    assert_eq!(document.row_count(), 0);
    let converter = ConverterBuilder::new().build().unwrap();
    assert_eq!(converter.convert_to_string(&document).unwrap(), "");
}

#[test]
fn test_grid_anchored_at_a1() {
    let data = fixtures::generate_offset_table().unwrap();
    let document = XlsxDocumentSource::from_bytes(data).load_document().unwrap();

    assert_eq!(document.row_count(), 2);
    assert_eq!(document.col_count(), 2);
    assert_eq!(document.values[1][1], "B2");
    assert_eq!(document.values[0][0], "");
}

#[test]
fn test_very_long_cell_content() {
    let data = fixtures::generate_long_cell().unwrap();
    let document = XlsxDocumentSource::from_bytes(data).load_document().unwrap();

    let converter = ConverterBuilder::new().build().unwrap();
    let markdown = converter.convert_to_string(&document).unwrap();
    assert!(markdown.contains(&"x".repeat(10_000)));
}

#[test]
fn test_corrupted_file() {
    let result = XlsxDocumentSource::from_bytes(fixtures::generate_corrupted_file()).load_document();

    match result {
        Err(e) => assert!(e.is_load_error(), "unexpected error kind: {:?}", e),
        Ok(_) => panic!("Expected a load error"),
    }
}

#[test]
fn test_malformed_json() {
    let result = JsonDocumentSource::from_bytes(b"{ not json".to_vec()).load_document();

    assert!(matches!(result, Err(SheetToMdError::Json(_))));
}
