//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// sheetmdクレート全体で使用するエラー型
///
/// 入力ドキュメントの読み込み、形状検証、出力書き込みの各段階で発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - 読み込みエラー: `Io`, `Json`, `Parse`, `Zip`, `Xml`, `Utf8`, `ParseInt`, `SecurityViolation`
/// - データ整合性エラー: `ShapeMismatch`
/// - 設定エラー: `Config`
/// - 書き込みエラー: `Write`
///
/// 未知のスタイル値やアライメント値はエラーになりません（既定値にフォールバックします）。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetmd::{DocumentSource, JsonDocumentSource, SheetToMdError};
///
/// fn load(path: &str) -> Result<(), SheetToMdError> {
///     let document = JsonDocumentSource::from_path(path).load_document()?;
///     println!("{} rows", document.row_count());
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum SheetToMdError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSONエクスポートの解析エラー
    ///
    /// 必須キーの欠落、型の不一致、不正なJSONなどが原因となります。
    #[error("Failed to parse JSON export: {0}")]
    Json(#[from] serde_json::Error),

    /// Excelファイルの解析中に発生したエラー（calamine由来）
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// XLSX内部XMLの解析エラー
    #[error("XML parse error: {0}")]
    Xml(String),

    /// 数値の解析エラー
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// グリッドの形状が`values`と一致しないエラー
    ///
    /// スタイルグリッドの行数・列数、または可視性マスクの長さが
    /// `values`の寸法と異なる場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust
    /// use sheetmd::SheetToMdError;
    ///
    /// let error = SheetToMdError::ShapeMismatch {
    ///     grid: "fontWeights".to_string(),
    ///     index: Some(1),
    ///     expected: 3,
    ///     actual: 2,
    /// };
    /// assert_eq!(
    ///     error.to_string(),
    ///     "Shape mismatch in 'fontWeights' at row 1: expected 3, found 2"
    /// );
    /// ```
    #[error(
        "Shape mismatch in '{}'{}: expected {}, found {}",
        .grid,
        .index.map(|i| format!(" at row {}", i)).unwrap_or_default(),
        .expected,
        .actual
    )]
    ShapeMismatch {
        /// 不一致が検出されたグリッド名
        grid: String,
        /// 不一致が検出された行（行数自体の不一致の場合は`None`）
        index: Option<usize>,
        /// 期待される長さ
        expected: usize,
        /// 実際の長さ
        actual: usize,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時の設定検証や、存在しないシートの指定などで発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 出力の書き込みに失敗したエラー
    #[error("Failed to write output '{name}': {source}")]
    Write {
        /// 出力名
        name: String,
        /// 原因となったI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力サイズ上限、ZIP bomb対策、パストラバーサル対策などに違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl From<quick_xml::Error> for SheetToMdError {
    fn from(e: quick_xml::Error) -> Self {
        SheetToMdError::Xml(e.to_string())
    }
}

impl From<zip::result::ZipError> for SheetToMdError {
    fn from(e: zip::result::ZipError) -> Self {
        SheetToMdError::Zip(e.to_string())
    }
}

impl SheetToMdError {
    /// 読み込み段階のエラーかどうか
    ///
    /// 読み込みエラーは出力が一切行われる前に処理全体を中断させます。
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            SheetToMdError::Io(_)
                | SheetToMdError::Json(_)
                | SheetToMdError::Parse(_)
                | SheetToMdError::Utf8(_)
                | SheetToMdError::Zip(_)
                | SheetToMdError::Xml(_)
                | SheetToMdError::ParseInt(_)
                | SheetToMdError::SecurityViolation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: SheetToMdError = io_err.into();

        match error {
            SheetToMdError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_json_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: SheetToMdError = json_err.into();

        assert!(error.to_string().starts_with("Failed to parse JSON export"));
        assert!(error.is_load_error());
    }

    #[test]
    fn test_parse_error_display() {
        let error: SheetToMdError = calamine::Error::Msg("Corrupted file").into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("Failed to parse Excel file"));
        assert!(error_msg.contains("Corrupted file"));
    }

    // ShapeMismatchのメッセージ
    #[test]
    fn test_shape_mismatch_display() {
        let row_count = SheetToMdError::ShapeMismatch {
            grid: "aligns".to_string(),
            index: None,
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            row_count.to_string(),
            "Shape mismatch in 'aligns': expected 4, found 3"
        );

        let per_row = SheetToMdError::ShapeMismatch {
            grid: "ffams".to_string(),
            index: Some(2),
            expected: 5,
            actual: 1,
        };
        assert!(per_row.to_string().contains("at row 2"));
        assert!(!per_row.is_load_error());
    }

    #[test]
    fn test_write_error_keeps_source() {
        use std::error::Error as _;

        let error = SheetToMdError::Write {
            name: "table-Sheet1.md".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        assert!(error.to_string().contains("table-Sheet1.md"));
        assert!(error.source().is_some());
        assert!(!error.is_load_error());
    }

    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), SheetToMdError> {
            let _file = std::fs::File::open("nonexistent_file.json")?;
            Ok(())
        }

        match io_operation() {
            Err(SheetToMdError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    #[test]
    fn test_all_error_formats() {
        let config_err = SheetToMdError::Config("test config".to_string());
        assert!(config_err.to_string().starts_with("Configuration error"));

        let zip_err = SheetToMdError::Zip("bad archive".to_string());
        assert!(zip_err.to_string().starts_with("ZIP archive error"));

        let security_err = SheetToMdError::SecurityViolation("too big".to_string());
        assert!(security_err.to_string().starts_with("Security violation"));
        assert!(security_err.is_load_error());
    }
}
