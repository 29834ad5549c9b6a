//! Parser Module
//!
//! 入力ドキュメントの読み込みを担当するモジュール。
//! JSONエクスポートとXLSXワークブックの2種類のソースを提供します。

mod json;
mod metadata;
mod workbook;

use std::fs::File;
use std::path::PathBuf;

use crate::error::SheetToMdError;
use crate::security::SecurityConfig;
use crate::types::Document;

pub use json::JsonDocumentSource;
pub(crate) use metadata::XlsxMetadataParser;
pub use workbook::XlsxDocumentSource;

/// 入力ドキュメントの供給元
///
/// 変換処理はこのトレイト経由でドキュメントを受け取るため、
/// ファイル、メモリ、テスト用の固定値を同じように扱えます。
pub trait DocumentSource {
    /// ドキュメントを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(Document)` - 読み込みに成功した場合
    /// * `Err(SheetToMdError)` - 読み込みエラー（I/O、JSON、XLSX解析など）
    fn load_document(&self) -> Result<Document, SheetToMdError>;
}

impl DocumentSource for Document {
    fn load_document(&self) -> Result<Document, SheetToMdError> {
        Ok(self.clone())
    }
}

/// 入力データの所在
#[derive(Debug, Clone)]
pub(crate) enum InputData {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl InputData {
    /// 入力サイズの上限を適用してメモリに読み込む
    pub(crate) fn read(&self) -> Result<Vec<u8>, SheetToMdError> {
        let security_config = SecurityConfig::default();
        match self {
            InputData::Path(path) => security_config.read_input(File::open(path)?),
            InputData::Bytes(bytes) => security_config.read_input(bytes.as_slice()),
        }
    }
}
