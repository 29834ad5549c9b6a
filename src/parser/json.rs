//! JSON Export Parser Module
//!
//! 表計算ソフトのエクスポートJSON（`dvals`, `ffams`, ...）を入力ドキュメントとして読み込みます。

use std::path::PathBuf;

use log::debug;

use super::{DocumentSource, InputData};
use crate::error::SheetToMdError;
use crate::types::Document;

/// JSONエクスポートから読み込むソース
///
/// 読み込み時にはJSONの解析のみを行います。形状の検証は変換時に行われます。
#[derive(Debug, Clone)]
pub struct JsonDocumentSource {
    input: InputData,
}

impl JsonDocumentSource {
    /// ファイルパスから生成
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            input: InputData::Path(path.into()),
        }
    }

    /// メモリ上のバイト列から生成
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            input: InputData::Bytes(bytes.into()),
        }
    }
}

impl DocumentSource for JsonDocumentSource {
    fn load_document(&self) -> Result<Document, SheetToMdError> {
        let buffer = self.input.read()?;
        let document: Document = serde_json::from_slice(&buffer)?;

        debug!(
            "loaded JSON export '{}' ({} rows x {} cols)",
            document.name,
            document.row_count(),
            document.col_count()
        );

        Ok(document)
    }
}
