//! Output Sinks Implementation
//!
//! 各書き込み先の実装を提供するモジュール。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::OutputSink;
use crate::error::SheetToMdError;

/// ディレクトリにファイルとして書き込むシンク
///
/// ディレクトリが存在しない場合は最初の書き込み時に作成します。
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 出力先ディレクトリ
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputSink for DirectorySink {
    fn write_output(&self, name: &str, content: &str) -> Result<(), SheetToMdError> {
        let to_write_error = |source| SheetToMdError::Write {
            name: name.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(to_write_error)?;
        fs::write(self.dir.join(name), content).map_err(to_write_error)
    }
}

/// メモリ上に出力を保持するシンク
///
/// テストや、結果をファイルに書かずに利用する場合に使用します。
#[derive(Debug, Default)]
pub struct MemorySink {
    outputs: Mutex<BTreeMap<String, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した名前の出力内容を取得
    pub fn get(&self, name: &str) -> Option<String> {
        self.outputs.lock().get(name).cloned()
    }

    /// 書き込まれた出力名の一覧（名前順）
    pub fn names(&self) -> Vec<String> {
        self.outputs.lock().keys().cloned().collect()
    }

    /// すべての出力を取り出す
    pub fn into_outputs(self) -> BTreeMap<String, String> {
        self.outputs.into_inner()
    }
}

impl OutputSink for MemorySink {
    fn write_output(&self, name: &str, content: &str) -> Result<(), SheetToMdError> {
        self.outputs
            .lock()
            .insert(name.to_string(), content.to_string());
        Ok(())
    }
}
