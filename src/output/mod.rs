//! Output Module
//!
//! 変換結果の書き込み先を抽象化するモジュール。
//! 書き込み先は`OutputSink`トレイトとして注入され、変換処理はファイルシステムに依存しません。

mod sinks;

use log::{error, info};
use rayon::prelude::*;

use crate::error::SheetToMdError;

pub use sinks::{DirectorySink, MemorySink};

/// 出力の書き込み先
///
/// 同じ内容での再書き込みは安全（冪等）であることが期待されます。
/// 複数の出力は並列に書き込まれるため、実装は`Sync`である必要があります。
pub trait OutputSink: Sync {
    /// 名前付きの出力を書き込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 書き込みに成功した場合
    /// * `Err(SheetToMdError::Write)` - 書き込みに失敗した場合
    fn write_output(&self, name: &str, content: &str) -> Result<(), SheetToMdError>;
}

impl<T: OutputSink + ?Sized> OutputSink for &T {
    fn write_output(&self, name: &str, content: &str) -> Result<(), SheetToMdError> {
        (**self).write_output(name, content)
    }
}

/// 出力ファイル名を生成
///
/// `{prefix}-{name}{suffix}`の形式。ドキュメント名のうち`[A-Za-z0-9 _.-]`以外の文字は
/// `_`に置換し、空の場合は`sheet`を使用します。
pub(crate) fn output_file_name(prefix: &str, name: &str, suffix: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_matches('.');
    let name = if sanitized.is_empty() {
        "sheet"
    } else {
        sanitized
    };

    format!("{}-{}{}", prefix, name, suffix)
}

/// すべての出力を並列に書き込む
///
/// 各書き込みは独立しており、1つが失敗しても他の書き込みは継続します。
/// 失敗はログに記録され、最初の失敗が呼び出し元に返されます。
/// 完了済みの書き込みは取り消されません。
///
/// # 戻り値
///
/// * `Ok(Vec<String>)` - 書き込んだ出力名（入力順）
/// * `Err(SheetToMdError)` - いずれかの書き込みに失敗した場合
pub(crate) fn write_all<S: OutputSink>(
    sink: &S,
    outputs: &[(String, String)],
) -> Result<Vec<String>, SheetToMdError> {
    let results: Vec<Result<String, SheetToMdError>> = outputs
        .par_iter()
        .map(|(name, content)| {
            sink.write_output(name, content)?;
            info!("wrote {} ({} bytes)", name, content.len());
            Ok(name.clone())
        })
        .collect();

    let mut written = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(name) => written.push(name),
            Err(e) => {
                error!("{}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(written),
    }
}
