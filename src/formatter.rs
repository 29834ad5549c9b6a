//! Formatter Module
//!
//! セルのテキストにスタイル分類結果を適用し、Markdownのインライン記法で装飾するモジュール。

use crate::style::{is_bold, is_italic, is_monospace, is_strikethrough};
use crate::types::{CellStyle, Document, TextGrid};

/// セルを装飾してテーブルセル区切りを付与する
///
/// 装飾は次の固定順で内側から適用されます。
///
/// 1. 等幅フォント: `` `text` ``
/// 2. 太字: `**text**`
/// 3. 斜体: `*text*`
/// 4. 取り消し線: `~~text~~`
///
/// 最後に`"| "`を前置し、空白を1つ後置します（行末の`|`は組み立て時に付与）。
///
/// ```rust
/// use sheetmd::{render_cell, CellStyle};
///
/// let style = CellStyle {
///     family: Some("jetbrains mono"),
///     weight: Some("bold"),
///     ..CellStyle::default()
/// };
/// assert_eq!(render_cell("code", style), "| **`code`** ");
/// ```
pub fn render_cell(text: &str, style: CellStyle<'_>) -> String {
    let mut text = text.to_string();

    if is_monospace(style.family) {
        text = format!("`{}`", text);
    }

    if is_bold(style.weight) {
        text = format!("**{}**", text);
    }

    if is_italic(style.style) {
        text = format!("*{}*", text);
    }

    // 取り消し線の記法はプラットフォームにより異なるが、`~~`のみを出力する
    if is_strikethrough(style.line_decoration) {
        text = format!("~~{}~~", text);
    }

    format!("| {} ", text)
}

/// ドキュメント全体をレンダリングするセルレンダラー
#[derive(Debug, Clone, Default)]
pub(crate) struct CellRenderer {
    /// Markdown特殊文字をエスケープするか
    escape: bool,
}

impl CellRenderer {
    /// 新しいCellRendererインスタンスを生成
    pub fn new(escape: bool) -> Self {
        Self { escape }
    }

    /// すべてのセルをレンダリングして、`values`と同じ形状のグリッドを返す
    pub fn render_document(&self, document: &Document) -> TextGrid {
        document
            .values
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                row.iter()
                    .enumerate()
                    .map(|(col_idx, text)| {
                        let style = document.style_at(row_idx, col_idx);
                        if self.escape {
                            render_cell(&escape_markdown(text), style)
                        } else {
                            render_cell(text, style)
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Markdown特殊文字をエスケープ
///
/// バックスラッシュとパイプをエスケープし、改行を`<br>`に置換します。
fn escape_markdown(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
        .replace('|', "\\|")
}
