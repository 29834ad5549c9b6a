//! Grid Module
//!
//! レンダリング済みグリッドから非表示行・列を除去し、アライメント行を挿入して
//! Markdownテーブルとして直列化するモジュール。

use std::fmt;

use crate::style::classify_alignment;
use crate::types::{TextGrid, VisibilityMask};

/// 行末の区切り文字
const ROW_TERMINATOR: &str = "|";

/// Markdownテーブル（行テキストの列）
///
/// 各行は、区切り付きセルを連結した末尾に`|`を付けたテキストです（改行は含みません）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownTable {
    lines: Vec<String>,
}

impl MarkdownTable {
    /// 区切り付きセルの行列から生成
    pub(crate) fn from_rows(rows: &[Vec<String>]) -> Self {
        Self {
            lines: rows
                .iter()
                .map(|row| {
                    let mut line = row.concat();
                    line.push_str(ROW_TERMINATOR);
                    line
                })
                .collect(),
        }
    }

    /// 行テキストの一覧
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Markdownテキストに直列化
    ///
    /// 行を改行で連結し、末尾に改行を1つ付けます。空のテーブルは空文字列になります。
    pub fn to_markdown(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut output = self.lines.join("\n");
        output.push('\n');
        output
    }
}

impl fmt::Display for MarkdownTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

/// フィルタとアライメント行挿入を行い、最終テーブルを組み立てる
///
/// # 引数
///
/// * `grid` - レンダリング済みグリッド（各セルは`"| "`で始まる）
/// * `hidden_rows` - 行の可視性マスク（元の行インデックス）
/// * `hidden_columns` - 列の可視性マスク（元の列インデックス）
/// * `alignment_source` - 元グリッド0行目のアライメントラベル
///
/// # 戻り値
///
/// 組み立て済みのテーブル。グリッドが空、またはすべての行・列が非表示の場合は空のテーブル。
///
/// ```rust
/// use sheetmd::{assemble, VisibilityMask};
///
/// let grid = vec![
///     vec!["| A ".to_string(), "| B ".to_string()],
///     vec!["| C ".to_string(), "| D ".to_string()],
/// ];
/// let aligns = vec![Some("left".to_string()), Some("right".to_string())];
/// let table = assemble(
///     &grid,
///     &VisibilityMask::visible(2),
///     &VisibilityMask::visible(2),
///     &aligns,
/// );
/// assert_eq!(table.to_markdown(), "| A | B |\n| :-- | :--: |\n| C | D |\n");
/// ```
pub fn assemble(
    grid: &[Vec<String>],
    hidden_rows: &VisibilityMask,
    hidden_columns: &VisibilityMask,
    alignment_source: &[Option<String>],
) -> MarkdownTable {
    if grid.is_empty() {
        return MarkdownTable::default();
    }

    let filtered = filter_grid(grid, hidden_rows, hidden_columns);
    if filtered.is_empty() || filtered.iter().all(Vec::is_empty) {
        return MarkdownTable::default();
    }

    let mut rows = filtered;
    rows.insert(1, alignment_row(alignment_source, hidden_columns, grid_width(grid)));

    MarkdownTable::from_rows(&rows)
}

/// 非表示行・列を除いたグリッドを返す
///
/// 行・列ともに元のインデックスで判定し、残った要素の相対順序を保持します。
pub(crate) fn filter_grid(
    grid: &[Vec<String>],
    hidden_rows: &VisibilityMask,
    hidden_columns: &VisibilityMask,
) -> TextGrid {
    grid.iter()
        .enumerate()
        .filter(|(row_idx, _)| !hidden_rows.is_hidden(*row_idx))
        .map(|(_, row)| {
            row.iter()
                .enumerate()
                .filter(|(col_idx, _)| !hidden_columns.is_hidden(*col_idx))
                .map(|(_, cell)| cell.clone())
                .collect()
        })
        .collect()
}

/// 残った列のアライメント行を生成
///
/// 基準行が短い場合、欠けた列は既定値（中央寄せ）になります。
pub(crate) fn alignment_row(
    alignment_source: &[Option<String>],
    hidden_columns: &VisibilityMask,
    width: usize,
) -> Vec<String> {
    (0..width)
        .filter(|col_idx| !hidden_columns.is_hidden(*col_idx))
        .map(|col_idx| {
            let label = alignment_source.get(col_idx).and_then(|v| v.as_deref());
            format!("| {} ", classify_alignment(label).token())
        })
        .collect()
}

fn grid_width(grid: &[Vec<String>]) -> usize {
    grid.iter().map(Vec::len).max().unwrap_or(0)
}
