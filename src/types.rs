//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::de::{Deserializer, IgnoredAny};
use serde::Deserialize;
use serde_json::Value;

use crate::error::SheetToMdError;
use crate::grid::MarkdownTable;

/// 文字列グリッド（`[row][col]`）
pub type TextGrid = Vec<Vec<String>>;

/// スタイル属性グリッド（`[row][col]`、欠落値は`None`）
pub type AttributeGrid = Vec<Vec<Option<String>>>;

/// 行または列の可視性マスク
///
/// インデックスごとに非表示かどうかを保持します。JSONエクスポートでは、
/// フラグの配列、または`[index, hidden]`ペアの配列のどちらでも受け付けます。
/// フラグは`false`・`null`・`0`・`""`を表示、それ以外を非表示として扱います。
/// ペアの場合も判定は位置で行い、`index`要素は参照しません。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMask(Vec<bool>);

impl VisibilityMask {
    /// フラグ列からマスクを生成
    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    /// すべて表示状態のマスクを生成
    pub fn visible(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// 指定インデックスの要素を非表示にしたマスクを返す
    pub fn with_hidden(mut self, index: usize) -> Self {
        if index >= self.0.len() {
            self.0.resize(index + 1, false);
        }
        self.0[index] = true;
        self
    }

    /// 指定インデックスが非表示かどうか
    ///
    /// 範囲外のインデックスは表示扱いになります。
    pub fn is_hidden(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 非表示要素の数
    pub fn hidden_count(&self) -> usize {
        self.0.iter().filter(|hidden| **hidden).count()
    }
}

/// マスク要素のJSON表現
///
/// `[index, flag]`ペアを単独のフラグより先に照合します。
#[derive(Deserialize)]
#[serde(untagged)]
enum MaskEntry {
    Pair(IgnoredAny, Value),
    Flag(Value),
}

/// JSONの値を非表示フラグとして解釈
///
/// `false`, `null`, `0`, `""`は表示、それ以外は非表示です。
fn is_hidden_flag(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl<'de> Deserialize<'de> for VisibilityMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<MaskEntry>::deserialize(deserializer)?;
        Ok(Self(
            entries
                .iter()
                .map(|entry| match entry {
                    MaskEntry::Flag(flag) | MaskEntry::Pair(_, flag) => is_hidden_flag(flag),
                })
                .collect(),
        ))
    }
}

/// 入力ドキュメント
///
/// 値グリッドと、それと同じ形状を持つスタイル属性グリッド、
/// および行・列の可視性マスクを保持します。
///
/// JSONキーはGoogle Sheetsのモックエクスポート形式（`dvals`, `ffams`, ...）に従い、
/// キャメルケースの別名（`values`, `fontFamilies`, ...）も受け付けます。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    /// ドキュメント名（出力ファイル名に使用）
    #[serde(default)]
    pub name: String,

    /// セルの表示値
    #[serde(rename = "dvals", alias = "values", deserialize_with = "text_grid")]
    pub values: TextGrid,

    /// フォントファミリー
    #[serde(rename = "ffams", alias = "fontFamilies", deserialize_with = "attribute_grid")]
    pub font_families: AttributeGrid,

    /// フォントウェイト（`bold` / `normal`）
    #[serde(rename = "fweights", alias = "fontWeights", deserialize_with = "attribute_grid")]
    pub font_weights: AttributeGrid,

    /// フォントスタイル（`italic` / `normal`）
    #[serde(rename = "fstyles", alias = "fontStyles", deserialize_with = "attribute_grid")]
    pub font_styles: AttributeGrid,

    /// 線装飾（`line-through` / `underline` / `none`）
    #[serde(
        rename = "fontlines",
        alias = "lineDecorations",
        deserialize_with = "attribute_grid"
    )]
    pub line_decorations: AttributeGrid,

    /// 水平アライメント（`general-left`, `center`, ...）
    #[serde(rename = "aligns", alias = "alignments", deserialize_with = "attribute_grid")]
    pub alignments: AttributeGrid,

    /// 行の可視性マスク
    #[serde(rename = "hiderows", alias = "hiddenRows")]
    pub hidden_rows: VisibilityMask,

    /// 列の可視性マスク
    #[serde(rename = "hidecols", alias = "hiddenColumns")]
    pub hidden_columns: VisibilityMask,
}

impl Document {
    /// 値グリッドのみからドキュメントを生成
    ///
    /// スタイル属性はすべて欠落値、行・列はすべて表示状態になります。
    pub fn from_values(name: impl Into<String>, values: TextGrid) -> Self {
        let rows = values.len();
        let cols = values.first().map(Vec::len).unwrap_or(0);
        let empty: AttributeGrid = values.iter().map(|row| vec![None; row.len()]).collect();

        Self {
            name: name.into(),
            values,
            font_families: empty.clone(),
            font_weights: empty.clone(),
            font_styles: empty.clone(),
            line_decorations: empty.clone(),
            alignments: empty,
            hidden_rows: VisibilityMask::visible(rows),
            hidden_columns: VisibilityMask::visible(cols),
        }
    }

    /// 行数
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    /// 列数（先頭行の列数）
    pub fn col_count(&self) -> usize {
        self.values.first().map(Vec::len).unwrap_or(0)
    }

    /// 指定セルのスタイル属性を取得
    pub fn style_at(&self, row: usize, col: usize) -> CellStyle<'_> {
        fn attr(grid: &AttributeGrid, row: usize, col: usize) -> Option<&str> {
            grid.get(row)
                .and_then(|r| r.get(col))
                .and_then(|v| v.as_deref())
        }

        CellStyle {
            family: attr(&self.font_families, row, col),
            weight: attr(&self.font_weights, row, col),
            style: attr(&self.font_styles, row, col),
            line_decoration: attr(&self.line_decorations, row, col),
        }
    }

    /// アライメントの基準行（元グリッドの0行目）
    pub fn alignment_source_row(&self) -> &[Option<String>] {
        self.alignments.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// グリッド形状の整合性を検証
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - すべてのグリッドが`values`と同じ形状の場合
    /// * `Err(SheetToMdError::ShapeMismatch)` - 形状が一致しない場合
    pub fn validate(&self) -> Result<(), SheetToMdError> {
        let rows = self.row_count();
        let cols = self.col_count();

        for (row_idx, row) in self.values.iter().enumerate() {
            if row.len() != cols {
                return Err(SheetToMdError::ShapeMismatch {
                    grid: "dvals".to_string(),
                    index: Some(row_idx),
                    expected: cols,
                    actual: row.len(),
                });
            }
        }

        let attribute_grids = [
            ("ffams", &self.font_families),
            ("fweights", &self.font_weights),
            ("fstyles", &self.font_styles),
            ("fontlines", &self.line_decorations),
            ("aligns", &self.alignments),
        ];

        for (grid_name, grid) in attribute_grids {
            if grid.len() != rows {
                return Err(SheetToMdError::ShapeMismatch {
                    grid: grid_name.to_string(),
                    index: None,
                    expected: rows,
                    actual: grid.len(),
                });
            }
            for (row_idx, row) in grid.iter().enumerate() {
                if row.len() != cols {
                    return Err(SheetToMdError::ShapeMismatch {
                        grid: grid_name.to_string(),
                        index: Some(row_idx),
                        expected: cols,
                        actual: row.len(),
                    });
                }
            }
        }

        if self.hidden_rows.len() != rows {
            return Err(SheetToMdError::ShapeMismatch {
                grid: "hiderows".to_string(),
                index: None,
                expected: rows,
                actual: self.hidden_rows.len(),
            });
        }

        if self.hidden_columns.len() != cols {
            return Err(SheetToMdError::ShapeMismatch {
                grid: "hidecols".to_string(),
                index: None,
                expected: cols,
                actual: self.hidden_columns.len(),
            });
        }

        Ok(())
    }
}

/// 1セル分のスタイル属性（借用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellStyle<'a> {
    /// フォントファミリー
    pub family: Option<&'a str>,
    /// フォントウェイト
    pub weight: Option<&'a str>,
    /// フォントスタイル
    pub style: Option<&'a str>,
    /// 線装飾
    pub line_decoration: Option<&'a str>,
}

/// 1回の変換結果
///
/// 最終テーブルに加えて、フィルタ前後の中間段階も保持します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// ドキュメント名
    pub name: String,
    /// レンダリング直後（フィルタ前）のグリッド
    pub rendered: MarkdownTable,
    /// 非表示行・列を除いたグリッド
    pub filtered: MarkdownTable,
    /// アライメント行を挿入した最終テーブル
    pub table: MarkdownTable,
}

/// JSON値をセルテキストに変換
///
/// 文字列はそのまま、数値と真偽値はJSON表記、`null`は空文字列になります。
pub(crate) fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn text_grid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TextGrid, D::Error> {
    let raw = Vec::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(value_to_text).collect())
        .collect())
}

fn attribute_grid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AttributeGrid, D::Error> {
    let raw = Vec::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|value| match value {
                    Value::Null => None,
                    other => Some(value_to_text(other)),
                })
                .collect()
        })
        .collect())
}
