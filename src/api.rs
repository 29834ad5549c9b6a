//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// シート選択方式
///
/// XLSXワークブックから変換対象のシートを1つ選択する方法を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(0)` は最初のシートを選択
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("Sheet1".to_string())`
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

/// 出力の段階
///
/// 最終テーブルに加え、`emit_stages(true)`の場合は中間段階も出力されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputStage {
    /// レンダリング直後（フィルタ前）
    Rendered,
    /// 非表示行・列の除去後
    Filtered,
    /// アライメント行を挿入した最終テーブル
    Table,
}

impl OutputStage {
    /// 出力ファイル名の拡張子部分
    ///
    /// # 出力例
    ///
    /// ```text
    /// table-Sheet1.rendered.md
    /// table-Sheet1.filtered.md
    /// table-Sheet1.md
    /// ```
    pub fn suffix(self) -> &'static str {
        match self {
            OutputStage::Rendered => ".rendered.md",
            OutputStage::Filtered => ".filtered.md",
            OutputStage::Table => ".md",
        }
    }
}
