//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use log::info;

use crate::api::OutputStage;
use crate::error::SheetToMdError;
use crate::formatter::CellRenderer;
use crate::grid::{assemble, filter_grid, MarkdownTable};
use crate::output::{output_file_name, write_all, OutputSink};
use crate::parser::DocumentSource;
use crate::types::{Conversion, Document, VisibilityMask};

/// 既定の出力ファイル名プレフィックス
const DEFAULT_OUTPUT_PREFIX: &str = "table";

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConversionConfig {
    /// 非表示の行・列を含めるか
    pub include_hidden: bool,

    /// セルテキストのMarkdown特殊文字をエスケープするか
    pub escape_cell_text: bool,

    /// 出力ファイル名のプレフィックス
    pub output_prefix: String,

    /// 中間段階（フィルタ前後）も出力するか
    pub emit_stages: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            include_hidden: false,
            escape_cell_text: false,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            emit_stages: false,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use sheetmd::ConverterBuilder;
///
/// # fn main() -> Result<(), sheetmd::SheetToMdError> {
/// let converter = ConverterBuilder::new()
///     .with_output_prefix("motet")
///     .emit_stages(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 非表示の行・列: 除外
    /// - エスケープ: なし（セルテキストをそのまま出力）
    /// - 出力プレフィックス: `table`
    /// - 中間段階の出力: なし
    pub fn new() -> Self {
        Self::default()
    }

    /// 非表示の行・列を出力に含めるかを指定する
    ///
    /// * `true`: 可視性マスクを無視し、すべての行・列を出力
    /// * `false`: 非表示の行・列を除外（デフォルト）
    ///
    /// アライメント行は`true`の場合も挿入されます。
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.include_hidden = include;
        self
    }

    /// セルテキストのMarkdown特殊文字をエスケープするかを指定する
    ///
    /// 有効にすると、`|`と`\`をエスケープし、改行を`<br>`に置換します。
    /// 既定では無効で、テキストはそのまま出力されます。
    ///
    /// ```rust
    /// use sheetmd::{ConverterBuilder, Document};
    ///
    /// # fn main() -> Result<(), sheetmd::SheetToMdError> {
    /// let document = Document::from_values("pipes", vec![vec!["a|b".to_string()]]);
    /// let converter = ConverterBuilder::new().escape_cell_text(true).build()?;
    /// assert_eq!(converter.convert_to_string(&document)?, "| a\\|b |\n| :--: |\n");
    /// # Ok(())
    /// # }
    /// ```
    pub fn escape_cell_text(mut self, escape: bool) -> Self {
        self.config.escape_cell_text = escape;
        self
    }

    /// 出力ファイル名のプレフィックスを指定する
    ///
    /// 出力ファイル名は`{prefix}-{name}.md`になります。
    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.output_prefix = prefix.into();
        self
    }

    /// 中間段階（レンダリング直後、フィルタ後）も出力するかを指定する
    pub fn emit_stages(mut self, emit: bool) -> Self {
        self.config.emit_stages = emit;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合
    /// * `Err(SheetToMdError::Config)`: プレフィックスが空、またはパス区切りを含む場合
    pub fn build(self) -> Result<Converter, SheetToMdError> {
        let prefix = &self.config.output_prefix;

        if prefix.trim().is_empty() {
            return Err(SheetToMdError::Config(
                "Output prefix must not be empty".to_string(),
            ));
        }

        if prefix.contains('/') || prefix.contains('\\') || prefix.contains("..") {
            return Err(SheetToMdError::Config(format!(
                "Output prefix must not contain path separators: '{}'",
                prefix
            )));
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// ドキュメントをレンダリングし、非表示の行・列を除いてアライメント行を挿入した
/// Markdownテーブルを生成します。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetmd::{ConverterBuilder, DirectorySink, JsonDocumentSource};
///
/// # fn main() -> Result<(), sheetmd::SheetToMdError> {
/// let converter = ConverterBuilder::new().build()?;
/// let written = converter.run(
///     &JsonDocumentSource::from_path("sheet.json"),
///     &DirectorySink::new("."),
/// )?;
/// println!("wrote {:?}", written);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルレンダラー
    renderer: CellRenderer,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            renderer: CellRenderer::new(config.escape_cell_text),
            config,
        }
    }

    /// ドキュメントを変換し、最終テーブルと中間段階を返す
    ///
    /// # 処理フロー
    ///
    /// 1. 形状の検証
    /// 2. 全セルのレンダリング
    /// 3. 非表示行・列の除去
    /// 4. アライメント行の挿入
    ///
    /// # 戻り値
    ///
    /// * `Ok(Conversion)` - 変換結果
    /// * `Err(SheetToMdError::ShapeMismatch)` - グリッドの形状が一致しない場合
    pub fn convert(&self, document: &Document) -> Result<Conversion, SheetToMdError> {
        document.validate()?;

        info!("sheet-rows {}", document.row_count());
        info!("sheet-cols {}", document.col_count());

        let rendered = self.renderer.render_document(document);

        let (hidden_rows, hidden_columns) = if self.config.include_hidden {
            (
                VisibilityMask::visible(document.row_count()),
                VisibilityMask::visible(document.col_count()),
            )
        } else {
            (document.hidden_rows.clone(), document.hidden_columns.clone())
        };

        info!("table-rows {}", rendered.len());
        info!("table-cols {}", column_count(&rendered));

        let filtered = filter_grid(&rendered, &hidden_rows, &hidden_columns);
        info!("final-rows {}", filtered.len());
        info!("final-cols {}", column_count(&filtered));

        let table = assemble(
            &rendered,
            &hidden_rows,
            &hidden_columns,
            document.alignment_source_row(),
        );

        // すべての列が非表示の場合、空行だけが残る
        let filtered = if filtered.iter().all(Vec::is_empty) {
            MarkdownTable::default()
        } else {
            MarkdownTable::from_rows(&filtered)
        };

        Ok(Conversion {
            name: document.name.clone(),
            rendered: MarkdownTable::from_rows(&rendered),
            filtered,
            table,
        })
    }

    /// ドキュメントを最終テーブルのMarkdown文字列に変換
    ///
    /// ```rust
    /// use sheetmd::{ConverterBuilder, Document};
    ///
    /// # fn main() -> Result<(), sheetmd::SheetToMdError> {
    /// let document = Document::from_values(
    ///     "demo",
    ///     vec![
    ///         vec!["A".to_string(), "B".to_string()],
    ///         vec!["C".to_string(), "D".to_string()],
    ///     ],
    /// );
    /// let markdown = ConverterBuilder::new().build()?.convert_to_string(&document)?;
    /// assert_eq!(markdown, "| A | B |\n| :--: | :--: |\n| C | D |\n");
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert_to_string(&self, document: &Document) -> Result<String, SheetToMdError> {
        Ok(self.convert(document)?.table.to_markdown())
    }

    /// 変換結果から出力名と内容の組を生成
    ///
    /// 最終テーブルは常に含まれ、`emit_stages`が有効な場合は中間段階が先に並びます。
    pub fn outputs(&self, conversion: &Conversion) -> Vec<(String, String)> {
        let prefix = &self.config.output_prefix;
        let mut outputs = Vec::with_capacity(3);

        if self.config.emit_stages {
            outputs.push((
                output_file_name(prefix, &conversion.name, OutputStage::Rendered.suffix()),
                conversion.rendered.to_markdown(),
            ));
            outputs.push((
                output_file_name(prefix, &conversion.name, OutputStage::Filtered.suffix()),
                conversion.filtered.to_markdown(),
            ));
        }

        outputs.push((
            output_file_name(prefix, &conversion.name, OutputStage::Table.suffix()),
            conversion.table.to_markdown(),
        ));

        outputs
    }

    /// 読み込み、変換、書き込みを一括で実行
    ///
    /// 読み込みエラーと形状エラーは書き込み前に返されます。
    /// 出力は並列に書き込まれ、1つの書き込み失敗が他の書き込みを中断することはありません。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - 書き込んだ出力名
    /// * `Err(SheetToMdError)` - 読み込み、検証、書き込みのいずれかが失敗した場合
    pub fn run<S, O>(&self, source: &S, sink: &O) -> Result<Vec<String>, SheetToMdError>
    where
        S: DocumentSource + ?Sized,
        O: OutputSink + ?Sized,
    {
        let document = source.load_document()?;
        let conversion = self.convert(&document)?;
        write_all(&sink, &self.outputs(&conversion))
    }
}

/// グリッドの列数（先頭行の長さ）
fn column_count(grid: &[Vec<String>]) -> usize {
    grid.first().map(Vec::len).unwrap_or(0)
}
