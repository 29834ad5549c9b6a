//! sheetmd - Spreadsheet style grids to Markdown tables
//!
//! This crate converts a spreadsheet export (cell values plus parallel style grids for font
//! family, weight, style, line decoration and horizontal alignment, and row/column visibility
//! masks) into a GitHub-flavored Markdown table. Cell styling is carried over as inline
//! Markdown (`` ` `` for monospace fonts, `**`, `*`, `~~`), hidden rows and columns are dropped,
//! and the alignment row is taken from the first row of the sheet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sheetmd::{ConverterBuilder, DirectorySink, JsonDocumentSource};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Load the export, convert it, and write `table-{name}.md` into the current directory
//!     converter.run(&JsonDocumentSource::from_path("sheet.json"), &DirectorySink::new("."))?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Reading XLSX Workbooks
//!
//! ```rust,no_run
//! use sheetmd::{ConverterBuilder, DocumentSource, SheetSelector, XlsxDocumentSource};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = XlsxDocumentSource::from_path("report.xlsx")
//!         .with_sheet(SheetSelector::Name("Summary".to_string()))
//!         .load_document()?;
//!
//!     let markdown = ConverterBuilder::new().build()?.convert_to_string(&document)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Convert to String
//!
//! ```rust
//! use sheetmd::{ConverterBuilder, Document, VisibilityMask};
//!
//! # fn main() -> Result<(), sheetmd::SheetToMdError> {
//! let mut document = Document::from_values(
//!     "demo",
//!     vec![
//!         vec!["A".to_string(), "B".to_string()],
//!         vec!["C".to_string(), "D".to_string()],
//!     ],
//! );
//! document.hidden_columns = VisibilityMask::visible(2).with_hidden(1);
//!
//! let markdown = ConverterBuilder::new().build()?.convert_to_string(&document)?;
//! assert_eq!(markdown, "| A |\n| :--: |\n| C |\n");
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod error;
mod formatter;
mod grid;
mod output;
mod parser;
mod security;
mod style;
mod types;

// 公開API
pub use api::{OutputStage, SheetSelector};
pub use builder::{Converter, ConverterBuilder};
pub use error::SheetToMdError;
pub use formatter::render_cell;
pub use grid::{assemble, MarkdownTable};
pub use output::{DirectorySink, MemorySink, OutputSink};
pub use parser::{DocumentSource, JsonDocumentSource, XlsxDocumentSource};
pub use style::{
    classify_alignment, is_bold, is_italic, is_monospace, is_strikethrough, Alignment,
};
pub use types::{AttributeGrid, CellStyle, Conversion, Document, TextGrid, VisibilityMask};
