//! sheetmd CLI - Convert a spreadsheet export into a Markdown table

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::LevelFilter;
use sheetmd::{
    ConverterBuilder, DirectorySink, DocumentSource, JsonDocumentSource, SheetSelector,
    SheetToMdError, XlsxDocumentSource,
};

#[derive(Parser)]
#[command(name = "sheetmd")]
#[command(version)]
#[command(about = "Convert a spreadsheet export with style grids into a Markdown table", long_about = None)]
struct Cli {
    /// Input file (.json export or .xlsx workbook)
    #[arg(env = "SHEETMD_INPUT", default_value = "sheet.json")]
    input: PathBuf,

    /// Directory the Markdown files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Output file name prefix ({prefix}-{name}.md)
    #[arg(long, default_value = "table")]
    prefix: String,

    /// Also write the rendered and filtered intermediate stages
    #[arg(long)]
    stages: bool,

    /// Keep hidden rows and columns
    #[arg(long)]
    include_hidden: bool,

    /// Escape pipes and backslashes, and turn line breaks into <br>
    #[arg(long)]
    escape: bool,

    /// Select the XLSX sheet by index (0-based)
    #[arg(long, conflicts_with = "sheet_name")]
    sheet_index: Option<usize>,

    /// Select the XLSX sheet by name
    #[arg(long)]
    sheet_name: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logger(&cli);

    match run(&cli) {
        Ok(written) => {
            for name in written {
                println!("{}", cli.out_dir.join(name).display());
            }
        }
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn init_logger(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<Vec<String>, SheetToMdError> {
    let converter = ConverterBuilder::new()
        .include_hidden(cli.include_hidden)
        .escape_cell_text(cli.escape)
        .with_output_prefix(cli.prefix.as_str())
        .emit_stages(cli.stages)
        .build()?;

    let source = open_source(cli);
    converter.run(source.as_ref(), &DirectorySink::new(&cli.out_dir))
}

fn open_source(cli: &Cli) -> Box<dyn DocumentSource> {
    if is_xlsx(&cli.input) {
        Box::new(XlsxDocumentSource::from_path(&cli.input).with_sheet(sheet_selector(cli)))
    } else {
        Box::new(JsonDocumentSource::from_path(&cli.input))
    }
}

fn sheet_selector(cli: &Cli) -> SheetSelector {
    match (&cli.sheet_name, cli.sheet_index) {
        (Some(name), _) => SheetSelector::Name(name.clone()),
        (None, Some(index)) => SheetSelector::Index(index),
        (None, None) => SheetSelector::default(),
    }
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

fn handle_error(error: SheetToMdError) {
    match error {
        SheetToMdError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the input file exists and you have permission to read it.");
        }
        SheetToMdError::Json(json_err) => {
            eprintln!("JSON Error: {}", json_err);
            eprintln!("The export must contain dvals, ffams, fweights, fstyles, fontlines, aligns, hiderows and hidecols.");
        }
        SheetToMdError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid Excel file or may be corrupted.");
        }
        SheetToMdError::Zip(msg) => {
            eprintln!("ZIP Archive Error: {}", msg);
            eprintln!("The file may be corrupted or not a valid ZIP archive.");
        }
        SheetToMdError::Xml(msg) => {
            eprintln!("XML Error: {}", msg);
        }
        SheetToMdError::Utf8(utf8_err) => {
            eprintln!("UTF-8 Conversion Error: {}", utf8_err);
        }
        SheetToMdError::ParseInt(parse_int_err) => {
            eprintln!("Number Parse Error: {}", parse_int_err);
        }
        e @ SheetToMdError::ShapeMismatch { .. } => {
            eprintln!("Data Error: {}", e);
            eprintln!("Every style grid must have the same shape as dvals.");
        }
        SheetToMdError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Please check your prefix or sheet selection.");
        }
        SheetToMdError::Write { name, source } => {
            eprintln!("Write Error: {}: {}", name, source);
            eprintln!("Please check that the output directory is writable.");
        }
        SheetToMdError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The input exceeds a size limit or contains unsafe archive paths.");
        }
    }
}
