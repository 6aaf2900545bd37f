//! Preview the contents of an XLSX workbook as JSON

use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use sheetpost::logging::init_logging;
use sheetpost::{preview_rows, JsonFormatter, SheetpostError, XlsxPackage};

#[derive(Parser)]
#[command(name = "xlsx-preview", version, about = "Preview XLSX sheet contents.")]
struct Args {
    /// Path to the .xlsx file.
    path: PathBuf,

    /// Target sheet name. Lists all sheets when omitted.
    #[arg(long)]
    sheet: Option<String>,

    /// Number of rows to display.
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// Print debug logs on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        handle_error(e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SheetpostError> {
    let mut package = XlsxPackage::open(&args.path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.sheet {
        None => JsonFormatter.render(&package.list_sheets()?, &mut out),
        Some(name) => {
            let rows = package.sheet_rows(name)?;
            JsonFormatter.render(&preview_rows(rows, args.limit), &mut out)
        }
    }
}

fn handle_error(error: SheetpostError) {
    match error {
        SheetpostError::FileNotFound(path) => {
            eprintln!("File Not Found: {}", path.display());
        }
        SheetpostError::Zip(msg) => {
            eprintln!("ZIP Archive Error: {}", msg);
            eprintln!("The file may be corrupted or not a valid ZIP archive.");
        }
        SheetpostError::Xml(msg) => {
            eprintln!("XML Parse Error: {}", msg);
            eprintln!("The file may not be a valid XLSX workbook.");
        }
        SheetpostError::MissingPart(part) => {
            eprintln!("Missing Part: {}", part);
            eprintln!("The file may not be a valid XLSX workbook.");
        }
        SheetpostError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file violates security constraints (e.g., file size limit).");
        }
        other => {
            eprintln!("{}", other);
        }
    }
}
