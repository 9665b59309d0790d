use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Load, edit, filter, and save delimited data files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report the most likely field delimiter of a file
    Detect(DetectArgs),
    /// Show the first rows of a file as an aligned table
    Preview(PreviewArgs),
    /// Summarize a file: column names, inferred kinds, row count
    Describe(DescribeArgs),
    /// Count distinct values in one column
    Frequency(FrequencyArgs),
    /// Keep only the rows matching a single-column predicate
    Filter(FilterArgs),
    /// Rewrite a file with a different delimiter
    Convert(ConvertArgs),
    /// Apply one-shot row and cell edits
    Edit(EditArgs),
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// File to sniff
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display (0 means all)
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Field delimiter (',', 'tab', ';', 'pipe', or any single character; auto-detected if omitted)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
    /// Treat the first line as data instead of column names
    #[arg(long = "no-headers")]
    pub no_headers: bool,
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Input file to describe
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Also write the description as JSON to this path
    #[arg(short, long)]
    pub meta: Option<PathBuf>,
    /// Field delimiter (auto-detected if omitted)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
    /// Treat the first line as data instead of column names
    #[arg(long = "no-headers")]
    pub no_headers: bool,
}

#[derive(Debug, Args)]
pub struct FrequencyArgs {
    /// Input file to analyze
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Column name to count distinct values for
    #[arg(short = 'C', long = "column")]
    pub column: String,
    /// Maximum distinct values to display (0 = all)
    #[arg(long, default_value_t = 0)]
    pub top: usize,
    /// Field delimiter (auto-detected if omitted)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
    /// Treat the first line as data instead of column names
    #[arg(long = "no-headers")]
    pub no_headers: bool,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Input file to filter
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Column name the predicate applies to
    #[arg(short = 'C', long = "column")]
    pub column: String,
    /// Predicate operator: contains, equals, or starts-with
    #[arg(long)]
    pub operator: String,
    /// Value the predicate tests against
    #[arg(long)]
    pub value: String,
    /// Field delimiter for reading (auto-detected if omitted)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
    /// Treat the first line as data instead of column names
    #[arg(long = "no-headers")]
    pub no_headers: bool,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input file to convert
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Field delimiter for reading (auto-detected if omitted)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
    /// Delimiter to write the output with
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: char,
    /// Treat the first line as data instead of column names
    #[arg(long = "no-headers")]
    pub no_headers: bool,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Input file to edit
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Append this many empty rows
    #[arg(long = "add-rows", default_value_t = 0)]
    pub add_rows: usize,
    /// Comma-separated 0-based row indices to delete
    #[arg(long = "delete-rows", value_delimiter = ',')]
    pub delete_rows: Vec<usize>,
    /// Cell edits of the form ROW,COL=VALUE (repeatable; empty VALUE blanks the cell)
    #[arg(long = "set", value_parser = parse_cell_edit, action = clap::ArgAction::Append)]
    pub set: Vec<(usize, usize, String)>,
    /// Field delimiter for reading (auto-detected if omitted)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
    /// Treat the first line as data instead of column names
    #[arg(long = "no-headers")]
    pub no_headers: bool,
}

pub fn parse_delimiter(value: &str) -> Result<char, String> {
    match value {
        "tab" | "\t" => Ok('\t'),
        "comma" | "," => Ok(','),
        "|" | "pipe" => Ok('|'),
        ";" | "semicolon" => Ok(';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            Ok(first)
        }
    }
}

pub fn parse_cell_edit(value: &str) -> Result<(usize, usize, String), String> {
    let (target, text) = value
        .split_once('=')
        .ok_or_else(|| format!("Expected ROW,COL=VALUE, got '{value}'"))?;
    let (row, column) = target
        .split_once(',')
        .ok_or_else(|| format!("Expected ROW,COL before '=', got '{target}'"))?;
    let row = row
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid row index '{row}'"))?;
    let column = column
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid column index '{column}'"))?;
    Ok((row, column, text.to_string()))
}
