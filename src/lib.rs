pub mod cli;
pub mod codec;
pub mod detect;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod model;
pub mod render;
pub mod session;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};
use crate::metadata::TableMeta;
use crate::session::{OpenOptions, Session};

pub use crate::error::{WranglerError, WranglerResult};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_wrangler", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Detect(args) => handle_detect(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Describe(args) => handle_describe(&args),
        Commands::Frequency(args) => handle_frequency(&args),
        Commands::Filter(args) => handle_filter(&args),
        Commands::Convert(args) => handle_convert(&args),
        Commands::Edit(args) => handle_edit(&args),
    }
}

fn handle_detect(args: &cli::DetectArgs) -> Result<()> {
    let delimiter = detect::sniff_file(&args.input);
    println!("{}", printable_delimiter(delimiter));
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let session = open_session(&args.input, args.delimiter, args.no_headers)?;
    print!("{}", render::render_preview(session.table(), args.rows));
    Ok(())
}

fn handle_describe(args: &cli::DescribeArgs) -> Result<()> {
    let session = open_session(&args.input, args.delimiter, args.no_headers)?;
    let model = session.table();
    let meta = TableMeta::from_model(model);

    let headers = vec!["column".to_string(), "kind".to_string()];
    let rows: Vec<Vec<String>> = meta
        .columns
        .iter()
        .map(|column| vec![column.name.clone(), column.kind.as_str().to_string()])
        .collect();
    print!("{}", render::render_table(&headers, &rows));
    println!(
        "{} row(s), delimiter '{}', empty cells: {}",
        meta.row_count,
        printable_delimiter(meta.delimiter),
        if model.has_empty_cells() { "yes" } else { "no" }
    );

    if let Some(meta_path) = &args.meta {
        meta.save(meta_path)
            .with_context(|| format!("Writing metadata to {meta_path:?}"))?;
        info!(
            "Metadata for {} column(s) written to {:?}",
            meta.columns.len(),
            meta_path
        );
    }
    Ok(())
}

fn handle_frequency(args: &cli::FrequencyArgs) -> Result<()> {
    let session = open_session(&args.input, args.delimiter, args.no_headers)?;
    let model = session.table();
    let column = model
        .find_column(&args.column)
        .or_else(|| model.find_column_ci(&args.column))
        .ok_or_else(|| anyhow!("Column '{}' not found", args.column))?;

    let mut counts = model.count_unique_values(column)?;
    if args.top > 0 && counts.len() > args.top {
        counts.truncate(args.top);
    }
    let total = model.row_count();
    let headers = vec![
        "value".to_string(),
        "count".to_string(),
        "percent".to_string(),
    ];
    let rows: Vec<Vec<String>> = counts
        .into_iter()
        .map(|(value, count)| {
            let label = if value.is_empty() {
                "<empty>".to_string()
            } else {
                value
            };
            let percent = (count as f64 / total as f64) * 100.0;
            vec![label, count.to_string(), format!("{percent:.2}%")]
        })
        .collect();
    print!("{}", render::render_table(&headers, &rows));
    Ok(())
}

fn handle_filter(args: &cli::FilterArgs) -> Result<()> {
    let mut session = open_session(&args.input, args.delimiter, args.no_headers)?;
    let status = session.filter(&args.column, &args.operator, &args.value)?;
    info!("{}", status.message);
    emit(&mut session, args.output.as_deref(), None)
}

fn handle_convert(args: &cli::ConvertArgs) -> Result<()> {
    let mut session = open_session(&args.input, args.delimiter, args.no_headers)?;
    emit(
        &mut session,
        args.output.as_deref(),
        Some(args.output_delimiter),
    )
}

fn handle_edit(args: &cli::EditArgs) -> Result<()> {
    let mut session = open_session(&args.input, args.delimiter, args.no_headers)?;
    for _ in 0..args.add_rows {
        session.add_row()?;
    }
    if !args.delete_rows.is_empty() {
        let status = session.delete_rows(&args.delete_rows)?;
        info!("{}", status.message);
    }
    for (row, column, value) in &args.set {
        session
            .table_mut()
            .set_value(*row, *column, Some(value.clone()))?;
    }
    emit(&mut session, args.output.as_deref(), None)
}

fn open_session(input: &Path, delimiter: Option<char>, no_headers: bool) -> Result<Session> {
    let mut session = Session::headless();
    session
        .open_path(
            input,
            OpenOptions {
                delimiter,
                has_headers: !no_headers,
            },
        )
        .with_context(|| format!("Opening {input:?}"))?;
    Ok(session)
}

/// Writes the session's table to `output`, or to stdout when no path was
/// given. A delimiter override applies either way.
fn emit(session: &mut Session, output: Option<&Path>, delimiter: Option<char>) -> Result<()> {
    match output {
        Some(path) => {
            let status = session
                .save_to(path, delimiter)
                .with_context(|| format!("Writing {path:?}"))?;
            info!("{}", status.message);
        }
        None => {
            if let Some(delimiter) = delimiter {
                session.table_mut().set_delimiter(delimiter);
            }
            print!("{}", session.table().to_text());
        }
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: char) -> String {
    match delimiter {
        ',' => ",".to_string(),
        '\t' => "\\t".to_string(),
        '\n' => "\\n".to_string(),
        other => other.to_string(),
    }
}
