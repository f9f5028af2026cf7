//! Command-line front end.
//!
//! Each command drives one binding or navigation operation against an
//! [`AppContext`] and prints a plain-text summary.
//!
//! ```ignore
//! use hvacdash::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(&ctx, command).await?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use version::{version_line, VERSION};

use color_eyre::eyre::{bail, Result};
use std::fmt::Write as _;

use crate::api::{
    CleanResult, ColumnStats, DataPreview, FileListing, ModelListing, OptimizationResult,
    ParseResult,
};
use crate::app::AppContext;
use crate::health_check::ConnectionStatus;
use crate::state::{Mode, Page};
use crate::view_state::{resolve_page, ViewDispatch};

pub const USAGE: &str = "\
usage: hvacdash <command> [args]

commands:
  health                          probe the backend once
  monitor                         poll backend health until Ctrl-C
  files [folder]                  list data folders or files in a folder
  parse [--folder <name>] <file>...
                                  parse and merge CSV files
  clean [--resample <interval>] [--no-frozen] [--steady-state]
        [--heat-balance] [--affinity] [--filter-invalid]
                                  clean the parsed dataset
  preview [rows]                  show the first rows of the dataset
  stats <column>                  summary statistics for a column
  models [folder]                 list trained models
  optimize <model> [name=value]...
                                  recommend setpoints for current readings
  pages [batch|optimization]      list dashboard pages
  view <page-id>                  resolve a page id
  --version                       print version
  --help                          print this help

environment:
  HVACDASH_API_URL, HVACDASH_DATA_DIR, HVACDASH_POLL_SECS,
  HVACDASH_TIMEOUT_SECS, RUST_LOG";

/// Execute `command` against `ctx`, printing its output to stdout.
pub async fn run_cli_command(ctx: &AppContext, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => println!("{}", version_line()),
        CliCommand::Help => println!("{}", USAGE),
        CliCommand::Invalid(message) => bail!("{}\n\n{}", message, USAGE),
        CliCommand::Health => {
            ctx.api().health_check().await?;
            println!("backend at {} is reachable", ctx.api().base_url());
        }
        CliCommand::Monitor => run_monitor(ctx).await?,
        CliCommand::Files { subfolder } => {
            let bindings = in_mode(ctx, Mode::Batch).batch_bindings()?;
            let listing = bindings.files.fetch(None, subfolder.as_deref()).await?;
            print!("{}", format_files(&listing));
        }
        CliCommand::Parse { files, subfolder } => {
            let bindings = in_mode(ctx, Mode::Batch).batch_bindings()?;
            let result = bindings.parse.parse(&files, None, subfolder.as_deref()).await?;
            print!("{}", format_parse(&result));
        }
        CliCommand::Clean(patch) => {
            let bindings = in_mode(ctx, Mode::Batch).batch_bindings()?;
            let result = bindings.clean.clean(&patch).await?;
            print!("{}", format_clean(&result));
        }
        CliCommand::Preview { rows } => {
            let bindings = in_mode(ctx, Mode::Batch).batch_bindings()?;
            let preview = bindings.preview.fetch(rows).await?;
            print!("{}", format_preview(&preview));
        }
        CliCommand::Stats { column } => {
            let bindings = in_mode(ctx, Mode::Batch).batch_bindings()?;
            let stats = bindings.stats.fetch(&column).await?;
            print!("{}", format_stats(&stats));
        }
        CliCommand::Models { subfolder } => {
            let bindings = in_mode(ctx, Mode::Optimization).optimization_bindings()?;
            let listing = bindings.models.fetch(subfolder.as_deref()).await?;
            print!("{}", format_models(&listing));
        }
        CliCommand::Optimize { model, inputs } => {
            let bindings = in_mode(ctx, Mode::Optimization).optimization_bindings()?;
            let result = bindings
                .optimize
                .optimize(&model, inputs.into_iter().collect())
                .await?;
            print!("{}", format_optimization(&result));
        }
        CliCommand::Pages { mode } => {
            let modes = match mode {
                Some(mode) => vec![mode],
                None => vec![Mode::Batch, Mode::Optimization],
            };
            print!("{}", format_pages(&modes));
        }
        CliCommand::View { page_id } => {
            let page = resolve_page(&page_id);
            ctx.set_mode(page.mode());
            ctx.set_page(page)?;
            println!("{}", describe_view(&page_id, page));
        }
    }
    Ok(())
}

/// Switch to `mode` if needed; bindings are only reachable from their mode.
fn in_mode(ctx: &AppContext, mode: Mode) -> &AppContext {
    if ctx.navigation().mode() != mode {
        ctx.set_mode(mode);
    }
    ctx
}

async fn run_monitor(ctx: &AppContext) -> Result<()> {
    let handle = ctx.start_monitor();
    let mut updates = handle.subscribe();
    println!(
        "monitoring {} every {:?} (Ctrl-C to stop)",
        ctx.api().base_url(),
        ctx.config().poll_interval
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *updates.borrow_and_update();
                if snapshot.status == ConnectionStatus::Checking {
                    continue;
                }
                let seen = snapshot
                    .last_success
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "never".to_string());
                println!("{:<12} last success: {}", snapshot.status, seen);
            }
        }
    }
    Ok(())
}

fn describe_view(page_id: &str, page: Page) -> String {
    let views = Page::ALL
        .into_iter()
        .fold(ViewDispatch::new(Page::BatchParse.label()), |d, p| d.register(p, p.label()));
    let label = views.dispatch(page_id);
    if page.id() == page_id {
        format!("{} / {} ({})", page.mode(), label, page.id())
    } else {
        format!("unknown page '{}', showing {} / {}", page_id, page.mode(), label)
    }
}

pub fn format_files(listing: &FileListing) -> String {
    let mut out = String::new();
    if let Some(error) = &listing.error {
        let _ = writeln!(out, "warning: {}", error);
    }
    match &listing.current_folder {
        Some(folder) => {
            let _ = writeln!(out, "{} ({} files)", folder, listing.count.max(listing.files.len() as u64));
            for file in &listing.files {
                let _ = writeln!(out, "  {}", file);
            }
        }
        None => {
            for folder in &listing.folders {
                let count = listing.folder_counts.get(folder).copied().unwrap_or(0);
                let _ = writeln!(out, "  {:<24} {:>5} files", folder, count);
            }
            for file in &listing.files {
                let _ = writeln!(out, "  {}", file);
            }
            let _ = writeln!(out, "total: {} files", listing.total_files);
        }
    }
    out
}

pub fn format_parse(result: &ParseResult) -> String {
    let mut out = format!("{} rows x {} columns\n", result.row_count, result.column_count);
    if !result.columns.is_empty() {
        let _ = writeln!(out, "columns: {}", result.columns.join(", "));
    }
    if !result.message.is_empty() {
        let _ = writeln!(out, "{}", result.message);
    }
    out
}

pub fn format_clean(result: &CleanResult) -> String {
    format!(
        "{} -> {} rows ({:.1}% retained)\n",
        result.original_rows, result.cleaned_rows, result.retention_rate
    )
}

pub fn format_preview(preview: &DataPreview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", preview.columns.join("\t"));
    for row in &preview.preview {
        let cells: Vec<String> = preview
            .columns
            .iter()
            .map(|c| row.get(c).map(cell).unwrap_or_default())
            .collect();
        let _ = writeln!(out, "{}", cells.join("\t"));
    }
    let _ = writeln!(out, "({} of {} rows)", preview.preview.len(), preview.total_rows);
    out
}

fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn format_stats(stats: &ColumnStats) -> String {
    let fmt = |v: Option<f64>| v.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string());
    format!(
        "{}: count={} mean={} median={} min={} max={} std={}\n",
        stats.column,
        stats.count,
        fmt(stats.mean),
        fmt(stats.median),
        fmt(stats.min),
        fmt(stats.max),
        fmt(stats.std)
    )
}

pub fn format_models(listing: &ModelListing) -> String {
    let mut out = String::new();
    if let Some(error) = &listing.error {
        let _ = writeln!(out, "warning: {}", error);
    }
    for folder in &listing.folders {
        let count = listing.folder_counts.get(folder).copied().unwrap_or(0);
        let _ = writeln!(out, "  {}/ ({} models)", folder, count);
    }
    for model in &listing.models {
        let mape = model.mape.map(|m| format!("{:.2}%", m)).unwrap_or_else(|| "-".to_string());
        let r2 = model.r2.map(|r| format!("{:.3}", r)).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {:<24} MAPE {:>8}  R2 {:>6}  {} features",
            model.name, mape, r2, model.feature_count
        );
    }
    let _ = writeln!(out, "total: {} models", listing.total_models);
    out
}

pub fn format_optimization(result: &OptimizationResult) -> String {
    let mut out = format!("predicted power: {:.2} kW\n", result.predicted_power);
    for rec in &result.recommendations {
        match &rec.savings {
            Some(savings) => {
                let _ = writeln!(out, "  {} -> {} (saves {})", rec.parameter, rec.value, savings);
            }
            None => {
                let _ = writeln!(out, "  {} -> {}", rec.parameter, rec.value);
            }
        }
    }
    out
}

pub fn format_pages(modes: &[Mode]) -> String {
    let mut out = String::new();
    for mode in modes {
        let _ = writeln!(out, "{}:", mode);
        for page in mode.pages() {
            let marker = if page == mode.default_page() { "*" } else { " " };
            let _ = writeln!(out, " {} {:<18} {}", marker, page.id(), page.label());
        }
    }
    out
}
