//! caseboard-list - print the deadline board once
//!
//! Reads the case list, groups it by urgency and prints it as text or JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use caseboard_core::format::{display_or_dash, truncate};
use caseboard_core::pager::page_count;
use caseboard_core::{
    flatten, group_and_sort, paginate, source, BoardGroup, BoardSummary, Config, Error,
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "caseboard-list")]
#[command(about = "Print the deadline board once, grouped by urgency")]
#[command(version)]
struct Args {
    /// Read cases from this cases.json instead of the configured store
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Read cases from the case store API at this base URL
    #[arg(short, long)]
    url: Option<String>,

    /// Classify against this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    today: Option<String>,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print a page break every N cases (text output only)
    #[arg(long)]
    page_size: Option<usize>,
}

/// JSON output document.
#[derive(Serialize)]
struct Listing<'a> {
    today: NaiveDate,
    groups: &'a [BoardGroup],
    summary: BoardSummary,
}

fn parse_today(raw: Option<&str>) -> Result<NaiveDate, Error> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(format!("{raw:?}, expected YYYY-MM-DD"))),
        None => Ok(Local::now().date_naive()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let today = parse_today(args.today.as_deref())?;

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        caseboard_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let source = source::open(args.store, args.url.as_deref(), &config)
        .context("failed to open case source")?;
    let cases = source
        .list_cases()
        .with_context(|| format!("failed to read cases from {}", source.describe()))?;

    tracing::info!(count = cases.len(), %today, "Listing cases");

    let groups = group_and_sort(&cases, today);
    let summary = BoardSummary::from_groups(&groups);

    if args.json {
        let listing = Listing {
            today,
            groups: &groups,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let page_size = args.page_size.unwrap_or(config.board.page_size).max(1);
    print_text(&groups, summary, today, page_size);
    Ok(())
}

fn print_text(groups: &[BoardGroup], summary: BoardSummary, today: NaiveDate, page_size: usize) {
    println!("Deadline board for {}", today.format("%a %b %d, %Y"));
    println!(
        "{} overdue · {} due today · {} this week · {} total",
        summary.overdue_count, summary.today_count, summary.week_count, summary.total_count
    );

    if groups.is_empty() {
        println!();
        println!("No cases");
        return;
    }

    let flat = flatten(groups);
    let pages = paginate(&flat, page_size);
    let total_pages = page_count(flat.len(), page_size);

    for (index, page) in pages.iter().enumerate() {
        println!();
        if total_pages > 1 {
            println!("--- page {}/{} ---", index + 1, total_pages);
        }

        let mut current_bucket = None;
        for item in page.iter() {
            let bucket = item.urgency.bucket;
            if current_bucket != Some(bucket) {
                current_bucket = Some(bucket);
                let count = groups
                    .iter()
                    .find(|g| g.bucket == bucket)
                    .map_or(0, BoardGroup::count);
                println!("{} ({})", bucket.title(), count);
            }

            let case = &item.case;
            println!(
                "  {:<16} {:<24} {:<32} {}",
                item.urgency.label,
                truncate(display_or_dash(case.client_name.as_deref()), 24),
                truncate(display_or_dash(case.case_name.as_deref()), 32),
                display_or_dash(case.paralegal.as_deref()),
            );
        }
    }
}
