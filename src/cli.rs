// src/cli.rs
use crate::app_log;
use crate::collector::{CollectSummary, Collector, StopReason, WuzzufClient};
use crate::config::ConfigManager;
use crate::dashboard::{Count, Dashboard, JobTable, Summary};
use crate::normalizer::Normalizer;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

pub const NO_DATA_MESSAGE: &str =
    "No data available. Run `wuzzuf-pulse collect` first, then `wuzzuf-pulse normalize`.";

#[derive(Parser)]
#[command(name = "wuzzuf-pulse")]
#[command(about = "Collect Wuzzuf job listings and report on the Egyptian job market")]
pub struct Cli {
    /// Configuration file (defaults to ./wuzzuf-pulse.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scrape search results into the raw dataset
    Collect(CollectArgs),
    /// Clean the raw dataset into the clean one
    Normalize,
    /// Collect, then normalize
    Run(CollectArgs),
    /// Summarize or search the clean dataset
    Report {
        /// Only show rows containing this text
        #[arg(short, long)]
        search: Option<String>,
        /// Max rows to display when searching
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Search term, repeatable (defaults to the configured terms)
    #[arg(short, long = "term")]
    pub terms: Vec<String>,
    /// Result pages per term
    #[arg(short, long)]
    pub pages: Option<u32>,
}

impl CollectArgs {
    fn resolve(&self, config: &ConfigManager) -> (Vec<String>, u32) {
        let terms = if self.terms.is_empty() {
            config.collector.search_terms.clone()
        } else {
            self.terms.clone()
        };
        (terms, self.pages.unwrap_or(config.collector.pages_per_term))
    }
}

pub async fn handle_command(command: Command, config: &ConfigManager) -> Result<()> {
    match command {
        Command::Collect(args) => {
            let summary = collect(&args, config).await?;
            print!("{}", render_collect(&summary));
        }
        Command::Normalize => normalize(config),
        Command::Run(args) => {
            let summary = collect(&args, config).await?;
            print!("{}", render_collect(&summary));
            normalize(config);
        }
        Command::Report {
            search,
            limit,
            json,
        } => report(config, search.as_deref(), limit, json)?,
    }
    Ok(())
}

async fn collect(args: &CollectArgs, config: &ConfigManager) -> Result<CollectSummary> {
    let (terms, pages) = args.resolve(config);
    app_log!(info, "Collecting {} terms, {} pages each", terms.len(), pages);

    let collector = Collector::<WuzzufClient>::from_config(config)?;
    collector
        .collect(&terms, pages)
        .await
        .with_context(|| format!("Failed to write {}", config.raw_path().display()))
}

fn normalize(config: &ConfigManager) {
    let records = Normalizer::from_config(config).normalize();
    if records.is_empty() {
        println!("{}", NO_DATA_MESSAGE);
    } else {
        println!(
            "Saved {} cleaned jobs to {}",
            records.len(),
            config.clean_path().display()
        );
    }
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    last_updated: Option<String>,
    #[serde(flatten)]
    summary: &'a Summary,
}

#[derive(Serialize)]
struct SearchReport<'a> {
    search: &'a str,
    matches: usize,
    table: &'a JobTable,
}

fn report(config: &ConfigManager, search: Option<&str>, limit: usize, json: bool) -> Result<()> {
    let mut dashboard = Dashboard::from_config(config);
    if dashboard.dataset().is_empty() {
        println!("{}", NO_DATA_MESSAGE);
        return Ok(());
    }
    let last_updated = dashboard.last_updated();

    match search {
        Some(term) => {
            let matches = dashboard.search(term);
            let shown = matches.head(limit);
            if json {
                let report = SearchReport {
                    search: term,
                    matches: matches.len(),
                    table: &shown,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} jobs match '{}'", matches.len(), term);
                print!("{}", render_rows(&shown));
            }
        }
        None => {
            let summary = dashboard.summary();
            if json {
                let report = SummaryReport {
                    last_updated,
                    summary: &summary,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_summary(&summary, last_updated.as_deref()));
            }
        }
    }
    Ok(())
}

pub fn render_collect(summary: &CollectSummary) -> String {
    let mut lines = vec![
        format!("{:<25} {:>6} {:>7} {:>8}  {}", "Term", "Pages", "Parsed", "Skipped", "Stopped"),
        "-".repeat(70),
    ];
    for term in &summary.terms {
        let stop = match &term.stop {
            StopReason::Completed => "completed".to_string(),
            StopReason::NoCards { page } => format!("no jobs on page {}", page),
            StopReason::FetchFailed { page, reason } => format!("page {}: {}", page, reason),
        };
        lines.push(format!(
            "{:<25} {:>6} {:>7} {:>8}  {}",
            truncate(&term.term, 25),
            term.pages_fetched,
            term.cards_parsed,
            term.cards_skipped,
            stop
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "{} scraped, {} unique, saved to {}",
        summary.scraped,
        summary.unique,
        summary.output.display()
    ));
    join_lines(lines)
}

pub fn render_summary(summary: &Summary, last_updated: Option<&str>) -> String {
    let mut lines = vec!["Egypt Job Market Analysis".to_string()];
    if let Some(date) = last_updated {
        lines.push(format!("Last updated: {}", date));
    }
    lines.push(String::new());
    lines.push(format!("{:<14} {}", "Total jobs", summary.total_jobs));
    lines.push(format!("{:<14} {}", "Top city", summary.top_city));
    lines.push(format!("{:<14} {}", "Top company", summary.top_company));
    lines.push(format!("{:<14} {}", "Top skill", summary.top_skill));

    let sections: [(&str, &Option<Vec<Count>>); 7] = [
        ("Job types", &summary.job_types),
        ("Top cities", &summary.cities),
        ("Top companies", &summary.companies),
        ("Top job titles", &summary.titles),
        ("Top skills", &summary.skills),
        ("Career levels", &summary.levels),
        ("Experience required", &summary.experience),
    ];
    for (title, counts) in sections {
        lines.push(String::new());
        lines.push(title.to_string());
        lines.push("-".repeat(50));
        match counts {
            Some(counts) => lines.extend(
                counts
                    .iter()
                    .map(|c| format!("{:<42} {:>7}", truncate(&c.value, 42), c.count)),
            ),
            None => lines.push("(column not available)".to_string()),
        }
    }
    join_lines(lines)
}

pub fn render_rows(table: &JobTable) -> String {
    const WIDTH: usize = 24;
    let row_line = |cells: &[String]| {
        cells
            .iter()
            .map(|c| format!("{:<WIDTH$}", truncate(c, WIDTH)))
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![
        row_line(table.headers()),
        "-".repeat(table.headers().len() * (WIDTH + 1)),
    ];
    lines.extend(table.rows().iter().map(|row| row_line(row.as_slice())));
    join_lines(lines)
}

fn join_lines(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
