// src/collector/mod.rs
//! Scrapes paginated search results into the raw dataset.
//!
//! Terms and pages are fetched one at a time with a randomized pause between
//! pages. A failed page ends its term; a bad card is skipped. Neither aborts
//! the run.

pub mod classify;
pub mod client;
pub mod parser;

pub use classify::{DetailClassifier, DetailField, Rule, DEFAULT_RULES};
pub use client::WuzzufClient;
pub use parser::{CardParser, CardStrategy, MarkupProfile, PageParse};

use crate::app_log;
use crate::config::ConfigManager;
use crate::error::PipelineResult;
use crate::model::RawJobRecord;
use crate::storage;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

/// Where result pages come from.
pub trait SearchSource {
    /// HTML body of one result page. Non-success responses are errors.
    fn fetch_page(&self, term: &str, page: u32) -> impl Future<Output = PipelineResult<String>> + Send;
}

/// Randomized pause between page fetches.
#[derive(Debug, Clone, Copy)]
pub struct DelayPolicy {
    min: Duration,
    max: Duration,
}

impl DelayPolicy {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    }

    async fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    /// Every requested page was fetched.
    Completed,
    /// A page had no cards under any strategy.
    NoCards { page: u32 },
    /// A page could not be fetched.
    FetchFailed { page: u32, reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TermReport {
    pub term: String,
    pub pages_fetched: u32,
    pub cards_parsed: usize,
    pub cards_skipped: usize,
    pub stop: StopReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectSummary {
    pub terms: Vec<TermReport>,
    pub scraped: usize,
    pub unique: usize,
    pub output: PathBuf,
}

/// Records gathered in memory, before anything is written.
#[derive(Debug)]
pub struct Gathered {
    pub records: Vec<RawJobRecord>,
    pub terms: Vec<TermReport>,
    pub scraped: usize,
}

pub struct Collector<S> {
    source: S,
    parser: CardParser,
    delay: DelayPolicy,
    raw_path: PathBuf,
}

impl Collector<WuzzufClient> {
    pub fn from_config(config: &ConfigManager) -> anyhow::Result<Self> {
        let source = WuzzufClient::new(&config.collector)?;
        let parser = CardParser::from_config(&config.collector.markup)?;
        let delay = DelayPolicy::new(
            Duration::from_millis(config.collector.min_delay_ms),
            Duration::from_millis(config.collector.max_delay_ms),
        );
        Ok(Self::new(source, parser, delay, config.raw_path()))
    }
}

impl<S: SearchSource> Collector<S> {
    pub fn new(source: S, parser: CardParser, delay: DelayPolicy, raw_path: PathBuf) -> Self {
        Self {
            source,
            parser,
            delay,
            raw_path,
        }
    }

    /// Scrape every term and overwrite the raw dataset with the deduplicated result.
    pub async fn collect(
        &self,
        search_terms: &[String],
        pages_per_term: u32,
    ) -> PipelineResult<CollectSummary> {
        let gathered = self.gather(search_terms, pages_per_term).await;

        storage::write_raw(&self.raw_path, &gathered.records)?;
        app_log!(
            info,
            "Scraping complete. Saved {} jobs to {}",
            gathered.records.len(),
            self.raw_path.display()
        );

        Ok(CollectSummary {
            unique: gathered.records.len(),
            scraped: gathered.scraped,
            terms: gathered.terms,
            output: self.raw_path.clone(),
        })
    }

    /// Scrape every term and return the deduplicated records without persisting them.
    pub async fn gather(&self, search_terms: &[String], pages_per_term: u32) -> Gathered {
        let mut records = Vec::new();
        let mut terms = Vec::with_capacity(search_terms.len());

        for term in search_terms {
            app_log!(info, "Scraping query: {}", term);
            let report = self.collect_term(term, pages_per_term, &mut records).await;
            terms.push(report);
        }

        let scraped = records.len();
        let records = dedupe(records);
        if scraped != records.len() {
            app_log!(info, "Removed {} duplicate rows", scraped - records.len());
        }

        Gathered {
            records,
            terms,
            scraped,
        }
    }

    async fn collect_term(
        &self,
        term: &str,
        pages_per_term: u32,
        records: &mut Vec<RawJobRecord>,
    ) -> TermReport {
        let mut report = TermReport {
            term: term.to_string(),
            pages_fetched: 0,
            cards_parsed: 0,
            cards_skipped: 0,
            stop: StopReason::Completed,
        };

        for page in 0..pages_per_term {
            app_log!(info, "  Fetching page {}...", page);
            let html = match self.source.fetch_page(term, page).await {
                Ok(html) => html,
                Err(e) => {
                    app_log!(warn, "  {}", e);
                    report.stop = StopReason::FetchFailed {
                        page,
                        reason: e.to_string(),
                    };
                    break;
                }
            };
            report.pages_fetched += 1;

            let parsed = self.parser.parse_page(&html);
            if parsed.is_empty() {
                app_log!(info, "  No jobs found on page {}.", page);
                report.stop = StopReason::NoCards { page };
                break;
            }

            app_log!(info, "    Found {} jobs.", parsed.cards_found);
            report.cards_parsed += parsed.records.len();
            report.cards_skipped += parsed.cards_skipped;
            records.extend(parsed.records);

            if page + 1 < pages_per_term {
                self.delay.pause().await;
            }
        }

        report
    }
}

/// Drop exact-duplicate records, keeping the first occurrence in order.
pub fn dedupe(records: Vec<RawJobRecord>) -> Vec<RawJobRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}
