// src/collector/parser.rs
//! Result-page parsing: locating job cards and pulling fields out of them.
//!
//! The site's class names are generated and drift between deploys, so card
//! detection tries an ordered list of strategies and field extraction never
//! fails on a missing sub-element.

use super::classify::{DetailClassifier, DetailField};
use crate::app_log;
use crate::config::MarkupConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::model::{RawJobRecord, NOT_AVAILABLE};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Experience range followed by the site's "Yrs of Exp" suffix.
const EXPERIENCE_PATTERN: &str = r"([0-9+\-\s]+Yrs of Exp)";
const EXPERIENCE_MARKER: &str = "Yrs of Exp";

/// Compiled selectors for one version of the site's markup.
#[derive(Debug, Clone)]
pub struct MarkupProfile {
    card: Selector,
    heading: Selector,
    company: Selector,
    location: Selector,
    details: Selector,
    job_type: Selector,
    link: Selector,
    span: Selector,
}

impl MarkupProfile {
    pub fn compile(config: &MarkupConfig) -> PipelineResult<Self> {
        Ok(Self {
            card: parse_selector(&config.card)?,
            heading: parse_selector(&config.heading)?,
            company: parse_selector(&config.company)?,
            location: parse_selector(&config.location)?,
            details: parse_selector(&config.details)?,
            job_type: parse_selector(&config.job_type)?,
            link: parse_selector("a")?,
            span: parse_selector("span")?,
        })
    }
}

fn parse_selector(selector: &str) -> PipelineResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| PipelineError::ParseFailure(format!("invalid selector '{}': {}", selector, e)))
}

/// Ways of finding job cards on a page, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStrategy {
    /// Elements carrying the card marker class.
    Marker,
    /// Headings, each walked up to its second enclosing `div`.
    HeadingAncestor,
}

pub const DEFAULT_STRATEGIES: &[CardStrategy] = &[CardStrategy::Marker, CardStrategy::HeadingAncestor];

/// Outcome of parsing one result page.
#[derive(Debug, Default)]
pub struct PageParse {
    pub records: Vec<RawJobRecord>,
    pub strategy: Option<CardStrategy>,
    pub cards_found: usize,
    pub cards_skipped: usize,
}

impl PageParse {
    pub fn is_empty(&self) -> bool {
        self.cards_found == 0
    }
}

#[derive(Debug, Clone)]
pub struct CardParser {
    profile: MarkupProfile,
    classifier: DetailClassifier,
    strategies: Vec<CardStrategy>,
    experience: Regex,
}

impl CardParser {
    pub fn new(profile: MarkupProfile, classifier: DetailClassifier) -> PipelineResult<Self> {
        let experience = Regex::new(EXPERIENCE_PATTERN)
            .map_err(|e| PipelineError::ParseFailure(e.to_string()))?;

        Ok(Self {
            profile,
            classifier,
            strategies: DEFAULT_STRATEGIES.to_vec(),
            experience,
        })
    }

    pub fn from_config(config: &MarkupConfig) -> PipelineResult<Self> {
        Self::new(MarkupProfile::compile(config)?, DetailClassifier::default())
    }

    pub fn with_strategies(mut self, strategies: Vec<CardStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Parse every card on a page. Cards that cannot be resolved are logged and skipped.
    pub fn parse_page(&self, html: &str) -> PageParse {
        let document = Html::parse_document(html);
        let Some((strategy, cards)) = self.locate_cards(&document) else {
            return PageParse::default();
        };

        let mut page = PageParse {
            strategy: Some(strategy),
            cards_found: cards.len(),
            ..Default::default()
        };

        for (index, card) in cards.into_iter().enumerate() {
            match card {
                Ok(card) => page.records.push(self.parse_card(card)),
                Err(e) => {
                    app_log!(warn, "Skipping card {}: {}", index, e);
                    page.cards_skipped += 1;
                }
            }
        }

        page
    }

    /// Cards found by the first strategy that finds any. A heading that has no
    /// enclosing card still counts as found, as an error.
    fn locate_cards<'a>(
        &self,
        document: &'a Html,
    ) -> Option<(CardStrategy, Vec<PipelineResult<ElementRef<'a>>>)> {
        self.strategies.iter().find_map(|strategy| {
            let cards: Vec<PipelineResult<ElementRef<'a>>> = match strategy {
                CardStrategy::Marker => document.select(&self.profile.card).map(Ok).collect(),
                CardStrategy::HeadingAncestor => {
                    let mut seen = HashSet::new();
                    document
                        .select(&self.profile.heading)
                        .map(card_from_heading)
                        .filter(|card| card.as_ref().map_or(true, |c| seen.insert(c.id())))
                        .collect()
                }
            };

            if cards.is_empty() {
                None
            } else {
                if *strategy != CardStrategy::Marker {
                    app_log!(warn, "Card marker not found, using {:?} fallback", strategy);
                }
                Some((*strategy, cards))
            }
        })
    }

    /// Extract one record from a card element. Missing fields read as "N/A".
    pub fn parse_card(&self, card: ElementRef) -> RawJobRecord {
        let title = first_text(card, &self.profile.heading).unwrap_or_else(not_available);
        let company = first_text(card, &self.profile.company)
            .map(|c| c.replace(" -", "").trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(not_available);
        let location = first_text(card, &self.profile.location).unwrap_or_else(not_available);

        let mut record = RawJobRecord::new(title, company, location);
        if let Some(details) = card.select(&self.profile.details).next() {
            self.read_details(details, &mut record);
        }
        record
    }

    fn read_details(&self, details: ElementRef, record: &mut RawJobRecord) {
        let type_block = details.select(&self.profile.job_type).next();

        if let Some(block) = type_block {
            let types: Vec<String> = block
                .select(&self.profile.span)
                .map(element_text)
                .filter(|t| !t.is_empty())
                .collect();
            if !types.is_empty() {
                record.job_type = types.join(", ");
            }
        }

        let mut skills = Vec::new();
        for link in details.select(&self.profile.link) {
            let in_type_block = match (link.parent(), type_block) {
                (Some(parent), Some(block)) => parent.id() == block.id(),
                _ => false,
            };
            if in_type_block {
                continue;
            }

            let text = element_text(link);
            if text.is_empty() {
                continue;
            }
            match self.classifier.classify(&text) {
                DetailField::Level => record.level = text,
                DetailField::Experience => record.years_of_experience = text,
                DetailField::Skill => skills.push(text),
            }
        }
        record.skills = skills.join(", ");

        if record.years_of_experience == NOT_AVAILABLE {
            let joined = details.text().collect::<Vec<_>>().join(" | ");
            if let Some(years) = self.match_experience(&joined) {
                record.years_of_experience = years;
            }
        }
    }

    /// Secondary experience pass over the details text.
    fn match_experience(&self, text: &str) -> Option<String> {
        if !text.contains(EXPERIENCE_MARKER) {
            return None;
        }
        self.experience
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// The second `div` enclosing a heading, which wraps the whole listing.
fn card_from_heading(heading: ElementRef) -> PipelineResult<ElementRef> {
    heading
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "div")
        .nth(1)
        .ok_or_else(|| {
            PipelineError::ParseFailure(format!(
                "heading '{}' has no enclosing card",
                element_text(heading)
            ))
        })
}

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
