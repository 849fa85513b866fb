// src/normalizer.rs
//! Turns the raw dataset into the clean one: fill defaults, derive City,
//! keep Egyptian listings only.
//!
//! Safe to re-run; the same raw file always produces the same clean file.

use crate::app_log;
use crate::config::ConfigManager;
use crate::error::{PipelineError, PipelineResult};
use crate::model::{
    derive_city, JobRecord, RawRow, COMPANY_NAME, DEFAULT_COUNTRY, JOB_TITLE, JOB_TYPE, LEVEL,
    LOCATION, SKILLS, UNKNOWN,
};
use crate::storage;
use std::path::PathBuf;

/// Substring a Location must contain, compared case-insensitively.
pub const COUNTRY_FILTER: &str = "egypt";

/// Columns the raw dataset must carry for cleaning to make sense.
pub const REQUIRED_COLUMNS: [&str; 6] = [JOB_TITLE, COMPANY_NAME, LOCATION, JOB_TYPE, LEVEL, SKILLS];

#[derive(Debug, Clone)]
pub struct Normalizer {
    raw_path: PathBuf,
    clean_path: PathBuf,
}

impl Normalizer {
    pub fn new(raw_path: PathBuf, clean_path: PathBuf) -> Self {
        Self {
            raw_path,
            clean_path,
        }
    }

    pub fn from_config(config: &ConfigManager) -> Self {
        Self::new(config.raw_path(), config.clean_path())
    }

    pub fn clean_path(&self) -> &PathBuf {
        &self.clean_path
    }

    /// Clean the raw dataset and persist it. Never fails: any error is logged
    /// and an empty result returned.
    pub fn normalize(&self) -> Vec<JobRecord> {
        match self.try_normalize() {
            Ok(records) => records,
            Err(PipelineError::SourceUnavailable(path)) => {
                app_log!(warn, "Error: {} not found.", path.display());
                Vec::new()
            }
            Err(e) => {
                app_log!(error, "Error during data processing: {}", e);
                Vec::new()
            }
        }
    }

    /// Same as [`normalize`](Self::normalize) but reports the failure kind.
    pub fn try_normalize(&self) -> PipelineResult<Vec<JobRecord>> {
        if !self.raw_path.exists() {
            return Err(PipelineError::SourceUnavailable(self.raw_path.clone()));
        }

        let (headers, rows) = storage::read_raw(&self.raw_path)?;
        check_columns(&headers)?;
        let total = rows.len();
        let records = clean_rows(rows);

        storage::write_clean(&self.clean_path, &records)?;
        app_log!(
            info,
            "Data processed successfully. Kept {} of {} rows, saved to {}",
            records.len(),
            total,
            self.clean_path.display()
        );
        Ok(records)
    }
}

/// Fail when a column the cleaning step fills is absent from the raw header.
pub fn check_columns(headers: &[String]) -> PipelineResult<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == column))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::TransformFailure(format!(
            "raw dataset is missing columns: {}",
            missing.join(", ")
        )))
    }
}

/// Filter, then fill and derive, preserving row order.
pub fn clean_rows(rows: Vec<RawRow>) -> Vec<JobRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let location = row.location.clone().filter(|l| is_in_country(l))?;
            Some(fill_row(row, location))
        })
        .collect()
}

fn is_in_country(location: &str) -> bool {
    location.to_lowercase().contains(COUNTRY_FILTER)
}

fn fill_row(row: RawRow, location: String) -> JobRecord {
    let or_unknown = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN.to_string());

    JobRecord {
        city: derive_city(&location),
        title: or_unknown(row.title),
        company: or_unknown(row.company),
        location,
        job_type: or_unknown(row.job_type),
        level: or_unknown(row.level),
        years_of_experience: or_unknown(row.years_of_experience),
        skills: row.skills.unwrap_or_default(),
        country: row.country.unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
    }
}
