// src/model.rs
//! Job listing records as they move through collect → normalize → report.

use serde::{Deserialize, Deserializer, Serialize};

pub const JOB_TITLE: &str = "Job Title";
pub const COMPANY_NAME: &str = "Company Name";
pub const LOCATION: &str = "Location";
pub const CITY: &str = "City";
pub const JOB_TYPE: &str = "Job Type";
pub const LEVEL: &str = "Level";
pub const YEARS_OF_EXPERIENCE: &str = "Years of Experience";
pub const SKILLS: &str = "Skills";
pub const COUNTRY: &str = "Country";

/// Column order of the raw dataset.
pub const RAW_COLUMNS: [&str; 8] = [
    JOB_TITLE,
    COMPANY_NAME,
    LOCATION,
    JOB_TYPE,
    LEVEL,
    YEARS_OF_EXPERIENCE,
    SKILLS,
    COUNTRY,
];

/// Column order of the clean dataset.
pub const CLEAN_COLUMNS: [&str; 9] = [
    JOB_TITLE,
    COMPANY_NAME,
    LOCATION,
    CITY,
    JOB_TYPE,
    LEVEL,
    YEARS_OF_EXPERIENCE,
    SKILLS,
    COUNTRY,
];

/// Placeholder the collector writes when a card lacks a field.
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder the normalizer writes for missing text fields.
pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_COUNTRY: &str = "Egypt";
pub const DEFAULT_JOB_TYPE: &str = "Full Time";

/// Cell contents read back as "missing" from a tabular file.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(&value)
}

/// One listing as scraped from a result card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RawJobRecord {
    #[serde(rename = "Job Title")]
    pub title: String,
    #[serde(rename = "Company Name")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Job Type")]
    pub job_type: String,
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "Years of Experience")]
    pub years_of_experience: String,
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "Country")]
    pub country: String,
}

impl RawJobRecord {
    pub fn new(title: String, company: String, location: String) -> Self {
        Self {
            title,
            company,
            location,
            job_type: DEFAULT_JOB_TYPE.to_string(),
            level: NOT_AVAILABLE.to_string(),
            years_of_experience: NOT_AVAILABLE.to_string(),
            skills: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// A raw dataset row read back from disk; any cell may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Job Title", default, deserialize_with = "nullable")]
    pub title: Option<String>,
    #[serde(rename = "Company Name", default, deserialize_with = "nullable")]
    pub company: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "nullable")]
    pub location: Option<String>,
    #[serde(rename = "Job Type", default, deserialize_with = "nullable")]
    pub job_type: Option<String>,
    #[serde(rename = "Level", default, deserialize_with = "nullable")]
    pub level: Option<String>,
    #[serde(rename = "Years of Experience", default, deserialize_with = "nullable")]
    pub years_of_experience: Option<String>,
    #[serde(rename = "Skills", default, deserialize_with = "nullable")]
    pub skills: Option<String>,
    #[serde(rename = "Country", default, deserialize_with = "nullable")]
    pub country: Option<String>,
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !is_null_token(v)))
}

/// A cleaned listing. Every field is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Job Title")]
    pub title: String,
    #[serde(rename = "Company Name")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Job Type")]
    pub job_type: String,
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "Years of Experience")]
    pub years_of_experience: String,
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "Country")]
    pub country: String,
}

impl JobRecord {
    /// Cells in `CLEAN_COLUMNS` order.
    pub fn cells(&self) -> [&str; 9] {
        [
            self.title.as_str(),
            self.company.as_str(),
            self.location.as_str(),
            self.city.as_str(),
            self.job_type.as_str(),
            self.level.as_str(),
            self.years_of_experience.as_str(),
            self.skills.as_str(),
            self.country.as_str(),
        ]
    }
}

/// First comma-delimited segment of a location, trimmed.
pub fn derive_city(location: &str) -> String {
    location.split(',').next().unwrap_or_default().trim().to_string()
}

/// Comma-separated skills as trimmed, non-empty tokens.
pub fn split_skills(skills: &str) -> Vec<&str> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_city() {
        assert_eq!(derive_city("Maadi, Cairo, Egypt"), "Maadi");
        assert_eq!(derive_city("  Smouha , Alexandria"), "Smouha");
        assert_eq!(derive_city("Egypt"), "Egypt");
        assert_eq!(derive_city(""), "");
    }

    #[test]
    fn test_split_skills() {
        assert_eq!(split_skills("Python, SQL,  Excel "), vec!["Python", "SQL", "Excel"]);
        assert_eq!(split_skills(" , ,"), Vec::<&str>::new());
        assert!(split_skills("").is_empty());
    }

    #[test]
    fn test_null_tokens() {
        assert!(is_null_token("N/A"));
        assert!(is_null_token(""));
        assert!(is_null_token("nan"));
        assert!(!is_null_token("Unknown"));
        assert!(!is_null_token("Entry Level"));
    }

    #[test]
    fn test_raw_record_defaults() {
        let record = RawJobRecord::new("Data Analyst".into(), "Acme".into(), "Cairo, Egypt".into());
        assert_eq!(record.job_type, "Full Time");
        assert_eq!(record.level, NOT_AVAILABLE);
        assert_eq!(record.years_of_experience, NOT_AVAILABLE);
        assert_eq!(record.skills, "");
        assert_eq!(record.country, "Egypt");
    }

    #[test]
    fn test_raw_row_reads_null_tokens_as_missing() {
        let data = "Job Title,Company Name,Location,Level\nAnalyst,,N/A,Entry Level\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let row: RawRow = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(row.title.as_deref(), Some("Analyst"));
        assert_eq!(row.company, None);
        assert_eq!(row.location, None);
        assert_eq!(row.level.as_deref(), Some("Entry Level"));
        assert_eq!(row.skills, None);
    }
}
