// src/dashboard/summary.rs
//! Aggregated statistics over the cleaned dataset.

use super::table::JobTable;
use crate::model::{
    is_null_token, split_skills, CITY, COMPANY_NAME, JOB_TITLE, JOB_TYPE, LEVEL, SKILLS,
    UNKNOWN, YEARS_OF_EXPERIENCE,
};
use serde::Serialize;
use std::collections::HashMap;

const EMPTY_KPI: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub value: String,
    pub count: usize,
}

/// Headline numbers plus one breakdown per view. A breakdown is `None` when
/// its column is missing from the dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_jobs: usize,
    pub top_city: String,
    pub top_company: String,
    pub top_skill: String,
    pub job_types: Option<Vec<Count>>,
    pub cities: Option<Vec<Count>>,
    pub companies: Option<Vec<Count>>,
    pub titles: Option<Vec<Count>>,
    pub skills: Option<Vec<Count>>,
    pub levels: Option<Vec<Count>>,
    pub experience: Option<Vec<Count>>,
}

impl Summary {
    pub fn from_table(table: &JobTable) -> Self {
        let skill_tokens: Option<Vec<&str>> = table
            .column(SKILLS)
            .map(|cells| cells.into_iter().flat_map(split_skills).collect());

        Self {
            total_jobs: table.len(),
            top_city: kpi(table.column(CITY)),
            top_company: kpi(table.column(COMPANY_NAME)),
            top_skill: kpi(skill_tokens.clone()),
            job_types: breakdown(table.column(JOB_TYPE), None),
            cities: breakdown(table.column(CITY), Some(7)),
            companies: breakdown(table.column(COMPANY_NAME), Some(10)),
            titles: breakdown(table.column(JOB_TITLE), Some(10)),
            skills: breakdown(skill_tokens, Some(15)),
            levels: breakdown(table.column(LEVEL), None),
            experience: breakdown(
                table.column(YEARS_OF_EXPERIENCE).map(|cells| {
                    cells
                        .into_iter()
                        .map(|c| if is_null_token(c) { UNKNOWN } else { c })
                        .collect()
                }),
                Some(8),
            ),
        }
    }
}

fn kpi(values: Option<Vec<&str>>) -> String {
    values
        .and_then(|v| mode(&v))
        .unwrap_or(EMPTY_KPI)
        .to_string()
}

fn breakdown(values: Option<Vec<&str>>, limit: Option<usize>) -> Option<Vec<Count>> {
    let mut counts = value_counts(&values?);
    if let Some(limit) = limit {
        counts.truncate(limit);
    }
    Some(counts)
}

/// Occurrences per distinct value, most frequent first; ties keep first-seen order.
pub fn value_counts(values: &[&str]) -> Vec<Count> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut result: Vec<Count> = order
        .into_iter()
        .map(|value| Count {
            value: value.to_string(),
            count: counts[value],
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

/// Most frequent value; ties resolve to the lexicographically smallest.
pub fn mode<'a>(values: &[&'a str]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobRecord;

    fn record(title: &str, company: &str, city: &str, level: &str, skills: &str) -> JobRecord {
        JobRecord {
            title: title.into(),
            company: company.into(),
            location: format!("{}, Egypt", city),
            city: city.into(),
            job_type: "Full Time".into(),
            level: level.into(),
            years_of_experience: "1 - 3 Yrs of Exp".into(),
            skills: skills.into(),
            country: "Egypt".into(),
        }
    }

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(&["b", "a", "c", "a", "b", "d"]);
        let pairs: Vec<_> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }

    #[test]
    fn test_mode_breaks_ties_alphabetically() {
        assert_eq!(mode(&["Giza", "Cairo", "Giza", "Cairo"]), Some("Cairo"));
        assert_eq!(mode(&["Giza", "Cairo", "Giza"]), Some("Giza"));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_summary_kpis_and_breakdowns() {
        let table = JobTable::from_records(&[
            record("Data Analyst", "Acme", "Cairo", "Entry Level", "SQL, Python"),
            record("Data Analyst", "Valeo", "Giza", "Experienced Level", "Python, Excel"),
            record("ML Engineer", "Acme", "Cairo", "Entry Level", " Python ,"),
        ]);

        let summary = Summary::from_table(&table);
        assert_eq!(summary.total_jobs, 3);
        assert_eq!(summary.top_city, "Cairo");
        assert_eq!(summary.top_company, "Acme");
        assert_eq!(summary.top_skill, "Python");

        let skills = summary.skills.unwrap();
        assert_eq!(skills[0], Count { value: "Python".into(), count: 3 });
        assert_eq!(skills.len(), 3);

        let titles = summary.titles.unwrap();
        assert_eq!(titles[0], Count { value: "Data Analyst".into(), count: 2 });
        assert_eq!(summary.levels.unwrap().len(), 2);
    }

    #[test]
    fn test_missing_column_only_drops_its_view() {
        let table = JobTable::new(
            vec!["Job Title".into(), "Company Name".into(), "City".into()],
            vec![vec!["Analyst".into(), "Acme".into(), "Cairo".into()]],
        );

        let summary = Summary::from_table(&table);
        assert!(summary.levels.is_none());
        assert!(summary.skills.is_none());
        assert_eq!(summary.top_skill, "N/A");
        assert_eq!(summary.cities.unwrap()[0].value, "Cairo");
        assert_eq!(summary.titles.unwrap()[0].count, 1);
    }

    #[test]
    fn test_experience_nulls_read_as_unknown() {
        let table = JobTable::new(
            vec!["Years of Experience".into()],
            vec![vec!["".into()], vec!["nan".into()], vec!["2 - 4 Yrs of Exp".into()]],
        );
        let experience = Summary::from_table(&table).experience.unwrap();
        assert_eq!(experience[0], Count { value: "Unknown".into(), count: 2 });
    }

    #[test]
    fn test_breakdown_limits() {
        let cities: Vec<String> = (0..12).map(|i| format!("City {}", i)).collect();
        let rows = cities.iter().map(|c| vec![c.clone()]).collect();
        let table = JobTable::new(vec!["City".into()], rows);
        assert_eq!(Summary::from_table(&table).cities.unwrap().len(), 7);
    }

    #[test]
    fn test_empty_table() {
        let summary = Summary::from_table(&JobTable::default());
        assert_eq!(summary.total_jobs, 0);
        assert_eq!(summary.top_city, "N/A");
        assert!(summary.cities.is_none());
    }
}
