// src/storage.rs
//! Flat CSV persistence for the raw and clean datasets.
//!
//! Writes are full overwrites of the target file; they are not atomic.

use crate::app_log;
use crate::error::PipelineResult;
use crate::model::{JobRecord, RawJobRecord, RawRow, CLEAN_COLUMNS, RAW_COLUMNS};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Create the parent directory of `path` when it has one.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            app_log!(info, "Created directory: {}", parent.display());
        }
    }
    Ok(())
}

/// Serialize `rows` under an explicit header line. The header is written even
/// when there are no rows.
fn write_rows<T, W>(writer: W, headers: &[&str], rows: &[T]) -> PipelineResult<()>
where
    T: Serialize,
    W: Write,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_file<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> PipelineResult<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path)?;
    write_rows(file, headers, rows)?;
    app_log!(debug, "Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_raw(path: &Path, records: &[RawJobRecord]) -> PipelineResult<()> {
    write_file(path, &RAW_COLUMNS, records)
}

pub fn write_clean(path: &Path, records: &[JobRecord]) -> PipelineResult<()> {
    write_file(path, &CLEAN_COLUMNS, records)
}

/// Read the raw dataset as its header row plus typed rows.
pub fn read_raw(path: &Path) -> PipelineResult<(Vec<String>, Vec<RawRow>)> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.iter().map(String::from).collect();
    let rows = reader.deserialize().collect::<Result<Vec<RawRow>, _>>()?;
    Ok((headers, rows))
}

/// Read a CSV file as a header row plus text rows, whatever its columns are.
pub fn read_table(path: &Path) -> PipelineResult<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(String::from).collect());
    }
    Ok((headers, rows))
}

/// Last-modified time of a file, if it exists and the platform reports one.
pub fn modified_at(path: &Path) -> Option<DateTime<Local>> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(DateTime::<Local>::from)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    /// A fresh directory under the system temp dir; removed on drop.
    pub struct TempDir(PathBuf);

    impl TempDir {
        pub fn new() -> Self {
            let path = std::env::temp_dir().join(format!("wuzzuf-pulse-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&path).unwrap();
            Self(path)
        }

        pub fn join(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::TempDir;
    use super::*;

    fn sample() -> RawJobRecord {
        let mut record = RawJobRecord::new(
            "Data Analyst".into(),
            "Acme".into(),
            "Maadi, Cairo, Egypt".into(),
        );
        record.skills = "Python, SQL".into();
        record
    }

    #[test]
    fn test_write_raw_creates_parent_and_header() {
        let dir = TempDir::new();
        let path = dir.join("nested/raw.csv");
        write_raw(&path, &[sample()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("Job Title,Company Name,Location,Job Type,Level,Years of Experience,Skills,Country")
        );
        assert_eq!(
            lines.next(),
            Some("Data Analyst,Acme,\"Maadi, Cairo, Egypt\",Full Time,N/A,N/A,\"Python, SQL\",Egypt")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_dataset_still_has_header() {
        let dir = TempDir::new();
        let path = dir.join("clean.csv");
        write_clean(&path, &[]).unwrap();

        let (headers, rows) = read_table(&path).unwrap();
        assert_eq!(headers, CLEAN_COLUMNS);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_raw_round_trip_maps_sentinels_to_missing() {
        let dir = TempDir::new();
        let path = dir.join("raw.csv");
        write_raw(&path, &[sample()]).unwrap();

        let (headers, rows) = read_raw(&path).unwrap();
        assert_eq!(headers, RAW_COLUMNS);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location.as_deref(), Some("Maadi, Cairo, Egypt"));
        assert_eq!(rows[0].level, None);
        assert_eq!(rows[0].years_of_experience, None);
    }

    #[test]
    fn test_modified_at() {
        let dir = TempDir::new();
        let path = dir.join("raw.csv");
        assert!(modified_at(&path).is_none());
        write_raw(&path, &[]).unwrap();
        assert!(modified_at(&path).is_some());
    }
}
