use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::entities::{ActivityRecord, AggregateStats, Column};

/// Errors surfaced by [CsvActivityStore] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file is missing entirely. Opening refuses to invent an
    /// empty dataset, the caller decides whether to create one.
    #[error("activity file {path:?} does not exist")]
    StorageUnavailable { path: PathBuf },
    /// Creating a backing file never clobbers an existing one.
    #[error("activity file {path:?} already exists")]
    AlreadyExists { path: PathBuf },
    #[error("unknown column {column:?}, expected one of: {}", Column::ALL.map(|c| c.header()).join(", "))]
    InvalidColumn { column: String },
    /// The backing file holds something that is not a four column activity
    /// table. Loading is all or nothing, a broken row fails the whole file.
    #[error("malformed activity data in {path:?}: {message}")]
    MalformedInput { path: PathBuf, message: String },
    /// A rewrite of the backing file failed. The in-memory table and the
    /// file may have diverged at this point.
    #[error("failed to write activity file {path:?}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Everything the report shows at once: the table and its statistics.
/// `stats` is None exactly when `records` is empty.
#[derive(Debug)]
pub struct ActivityReport<'a> {
    pub records: &'a [ActivityRecord],
    pub stats: Option<AggregateStats>,
}

/// The main storage type. Owns the in-memory activity table, reads the
/// backing file once on open and rewrites it in full after every append.
pub struct CsvActivityStore {
    path: PathBuf,
    records: Vec<ActivityRecord>,
}

impl CsvActivityStore {
    /// Opens a store over an existing backing file, loading the whole table
    /// into memory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.is_file() {
            return Err(StoreError::StorageUnavailable { path });
        }
        let records = read_table(&path)?;
        debug!("Loaded {} records from {:?}", records.len(), path);
        Ok(Self { path, records })
    }

    /// Creates a fresh backing file holding only the header row and returns
    /// a store over the empty table.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if path.exists() {
            return Err(StoreError::AlreadyExists { path });
        }
        let write_failed = |source: csv::Error| StoreError::WriteFailed {
            path: path.clone(),
            source,
        };
        let mut writer = csv::Writer::from_path(&path).map_err(&write_failed)?;
        writer
            .write_record(Column::ALL.map(|column| column.header()))
            .map_err(&write_failed)?;
        writer.flush().map_err(|e| write_failed(e.into()))?;
        debug!("Created empty activity file {path:?}");
        Ok(Self {
            path,
            records: Vec::new(),
        })
    }

    /// The whole table in insertion order, oldest first.
    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    /// Appends a single session to the table and rewrites the backing file.
    /// The rewrite costs the size of the table, which is fine at the scale
    /// of a personal journal.
    pub fn append(&mut self, record: ActivityRecord) -> Result<(), StoreError> {
        self.records.push(record);
        self.persist()
    }

    /// Mean and total of the numeric columns, or None over an empty table.
    pub fn aggregate(&self) -> Option<AggregateStats> {
        aggregate(&self.records)
    }

    /// Records whose `column` cell renders exactly equal to `value`, in
    /// table order. No pattern matching of any kind.
    pub fn filter(&self, column: &str, value: &str) -> Result<Vec<ActivityRecord>, StoreError> {
        let column = Column::parse(column).ok_or_else(|| StoreError::InvalidColumn {
            column: column.to_string(),
        })?;
        Ok(self
            .records
            .iter()
            .filter(|record| record.cell(column) == value)
            .cloned()
            .collect())
    }

    /// Combined view for display, the full table plus its statistics.
    pub fn report(&self) -> ActivityReport<'_> {
        ActivityReport {
            records: &self.records,
            stats: self.aggregate(),
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let write_failed = |source: csv::Error| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        let mut writer = csv::Writer::from_path(&self.path).map_err(&write_failed)?;
        for record in &self.records {
            writer.serialize(record).map_err(&write_failed)?;
        }
        writer.flush().map_err(|e| write_failed(e.into()))?;
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<Vec<ActivityRecord>, StoreError> {
    let malformed = |message: String| StoreError::MalformedInput {
        path: path.to_path_buf(),
        message,
    };
    let mut reader = csv::Reader::from_path(path).map_err(|e| malformed(e.to_string()))?;

    let headers = reader.headers().map_err(|e| malformed(e.to_string()))?.clone();
    let expected = Column::ALL.map(|column| column.header());
    if headers.iter().ne(expected) {
        return Err(malformed(format!(
            "header {headers:?} does not match {expected:?}"
        )));
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<ActivityRecord>() {
        records.push(row.map_err(|e| malformed(e.to_string()))?);
    }
    Ok(records)
}

/// Mean and sum of the numeric columns. There is no meaningful mean of an
/// empty table, so that case is None rather than a row of zeros.
fn aggregate(records: &[ActivityRecord]) -> Option<AggregateStats> {
    if records.is_empty() {
        return None;
    }
    let count = records.len() as f64;
    let total_duration: u64 = records
        .iter()
        .map(|record| u64::from(record.duration_minutes))
        .sum();
    let total_calories: u64 = records
        .iter()
        .map(|record| u64::from(record.calories_burned))
        .sum();
    Some(AggregateStats {
        mean_duration: total_duration as f64 / count,
        mean_calories: total_calories as f64 / count,
        total_duration,
        total_calories,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        storage::{
            activity_store::{CsvActivityStore, StoreError, aggregate},
            entities::{ActivityRecord, AggregateStats},
        },
        utils::logging::TEST_LOGGING,
    };

    const TEST_HEADER: &str = "Date,Activity Type,Duration (Minutes),Calories Burned";

    fn record(date: &str, activity: &str, duration: u32, calories: u32) -> ActivityRecord {
        ActivityRecord {
            date: date.into(),
            activity_type: activity.into(),
            duration_minutes: duration,
            calories_burned: calories,
        }
    }

    /// Store over a table that never touches the disk. Fine for everything
    /// that doesn't persist.
    fn memory_store(records: Vec<ActivityRecord>) -> CsvActivityStore {
        CsvActivityStore {
            path: PathBuf::from("unused.csv"),
            records,
        }
    }

    #[test]
    fn test_open_missing_file_fails_without_creating_it() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("fitness_activities.csv");

        let result = CsvActivityStore::open(&path);

        assert!(matches!(
            result,
            Err(StoreError::StorageUnavailable { .. })
        ));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_create_writes_header_only() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("fitness_activities.csv");

        let store = CsvActivityStore::create(&path)?;

        assert!(store.records().is_empty());
        let content = std::fs::read_to_string(&path)?;
        assert_eq!(content.trim_end(), TEST_HEADER);
        Ok(())
    }

    #[test]
    fn test_create_refuses_existing_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("fitness_activities.csv");
        std::fs::write(&path, "something else entirely")?;

        let result = CsvActivityStore::create(&path);

        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
        assert_eq!(std::fs::read_to_string(&path)?, "something else entirely");
        Ok(())
    }

    #[test]
    fn test_append_survives_reopening() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let path = dir.path().join("fitness_activities.csv");

        let mut store = CsvActivityStore::create(&path)?;
        store.append(record("2025-03-15", "Running", 30, 300))?;
        store.append(record("2025-03-16", "Swimming", 45, 400))?;
        drop(store);

        let reopened = CsvActivityStore::open(&path)?;
        assert_eq!(
            reopened.records(),
            &[
                record("2025-03-15", "Running", 30, 300),
                record("2025-03-16", "Swimming", 45, 400),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_append_preserves_insertion_order() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("fitness_activities.csv");

        let mut store = CsvActivityStore::create(&path)?;
        for day in 1..=5 {
            store.append(record(&format!("2025-03-{day:02}"), "Walking", day, day * 10))?;
        }
        drop(store);

        let reopened = CsvActivityStore::open(&path)?;
        let dates: Vec<_> = reopened
            .records()
            .iter()
            .map(|record| record.date.to_string())
            .collect();
        assert_eq!(
            dates,
            vec![
                "2025-03-01",
                "2025-03-02",
                "2025-03-03",
                "2025-03-04",
                "2025-03-05"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_round_trip_of_delimiters_and_quotes() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("fitness_activities.csv");

        let tricky = record("2025-03-15", "Rock climbing, \"indoor\"", 90, 700);
        let mut store = CsvActivityStore::create(&path)?;
        store.append(tricky.clone())?;
        drop(store);

        let reopened = CsvActivityStore::open(&path)?;
        assert_eq!(reopened.records(), &[tricky]);
        Ok(())
    }

    #[test]
    fn test_open_rejects_unknown_header() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("fitness_activities.csv");
        std::fs::write(&path, "Date,Steps\n2025-03-15,9000\n")?;

        let result = CsvActivityStore::open(&path);

        assert!(matches!(result, Err(StoreError::MalformedInput { .. })));
        Ok(())
    }

    #[test]
    fn test_open_rejects_non_numeric_duration() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("fitness_activities.csv");
        std::fs::write(
            &path,
            format!("{TEST_HEADER}\n2025-03-15,Running,half an hour,300\n"),
        )?;

        let result = CsvActivityStore::open(&path);

        assert!(matches!(result, Err(StoreError::MalformedInput { .. })));
        Ok(())
    }

    #[test]
    fn test_append_reports_write_failure() -> Result<()> {
        let dir = tempdir()?;
        // parent directory intentionally missing
        let path = dir.path().join("missing").join("fitness_activities.csv");

        let mut store = memory_store(vec![]);
        store.path = path;
        let result = store.append(record("2025-03-15", "Running", 30, 300));

        assert!(matches!(result, Err(StoreError::WriteFailed { .. })));
        Ok(())
    }

    #[test]
    fn test_filter_matches_exact_text() -> Result<()> {
        let store = memory_store(vec![
            record("2025-03-15", "Running", 30, 300),
            record("2025-03-16", "Cycling", 60, 500),
            record("2025-03-17", "Running", 20, 180),
        ]);

        let matches = store.filter("Activity Type", "Running")?;

        assert_eq!(
            matches,
            vec![
                record("2025-03-15", "Running", 30, 300),
                record("2025-03-17", "Running", 20, 180),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_filter_compares_numeric_columns_as_text() -> Result<()> {
        let store = memory_store(vec![
            record("2025-03-15", "Running", 30, 300),
            record("2025-03-16", "Cycling", 60, 500),
        ]);

        assert_eq!(
            store.filter("Duration (Minutes)", "30")?,
            vec![record("2025-03-15", "Running", 30, 300)]
        );
        // "030" is not how the cell renders, so it matches nothing
        assert!(store.filter("Duration (Minutes)", "030")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_filter_without_matches_is_empty_not_an_error() -> Result<()> {
        let store = memory_store(vec![record("2025-03-15", "Running", 30, 300)]);

        assert!(store.filter("Activity Type", "Yoga")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_filter_rejects_unknown_column() {
        let store = memory_store(vec![record("2025-03-15", "Running", 30, 300)]);

        let result = store.filter("Heart Rate", "150");

        assert!(matches!(
            result,
            Err(StoreError::InvalidColumn { column }) if column == "Heart Rate"
        ));
    }

    #[test]
    fn test_aggregate_means_and_totals() {
        let records = vec![
            record("2025-03-15", "Running", 30, 300),
            record("2025-03-16", "Swimming", 10, 100),
        ];

        assert_eq!(
            aggregate(&records),
            Some(AggregateStats {
                mean_duration: 20.0,
                mean_calories: 200.0,
                total_duration: 40,
                total_calories: 400,
            })
        );
    }

    #[test]
    fn test_aggregate_of_empty_table_is_none() {
        assert_eq!(aggregate(&[]), None);
    }

    #[test]
    fn test_report_combines_records_and_stats() {
        let store = memory_store(vec![record("2025-03-15", "Running", 30, 300)]);

        let report = store.report();

        assert_eq!(report.records.len(), 1);
        assert_eq!(
            report.stats,
            Some(AggregateStats {
                mean_duration: 30.0,
                mean_calories: 300.0,
                total_duration: 30,
                total_calories: 300,
            })
        );
    }

    #[test]
    fn test_report_of_empty_table_has_no_stats() {
        let store = memory_store(vec![]);

        let report = store.report();

        assert!(report.records.is_empty());
        assert!(report.stats.is_none());
    }
}
