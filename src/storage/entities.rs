use serde::Deserialize;
use serde::Serialize;

use std::sync::Arc;

/// The struct used for storing a single exercise session on disk. Field
/// names are bound to the CSV header cells through the serde renames, so
/// the file stays readable in any spreadsheet tool.
///
/// Dates are kept as plain text. The store never interprets them, it only
/// promises to hand back what was logged.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct ActivityRecord {
    #[serde(rename = "Date")]
    pub date: Arc<str>,
    #[serde(rename = "Activity Type")]
    pub activity_type: Arc<str>,
    #[serde(rename = "Duration (Minutes)")]
    pub duration_minutes: u32,
    #[serde(rename = "Calories Burned")]
    pub calories_burned: u32,
}

impl ActivityRecord {
    /// Renders a single field the way it appears in the table. Filtering
    /// compares against this text, which lets a probe like "30" match a
    /// numeric column without the caller caring about column types.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Date => self.date.to_string(),
            Column::ActivityType => self.activity_type.to_string(),
            Column::DurationMinutes => self.duration_minutes.to_string(),
            Column::CaloriesBurned => self.calories_burned.to_string(),
        }
    }
}

/// The four columns of the activity table, in header order.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Column {
    Date,
    ActivityType,
    DurationMinutes,
    CaloriesBurned,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Date,
        Column::ActivityType,
        Column::DurationMinutes,
        Column::CaloriesBurned,
    ];

    /// Header cell of the column, exactly as written in the backing file.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::ActivityType => "Activity Type",
            Column::DurationMinutes => "Duration (Minutes)",
            Column::CaloriesBurned => "Calories Burned",
        }
    }

    /// Resolves a user supplied column name. Only exact header names are
    /// accepted.
    pub fn parse(name: &str) -> Option<Column> {
        Self::ALL.into_iter().find(|column| column.header() == name)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::DurationMinutes | Column::CaloriesBurned)
    }
}

/// Mean and sum of the numeric columns over the whole table.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct AggregateStats {
    pub mean_duration: f64,
    pub mean_calories: f64,
    pub total_duration: u64,
    pub total_calories: u64,
}

#[cfg(test)]
mod tests {
    use super::{ActivityRecord, Column};

    #[test]
    fn test_column_parse_accepts_exact_headers() {
        assert_eq!(Column::parse("Date"), Some(Column::Date));
        assert_eq!(Column::parse("Activity Type"), Some(Column::ActivityType));
        assert_eq!(
            Column::parse("Duration (Minutes)"),
            Some(Column::DurationMinutes)
        );
        assert_eq!(
            Column::parse("Calories Burned"),
            Some(Column::CaloriesBurned)
        );
    }

    #[test]
    fn test_column_parse_rejects_everything_else() {
        assert_eq!(Column::parse("date"), None);
        assert_eq!(Column::parse("Duration"), None);
        assert_eq!(Column::parse(""), None);
    }

    #[test]
    fn test_cell_renders_numbers_as_text() {
        let record = ActivityRecord {
            date: "2025-03-15".into(),
            activity_type: "Running".into(),
            duration_minutes: 30,
            calories_burned: 300,
        };
        assert_eq!(record.cell(Column::Date), "2025-03-15");
        assert_eq!(record.cell(Column::ActivityType), "Running");
        assert_eq!(record.cell(Column::DurationMinutes), "30");
        assert_eq!(record.cell(Column::CaloriesBurned), "300");
    }
}
