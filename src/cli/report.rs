use ansi_term::Style;
use anyhow::Result;
use clap::Parser;

use crate::storage::entities::{ActivityRecord, AggregateStats, Column};

use super::{DataFile, open_store};

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[command(flatten)]
    data: DataFile,
}

pub fn process_report_command(ReportCommand { data }: ReportCommand) -> Result<()> {
    let store = open_store(&data)?;
    let report = store.report();
    if report.records.is_empty() {
        println!("No activities logged yet.");
        return Ok(());
    }

    println!("{}", Style::new().bold().paint("FITNESS REPORT"));
    println!();
    print!("{}", format_table(report.records));
    println!();
    println!("{}", Style::new().bold().paint("METRICS"));
    if let Some(stats) = report.stats {
        print!("{}", format_metrics(&stats));
    }
    Ok(())
}

/// Renders records as an aligned plain text table, header row first. Text
/// columns align left, numeric columns align right.
pub fn format_table(records: &[ActivityRecord]) -> String {
    let widths = column_widths(records);
    let mut table = String::new();
    append_row(&mut table, &widths, |column| column.header().to_string());
    for record in records {
        append_row(&mut table, &widths, |column| record.cell(column));
    }
    table
}

/// The metrics block of the report, one statistic per line. Means keep a
/// single decimal, totals are exact.
pub fn format_metrics(stats: &AggregateStats) -> String {
    format!(
        "Average Duration: {:.1}\nAverage Calories: {:.1}\nTotal Duration: {}\nTotal Calories Burned: {}\n",
        stats.mean_duration, stats.mean_calories, stats.total_duration, stats.total_calories
    )
}

fn column_widths(records: &[ActivityRecord]) -> [usize; 4] {
    let mut widths = Column::ALL.map(|column| column.header().len());
    for record in records {
        for (index, column) in Column::ALL.into_iter().enumerate() {
            widths[index] = widths[index].max(record.cell(column).len());
        }
    }
    widths
}

fn append_row(table: &mut String, widths: &[usize; 4], mut cell: impl FnMut(Column) -> String) {
    for (index, column) in Column::ALL.into_iter().enumerate() {
        if index > 0 {
            table.push_str("  ");
        }
        let text = cell(column);
        let width = widths[index];
        if column.is_numeric() {
            table.push_str(&format!("{text:>width$}"));
        } else {
            table.push_str(&format!("{text:<width$}"));
        }
    }
    // left aligned cells shorter than the last column would leave a ragged
    // right edge of spaces
    while table.ends_with(' ') {
        table.pop();
    }
    table.push('\n');
}

#[cfg(test)]
mod tests {
    use crate::storage::entities::{ActivityRecord, AggregateStats};

    use super::{format_metrics, format_table};

    fn record(date: &str, activity: &str, duration: u32, calories: u32) -> ActivityRecord {
        ActivityRecord {
            date: date.into(),
            activity_type: activity.into(),
            duration_minutes: duration,
            calories_burned: calories,
        }
    }

    #[test]
    fn test_table_aligns_text_left_and_numbers_right() {
        let records = vec![
            record("2025-03-15", "Running", 30, 300),
            record("2025-03-16", "Rowing", 5, 80),
        ];

        let expected = concat!(
            "Date        Activity Type  Duration (Minutes)  Calories Burned\n",
            "2025-03-15  Running                        30              300\n",
            "2025-03-16  Rowing                          5               80\n",
        );
        assert_eq!(format_table(&records), expected);
    }

    #[test]
    fn test_table_grows_with_long_cells() {
        let records = vec![record("2025-03-15", "Cross country skiing", 120, 900)];

        let expected = concat!(
            "Date        Activity Type         Duration (Minutes)  Calories Burned\n",
            "2025-03-15  Cross country skiing                 120              900\n",
        );
        assert_eq!(format_table(&records), expected);
    }

    #[test]
    fn test_metrics_keep_one_decimal_for_means() {
        let stats = AggregateStats {
            mean_duration: 20.0,
            mean_calories: 200.0,
            total_duration: 40,
            total_calories: 400,
        };

        assert_eq!(
            format_metrics(&stats),
            "Average Duration: 20.0\nAverage Calories: 200.0\nTotal Duration: 40\nTotal Calories Burned: 400\n"
        );
    }

    #[test]
    fn test_metrics_round_uneven_means() {
        let stats = AggregateStats {
            mean_duration: 33.333333,
            mean_calories: 266.666666,
            total_duration: 100,
            total_calories: 800,
        };

        assert_eq!(
            format_metrics(&stats),
            "Average Duration: 33.3\nAverage Calories: 266.7\nTotal Duration: 100\nTotal Calories Burned: 800\n"
        );
    }
}
