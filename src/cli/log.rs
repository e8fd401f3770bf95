use ansi_term::Colour;
use anyhow::Result;
use chrono::{DateTime, Local};
use chrono_english::{Dialect, parse_date_string};
use clap::Parser;
use tracing::info;

use crate::storage::entities::ActivityRecord;

use super::{DataFile, open_store};

/// Stored dates render in ISO order so the table reads the way it sorts.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Parser)]
pub struct LogCommand {
    #[arg(
        long,
        help = "Date of the session. Examples are \"today\", \"yesterday\", \"15/03/2025\". Defaults to today. Text that doesn't parse as a date is stored as given"
    )]
    date: Option<String>,
    #[arg(short, long, help = "Activity label, for example \"Running\"")]
    activity: String,
    #[arg(short, long, help = "Length of the session in minutes")]
    duration: u32,
    #[arg(short, long, help = "Calories burned during the session")]
    calories: u32,
    #[command(flatten)]
    data: DataFile,
}

pub fn process_log_command(
    LogCommand {
        date,
        activity,
        duration,
        calories,
        data,
    }: LogCommand,
) -> Result<()> {
    let mut store = open_store(&data)?;
    let record = ActivityRecord {
        date: resolve_date(date.as_deref(), Local::now()).into(),
        activity_type: activity.into(),
        duration_minutes: duration,
        calories_burned: calories,
    };
    info!("Appending {record:?}");
    store.append(record)?;
    println!("{}", Colour::Green.paint("Activity logged successfully!"));
    Ok(())
}

/// Turns the date option into stored text. An absent date becomes today, a
/// parseable date is normalized to [DATE_FORMAT], anything else is stored
/// verbatim. The table itself never validates dates.
fn resolve_date(input: Option<&str>, now: DateTime<Local>) -> String {
    let Some(input) = input else {
        return now.format(DATE_FORMAT).to_string();
    };
    match parse_date_string(input, now, Dialect::Uk) {
        Ok(parsed) => parsed.format(DATE_FORMAT).to_string(),
        Err(_) => input.to_string(),
    }
}
