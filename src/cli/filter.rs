use anyhow::Result;
use clap::{CommandFactory, Parser};

use crate::storage::activity_store::StoreError;

use super::{Args, DataFile, open_store, report::format_table};

#[derive(Debug, Parser)]
pub struct FilterCommand {
    #[arg(
        short,
        long,
        help = "Column to match, written as in the table header, for example \"Activity Type\""
    )]
    column: String,
    #[arg(short, long, help = "Value the column must equal, matched exactly")]
    value: String,
    #[command(flatten)]
    data: DataFile,
}

pub fn process_filter_command(
    FilterCommand {
        column,
        value,
        data,
    }: FilterCommand,
) -> Result<()> {
    let store = open_store(&data)?;
    let matches = match store.filter(&column, &value) {
        Ok(matches) => matches,
        // a mistyped column name is a usage mistake, answer like one
        Err(e @ StoreError::InvalidColumn { .. }) => {
            return Err(Args::command()
                .error(clap::error::ErrorKind::ValueValidation, e.to_string())
                .into());
        }
        Err(e) => return Err(e.into()),
    };
    if matches.is_empty() {
        println!("No matching activities.");
        return Ok(());
    }
    print!("{}", format_table(&matches));
    Ok(())
}
