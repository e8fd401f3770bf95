pub mod chart;
pub mod filter;
pub mod log;
pub mod report;

use std::path::PathBuf;

use anyhow::{Result, bail};
use chart::{ChartCommand, process_chart_command};
use clap::{Parser, Subcommand};
use filter::{FilterCommand, process_filter_command};
use log::{LogCommand, process_log_command};
use report::{ReportCommand, process_report_command};
use tracing::level_filters::LevelFilter;

use crate::{
    storage::activity_store::{CsvActivityStore, StoreError},
    utils::{dir::create_application_default_path, logging::enable_logging},
};

/// Name of the default backing file inside the application directory.
pub const DATA_FILE_NAME: &str = "fitness_activities.csv";

#[derive(Parser, Debug)]
#[command(name = "Fitlog", version, long_about = None)]
#[command(about = "Command line journal for personal fitness activities", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Create an empty activity file to log into")]
    Init {
        #[command(flatten)]
        data: DataFile,
    },
    #[command(about = "Log a finished activity session")]
    Log {
        #[command(flatten)]
        command: LogCommand,
    },
    #[command(about = "Display the whole activity table with aggregate statistics")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Display activities where a column matches a value exactly")]
    Filter {
        #[command(flatten)]
        command: FilterCommand,
    },
    #[command(about = "Render charts of the activity table into PNG files")]
    Chart {
        #[command(flatten)]
        command: ChartCommand,
    },
}

/// Points a command at its backing file. Shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct DataFile {
    #[arg(
        long,
        help = "Path of the activity file. By default uses fitness_activities.csv in the application directory"
    )]
    file: Option<PathBuf>,
}

impl DataFile {
    fn resolve(&self) -> Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => Ok(create_application_default_path()?.join(DATA_FILE_NAME)),
        }
    }
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(logging_level, args.log)?;

    match args.commands {
        Commands::Init { data } => process_init_command(data),
        Commands::Log { command } => process_log_command(command),
        Commands::Report { command } => process_report_command(command),
        Commands::Filter { command } => process_filter_command(command),
        Commands::Chart { command } => process_chart_command(command),
    }
}

fn process_init_command(data: DataFile) -> Result<()> {
    let path = data.resolve()?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    CsvActivityStore::create(&path)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Opens the store every data command reads. A missing backing file turns
/// into advice the user can act on.
fn open_store(data: &DataFile) -> Result<CsvActivityStore> {
    let path = data.resolve()?;
    match CsvActivityStore::open(&path) {
        Err(StoreError::StorageUnavailable { path }) => {
            bail!(
                "activity file {} does not exist, run `fitlog init` to create it first",
                path.display()
            )
        }
        store => Ok(store?),
    }
}
