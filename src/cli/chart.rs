use std::{fmt::Display, path::PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};

use crate::charts::{self, ChartKind};

use super::{DataFile, open_store};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChartSelection {
    Bar,
    Line,
    Pie,
    Heatmap,
    All,
}

impl ChartSelection {
    /// The single picked kind, or None for the whole set.
    fn kind(&self) -> Option<ChartKind> {
        match self {
            ChartSelection::Bar => Some(ChartKind::Bar),
            ChartSelection::Line => Some(ChartKind::Line),
            ChartSelection::Pie => Some(ChartKind::Pie),
            ChartSelection::Heatmap => Some(ChartKind::Heatmap),
            ChartSelection::All => None,
        }
    }
}

impl Display for ChartSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartSelection::Bar => write!(f, "bar"),
            ChartSelection::Line => write!(f, "line"),
            ChartSelection::Pie => write!(f, "pie"),
            ChartSelection::Heatmap => write!(f, "heatmap"),
            ChartSelection::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct ChartCommand {
    #[arg(default_value_t = ChartSelection::All, help = "Which chart to render")]
    chart: ChartSelection,
    #[arg(
        long,
        default_value = ".",
        help = "Directory the PNG files are written into"
    )]
    out: PathBuf,
    #[command(flatten)]
    data: DataFile,
}

pub fn process_chart_command(ChartCommand { chart, out, data }: ChartCommand) -> Result<()> {
    let store = open_store(&data)?;
    if store.records().is_empty() {
        bail!("no activities logged yet, there is nothing to chart");
    }

    std::fs::create_dir_all(&out)?;
    let written = match chart.kind() {
        Some(kind) => vec![charts::render(kind, store.records(), &out)?],
        None => charts::render_all(store.records(), &out)?,
    };
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
