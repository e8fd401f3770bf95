//! Renders the activity table into PNG charts. plotters does the actual
//! drawing, the code here only arranges the series and the axes.

pub mod correlation;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, instrument};

use crate::storage::entities::ActivityRecord;

use self::correlation::{COLUMNS, correlation_matrix};

/// The four renderable chart kinds.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Heatmap,
    ];

    /// File the chart is written into, named for what it shows.
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "duration_by_activity.png",
            ChartKind::Line => "calories_over_time.png",
            ChartKind::Pie => "activity_distribution.png",
            ChartKind::Heatmap => "correlation_heatmap.png",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Time Spent on Each Activity Type",
            ChartKind::Line => "Calories Burned Over Time",
            ChartKind::Pie => "Activity Distribution",
            ChartKind::Heatmap => "Correlation Heatmap",
        }
    }

    /// Canvas size in pixels, wide charts get more room for their x axis.
    fn dimensions(&self) -> (u32, u32) {
        match self {
            ChartKind::Bar => (800, 500),
            ChartKind::Line => (1000, 500),
            ChartKind::Pie => (600, 600),
            ChartKind::Heatmap => (600, 500),
        }
    }
}

/// Fill colours for series, cycled when a chart needs more than eight.
const PALETTE: [RGBColor; 8] = [
    RGBColor(66, 133, 244),
    RGBColor(219, 68, 55),
    RGBColor(244, 180, 0),
    RGBColor(15, 157, 88),
    RGBColor(171, 71, 188),
    RGBColor(0, 172, 193),
    RGBColor(255, 112, 67),
    RGBColor(93, 109, 126),
];

/// Renders one chart kind into `out_dir`, returning the path written.
#[instrument(skip(records))]
pub fn render(kind: ChartKind, records: &[ActivityRecord], out_dir: &Path) -> Result<PathBuf> {
    if records.is_empty() {
        bail!("the activity table is empty, there is nothing to chart");
    }
    let path = out_dir.join(kind.file_name());
    match kind {
        ChartKind::Bar => draw_bar(records, &path),
        ChartKind::Line => draw_line(records, &path),
        ChartKind::Pie => draw_pie(records, &path),
        ChartKind::Heatmap => draw_heatmap(records, &path),
    }
    .with_context(|| format!("failed to render {}", path.display()))?;
    debug!("Rendered {path:?}");
    Ok(path)
}

/// Renders every chart kind, returning the paths in [ChartKind::ALL] order.
pub fn render_all(records: &[ActivityRecord], out_dir: &Path) -> Result<Vec<PathBuf>> {
    ChartKind::ALL
        .into_iter()
        .map(|kind| render(kind, records, out_dir))
        .collect()
}

/// Total minutes per activity type, busiest first. Ties order by label so
/// charts don't reshuffle between runs.
pub fn duration_by_type(records: &[ActivityRecord]) -> Vec<(Arc<str>, u64)> {
    let mut totals = HashMap::<Arc<str>, u64>::new();
    for record in records {
        *totals.entry(record.activity_type.clone()).or_insert(0) +=
            u64::from(record.duration_minutes);
    }
    let mut totals = totals.into_iter().collect::<Vec<_>>();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals
}

/// Number of sessions per activity type, most frequent first.
pub fn activity_counts(records: &[ActivityRecord]) -> Vec<(Arc<str>, usize)> {
    let mut counts = HashMap::<Arc<str>, usize>::new();
    for record in records {
        *counts.entry(record.activity_type.clone()).or_insert(0) += 1;
    }
    let mut counts = counts.into_iter().collect::<Vec<_>>();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn draw_bar(records: &[ActivityRecord], path: &Path) -> Result<()> {
    let totals = duration_by_type(records);
    let labels: Vec<Arc<str>> = totals.iter().map(|(label, _)| label.clone()).collect();
    let y_max = totals.iter().map(|(_, minutes)| *minutes).max().unwrap_or(1);

    let root = BitMapBackend::new(path, ChartKind::Bar.dimensions()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(ChartKind::Bar.title(), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0..totals.len() - 1).into_segmented(),
            0u64..y_max + y_max / 10 + 1,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|position| match position {
            SegmentValue::CenterOf(index) => labels
                .get(*index)
                .map(|label| label.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc("Duration (Minutes)")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(PALETTE[0].filled())
            .margin(10)
            .data(
                totals
                    .iter()
                    .enumerate()
                    .map(|(index, (_, minutes))| (index, *minutes)),
            ),
    )?;

    root.present()?;
    Ok(())
}

fn draw_line(records: &[ActivityRecord], path: &Path) -> Result<()> {
    let dates: Vec<Arc<str>> = records.iter().map(|record| record.date.clone()).collect();
    let y_max = records
        .iter()
        .map(|record| record.calories_burned)
        .max()
        .unwrap_or(1);
    // a single session still needs a non-degenerate x range
    let x_max = (records.len() - 1).max(1);

    let root = BitMapBackend::new(path, ChartKind::Line.dimensions()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(ChartKind::Line.title(), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..x_max, 0u32..y_max + y_max / 10 + 1)?;

    chart
        .configure_mesh()
        .x_labels(records.len().min(12))
        .x_label_formatter(&|index| {
            dates
                .get(*index)
                .map(|date| date.to_string())
                .unwrap_or_default()
        })
        .x_desc("Date")
        .y_desc("Calories Burned")
        .draw()?;

    chart.draw_series(
        LineSeries::new(
            records
                .iter()
                .enumerate()
                .map(|(index, record)| (index, record.calories_burned)),
            PALETTE[0].stroke_width(2),
        )
        .point_size(3),
    )?;

    root.present()?;
    Ok(())
}

fn draw_pie(records: &[ActivityRecord], path: &Path) -> Result<()> {
    let counts = activity_counts(records);
    let sizes: Vec<f64> = counts.iter().map(|(_, count)| *count as f64).collect();
    let labels: Vec<String> = counts.iter().map(|(label, _)| label.to_string()).collect();
    let colors: Vec<RGBColor> = (0..counts.len())
        .map(|index| PALETTE[index % PALETTE.len()])
        .collect();

    let root = BitMapBackend::new(path, ChartKind::Pie.dimensions()).into_drawing_area();
    root.fill(&WHITE)?;
    let chart_area = root.titled(ChartKind::Pie.title(), ("sans-serif", 24))?;

    let (width, height) = chart_area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(center.0.min(center.1)) * 0.7;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 16).into_font());
    pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
    chart_area.draw(&pie)?;

    root.present()?;
    Ok(())
}

/// Pixel offset from a heatmap cell corner to its center. Mesh labels and
/// cell annotations are shifted by this so both sit centered on the cells.
const HEATMAP_CELL_CENTER: (i32, i32) = (105, 95);

fn draw_heatmap(records: &[ActivityRecord], path: &Path) -> Result<()> {
    let matrix = correlation_matrix(records);

    let root = BitMapBackend::new(path, ChartKind::Heatmap.dimensions()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(ChartKind::Heatmap.title(), ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(130)
        // y runs backwards so the first row sits at the top
        .build_cartesian_2d(0i32..2i32, 2i32..0i32)?;

    chart
        .configure_mesh()
        .x_labels(3)
        .y_labels(3)
        .x_label_offset(HEATMAP_CELL_CENTER.0)
        .y_label_offset(HEATMAP_CELL_CENTER.1)
        .disable_x_mesh()
        .disable_y_mesh()
        .label_style(("sans-serif", 14))
        .x_label_formatter(&|index| axis_label(*index))
        .y_label_formatter(&|index| axis_label(*index))
        .draw()?;

    chart.draw_series(
        matrix_cells(&matrix)
            .map(|(x, y, value)| Rectangle::new([(x, y), (x + 1, y + 1)], cell_style(value))),
    )?;

    chart.draw_series(matrix_cells(&matrix).map(|(x, y, value)| {
        let text = match value {
            Some(r) => format!("{r:.2}"),
            None => "n/a".to_string(),
        };
        let style = ("sans-serif", 18)
            .into_font()
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        EmptyElement::at((x, y)) + Text::new(text, HEATMAP_CELL_CENTER, style)
    }))?;

    root.present()?;
    Ok(())
}

fn matrix_cells(
    matrix: &[[Option<f64>; 2]; 2],
) -> impl Iterator<Item = (i32, i32, Option<f64>)> + '_ {
    matrix
        .iter()
        .zip(0..)
        .flat_map(|(cells, y)| cells.iter().zip(0..).map(move |(value, x)| (x, y, *value)))
}

fn axis_label(index: i32) -> String {
    COLUMNS
        .get(index as usize)
        .map(|column| column.header().to_string())
        .unwrap_or_default()
}

/// Diverging blue to red scale over [-1, 1]. Undefined cells are neutral
/// grey so they read as "no data" rather than "zero correlation".
fn cell_style(value: Option<f64>) -> ShapeStyle {
    match value {
        Some(r) => {
            let t = (r.clamp(-1.0, 1.0) + 1.0) / 2.0;
            HSLColor(240.0 / 360.0 - 240.0 / 360.0 * t, 0.7, 0.2 + 0.3 * t).filled()
        }
        None => RGBColor(158, 158, 158).filled(),
    }
}
