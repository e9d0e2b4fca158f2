//! Line charts of lock scalability.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::warn;

use super::INDEX;
use crate::chart::{data_max, integer_tick, nice_ceiling, segments, svg_root, FONT};
use crate::error::{chart_err, Error, Result};
use crate::table::Table;

/// The locks drawn, in legend order.
pub const SERIES: [&str; 5] = [
    "spin_lock_aligned",
    "spin_lock_aligned_paused",
    "spin_lock_ttas",
    "spin_lock_ttas_paused",
    "pthread_mutex",
];

pub const FIGURE: &str = "lock_scalability.svg";
pub const FIGURE_FIRST: &str = "lock_scalability_until8.svg";

/// Thread counts shown in the zoomed-in figure.
pub const FIRST_THREADS: usize = 8;

const X_DESC: &str = "#Threads";
const Y_DESC: &str = "Avg. cycles per operation";

const PALETTE: [RGBColor; 5] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
];

/// Point marker of a series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    TriangleUp,
    Square,
    Circle,
    TriangleDown,
    TriangleLeft,
}

impl Marker {
    /// Pick the marker for a lock from its name. The more specific names are
    /// tested first.
    pub fn for_column(name: &str) -> Marker {
        if name.contains("lock_aligned_paused") {
            Marker::TriangleUp
        } else if name.contains("lock_aligned") {
            Marker::Square
        } else if name.contains("lock_ttas_paused") {
            Marker::Circle
        } else if name.contains("lock_ttas") {
            Marker::TriangleDown
        } else {
            Marker::TriangleLeft
        }
    }

    /// Outline in pixels around the data point, y pointing down.
    pub fn vertices(self) -> Vec<(i32, i32)> {
        match self {
            Marker::TriangleUp => vec![(0, -5), (5, 4), (-5, 4)],
            Marker::Square => vec![(-4, -4), (4, -4), (4, 4), (-4, 4)],
            Marker::Circle => (0..12)
                .map(|i| {
                    let a = i as f64 * std::f64::consts::PI / 6.0;
                    ((4.5 * a.cos()).round() as i32, (4.5 * a.sin()).round() as i32)
                })
                .collect(),
            Marker::TriangleDown => vec![(0, 5), (5, -4), (-5, -4)],
            Marker::TriangleLeft => vec![(-5, 0), (4, -5), (4, 5)],
        }
    }

    fn shifted(self, dx: i32) -> Vec<(i32, i32)> {
        self.vertices().into_iter().map(|(x, y)| (x + dx, y)).collect()
    }
}

struct Series<'a> {
    name: &'a str,
    values: Vec<Option<f64>>,
    marker: Marker,
    color: RGBColor,
}

/// Draw both lock figures from a lock table into `out_dir`.
///
/// Locks from [`SERIES`] that the table lacks are left out of the charts.
pub fn render(table: &Table, out_dir: &Path) -> Result<Vec<PathBuf>> {
    if table.is_empty() {
        warn!("lock table has no rows, nothing to draw");
        return Ok(Vec::new());
    }
    let threads = table
        .numeric(INDEX)?
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            t.ok_or_else(|| Error::MissingField {
                line: i + 2,
                key: INDEX.to_string(),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    let mut series = Vec::new();
    for (i, &name) in SERIES.iter().enumerate() {
        if !table.has_column(name) {
            warn!(lock = name, "no such column in lock table, skipping");
            continue;
        }
        series.push(Series {
            name,
            values: table.numeric(name)?,
            marker: Marker::for_column(name),
            color: PALETTE[i % PALETTE.len()],
        });
    }

    let max_threads = threads.iter().cloned().fold(0.0, f64::max);
    let mut files = Vec::new();
    for panel in panels(threads.len(), max_threads) {
        let path = out_dir.join(panel.file);
        draw(&path, &threads[..panel.rows], &series, panel.x_max)?;
        files.push(path);
    }
    Ok(files)
}

/// Which rows one figure shows and where its x-axis ends.
#[derive(Debug)]
struct Panel {
    file: &'static str,
    rows: usize,
    x_max: f64,
}

/// The full figure and the one zoomed in on the first [`FIRST_THREADS`]
/// thread counts.
fn panels(rows: usize, max_threads: f64) -> [Panel; 2] {
    [
        Panel {
            file: FIGURE,
            rows,
            x_max: max_threads + 0.5,
        },
        Panel {
            file: FIGURE_FIRST,
            rows: rows.min(FIRST_THREADS),
            x_max: FIRST_THREADS as f64 + 0.5,
        },
    ]
}

/// One scalability figure over the rows of `threads`.
fn draw(path: &Path, threads: &[f64], series: &[Series], x_max: f64) -> Result<()> {
    let n = threads.len();
    let y_max = nice_ceiling(data_max(
        series.iter().flat_map(|s| s.values.iter().take(n)),
    ));

    let root = svg_root(path)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(0.5..x_max, 0.0..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(x_max as usize + 1)
        .x_label_formatter(&|x| integer_tick(*x).map(|t| t.to_string()).unwrap_or_default())
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .axis_desc_style((FONT, 16))
        .draw()
        .map_err(chart_err)?;

    for s in series {
        let color = s.color;
        let marker = s.marker;
        let points: Vec<(f64, Option<f64>)> = threads
            .iter()
            .cloned()
            .zip(s.values.iter().cloned())
            .collect();

        for run in segments(&points) {
            chart
                .draw_series(LineSeries::new(run, color.stroke_width(2)))
                .map_err(chart_err)?;
        }
        chart
            .draw_series(points.iter().filter_map(|&(x, y)| y.map(|y| (x, y))).map(|p| {
                EmptyElement::at(p) + Polygon::new(marker.vertices(), color.filled())
            }))
            .map_err(chart_err)?
            .label(s.name.to_uppercase())
            .legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(0, 0), (20, 0)], color.stroke_width(2))
                    + Polygon::new(marker.shifted(10), color.filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 12))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;
    root.present().map_err(chart_err)?;
    Ok(())
}
