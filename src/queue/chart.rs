//! Grouped bar charts of queue cost per queue size.
//!
//! Each queue family gets its own figure. Bars are clustered around the row
//! of each queue size, one bar per spin time, coloured from light to dark
//! along a sequential colormap.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::warn;

use super::{COLUMN_SEP, ID, SIZE_COLUMN};
use crate::chart::{data_max, integer_tick, nice_ceiling, svg_root, FONT};
use crate::error::{chart_err, Error, Result};
use crate::table::Table;

pub const BAR_WIDTH: f64 = 0.1;

const X_DESC: &str = "Queue size";
const Y_DESC: &str = "Avg. cycles per enque/deque pair";

/// Sequential colormaps, light to dark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colormap {
    Blues,
    Oranges,
}

const BLUES: [RGBColor; 9] = [
    RGBColor(247, 251, 255),
    RGBColor(222, 235, 247),
    RGBColor(198, 219, 239),
    RGBColor(158, 202, 225),
    RGBColor(107, 174, 214),
    RGBColor(66, 146, 198),
    RGBColor(33, 113, 181),
    RGBColor(8, 81, 156),
    RGBColor(8, 48, 107),
];

const ORANGES: [RGBColor; 9] = [
    RGBColor(255, 245, 235),
    RGBColor(254, 230, 206),
    RGBColor(253, 208, 162),
    RGBColor(253, 174, 107),
    RGBColor(253, 141, 60),
    RGBColor(241, 105, 19),
    RGBColor(217, 72, 1),
    RGBColor(166, 54, 3),
    RGBColor(127, 39, 4),
];

impl Colormap {
    fn stops(self) -> &'static [RGBColor] {
        match self {
            Colormap::Blues => &BLUES,
            Colormap::Oranges => &ORANGES,
        }
    }

    /// Colour at `t` in `[0, 1]`, interpolated between the stops.
    pub fn at(self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
        let i = (t.floor() as usize).min(stops.len() - 2);
        let f = t - i as f64;
        let (a, b) = (stops[i], stops[i + 1]);
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// Colour of bar `i` out of `n`, spaced evenly from the light end.
    pub fn sample(self, i: usize, n: usize) -> RGBColor {
        if n == 0 {
            return self.at(0.0);
        }
        self.at(i as f64 / n as f64)
    }
}

/// One figure: the queue it shows and how it looks.
#[derive(Debug)]
pub struct QueuePlot {
    pub queue: &'static str,
    pub title: &'static str,
    pub colormap: Colormap,
    pub file: &'static str,
}

pub static PLOTS: [QueuePlot; 2] = [
    QueuePlot {
        queue: "stage_lam",
        title: "Lamport queue",
        colormap: Colormap::Blues,
        file: "lam.svg",
    },
    QueuePlot {
        queue: "stage_ff",
        title: "Fast-forward queue",
        colormap: Colormap::Oranges,
        file: "ff.svg",
    },
];

/// Table columns of `queue`, in header order.
pub fn family_columns<'a>(table: &'a Table, queue: &str) -> Vec<&'a str> {
    let prefix = format!("{}{}", queue, COLUMN_SEP);
    table
        .header()
        .iter()
        .filter(|h| h.starts_with(&prefix))
        .map(String::as_str)
        .collect()
}

struct Bar<'a> {
    name: &'a str,
    values: Vec<Option<f64>>,
}

struct Figure<'a> {
    plot: &'static QueuePlot,
    bars: Vec<Bar<'a>>,
    /// Top of the y-axis, never lower than any figure before it.
    y_max: f64,
}

/// Work out what every figure shows before drawing anything.
fn plan(table: &Table) -> Result<Vec<Figure<'_>>> {
    let mut figures = Vec::new();
    let mut y_max = 0.0f64;
    for plot in PLOTS.iter() {
        let columns = family_columns(table, plot.queue);
        if columns.is_empty() {
            warn!(queue = plot.queue, "queue not in table, skipping");
            continue;
        }
        let bars = columns
            .into_iter()
            .map(|name| {
                Ok(Bar {
                    name,
                    values: table.numeric(name)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        y_max = y_max.max(nice_ceiling(data_max(
            bars.iter().flat_map(|b| b.values.iter()),
        )));
        figures.push(Figure { plot, bars, y_max });
    }
    Ok(figures)
}

/// Draw one figure per queue family found in a queue table.
pub fn render(table: &Table, out_dir: &Path) -> Result<Vec<PathBuf>> {
    if table.is_empty() {
        warn!("queue table has no rows, nothing to draw");
        return Ok(Vec::new());
    }
    let ids = table
        .numeric(ID)?
        .into_iter()
        .enumerate()
        .map(|(i, id)| {
            id.ok_or_else(|| Error::MissingField {
                line: i + 2,
                key: ID.to_string(),
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    let sizes: Vec<String> = table
        .column(SIZE_COLUMN)?
        .into_iter()
        .map(String::from)
        .collect();

    let mut files = Vec::new();
    for figure in plan(table)? {
        let path = out_dir.join(figure.plot.file);
        draw(&path, &figure, &ids, &sizes)?;
        files.push(path);
    }
    Ok(files)
}

fn draw(path: &Path, figure: &Figure, ids: &[f64], sizes: &[String]) -> Result<()> {
    let plot = figure.plot;
    let nbars = figure.bars.len();

    let root = svg_root(path)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(plot.title, (FONT, 20))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(0.5..ids.len() as f64 + 0.5, 0.0..figure.y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(ids.len() + 1)
        .x_label_formatter(&|x| {
            integer_tick(*x)
                .and_then(|i| sizes.get(i - 1))
                .cloned()
                .unwrap_or_default()
        })
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .axis_desc_style((FONT, 16))
        .draw()
        .map_err(chart_err)?;

    // Bars start at the left edge of their slot; the cluster is shifted left
    // by half the bars.
    let mut offset = -((nbars / 2) as f64) * BAR_WIDTH;
    for (i, bar) in figure.bars.iter().enumerate() {
        let color = plot.colormap.sample(i, nbars);
        let corners: Vec<[(f64, f64); 2]> = ids
            .iter()
            .zip(&bar.values)
            .filter_map(|(&x, v)| v.map(|y| [(x + offset, 0.0), (x + offset + BAR_WIDTH, y)]))
            .collect();

        chart
            .draw_series(corners.iter().map(|&c| Rectangle::new(c, color.filled())))
            .map_err(chart_err)?
            .label(bar.name.to_uppercase())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        chart
            .draw_series(
                corners
                    .iter()
                    .map(|&c| Rectangle::new(c, BLACK.stroke_width(1))),
            )
            .map_err(chart_err)?;
        offset += BAR_WIDTH;
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
