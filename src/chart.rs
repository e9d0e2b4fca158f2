//! Plotting pieces shared by the lock and queue charts.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::error::{chart_err, Result};

pub const FIGURE_SIZE: (u32, u32) = (800, 600);
pub const FONT: &str = "sans-serif";

/// Roughly how many y-axis ticks an axis gets.
const MAX_TICKS: f64 = 8.0;

/// The y-axis maximum for data peaking at `max`.
///
/// The tick step is the smallest 1, 2, 2.5 or 5 times a power of ten that
/// splits `max` into at most eight intervals, and the axis ends on the first
/// tick at or above `max`. Empty or non-positive data gets an axis of 1.
pub fn nice_ceiling(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let raw = max / MAX_TICKS;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|&s| s >= raw)
        .unwrap_or(10.0 * mag);
    ((max / step) - 1e-9).ceil() * step
}

/// Largest value over any number of series with blanks.
pub fn data_max<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a Option<f64>>,
{
    values.into_iter().flatten().fold(0.0, |m, &v| f64::max(m, v))
}

/// Split a series into runs of consecutive present values, so blank cells
/// leave a gap in the line.
pub fn segments(points: &[(f64, Option<f64>)]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for &(x, y) in points {
        match y {
            Some(y) => run.push((x, y)),
            None if !run.is_empty() => out.push(std::mem::take(&mut run)),
            None => {}
        }
    }
    if !run.is_empty() {
        out.push(run);
    }
    out
}

/// The row number at tick `x`, if `x` sits on a whole number >= 1.
pub fn integer_tick(x: f64) -> Option<usize> {
    let r = x.round();
    if r >= 1.0 && (x - r).abs() < 1e-6 {
        Some(r as usize)
    } else {
        None
    }
}

/// A white SVG canvas writing to `path`.
pub(crate) fn svg_root(path: &Path) -> Result<DrawingArea<SVGBackend<'_>, Shift>> {
    info!(path = %path.display(), "drawing chart");
    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;
    Ok(root)
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! ceiling {
        ($max:expr => $want:expr) => {
            let got = nice_ceiling($max);
            assert!((got - $want).abs() < 1e-9, "nice_ceiling({}) = {}", $max, got);
        };
    }

    #[test]
    fn ceilings() {
        ceiling!(123.4 => 140.0);
        ceiling!(10.0 => 10.0);
        ceiling!(15.0 => 16.0);
        ceiling!(0.3 => 0.3);
        ceiling!(987.0 => 1000.0);
        ceiling!(2600.0 => 3000.0);
    }

    #[test]
    fn ceiling_of_nothing() {
        ceiling!(0.0 => 1.0);
        ceiling!(-3.0 => 1.0);
        ceiling!(f64::NAN => 1.0);
    }

    #[test]
    fn max_skips_blanks() {
        let v = vec![Some(1.0), None, Some(7.5), Some(3.0)];
        assert_eq!(data_max(&v), 7.5);
        assert_eq!(data_max(&Vec::<Option<f64>>::new()), 0.0);
    }

    #[test]
    fn gaps_split_lines() {
        let pts = vec![
            (1.0, Some(1.0)),
            (2.0, Some(2.0)),
            (3.0, None),
            (4.0, Some(4.0)),
            (5.0, None),
        ];
        assert_eq!(
            segments(&pts),
            vec![vec![(1.0, 1.0), (2.0, 2.0)], vec![(4.0, 4.0)]]
        );
        assert!(segments(&[(1.0, None)]).is_empty());
    }

    #[test]
    fn ticks() {
        assert_eq!(integer_tick(3.0), Some(3));
        assert_eq!(integer_tick(2.9999999999), Some(3));
        assert_eq!(integer_tick(2.5), None);
        assert_eq!(integer_tick(0.0), None);
    }
}
