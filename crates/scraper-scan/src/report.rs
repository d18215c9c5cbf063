// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Report
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Plot-ready series and summaries for the plotting front end.
//!
//! Three panels share the vertical axis (bunch mean in display units):
//! lost-particle count, loss turn and loss position along the ring.

use scraper_types::constants::{COORDINATE_LABELS, DISPLAY_UNITS};
use scraper_types::error::{ScanError, ScanOutcome};
use scraper_types::state::{ApertureConfig, Coordinate, ScanResult};
use serde::Serialize;

/// Share of the mean range used for the lattice drawing band.
const LATTICE_BAND_FRACTION: f64 = 0.15;
const LATTICE_BAND_OFFSET_FRACTION: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub label: String,
    pub y_label: String,
    pub unit_factor: f64,
    /// `(lost count, mean)` per lossy step.
    pub loss_count: Vec<PlotPoint>,
    /// `(loss turn, mean)` per lost particle.
    pub loss_turn: Vec<PlotPoint>,
    /// `(s [m], mean)` per lost particle.
    pub loss_position: Vec<PlotPoint>,
}

/// Vertical placement of the lattice sketch under the loss-position panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatticeBand {
    pub offset: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    pub aperture: String,
    pub steps_with_loss: usize,
    pub total_lost: usize,
    pub max_loss_count: usize,
    /// Achieved mean of the first lossy step, display units.
    pub first_loss_mean: Option<f64>,
    pub earliest_loss_turn: Option<usize>,
}

pub fn display_unit(coordinate: Coordinate) -> f64 {
    DISPLAY_UNITS[coordinate.index()]
}

pub fn axis_label(coordinate: Coordinate) -> &'static str {
    COORDINATE_LABELS[coordinate.index()]
}

/// Legend label, limits in millimetres.
pub fn aperture_label(ap: &ApertureConfig) -> String {
    format!(
        "h=({:.1}, {:.1}) v=({:.1}, {:.1}) [mm]",
        ap.h_min * 1e3,
        ap.h_max * 1e3,
        ap.v_min * 1e3,
        ap.v_max * 1e3
    )
}

/// Build the three panel series of one scan. `spos` maps element index
/// to longitudinal position.
pub fn plot_series(result: &ScanResult, spos: &[f64]) -> ScanOutcome<PlotSeries> {
    let unit = display_unit(result.coordinate);
    let mut series = PlotSeries {
        label: aperture_label(&result.aperture_used),
        y_label: axis_label(result.coordinate).to_string(),
        unit_factor: unit,
        loss_count: Vec::with_capacity(result.len()),
        loss_turn: Vec::new(),
        loss_position: Vec::new(),
    };

    for i in 0..result.len() {
        let y = result.mean_coordinates[i] * unit;
        series.loss_count.push(PlotPoint {
            x: result.loss_counts[i] as f64,
            y,
        });
        for &turn in &result.loss_turns[i] {
            series.loss_turn.push(PlotPoint { x: turn as f64, y });
        }
        for &idx in &result.loss_indices[i] {
            let s = spos.get(idx).copied().ok_or_else(|| {
                ScanError::ConfigurationError(format!(
                    "loss index {idx} outside spos table of {} entries",
                    spos.len()
                ))
            })?;
            series.loss_position.push(PlotPoint { x: s, y });
        }
    }
    Ok(series)
}

/// Range of reported means over several scans, display units.
pub fn mean_range(results: &[ScanResult]) -> Option<(f64, f64)> {
    results
        .iter()
        .flat_map(|r| {
            let unit = display_unit(r.coordinate);
            r.mean_coordinates.iter().map(move |m| m * unit)
        })
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Band sits at 80 % of the minimum when the range does not cross zero.
pub fn lattice_band(min: f64, max: f64) -> LatticeBand {
    let offset = if min * max > 0.0 {
        min * LATTICE_BAND_OFFSET_FRACTION
    } else {
        0.0
    };
    LatticeBand {
        offset,
        height: (max - min).abs() * LATTICE_BAND_FRACTION,
    }
}

pub fn summarize(result: &ScanResult) -> ScanSummary {
    let unit = display_unit(result.coordinate);
    ScanSummary {
        aperture: aperture_label(&result.aperture_used),
        steps_with_loss: result.len(),
        total_lost: result.total_lost(),
        max_loss_count: result.loss_counts.iter().copied().max().unwrap_or(0),
        first_loss_mean: result.mean_coordinates.first().map(|m| m * unit),
        earliest_loss_turn: result.loss_turns.iter().flatten().copied().min(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> ScanResult {
        ScanResult {
            aperture_used: ApertureConfig::new(-0.012, 0.012, -0.0024, 0.0024),
            coordinate: Coordinate::X,
            offsets: vec![0.0105, 0.0121],
            loss_counts: vec![1, 3],
            mean_coordinates: vec![0.0105, 0.0121],
            loss_turns: vec![vec![4], vec![0, 1, 7]],
            loss_indices: vec![vec![2], vec![0, 2, 3]],
            requested_offsets: vec![0.0185, 0.02],
            steps: vec![7, 9],
        }
    }

    #[test]
    fn test_aperture_label_in_mm() {
        let label = aperture_label(&ApertureConfig::new(-0.012, 0.012, -0.0024, 0.0025));
        assert_eq!(label, "h=(-12.0, 12.0) v=(-2.4, 2.5) [mm]");
    }

    #[test]
    fn test_plot_series_points() {
        let spos = [0.0, 1.5, 3.0, 4.5, 6.0];
        let s = plot_series(&result(), &spos).unwrap();
        assert_eq!(s.loss_count.len(), 2);
        assert_eq!(s.loss_turn.len(), 4);
        assert_eq!(s.loss_position.len(), 4);
        assert!((s.loss_count[1].y - 12.1).abs() < 1e-9);
        assert_eq!(s.loss_count[1].x, 3.0);
        assert_eq!(s.loss_position[0].x, 3.0);
        assert_eq!(s.loss_position[2].x, 3.0);
        assert_eq!(s.y_label, "horizontal position mean [mm]");
    }

    #[test]
    fn test_plot_series_rejects_unknown_element() {
        assert!(plot_series(&result(), &[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_mean_range_and_band() {
        let (lo, hi) = mean_range(&[result()]).unwrap();
        assert!((lo - 10.5).abs() < 1e-9);
        assert!((hi - 12.1).abs() < 1e-9);
        let band = lattice_band(lo, hi);
        assert!((band.offset - 8.4).abs() < 1e-9);
        assert!((band.height - 0.24).abs() < 1e-9);
        assert_eq!(lattice_band(-1.0, 2.0).offset, 0.0);
        assert!(mean_range(&[]).is_none());
    }

    #[test]
    fn test_summary() {
        let s = summarize(&result());
        assert_eq!(s.steps_with_loss, 2);
        assert_eq!(s.total_lost, 4);
        assert_eq!(s.max_loss_count, 3);
        assert_eq!(s.earliest_loss_turn, Some(0));
        assert!((s.first_loss_mean.unwrap() - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_display_units_per_coordinate() {
        assert_eq!(display_unit(Coordinate::Delta), 1e2);
        assert_eq!(display_unit(Coordinate::Yp), 1e3);
        assert_eq!(axis_label(Coordinate::Z), "delta l [mm]");
    }
}
