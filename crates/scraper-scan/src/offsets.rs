// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Offsets
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Monotonic offset sequences and their per-step increments.

use ndarray::Array1;
use scraper_types::config::ScanSettings;
use scraper_types::error::{ScanError, ScanOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    Increasing,
    Decreasing,
}

/// One step of a sweep: the cumulative `offset` reached after adding
/// `increment` to the previous step's offset (zero before step 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetStep {
    pub index: usize,
    pub offset: f64,
    pub increment: f64,
}

/// Non-empty, finite, strictly monotonic sequence of offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetSequence {
    values: Vec<f64>,
    direction: SweepDirection,
}

impl OffsetSequence {
    pub fn new(values: Vec<f64>) -> ScanOutcome<Self> {
        if values.is_empty() {
            return Err(ScanError::InvalidOffsetSequence(
                "sequence must contain at least one offset".to_string(),
            ));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ScanError::InvalidOffsetSequence(format!(
                "offset {i} is not finite: {}",
                values[i]
            )));
        }
        let direction = match values.as_slice() {
            [only] if *only < 0.0 => SweepDirection::Decreasing,
            [_] => SweepDirection::Increasing,
            [a, b, ..] if b > a => SweepDirection::Increasing,
            [a, b, ..] if b < a => SweepDirection::Decreasing,
            _ => {
                return Err(ScanError::InvalidOffsetSequence(format!(
                    "offsets 0 and 1 are equal: {}",
                    values[0]
                )))
            }
        };
        for (i, pair) in values.windows(2).enumerate() {
            let ok = match direction {
                SweepDirection::Increasing => pair[1] > pair[0],
                SweepDirection::Decreasing => pair[1] < pair[0],
            };
            if !ok {
                return Err(ScanError::InvalidOffsetSequence(format!(
                    "not strictly monotonic at {}: {} -> {}",
                    i + 1,
                    pair[0],
                    pair[1]
                )));
            }
        }
        Ok(OffsetSequence { values, direction })
    }

    /// `n` evenly spaced offsets from `start` to `stop` inclusive.
    pub fn linspace(start: f64, stop: f64, n: usize) -> ScanOutcome<Self> {
        Self::new(Array1::linspace(start, stop, n).to_vec())
    }

    pub fn from_settings(settings: &ScanSettings) -> ScanOutcome<Self> {
        Self::linspace(
            settings.coord_min(),
            settings.coord_max(),
            settings.coord_points(),
        )
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn direction(&self) -> SweepDirection {
        self.direction
    }

    /// Steps in order; `increment` is the pairwise difference, so the sum
    /// of increments up to step `k` telescopes to `values[k]`.
    pub fn steps(&self) -> impl Iterator<Item = OffsetStep> + '_ {
        let previous = std::iter::once(0.0).chain(self.values.iter().copied());
        self.values
            .iter()
            .zip(previous)
            .enumerate()
            .map(|(index, (&offset, prev))| OffsetStep {
                index,
                offset,
                increment: offset - prev,
            })
    }
}
