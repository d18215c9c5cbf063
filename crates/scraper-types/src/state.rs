// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::N_COORDINATES;
use crate::error::{ScanError, ScanOutcome};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase-space coordinate selector, row index into a [`Bunch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum Coordinate {
    X,
    Xp,
    Y,
    Yp,
    Delta,
    Z,
}

impl Coordinate {
    pub const ALL: [Coordinate; N_COORDINATES] = [
        Coordinate::X,
        Coordinate::Xp,
        Coordinate::Y,
        Coordinate::Yp,
        Coordinate::Delta,
        Coordinate::Z,
    ];

    pub fn index(self) -> usize {
        match self {
            Coordinate::X => 0,
            Coordinate::Xp => 1,
            Coordinate::Y => 2,
            Coordinate::Yp => 3,
            Coordinate::Delta => 4,
            Coordinate::Z => 5,
        }
    }

    pub fn from_index(index: usize) -> ScanOutcome<Self> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            ScanError::InvalidParameter(format!(
                "coordinate index must be in 0..{N_COORDINATES}, got {index}"
            ))
        })
    }
}

impl TryFrom<usize> for Coordinate {
    type Error = ScanError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Coordinate::from_index(index)
    }
}

impl From<Coordinate> for usize {
    fn from(c: Coordinate) -> usize {
        c.index()
    }
}

/// One of the four aperture limits carried by a lattice element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApertureField {
    HMin,
    HMax,
    VMin,
    VMax,
}

impl fmt::Display for ApertureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApertureField::HMin => "hmin",
            ApertureField::HMax => "hmax",
            ApertureField::VMin => "vmin",
            ApertureField::VMax => "vmax",
        };
        f.write_str(name)
    }
}

/// Rectangular scraper aperture [m].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApertureConfig {
    pub h_min: f64,
    pub h_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

impl ApertureConfig {
    pub fn new(h_min: f64, h_max: f64, v_min: f64, v_max: f64) -> Self {
        ApertureConfig {
            h_min,
            h_max,
            v_min,
            v_max,
        }
    }

    /// Aperture centred on the reference orbit.
    pub fn symmetric(half_width: f64, half_height: f64) -> Self {
        Self::new(-half_width, half_width, -half_height, half_height)
    }

    pub fn get(&self, field: ApertureField) -> f64 {
        match field {
            ApertureField::HMin => self.h_min,
            ApertureField::HMax => self.h_max,
            ApertureField::VMin => self.v_min,
            ApertureField::VMax => self.v_max,
        }
    }

    /// `[h_min, h_max, v_min, v_max]`.
    pub fn as_array(&self) -> [f64; 4] {
        [self.h_min, self.h_max, self.v_min, self.v_max]
    }

    /// Check finiteness and `min < max` in both planes.
    pub fn validate(&self) -> ScanOutcome<()> {
        if self.as_array().iter().any(|v| !v.is_finite()) {
            return Err(ScanError::InvalidAperture(format!(
                "aperture limits must be finite, got {:?}",
                self.as_array()
            )));
        }
        if self.h_min >= self.h_max {
            return Err(ScanError::InvalidAperture(format!(
                "h_min must be < h_max, got h_min={}, h_max={}",
                self.h_min, self.h_max
            )));
        }
        if self.v_min >= self.v_max {
            return Err(ScanError::InvalidAperture(format!(
                "v_min must be < v_max, got v_min={}, v_max={}",
                self.v_min, self.v_max
            )));
        }
        Ok(())
    }

    /// Whether a transverse position `(x, y)` lies inside the aperture.
    /// Points exactly on a limit are inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.h_min && x <= self.h_max && y >= self.v_min && y <= self.v_max
    }
}

/// Particle ensemble stored as `[6, n_particles]`, one row per coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Bunch {
    coords: Array2<f64>,
}

impl Bunch {
    pub fn from_array(coords: Array2<f64>) -> ScanOutcome<Self> {
        if coords.nrows() != N_COORDINATES {
            return Err(ScanError::InvalidParameter(format!(
                "bunch must have {N_COORDINATES} coordinate rows, got {}",
                coords.nrows()
            )));
        }
        Ok(Bunch { coords })
    }

    /// Build from per-particle state vectors.
    pub fn from_particles(particles: &[[f64; N_COORDINATES]]) -> Self {
        let mut coords = Array2::zeros((N_COORDINATES, particles.len()));
        for (ip, p) in particles.iter().enumerate() {
            for (ic, v) in p.iter().enumerate() {
                coords[[ic, ip]] = *v;
            }
        }
        Bunch { coords }
    }

    pub fn zeros(n_particles: usize) -> Self {
        Bunch {
            coords: Array2::zeros((N_COORDINATES, n_particles)),
        }
    }

    pub fn n_particles(&self) -> usize {
        self.coords.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.ncols() == 0
    }

    pub fn coords(&self) -> &Array2<f64> {
        &self.coords
    }

    pub fn coordinate(&self, c: Coordinate) -> ArrayView1<'_, f64> {
        self.coords.row(c.index())
    }

    pub fn particle(&self, i: usize) -> [f64; N_COORDINATES] {
        let mut out = [0.0; N_COORDINATES];
        for (ic, v) in out.iter_mut().enumerate() {
            *v = self.coords[[ic, i]];
        }
        out
    }

    pub fn set_particle(&mut self, i: usize, state: &[f64; N_COORDINATES]) {
        for (ic, v) in state.iter().enumerate() {
            self.coords[[ic, i]] = *v;
        }
    }

    /// Mean of one coordinate over all particles; 0 for an empty bunch.
    pub fn mean(&self, c: Coordinate) -> f64 {
        self.coordinate(c).mean().unwrap_or(0.0)
    }

    /// Add `delta` to coordinate `c` of every particle.
    pub fn shift(&mut self, c: Coordinate, delta: f64) {
        self.coords.row_mut(c.index()).mapv_inplace(|v| v + delta);
    }

    /// Add a fixed state vector to every particle.
    pub fn translate(&mut self, offset: &[f64; N_COORDINATES]) {
        for (ic, d) in offset.iter().enumerate() {
            self.coords.row_mut(ic).mapv_inplace(|v| v + d);
        }
    }

    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|v| v.is_finite())
    }
}

/// Raw per-particle output of one tracking call.
///
/// Particles that survive every turn report `(turn_count, injection_index)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackResult {
    pub final_states: Bunch,
    pub loss_turn: Vec<usize>,
    pub loss_index: Vec<usize>,
}

/// Classified losses of one offset step.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingObservation {
    pub step: usize,
    pub requested_offset: f64,
    pub mean_coordinate: f64,
    pub loss_turns: Vec<usize>,
    pub loss_indices: Vec<usize>,
}

impl TrackingObservation {
    pub fn loss_count(&self) -> usize {
        self.loss_turns.len()
    }
}

/// Loss statistics of one aperture scan, restricted to steps with at least
/// one lost particle.
///
/// `offsets` is the achieved bunch mean along the scanned coordinate and
/// therefore equals `mean_coordinates`; `requested_offsets` keeps the
/// nominal cumulative offset of the same steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub aperture_used: ApertureConfig,
    pub coordinate: Coordinate,
    pub offsets: Vec<f64>,
    pub loss_counts: Vec<usize>,
    pub mean_coordinates: Vec<f64>,
    pub loss_turns: Vec<Vec<usize>>,
    pub loss_indices: Vec<Vec<usize>>,
    pub requested_offsets: Vec<f64>,
    pub steps: Vec<usize>,
}

impl ScanResult {
    /// Number of offset steps with at least one loss.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn total_lost(&self) -> usize {
        self.loss_counts.iter().sum()
    }
}
