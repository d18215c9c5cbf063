// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Optics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Linear 6D transfer matrices and periodic Twiss functions.
//!
//! Coordinates are `(x, x', y, y', δ, z)`. Planes are uncoupled, so the
//! Twiss parameters follow from the 2×2 diagonal blocks of the one-turn
//! matrix and the horizontal dispersion from its δ column.

use crate::lattice::{Element, ElementKind, Lattice};
use ndarray::{s, Array2};
use scraper_types::constants::N_COORDINATES;
use scraper_types::error::{ScanError, ScanOutcome};
use serde::Serialize;
use std::f64::consts::PI;

/// Below this |det(I - M)| the dispersion fixed point is ill-posed.
const MIN_DISPERSION_DET: f64 = 1e-12;

/// Periodic optics at the entrance of one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Twiss {
    pub beta_x: f64,
    pub alpha_x: f64,
    pub beta_y: f64,
    pub alpha_y: f64,
    pub eta_x: f64,
    pub etap_x: f64,
    /// Fractional tunes in [0, 1).
    pub tune_x: f64,
    pub tune_y: f64,
}

fn drift(length: f64) -> Array2<f64> {
    let mut m = Array2::eye(N_COORDINATES);
    m[[0, 1]] = length;
    m[[2, 3]] = length;
    m
}

fn thin_quad(integrated_k1: f64) -> Array2<f64> {
    let mut m = Array2::eye(N_COORDINATES);
    m[[1, 0]] = -integrated_k1;
    m[[3, 2]] = integrated_k1;
    m
}

fn sector_bend(angle: f64, length: f64) -> Array2<f64> {
    let rho = length / angle;
    let (sn, cs) = angle.sin_cos();
    let mut m = Array2::eye(N_COORDINATES);
    m[[0, 0]] = cs;
    m[[0, 1]] = rho * sn;
    m[[1, 0]] = -sn / rho;
    m[[1, 1]] = cs;
    m[[0, 4]] = rho * (1.0 - cs);
    m[[1, 4]] = sn;
    m[[5, 0]] = -sn;
    m[[5, 1]] = -rho * (1.0 - cs);
    m[[5, 4]] = -(length - rho * sn);
    m[[2, 3]] = length;
    m
}

/// Transfer matrix of a single element.
pub fn element_matrix(element: &Element) -> Array2<f64> {
    match element.kind {
        ElementKind::Marker | ElementKind::Drift | ElementKind::Kicker => drift(element.length),
        ElementKind::Quadrupole { k1 } => {
            let half = drift(0.5 * element.length);
            half.dot(&thin_quad(k1 * element.length)).dot(&half)
        }
        ElementKind::Dipole { angle } => sector_bend(angle, element.length),
    }
}

/// Transfer matrices for every element, in lattice order.
pub fn transfer_matrices(lattice: &Lattice) -> Vec<Array2<f64>> {
    lattice.elements().iter().map(element_matrix).collect()
}

/// One-turn matrix starting at the entrance of element `start`.
pub fn one_turn_matrix(lattice: &Lattice, start: usize) -> ScanOutcome<Array2<f64>> {
    let n = lattice.len();
    if start >= n {
        return Err(ScanError::ConfigurationError(format!(
            "start element {start} outside lattice of {n} elements"
        )));
    }
    let mut m = Array2::eye(N_COORDINATES);
    for k in 0..n {
        let el = &lattice.elements()[(start + k) % n];
        m = element_matrix(el).dot(&m);
    }
    Ok(m)
}

fn plane_twiss(m11: f64, m12: f64, m22: f64, plane: &str) -> ScanOutcome<(f64, f64, f64)> {
    let cos_mu = 0.5 * (m11 + m22);
    if !cos_mu.is_finite() || cos_mu.abs() >= 1.0 {
        return Err(ScanError::PhysicsViolation(format!(
            "{plane} plane unstable: |trace/2| = {:.6} >= 1",
            cos_mu.abs()
        )));
    }
    let sin_mu = m12.signum() * (1.0 - cos_mu * cos_mu).sqrt();
    let beta = m12 / sin_mu;
    let alpha = (m11 - m22) / (2.0 * sin_mu);
    let mu = sin_mu.atan2(cos_mu).rem_euclid(2.0 * PI);
    Ok((beta, alpha, mu / (2.0 * PI)))
}

/// Periodic Twiss parameters at the entrance of element `index`.
pub fn calc_twiss(lattice: &Lattice, index: usize) -> ScanOutcome<Twiss> {
    let m = one_turn_matrix(lattice, index)?;
    let (beta_x, alpha_x, tune_x) =
        plane_twiss(m[[0, 0]], m[[0, 1]], m[[1, 1]], "horizontal")?;
    let (beta_y, alpha_y, tune_y) =
        plane_twiss(m[[2, 2]], m[[2, 3]], m[[3, 3]], "vertical")?;

    // (I - Mx) η = d, with d the δ column of the horizontal block.
    let mx = m.slice(s![0..2, 0..2]);
    let a11 = 1.0 - mx[[0, 0]];
    let a12 = -mx[[0, 1]];
    let a21 = -mx[[1, 0]];
    let a22 = 1.0 - mx[[1, 1]];
    let det = a11 * a22 - a12 * a21;
    if det.abs() < MIN_DISPERSION_DET {
        return Err(ScanError::PhysicsViolation(format!(
            "dispersion undefined on integer tune, det(I - M) = {det:e}"
        )));
    }
    let (d1, d2) = (m[[0, 4]], m[[1, 4]]);
    let eta_x = (a22 * d1 - a12 * d2) / det;
    let etap_x = (a11 * d2 - a21 * d1) / det;

    Ok(Twiss {
        beta_x,
        alpha_x,
        beta_y,
        alpha_y,
        eta_x,
        etap_x,
        tune_x,
        tune_y,
    })
}
