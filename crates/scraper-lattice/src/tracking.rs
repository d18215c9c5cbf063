// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Tracking
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Element-by-element linear tracking with rectangular aperture checks.
//!
//! Tracking starts at the entrance of the injection element and every
//! turn visits the ring in order from there. A particle is lost at the
//! first element whose chamber it leaves, checked at the element exit.

use crate::lattice::Lattice;
use crate::optics::transfer_matrices;
use scraper_types::constants::N_COORDINATES;
use scraper_types::error::TrackingError;
use scraper_types::model::{ElementRef, TrackingOracle};
use scraper_types::state::{ApertureConfig, Bunch, TrackResult};

type Map6 = [[f64; N_COORDINATES]; N_COORDINATES];

/// Linear tracking oracle for [`Lattice`]. Lost particles come back with
/// NaN final coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTracker;

impl LinearTracker {
    pub fn new() -> Self {
        LinearTracker
    }
}

fn apply(map: &Map6, state: &[f64; N_COORDINATES]) -> [f64; N_COORDINATES] {
    let mut out = [0.0; N_COORDINATES];
    for (i, row) in map.iter().enumerate() {
        out[i] = row.iter().zip(state.iter()).map(|(m, s)| m * s).sum();
    }
    out
}

fn lattice_maps(lattice: &Lattice) -> Vec<Map6> {
    transfer_matrices(lattice)
        .iter()
        .map(|m| {
            let mut map = [[0.0; N_COORDINATES]; N_COORDINATES];
            for (i, row) in map.iter_mut().enumerate() {
                for (j, v) in row.iter_mut().enumerate() {
                    *v = m[[i, j]];
                }
            }
            map
        })
        .collect()
}

impl TrackingOracle<Lattice> for LinearTracker {
    fn track(
        &self,
        model: &Lattice,
        bunch: &Bunch,
        turn_count: usize,
        injection_index: ElementRef,
    ) -> Result<TrackResult, TrackingError> {
        let n_elements = model.len();
        if injection_index >= n_elements {
            return Err(TrackingError::InjectionOutOfRange {
                index: injection_index,
                len: n_elements,
            });
        }
        if bunch.is_empty() {
            return Err(TrackingError::InvalidBunch(
                "bunch has no particles".to_string(),
            ));
        }
        for ip in 0..bunch.n_particles() {
            if bunch.particle(ip).iter().any(|v| !v.is_finite()) {
                return Err(TrackingError::NumericalDivergence {
                    particle: ip,
                    turn: 0,
                    element: injection_index,
                });
            }
        }

        let maps = lattice_maps(model);
        let chambers: Vec<ApertureConfig> = model.elements().iter().map(|e| e.chamber()).collect();

        let n_particles = bunch.n_particles();
        let mut final_states = bunch.clone();
        let mut loss_turn = vec![turn_count; n_particles];
        let mut loss_index = vec![injection_index; n_particles];

        for ip in 0..n_particles {
            let mut state = bunch.particle(ip);
            let mut lost = false;
            'turns: for turn in 0..turn_count {
                for k in 0..n_elements {
                    let ie = (injection_index + k) % n_elements;
                    state = apply(&maps[ie], &state);
                    let inside = state.iter().all(|v| v.is_finite())
                        && chambers[ie].contains(state[0], state[2]);
                    if !inside {
                        loss_turn[ip] = turn;
                        loss_index[ip] = ie;
                        lost = true;
                        break 'turns;
                    }
                }
            }
            if lost {
                state = [f64::NAN; N_COORDINATES];
            }
            final_states.set_particle(ip, &state);
        }

        tracing::trace!(
            n_particles,
            turn_count,
            injection_index,
            n_lost = loss_turn.iter().filter(|t| **t < turn_count).count(),
            "tracked bunch"
        );

        Ok(TrackResult {
            final_states,
            loss_turn,
            loss_index,
        })
    }
}
