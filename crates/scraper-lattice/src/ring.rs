// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Reference Ring
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reference 3 GeV FODO storage ring with injection kicker and scrapers.
//!
//! Injection sits at the entrance of the first focusing quadrupole, where
//! the horizontal beta function peaks. The horizontal scraper family
//! (`SHVC`) sits in front of a focusing quadrupole, the vertical one
//! (`SVVC`) in front of a defocusing quadrupole.

use crate::lattice::{Element, ElementKind, Lattice};
use scraper_types::constants::{
    INJECTION_KICKER, NOMINAL_HALF_HEIGHT, NOMINAL_HALF_WIDTH, SCRAPER_H, SCRAPER_V,
};
use scraper_types::error::ScanOutcome;
use scraper_types::state::ApertureConfig;
use std::f64::consts::PI;

const N_CELLS: usize = 40;
const ENERGY_EV: f64 = 3.0e9;

const QUAD_LENGTH: f64 = 0.3;
const QUAD_K1: f64 = 0.85;
const DRIFT_LENGTH: f64 = 1.0;
const BEND_LENGTH: f64 = 2.0;

/// Chamber half apertures away from the scrapers [m].
const CHAMBER_HALF_WIDTH: f64 = 0.012;
const CHAMBER_HALF_HEIGHT: f64 = 0.004;

const SCRAPER_H_CELL: usize = 7;
const SCRAPER_V_CELL: usize = 8;

/// Build the reference ring.
pub fn storage_ring() -> ScanOutcome<Lattice> {
    let chamber = ApertureConfig::symmetric(CHAMBER_HALF_WIDTH, CHAMBER_HALF_HEIGHT);
    let scraper = ApertureConfig::symmetric(NOMINAL_HALF_WIDTH, NOMINAL_HALF_HEIGHT);
    let bend_angle = 2.0 * PI / (2 * N_CELLS) as f64;

    let drift = || Element::new("D", ElementKind::Drift, DRIFT_LENGTH, chamber);
    let bend = || Element::new("B", ElementKind::Dipole { angle: bend_angle }, BEND_LENGTH, chamber);

    let mut elements = Vec::with_capacity(N_CELLS * 9 + 3);
    for cell in 0..N_CELLS {
        if cell == 0 {
            elements.push(Element::new(INJECTION_KICKER, ElementKind::Kicker, 0.0, chamber));
        }
        if cell == SCRAPER_H_CELL {
            elements.push(Element::new(SCRAPER_H, ElementKind::Marker, 0.0, scraper));
        }
        elements.push(Element::new(
            "QF",
            ElementKind::Quadrupole { k1: QUAD_K1 },
            QUAD_LENGTH,
            chamber,
        ));
        elements.push(drift());
        elements.push(bend());
        elements.push(drift());
        if cell == SCRAPER_V_CELL {
            elements.push(Element::new(SCRAPER_V, ElementKind::Marker, 0.0, scraper));
        }
        elements.push(Element::new(
            "QD",
            ElementKind::Quadrupole { k1: -QUAD_K1 },
            QUAD_LENGTH,
            chamber,
        ));
        elements.push(drift());
        elements.push(bend());
        elements.push(drift());
    }

    Lattice::new("fodo-ring", ENERGY_EV, elements)
}
