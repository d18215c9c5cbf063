// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Lattice
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reference storage-ring collaborators for the scraper study.
//!
//! Lattice model with per-element vacuum chamber, linear optics,
//! element-by-element tracking oracle and equilibrium bunch generation.

pub mod beam;
pub mod lattice;
pub mod optics;
pub mod ring;
pub mod tracking;
