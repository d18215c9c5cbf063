// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Scan
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Aperture scan and loss classification engine.
//!
//! Drives offset sweeps of an injected bunch through a lattice with a
//! temporarily narrowed scraper aperture and collects per-offset loss
//! statistics.

pub mod aggregate;
pub mod aperture;
pub mod classify;
pub mod logging;
pub mod offsets;
pub mod report;
pub mod scan;
pub mod study;
