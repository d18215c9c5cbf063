// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Property-Based Tests (proptest) for scraper-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for scraper-types using proptest.
//!
//! Covers: aperture validation, bunch shift/mean bookkeeping,
//! scan settings construction.

use proptest::prelude::*;
use scraper_types::config::ScanSettings;
use scraper_types::state::{ApertureConfig, Bunch, Coordinate};

// ── Aperture Invariants ──────────────────────────────────────────────

proptest! {
    /// Any symmetric aperture with positive half sizes is valid and contains the origin.
    #[test]
    fn symmetric_aperture_valid(w in 1e-6f64..0.1, h in 1e-6f64..0.1) {
        let ap = ApertureConfig::symmetric(w, h);
        prop_assert!(ap.validate().is_ok());
        prop_assert!(ap.contains(0.0, 0.0));
        prop_assert!(!ap.contains(w * 1.01, 0.0));
    }

    /// Swapping the horizontal limits always invalidates the aperture.
    #[test]
    fn inverted_aperture_invalid(w in 1e-6f64..0.1, h in 1e-6f64..0.1) {
        let ap = ApertureConfig::new(w, -w, -h, h);
        prop_assert!(ap.validate().is_err());
    }
}

// ── Bunch Bookkeeping ────────────────────────────────────────────────

proptest! {
    /// Shifting one coordinate moves its mean by exactly the shift and
    /// leaves the other coordinates untouched.
    #[test]
    fn shift_moves_only_selected_mean(
        values in prop::collection::vec(-0.01f64..0.01, 1..40),
        delta in -0.02f64..0.02,
        idx in 0usize..6,
    ) {
        let particles: Vec<[f64; 6]> = values.iter().map(|v| [*v, -*v, *v, 0.5 * v, 0.0, *v]).collect();
        let mut bunch = Bunch::from_particles(&particles);
        let coord = Coordinate::from_index(idx).unwrap();
        let before: Vec<f64> = Coordinate::ALL.iter().map(|c| bunch.mean(*c)).collect();
        bunch.shift(coord, delta);
        for c in Coordinate::ALL {
            let expected = if c == coord { before[c.index()] + delta } else { before[c.index()] };
            prop_assert!((bunch.mean(c) - expected).abs() < 1e-12);
        }
    }
}

// ── Scan Settings ────────────────────────────────────────────────────

proptest! {
    /// Valid parameter combinations are accepted and read back unchanged.
    #[test]
    fn scan_settings_accept_valid(
        turns in 1usize..1000,
        idx in 0usize..6,
        lo in -0.05f64..-0.001,
        hi in 0.001f64..0.05,
        n in 2usize..500,
    ) {
        let coord = Coordinate::from_index(idx).unwrap();
        let s = ScanSettings::new(turns, coord, lo, hi, n).unwrap();
        prop_assert_eq!(s.turn_count(), turns);
        prop_assert_eq!(s.coordinate(), coord);
        prop_assert_eq!(s.coord_points(), n);
        prop_assert_eq!(s.coord_min(), lo);
        prop_assert_eq!(s.coord_max(), hi);
    }
}
