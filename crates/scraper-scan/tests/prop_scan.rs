// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Property-Based Tests (proptest) for scraper-scan
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for scraper-scan using proptest.
//!
//! Covers: loss classification, offset increments, aggregation filtering,
//! aperture restoration over random targets.

use proptest::prelude::*;
use scraper_lattice::ring::storage_ring;
use scraper_lattice::tracking::LinearTracker;
use scraper_scan::aggregate::aggregate;
use scraper_scan::aperture::get_aperture;
use scraper_scan::classify::{classify_losses, is_survivor};
use scraper_scan::offsets::OffsetSequence;
use scraper_scan::scan::{scan, ScanPlan};
use scraper_types::state::{ApertureConfig, Bunch, Coordinate, TrackingObservation};

// ── Loss Classification ──────────────────────────────────────────────

proptest! {
    /// Classified losses are exactly the non-sentinel particles, in order.
    #[test]
    fn classifier_keeps_exactly_non_sentinels(
        pairs in prop::collection::vec((0usize..12, 0usize..8), 0..60),
        turn_count in 1usize..12,
        injection in 0usize..8,
    ) {
        let turns: Vec<usize> = pairs.iter().map(|p| p.0).collect();
        let indices: Vec<usize> = pairs.iter().map(|p| p.1).collect();
        let lost = classify_losses(&turns, &indices, turn_count, injection);

        let expected: Vec<(usize, usize)> = pairs
            .iter()
            .copied()
            .filter(|(t, e)| !is_survivor(*t, *e, turn_count, injection))
            .collect();
        let got: Vec<(usize, usize)> = lost.turns.iter().copied().zip(lost.indices.iter().copied()).collect();
        prop_assert_eq!(got, expected);
        prop_assert!(lost.turns.iter().zip(&lost.indices).all(|(t, e)| !(*t == turn_count && *e == injection)));
    }
}

// ── Offset Increments ────────────────────────────────────────────────

proptest! {
    /// Running sums of the increments reproduce every offset.
    #[test]
    fn increments_telescope(
        start in -0.05f64..0.05,
        span in 0.001f64..0.05,
        n in 1usize..300,
        negative in any::<bool>(),
    ) {
        let stop = if negative { start - span } else { start + span };
        let seq = OffsetSequence::linspace(start, stop, n).unwrap();
        let mut acc = 0.0;
        for step in seq.steps() {
            acc += step.increment;
            prop_assert!((acc - step.offset).abs() < 1e-12);
            prop_assert_eq!(step.offset, seq.values()[step.index]);
        }
    }
}

// ── Aggregation ──────────────────────────────────────────────────────

proptest! {
    /// Output length equals the number of lossy observations and parallel
    /// sequences stay aligned.
    #[test]
    fn aggregation_drops_only_lossless_steps(counts in prop::collection::vec(0usize..5, 0..40)) {
        let observations: Vec<TrackingObservation> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| TrackingObservation {
                step: i,
                requested_offset: i as f64,
                mean_coordinate: i as f64 * 0.5,
                loss_turns: vec![1; *c],
                loss_indices: vec![2; *c],
            })
            .collect();
        let res = aggregate(ApertureConfig::symmetric(0.01, 0.01), Coordinate::X, observations);
        let lossy: Vec<usize> = counts.iter().enumerate().filter(|(_, c)| **c > 0).map(|(i, _)| i).collect();
        prop_assert_eq!(&res.steps, &lossy);
        prop_assert_eq!(res.loss_counts.len(), lossy.len());
        prop_assert_eq!(res.loss_turns.len(), lossy.len());
        prop_assert_eq!(res.loss_indices.len(), lossy.len());
        prop_assert_eq!(res.mean_coordinates.len(), lossy.len());
        for (k, step) in lossy.iter().enumerate() {
            prop_assert_eq!(res.loss_counts[k], counts[*step]);
            prop_assert_eq!(res.offsets[k], *step as f64 * 0.5);
        }
    }
}

// ── Aperture Restoration ─────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Whatever scraper setting is scanned, the ring comes back unchanged.
    #[test]
    fn scan_restores_aperture(
        half_w in 0.001f64..0.02,
        half_h in 0.0005f64..0.005,
        shift_x in -0.001f64..0.001,
    ) {
        let mut ring = storage_ring().unwrap();
        let inj = ring.injection_index().unwrap();
        let before = get_aperture(&ring).unwrap();
        let target = ApertureConfig::new(-half_w + shift_x, half_w + shift_x, -half_h, half_h);
        let mut bunch = Bunch::zeros(4);
        bunch.shift(Coordinate::X, -0.002);
        let plan = ScanPlan::new(2, 0, vec![0.0, 0.005, 0.01], inj).unwrap();
        let res = scan(&mut ring, &LinearTracker::new(), &bunch, &plan, &target).unwrap();
        prop_assert_eq!(get_aperture(&ring).unwrap(), before);
        prop_assert_eq!(res.aperture_used, target);
    }
}
