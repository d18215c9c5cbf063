// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — End-to-End Scan Scenarios
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Full sweeps on the reference ring with the linear tracker.

use rand::rngs::StdRng;
use rand::SeedableRng;
use scraper_lattice::beam::{generate_bunch, EquilibriumParams};
use scraper_lattice::lattice::Lattice;
use scraper_lattice::optics::calc_twiss;
use scraper_lattice::ring::storage_ring;
use scraper_lattice::tracking::LinearTracker;
use scraper_scan::aperture::get_aperture;
use scraper_scan::report::{plot_series, summarize};
use scraper_scan::scan::{scan, ScanPlan};
use scraper_types::constants::DEFAULT_INJECTION_POSITION;
use scraper_types::error::{ScanError, TrackingError};
use scraper_types::model::{ElementRef, TrackingOracle};
use scraper_types::state::{ApertureConfig, Bunch, TrackResult};
use std::cell::Cell;

fn injected_bunch(ring: &Lattice, n: usize, seed: u64) -> Bunch {
    let inj = ring.injection_index().unwrap();
    let twiss = calc_twiss(ring, inj).unwrap();
    let params = EquilibriumParams::from_coupling(3.5e-9, 0.01, 8.7e-4, 0.012).unwrap();
    let mut bunch = generate_bunch(n, &params, &twiss, &mut StdRng::seed_from_u64(seed)).unwrap();
    bunch.translate(&DEFAULT_INJECTION_POSITION);
    bunch
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    ndarray::Array1::linspace(start, stop, n).to_vec()
}

/// Linear tracker that diverges on a chosen call.
struct DivergingTracker {
    fail_at: usize,
    calls: Cell<usize>,
}

impl TrackingOracle<Lattice> for DivergingTracker {
    fn track(
        &self,
        model: &Lattice,
        bunch: &Bunch,
        turn_count: usize,
        injection_index: ElementRef,
    ) -> Result<TrackResult, TrackingError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call == self.fail_at {
            return Err(TrackingError::NumericalDivergence {
                particle: 0,
                turn: turn_count / 2,
                element: injection_index,
            });
        }
        LinearTracker::new().track(model, bunch, turn_count, injection_index)
    }
}

#[test]
fn end_to_end_nominal_aperture_sweep() {
    let mut ring = storage_ring().unwrap();
    let inj = ring.injection_index().unwrap();
    let bunch = injected_bunch(&ring, 10, 2026);
    let before = get_aperture(&ring).unwrap();
    let nominal = ApertureConfig::new(-0.012, 0.012, before.v_min, before.v_max);

    let plan = ScanPlan::new(10, 0, linspace(0.0, 0.02, 200), inj).unwrap();
    let res = scan(&mut ring, &LinearTracker::new(), &bunch, &plan, &nominal).unwrap();

    assert_eq!(get_aperture(&ring).unwrap(), before);
    assert!(!res.is_empty(), "pushing the bunch to +12 mm must lose particles");
    assert!(res.loss_counts.iter().all(|c| *c >= 1 && *c <= 10));

    let last_mean = *res.mean_coordinates.last().unwrap();
    assert!((0.0..=0.02).contains(&last_mean), "last mean {last_mean}");
    for w in res.requested_offsets.windows(2) {
        assert!(w[1] > w[0]);
    }

    // Losses grow with offset: the later half of lossy steps loses at
    // least as many particles as the earlier half.
    let half = res.len() / 2;
    let early: usize = res.loss_counts[..half].iter().sum();
    let late: usize = res.loss_counts[half..].iter().sum();
    assert!(late >= early, "early {early}, late {late}");

    for (turns, indices) in res.loss_turns.iter().zip(&res.loss_indices) {
        assert_eq!(turns.len(), indices.len());
        for (t, e) in turns.iter().zip(indices) {
            assert!(*t < 10);
            assert!(*e < ring.len());
        }
    }

    let series = plot_series(&res, &ring.find_spos()).unwrap();
    assert_eq!(series.loss_position.len(), res.total_lost());
    assert_eq!(summarize(&res).total_lost, res.total_lost());
}

#[test]
fn failure_at_step_three_restores_aperture() {
    let mut ring = storage_ring().unwrap();
    let inj = ring.injection_index().unwrap();
    let bunch = injected_bunch(&ring, 10, 5);
    let before = get_aperture(&ring).unwrap();
    let tracker = DivergingTracker {
        fail_at: 3,
        calls: Cell::new(0),
    };

    let plan = ScanPlan::new(10, 0, linspace(0.0, 0.02, 10), inj).unwrap();
    let err = scan(
        &mut ring,
        &tracker,
        &bunch,
        &plan,
        &ApertureConfig::symmetric(0.003, 0.001),
    )
    .unwrap_err();

    assert!(matches!(err, ScanError::TrackingFailure { step: 3, .. }));
    assert_eq!(tracker.calls.get(), 4);
    assert_eq!(get_aperture(&ring).unwrap(), before);
}

#[test]
fn noop_target_aperture_matches_untouched_scan() {
    let mut ring = storage_ring().unwrap();
    let inj = ring.injection_index().unwrap();
    let bunch = injected_bunch(&ring, 10, 77);
    let saved = get_aperture(&ring).unwrap();
    let plan = ScanPlan::new(5, 0, linspace(0.0, 0.02, 40), inj).unwrap();

    let a = scan(&mut ring, &LinearTracker::new(), &bunch, &plan, &saved).unwrap();
    let b = scan(&mut ring, &LinearTracker::new(), &bunch, &plan, &saved).unwrap();
    assert_eq!(a, b);
    assert_eq!(get_aperture(&ring).unwrap(), saved);
}

#[test]
fn narrower_scraper_never_loses_fewer() {
    let mut ring = storage_ring().unwrap();
    let inj = ring.injection_index().unwrap();
    let bunch = injected_bunch(&ring, 10, 9);
    let nominal = get_aperture(&ring).unwrap();
    let plan = ScanPlan::new(5, 0, linspace(0.0, 0.02, 50), inj).unwrap();

    let wide = scan(&mut ring, &LinearTracker::new(), &bunch, &plan, &nominal).unwrap();
    let narrow = scan(
        &mut ring,
        &LinearTracker::new(),
        &bunch,
        &plan,
        &ApertureConfig::new(-0.006, 0.006, nominal.v_min, nominal.v_max),
    )
    .unwrap();

    for (i, step) in wide.steps.iter().enumerate() {
        let j = narrow
            .steps
            .iter()
            .position(|s| s == step)
            .expect("every lossy nominal step is lossy under the scraper");
        assert!(narrow.loss_counts[j] >= wide.loss_counts[i]);
    }
}
