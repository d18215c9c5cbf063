// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Aggregate
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Folding per-step observations into a [`ScanResult`].

use scraper_types::state::{ApertureConfig, Coordinate, ScanResult, TrackingObservation};

/// Running fold of observations. Steps without losses contribute nothing.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    result: ScanResult,
}

impl ResultAggregator {
    pub fn new(aperture_used: ApertureConfig, coordinate: Coordinate) -> Self {
        ResultAggregator {
            result: ScanResult {
                aperture_used,
                coordinate,
                offsets: Vec::new(),
                loss_counts: Vec::new(),
                mean_coordinates: Vec::new(),
                loss_turns: Vec::new(),
                loss_indices: Vec::new(),
                requested_offsets: Vec::new(),
                steps: Vec::new(),
            },
        }
    }

    pub fn record(&mut self, obs: TrackingObservation) {
        if obs.loss_count() == 0 {
            return;
        }
        let r = &mut self.result;
        // The reported offset axis is the achieved bunch mean.
        r.offsets.push(obs.mean_coordinate);
        r.mean_coordinates.push(obs.mean_coordinate);
        r.loss_counts.push(obs.loss_count());
        r.requested_offsets.push(obs.requested_offset);
        r.steps.push(obs.step);
        r.loss_turns.push(obs.loss_turns);
        r.loss_indices.push(obs.loss_indices);
    }

    pub fn finish(self) -> ScanResult {
        self.result
    }
}

/// Aggregate a complete list of observations in order.
pub fn aggregate<I>(aperture_used: ApertureConfig, coordinate: Coordinate, observations: I) -> ScanResult
where
    I: IntoIterator<Item = TrackingObservation>,
{
    let mut agg = ResultAggregator::new(aperture_used, coordinate);
    for obs in observations {
        agg.record(obs);
    }
    agg.finish()
}
