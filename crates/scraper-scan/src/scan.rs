// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Scan Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Offset sweep under a temporarily overridden scraper aperture.
//!
//! Each step adds the next increment to one coordinate of a running copy
//! of the seed bunch, tracks it, classifies losses and folds the result.
//! The saved aperture is restored on every exit path. A tracking
//! failure discards all observations gathered so far.

use crate::aggregate::ResultAggregator;
use crate::aperture::{get_aperture, ApertureGuard};
use crate::classify::classify_losses;
use crate::offsets::OffsetSequence;
use scraper_types::config::ScanSettings;
use scraper_types::error::{ScanError, ScanOutcome, TrackingError};
use scraper_types::model::{ElementRef, LatticeModel, TrackingOracle};
use scraper_types::state::{ApertureConfig, Bunch, Coordinate, ScanResult, TrackingObservation};

/// Validated parameters of one sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPlan {
    turn_count: usize,
    coordinate: Coordinate,
    offsets: OffsetSequence,
    injection_index: ElementRef,
}

impl ScanPlan {
    pub fn new(
        turn_count: usize,
        coordinate_index: usize,
        offsets: Vec<f64>,
        injection_index: ElementRef,
    ) -> ScanOutcome<Self> {
        let coordinate = Coordinate::from_index(coordinate_index)?;
        Self::with_offsets(
            turn_count,
            coordinate,
            OffsetSequence::new(offsets)?,
            injection_index,
        )
    }

    pub fn with_offsets(
        turn_count: usize,
        coordinate: Coordinate,
        offsets: OffsetSequence,
        injection_index: ElementRef,
    ) -> ScanOutcome<Self> {
        if turn_count == 0 {
            return Err(ScanError::InvalidParameter(
                "turn_count must be >= 1".to_string(),
            ));
        }
        Ok(ScanPlan {
            turn_count,
            coordinate,
            offsets,
            injection_index,
        })
    }

    pub fn from_settings(settings: &ScanSettings, injection_index: ElementRef) -> ScanOutcome<Self> {
        Self::with_offsets(
            settings.turn_count(),
            settings.coordinate(),
            OffsetSequence::from_settings(settings)?,
            injection_index,
        )
    }

    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn offsets(&self) -> &OffsetSequence {
        &self.offsets
    }

    pub fn injection_index(&self) -> ElementRef {
        self.injection_index
    }
}

fn check_track_shape(
    loss_turn: &[usize],
    loss_index: &[ElementRef],
    n_particles: usize,
) -> Result<(), TrackingError> {
    if loss_turn.len() != n_particles || loss_index.len() != n_particles {
        return Err(TrackingError::InvalidBunch(format!(
            "oracle returned {} loss turns and {} loss indices for {n_particles} particles",
            loss_turn.len(),
            loss_index.len()
        )));
    }
    Ok(())
}

/// Sweep `bunch` along `plan` with `target_aperture` applied to the
/// scraper families of `model`.
///
/// Inputs are validated before the model is touched. The model is
/// borrowed exclusively for the whole sweep.
pub fn scan<M, O>(
    model: &mut M,
    oracle: &O,
    bunch: &Bunch,
    plan: &ScanPlan,
    target_aperture: &ApertureConfig,
) -> ScanOutcome<ScanResult>
where
    M: LatticeModel + ?Sized,
    O: TrackingOracle<M> + ?Sized,
{
    if bunch.is_empty() {
        return Err(ScanError::InvalidParameter(
            "bunch must contain at least one particle".to_string(),
        ));
    }
    target_aperture.validate()?;

    let coordinate = plan.coordinate();
    let turn_count = plan.turn_count();
    let injection_index = plan.injection_index();
    let n_steps = plan.offsets().len();

    let guard = ApertureGuard::apply(model, target_aperture)?;
    let aperture_used = get_aperture(&*guard)?;
    tracing::info!(
        ?coordinate,
        n_steps,
        turn_count,
        n_particles = bunch.n_particles(),
        saved = ?guard.saved(),
        aperture = ?aperture_used,
        "starting aperture scan"
    );

    let mut working = bunch.clone();
    let mut aggregator = ResultAggregator::new(aperture_used, coordinate);
    for step in plan.offsets().steps() {
        working.shift(coordinate, step.increment);

        let raw = oracle
            .track(&*guard, &working, turn_count, injection_index)
            .and_then(|raw| {
                check_track_shape(&raw.loss_turn, &raw.loss_index, working.n_particles())?;
                Ok(raw)
            })
            .map_err(|source| {
                tracing::warn!(
                    step = step.index,
                    n_steps,
                    error = %source,
                    "tracking failed, aborting scan and restoring aperture"
                );
                ScanError::TrackingFailure {
                    step: step.index,
                    source,
                }
            })?;

        let lost = classify_losses(&raw.loss_turn, &raw.loss_index, turn_count, injection_index);
        let mean_coordinate = working.mean(coordinate);
        tracing::debug!(
            step = step.index,
            offset = step.offset,
            mean_coordinate,
            n_lost = lost.len(),
            "scan step"
        );
        aggregator.record(TrackingObservation {
            step: step.index,
            requested_offset: step.offset,
            mean_coordinate,
            loss_turns: lost.turns,
            loss_indices: lost.indices,
        });
    }
    drop(guard);

    let result = aggregator.finish();
    tracing::info!(
        steps_with_loss = result.len(),
        total_lost = result.total_lost(),
        "aperture scan finished"
    );
    Ok(result)
}
