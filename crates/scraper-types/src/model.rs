// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Model Traits
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Collaborator contracts: the lattice model that carries the scraper
//! apertures and the tracking oracle that transports a bunch through it.

use crate::error::TrackingError;
use crate::state::{ApertureField, Bunch, TrackResult};

/// Element handle: position of the element in the lattice.
pub type ElementRef = usize;

/// Lattice model exposing per-element aperture attributes.
pub trait LatticeModel {
    /// All elements whose family name equals `family`, in lattice order.
    fn find_elements_by_family(&self, family: &str) -> Vec<ElementRef>;

    /// Read one aperture limit. `None` if `element` is out of range.
    fn get_attribute(&self, element: ElementRef, field: ApertureField) -> Option<f64>;

    /// Write one aperture limit. Out-of-range elements are ignored.
    fn set_attribute(&mut self, element: ElementRef, field: ApertureField, value: f64);
}

/// Multi-turn tracking contract.
///
/// A call is atomic and blocking. Survivors report the sentinel
/// `(turn_count, injection_index)` in `loss_turn`/`loss_index`.
pub trait TrackingOracle<M: ?Sized> {
    fn track(
        &self,
        model: &M,
        bunch: &Bunch,
        turn_count: usize,
        injection_index: ElementRef,
    ) -> Result<TrackResult, TrackingError>;
}

impl<M: ?Sized, T: TrackingOracle<M> + ?Sized> TrackingOracle<M> for &T {
    fn track(
        &self,
        model: &M,
        bunch: &Bunch,
        turn_count: usize,
        injection_index: ElementRef,
    ) -> Result<TrackResult, TrackingError> {
        (**self).track(model, bunch, turn_count, injection_index)
    }
}
