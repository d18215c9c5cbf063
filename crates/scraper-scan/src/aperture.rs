// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Aperture
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scraper aperture access and the scoped aperture override.

use scraper_types::constants::{SCRAPER_H, SCRAPER_V};
use scraper_types::error::{ScanError, ScanOutcome};
use scraper_types::model::LatticeModel;
use scraper_types::state::{ApertureConfig, ApertureField};
use std::ops::Deref;

fn first_of_family<M: LatticeModel + ?Sized>(model: &M, family: &str) -> ScanOutcome<usize> {
    model
        .find_elements_by_family(family)
        .first()
        .copied()
        .ok_or_else(|| ScanError::ConfigurationError(format!("family '{family}' not found")))
}

fn read<M: LatticeModel + ?Sized>(
    model: &M,
    element: usize,
    field: ApertureField,
) -> ScanOutcome<f64> {
    model.get_attribute(element, field).ok_or_else(|| {
        ScanError::ConfigurationError(format!("element {element} has no attribute {field}"))
    })
}

/// Current scraper aperture. Only the first element of each family is
/// read; the families are assumed uniform.
pub fn get_aperture<M: LatticeModel + ?Sized>(model: &M) -> ScanOutcome<ApertureConfig> {
    let h = first_of_family(model, SCRAPER_H)?;
    let v = first_of_family(model, SCRAPER_V)?;
    Ok(ApertureConfig {
        h_min: read(model, h, ApertureField::HMin)?,
        h_max: read(model, h, ApertureField::HMax)?,
        v_min: read(model, v, ApertureField::VMin)?,
        v_max: read(model, v, ApertureField::VMax)?,
    })
}

/// Write `cfg` to every scraper element. Horizontal limits go to the
/// horizontal family, vertical limits to the vertical family. `cfg` is
/// not validated here.
pub fn set_aperture<M: LatticeModel + ?Sized>(model: &mut M, cfg: &ApertureConfig) {
    for el in model.find_elements_by_family(SCRAPER_H) {
        model.set_attribute(el, ApertureField::HMin, cfg.h_min);
        model.set_attribute(el, ApertureField::HMax, cfg.h_max);
    }
    for el in model.find_elements_by_family(SCRAPER_V) {
        model.set_attribute(el, ApertureField::VMin, cfg.v_min);
        model.set_attribute(el, ApertureField::VMax, cfg.v_max);
    }
}

/// Exclusive hold on a model whose scraper aperture is temporarily
/// overridden. The snapshot taken on entry is written back on drop, on
/// every exit path including unwinding.
pub struct ApertureGuard<'a, M: LatticeModel + ?Sized> {
    model: &'a mut M,
    saved: ApertureConfig,
}

impl<'a, M: LatticeModel + ?Sized> ApertureGuard<'a, M> {
    /// Snapshot the current aperture, then apply `target`.
    pub fn apply(model: &'a mut M, target: &ApertureConfig) -> ScanOutcome<Self> {
        let saved = get_aperture(&*model)?;
        set_aperture(&mut *model, target);
        tracing::debug!(?saved, ?target, "scraper aperture overridden");
        Ok(ApertureGuard { model, saved })
    }

    pub fn saved(&self) -> ApertureConfig {
        self.saved
    }
}

impl<M: LatticeModel + ?Sized> Deref for ApertureGuard<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        self.model
    }
}

impl<M: LatticeModel + ?Sized> Drop for ApertureGuard<'_, M> {
    fn drop(&mut self) {
        set_aperture(&mut *self.model, &self.saved);
        tracing::debug!(saved = ?self.saved, "scraper aperture restored");
    }
}
