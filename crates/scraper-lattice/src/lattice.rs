// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Lattice
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Element sequence with rectangular vacuum chamber limits.

use scraper_types::constants::INJECTION_KICKER;
use scraper_types::error::{ScanError, ScanOutcome};
use scraper_types::model::{ElementRef, LatticeModel};
use scraper_types::state::{ApertureConfig, ApertureField};
use serde::{Deserialize, Serialize};

/// Linear element families understood by the optics and tracking code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Marker,
    Drift,
    /// Quadrupole of integrated strength `k1 * length`, applied as a thin
    /// kick between two half drifts. Positive `k1` focuses horizontally.
    Quadrupole {
        k1: f64,
    },
    /// Horizontal sector bend.
    Dipole {
        angle: f64,
    },
    /// Pulsed kicker, inactive during stored-beam tracking.
    Kicker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub fam_name: String,
    pub kind: ElementKind,
    pub length: f64,
    pub hmin: f64,
    pub hmax: f64,
    pub vmin: f64,
    pub vmax: f64,
}

impl Element {
    pub fn new(fam_name: &str, kind: ElementKind, length: f64, chamber: ApertureConfig) -> Self {
        Element {
            fam_name: fam_name.to_string(),
            kind,
            length,
            hmin: chamber.h_min,
            hmax: chamber.h_max,
            vmin: chamber.v_min,
            vmax: chamber.v_max,
        }
    }

    pub fn chamber(&self) -> ApertureConfig {
        ApertureConfig::new(self.hmin, self.hmax, self.vmin, self.vmax)
    }

    fn field(&self, field: ApertureField) -> f64 {
        match field {
            ApertureField::HMin => self.hmin,
            ApertureField::HMax => self.hmax,
            ApertureField::VMin => self.vmin,
            ApertureField::VMax => self.vmax,
        }
    }

    fn field_mut(&mut self, field: ApertureField) -> &mut f64 {
        match field {
            ApertureField::HMin => &mut self.hmin,
            ApertureField::HMax => &mut self.hmax,
            ApertureField::VMin => &mut self.vmin,
            ApertureField::VMax => &mut self.vmax,
        }
    }
}

/// Closed ring of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    pub name: String,
    /// Beam energy [eV].
    pub energy_ev: f64,
    elements: Vec<Element>,
}

impl Lattice {
    pub fn new(name: &str, energy_ev: f64, elements: Vec<Element>) -> ScanOutcome<Self> {
        if elements.is_empty() {
            return Err(ScanError::ConfigurationError(format!(
                "lattice '{name}' must contain at least one element"
            )));
        }
        if !energy_ev.is_finite() || energy_ev <= 0.0 {
            return Err(ScanError::ConfigurationError(format!(
                "energy_ev must be finite and > 0, got {energy_ev}"
            )));
        }
        for (i, el) in elements.iter().enumerate() {
            if !el.length.is_finite() || el.length < 0.0 {
                return Err(ScanError::ConfigurationError(format!(
                    "element {i} ({}) length must be finite and >= 0, got {}",
                    el.fam_name, el.length
                )));
            }
            if let ElementKind::Dipole { angle } = el.kind {
                if !angle.is_finite() || angle == 0.0 || el.length <= 0.0 {
                    return Err(ScanError::ConfigurationError(format!(
                        "dipole {i} ({}) needs finite non-zero angle and length > 0",
                        el.fam_name
                    )));
                }
            }
        }
        Ok(Lattice {
            name: name.to_string(),
            energy_ev,
            elements,
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, index: ElementRef) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Circumference [m].
    pub fn length(&self) -> f64 {
        self.elements.iter().map(|e| e.length).sum()
    }

    /// Longitudinal position of every element entrance plus the closing
    /// point, `len() + 1` entries.
    pub fn find_spos(&self) -> Vec<f64> {
        let mut spos = Vec::with_capacity(self.elements.len() + 1);
        let mut s = 0.0;
        spos.push(s);
        for el in &self.elements {
            s += el.length;
            spos.push(s);
        }
        spos
    }

    /// Element right after the first injection kicker, wrapped to the ring.
    pub fn injection_index(&self) -> ScanOutcome<ElementRef> {
        let kicker = self
            .elements
            .iter()
            .position(|e| e.fam_name == INJECTION_KICKER)
            .ok_or_else(|| {
                ScanError::ConfigurationError(format!(
                    "family '{INJECTION_KICKER}' not found in lattice '{}'",
                    self.name
                ))
            })?;
        Ok((kicker + 1) % self.elements.len())
    }
}

impl LatticeModel for Lattice {
    fn find_elements_by_family(&self, family: &str) -> Vec<ElementRef> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.fam_name == family)
            .map(|(i, _)| i)
            .collect()
    }

    fn get_attribute(&self, element: ElementRef, field: ApertureField) -> Option<f64> {
        self.elements.get(element).map(|e| e.field(field))
    }

    fn set_attribute(&mut self, element: ElementRef, field: ApertureField, value: f64) {
        if let Some(e) = self.elements.get_mut(element) {
            *e.field_mut(field) = value;
        }
    }
}
