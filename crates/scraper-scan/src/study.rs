// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Machine Study
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scraper study context: ring model, tracking oracle, injected bunch and
//! scan settings owned together, so independent studies never share
//! model state.

use crate::aperture::get_aperture;
use crate::scan::{scan, ScanPlan};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scraper_lattice::beam::{generate_bunch, EquilibriumParams};
use scraper_lattice::lattice::Lattice;
use scraper_lattice::optics::{calc_twiss, Twiss};
use scraper_lattice::ring::storage_ring;
use scraper_lattice::tracking::LinearTracker;
use scraper_types::config::{BeamSettings, ScanSettings, StudyConfig};
use scraper_types::error::{ScanError, ScanOutcome};
use scraper_types::model::{ElementRef, TrackingOracle};
use scraper_types::state::{ApertureConfig, Bunch, ScanResult};
use serde::Serialize;

/// Same sweep under the nominal and the narrowed aperture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScraperComparison {
    pub nominal: ScanResult,
    pub scraped: ScanResult,
}

/// One-sided sweeps from zero towards `+amplitude` and `-amplitude`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPair {
    pub positive: ScanResult,
    pub negative: ScanResult,
}

#[derive(Debug, Clone)]
pub struct MachineStudy<O = LinearTracker> {
    lattice: Lattice,
    oracle: O,
    settings: ScanSettings,
    beam: BeamSettings,
    injection_index: ElementRef,
    injection_optics: Twiss,
    equilibrium: EquilibriumParams,
    bunch: Bunch,
}

impl MachineStudy<LinearTracker> {
    /// Reference ring with the linear tracker.
    pub fn from_config(config: &StudyConfig) -> ScanOutcome<Self> {
        config.validate()?;
        Self::new(
            storage_ring()?,
            LinearTracker::new(),
            config.scan,
            config.beam.clone(),
        )
    }
}

impl<O: TrackingOracle<Lattice>> MachineStudy<O> {
    pub fn new(
        lattice: Lattice,
        oracle: O,
        settings: ScanSettings,
        beam: BeamSettings,
    ) -> ScanOutcome<Self> {
        beam.validate()?;
        let injection_index = lattice.injection_index()?;
        let injection_optics = calc_twiss(&lattice, injection_index)?;
        let equilibrium = EquilibriumParams::from_settings(&beam)?;
        tracing::info!(
            lattice = %lattice.name,
            injection_index,
            beta_x = injection_optics.beta_x,
            beta_y = injection_optics.beta_y,
            emit_x = equilibrium.emit_x,
            emit_y = equilibrium.emit_y,
            "study set up"
        );
        let bunch = Self::create_bunch(&beam, &equilibrium, &injection_optics)?;
        Ok(MachineStudy {
            lattice,
            oracle,
            settings,
            beam,
            injection_index,
            injection_optics,
            equilibrium,
            bunch,
        })
    }

    fn create_bunch(
        beam: &BeamSettings,
        equilibrium: &EquilibriumParams,
        optics: &Twiss,
    ) -> ScanOutcome<Bunch> {
        let mut rng = match beam.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut bunch = generate_bunch(beam.n_particles, equilibrium, optics, &mut rng)?;
        bunch.translate(&beam.injection_position);
        Ok(bunch)
    }

    /// Regenerate the bunch with a different particle count.
    pub fn with_particles(mut self, n_particles: usize) -> ScanOutcome<Self> {
        if n_particles == 0 {
            return Err(ScanError::InvalidParameter(
                "n_particles must be >= 1".to_string(),
            ));
        }
        self.beam.n_particles = n_particles;
        self.bunch = Self::create_bunch(&self.beam, &self.equilibrium, &self.injection_optics)?;
        Ok(self)
    }

    /// Replace the scan settings, keeping the bunch.
    pub fn with_settings(mut self, settings: ScanSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn bunch(&self) -> &Bunch {
        &self.bunch
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    pub fn injection_index(&self) -> ElementRef {
        self.injection_index
    }

    pub fn injection_optics(&self) -> &Twiss {
        &self.injection_optics
    }

    pub fn spos(&self) -> Vec<f64> {
        self.lattice.find_spos()
    }

    pub fn nominal_aperture(&self) -> ScanOutcome<ApertureConfig> {
        get_aperture(&self.lattice)
    }

    fn run(&mut self, settings: &ScanSettings, target: &ApertureConfig) -> ScanOutcome<ScanResult> {
        let plan = ScanPlan::from_settings(settings, self.injection_index)?;
        scan(&mut self.lattice, &self.oracle, &self.bunch, &plan, target)
    }

    /// Sweep the configured range with `target` applied to the scrapers.
    pub fn simulate_scraper_effect(&mut self, target: &ApertureConfig) -> ScanOutcome<ScanResult> {
        let settings = self.settings;
        self.run(&settings, target)
    }

    /// Nominal sweep followed by the same sweep under `target`.
    pub fn compare(&mut self, target: &ApertureConfig) -> ScanOutcome<ScraperComparison> {
        let nominal_aperture = self.nominal_aperture()?;
        let nominal = self.simulate_scraper_effect(&nominal_aperture)?;
        let scraped = self.simulate_scraper_effect(target)?;
        Ok(ScraperComparison { nominal, scraped })
    }

    /// Positive- and negative-going sweeps of the same `amplitude` under
    /// `target`, each starting from zero offset.
    pub fn sweep_both(&mut self, target: &ApertureConfig, amplitude: f64) -> ScanOutcome<SweepPair> {
        if !amplitude.is_finite() || amplitude <= 0.0 {
            return Err(ScanError::InvalidParameter(format!(
                "amplitude must be finite and > 0, got {amplitude}"
            )));
        }
        let positive_settings = self.settings.with_range(0.0, amplitude)?;
        let negative_settings = self.settings.with_range(0.0, -amplitude)?;
        let positive = self.run(&positive_settings, target)?;
        let negative = self.run(&negative_settings, target)?;
        Ok(SweepPair { positive, negative })
    }
}
