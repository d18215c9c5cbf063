// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{
    DEFAULT_BUNCH_LENGTH, DEFAULT_COORD_MAX, DEFAULT_COORD_MIN, DEFAULT_COORD_POINTS,
    DEFAULT_COUPLING, DEFAULT_EMITTANCE, DEFAULT_ENERGY_SPREAD, DEFAULT_INJECTION_POSITION,
    DEFAULT_PARTICLES, DEFAULT_TURNS, N_COORDINATES,
};
use crate::error::{ScanError, ScanOutcome};
use crate::state::{ApertureConfig, Coordinate};
use serde::{Deserialize, Serialize};

/// Top-level study configuration, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub beam: BeamSettings,
    /// Scraper aperture compared against the nominal chamber.
    #[serde(default = "default_target_aperture")]
    pub target_aperture: ApertureConfig,
    /// Also run the mirrored, negative-going sweep.
    #[serde(default)]
    pub sweep_both: bool,
}

fn default_target_aperture() -> ApertureConfig {
    ApertureConfig::new(-0.006, 0.006, -0.0015, 0.0015)
}

impl Default for StudyConfig {
    fn default() -> Self {
        StudyConfig {
            scan: ScanSettings::default(),
            beam: BeamSettings::default(),
            target_aperture: default_target_aperture(),
            sweep_both: false,
        }
    }
}

impl StudyConfig {
    pub fn from_file(path: &str) -> ScanOutcome<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Scan settings are validated on construction; this checks the rest.
    pub fn validate(&self) -> ScanOutcome<()> {
        self.beam.validate()?;
        self.target_aperture.validate()
    }
}

/// Immutable scan parameters. Every constructor path (including
/// deserialization) goes through [`ScanSettings::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScanSettings", into = "RawScanSettings")]
pub struct ScanSettings {
    turn_count: usize,
    coordinate: Coordinate,
    coord_min: f64,
    coord_max: f64,
    coord_points: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawScanSettings {
    #[serde(default = "default_turns")]
    nturns: usize,
    #[serde(default)]
    coord_idx: usize,
    #[serde(default = "default_coord_min")]
    coord_min: f64,
    #[serde(default = "default_coord_max")]
    coord_max: f64,
    #[serde(default = "default_coord_points")]
    coord_nrpts: usize,
}

fn default_turns() -> usize {
    DEFAULT_TURNS
}
fn default_coord_min() -> f64 {
    DEFAULT_COORD_MIN
}
fn default_coord_max() -> f64 {
    DEFAULT_COORD_MAX
}
fn default_coord_points() -> usize {
    DEFAULT_COORD_POINTS
}

impl TryFrom<RawScanSettings> for ScanSettings {
    type Error = ScanError;

    fn try_from(raw: RawScanSettings) -> Result<Self, Self::Error> {
        ScanSettings::new(
            raw.nturns,
            Coordinate::from_index(raw.coord_idx)?,
            raw.coord_min,
            raw.coord_max,
            raw.coord_nrpts,
        )
    }
}

impl From<ScanSettings> for RawScanSettings {
    fn from(s: ScanSettings) -> Self {
        RawScanSettings {
            nturns: s.turn_count,
            coord_idx: s.coordinate.index(),
            coord_min: s.coord_min,
            coord_max: s.coord_max,
            coord_nrpts: s.coord_points,
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        ScanSettings {
            turn_count: DEFAULT_TURNS,
            coordinate: Coordinate::X,
            coord_min: DEFAULT_COORD_MIN,
            coord_max: DEFAULT_COORD_MAX,
            coord_points: DEFAULT_COORD_POINTS,
        }
    }
}

impl ScanSettings {
    pub fn new(
        turn_count: usize,
        coordinate: Coordinate,
        coord_min: f64,
        coord_max: f64,
        coord_points: usize,
    ) -> ScanOutcome<Self> {
        if turn_count == 0 {
            return Err(ScanError::InvalidParameter(
                "turn_count must be >= 1".to_string(),
            ));
        }
        if coord_points == 0 {
            return Err(ScanError::InvalidParameter(
                "coord_points must be >= 1".to_string(),
            ));
        }
        if !coord_min.is_finite() || !coord_max.is_finite() {
            return Err(ScanError::InvalidParameter(format!(
                "sweep bounds must be finite, got [{coord_min}, {coord_max}]"
            )));
        }
        if coord_points > 1 && coord_min == coord_max {
            return Err(ScanError::InvalidParameter(format!(
                "sweep bounds must differ for {coord_points} points, got {coord_min} twice"
            )));
        }
        Ok(ScanSettings {
            turn_count,
            coordinate,
            coord_min,
            coord_max,
            coord_points,
        })
    }

    /// Same parameters with the sweep bounds replaced.
    pub fn with_range(&self, coord_min: f64, coord_max: f64) -> ScanOutcome<Self> {
        Self::new(
            self.turn_count,
            self.coordinate,
            coord_min,
            coord_max,
            self.coord_points,
        )
    }

    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn coord_min(&self) -> f64 {
        self.coord_min
    }

    pub fn coord_max(&self) -> f64 {
        self.coord_max
    }

    pub fn coord_points(&self) -> usize {
        self.coord_points
    }
}

/// Injected bunch and equilibrium parameters of the source beam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamSettings {
    #[serde(default = "default_particles")]
    pub n_particles: usize,
    #[serde(default = "default_injection_position")]
    pub injection_position: [f64; N_COORDINATES],
    /// Uncoupled natural emittance [m·rad].
    #[serde(default = "default_emittance")]
    pub emittance: f64,
    /// Emittance coupling ratio εy/εx.
    #[serde(default = "default_coupling")]
    pub coupling: f64,
    #[serde(default = "default_energy_spread")]
    pub energy_spread: f64,
    /// RMS bunch length [m].
    #[serde(default = "default_bunch_length")]
    pub bunch_length: f64,
    /// RNG seed for bunch generation; entropy-seeded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_particles() -> usize {
    DEFAULT_PARTICLES
}
fn default_injection_position() -> [f64; N_COORDINATES] {
    DEFAULT_INJECTION_POSITION
}
fn default_emittance() -> f64 {
    DEFAULT_EMITTANCE
}
fn default_coupling() -> f64 {
    DEFAULT_COUPLING
}
fn default_energy_spread() -> f64 {
    DEFAULT_ENERGY_SPREAD
}
fn default_bunch_length() -> f64 {
    DEFAULT_BUNCH_LENGTH
}

impl Default for BeamSettings {
    fn default() -> Self {
        BeamSettings {
            n_particles: default_particles(),
            injection_position: default_injection_position(),
            emittance: default_emittance(),
            coupling: default_coupling(),
            energy_spread: default_energy_spread(),
            bunch_length: default_bunch_length(),
            seed: None,
        }
    }
}

impl BeamSettings {
    pub fn validate(&self) -> ScanOutcome<()> {
        if self.n_particles == 0 {
            return Err(ScanError::InvalidParameter(
                "n_particles must be >= 1".to_string(),
            ));
        }
        if self.injection_position.iter().any(|v| !v.is_finite()) {
            return Err(ScanError::InvalidParameter(
                "injection_position must be finite".to_string(),
            ));
        }
        for (name, value) in [
            ("emittance", self.emittance),
            ("energy_spread", self.energy_spread),
            ("bunch_length", self.bunch_length),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScanError::InvalidParameter(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !self.coupling.is_finite() || self.coupling < 0.0 {
            return Err(ScanError::InvalidParameter(format!(
                "coupling must be finite and >= 0, got {}",
                self.coupling
            )));
        }
        Ok(())
    }
}
