// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Family names, study defaults and display metadata.

/// Horizontal scraper family.
pub const SCRAPER_H: &str = "SHVC";

/// Vertical scraper family.
pub const SCRAPER_V: &str = "SVVC";

/// Non-linear injection kicker family. The injection point is the element
/// right after its first occurrence.
pub const INJECTION_KICKER: &str = "InjNLKckr";

/// Number of phase-space coordinates `(x, x', y, y', δ, z)`.
pub const N_COORDINATES: usize = 6;

/// Default injected particle count.
pub const DEFAULT_PARTICLES: usize = 10;

/// Default number of tracked turns.
pub const DEFAULT_TURNS: usize = 10;

/// Default sweep bounds [m] and point count.
pub const DEFAULT_COORD_MIN: f64 = -0.02;
pub const DEFAULT_COORD_MAX: f64 = 0.02;
pub const DEFAULT_COORD_POINTS: usize = 200;

/// Injection position added to every generated particle.
pub const DEFAULT_INJECTION_POSITION: [f64; N_COORDINATES] = [-0.008, 0.0, 0.0, 0.0, 0.0, 0.0];

/// Emittance coupling ratio εy/εx.
pub const DEFAULT_COUPLING: f64 = 0.01;

/// Booster extraction equilibrium at 3 GeV.
pub const DEFAULT_EMITTANCE: f64 = 3.5e-9;
pub const DEFAULT_ENERGY_SPREAD: f64 = 8.7e-4;
pub const DEFAULT_BUNCH_LENGTH: f64 = 1.2e-2;

/// Nominal vacuum chamber half apertures [m].
pub const NOMINAL_HALF_WIDTH: f64 = 0.012;
pub const NOMINAL_HALF_HEIGHT: f64 = 0.0024;

/// Multiplicative display factor per coordinate (m→mm, rad→mrad, 1→%).
pub const DISPLAY_UNITS: [f64; N_COORDINATES] = [1e3, 1e3, 1e3, 1e3, 1e2, 1e3];

/// Axis label per coordinate, matching [`DISPLAY_UNITS`].
pub const COORDINATE_LABELS: [&str; N_COORDINATES] = [
    "horizontal position mean [mm]",
    "x' mean [mrad]",
    "vertical position mean [mm]",
    "y' mean [mrad]",
    "delta [%]",
    "delta l [mm]",
];
