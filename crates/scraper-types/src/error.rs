// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

/// Failure reported by a tracking oracle for a single tracking call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    #[error("Numerical divergence for particle {particle} at turn {turn}, element {element}")]
    NumericalDivergence {
        particle: usize,
        turn: usize,
        element: usize,
    },

    #[error("Invalid bunch: {0}")]
    InvalidBunch(String),

    #[error("Injection element {index} outside lattice of {len} elements")]
    InjectionOutOfRange { index: usize, len: usize },

    #[error("Tracking aborted: {0}")]
    Aborted(String),
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid offset sequence: {0}")]
    InvalidOffsetSequence(String),

    #[error("Invalid aperture: {0}")]
    InvalidAperture(String),

    #[error("Invalid scan parameter: {0}")]
    InvalidParameter(String),

    #[error("Tracking failed at step {step}: {source}")]
    TrackingFailure {
        step: usize,
        #[source]
        source: TrackingError,
    },

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ScanOutcome<T> = Result<T, ScanError>;
