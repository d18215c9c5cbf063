// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Beam
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Equilibrium beam parameters and matched Gaussian bunch generation.

use crate::optics::Twiss;
use rand::Rng;
use rand_distr::StandardNormal;
use scraper_types::config::BeamSettings;
use scraper_types::error::{ScanError, ScanOutcome};
use scraper_types::state::Bunch;

/// Equilibrium emittances, energy spread and bunch length of the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibriumParams {
    pub emit_x: f64,
    pub emit_y: f64,
    pub energy_spread: f64,
    pub bunch_length: f64,
}

impl EquilibriumParams {
    /// Split an uncoupled emittance `ε0` with coupling ratio `κ`:
    /// `εx = ε0 / (1 + κ)`, `εy = κ ε0 / (1 + κ)`.
    pub fn from_coupling(
        emittance: f64,
        coupling: f64,
        energy_spread: f64,
        bunch_length: f64,
    ) -> ScanOutcome<Self> {
        for (name, value) in [
            ("emittance", emittance),
            ("coupling", coupling),
            ("energy_spread", energy_spread),
            ("bunch_length", bunch_length),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScanError::InvalidParameter(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(EquilibriumParams {
            emit_x: emittance / (1.0 + coupling),
            emit_y: coupling * emittance / (1.0 + coupling),
            energy_spread,
            bunch_length,
        })
    }

    pub fn from_settings(beam: &BeamSettings) -> ScanOutcome<Self> {
        Self::from_coupling(
            beam.emittance,
            beam.coupling,
            beam.energy_spread,
            beam.bunch_length,
        )
    }
}

/// Draw `n_particles` Gaussian particles matched to `optics`, centred on
/// the reference orbit.
pub fn generate_bunch<R: Rng + ?Sized>(
    n_particles: usize,
    params: &EquilibriumParams,
    optics: &Twiss,
    rng: &mut R,
) -> ScanOutcome<Bunch> {
    if n_particles == 0 {
        return Err(ScanError::InvalidParameter(
            "n_particles must be >= 1".to_string(),
        ));
    }
    if !(optics.beta_x > 0.0 && optics.beta_y > 0.0) {
        return Err(ScanError::PhysicsViolation(format!(
            "beta functions must be > 0, got beta_x={}, beta_y={}",
            optics.beta_x, optics.beta_y
        )));
    }

    let sx = (params.emit_x * optics.beta_x).sqrt();
    let sxp = (params.emit_x / optics.beta_x).sqrt();
    let sy = (params.emit_y * optics.beta_y).sqrt();
    let syp = (params.emit_y / optics.beta_y).sqrt();

    let mut bunch = Bunch::zeros(n_particles);
    for ip in 0..n_particles {
        let u: [f64; 6] = std::array::from_fn(|_| rng.sample(StandardNormal));
        let delta = params.energy_spread * u[4];
        let state = [
            sx * u[0] + optics.eta_x * delta,
            sxp * (u[1] - optics.alpha_x * u[0]) + optics.etap_x * delta,
            sy * u[2],
            syp * (u[3] - optics.alpha_y * u[2]),
            delta,
            params.bunch_length * u[5],
        ];
        bunch.set_particle(ip, &state);
    }
    Ok(bunch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use scraper_types::state::Coordinate;

    fn optics() -> Twiss {
        Twiss {
            beta_x: 12.0,
            alpha_x: 0.3,
            beta_y: 4.0,
            alpha_y: -0.2,
            eta_x: 0.8,
            etap_x: 0.0,
            tune_x: 0.3,
            tune_y: 0.2,
        }
    }

    #[test]
    fn test_coupling_split_conserves_sum() {
        let p = EquilibriumParams::from_coupling(3.5e-9, 0.01, 8.7e-4, 0.012).unwrap();
        assert!((p.emit_x + p.emit_y - 3.5e-9).abs() < 1e-20);
        assert!((p.emit_y / p.emit_x - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_negative_inputs() {
        assert!(EquilibriumParams::from_coupling(-1.0, 0.01, 1e-3, 1e-2).is_err());
        assert!(EquilibriumParams::from_coupling(1e-9, f64::NAN, 1e-3, 1e-2).is_err());
    }

    #[test]
    fn test_bunch_statistics_match_envelope() {
        let p = EquilibriumParams::from_coupling(3.5e-9, 0.01, 8.7e-4, 0.012).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let bunch = generate_bunch(20_000, &p, &optics(), &mut rng).unwrap();
        assert_eq!(bunch.n_particles(), 20_000);
        let delta = bunch.coordinate(Coordinate::Delta);
        let sd = delta.std(0.0);
        assert!((sd / 8.7e-4 - 1.0).abs() < 0.05, "sigma_delta = {sd}");
        let z_sd = bunch.coordinate(Coordinate::Z).std(0.0);
        assert!((z_sd / 0.012 - 1.0).abs() < 0.05, "sigma_z = {z_sd}");
        assert!(bunch.mean(Coordinate::X).abs() < 1e-4);
    }

    #[test]
    fn test_seeded_generation_reproducible() {
        let p = EquilibriumParams::from_coupling(3.5e-9, 0.01, 8.7e-4, 0.012).unwrap();
        let a = generate_bunch(10, &p, &optics(), &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_bunch(10, &p, &optics(), &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_particles_rejected() {
        let p = EquilibriumParams::from_coupling(3.5e-9, 0.01, 8.7e-4, 0.012).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_bunch(0, &p, &optics(), &mut rng).is_err());
    }
}
