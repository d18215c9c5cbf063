// ─────────────────────────────────────────────────────────────────────
// SCPN Scraper Study — Study CLI
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scraper study host: nominal vs narrowed aperture loss scan on the
//! reference ring. Prints a JSON summary to stdout.

use clap::Parser;
use scraper_scan::logging::init_logger;
use scraper_scan::report::{
    lattice_band, mean_range, plot_series, summarize, LatticeBand, PlotSeries, ScanSummary,
};
use scraper_scan::study::MachineStudy;
use scraper_types::config::StudyConfig;
use scraper_types::error::ScanOutcome;
use scraper_types::state::ApertureConfig;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "scraper-study", about = "Particle loss vs. scraper aperture and injection offset")]
struct Args {
    /// Study configuration (JSON). Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Override the number of injected particles.
    #[arg(short = 'n', long)]
    particles: Option<usize>,

    /// Override the bunch generation seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Scraper limits in metres: h_min h_max v_min v_max.
    #[arg(long, num_args = 4, allow_negative_numbers = true, value_names = ["H_MIN", "H_MAX", "V_MIN", "V_MAX"])]
    aperture: Option<Vec<f64>>,

    /// Also run the mirrored negative-going sweep.
    #[arg(long)]
    sweep_both: bool,

    /// Emit plot series alongside the summaries.
    #[arg(long)]
    series: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Output {
    nominal: ScanSummary,
    scraped: ScanSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    sweeps: Option<SweepSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    series: Vec<PlotSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_range: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lattice_band: Option<LatticeBand>,
}

#[derive(Serialize)]
struct SweepSummary {
    positive: ScanSummary,
    negative: ScanSummary,
}

fn load_config(args: &Args) -> ScanOutcome<StudyConfig> {
    let mut config = match &args.config {
        Some(path) => StudyConfig::from_file(path)?,
        None => StudyConfig::default(),
    };
    if let Some(n) = args.particles {
        config.beam.n_particles = n;
    }
    if args.seed.is_some() {
        config.beam.seed = args.seed;
    }
    if let Some(ap) = &args.aperture {
        // clap enforces exactly four values.
        config.target_aperture = ApertureConfig::new(ap[0], ap[1], ap[2], ap[3]);
    }
    config.sweep_both |= args.sweep_both;
    config.validate()?;
    Ok(config)
}

fn main() -> ScanOutcome<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = load_config(&args)?;
    let mut study = MachineStudy::from_config(&config)?;
    let comparison = study.compare(&config.target_aperture)?;

    let sweeps = if config.sweep_both {
        let amplitude = config
            .scan
            .coord_max()
            .abs()
            .max(config.scan.coord_min().abs());
        let pair = study.sweep_both(&config.target_aperture, amplitude)?;
        Some(SweepSummary {
            positive: summarize(&pair.positive),
            negative: summarize(&pair.negative),
        })
    } else {
        None
    };

    let mut output = Output {
        nominal: summarize(&comparison.nominal),
        scraped: summarize(&comparison.scraped),
        sweeps,
        series: Vec::new(),
        mean_range: None,
        lattice_band: None,
    };
    if args.series {
        let spos = study.spos();
        output.series = vec![
            plot_series(&comparison.nominal, &spos)?,
            plot_series(&comparison.scraped, &spos)?,
        ];
        output.mean_range = mean_range(&[comparison.nominal.clone(), comparison.scraped.clone()]);
        output.lattice_band = output.mean_range.map(|(lo, hi)| lattice_band(lo, hi));
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
