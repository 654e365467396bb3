use log::info;
use powerlaws::prelude::*;
use powerlaws::rank::RankCdf;
use std::env;

/// Bootstrap KS test of a power-law fit to event sizes.
/// Usage: ks_bootstrap <csv> [column] [trials] [seed]
/// Writes trial results to ks_trials.csv and plots to ks_test.png and ks_fit.png.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args: Vec<String> = env::args().collect();
    let path = args.get(1).map(|s| s.as_str()).unwrap_or("arson.csv");
    let column = args.get(2).map(|s| s.as_str()).unwrap_or("Ranked km2");
    let trials = match args.get(3) {
        Some(n) => n.parse()?,
        None => 1000,
    };

    let areas = utils::read_column(path, column)?;
    info!("Loaded {} events from {}.", areas.len(), path);

    let mut ks = KsBootstrap::new().trials(trials).on_failure(OnFailure::Skip);
    if let Some(seed) = args.get(4) {
        ks = ks.seed(seed.parse()?);
    }
    let run = ks.run_par(&areas)?;
    utils::record(&run.trials, "ks_trials.csv")?;

    let summary = run.summary()?;
    println!(
        "KS threshold: {:.6} ({} trials, {} skipped, seed {})",
        summary.threshold(),
        summary.len(),
        run.skipped,
        run.seed
    );
    plot::ks_test(&summary, "ks_test.png")?;

    let mut support = areas.clone();
    support.sort_by(|a, b| a.total_cmp(b));
    support.dedup();
    let ranks = RankCdf::new(&areas, TieRule::First).normalized(&support)?;
    let law = PowerLaw::fit_log_log(&support, &ranks)?;
    println!(
        "LLS rank fit: coefficient {:.6}, exponent {:.6}",
        law.coefficient, law.exponent
    );
    plot::log_log(&support, &ranks, &law, "ks_fit.png")?;
    Ok(())
}
