use log::info;
use powerlaws::fits::EstimateRow;
use powerlaws::prelude::*;
use std::env;

/// Power-law parameter estimates with bootstrap spread.
/// Usage: power_law_fits <csv> [column] [trials] [seed]
/// Writes per-trial estimates to fits.csv.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args: Vec<String> = env::args().collect();
    let path = args.get(1).map(|s| s.as_str()).unwrap_or("child.csv");
    let column = args.get(2).map(|s| s.as_str()).unwrap_or("Ranked km2");
    let trials = match args.get(3) {
        Some(n) => n.parse()?,
        None => 1000,
    };

    let areas = utils::read_column(path, column)?;
    info!("Loaded {} events from {}.", areas.len(), path);

    let mut fits = PowerLawFits::new().trials(trials);
    if let Some(seed) = args.get(4) {
        fits = fits.seed(seed.parse()?);
    }
    let estimates = fits.run(&areas)?;
    let rows: Vec<EstimateRow> = estimates.iter().map(EstimateRow::from).collect();
    utils::record(&rows, "fits.csv")?;

    print!("{}", FitSummary::new(&estimates));
    Ok(())
}
