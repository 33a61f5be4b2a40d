use std::path::Path;

use anyhow::{bail, Context, Result};

use fabriq::pricing::dataset::read_observations;
use fabriq::pricing::{store, Calibrator, FinishConfig};

/// Offline calibration batch job: fits the material-grade and finish
/// parameter tables from a historical pricing dataset.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(dataset) = args.next() else {
        bail!("usage: calibrate <dataset.csv> [out-dir] [finish-config.json]");
    };
    let out_dir = args.next().unwrap_or_else(|| ".".into());
    let config = match args.next() {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading finish config {path}"))?;
            serde_json::from_str::<FinishConfig>(&raw)
                .with_context(|| format!("parsing finish config {path}"))?
        }
        None => FinishConfig::default(),
    };

    let observations = read_observations(Path::new(&dataset))
        .with_context(|| format!("reading dataset {dataset}"))?;
    if observations.is_empty() {
        bail!("dataset {dataset} contains no observations");
    }
    tracing::info!(count = observations.len(), "loaded pricing observations");

    let set = Calibrator::new(config).run(&observations);

    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {out_dir}"))?;
    store::write_tables(&set, Path::new(&out_dir))
        .with_context(|| format!("writing parameter tables to {out_dir}"))?;

    tracing::info!(
        materials = set.materials().len(),
        finishes = set.finishes().len(),
        %out_dir,
        "parameter tables written"
    );
    Ok(())
}
