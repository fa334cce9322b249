use rosen::{
    output::{self, OutputConfig},
    overrides::OverrideTable,
};
use std::{error::Error, time::Instant};
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt().init();

    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 {
        error!("Usage: rosen-patch <out dir>");
        std::process::exit(1);
    }
    let out = OutputConfig::new(&args[1]);

    if let Err(err) = run(&out) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(out: &OutputConfig) -> Result<(), Box<dyn Error>> {
    let now = Instant::now();
    let baseline = output::read_baseline(out)?;
    let overrides = OverrideTable::parse(output::read_overrides(out)?)?;

    let shapes = overrides.splice(&baseline.shapes)?;
    let changed = shapes
        .iter()
        .filter(|(key, shape)| baseline.shapes.get(key.as_str()) != Some(*shape))
        .count();
    output::write_shapes(out, &shapes)?;

    info!(
        "Patched {changed} of {} shapes (baseline generated at {}) in {:?}",
        shapes.len(),
        baseline.generated_at,
        now.elapsed()
    );
    Ok(())
}
