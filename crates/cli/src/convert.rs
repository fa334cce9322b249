use rosen::{
    catalog::Catalog,
    gtfs::{self, GtfsLoader},
    output::{self, BaselineShapes, OutputConfig},
    overrides::OverrideTable,
    shape::{
        generator::{GeneratorConfig, ShapeGenerator},
        router::{OSRM_PUBLIC_ENDPOINT, OsrmRouter},
    },
};
use std::{error::Error, path::Path, time::Instant};
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt().init();

    let args: Vec<_> = std::env::args().collect();
    if args.len() < 3 {
        error!("Usage: rosen-convert <feed dir|zip> <out dir> [osrm endpoint]");
        std::process::exit(1);
    }
    let feed = Path::new(&args[1]);
    let out = OutputConfig::new(&args[2]);
    let endpoint = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| OSRM_PUBLIC_ENDPOINT.to_string());

    if let Err(err) = run(feed, &out, &endpoint) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(feed: &Path, out: &OutputConfig, endpoint: &str) -> Result<(), Box<dyn Error>> {
    info!("Loading feed from {}...", feed.display());
    let now = Instant::now();
    let loader = GtfsLoader::new(gtfs::Config::default());
    let data = loader.load(feed)?;
    let catalog = Catalog::from_data(data);
    info!("Loading feed took {:?}", now.elapsed());

    let overrides = OverrideTable::parse(output::read_overrides_or_empty(out)?)?;

    info!("Generating shapes for {} patterns...", catalog.patterns.len());
    info!("A full network pass can take ten minutes or more.");
    let now = Instant::now();
    let router = OsrmRouter::new(endpoint);
    let generator = ShapeGenerator::new(&router, GeneratorConfig::default());
    let baseline = generator.generate(&catalog.patterns, &catalog.stops, &overrides);
    info!("Generating shapes took {:?}", now.elapsed());

    let shapes = overrides.splice(&baseline)?;

    output::write_catalog(out, &catalog)?;
    output::write_baseline(out, &BaselineShapes::new(baseline))?;
    output::write_shapes(out, &shapes)?;
    info!("Done, all documents written to {}", out.dir.display());
    Ok(())
}
