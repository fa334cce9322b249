//! Whole-document JSON I/O for the viewer artifacts.

use crate::{catalog::Catalog, shape::Shape};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} not found; run rosen-convert before rosen-patch")]
    MissingBaseline(PathBuf),
    #[error("Override table {0} not found")]
    MissingOverrides(PathBuf),
}

pub struct OutputConfig {
    pub dir: PathBuf,
    pub stops_file: String,
    pub routes_file: String,
    pub timetables_file: String,
    pub calendar_file: String,
    pub extra_file: String,
    pub shapes_file: String,
    pub shapes_base_file: String,
    pub overrides_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".into(),
            stops_file: "stops.json".into(),
            routes_file: "routes.json".into(),
            timetables_file: "timetables.json".into(),
            calendar_file: "calendar.json".into(),
            extra_file: "extra.json".into(),
            shapes_file: "shapes.json".into(),
            shapes_base_file: "shapes_base.json".into(),
            overrides_file: "manual_shapes.json".into(),
        }
    }
}

impl OutputConfig {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

/// The generator's raw output plus provenance. The splicer only ever works
/// from this document, never from an already spliced `shapes.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BaselineShapes {
    /// Unix seconds at generation time.
    pub generated_at: u64,
    pub shapes: BTreeMap<String, Shape>,
}

impl BaselineShapes {
    pub fn new(shapes: BTreeMap<String, Shape>) -> Self {
        let generated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Self {
            generated_at,
            shapes,
        }
    }
}

pub fn write_catalog(config: &OutputConfig, catalog: &Catalog) -> Result<(), Error> {
    write_json(&config.path(&config.stops_file), &catalog.stops)?;
    write_json(&config.path(&config.routes_file), &catalog.routes)?;
    write_json(&config.path(&config.timetables_file), &catalog.timetables)?;
    write_json(&config.path(&config.calendar_file), &catalog.calendar)?;
    write_json(&config.path(&config.extra_file), &catalog.extra)?;
    Ok(())
}

pub fn write_shapes(config: &OutputConfig, shapes: &BTreeMap<String, Shape>) -> Result<(), Error> {
    write_json(&config.path(&config.shapes_file), shapes)
}

pub fn write_baseline(config: &OutputConfig, baseline: &BaselineShapes) -> Result<(), Error> {
    write_json(&config.path(&config.shapes_base_file), baseline)
}

pub fn read_baseline(config: &OutputConfig) -> Result<BaselineShapes, Error> {
    let path = config.path(&config.shapes_base_file);
    if !path.exists() {
        return Err(Error::MissingBaseline(path));
    }
    read_json(&path)
}

/// Strict read, for the splicer: a missing override table aborts the run.
pub fn read_overrides(config: &OutputConfig) -> Result<BTreeMap<String, Shape>, Error> {
    let path = config.path(&config.overrides_file);
    if !path.exists() {
        return Err(Error::MissingOverrides(path));
    }
    read_json(&path)
}

/// Tolerant read, for the converter: no override table means no overrides.
pub fn read_overrides_or_empty(config: &OutputConfig) -> Result<BTreeMap<String, Shape>, Error> {
    let path = config.path(&config.overrides_file);
    if !path.exists() {
        debug!("{} not found, no overrides", path.display());
        return Ok(BTreeMap::new());
    }
    read_json(&path)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    let json = serde_json::to_string(value)?;
    fs::write(path, json)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
