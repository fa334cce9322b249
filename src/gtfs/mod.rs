use csv::Reader;
use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};
use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

mod config;
mod data;
pub mod models;
pub use config::*;
pub use data::*;
pub use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads a feed from a directory of csv tables or a zip archive.
/// A table that is missing from the feed loads as empty.
#[derive(Default)]
pub struct GtfsLoader {
    config: Config,
}

impl GtfsLoader {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads from a directory when `path` is one, otherwise treats `path`
    /// as a zip archive.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<GtfsData, Error> {
        if path.as_ref().is_dir() {
            self.load_from_dir(path)
        } else {
            self.load_from_zip(path)
        }
    }

    pub fn load_from_dir<P: AsRef<Path>>(&self, path: P) -> Result<GtfsData, Error> {
        let dir = path.as_ref();
        let mut data = GtfsData::default();
        parse_file(&mut data.stops, &dir.join(&self.config.stops_path))?;
        parse_file(&mut data.routes, &dir.join(&self.config.routes_path))?;
        parse_file(&mut data.trips, &dir.join(&self.config.trips_path))?;
        parse_file(&mut data.stop_times, &dir.join(&self.config.stop_times_path))?;
        parse_file(&mut data.calendar, &dir.join(&self.config.calendar_path))?;
        parse_file(
            &mut data.calendar_dates,
            &dir.join(&self.config.calendar_dates_path),
        )?;
        parse_file(&mut data.offices, &dir.join(&self.config.offices_path))?;
        parse_file(&mut data.patterns, &dir.join(&self.config.patterns_path))?;
        Ok(data)
    }

    pub fn load_from_zip<P: AsRef<Path>>(&self, path: P) -> Result<GtfsData, Error> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;
        let mut data = GtfsData::default();
        parse_entry(&mut data.stops, &mut archive, &self.config.stops_path)?;
        parse_entry(&mut data.routes, &mut archive, &self.config.routes_path)?;
        parse_entry(&mut data.trips, &mut archive, &self.config.trips_path)?;
        parse_entry(
            &mut data.stop_times,
            &mut archive,
            &self.config.stop_times_path,
        )?;
        parse_entry(&mut data.calendar, &mut archive, &self.config.calendar_path)?;
        parse_entry(
            &mut data.calendar_dates,
            &mut archive,
            &self.config.calendar_dates_path,
        )?;
        parse_entry(&mut data.offices, &mut archive, &self.config.offices_path)?;
        parse_entry(&mut data.patterns, &mut archive, &self.config.patterns_path)?;
        Ok(data)
    }
}

fn parse_file<T>(buf: &mut Vec<T>, path: &Path) -> Result<(), Error>
where
    T: DeserializeOwned,
{
    if !path.exists() {
        debug!("{} not found, loading as empty", path.display());
        return Ok(());
    }
    parse_csv(buf, File::open(path)?)
}

fn parse_entry<T>(buf: &mut Vec<T>, archive: &mut ZipArchive<File>, name: &str) -> Result<(), Error>
where
    T: DeserializeOwned,
{
    let Some(index) = archive.index_for_name(name) else {
        debug!("{name} not found in archive, loading as empty");
        return Ok(());
    };
    let file = archive.by_index(index)?;
    parse_csv(buf, file)
}

fn parse_csv<R, T>(buf: &mut Vec<T>, reader: R) -> Result<(), Error>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut rdr = Reader::from_reader(reader);
    for result in rdr.deserialize() {
        let record: T = result?;
        buf.push(record);
    }
    Ok(())
}
