//! Batch converter for static GTFS-JP transit feeds.
//!
//! Reads the feed tables, folds trips into unique stop patterns, derives a
//! road-following shape per pattern from an OSRM-compatible routing service,
//! applies hand-authored shape overrides, and writes the denormalized JSON
//! documents the map/timetable viewer consumes.

pub mod catalog;
pub mod gtfs;
pub mod output;
pub mod overrides;
pub mod shape;
pub mod shared;

pub mod prelude {
    pub use crate::catalog::{Catalog, Pattern};
    pub use crate::gtfs::{GtfsData, GtfsLoader};
    pub use crate::output::{BaselineShapes, OutputConfig};
    pub use crate::overrides::OverrideTable;
    pub use crate::shape::generator::{GeneratorConfig, ShapeGenerator};
    pub use crate::shape::router::{OsrmRouter, RoadRouter};
    pub use crate::shape::{Shape, ShapeStatus};
    pub use crate::shared::LngLat;
}
