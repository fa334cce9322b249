use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use crate::gtfs::GtfsCalendarDate;

/// Fallback route color for feeds that leave `route_color` blank.
pub const DEFAULT_ROUTE_COLOR: &str = "00703c";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopDoc {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub platform: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDoc {
    pub short_name: String,
    pub color: String,
    pub office_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedStop {
    pub time: String,
    pub stop_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDoc {
    pub headsign: String,
    pub service_id: String,
    pub office_id: String,
    pub via: String,
    pub stops: Vec<TimedStop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDoc {
    /// Monday through sunday, as the feed spells them.
    pub days: [String; 7],
    pub start: String,
    pub end: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraDoc {
    pub offices: BTreeMap<String, String>,
    pub calendar_dates: Vec<GtfsCalendarDate>,
}

/// A unique ordered stop sequence, shared by one or more trips. The first
/// trip seen with a given sequence is the representative whose headsign and
/// route the shape generator reports progress under.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// Pipe-joined stop ids. Content-addressed: treat as opaque except by
    /// the override splicer.
    pub key: String,
    pub route_id: String,
    pub headsign: String,
    pub stop_ids: Vec<String>,
}
