use serde::{Deserialize, Serialize};

// Column sets are feed specific: unknown extra columns are ignored and
// optional columns fall back to their defaults when a feed omits them.

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
    #[serde(default)]
    pub platform_code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsRoute {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: String,
    #[serde(default)]
    pub route_color: Option<String>,
    #[serde(default)]
    pub jp_office_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsTrip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    #[serde(default)]
    pub trip_headsign: String,
    #[serde(default)]
    pub jp_office_id: String,
    #[serde(default)]
    pub jp_pattern_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsStopTime {
    pub trip_id: String,
    #[serde(default)]
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: i64,
}

// Day flags and dates pass through as the feed spells them, no parsing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsCalendar {
    pub service_id: String,
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GtfsCalendarDate {
    pub service_id: String,
    pub date: String,
    pub exception_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsOffice {
    pub office_id: String,
    pub office_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GtfsPattern {
    pub jp_pattern_id: String,
    #[serde(default)]
    pub via_stop: String,
}
