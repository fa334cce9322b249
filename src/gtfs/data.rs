use crate::gtfs::{
    GtfsCalendar, GtfsCalendarDate, GtfsOffice, GtfsPattern, GtfsRoute, GtfsStop, GtfsStopTime,
    GtfsTrip,
};

/// A fully loaded feed. Everything is read into memory up front; the
/// whole pipeline is a batch transform over these tables.
#[derive(Default, Debug, Clone)]
pub struct GtfsData {
    pub stops: Vec<GtfsStop>,
    pub routes: Vec<GtfsRoute>,
    pub trips: Vec<GtfsTrip>,
    pub stop_times: Vec<GtfsStopTime>,
    pub calendar: Vec<GtfsCalendar>,
    pub calendar_dates: Vec<GtfsCalendarDate>,
    pub offices: Vec<GtfsOffice>,
    pub patterns: Vec<GtfsPattern>,
}
