use std::{
    collections::{BTreeMap, HashMap, HashSet},
    time::Instant,
};

mod models;
pub use models::*;

use crate::gtfs::{GtfsData, GtfsStopTime};
use tracing::debug;

/// The in-memory form of every output document plus the derived pattern
/// list, built in one pass over a loaded feed.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    pub stops: BTreeMap<String, StopDoc>,
    pub routes: BTreeMap<String, RouteDoc>,
    pub timetables: BTreeMap<String, BTreeMap<String, TripDoc>>,
    pub calendar: BTreeMap<String, CalendarDoc>,
    pub extra: ExtraDoc,
    pub patterns: Vec<Pattern>,
}

pub fn pattern_key(stop_ids: &[String]) -> String {
    stop_ids.join("|")
}

impl Catalog {
    pub fn from_data(data: GtfsData) -> Self {
        let now = Instant::now();
        let mut catalog = Self::default();
        catalog.build_stops(&data);
        catalog.build_routes(&data);
        catalog.build_calendar(&data);
        catalog.build_extra(&data);
        catalog.build_timetables_and_patterns(&data);
        debug!("Building catalog took {:?}", now.elapsed());
        catalog
    }

    fn build_stops(&mut self, data: &GtfsData) {
        for stop in &data.stops {
            self.stops.insert(
                stop.stop_id.clone(),
                StopDoc {
                    name: stop.stop_name.clone(),
                    lat: stop.stop_lat,
                    lng: stop.stop_lon,
                    platform: stop.platform_code.clone().unwrap_or_default(),
                },
            );
        }
        debug!("Loaded {} stops", self.stops.len());
    }

    fn build_routes(&mut self, data: &GtfsData) {
        for route in &data.routes {
            let color = match &route.route_color {
                Some(color) if !color.is_empty() => color.clone(),
                _ => DEFAULT_ROUTE_COLOR.to_string(),
            };
            self.routes.insert(
                route.route_id.clone(),
                RouteDoc {
                    short_name: route.route_short_name.clone(),
                    color,
                    office_id: route.jp_office_id.clone(),
                },
            );
        }
        debug!("Loaded {} routes", self.routes.len());
    }

    fn build_calendar(&mut self, data: &GtfsData) {
        for entry in &data.calendar {
            self.calendar.insert(
                entry.service_id.clone(),
                CalendarDoc {
                    days: [
                        entry.monday.clone(),
                        entry.tuesday.clone(),
                        entry.wednesday.clone(),
                        entry.thursday.clone(),
                        entry.friday.clone(),
                        entry.saturday.clone(),
                        entry.sunday.clone(),
                    ],
                    start: entry.start_date.clone(),
                    end: entry.end_date.clone(),
                },
            );
        }
        debug!("Loaded {} calendar entries", self.calendar.len());
    }

    fn build_extra(&mut self, data: &GtfsData) {
        for office in &data.offices {
            self.extra
                .offices
                .insert(office.office_id.clone(), office.office_name.clone());
        }
        // Exception dates pass through untouched, the viewer interprets them.
        self.extra.calendar_dates = data.calendar_dates.clone();
    }

    /// The pattern fold. For every trip whose route exists, sort its stop
    /// times by numeric sequence, key the ordered stop ids, and keep the
    /// first trip seen per key as the representative. Trips with fewer than
    /// two stop times are invalid and dropped.
    fn build_timetables_and_patterns(&mut self, data: &GtfsData) {
        let mut by_trip: HashMap<&str, Vec<&GtfsStopTime>> = HashMap::new();
        for stop_time in &data.stop_times {
            by_trip
                .entry(stop_time.trip_id.as_str())
                .or_default()
                .push(stop_time);
        }
        for stop_times in by_trip.values_mut() {
            stop_times.sort_by_key(|stop_time| stop_time.stop_sequence);
        }

        let via_lookup: HashMap<&str, &str> = data
            .patterns
            .iter()
            .map(|pattern| (pattern.jp_pattern_id.as_str(), pattern.via_stop.as_str()))
            .collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut kept = 0usize;
        for trip in &data.trips {
            if !self.routes.contains_key(&trip.route_id) {
                debug!(
                    "Dropping trip {} (unknown route {})",
                    trip.trip_id, trip.route_id
                );
                continue;
            }
            let Some(stop_times) = by_trip.get(trip.trip_id.as_str()) else {
                debug!("Dropping trip {} (no stop times)", trip.trip_id);
                continue;
            };
            if stop_times.len() < 2 {
                debug!("Dropping trip {} (fewer than 2 stop times)", trip.trip_id);
                continue;
            }

            let doc = TripDoc {
                headsign: trip.trip_headsign.clone(),
                service_id: trip.service_id.clone(),
                office_id: trip.jp_office_id.clone(),
                via: via_lookup
                    .get(trip.jp_pattern_id.as_str())
                    .map(|via| via.to_string())
                    .unwrap_or_default(),
                stops: stop_times
                    .iter()
                    .map(|stop_time| TimedStop {
                        time: stop_time.departure_time.clone(),
                        stop_id: stop_time.stop_id.clone(),
                    })
                    .collect(),
            };
            self.timetables
                .entry(trip.route_id.clone())
                .or_default()
                .insert(trip.trip_id.clone(), doc);

            kept += 1;
            let stop_ids: Vec<String> = stop_times
                .iter()
                .map(|stop_time| stop_time.stop_id.clone())
                .collect();
            let key = pattern_key(&stop_ids);
            // First write wins, insertion order preserved.
            if seen.insert(key.clone()) {
                self.patterns.push(Pattern {
                    key,
                    route_id: trip.route_id.clone(),
                    headsign: trip.trip_headsign.clone(),
                    stop_ids,
                });
            }
        }
        debug!(
            "Folded {} trips into {} patterns",
            kept,
            self.patterns.len()
        );
    }
}
