use super::{
    Shape, ShapeStatus, chunk_ranges, match_stops,
    router::{RoadRouter, RouterError},
};
use crate::{
    catalog::{Pattern, StopDoc},
    overrides::OverrideTable,
    shared::LngLat,
};
use std::{
    collections::BTreeMap,
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

pub struct GeneratorConfig {
    /// A new routing request starts every this many stops; the window is
    /// one stop longer so consecutive chunks share a boundary point.
    pub chunk_stride: usize,
    /// Pause after each pattern that hit the network.
    pub throttle: Duration,
    /// Attempts per chunk before it is dropped from the path.
    pub retries: u32,
    /// Delay before the first retry, doubled per failed attempt.
    pub backoff: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            chunk_stride: 20,
            throttle: Duration::from_millis(1500),
            retries: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Derives one [`Shape`] per pattern by routing the pattern's stops through
/// a [`RoadRouter`], strictly sequentially.
pub struct ShapeGenerator<'a, R> {
    router: &'a R,
    config: GeneratorConfig,
}

impl<'a, R: RoadRouter> ShapeGenerator<'a, R> {
    pub fn new(router: &'a R, config: GeneratorConfig) -> Self {
        Self { router, config }
    }

    /// Full-pattern overrides are consumed verbatim and never touch the
    /// network. Patterns referencing a stop that is missing from the stops
    /// table are skipped.
    pub fn generate(
        &self,
        patterns: &[Pattern],
        stops: &BTreeMap<String, StopDoc>,
        overrides: &OverrideTable,
    ) -> BTreeMap<String, Shape> {
        let now = Instant::now();
        let total = patterns.len();
        let mut shapes = BTreeMap::new();
        for (n, pattern) in patterns.iter().enumerate() {
            if let Some(shape) = overrides.full(&pattern.key) {
                info!(
                    "[{}/{}] {}: using manual shape",
                    n + 1,
                    total,
                    pattern.headsign
                );
                shapes.insert(pattern.key.clone(), shape.clone());
                continue;
            }

            let Some(stop_coords) = lookup_coords(pattern, stops) else {
                warn!(
                    "[{}/{}] {}: stop missing from stops table, skipping",
                    n + 1,
                    total,
                    pattern.headsign
                );
                continue;
            };

            info!("[{}/{}] generating {}", n + 1, total, pattern.headsign);
            shapes.insert(pattern.key.clone(), self.generate_one(&stop_coords));
            if !self.config.throttle.is_zero() {
                thread::sleep(self.config.throttle);
            }
        }
        debug!("Generating {} shapes took {:?}", shapes.len(), now.elapsed());
        shapes
    }

    fn generate_one(&self, stop_coords: &[LngLat]) -> Shape {
        let ranges = chunk_ranges(stop_coords.len(), self.config.chunk_stride);
        let chunk_count = ranges.len();
        let mut coordinates: Vec<LngLat> = Vec::new();
        let mut dropped = 0;
        for range in ranges {
            match self.route_chunk(&stop_coords[range]) {
                Ok(mut segment) => {
                    // The first point of every chunk after the first
                    // duplicates the last point of the previous one.
                    if !coordinates.is_empty() && !segment.is_empty() {
                        segment.remove(0);
                    }
                    coordinates.append(&mut segment);
                }
                Err(err) => {
                    warn!(
                        "Dropping chunk after {} attempts: {err}",
                        self.config.retries
                    );
                    dropped += 1;
                }
            }
        }

        let status = if dropped == 0 {
            ShapeStatus::Complete
        } else if dropped < chunk_count && !coordinates.is_empty() {
            ShapeStatus::Partial
        } else {
            ShapeStatus::Failed
        };
        let stop_indices = match_stops(&coordinates, stop_coords);
        Shape {
            coordinates,
            stop_indices,
            status,
        }
    }

    fn route_chunk(&self, waypoints: &[LngLat]) -> Result<Vec<LngLat>, RouterError> {
        let mut delay = self.config.backoff;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.router.route(waypoints) {
                Ok(path) => return Ok(path),
                Err(err) if attempt < self.config.retries => {
                    debug!("Routing attempt {attempt} failed ({err}), retrying in {delay:?}");
                    thread::sleep(delay);
                    delay *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn lookup_coords(pattern: &Pattern, stops: &BTreeMap<String, StopDoc>) -> Option<Vec<LngLat>> {
    pattern
        .stop_ids
        .iter()
        .map(|id| stops.get(id).map(|stop| LngLat::new(stop.lng, stop.lat)))
        .collect()
}
