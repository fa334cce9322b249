use rosen::catalog::{Pattern, StopDoc};
use rosen::overrides::OverrideTable;
use rosen::shape::generator::{GeneratorConfig, ShapeGenerator};
use rosen::shape::router::{RoadRouter, RouterError};
use rosen::shape::{ShapeStatus, match_stops};
use rosen::shared::LngLat;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// Returns the waypoints themselves as the road path.
struct EchoRouter;

impl RoadRouter for EchoRouter {
    fn route(&self, waypoints: &[LngLat]) -> Result<Vec<LngLat>, RouterError> {
        Ok(waypoints.to_vec())
    }
}

/// Fails the first `failures` calls, then echoes.
struct FlakyRouter {
    failures: Mutex<u32>,
}

impl FlakyRouter {
    fn new(failures: u32) -> Self {
        Self {
            failures: Mutex::new(failures),
        }
    }
}

impl RoadRouter for FlakyRouter {
    fn route(&self, waypoints: &[LngLat]) -> Result<Vec<LngLat>, RouterError> {
        let mut left = self.failures.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(RouterError::Rejected("NoRoute".into()));
        }
        Ok(waypoints.to_vec())
    }
}

/// Echoes the first call, rejects every later one.
struct SecondChunkFails {
    calls: Mutex<u32>,
}

impl SecondChunkFails {
    fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }
}

impl RoadRouter for SecondChunkFails {
    fn route(&self, waypoints: &[LngLat]) -> Result<Vec<LngLat>, RouterError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls > 1 {
            return Err(RouterError::Rejected("NoRoute".into()));
        }
        Ok(waypoints.to_vec())
    }
}

struct AlwaysFails;

impl RoadRouter for AlwaysFails {
    fn route(&self, _: &[LngLat]) -> Result<Vec<LngLat>, RouterError> {
        Err(RouterError::Rejected("NoRoute".into()))
    }
}

fn test_config() -> GeneratorConfig {
    GeneratorConfig {
        throttle: Duration::ZERO,
        backoff: Duration::ZERO,
        ..Default::default()
    }
}

/// A pattern of `count` stops placed at (i, i).
fn diagonal_pattern(count: usize) -> (Pattern, BTreeMap<String, StopDoc>) {
    let mut stops = BTreeMap::new();
    let mut stop_ids = Vec::new();
    for i in 0..count {
        let id = format!("S{i:02}");
        stops.insert(
            id.clone(),
            StopDoc {
                name: format!("Stop {i}"),
                lat: i as f64,
                lng: i as f64,
                platform: String::new(),
            },
        );
        stop_ids.push(id);
    }
    let pattern = Pattern {
        key: stop_ids.join("|"),
        route_id: "R1".to_string(),
        headsign: "Terminus".to_string(),
        stop_ids,
    };
    (pattern, stops)
}

#[test]
fn single_chunk_scenario_test() {
    let (pattern, stops) = diagonal_pattern(3);
    let router = EchoRouter;
    let generator = ShapeGenerator::new(&router, test_config());

    let shapes = generator.generate(
        std::slice::from_ref(&pattern),
        &stops,
        &OverrideTable::default(),
    );
    let shape = &shapes[&pattern.key];
    assert_eq!(
        shape.coordinates,
        vec![
            LngLat::new(0.0, 0.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(2.0, 2.0)
        ]
    );
    assert_eq!(shape.stop_indices, vec![0, 1, 2]);
    assert_eq!(shape.status, ShapeStatus::Complete);

    // Healthy shapes keep the plain document form.
    let json = serde_json::to_string(shape).unwrap();
    assert!(!json.contains("status"));
}

#[test]
fn chunk_boundary_no_duplicate_test() {
    // 25 stops: two chunks (21 + 5) sharing stop 20.
    let (pattern, stops) = diagonal_pattern(25);
    let router = EchoRouter;
    let generator = ShapeGenerator::new(&router, test_config());

    let shapes = generator.generate(
        std::slice::from_ref(&pattern),
        &stops,
        &OverrideTable::default(),
    );
    let shape = &shapes[&pattern.key];
    assert_eq!(shape.coordinates.len(), 25);
    for pair in shape.coordinates.windows(2) {
        assert_ne!(pair[0], pair[1], "duplicated coordinate at chunk boundary");
    }
    assert_eq!(shape.stop_indices, (0..25).collect::<Vec<_>>());
    assert_eq!(shape.status, ShapeStatus::Complete);
}

#[test]
fn stop_indices_length_invariant_test() {
    for count in [2, 5, 21, 22, 25, 45] {
        let (pattern, stops) = diagonal_pattern(count);
        let router = EchoRouter;
        let generator = ShapeGenerator::new(&router, test_config());
        let shapes = generator.generate(
            std::slice::from_ref(&pattern),
            &stops,
            &OverrideTable::default(),
        );
        assert_eq!(shapes[&pattern.key].stop_indices.len(), count);
    }
}

#[test]
fn match_stops_monotone_test() {
    let path: Vec<LngLat> = (0..10).map(|i| LngLat::new(i as f64, 0.0)).collect();
    let stops = vec![
        LngLat::new(2.1, 0.0),
        LngLat::new(5.0, 0.0),
        LngLat::new(5.2, 0.0),
        LngLat::new(8.9, 0.0),
    ];
    let indices = match_stops(&path, &stops);
    assert_eq!(indices, vec![2, 5, 5, 9]);
    for pair in indices.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn match_stops_forward_window_test() {
    let path: Vec<LngLat> = (0..10).map(|i| LngLat::new(i as f64, 0.0)).collect();
    // The second stop's true nearest point (3) lies before the first
    // stop's match (6); the forward-only window pins it at 6.
    let stops = vec![LngLat::new(6.0, 0.0), LngLat::new(3.0, 0.0)];
    let indices = match_stops(&path, &stops);
    assert_eq!(indices, vec![6, 6]);
}

#[test]
fn match_stops_empty_path_test() {
    let stops = vec![LngLat::new(1.0, 1.0), LngLat::new(2.0, 2.0)];
    let indices = match_stops(&[], &stops);
    assert_eq!(indices, vec![0, 0]);
}

#[test]
fn retry_recovers_test() {
    let (pattern, stops) = diagonal_pattern(3);
    // Two failures, three attempts configured: the chunk still lands.
    let router = FlakyRouter::new(2);
    let generator = ShapeGenerator::new(&router, test_config());

    let shapes = generator.generate(
        std::slice::from_ref(&pattern),
        &stops,
        &OverrideTable::default(),
    );
    let shape = &shapes[&pattern.key];
    assert_eq!(shape.status, ShapeStatus::Complete);
    assert_eq!(shape.coordinates.len(), 3);
}

#[test]
fn exhausted_retries_mark_partial_test() {
    let (pattern, stops) = diagonal_pattern(25);
    let router = SecondChunkFails::new();
    let config = GeneratorConfig {
        retries: 1,
        ..test_config()
    };
    let generator = ShapeGenerator::new(&router, config);

    let shapes = generator.generate(
        std::slice::from_ref(&pattern),
        &stops,
        &OverrideTable::default(),
    );
    let shape = &shapes[&pattern.key];
    assert_eq!(shape.status, ShapeStatus::Partial);
    // First chunk survived, second chunk's 4 new points are missing.
    assert_eq!(shape.coordinates.len(), 21);
    assert_eq!(shape.stop_indices.len(), 25);

    let json = serde_json::to_string(shape).unwrap();
    assert!(json.contains("\"status\":\"partial\""));
}

#[test]
fn all_chunks_failed_mark_failed_test() {
    let (pattern, stops) = diagonal_pattern(3);
    let router = AlwaysFails;
    let config = GeneratorConfig {
        retries: 1,
        ..test_config()
    };
    let generator = ShapeGenerator::new(&router, config);

    let shapes = generator.generate(
        std::slice::from_ref(&pattern),
        &stops,
        &OverrideTable::default(),
    );
    let shape = &shapes[&pattern.key];
    assert_eq!(shape.status, ShapeStatus::Failed);
    assert!(shape.coordinates.is_empty());
    assert_eq!(shape.stop_indices, vec![0, 0, 0]);
}

#[test]
fn unknown_stop_skips_pattern_test() {
    let (mut pattern, stops) = diagonal_pattern(3);
    pattern.stop_ids.push("GHOST".to_string());
    pattern.key = pattern.stop_ids.join("|");

    let router = EchoRouter;
    let generator = ShapeGenerator::new(&router, test_config());
    let shapes = generator.generate(
        std::slice::from_ref(&pattern),
        &stops,
        &OverrideTable::default(),
    );
    assert!(shapes.is_empty());
}

#[test]
fn deterministic_output_test() {
    let (pattern_a, mut stops) = diagonal_pattern(25);
    let (pattern_b, more_stops) = {
        let mut stops = BTreeMap::new();
        for i in 0..3 {
            let id = format!("B{i}");
            stops.insert(
                id,
                StopDoc {
                    name: format!("B {i}"),
                    lat: 100.0 + i as f64,
                    lng: 100.0 + i as f64,
                    platform: String::new(),
                },
            );
        }
        let stop_ids: Vec<String> = (0..3).map(|i| format!("B{i}")).collect();
        (
            Pattern {
                key: stop_ids.join("|"),
                route_id: "R2".to_string(),
                headsign: "Loop".to_string(),
                stop_ids,
            },
            stops,
        )
    };
    stops.extend(more_stops);
    let patterns = vec![pattern_a, pattern_b];

    let router = EchoRouter;
    let generator = ShapeGenerator::new(&router, test_config());
    let first = generator.generate(&patterns, &stops, &OverrideTable::default());
    let second = generator.generate(&patterns, &stops, &OverrideTable::default());

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
