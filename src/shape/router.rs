use crate::shared::LngLat;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// The free public OSRM instance. Be polite to it: the generator throttles
/// between patterns and never issues requests in parallel.
pub const OSRM_PUBLIC_ENDPOINT: &str = "https://router.project-osrm.org";

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Routing service rejected the request: {0}")]
    Rejected(String),
}

/// The seam between shape generation and the road network. Implemented by
/// [`OsrmRouter`] in production and by stubs in tests.
pub trait RoadRouter {
    /// Returns the road path visiting `waypoints` in order, as `[lng, lat]`
    /// coordinates.
    fn route(&self, waypoints: &[LngLat]) -> Result<Vec<LngLat>, RouterError>;
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<LngLat>,
}

/// Blocking client for an OSRM `route/v1/driving` endpoint with full
/// geojson geometry output.
pub struct OsrmRouter {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl OsrmRouter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl RoadRouter for OsrmRouter {
    fn route(&self, waypoints: &[LngLat]) -> Result<Vec<LngLat>, RouterError> {
        let coords = waypoints
            .iter()
            .map(|point| point.to_string())
            .collect::<Vec<_>>()
            .join(";");
        let url = format!(
            "{}/route/v1/driving/{}?overview=full&geometries=geojson",
            self.endpoint, coords
        );
        debug!("GET {url}");
        let response: OsrmResponse = self.client.get(&url).send()?.error_for_status()?.json()?;
        if response.code != "Ok" {
            return Err(RouterError::Rejected(response.code));
        }
        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RouterError::Rejected("no routes in response".into()))?;
        Ok(route.geometry.coordinates)
    }
}
