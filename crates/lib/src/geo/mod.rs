//! # Restaurant Finder
//!
//! Radius search over a MongoDB collection of places. Each search opens its
//! own connection, makes sure the `2dsphere` index exists, runs a
//! `$geoWithin`/`$centerSphere` query and closes the connection again.
//! Failures never propagate: they come back as warnings on the outcome.

pub mod present;

use crate::{
    constants::{
        DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_RADIUS_MILES, EARTH_RADIUS_MILES,
        LOCATION_FIELD,
    },
    errors::GeoError,
    providers::places::PlaceStoreConnector,
    types::Coordinate,
};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub use present::{present_places, MapPoint, PlacesView};

/// Converts a distance in miles to an angle in radians on the Earth's surface.
pub fn miles_to_radians(miles: f64) -> f64 {
    miles / EARTH_RADIUS_MILES
}

/// Builds the spherical containment filter on the location field.
pub fn within_sphere_filter(center: Coordinate, radius_radians: f64) -> Document {
    let mut filter = Document::new();
    filter.insert(
        LOCATION_FIELD,
        doc! {
            "$geoWithin": {
                "$centerSphere": [[center.longitude, center.latitude], radius_radians]
            }
        },
    );
    filter
}

/// The user's search parameters. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoSearchRequest {
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_radius", alias = "radius_miles")]
    pub radius: f64,
}

fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_MILES
}

impl Default for GeoSearchRequest {
    fn default() -> Self {
        Self {
            longitude: DEFAULT_LONGITUDE,
            latitude: DEFAULT_LATITUDE,
            radius: DEFAULT_RADIUS_MILES,
        }
    }
}

impl GeoSearchRequest {
    /// Validates the inputs and returns the centre and the radius in radians.
    pub fn resolve(&self) -> Result<(Coordinate, f64), GeoError> {
        let center = Coordinate::new(self.longitude, self.latitude)?;
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GeoError::InvalidRadius(format!(
                "radius must be a positive number of miles, got {}",
                self.radius
            )));
        }
        Ok((center, miles_to_radians(self.radius)))
    }
}

/// What a search produced: the matching documents plus anything worth telling the user.
#[derive(Debug, Default)]
pub struct GeoSearchOutcome {
    pub places: Vec<Document>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl GeoSearchOutcome {
    fn failed(err: GeoError, warnings: Vec<String>) -> Self {
        error!("Restaurant search failed: {err}");
        Self {
            places: Vec::new(),
            warnings,
            error: Some(err.to_string()),
        }
    }
}

/// Runs one radius search against a freshly opened place store.
///
/// The connection is closed before returning whether or not the query
/// succeeded. An index failure is recorded as a warning and the query still
/// runs.
pub async fn search_places(
    connector: &dyn PlaceStoreConnector,
    request: &GeoSearchRequest,
) -> GeoSearchOutcome {
    let (center, radius_radians) = match request.resolve() {
        Ok(resolved) => resolved,
        Err(e) => return GeoSearchOutcome::failed(e, Vec::new()),
    };
    info!(
        longitude = center.longitude,
        latitude = center.latitude,
        radius_miles = request.radius,
        radius_radians,
        "Searching for restaurants"
    );

    let store = match connector.connect().await {
        Ok(store) => store,
        Err(e) => return GeoSearchOutcome::failed(e, Vec::new()),
    };

    let mut warnings = Vec::new();
    if let Err(e) = store.ensure_geo_index().await {
        warn!("{e}");
        warnings.push(e.to_string());
    }

    let found = store
        .find(within_sphere_filter(center, radius_radians))
        .await;
    store.close().await;

    match found {
        Ok(places) => {
            info!("Found {} place(s)", places.len());
            GeoSearchOutcome {
                places,
                warnings,
                error: None,
            }
        }
        Err(e) => GeoSearchOutcome::failed(e, warnings),
    }
}
