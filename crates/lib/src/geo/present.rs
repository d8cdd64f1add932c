use crate::constants::LOCATION_FIELD;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoValue};
use mongodb::bson::{Bson, Document};
use serde::Serialize;
use tracing::warn;

/// One marker on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// What the user sees after a search.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlacesView {
    Found {
        heading: String,
        points: Vec<MapPoint>,
        markers: FeatureCollection,
    },
    NotFound {
        notice: String,
    },
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(f) => Some(*f),
        Bson::Int32(i) => Some(f64::from(*i)),
        Bson::Int64(i) => Some(*i as f64),
        _ => None,
    }
}

/// Reads `location.coordinates` as `[longitude, latitude]`.
pub fn map_point(place: &Document) -> Option<MapPoint> {
    let coordinates = place
        .get_document(LOCATION_FIELD)
        .ok()?
        .get_array("coordinates")
        .ok()?;
    Some(MapPoint {
        latitude: as_f64(coordinates.get(1)?)?,
        longitude: as_f64(coordinates.get(0)?)?,
    })
}

fn marker(place: &Document, point: MapPoint) -> Feature {
    let properties = place.get_str("name").ok().map(|name| {
        let mut props = JsonObject::new();
        props.insert("name".to_string(), name.into());
        props
    });
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoValue::Point(vec![
            point.longitude,
            point.latitude,
        ]))),
        id: None,
        properties,
        foreign_members: None,
    }
}

fn format_miles(miles: f64) -> String {
    if miles.fract() == 0.0 {
        format!("{miles:.1}")
    } else {
        miles.to_string()
    }
}

/// Turns search results into map markers, or a notice when there are none.
pub fn present_places(places: &[Document], radius_miles: f64) -> PlacesView {
    let mut points = Vec::with_capacity(places.len());
    let mut features = Vec::with_capacity(places.len());
    for place in places {
        match map_point(place) {
            Some(point) => {
                points.push(point);
                features.push(marker(place, point));
            }
            None => warn!(
                id = ?place.get("_id"),
                "Skipping place without usable location coordinates"
            ),
        }
    }

    let radius = format_miles(radius_miles);
    if points.is_empty() {
        return PlacesView::NotFound {
            notice: format!(
                "No restaurants found within {radius} miles of the specified coordinates."
            ),
        };
    }

    PlacesView::Found {
        heading: format!("Found {} restaurants within {radius} miles.", points.len()),
        points,
        markers: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    }
}
