use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
use serde_json::{Map, Value as JsonValue};

use crate::error::ConvertError;
use crate::gpx_types::GpxDocument;
use crate::timefmt::format_start_time;

/// Convert a parsed GPX document to a single-feature GeoJSON
/// FeatureCollection.
///
/// Coordinates are `[lon, lat]` pairs in document order. Altitude and
/// per-point times are deliberately not carried over; only the track name and
/// the formatted start time end up in the feature properties.
pub fn to_feature_collection(doc: &GpxDocument) -> Result<FeatureCollection, ConvertError> {
    let track = doc.first_track().ok_or(ConvertError::MissingTrackName)?;
    let name = track.name.clone().ok_or(ConvertError::MissingTrackName)?;
    let start = doc.start_time()?;

    let coords: Vec<Vec<f64>> = track.points().map(|pt| vec![pt.lon, pt.lat]).collect();
    let geometry = Geometry::new(GeoValue::LineString(coords));

    let mut props = Map::new();
    props.insert("name".to_string(), JsonValue::String(name));
    props.insert(
        "time".to_string(),
        JsonValue::String(format_start_time(&start)),
    );

    Ok(FeatureCollection {
        bbox: None,
        features: vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }],
        foreign_members: None,
    })
}
