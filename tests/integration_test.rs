use chrono::DateTime;
use geojson::Value as GeoValue;
use serde_json::{Map, json};

use gpx2activity::error::ConvertError;
use gpx2activity::timefmt::format_start_time;
use gpx2activity::{gpx_to_geojson, gpx_to_runkeeper};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{name}")).unwrap()
}

fn local_format(rfc3339: &str) -> String {
    format_start_time(&DateTime::parse_from_rfc3339(rfc3339).unwrap())
}

#[test]
fn test_runkeeper_round_trip() {
    let record = gpx_to_runkeeper(&load_fixture("morning_run.gpx"), &Map::new()).unwrap();
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["start_time"], local_format("2013-05-01T12:00:00Z"));

    let path = value["path"].as_array().unwrap();
    assert_eq!(path.len(), 2);
    assert_eq!(
        path[0],
        json!({
            "latitude": 45.0,
            "longitude": -122.0,
            "altitude": 10.0,
            "timestamp": 0,
            "type": "gps",
        })
    );
    assert_eq!(
        path[1],
        json!({
            "latitude": 45.001,
            "longitude": -122.001,
            "altitude": 12.0,
            "timestamp": 30,
            "type": "gps",
        })
    );

    // Defaults filled in
    assert_eq!(value["type"], "Running");
    assert_eq!(value["equipment"], "None");
    assert_eq!(value["notes"], "");
    assert_eq!(value["post_to_facebook"], false);
    assert_eq!(value["post_to_twitter"], false);
}

#[test]
fn test_start_time_falls_back_to_first_point() {
    let record = gpx_to_runkeeper(&load_fixture("no_metadata_time.gpx"), &Map::new()).unwrap();
    assert_eq!(record.start_time, local_format("2013-05-01T18:00:00Z"));
    assert_eq!(record.path[0].timestamp, Some(0));
    assert_eq!(record.path[1].timestamp, Some(60));
}

#[test]
fn test_overrides_survive_enrichment() {
    let mut overrides = Map::new();
    overrides.insert("type".to_string(), json!("Cycling"));
    overrides.insert("equipment".to_string(), json!("Road Bike"));

    let record = gpx_to_runkeeper(&load_fixture("morning_run.gpx"), &overrides).unwrap();
    assert_eq!(record.activity_type.as_deref(), Some("Cycling"));
    assert_eq!(record.equipment.as_deref(), Some("Road Bike"));
    // Remaining fields still default
    assert_eq!(record.notes.as_deref(), Some(""));
    assert_eq!(record.post_to_facebook, Some(false));
}

#[test]
fn test_geojson_output() {
    let fc = gpx_to_geojson(&load_fixture("morning_run.gpx")).unwrap();
    assert_eq!(fc.features.len(), 1);

    let feature = &fc.features[0];
    let props = feature.properties.as_ref().unwrap();
    assert_eq!(props["name"], "Morning Run");
    assert_eq!(props["time"], local_format("2013-05-01T12:00:00Z").as_str());

    let geom = feature.geometry.as_ref().unwrap();
    match &geom.value {
        GeoValue::LineString(coords) => {
            // [lon, lat] pairs, document order, no altitude or time
            assert_eq!(coords[0], vec![-122.0, 45.0]);
            assert_eq!(coords[1], vec![-122.001, 45.001]);
        }
        other => panic!("expected LineString, got {other:?}"),
    }
}

#[test]
fn test_unnamed_track_geojson_fails_runkeeper_succeeds() {
    let gpx = load_fixture("unnamed_track.gpx");

    let err = gpx_to_geojson(&gpx).unwrap_err();
    assert!(matches!(err, ConvertError::MissingTrackName));

    let record = gpx_to_runkeeper(&gpx, &Map::new()).unwrap();
    assert_eq!(record.path.len(), 2);
}

#[test]
fn test_garmin_export_with_extensions() {
    let gpx = load_fixture("garmin_run.gpx");

    let record = gpx_to_runkeeper(&gpx, &Map::new()).unwrap();
    // Points flattened across both segments, extensions skipped
    assert_eq!(record.path.len(), 3);
    assert_eq!(record.path[0].timestamp, Some(0));
    assert_eq!(record.path[1].timestamp, Some(15));
    assert_eq!(record.path[2].timestamp, Some(65));
    assert_eq!(record.path[2].altitude, Some(69.1));

    let fc = gpx_to_geojson(&gpx).unwrap();
    let props = fc.features[0].properties.as_ref().unwrap();
    assert_eq!(props["name"], "Forest Park Loop");
    let geom = fc.features[0].geometry.as_ref().unwrap();
    match &geom.value {
        GeoValue::LineString(coords) => assert_eq!(coords.len(), 3),
        other => panic!("expected LineString, got {other:?}"),
    }
}

#[test]
fn test_timestamps_monotonic() {
    let record = gpx_to_runkeeper(&load_fixture("garmin_run.gpx"), &Map::new()).unwrap();
    let stamps: Vec<i64> = record.path.iter().filter_map(|p| p.timestamp).collect();
    assert!(stamps.iter().all(|&s| s >= 0));
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}
