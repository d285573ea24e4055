//! GPX track converter.
//!
//! Parses GPX 1.1 XML and produces either a RunKeeper-style activity record
//! or a GeoJSON FeatureCollection. File handling, config, and the Temboo
//! upload client live in their own modules and are used by the bundled CLI.

pub mod config;
pub mod error;
pub mod formats;
pub mod gpx_types;
pub mod parser;
pub mod timefmt;
pub mod upload;

use serde_json::{Map, Value};

pub use crate::error::ConvertError;
pub use crate::formats::runkeeper::ActivityRecord;

/// Convert GPX text to a RunKeeper activity record.
///
/// `overrides` supplies caller values for the enrichment fields (`type`,
/// `equipment`, `notes`, `post_to_facebook`, `post_to_twitter`) and any extra
/// keys; unset fields fall back to the built-in defaults.
pub fn gpx_to_runkeeper(
    gpx_text: &str,
    overrides: &Map<String, Value>,
) -> Result<ActivityRecord, ConvertError> {
    let doc = parser::parse_gpx(gpx_text)?;
    formats::runkeeper::to_activity_record(&doc, overrides)
}

/// Convert GPX text to a GeoJSON FeatureCollection.
pub fn gpx_to_geojson(gpx_text: &str) -> Result<geojson::FeatureCollection, ConvertError> {
    let doc = parser::parse_gpx(gpx_text)?;
    formats::geojson::to_feature_collection(&doc)
}
