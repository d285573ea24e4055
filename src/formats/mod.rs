//! Output encoders: RunKeeper activity JSON and GeoJSON.

pub mod geojson;
pub mod runkeeper;
