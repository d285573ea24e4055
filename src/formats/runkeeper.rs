use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ConvertError;
use crate::gpx_types::GpxDocument;
use crate::timefmt::format_start_time;

/// Constant source marker for every path point.
pub const GPS_SOURCE: &str = "gps";

/// Built-in field defaults for the RunKeeper format. GeoJSON output carries no
/// defaults table.
pub struct ActivityDefaults {
    pub activity_type: &'static str,
    pub equipment: &'static str,
    pub notes: &'static str,
    pub post_to_facebook: bool,
    pub post_to_twitter: bool,
}

pub static RUNKEEPER_DEFAULTS: ActivityDefaults = ActivityDefaults {
    activity_type: "Running",
    equipment: "None",
    notes: "",
    post_to_facebook: false,
    post_to_twitter: false,
};

/// A single point of the activity path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Whole seconds since the activity start time. Absent for points without
    /// a time element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "type")]
    pub source_type: &'static str,
}

/// The RunKeeper activity shape: localized start time, the ordered path, and
/// the enrichment fields.
#[derive(Debug, Serialize)]
pub struct ActivityRecord {
    pub start_time: String,
    pub path: Vec<PathPoint>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_to_facebook: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_to_twitter: Option<bool>,
    /// Caller-supplied override keys outside the known set.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActivityRecord {
    fn new(start_time: String, path: Vec<PathPoint>) -> Self {
        Self {
            start_time,
            path,
            activity_type: None,
            equipment: None,
            notes: None,
            post_to_facebook: None,
            post_to_twitter: None,
            extra: Map::new(),
        }
    }

    /// Two-tier fill: caller overrides first, built-in defaults second. A key
    /// already set is never overwritten, so repeated calls are no-ops.
    pub fn enrich(&mut self, overrides: &Map<String, Value>) {
        self.apply_overrides(overrides);
        self.apply_defaults(&RUNKEEPER_DEFAULTS);
    }

    fn apply_overrides(&mut self, overrides: &Map<String, Value>) {
        for (key, value) in overrides {
            match key.as_str() {
                "type" => fill_string(&mut self.activity_type, key, value),
                "equipment" => fill_string(&mut self.equipment, key, value),
                "notes" => fill_string(&mut self.notes, key, value),
                "post_to_facebook" => fill_bool(&mut self.post_to_facebook, key, value),
                "post_to_twitter" => fill_bool(&mut self.post_to_twitter, key, value),
                // start_time and path are computed from the GPX input and are
                // always set, so an override never replaces them.
                "start_time" | "path" => {
                    log::debug!("ignoring override for computed field '{key}'");
                }
                _ => {
                    self.extra
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
            }
        }
    }

    fn apply_defaults(&mut self, defaults: &ActivityDefaults) {
        self.activity_type
            .get_or_insert_with(|| defaults.activity_type.to_string());
        self.equipment
            .get_or_insert_with(|| defaults.equipment.to_string());
        self.notes.get_or_insert_with(|| defaults.notes.to_string());
        self.post_to_facebook.get_or_insert(defaults.post_to_facebook);
        self.post_to_twitter.get_or_insert(defaults.post_to_twitter);
    }
}

fn fill_string(slot: &mut Option<String>, key: &str, value: &Value) {
    if slot.is_some() {
        return;
    }
    match value.as_str() {
        Some(s) => *slot = Some(s.to_string()),
        None => log::debug!("ignoring non-string override for '{key}'"),
    }
}

fn fill_bool(slot: &mut Option<bool>, key: &str, value: &Value) {
    if slot.is_some() {
        return;
    }
    match value.as_bool() {
        Some(b) => *slot = Some(b),
        None => log::debug!("ignoring non-boolean override for '{key}'"),
    }
}

/// Convert a parsed GPX document to a RunKeeper activity record.
pub fn to_activity_record(
    doc: &GpxDocument,
    overrides: &Map<String, Value>,
) -> Result<ActivityRecord, ConvertError> {
    let start = doc.start_time()?;

    let mut path = Vec::new();
    if let Some(track) = doc.first_track() {
        for pt in track.points() {
            path.push(PathPoint {
                latitude: pt.lat,
                longitude: pt.lon,
                altitude: pt.ele,
                timestamp: pt.time.map(|t| (t - start).num_seconds()),
                source_type: GPS_SOURCE,
            });
        }
    }

    let mut record = ActivityRecord::new(format_start_time(&start), path);
    record.enrich(overrides);
    Ok(record)
}
