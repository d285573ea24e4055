use chrono::{DateTime, FixedOffset};

use crate::error::ConvertError;

/// Parsed GPX data: the metadata start time plus all tracks.
#[derive(Debug, Default)]
pub struct GpxDocument {
    /// First `<time>` under `<metadata>`, if any.
    pub metadata_time: Option<DateTime<FixedOffset>>,
    pub tracks: Vec<GpxTrack>,
}

impl GpxDocument {
    /// Resolve the activity start time: the metadata time wins, otherwise the
    /// first timestamped point in document order.
    pub fn start_time(&self) -> Result<DateTime<FixedOffset>, ConvertError> {
        if let Some(time) = self.metadata_time {
            return Ok(time);
        }
        self.tracks
            .iter()
            .flat_map(|trk| trk.points())
            .find_map(|pt| pt.time)
            .ok_or(ConvertError::MissingStartTime)
    }

    /// The track both encoders operate on. Files with more than one track are
    /// out of scope; only the first is converted.
    pub fn first_track(&self) -> Option<&GpxTrack> {
        self.tracks.first()
    }
}

/// A GPX track (<trk>).
#[derive(Debug, Default)]
pub struct GpxTrack {
    pub name: Option<String>,
    pub segments: Vec<GpxSegment>,
}

impl GpxTrack {
    /// All points of the track, flattened across segments in document order.
    pub fn points(&self) -> impl Iterator<Item = &GpxPoint> {
        self.segments.iter().flat_map(|seg| seg.points.iter())
    }
}

/// A GPX track segment (<trkseg>).
#[derive(Debug, Default)]
pub struct GpxSegment {
    pub points: Vec<GpxPoint>,
}

/// A single track point (<trkpt>).
#[derive(Debug, Clone)]
pub struct GpxPoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    pub time: Option<DateTime<FixedOffset>>,
}

impl GpxPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
        }
    }
}
