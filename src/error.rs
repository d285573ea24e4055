use thiserror::Error;

/// Errors produced while parsing GPX input or encoding an output record.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// A `<trkpt>` is missing a required attribute or carries a non-numeric
    /// value for it.
    #[error("malformed track point: bad '{attribute}' attribute (value: {value:?})")]
    MalformedPoint {
        attribute: &'static str,
        value: Option<String>,
    },

    #[error("failed to parse timestamp '{value}': {source}")]
    TimestampParse {
        value: String,
        source: chrono::ParseError,
    },

    /// Neither `<metadata><time>` nor any track point time is present.
    #[error("no start time found in GPX document")]
    MissingStartTime,

    /// The track has no `<name>` element (required for GeoJSON output only).
    #[error("no track name found in GPX document")]
    MissingTrackName,
}
