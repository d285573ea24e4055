use chrono::{DateTime, FixedOffset};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ConvertError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, ConvertError>;

/// The GPX 1.1 namespace all well-formed inputs declare.
pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

/// Namespaces accepted on the root element. Elements are matched by local
/// name, so GPX 1.0 files parse as well.
const KNOWN_NAMESPACES: &[&str] = &[GPX_NAMESPACE, "http://www.topografix.com/GPX/1/0"];

/// Parse a GPX XML string into a GpxDocument.
pub fn parse_gpx(xml: &str) -> Result<GpxDocument> {
    let mut reader = Reader::from_str(xml);
    let mut doc = GpxDocument::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"gpx" => check_namespace(&e),
                b"metadata" => {
                    let time = parse_metadata(&mut reader)?;
                    if doc.metadata_time.is_none() {
                        doc.metadata_time = time;
                    }
                }
                b"trk" => doc.tracks.push(parse_track(&mut reader)?),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(doc)
}

/// Warn about root namespaces outside the known GPX table. Parsing continues
/// since element matching is by local name.
fn check_namespace(e: &BytesStart<'_>) {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"xmlns" {
            let ns = std::str::from_utf8(&attr.value).unwrap_or_default();
            if !KNOWN_NAMESPACES.contains(&ns) {
                log::warn!("unrecognized GPX namespace '{ns}', parsing by local name");
            }
        }
    }
}

/// Parse a <metadata> element, returning its first <time> descendant. The
/// time may sit at any depth, so other children are walked through instead of
/// skipped wholesale.
fn parse_metadata<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Option<DateTime<FixedOffset>>> {
    let mut time = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"time" {
                    let text = read_text_owned(reader, &e)?;
                    if time.is_none() {
                        time = Some(parse_timestamp(&text)?);
                    }
                } else {
                    depth += 1;
                }
            }
            Ok(Event::End(_)) if depth > 0 => depth -= 1,
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(time)
}

/// Parse a <trk> element.
fn parse_track<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxTrack> {
    let mut track = GpxTrack::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => track.name = Some(read_text_owned(reader, &e)?),
                b"trkseg" => {
                    let seg = parse_segment(reader)?;
                    if !seg.points.is_empty() {
                        track.segments.push(seg);
                    }
                }
                _ => {
                    reader.read_to_end(e.name()).map_err(ConvertError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trk" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(track)
}

/// Parse a <trkseg> element.
fn parse_segment<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxSegment> {
    let mut segment = GpxSegment::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => segment.points.push(parse_point(&e, reader)?),
                _ => {
                    reader.read_to_end(e.name()).map_err(ConvertError::XmlParse)?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"trkpt" {
                    let (lat, lon) = parse_lat_lon(&e)?;
                    segment.points.push(GpxPoint::new(lat, lon));
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trkseg" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(segment)
}

/// Parse lat/lon attributes from a <trkpt> start tag. Both are required and
/// must be numeric.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| ConvertError::XmlParse(e.into()))?;
        let key = attr.key.local_name();
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match key.as_ref() {
            b"lat" => {
                lat = Some(val.parse::<f64>().map_err(|_| {
                    ConvertError::MalformedPoint {
                        attribute: "lat",
                        value: Some(val.to_string()),
                    }
                })?);
            }
            b"lon" => {
                lon = Some(val.parse::<f64>().map_err(|_| {
                    ConvertError::MalformedPoint {
                        attribute: "lon",
                        value: Some(val.to_string()),
                    }
                })?);
            }
            _ => {}
        }
    }

    let lat = lat.ok_or(ConvertError::MalformedPoint {
        attribute: "lat",
        value: None,
    })?;
    let lon = lon.ok_or(ConvertError::MalformedPoint {
        attribute: "lon",
        value: None,
    })?;

    Ok((lat, lon))
}

/// Parse a <trkpt> element and its children. Called after receiving
/// Event::Start for the point element.
fn parse_point<'a>(start: &BytesStart<'a>, reader: &mut Reader<&'a [u8]>) -> Result<GpxPoint> {
    let (lat, lon) = parse_lat_lon(start)?;
    let mut point = GpxPoint::new(lat, lon);
    let end_name = start.name().0.to_vec(); // own the end tag name for comparison

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => {
                    let text = read_text_owned(reader, &e)?;
                    point.ele = text.trim().parse::<f64>().ok();
                    if point.ele.is_none() {
                        log::debug!("ignoring non-numeric elevation '{}'", text.trim());
                    }
                }
                b"time" => {
                    let text = read_text_owned(reader, &e)?;
                    point.time = Some(parse_timestamp(&text)?);
                }
                _ => {
                    // Skip unknown/extensions elements
                    reader.read_to_end(e.name()).map_err(ConvertError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(point)
}

/// Parse the ISO-8601 date-time strings GPX uses (e.g. `2013-05-01T12:00:00Z`).
fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = text.trim();
    DateTime::parse_from_rfc3339(trimmed).map_err(|e| ConvertError::TimestampParse {
        value: trimmed.to_string(),
        source: e,
    })
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let raw = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(raw);
            }
            Ok(Event::CData(e)) => {
                let s = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(s);
            }
            Ok(Event::GeneralRef(e)) => {
                // Character references (&#60; &#x3C;) and predefined entities
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    let name = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                    match name {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {} // Unknown entity, skip
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(text)
}
