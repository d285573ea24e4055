use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::Config;
use crate::formats::runkeeper::ActivityRecord;

/// Input name the Temboo RecordActivity choreo expects.
const ACTIVITY_INPUT_NAME: &str = "Activity";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("request serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("upload transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upload rejected with HTTP status {0}")]
    Http(reqwest::StatusCode),
}

fn upload_url(account: &str) -> String {
    format!(
        "https://{account}.temboolive.com/temboo-api/1.0/choreos/Library/RunKeeper/FitnessActivities/RecordActivity"
    )
}

/// Wrap an activity record into a Temboo choreo request body. The record
/// itself travels as a JSON string inside the input value.
pub fn build_request_body(
    activity: &ActivityRecord,
    preset: &str,
) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "preset": preset,
        "inputs": [{
            "name": ACTIVITY_INPUT_NAME,
            "value": serde_json::to_string(activity)?,
        }],
    }))
}

/// Send an activity record to RunKeeper via the Temboo choreo. No retries;
/// transport and HTTP failures surface to the caller.
pub fn send_activity(activity: &ActivityRecord, config: &Config) -> Result<(), UploadError> {
    let temboo = &config.temboo;
    let body = build_request_body(activity, &temboo.preset_name)?;

    let client = reqwest::blocking::Client::new();
    let response = client
        .post(upload_url(&temboo.account_name))
        .basic_auth(&temboo.app_key_name, Some(&temboo.app_key_value))
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .header("x-temboo-domain", format!("/{}/master", temboo.account_name))
        .json(&body)
        .send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(UploadError::Http(status));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpx_to_runkeeper;
    use serde_json::Map;

    const GPX: &str = r#"<?xml version="1.0"?>
<gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1">
  <metadata><time>2013-05-01T12:00:00Z</time></metadata>
  <trk>
    <trkseg>
      <trkpt lat="45.0" lon="-122.0"><time>2013-05-01T12:00:00Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_request_body_shape() {
        let activity = gpx_to_runkeeper(GPX, &Map::new()).unwrap();
        let body = build_request_body(&activity, "my-preset").unwrap();

        assert_eq!(body["preset"], "my-preset");
        let inputs = body["inputs"].as_array().unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0]["name"], "Activity");

        // The value is a JSON string encoding the full record
        let inner: Value = serde_json::from_str(inputs[0]["value"].as_str().unwrap()).unwrap();
        assert_eq!(inner["type"], "Running");
        assert_eq!(inner["path"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_upload_url() {
        assert_eq!(
            upload_url("acme"),
            "https://acme.temboolive.com/temboo-api/1.0/choreos/Library/RunKeeper/FitnessActivities/RecordActivity"
        );
    }
}
