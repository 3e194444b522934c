use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Which category of payload a request carries. Selects the target
/// directory and the filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Data,
    Log,
}

impl RecordKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            RecordKind::Data => "data",
            RecordKind::Log => "log",
        }
    }
}

/// One inbound push payload. Lives only for the duration of the
/// request: the file written by the sink is the only durable copy.
#[derive(Debug)]
pub struct IngestRecord {
    pub received_at: OffsetDateTime,
    pub raw_payload: String,
    pub parsed_payload: Option<Map<String, Value>>,
}

impl IngestRecord {
    /// Builds a record from a raw body, attempting a best-effort JSON
    /// parse. Parse failure never blocks ingestion: the raw bytes stay
    /// the source of truth and the parsed field is simply null.
    pub fn from_raw(raw_payload: String, received_at: OffsetDateTime) -> IngestRecord {
        let parsed_payload = try_parse_json(&raw_payload);
        IngestRecord {
            received_at,
            raw_payload,
            parsed_payload,
        }
    }

    /// The JSON envelope written to disk for wrapped records.
    pub fn to_envelope_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Envelope {
            received_at: self.received_at,
            raw_json: &self.raw_payload,
            parsed_data: &self.parsed_payload,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    #[serde(with = "time::serde::rfc3339")]
    received_at: OffsetDateTime,
    raw_json: &'a str,
    parsed_data: &'a Option<Map<String, Value>>,
}

/// Best-effort parse of a body as a JSON object. Anything else
/// (arrays, scalars, malformed text) yields None.
pub fn try_parse_json(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(map) => Some(map),
        Err(err) => {
            tracing::warn!(
                "failed to parse JSON payload, raw data will still be saved: {}",
                err
            );
            None
        }
    }
}

/// Advisory check only: decides whether to look for a Topic element,
/// never whether to persist.
pub fn looks_like_xml(content_type: Option<&str>, raw: &str) -> bool {
    content_type.is_some_and(|ct| ct.contains("xml")) || raw.trim_start().starts_with('<')
}

/// Pulls the text of the first Topic element out of an XML body, for
/// logging only. Cameras wrap the event name in a (possibly
/// namespace-prefixed) Topic element of their SOAP notification.
pub fn extract_xml_topic(raw: &str) -> Option<&str> {
    let open = match raw.find("<Topic") {
        Some(at) => at,
        None => raw.find(":Topic")?,
    };
    let rest = &raw[open..];
    let start = rest.find('>')? + 1;
    let end = rest[start..].find("</")?;
    let value = rest[start..start + end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
