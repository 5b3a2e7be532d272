//! Versioned envelope codec for share links.
//!
//! Current payloads are `{"version": 3, "data": <canonical payload>}`,
//! compressed with [`text::compress`]. Legacy (version 1) links carry the
//! bare object with no `version` key. Both decode to the same draft.
//!
//! Decoding never panics: every failure comes back as a [`DecodeError`].

use serde::Serialize;
use serde_json::{Map, Value};

use prompt_builder_types::draft::PromptDraft;
use prompt_builder_types::error::DecodeError;

use crate::codec::projection::{CanonicalPayload, project, reconstitute};
use crate::codec::text;
use crate::fingerprint::fingerprint;
use crate::service::hash::ContentHasher;

/// Version written by [`encode`].
pub const CURRENT_ENVELOPE_VERSION: u32 = 3;

/// Version reported for bare, unwrapped payloads.
pub const LEGACY_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    data: &'a CanonicalPayload,
}

/// A parsed payload, classified by wire format.
#[derive(Debug, Clone, PartialEq)]
pub enum WirePayload {
    /// Bare object without a `version` key.
    Legacy(Map<String, Value>),
    /// `{version, data}` wrapper.
    Envelope { version: u32, data: Map<String, Value> },
}

impl WirePayload {
    pub fn version(&self) -> u32 {
        match self {
            WirePayload::Legacy(_) => LEGACY_VERSION,
            WirePayload::Envelope { version, .. } => *version,
        }
    }

    fn into_data(self) -> Map<String, Value> {
        match self {
            WirePayload::Legacy(data) | WirePayload::Envelope { data, .. } => data,
        }
    }
}

/// A successfully decoded share payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDraft {
    /// Wire version the payload was written with.
    pub version: u32,
    /// Reconstituted draft; `id` is its content fingerprint.
    pub draft: PromptDraft,
}

/// Wrap, serialize and compress a canonical payload.
pub fn encode(payload: &CanonicalPayload) -> String {
    let envelope = Envelope {
        version: CURRENT_ENVELOPE_VERSION,
        data: payload,
    };
    match serde_json::to_string(&envelope) {
        Ok(json) => text::compress(&json),
        Err(err) => {
            tracing::error!("failed to serialize envelope: {err}");
            String::new()
        }
    }
}

/// Project a draft and encode it.
pub fn encode_draft(draft: &PromptDraft) -> String {
    encode(&project(draft))
}

/// Sort a parsed JSON value into one of the known wire formats.
pub fn classify(value: Value) -> Result<WirePayload, DecodeError> {
    let Value::Object(mut map) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let version = match map.remove("version") {
        None | Some(Value::Null) => return Ok(WirePayload::Legacy(map)),
        Some(raw) => parse_version(&raw)?,
    };

    match version {
        0 => Err(DecodeError::InvalidVersion),
        v if v <= u64::from(CURRENT_ENVELOPE_VERSION) => {
            let version = v as u32;
            match map.remove("data") {
                Some(Value::Object(data)) => Ok(WirePayload::Envelope { version, data }),
                _ => Err(DecodeError::MissingData(version)),
            }
        }
        other => Err(DecodeError::UnsupportedVersion(other)),
    }
}

/// Decode a share payload back into a draft.
///
/// The draft restarts at step 1 with no examples and no finish time, and its
/// `id` is set to the content fingerprint.
pub fn decode<H: ContentHasher + ?Sized>(
    blob: &str,
    hasher: &H,
) -> Result<DecodedDraft, DecodeError> {
    let json = text::decompress(blob.trim());
    if json.trim().is_empty() {
        return Err(DecodeError::Empty);
    }

    let value: Value =
        serde_json::from_str(&json).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    let payload = classify(value)?;
    let version = payload.version();

    let canonical = CanonicalPayload::from_value_lenient(&Value::Object(payload.into_data()));
    let mut draft = reconstitute(canonical);
    draft.id = Some(fingerprint(&draft, hasher));

    tracing::debug!(version, id = draft.id.as_deref(), "decoded share payload");
    Ok(DecodedDraft { version, draft })
}

fn parse_version(raw: &Value) -> Result<u64, DecodeError> {
    raw.as_u64()
        .or_else(|| raw.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or(DecodeError::InvalidVersion)
}
