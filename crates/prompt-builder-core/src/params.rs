//! Sparse share parameters.
//!
//! A share link carries the draft in a single `d` query parameter holding
//! only the fields that differ from their defaults, plus a `vld=1` marker.
//! A draft with nothing worth sharing produces no parameters at all.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use url::form_urlencoded;

use prompt_builder_types::draft::PromptDraft;

use crate::codec::projection::{CanonicalPayload, project, reconstitute};
use crate::codec::text;

/// Query key for the compressed payload.
pub const DATA_PARAM: &str = "d";

/// Query key for the validity marker.
pub const VALID_PARAM: &str = "vld";

/// The search parameters of a share link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareParams {
    pub d: Option<String>,
    pub vld: bool,
}

impl ShareParams {
    pub fn is_empty(&self) -> bool {
        self.d.is_none()
    }

    /// Whether a client should try to restore a draft from these parameters.
    pub fn should_decode(&self) -> bool {
        self.vld && self.d.is_some()
    }

    /// Render as `d=...&vld=1`, or an empty string when there is no payload.
    pub fn to_query_string(&self) -> String {
        let Some(d) = self.d.as_deref() else {
            return String::new();
        };
        form_urlencoded::Serializer::new(String::new())
            .append_pair(DATA_PARAM, d)
            .append_pair(VALID_PARAM, if self.vld { "1" } else { "0" })
            .finish()
    }

    /// Parse a query string, with or without a leading `?`.
    ///
    /// Unknown keys are ignored. An empty `d` counts as absent.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                DATA_PARAM if !value.is_empty() => params.d = Some(value.into_owned()),
                VALID_PARAM => params.vld = value == "1",
                _ => {}
            }
        }
        params
    }
}

/// Project a draft into sparse share parameters.
///
/// Every canonical field equal to its default, or empty, is dropped. The
/// remaining map is serialized with sorted keys and compressed into `d`.
pub fn to_search_params(draft: &PromptDraft) -> ShareParams {
    let sparse = sparse_fields(&project(draft));
    if sparse.is_empty() {
        return ShareParams::default();
    }

    match serde_json::to_string(&sparse) {
        Ok(json) => ShareParams {
            d: Some(text::compress(&json)),
            vld: true,
        },
        Err(err) => {
            tracing::error!("failed to serialize share params: {err}");
            ShareParams::default()
        }
    }
}

/// Restore a draft from share parameters. Never fails.
///
/// A missing, undecompressable or malformed `d` yields the default draft.
pub fn from_search_params(params: &ShareParams) -> PromptDraft {
    let value = params
        .d
        .as_deref()
        .map(text::decompress)
        .filter(|json| !json.is_empty())
        .and_then(|json| match serde_json::from_str::<Value>(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!("share param payload is not JSON: {err}");
                None
            }
        })
        .unwrap_or_else(|| Value::Object(Map::new()));

    reconstitute(CanonicalPayload::from_value_lenient(&value))
}

fn sparse_fields(payload: &CanonicalPayload) -> BTreeMap<String, Value> {
    let (Ok(Value::Object(fields)), Ok(Value::Object(defaults))) = (
        serde_json::to_value(payload),
        serde_json::to_value(CanonicalPayload::default()),
    ) else {
        return BTreeMap::new();
    };

    fields
        .into_iter()
        .filter(|(key, value)| !is_blank(value) && defaults.get(key) != Some(value))
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
