//! Blob decode/encode
//!
//! Decoding never fails: any blob that cannot be read as a JSON object
//! yields default settings. Encoding writes strict JSON only, so the
//! legacy repair heuristic applies to old rows and never to anything this
//! codec has written.

use crate::error::Result;
use crate::settings::WidgetSettings;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// A word immediately followed by a colon: the unquoted-key convention of
/// legacy blobs.
static BARE_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)\s*:").unwrap());

/// Decode a stored blob into typed settings. Never fails; the worst case
/// is all-default settings.
pub fn decode(raw: Option<&str>) -> WidgetSettings {
    WidgetSettings::from_map(decode_value(raw))
}

/// Decode a stored blob into the raw key-agnostic mapping, for consumers
/// that read ad-hoc content keys directly.
///
/// Steps, each failing open to an empty mapping:
/// 1. strip NUL and control characters (C0 except JSON whitespace, DEL,
///    and the C1 range) left behind by copy-paste or storage corruption;
/// 2. trim;
/// 3. reject anything not starting with `{` or `[` — plain-text content
///    is not structured data and must not reach the repair heuristic;
/// 4. parse as strict JSON; only when that fails, run the legacy repair
///    and parse again;
/// 5. reject non-object parse results.
pub fn decode_value(raw: Option<&str>) -> Map<String, Value> {
    let Some(raw) = raw else {
        return Map::new();
    };

    let cleaned = strip_control_chars(raw);
    let trimmed = cleaned.trim();

    if trimmed.is_empty() || !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Map::new();
    }

    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(strict_err) => {
            let repaired = repair_legacy_blob(trimmed);
            match serde_json::from_str::<Value>(&repaired) {
                Ok(value) => {
                    warn!(
                        "Widget settings blob required legacy repair (strict parse: {})",
                        strict_err
                    );
                    value
                }
                Err(e) => {
                    debug!("Widget settings blob unreadable after repair: {}", e);
                    return Map::new();
                }
            }
        }
    };

    match value {
        Value::Object(map) => map,
        other => {
            debug!(
                "Widget settings blob parsed to non-object ({}), ignoring",
                kind_name(&other)
            );
            Map::new()
        }
    }
}

/// Encode settings as canonical strict JSON for persistence.
pub fn encode(settings: &WidgetSettings) -> Result<String> {
    Ok(serde_json::to_string(settings)?)
}

/// Compatibility shim for rows written before the strict-JSON contract:
/// single quotes become double quotes and bare object keys get quoted.
///
/// Known data-integrity risk: the substitutions are textual, so a string
/// *value* containing an apostrophe or a colon-preceded word is corrupted
/// (usually into an unparseable blob, which then decodes to defaults).
/// Strict blobs never reach this path.
fn repair_legacy_blob(raw: &str) -> String {
    let double_quoted = raw.replace('\'', "\"");
    BARE_KEY_RE
        .replace_all(&double_quoted, "\"${1}\":")
        .into_owned()
}

/// Drop NUL, the C0 controls (keeping `\t`, `\n`, `\r`, which are legal
/// JSON whitespace), DEL, and the C1 range.
fn strip_control_chars(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
