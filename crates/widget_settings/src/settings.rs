//! Typed widget settings

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Horizontal alignment of widget content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Layout direction of widget content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    Column,
}

impl FlexDirection {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "row" => Some(Self::Row),
            "column" => Some(Self::Column),
            _ => None,
        }
    }
}

/// Style and content settings for one widget.
///
/// The recognized style keys are named fields; everything else a consumer
/// stored (free-form content keys like `welcomeMessage`, button texts) is
/// kept verbatim in `extra`, so unknown keys survive an edit round-trip.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_direction: Option<FlexDirection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl WidgetSettings {
    /// Build typed settings from a decoded JSON object.
    ///
    /// A recognized key whose value has the wrong shape (a numeric
    /// `borderWidth`, an off-list `alignment`) is not an error: the raw
    /// value is kept in `extra` and the named field falls back to default,
    /// so one odd key never discards the rest of the blob.
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut settings = Self::default();

        for (key, value) in map {
            let recognized = match key.as_str() {
                "backgroundColor" => take_string(&mut settings.background_color, &value),
                "textColor" => take_string(&mut settings.text_color, &value),
                "borderColor" => take_string(&mut settings.border_color, &value),
                "borderWidth" => take_string(&mut settings.border_width, &value),
                "padding" => take_string(&mut settings.padding, &value),
                "alignment" => match value.as_str().and_then(Alignment::parse) {
                    Some(alignment) => {
                        settings.alignment = Some(alignment);
                        true
                    }
                    None => false,
                },
                "flexDirection" => match value.as_str().and_then(FlexDirection::parse) {
                    Some(direction) => {
                        settings.flex_direction = Some(direction);
                        true
                    }
                    None => false,
                },
                _ => false,
            };

            if !recognized {
                settings.extra.insert(key, value);
            }
        }

        settings
    }

    /// Whether nothing is set (the fail-open decode result).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn take_string(field: &mut Option<String>, value: &Value) -> bool {
    match value {
        Value::String(s) => {
            *field = Some(s.clone());
            true
        }
        _ => false,
    }
}
