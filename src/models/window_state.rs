use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_WIDTH: u32 = 1100;
pub const DEFAULT_HEIGHT: u32 = 800;
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.0;

/// Last known geometry and zoom of the main window, as stored in `state.json`.
///
/// Each field is read on its own: a null or mistyped value falls back to that field's
/// default without discarding the rest of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
    pub zoom_factor: f64,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
        }
    }
}

fn field<T: DeserializeOwned>(record: &Map<String, Value>, key: &str) -> Option<T> {
    record.get(key).and_then(|value| T::deserialize(value).ok())
}

impl WindowState {
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            x: field(record, "x"),
            y: field(record, "y"),
            width: field(record, "width").unwrap_or(defaults.width),
            height: field(record, "height").unwrap_or(defaults.height),
            zoom_factor: field(record, "zoomFactor").unwrap_or(defaults.zoom_factor),
        }
    }

    /// Width to request, treating a zero width as "unset".
    pub fn width_or_default(&self) -> u32 {
        if self.width == 0 {
            DEFAULT_WIDTH
        } else {
            self.width
        }
    }

    pub fn height_or_default(&self) -> u32 {
        if self.height == 0 {
            DEFAULT_HEIGHT
        } else {
            self.height
        }
    }

    pub fn zoom_or_default(&self) -> f64 {
        if self.zoom_factor.is_finite() && self.zoom_factor > 0.0 {
            self.zoom_factor
        } else {
            DEFAULT_ZOOM_FACTOR
        }
    }

    /// The raw JSON record written when nothing usable is on disk.
    pub fn default_record() -> Map<String, Value> {
        match serde_json::to_value(Self::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

impl<'de> Deserialize<'de> for WindowState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_record(&record))
    }
}

/// A partial update merged over the persisted record. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_factor: Option<f64>,
}

impl StatePatch {
    pub fn to_record(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
