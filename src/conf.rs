//! Viewer calibration: field-of-view and yaw bounds and current values.
//!
//! Serialized with the backend's camelCase names (including the historical
//! `minFor` spelling) so responses and updates round-trip unchanged.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric viewer state for one scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scene View")]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConf {
    /// Backend id of the conf record, if it has been saved.
    #[schemars(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Lower horizontal field-of-view bound.
    #[schemars(title = "Min FOV", range(min = 1.0, max = 180.0))]
    pub min_for: f64,
    /// Upper horizontal field-of-view bound.
    #[schemars(title = "Max FOV", range(min = 1.0, max = 180.0))]
    pub max_fov: f64,
    /// Current horizontal field of view.
    #[schemars(title = "FOV", range(min = 1.0, max = 180.0))]
    pub fov_val: f64,
    /// Lower vertical field-of-view bound (pitch).
    #[schemars(title = "Min Vertical FOV", range(min = -90.0, max = 90.0))]
    pub min_vertical_fov: f64,
    /// Upper vertical field-of-view bound (pitch).
    #[schemars(title = "Max Vertical FOV", range(min = -90.0, max = 90.0))]
    pub max_vertical_fov: f64,
    /// Current vertical angle.
    #[schemars(title = "Vertical FOV", range(min = -90.0, max = 90.0))]
    pub vertical_fov_val: f64,
    /// Lower yaw bound.
    #[schemars(title = "Min Yaw", range(min = -180.0, max = 180.0))]
    pub yaw_min: f64,
    /// Upper yaw bound.
    #[schemars(title = "Max Yaw", range(min = -180.0, max = 180.0))]
    pub yaw_max: f64,
    /// Current yaw.
    #[schemars(title = "Yaw", range(min = -180.0, max = 180.0))]
    pub yaw_val: f64,
}

impl Default for SceneConf {
    fn default() -> Self {
        Self {
            id: None,
            min_for: 1.0,
            max_fov: 100.0,
            fov_val: 50.0,
            min_vertical_fov: -90.0,
            max_vertical_fov: 90.0,
            vertical_fov_val: 0.0,
            yaw_min: -180.0,
            yaw_max: 180.0,
            yaw_val: 0.0,
        }
    }
}

/// Partial update for [`SceneConf`]. `None` fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfPatch {
    /// Backend record id.
    pub id: Option<i64>,
    /// Lower horizontal FOV bound.
    pub min_for: Option<f64>,
    /// Upper horizontal FOV bound.
    pub max_fov: Option<f64>,
    /// Current horizontal FOV.
    pub fov_val: Option<f64>,
    /// Lower vertical FOV bound.
    pub min_vertical_fov: Option<f64>,
    /// Upper vertical FOV bound.
    pub max_vertical_fov: Option<f64>,
    /// Current vertical FOV.
    pub vertical_fov_val: Option<f64>,
    /// Lower yaw bound.
    pub yaw_min: Option<f64>,
    /// Upper yaw bound.
    pub yaw_max: Option<f64>,
    /// Current yaw.
    pub yaw_val: Option<f64>,
}

impl SceneConf {
    /// Wire names of every field in the default shape.
    pub const FIELDS: [&str; 10] = [
        "id",
        "minFor",
        "maxFov",
        "fovVal",
        "minVerticalFov",
        "maxVerticalFov",
        "verticalFovVal",
        "yawMin",
        "yawMax",
        "yawVal",
    ];

    /// Generate JSON Schema describing the editable conf fields.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(SceneConf)
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Shallow merge of the fields present in `patch`.
    pub fn merge(&mut self, patch: SceneConfPatch) {
        let SceneConfPatch {
            id,
            min_for,
            max_fov,
            fov_val,
            min_vertical_fov,
            max_vertical_fov,
            vertical_fov_val,
            yaw_min,
            yaw_max,
            yaw_val,
        } = patch;
        if id.is_some() {
            self.id = id;
        }
        let pairs = [
            (&mut self.min_for, min_for),
            (&mut self.max_fov, max_fov),
            (&mut self.fov_val, fov_val),
            (&mut self.min_vertical_fov, min_vertical_fov),
            (&mut self.max_vertical_fov, max_vertical_fov),
            (&mut self.vertical_fov_val, vertical_fov_val),
            (&mut self.yaw_min, yaw_min),
            (&mut self.yaw_max, yaw_max),
            (&mut self.yaw_val, yaw_val),
        ];
        for (slot, value) in pairs {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }

    /// Read a field by wire name.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn field(&self, key: &str) -> Option<f64> {
        match key {
            "id" => self.id.map(|id| id as f64),
            _ => self.field_ref(key).copied(),
        }
    }

    /// Write a field by wire name. Returns `false` for unknown keys and for
    /// an `id` that is not a whole number.
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn set_field(&mut self, key: &str, value: f64) -> bool {
        if key == "id" {
            if value.fract() != 0.0 || !value.is_finite() {
                return false;
            }
            self.id = Some(value as i64);
            return true;
        }
        match self.field_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Copy the default-shape fields of a conf response into `self`.
    ///
    /// Each value is coerced to a number; `null` and missing keys are
    /// skipped, and keys outside the default shape are ignored.
    pub fn apply_response(&mut self, data: &Value) {
        let Some(obj) = data.as_object() else {
            return;
        };
        for key in Self::FIELDS {
            let Some(raw) = obj.get(key).filter(|v| !v.is_null()) else {
                continue;
            };
            match coerce_number(raw) {
                Some(n) if self.set_field(key, n) => {}
                _ => log::warn!("ignoring non-numeric conf value {key}={raw}"),
            }
        }
    }

    fn field_ref(&self, key: &str) -> Option<&f64> {
        Some(match key {
            "minFor" => &self.min_for,
            "maxFov" => &self.max_fov,
            "fovVal" => &self.fov_val,
            "minVerticalFov" => &self.min_vertical_fov,
            "maxVerticalFov" => &self.max_vertical_fov,
            "verticalFovVal" => &self.vertical_fov_val,
            "yawMin" => &self.yaw_min,
            "yawMax" => &self.yaw_max,
            "yawVal" => &self.yaw_val,
            _ => return None,
        })
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut f64> {
        Some(match key {
            "minFor" => &mut self.min_for,
            "maxFov" => &mut self.max_fov,
            "fovVal" => &mut self.fov_val,
            "minVerticalFov" => &mut self.min_vertical_fov,
            "maxVerticalFov" => &mut self.max_vertical_fov,
            "verticalFovVal" => &mut self.vertical_fov_val,
            "yawMin" => &mut self.yaw_min,
            "yawMax" => &mut self.yaw_max,
            "yawVal" => &mut self.yaw_val,
            _ => return None,
        })
    }
}

/// Numbers pass through, numeric strings are parsed (blank reads as 0),
/// booleans map to 0/1. Anything else is not a number.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse().ok().filter(|n: &f64| !n.is_nan())
            }
        }
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}
