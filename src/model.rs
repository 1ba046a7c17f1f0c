//! Scene records exchanged with the scene API.
//!
//! Only [`SceneBaseInfo`] and [`SceneGroup`] have a shape the store relies
//! on. Everything else is kept as opaque JSON, replaced wholesale on each
//! fetch.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One scene entry of a scene list or group. Opaque.
pub type SceneSummary = Value;

/// Resource bundle of a scene (images, hotspots, ...). Opaque.
pub type SceneResource = Value;

/// Project the scene belongs to, set by the host UI. Opaque.
pub type ProjectInfo = Value;

/// Editable scene metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneBaseInfo {
    /// Display name.
    pub scene_name: String,
    /// Capture or publication date as sent by the backend.
    pub scene_date: String,
    /// Free-form description.
    pub description: String,
    /// Any further fields the backend returned (id, cover, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial update for [`SceneBaseInfo`]. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneBaseInfoPatch {
    /// New display name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub scene_name: Option<String>,
    /// New date.
    #[serde(default, deserialize_with = "lenient_string")]
    pub scene_date: Option<String>,
    /// New description.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    /// Extra fields to write over the existing ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SceneBaseInfo {
    /// Shallow merge: every field present in `patch` replaces the current
    /// value.
    pub fn merge(&mut self, patch: SceneBaseInfoPatch) {
        if let Some(name) = patch.scene_name {
            self.scene_name = name;
        }
        if let Some(date) = patch.scene_date {
            self.scene_date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.extra.extend(patch.extra);
    }
}

/// Folder-like grouping node holding scenes and nested groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneGroup {
    /// Scenes placed directly in this group.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub scene_list: Vec<SceneSummary>,
    /// Nested groups.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub scene_group_list: Vec<SceneGroup>,
    /// Group id, name and whatever else the backend sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SceneGroup {
    /// Group with the given direct scenes and subgroups.
    #[must_use]
    pub fn new(
        scene_list: Vec<SceneSummary>,
        scene_group_list: Vec<SceneGroup>,
    ) -> Self {
        Self {
            scene_list,
            scene_group_list,
            extra: Map::new(),
        }
    }

    /// Number of scenes in this group and all nested groups.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scene_list.len()
            + self
                .scene_group_list
                .iter()
                .map(SceneGroup::scene_count)
                .sum::<usize>()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts strings, numbers and booleans (dates often arrive as epoch
/// millis). `null` reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
