//! Store configuration with TOML file support.
//!
//! Every section uses `#[serde(default)]` so a partial file (e.g. only
//! overriding `base_url`) works.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PanoError;

/// Top-level configuration for the scene API and store keying.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Path prefix of the public shared-view pages.
    pub share_prefix: String,
    /// Prefix of every scene key.
    pub key_prefix: String,
    /// Scene id used when the route carries none.
    pub default_scene_id: String,
    /// Envelope `code` that means success.
    pub success_code: i64,
    /// Bearer token for owner-mode requests.
    pub token: Option<String>,
    /// Endpoint paths.
    pub paths: ApiPaths,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:48080/admin-api".to_owned(),
            share_prefix: "/panoramicView".to_owned(),
            key_prefix: "panoramic_".to_owned(),
            default_scene_id: "default".to_owned(),
            success_code: 0,
            token: None,
            paths: ApiPaths::default(),
        }
    }
}

/// Endpoint paths of the scene API, paired owner/share per operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiPaths {
    /// Full group tree (owner).
    pub group_all: String,
    /// Group tree of a shared view.
    pub share_group_tree: String,
    /// Paged scene list (owner).
    pub scene_list: String,
    /// Scene list of a shared view.
    pub share_scene_list: String,
    /// Resources of one scene (owner).
    pub resource_list: String,
    /// Resources of one scene in a shared view.
    pub share_resource_list: String,
    /// Scene metadata (owner only).
    pub scene: String,
    /// Viewer conf of one scene (owner).
    pub conf: String,
    /// Viewer conf of one scene in a shared view.
    pub share_conf: String,
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self {
            group_all: "/system/scene/scene-all".to_owned(),
            share_group_tree: "/system/scene/share/group-tree".to_owned(),
            scene_list: "/system/scene/page".to_owned(),
            share_scene_list: "/system/scene/share/list".to_owned(),
            resource_list: "/system/scene/resource/list".to_owned(),
            share_resource_list: "/system/scene/share/resource/list".to_owned(),
            scene: "/system/scene/get".to_owned(),
            conf: "/system/scene/conf/get".to_owned(),
            share_conf: "/system/scene/share/conf/get".to_owned(),
        }
    }
}

impl StoreConfig {
    /// Load config from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, PanoError> {
        let content = std::fs::read_to_string(path).map_err(PanoError::Io)?;
        toml::from_str(&content)
            .map_err(|e| PanoError::ConfigParse(e.to_string()))
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, PanoError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), PanoError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PanoError::ConfigParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PanoError::Io)?;
        }
        std::fs::write(path, content).map_err(PanoError::Io)
    }
}
