//! Per-scene state container.
//!
//! A [`SceneStore`] holds everything the viewer/editor UI shows for one
//! scene and mediates every read of remote data through its [`SceneApi`]
//! strategy. Fetch actions perform their request without holding the state
//! lock and write the result afterwards, so overlapping calls of the same
//! action resolve last-response-wins.
//!
//! The route and strategy are not fixed: navigating to another route with
//! the same scene key rebinds them ([`SceneStore::rebind`]) while the state
//! stays.
//!
//! Every mutation bumps a generation counter; UI layers poll
//! [`SceneStore::is_dirty`] instead of subscribing to individual fields.

use std::sync::{Arc, Mutex};

use crate::api::{ApiMode, SceneApi, SceneId};
use crate::conf::{SceneConf, SceneConfPatch};
use crate::error::PanoError;
use crate::model::{
    ProjectInfo, SceneBaseInfo, SceneBaseInfoPatch, SceneGroup, SceneResource,
    SceneSummary,
};
use crate::route::{Params, Route};
use crate::tree::filter_empty_groups;
use crate::util::lock::lock;

/// Snapshot of a store's fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneState {
    /// Viewer should jump back to the saved position.
    pub is_reset_position: bool,
    /// Editor has pending changes to diff against the backend.
    pub diff_update: bool,
    /// Group tree as last fetched.
    pub scene_group: Vec<SceneGroup>,
    /// Group tree without empty branches.
    pub filtered_scene_group: Vec<SceneGroup>,
    /// Scene list as last fetched.
    pub scene_list: Vec<SceneSummary>,
    /// Resources of the current scene.
    pub scene_resource: Option<SceneResource>,
    /// Project the scene belongs to.
    pub project_info: Option<ProjectInfo>,
    /// Scene metadata.
    pub base_info: SceneBaseInfo,
    /// Live, editable viewer conf.
    pub scene_conf: SceneConf,
    /// Conf as it was right after the last load. `None` until then.
    pub origin_scene_conf: Option<SceneConf>,
}

struct Tracked {
    state: SceneState,
    generation: u64,
    seen_generation: u64,
}

/// Route the store currently serves and the strategy derived from it.
struct Binding {
    route: Route,
    api: Arc<dyn SceneApi>,
}

/// State container for one scene key.
pub struct SceneStore {
    key: String,
    binding: Mutex<Binding>,
    inner: Mutex<Tracked>,
}

impl std::fmt::Debug for SceneStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStore")
            .field("key", &self.key)
            .field("mode", &self.mode())
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

// ── Construction ─────────────────────────────────────────────────────────

impl SceneStore {
    /// Empty store for `key`, talking to the backend through `api`.
    #[must_use]
    pub fn new(key: impl Into<String>, route: Route, api: Box<dyn SceneApi>) -> Self {
        Self {
            key: key.into(),
            binding: Mutex::new(Binding {
                route,
                api: Arc::from(api),
            }),
            inner: Mutex::new(Tracked {
                state: SceneState::default(),
                generation: 0,
                seen_generation: 0,
            }),
        }
    }

    /// Scene key this store is registered under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Route the store is currently bound to.
    #[must_use]
    pub fn route(&self) -> Route {
        lock(&self.binding).route.clone()
    }

    /// API variant family in use.
    #[must_use]
    pub fn mode(&self) -> ApiMode {
        lock(&self.binding).api.mode()
    }

    /// Whether the store serves a public shared-view page.
    #[must_use]
    pub fn is_share_view(&self) -> bool {
        self.mode() == ApiMode::Share
    }

    /// Point the store at a new route and the strategy built for it.
    ///
    /// State is kept. Requests already in flight finish against the old
    /// strategy; later actions use `api`.
    pub fn rebind(&self, route: Route, api: Box<dyn SceneApi>) {
        let mode = api.mode();
        {
            let mut binding = lock(&self.binding);
            binding.route = route;
            binding.api = Arc::from(api);
        }
        lock(&self.inner).generation += 1;
        log::debug!("[{}] rebound to {mode:?} mode", self.key);
    }

    fn api(&self) -> Arc<dyn SceneApi> {
        Arc::clone(&lock(&self.binding).api)
    }

    fn read<R>(&self, f: impl FnOnce(&SceneState) -> R) -> R {
        f(&lock(&self.inner).state)
    }

    fn update<R>(&self, f: impl FnOnce(&mut SceneState) -> R) -> R {
        let mut inner = lock(&self.inner);
        let result = f(&mut inner.state);
        inner.generation += 1;
        result
    }
}

// ── Change tracking ──────────────────────────────────────────────────────

impl SceneStore {
    /// Monotonically increasing generation; bumped on any mutation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        lock(&self.inner).generation
    }

    /// Whether state changed since the last [`SceneStore::mark_seen`].
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        let inner = lock(&self.inner);
        inner.generation != inner.seen_generation
    }

    /// Mark the current generation as consumed by the UI.
    pub fn mark_seen(&self) {
        let mut inner = lock(&self.inner);
        inner.seen_generation = inner.generation;
    }
}

// ── Getters ──────────────────────────────────────────────────────────────

impl SceneStore {
    /// Copy of every field, taken under one lock.
    #[must_use]
    pub fn snapshot(&self) -> SceneState {
        self.read(Clone::clone)
    }

    /// Scene metadata.
    #[must_use]
    pub fn base_info(&self) -> SceneBaseInfo {
        self.read(|s| s.base_info.clone())
    }

    /// Live viewer conf.
    #[must_use]
    pub fn scene_conf(&self) -> SceneConf {
        self.read(|s| s.scene_conf.clone())
    }

    /// Conf captured after the last load.
    #[must_use]
    pub fn origin_scene_conf(&self) -> Option<SceneConf> {
        self.read(|s| s.origin_scene_conf.clone())
    }

    /// Group tree as fetched.
    #[must_use]
    pub fn scene_group(&self) -> Vec<SceneGroup> {
        self.read(|s| s.scene_group.clone())
    }

    /// Group tree without empty branches.
    #[must_use]
    pub fn filtered_scene_group(&self) -> Vec<SceneGroup> {
        self.read(|s| s.filtered_scene_group.clone())
    }

    /// Scene list.
    #[must_use]
    pub fn scene_list(&self) -> Vec<SceneSummary> {
        self.read(|s| s.scene_list.clone())
    }

    /// Resources of the current scene.
    #[must_use]
    pub fn scene_resource(&self) -> Option<SceneResource> {
        self.read(|s| s.scene_resource.clone())
    }

    /// Project info set by the host UI.
    #[must_use]
    pub fn project_info(&self) -> Option<ProjectInfo> {
        self.read(|s| s.project_info.clone())
    }

    /// Reset-position flag.
    #[must_use]
    pub fn is_reset_position(&self) -> bool {
        self.read(|s| s.is_reset_position)
    }

    /// Diff-update flag.
    #[must_use]
    pub fn diff_update(&self) -> bool {
        self.read(|s| s.diff_update)
    }

    /// Whether the live conf differs from the last loaded one.
    #[must_use]
    pub fn is_conf_modified(&self) -> bool {
        self.read(|s| {
            s.origin_scene_conf
                .as_ref()
                .is_some_and(|origin| *origin != s.scene_conf)
        })
    }
}

// ── Local actions ────────────────────────────────────────────────────────

impl SceneStore {
    /// Restore the live conf to its defaults.
    pub fn reset_conf(&self) {
        self.update(|s| s.scene_conf.reset());
    }

    /// Copy the last loaded conf back into the live conf. No-op before the
    /// first load.
    pub fn restore_origin_conf(&self) {
        self.update(|s| {
            if let Some(origin) = &s.origin_scene_conf {
                s.scene_conf = origin.clone();
            }
        });
    }

    /// Set the reset-position flag.
    pub fn set_is_reset_position(&self, flag: bool) {
        self.update(|s| s.is_reset_position = flag);
    }

    /// Set the diff-update flag.
    pub fn set_diff_update(&self, flag: bool) {
        self.update(|s| s.diff_update = flag);
    }

    /// Replace the project info.
    pub fn set_project_info(&self, info: Option<ProjectInfo>) {
        self.update(|s| s.project_info = info);
    }

    /// Merge `patch` into the live conf.
    pub fn set_conf(&self, patch: SceneConfPatch) {
        self.update(|s| s.scene_conf.merge(patch));
    }

    /// Merge `patch` into the scene metadata.
    pub fn set_base_info(&self, patch: SceneBaseInfoPatch) {
        self.update(|s| s.base_info.merge(patch));
    }
}

// ── Remote actions ───────────────────────────────────────────────────────

impl SceneStore {
    /// Fetch the group tree; stores it and its pruned copy.
    pub fn fetch_group_tree(&self, params: &Params) -> Result<(), PanoError> {
        let groups = self.api().group_tree(params)?;
        let filtered = filter_empty_groups(&groups);
        self.update(|s| {
            s.scene_group = groups;
            s.filtered_scene_group = filtered;
        });
        Ok(())
    }

    /// Fetch the scene list.
    pub fn fetch_scene_list(&self, params: &Params) -> Result<(), PanoError> {
        let list = self.api().scene_list(params)?;
        self.update(|s| s.scene_list = list);
        Ok(())
    }

    /// Fetch the resources of scene `id`.
    pub fn fetch_resource_list(&self, id: SceneId) -> Result<(), PanoError> {
        let resource = self.api().resource_list(id)?;
        self.update(|s| s.scene_resource = resource);
        Ok(())
    }

    /// Fetch and merge the metadata of scene `id`. Shared views have no
    /// access to it and leave the metadata unchanged.
    pub fn fetch_base_info(&self, id: SceneId) -> Result<(), PanoError> {
        if let Some(patch) = self.api().base_info(id)? {
            self.update(|s| s.base_info.merge(patch));
        }
        Ok(())
    }

    /// Load the viewer conf of scene `id`.
    ///
    /// The live conf is reset to defaults before the request is sent, so a
    /// failed load leaves defaults in place. On success the response is
    /// applied and the result captured as the origin conf.
    pub fn fetch_conf(&self, id: SceneId) -> Result<(), PanoError> {
        self.reset_conf();
        let data = self.api().conf(id)?;
        let conf = self.update(|s| {
            if let Some(data) = &data {
                s.scene_conf.apply_response(data);
            }
            s.origin_scene_conf = Some(s.scene_conf.clone());
            s.scene_conf.clone()
        });
        log::debug!("[{}] loaded scene conf: {conf:?}", self.key);
        Ok(())
    }
}
