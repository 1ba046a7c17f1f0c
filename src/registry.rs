//! Scene key → store mapping.
//!
//! The registry is the only place stores are created. Asking twice for the
//! same scene key returns the same [`SceneStore`]; distinct keys get fully
//! independent stores. A hit with a different route rebinds the existing
//! store to that route.

use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use crate::api::{OwnerApi, SceneApi, ShareApi, Transport};
use crate::config::StoreConfig;
use crate::route::Route;
use crate::store::SceneStore;
use crate::util::lock::lock;

/// Owns every live scene store and the collaborators they are built from.
pub struct StoreRegistry {
    config: StoreConfig,
    transport: Arc<dyn Transport>,
    stores: Mutex<FxHashMap<String, Arc<SceneStore>>>,
}

impl StoreRegistry {
    /// Registry whose stores talk to the backend through `transport`.
    #[must_use]
    pub fn new(config: StoreConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            stores: Mutex::new(FxHashMap::default()),
        }
    }

    /// Registry over a real HTTP backend described by `config`.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn with_http(config: StoreConfig) -> Self {
        let transport = Arc::new(crate::api::HttpTransport::new(&config));
        Self::new(config, transport)
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Scene key `route` maps to.
    #[must_use]
    pub fn key_for(&self, route: &Route) -> String {
        route.scene_key(&self.config.key_prefix, &self.config.default_scene_id)
    }

    /// Store for `route`'s scene, created on first request.
    ///
    /// When the key already has a store bound to another route, the store
    /// is rebound: mode and share parameters follow `route`, state is kept.
    pub fn store_for(&self, route: &Route) -> Arc<SceneStore> {
        let key = self.key_for(route);
        let mut stores = lock(&self.stores);
        match stores.entry(key) {
            Entry::Occupied(entry) => {
                let store = entry.get();
                if store.route() != *route {
                    store.rebind(route.clone(), self.api_for(route));
                }
                Arc::clone(store)
            }
            Entry::Vacant(entry) => {
                let store = Arc::new(self.create(entry.key(), route));
                Arc::clone(entry.insert(store))
            }
        }
    }

    /// Existing store for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<SceneStore>> {
        lock(&self.stores).get(key).cloned()
    }

    /// Whether a store exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        lock(&self.stores).contains_key(key)
    }

    /// Drop the registry's handle to `key`'s store, e.g. when its page is
    /// closed. Outstanding handles keep working but are no longer shared.
    pub fn remove(&self, key: &str) -> Option<Arc<SceneStore>> {
        let removed = lock(&self.stores).remove(key);
        if removed.is_some() {
            log::debug!("released scene store {key}");
        }
        removed
    }

    /// Number of live stores.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.stores).len()
    }

    /// Whether no store has been created yet (or all were removed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.stores).is_empty()
    }

    /// Keys of all live stores, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock(&self.stores).keys().cloned().collect();
        keys.sort();
        keys
    }

    fn api_for(&self, route: &Route) -> Box<dyn SceneApi> {
        let transport = Arc::clone(&self.transport);
        let paths = self.config.paths.clone();
        if route.is_share_view(&self.config.share_prefix) {
            Box::new(ShareApi::new(transport, paths, route.merged_params()))
        } else {
            Box::new(OwnerApi::new(transport, paths))
        }
    }

    fn create(&self, key: &str, route: &Route) -> SceneStore {
        let api = self.api_for(route);
        log::info!("created scene store {key} ({:?} mode)", api.mode());
        SceneStore::new(key, route.clone(), api)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::{ApiMode, MemoryTransport};
    use crate::model::SceneBaseInfoPatch;

    fn registry() -> (StoreRegistry, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::new());
        let registry = StoreRegistry::new(StoreConfig::default(), transport.clone());
        (registry, transport)
    }

    #[test]
    fn same_key_returns_same_instance() {
        let (registry, _) = registry();
        let route = Route::new("/works/scene").with_query("id", "5");
        let a = registry.store_for(&route);
        let b = registry.store_for(&Route::new("/other").with_param("id", "5"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
        assert_eq!(a.key(), "panoramic_5");
    }

    #[test]
    fn distinct_keys_hold_independent_state() {
        let (registry, _) = registry();
        let one = registry.store_for(&Route::new("/s").with_query("id", "1"));
        let two = registry.store_for(&Route::new("/s").with_query("id", "2"));
        assert!(!Arc::ptr_eq(&one, &two));

        one.set_base_info(SceneBaseInfoPatch {
            scene_name: Some("First".to_owned()),
            ..Default::default()
        });
        assert_eq!(one.base_info().scene_name, "First");
        assert_eq!(two.base_info().scene_name, "");
    }

    #[test]
    fn routes_without_id_share_the_default_store() {
        let (registry, _) = registry();
        let a = registry.store_for(&Route::new("/a"));
        let b = registry.store_for(&Route::new("/b"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.keys(), vec!["panoramic_default".to_owned()]);
    }

    #[test]
    fn mode_follows_route_prefix() {
        let (registry, transport) = registry();
        let shared = registry
            .store_for(&Route::parse("/panoramicView?id=3&shareKey=abc").unwrap());
        assert_eq!(shared.mode(), ApiMode::Share);

        transport.respond(
            &registry.config().paths.share_scene_list,
            json!([{ "id": 3 }]),
        );
        shared.fetch_scene_list(&Default::default()).unwrap();
        let req = transport.last_request().unwrap();
        assert_eq!(req.query["shareKey"], "abc");
        assert_eq!(req.query["id"], "3");

        let owner = registry.store_for(&Route::new("/works").with_query("id", "4"));
        assert_eq!(owner.mode(), ApiMode::Owner);
    }

    #[test]
    fn share_params_follow_the_latest_route() {
        let (registry, transport) = registry();
        let first = registry
            .store_for(&Route::parse("/panoramicView?id=3&shareKey=old").unwrap());
        let second = registry.store_for(
            &Route::parse("/panoramicView?id=3&shareKey=new&groupId=5").unwrap(),
        );
        assert!(Arc::ptr_eq(&first, &second));

        transport.respond(&registry.config().paths.share_scene_list, json!([]));
        first.fetch_scene_list(&Default::default()).unwrap();
        let req = transport.last_request().unwrap();
        assert_eq!(req.query["shareKey"], "new");
        assert_eq!(req.query["groupId"], "5");
    }

    #[test]
    fn switching_to_share_route_changes_mode_and_keeps_state() {
        let (registry, transport) = registry();
        let owner = registry.store_for(&Route::parse("/works/edit?id=3").unwrap());
        assert_eq!(owner.mode(), ApiMode::Owner);
        owner.set_diff_update(true);

        let shared = registry
            .store_for(&Route::parse("/panoramicView?id=3&shareKey=k").unwrap());
        assert!(Arc::ptr_eq(&owner, &shared));
        assert_eq!(owner.mode(), ApiMode::Share);
        assert!(owner.diff_update());

        owner.fetch_base_info(3).unwrap();
        assert!(transport.requests().is_empty());

        let back = registry.store_for(&Route::parse("/works/edit?id=3").unwrap());
        assert_eq!(back.mode(), ApiMode::Owner);
    }

    #[test]
    fn same_route_hit_does_not_rebind() {
        let (registry, _) = registry();
        let route = Route::new("/works").with_query("id", "8");
        let store = registry.store_for(&route);
        let generation = store.generation();
        let _ = registry.store_for(&route);
        assert_eq!(store.generation(), generation);
    }

    #[test]
    fn remove_releases_the_key() {
        let (registry, _) = registry();
        let route = Route::new("/s").with_query("id", "9");
        let first = registry.store_for(&route);
        first.set_diff_update(true);

        assert!(registry.contains("panoramic_9"));
        assert!(registry.remove("panoramic_9").is_some());
        assert!(registry.is_empty());
        assert!(registry.get("panoramic_9").is_none());

        let second = registry.store_for(&route);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!second.diff_update());
    }

    #[test]
    fn custom_prefix_and_default_id() {
        let transport = Arc::new(MemoryTransport::new());
        let config = StoreConfig {
            key_prefix: "scene:".to_owned(),
            default_scene_id: "none".to_owned(),
            ..Default::default()
        };
        let registry = StoreRegistry::new(config, transport);
        assert_eq!(registry.key_for(&Route::new("/")), "scene:none");
    }
}
