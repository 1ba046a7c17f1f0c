//! Scene API access, split into a raw [`Transport`] and a mode strategy.
//!
//! A store's [`SceneApi`] is chosen from its route: [`OwnerApi`] for
//! authenticated editing pages, [`ShareApi`] for public shared-view pages.
//! Both issue plain GET requests through the same transport.

#[cfg(feature = "http")]
mod http;
mod memory;

use std::sync::Arc;

#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use memory::MemoryTransport;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiPaths;
use crate::error::PanoError;
use crate::model::{SceneBaseInfoPatch, SceneGroup, SceneResource, SceneSummary};
use crate::route::{merge_params, Params};

/// Numeric scene id as used by the backend.
pub type SceneId = u64;

/// One GET request against the scene API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Endpoint path, relative to the configured base URL.
    pub path: String,
    /// Query parameters.
    pub query: Params,
    /// Whether owner credentials should be attached.
    pub authenticated: bool,
}

/// Raw request/response channel to the backend.
pub trait Transport: Send + Sync {
    /// Perform `request`. `Ok(None)` means the backend answered with an
    /// empty or `null` payload.
    fn get(&self, request: &ApiRequest) -> Result<Option<Value>, PanoError>;
}

/// Which API variant family a store talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMode {
    /// Authenticated owner/editor endpoints.
    Owner,
    /// Public shared-view endpoints, parameterized by the route.
    Share,
}

/// The scene operations a store needs, implemented once per [`ApiMode`].
pub trait SceneApi: Send + Sync {
    /// Mode this strategy implements.
    fn mode(&self) -> ApiMode;

    /// All scene groups as a tree.
    fn group_tree(&self, params: &Params) -> Result<Vec<SceneGroup>, PanoError>;

    /// Scenes matching `params`.
    fn scene_list(&self, params: &Params)
        -> Result<Vec<SceneSummary>, PanoError>;

    /// Resource bundle of a scene.
    fn resource_list(
        &self,
        id: SceneId,
    ) -> Result<Option<SceneResource>, PanoError>;

    /// Editable metadata of a scene. Always `None` where the mode has no
    /// access to it.
    fn base_info(
        &self,
        id: SceneId,
    ) -> Result<Option<SceneBaseInfoPatch>, PanoError>;

    /// Raw viewer conf record of a scene.
    fn conf(&self, id: SceneId) -> Result<Option<Value>, PanoError>;
}

// ── Owner ────────────────────────────────────────────────────────────────

/// Authenticated endpoints; caller parameters are sent as given.
pub struct OwnerApi {
    transport: Arc<dyn Transport>,
    paths: ApiPaths,
}

impl OwnerApi {
    /// Owner strategy over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, paths: ApiPaths) -> Self {
        Self { transport, paths }
    }

    fn get(&self, path: &str, query: Params) -> Result<Option<Value>, PanoError> {
        self.transport.get(&ApiRequest {
            path: path.to_owned(),
            query,
            authenticated: true,
        })
    }
}

impl SceneApi for OwnerApi {
    fn mode(&self) -> ApiMode {
        ApiMode::Owner
    }

    fn group_tree(&self, params: &Params) -> Result<Vec<SceneGroup>, PanoError> {
        decode_list(self.get(&self.paths.group_all, params.clone())?)
    }

    fn scene_list(
        &self,
        params: &Params,
    ) -> Result<Vec<SceneSummary>, PanoError> {
        // Owner listing is paged: `{ list, total }`.
        let page = self.get(&self.paths.scene_list, params.clone())?;
        decode_list(page.and_then(|mut p| p.get_mut("list").map(Value::take)))
    }

    fn resource_list(
        &self,
        id: SceneId,
    ) -> Result<Option<SceneResource>, PanoError> {
        self.get(&self.paths.resource_list, id_query("id", id))
    }

    fn base_info(
        &self,
        id: SceneId,
    ) -> Result<Option<SceneBaseInfoPatch>, PanoError> {
        self.get(&self.paths.scene, id_query("id", id))?
            .map(serde_json::from_value::<SceneBaseInfoPatch>)
            .transpose()
            .map_err(PanoError::from)
    }

    fn conf(&self, id: SceneId) -> Result<Option<Value>, PanoError> {
        self.get(&self.paths.conf, id_query("id", id))
    }
}

// ── Share ────────────────────────────────────────────────────────────────

/// Public endpoints; every request carries the route's query and path
/// parameters (share token, scene id, ...).
pub struct ShareApi {
    transport: Arc<dyn Transport>,
    paths: ApiPaths,
    route_params: Params,
}

impl ShareApi {
    /// Share strategy over `transport` for a route with `route_params`.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        paths: ApiPaths,
        route_params: Params,
    ) -> Self {
        Self {
            transport,
            paths,
            route_params,
        }
    }

    fn get(&self, path: &str, query: Params) -> Result<Option<Value>, PanoError> {
        self.transport.get(&ApiRequest {
            path: path.to_owned(),
            query,
            authenticated: false,
        })
    }
}

impl SceneApi for ShareApi {
    fn mode(&self) -> ApiMode {
        ApiMode::Share
    }

    fn group_tree(&self, params: &Params) -> Result<Vec<SceneGroup>, PanoError> {
        let query = merge_params(&self.route_params, params);
        decode_list(self.get(&self.paths.share_group_tree, query)?)
    }

    fn scene_list(
        &self,
        params: &Params,
    ) -> Result<Vec<SceneSummary>, PanoError> {
        // Route parameters win over caller parameters here.
        let query = merge_params(params, &self.route_params);
        decode_list(self.get(&self.paths.share_scene_list, query)?)
    }

    fn resource_list(
        &self,
        id: SceneId,
    ) -> Result<Option<SceneResource>, PanoError> {
        let query = merge_params(&id_query("sceneId", id), &self.route_params);
        self.get(&self.paths.share_resource_list, query)
    }

    fn base_info(
        &self,
        _id: SceneId,
    ) -> Result<Option<SceneBaseInfoPatch>, PanoError> {
        Ok(None)
    }

    fn conf(&self, id: SceneId) -> Result<Option<Value>, PanoError> {
        let query = merge_params(&self.route_params, &id_query("id", id));
        self.get(&self.paths.share_conf, query)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn id_query(name: &str, id: SceneId) -> Params {
    Params::from([(name.to_owned(), id.to_string())])
}

/// `null` and missing payloads read as an empty list.
fn decode_list<T: DeserializeOwned>(
    payload: Option<Value>,
) -> Result<Vec<T>, PanoError> {
    match payload {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

/// Unwrap a `{ code, msg, data }` response envelope.
///
/// Bodies without an integer `code` are taken as the payload itself.
pub fn unwrap_envelope(
    body: &str,
    success_code: i64,
) -> Result<Option<Value>, PanoError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let mut value: Value = serde_json::from_str(body)?;
    let code = value.get("code").and_then(Value::as_i64);
    let payload = match code {
        Some(code) if code != success_code => {
            let message = value
                .get("msg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            return Err(PanoError::Api { code, message });
        }
        Some(_) => value.get_mut("data").map(Value::take),
        None => Some(value),
    };
    Ok(payload.filter(|v| !v.is_null()))
}
