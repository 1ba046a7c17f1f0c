//! Navigation context: the current path plus query and path parameters.
//!
//! The route decides two things for a scene store: which keyed instance it
//! belongs to ([`Route::scene_key`]) and whether it talks to the shared-view
//! API variants ([`Route::is_share_view`]).

use std::collections::BTreeMap;

use url::Url;

use crate::error::PanoError;

/// Placeholder origin relative routes are resolved against.
const ROUTE_ORIGIN: &str = "http://localhost/";

/// Request parameters, sorted by name so merged maps compare and log
/// deterministically.
pub type Params = BTreeMap<String, String>;

/// Read-only snapshot of the current navigation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    path: String,
    query: Params,
    params: Params,
}

impl Route {
    /// Route at `path` with no query or path parameters.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Params::new(),
            params: Params::new(),
        }
    }

    /// Parse a URL or path such as `/panoramicView/share?id=7&token=ab`.
    ///
    /// Relative paths are resolved against a placeholder origin; scheme and
    /// host are dropped. Hash-mode URLs (`/#/panoramicView?..`) use the
    /// fragment as the route.
    pub fn parse(input: &str) -> Result<Self, PanoError> {
        let origin = Url::parse(ROUTE_ORIGIN)?;
        let mut url = origin.join(input)?;
        if let Some(frag) = url.fragment().filter(|f| f.starts_with('/')) {
            url = origin.join(frag)?;
        }

        let mut route = Self::new(url.path());
        route.query.extend(url.query_pairs().into_owned());
        Ok(route)
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let _ = self.query.insert(key.into(), value.into());
        self
    }

    /// Add a path parameter (as resolved by the host router).
    #[must_use]
    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let _ = self.params.insert(key.into(), value.into());
        self
    }

    /// Current path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters.
    #[must_use]
    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Path parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Scene id from `query.id`, then `params.id`, then `default`.
    /// Empty values count as absent.
    #[must_use]
    pub fn scene_id<'a>(&'a self, default: &'a str) -> &'a str {
        [self.query.get("id"), self.params.get("id")]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|id| !id.is_empty())
            .unwrap_or(default)
    }

    /// Key namespacing the store instance for this route's scene.
    #[must_use]
    pub fn scene_key(&self, prefix: &str, default_id: &str) -> String {
        format!("{prefix}{}", self.scene_id(default_id))
    }

    /// Whether the route is under the public shared-view prefix.
    #[must_use]
    pub fn is_share_view(&self, prefix: &str) -> bool {
        self.path.starts_with(prefix)
    }

    /// Query parameters overridden by path parameters.
    #[must_use]
    pub fn merged_params(&self) -> Params {
        merge_params(&self.query, &self.params)
    }
}

/// `base` with every entry of `overrides` written over it.
#[must_use]
pub fn merge_params(base: &Params, overrides: &Params) -> Params {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_id_prefers_query_over_params() {
        let route = Route::new("/scene/edit")
            .with_query("id", "7")
            .with_param("id", "9");
        assert_eq!(route.scene_id("default"), "7");

        let route = Route::new("/scene/edit").with_param("id", "9");
        assert_eq!(route.scene_id("default"), "9");
    }

    #[test]
    fn missing_or_empty_id_falls_back_to_sentinel() {
        let route = Route::new("/scene/edit").with_query("id", "");
        assert_eq!(route.scene_key("panoramic_", "default"), "panoramic_default");
        assert_eq!(
            Route::new("/").scene_key("panoramic_", "default"),
            "panoramic_default"
        );
    }

    #[test]
    fn share_view_is_decided_by_path_prefix() {
        assert!(Route::new("/panoramicView/12").is_share_view("/panoramicView"));
        assert!(!Route::new("/works/panoramic").is_share_view("/panoramicView"));
    }

    #[test]
    fn path_params_override_query_when_merged() {
        let route = Route::new("/panoramicView")
            .with_query("id", "1")
            .with_query("token", "abc")
            .with_param("id", "2");
        let merged = route.merged_params();
        assert_eq!(merged.get("id").map(String::as_str), Some("2"));
        assert_eq!(merged.get("token").map(String::as_str), Some("abc"));
    }

    #[test]
    fn parse_splits_path_and_decodes_query() {
        let route = Route::parse(
            "https://pano.example.com/panoramicView/share?id=12&name=a%20b+c&flag",
        )
        .unwrap();
        assert_eq!(route.path(), "/panoramicView/share");
        assert_eq!(route.query().get("id").map(String::as_str), Some("12"));
        assert_eq!(
            route.query().get("name").map(String::as_str),
            Some("a b c")
        );
        assert_eq!(route.query().get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn parse_uses_hash_fragment_route() {
        let route = Route::parse("http://host/#/panoramicView?id=3").unwrap();
        assert_eq!(route.path(), "/panoramicView");
        assert_eq!(route.scene_id("default"), "3");
    }

    #[test]
    fn relative_path_without_query() {
        let route = Route::parse("panoramicView").unwrap();
        assert_eq!(route.path(), "/panoramicView");
        assert!(route.query().is_empty());
        assert_eq!(Route::parse("").unwrap().path(), "/");
    }

    #[test]
    fn unparseable_url_is_an_error() {
        let err = Route::parse("http://[::1/panoramicView").unwrap_err();
        assert!(matches!(err, PanoError::InvalidUrl(_)));
    }

    #[test]
    fn malformed_escapes_are_kept_verbatim() {
        let route = Route::parse("/p?x=100%&y=%zz").unwrap();
        assert_eq!(route.query().get("x").map(String::as_str), Some("100%"));
        assert_eq!(route.query().get("y").map(String::as_str), Some("%zz"));
    }
}
