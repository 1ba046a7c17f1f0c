//! Command-line entry point for the panoview scene store.

use std::path::Path;

use panoview::api::SceneId;
use panoview::config::StoreConfig;
use panoview::{PanoError, Route, SceneStore, StoreRegistry};

const DEFAULT_CONFIG: &str = "panoview.toml";

/// Load everything a scene page shows, in the order the viewer needs it.
fn load_scene(store: &SceneStore, id: SceneId) -> Result<(), PanoError> {
    store.fetch_base_info(id)?;
    store.fetch_conf(id)?;
    store.fetch_resource_list(id)?;
    store.fetch_scene_list(&Default::default())?;
    store.fetch_group_tree(&Default::default())
}

fn log_summary(store: &SceneStore) {
    let state = store.snapshot();
    log::info!(
        "scene {} ({:?} mode): \"{}\" {}",
        store.key(),
        store.mode(),
        state.base_info.scene_name,
        state.base_info.scene_date
    );
    match serde_json::to_string_pretty(&state.scene_conf) {
        Ok(conf) => log::info!("conf: {conf}"),
        Err(e) => log::warn!("conf not serializable: {e}"),
    }
    log::info!(
        "{} scenes listed, {} groups ({} non-empty), resources {}",
        state.scene_list.len(),
        state.scene_group.len(),
        state.filtered_scene_group.len(),
        if state.scene_resource.is_some() { "loaded" } else { "absent" }
    );
}

fn main() {
    env_logger::init();

    let Some(url) = std::env::args().nth(1) else {
        log::error!("Usage: panoview <scene URL> [config.toml]");
        std::process::exit(1);
    };
    let config_path = std::env::args()
        .nth(2)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_owned());

    let config = match StoreConfig::load_or_default(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let route = match Route::parse(&url) {
        Ok(route) => route,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    let registry = StoreRegistry::with_http(config);
    let store = registry.store_for(&route);

    let Ok(id) = route.scene_id("").parse::<SceneId>() else {
        log::error!("URL has no numeric scene id: {url}");
        std::process::exit(1);
    };

    if let Err(e) = load_scene(&store, id) {
        log::error!("failed to load scene {id}: {e}");
        std::process::exit(1);
    }
    log_summary(&store);
}
