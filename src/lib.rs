// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Group allowances (crate attributes override the Cargo lint table)
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::redundant_pub_crate)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Per-scene client state for panoramic scene viewing and editing.
//!
//! Panoview keeps the metadata, group tree, resources and viewer conf of a
//! panoramic scene in memory and loads them from the scene API on request.
//! State is isolated per scene: each scene key derived from the current
//! route gets its own store.
//!
//! # Key entry points
//!
//! - [`registry::StoreRegistry`] - scene key → store mapping, creation on miss
//! - [`store::SceneStore`] - state, getters and actions for one scene
//! - [`route::Route`] - navigation context the key and API mode derive from
//! - [`api::SceneApi`] - owner / shared-view API strategies
//! - [`config::StoreConfig`] - backend URL, endpoint paths, key prefix
//!
//! # Modes
//!
//! Routes under the shared-view prefix (`/panoramicView` by default) use the
//! public share endpoints and forward the route's parameters with every
//! request. All other routes use the authenticated owner endpoints.

pub mod api;
pub mod conf;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod route;
pub mod store;
pub mod tree;
mod util;

pub use error::PanoError;
pub use registry::StoreRegistry;
pub use route::Route;
pub use store::SceneStore;
