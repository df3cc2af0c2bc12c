//! Space mission catalog: filtering, favorites and editing over an in-memory
//! mission list.
//!
//! `missiondeck` is the headless core shared by the `missiondeck` CLI, the
//! `missiondeck-web` server and the `missiondeck-tui` terminal browser. All
//! session state lives in one [`CatalogState`](state::CatalogState); every
//! frontend mutates it through its methods and draws it through the pure
//! [`view::render`] function.
//!
//! # Getting started
//!
//! ```ignore
//! use missiondeck::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = CatalogConfig::new("missions.json".parse().unwrap())
//!         .with_fallback(FallbackPolicy::Samples);
//!     let mut state = config.open().await;
//!
//!     state.set_agency("NASA");
//!     state.toggle_favorite(1).unwrap();
//!
//!     for card in render(&state).cards {
//!         println!("{} - {} ({})", card.name, card.agency, card.launch_label);
//!     }
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Filter and search:** [`MissionFilter`](filter::MissionFilter) holds the
//!   four predicates; [`FilterOptions`](filter::FilterOptions) builds the
//!   dropdown choices.
//! - **Favorites:** [`Favorites`](favorites::Favorites) over any
//!   [`KeyValueStore`](storage::KeyValueStore).
//! - **Create, edit, delete:** [`CatalogState::save`](state::CatalogState::save),
//!   [`CatalogState::delete`](state::CatalogState::delete) and the
//!   [`Editor`](catalog::Editor).
//! - **Loading data:** [`loader::load_missions`] with a
//!   [`FallbackPolicy`](loader::FallbackPolicy).
//! - **Debounced search:** [`debounce`].
//! - **Contact form:** [`contact`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`mission`] | Mission record, editor draft, dates and default images |
//! | [`filter`] | Filter engine and dropdown options |
//! | [`favorites`] | Persisted favorites set |
//! | [`storage`] | Local key-value stores |
//! | [`catalog`] | Mission list and create/edit editor |
//! | [`loader`] | Catalog document loading, schema validation, fallback |
//! | [`state`] | Application state object |
//! | [`view`] | Pure rendering to view descriptions |
//! | [`debounce`] | Poll-based and tokio debouncers |
//! | [`contact`] | Contact form validation and simulated submission |
//! | [`config`] | Session configuration |
//! | [`logging`] | Tracing subscribers and the captured log buffer |

pub mod catalog;
pub mod config;
pub mod contact;
pub mod debounce;
pub mod favorites;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod mission;
pub mod prelude;
pub mod state;
pub mod storage;
pub mod view;

use schemars::JsonSchema;

// Re-export schemars for downstream crates.
pub use schemars;

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`.
///
/// # Example
///
/// ```
/// use missiondeck::json_schema_for;
/// use missiondeck::mission::Mission;
///
/// let schema = json_schema_for::<Mission>();
/// assert_eq!(schema["type"], "object");
/// assert!(schema["required"].as_array().unwrap().contains(&"launchDate".into()));
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}
