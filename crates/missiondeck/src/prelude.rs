//! Convenience re-exports for common `missiondeck` types.
//!
//! Meant to be glob-imported by frontends:
//!
//! ```ignore
//! use missiondeck::prelude::*;
//! ```
//!
//! Specialized types (schema helpers, log capture layer, sample data) are
//! left out; import those from their modules directly.

// ── Model ───────────────────────────────────────────────────────────
pub use crate::mission::{Mission, MissionDraft, MissionId};

// ── Session ─────────────────────────────────────────────────────────
pub use crate::catalog::{Catalog, EditorMode};
pub use crate::config::CatalogConfig;
pub use crate::favorites::Favorites;
pub use crate::filter::{FilterOptions, MissionFilter};
pub use crate::loader::{DataSource, FallbackPolicy, LoadNotice};
pub use crate::state::CatalogState;
pub use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};

// ── Rendering ───────────────────────────────────────────────────────
pub use crate::view::{
    CatalogView, EmptyState, FavoritesPanel, MissionCard, card_notification, render,
    render_favorites,
};

// ── Input handling ──────────────────────────────────────────────────
pub use crate::contact::{ContactField, ContactForm, SubmissionStatus};
pub use crate::debounce::{Debouncer, SearchDebounce};
pub use crate::logging::{LogLevel, LogLine};
