//! Application state shared by every frontend.
//!
//! [`CatalogState`] owns the mission list, the favorites set, the filter
//! values, the editor and the load notice. Frontends mutate it only through
//! these methods and read it only through [`crate::view::render`], so each
//! mutation-then-render pair happens under a single borrow (or lock).
//!
//! ```text
//! input/click ──▶ CatalogState::{set_*, toggle_favorite, save, delete} ──▶ view::render ──▶ frontend
//! ```

use tracing::debug;

use crate::catalog::{Catalog, Editor};
use crate::favorites::Favorites;
use crate::filter::{FilterOptions, MissionFilter};
use crate::loader::{LoadNotice, LoadOutcome};
use crate::mission::{Mission, MissionDraft, MissionId};

/// One user's catalog session.
pub struct CatalogState {
    catalog: Catalog,
    favorites: Favorites,
    filter: MissionFilter,
    options: FilterOptions,
    editor: Editor,
    load_notice: Option<LoadNotice>,
}

impl CatalogState {
    pub fn new(missions: Vec<Mission>, favorites: Favorites) -> Self {
        let options = FilterOptions::from_missions(&missions);
        Self {
            catalog: Catalog::new(missions),
            favorites,
            filter: MissionFilter::default(),
            options,
            editor: Editor::default(),
            load_notice: None,
        }
    }

    /// Build from a loader result, keeping its notice for display.
    pub fn from_outcome(outcome: LoadOutcome, favorites: Favorites) -> Self {
        let mut state = Self::new(outcome.missions, favorites);
        state.load_notice = outcome.notice;
        state
    }

    // ── Accessors ──

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn missions(&self) -> &[Mission] {
        self.catalog.missions()
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn filter(&self) -> &MissionFilter {
        &self.filter
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn load_notice(&self) -> Option<&LoadNotice> {
        self.load_notice.as_ref()
    }

    /// Missions passing the current filter, in catalog order.
    pub fn visible(&self) -> Vec<&Mission> {
        self.filter.apply(self.catalog.missions())
    }

    /// Favorite missions present in the catalog, in catalog order.
    pub fn favorite_missions(&self) -> Vec<&Mission> {
        self.catalog
            .missions()
            .iter()
            .filter(|m| self.favorites.contains(m.id))
            .collect()
    }

    // ── Filter ──

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.log_filter_change();
    }

    pub fn set_agency(&mut self, agency: impl Into<String>) {
        self.filter.agency = agency.into();
        self.log_filter_change();
    }

    pub fn set_year(&mut self, year: impl Into<String>) {
        self.filter.year = year.into();
        self.log_filter_change();
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) {
        self.filter.kind = kind.into();
        self.log_filter_change();
    }

    /// Replace all four predicates at once.
    pub fn set_filter(&mut self, filter: MissionFilter) {
        self.filter = filter;
        self.log_filter_change();
    }

    pub fn reset_filters(&mut self) {
        self.filter.reset();
        self.log_filter_change();
    }

    fn log_filter_change(&self) {
        debug!(
            "Filter recomputed: {} of {} missions visible",
            self.visible().len(),
            self.catalog.len()
        );
    }

    // ── Favorites ──

    /// Toggle a favorite and persist. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, id: MissionId) -> Result<bool, String> {
        self.favorites.toggle(id)
    }

    /// Remove from favorites (favorites panel). Returns whether it was one.
    pub fn remove_favorite(&mut self, id: MissionId) -> Result<bool, String> {
        self.favorites.remove(id)
    }

    // ── Editor ──

    /// Open the editor: empty for `None`, pre-filled for an existing id.
    pub fn open_editor(&mut self, id: Option<MissionId>) -> Result<(), String> {
        match id {
            None => self.editor.open_new(),
            Some(id) => {
                let mission = self
                    .catalog
                    .get(id)
                    .ok_or_else(|| format!("Mission {id} not found"))?;
                self.editor.open_existing(mission);
            }
        }
        Ok(())
    }

    /// Mutable access to the open form's values.
    pub fn draft_mut(&mut self) -> &mut MissionDraft {
        self.editor.draft_mut()
    }

    pub fn close_editor(&mut self) {
        self.editor.close();
    }

    /// Save the open editor's draft and close it.
    pub fn submit_editor(&mut self) -> Result<MissionId, String> {
        if !self.editor.is_open() {
            return Err("Editor is not open".into());
        }
        let draft = self.editor.draft().clone();
        let id = self.save(self.editor.editing_id(), draft)?;
        self.editor.close();
        Ok(id)
    }

    /// Create (`id == None`) or update a mission, then rebuild the options.
    pub fn save(&mut self, id: Option<MissionId>, draft: MissionDraft) -> Result<MissionId, String> {
        let id = self.catalog.save(id, draft)?;
        self.refresh_options();
        Ok(id)
    }

    /// Delete a mission and drop it from favorites.
    ///
    /// Returns `false` (and changes nothing) for an unknown id. The favorites
    /// write happens first, so a storage error leaves the catalog untouched.
    pub fn delete(&mut self, id: MissionId) -> Result<bool, String> {
        if self.catalog.get(id).is_none() {
            return Ok(false);
        }
        self.favorites.remove(id)?;
        self.catalog.delete(id);
        if self.editor.editing_id() == Some(id) {
            self.editor.close();
        }
        self.refresh_options();
        Ok(true)
    }

    fn refresh_options(&mut self) {
        self.options = FilterOptions::from_missions(self.catalog.missions());
        self.options.prune(&mut self.filter);
    }
}
