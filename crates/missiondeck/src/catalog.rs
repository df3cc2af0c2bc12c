//! The session's mission list and the create/edit editor.
//!
//! Mission records live only for the session; nothing here touches storage.

use serde::Serialize;
use tracing::info;

use crate::mission::{Mission, MissionDraft, MissionId};

/// The in-memory mission list, in display order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    missions: Vec<Mission>,
}

impl Catalog {
    pub fn new(missions: Vec<Mission>) -> Self {
        Self { missions }
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn get(&self, id: MissionId) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    /// Id for the next created mission: one past the largest id, or 1 when
    /// the list is empty.
    pub fn next_id(&self) -> MissionId {
        self.missions
            .iter()
            .map(|m| m.id)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Replace the mission `id` in place, or append a new one when `id` is
    /// `None`. Returns the id of the saved record.
    pub fn save(&mut self, id: Option<MissionId>, draft: MissionDraft) -> Result<MissionId, String> {
        match id {
            Some(id) => {
                let slot = self
                    .missions
                    .iter_mut()
                    .find(|m| m.id == id)
                    .ok_or_else(|| format!("Mission {id} not found"))?;
                *slot = Mission::from_draft(id, draft);
                info!(mission_id = id, "Updated mission");
                Ok(id)
            }
            None => {
                let id = self.next_id();
                self.missions.push(Mission::from_draft(id, draft));
                info!(mission_id = id, "Created mission");
                Ok(id)
            }
        }
    }

    /// Remove a mission. Returns `false` if no mission had that id.
    pub fn delete(&mut self, id: MissionId) -> bool {
        let before = self.missions.len();
        self.missions.retain(|m| m.id != id);
        let removed = self.missions.len() != before;
        if removed {
            info!(mission_id = id, "Deleted mission");
        }
        removed
    }
}

/// What the editor panel is doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum EditorMode {
    #[default]
    Closed,
    Creating,
    Editing(MissionId),
}

/// The create/edit form: its mode and the values being edited.
#[derive(Clone, Debug, Default)]
pub struct Editor {
    mode: EditorMode,
    draft: MissionDraft,
}

impl Editor {
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    pub fn draft(&self) -> &MissionDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut MissionDraft {
        &mut self.draft
    }

    /// Panel title for the current mode.
    pub fn title(&self) -> Option<&'static str> {
        match self.mode {
            EditorMode::Closed => None,
            EditorMode::Creating => Some("Ajouter une Mission"),
            EditorMode::Editing(_) => Some("Modifier la Mission"),
        }
    }

    /// Open an empty form for a new mission.
    pub fn open_new(&mut self) {
        self.mode = EditorMode::Creating;
        self.draft = MissionDraft::default();
    }

    /// Open the form pre-filled with an existing mission.
    pub fn open_existing(&mut self, mission: &Mission) {
        self.mode = EditorMode::Editing(mission.id);
        self.draft = MissionDraft::from(mission);
    }

    /// Close and discard the form.
    pub fn close(&mut self) {
        self.mode = EditorMode::Closed;
        self.draft = MissionDraft::default();
    }

    /// Id being edited, if any.
    pub fn editing_id(&self) -> Option<MissionId> {
        match self.mode {
            EditorMode::Editing(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> MissionDraft {
        MissionDraft {
            name: name.into(),
            agency: "ESA".into(),
            objective: "Observer".into(),
            launch_date: "2023-04-14".into(),
            kind: "Sonde".into(),
            image: String::new(),
        }
    }

    #[test]
    fn first_id_on_empty_catalog_is_one() {
        let mut catalog = Catalog::default();
        assert_eq!(catalog.next_id(), 1);
        let id = catalog.save(None, draft("Juice")).unwrap();
        assert_eq!(id, 1);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.missions()[0].name, "Juice");
    }

    #[test]
    fn new_ids_are_max_plus_one() {
        let mut catalog = Catalog::default();
        catalog.save(None, draft("A")).unwrap();
        catalog.save(None, draft("B")).unwrap();
        catalog.save(None, draft("C")).unwrap();
        assert!(catalog.delete(2));
        assert_eq!(catalog.save(None, draft("D")).unwrap(), 4);

        assert!(catalog.delete(4));
        assert!(catalog.delete(3));
        assert_eq!(catalog.next_id(), 2);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut catalog = Catalog::default();
        catalog.save(None, draft("A")).unwrap();
        catalog.save(None, draft("B")).unwrap();

        let mut edited = draft("B prime");
        edited.image = "https://example.org/b.png".into();
        assert_eq!(catalog.save(Some(2), edited).unwrap(), 2);

        let names: Vec<&str> = catalog.missions().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B prime"]);
        assert_eq!(
            catalog.get(2).unwrap().image.as_deref(),
            Some("https://example.org/b.png")
        );
    }

    #[test]
    fn update_of_unknown_id_fails() {
        let mut catalog = Catalog::default();
        assert!(catalog.save(Some(9), draft("X")).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn delete_unknown_is_noop() {
        let mut catalog = Catalog::default();
        catalog.save(None, draft("A")).unwrap();
        assert!(!catalog.delete(42));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn editor_modes_and_titles() {
        let mut editor = Editor::default();
        assert!(!editor.is_open());
        assert_eq!(editor.title(), None);

        editor.open_new();
        assert_eq!(editor.mode(), EditorMode::Creating);
        assert_eq!(editor.title(), Some("Ajouter une Mission"));
        assert_eq!(editor.draft(), &MissionDraft::default());

        let mission = Mission::from_draft(5, draft("Gaia"));
        editor.open_existing(&mission);
        assert_eq!(editor.editing_id(), Some(5));
        assert_eq!(editor.title(), Some("Modifier la Mission"));
        assert_eq!(editor.draft().name, "Gaia");

        editor.close();
        assert_eq!(editor.mode(), EditorMode::Closed);
        assert_eq!(editor.draft().name, "");
    }

    #[test]
    fn editor_mode_serializes_tagged() {
        let json = serde_json::to_value(EditorMode::Editing(3)).unwrap();
        assert_eq!(json["mode"], "editing");
        assert_eq!(json["id"], 3);
    }
}
