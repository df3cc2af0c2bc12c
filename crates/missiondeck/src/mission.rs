//! Mission records and the editor's form values.
//!
//! A [`Mission`] is one catalog entry. Field names on the wire match the
//! catalog document exactly (`launchDate`, `type`), so the same type reads
//! `missions.json` and is served back to browser clients unchanged.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identifier of a mission within one catalog session.
pub type MissionId = u32;

/// Image used when neither the mission nor its agency has one.
const FALLBACK_AGENCY: &str = "NASA";

/// Default card images keyed by agency.
const DEFAULT_IMAGES: &[(&str, &str)] = &[
    (
        "NASA",
        "https://images.unsplash.com/photo-1516849841032-87cbac4d88f7?w=800&h=500&fit=crop",
    ),
    (
        "ESA",
        "https://images.unsplash.com/photo-1446776653964-20c1d3a81b06?w=800&h=500&fit=crop",
    ),
    (
        "CNSA",
        "https://images.unsplash.com/photo-1462331940025-496dfbfc7564?w=800&h=500&fit=crop",
    ),
    (
        "Roscosmos",
        "https://images.unsplash.com/photo-1446776877081-d282a0f896e2?w=800&h=500&fit=crop",
    ),
    (
        "ISRO",
        "https://images.unsplash.com/photo-1465101162946-4377e57745c3?w=800&h=500&fit=crop",
    ),
    (
        "JAXA",
        "https://images.unsplash.com/photo-1446776811953-b23d57bd21aa?w=800&h=500&fit=crop",
    ),
    (
        "MBRSC",
        "https://images.unsplash.com/photo-1614728894747-a83421e2b9c9?w=800&h=500&fit=crop",
    ),
    (
        "NASA/ESA/CSA",
        "https://images.unsplash.com/photo-1444703686981-a3abbc4d4fe3?w=800&h=500&fit=crop",
    ),
    (
        "ESA/JAXA",
        "https://images.unsplash.com/photo-1464802686167-b939a6910659?w=800&h=500&fit=crop",
    ),
];

const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// One catalog entry describing a space mission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
    pub agency: String,
    pub objective: String,
    /// ISO date (`YYYY-MM-DD`) as written in the catalog document.
    pub launch_date: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Card image URL. `None` falls back to the agency's default image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Mission {
    /// Build a mission from editor values under the given id.
    pub fn from_draft(id: MissionId, draft: MissionDraft) -> Self {
        let image = Some(draft.image.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            id,
            name: draft.name,
            agency: draft.agency,
            objective: draft.objective,
            launch_date: draft.launch_date,
            kind: draft.kind,
            image,
        }
    }

    /// Launch year as shown in the year dropdown, if the date parses.
    pub fn launch_year(&self) -> Option<i32> {
        launch_year(&self.launch_date)
    }

    /// Image URL for the card: own image, else agency default, else NASA's.
    pub fn image_url(&self) -> &str {
        self.image
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| default_image(&self.agency))
            .or_else(|| default_image(FALLBACK_AGENCY))
            .unwrap_or_default()
    }
}

/// Form values of the mission editor: every field except the id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissionDraft {
    pub name: String,
    pub agency: String,
    pub objective: String,
    pub launch_date: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Empty string means "no image".
    #[serde(default)]
    pub image: String,
}

impl From<&Mission> for MissionDraft {
    fn from(mission: &Mission) -> Self {
        Self {
            name: mission.name.clone(),
            agency: mission.agency.clone(),
            objective: mission.objective.clone(),
            launch_date: mission.launch_date.clone(),
            kind: mission.kind.clone(),
            image: mission.image.clone().unwrap_or_default(),
        }
    }
}

/// Default image registered for an agency.
pub fn default_image(agency: &str) -> Option<&'static str> {
    DEFAULT_IMAGES
        .iter()
        .find(|(name, _)| *name == agency)
        .map(|(_, url)| *url)
}

/// Extract the launch year from an ISO date string.
///
/// Accepts a full `YYYY-MM-DD` date, or anything whose first four characters
/// are digits (`"1969"`, `"1969-07"`).
pub fn launch_year(date: &str) -> Option<i32> {
    if let Some(parsed) = parse_date(date) {
        return Some(parsed.year());
    }
    let prefix: String = date.chars().take(4).collect();
    if prefix.len() == 4 && prefix.chars().all(|c| c.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

/// Long-form French date, e.g. `"16 juillet 1969"`.
///
/// Unparseable input is returned as written.
pub fn format_launch_date(date: &str) -> String {
    match parse_date(date) {
        Some(d) => {
            let month = FRENCH_MONTHS[d.month0() as usize];
            format!("{} {month} {}", d.day(), d.year())
        }
        None => date.to_string(),
    }
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apollo() -> Mission {
        Mission {
            id: 1,
            name: "Apollo 11".into(),
            agency: "NASA".into(),
            objective: "Premier alunissage habité".into(),
            launch_date: "1969-07-16".into(),
            kind: "Alunissage".into(),
            image: None,
        }
    }

    #[test]
    fn deserializes_catalog_field_names() {
        let json = r#"{"id":7,"name":"Rosetta","agency":"ESA","objective":"Comète",
            "launchDate":"2004-03-02","type":"Sonde"}"#;
        let m: Mission = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, 7);
        assert_eq!(m.kind, "Sonde");
        assert_eq!(m.launch_date, "2004-03-02");
        assert!(m.image.is_none());

        let back = serde_json::to_value(&m).unwrap();
        assert_eq!(back["type"], "Sonde");
        assert_eq!(back["launchDate"], "2004-03-02");
        assert!(back.get("image").is_none());
    }

    #[test]
    fn launch_year_variants() {
        assert_eq!(launch_year("1969-07-16"), Some(1969));
        assert_eq!(launch_year("2021-12"), Some(2021));
        assert_eq!(launch_year("soon"), None);
        assert_eq!(launch_year(""), None);
    }

    #[test]
    fn french_long_dates() {
        assert_eq!(format_launch_date("1969-07-16"), "16 juillet 1969");
        assert_eq!(format_launch_date("2020-08-01"), "1 août 2020");
        assert_eq!(format_launch_date("n/a"), "n/a");
    }

    #[test]
    fn image_resolution_order() {
        let mut m = apollo();
        assert_eq!(m.image_url(), default_image("NASA").unwrap());

        m.agency = "JAXA".into();
        assert_eq!(m.image_url(), default_image("JAXA").unwrap());

        m.agency = "Unknown Space Org".into();
        assert_eq!(m.image_url(), default_image("NASA").unwrap());

        m.image = Some("https://example.org/a.png".into());
        assert_eq!(m.image_url(), "https://example.org/a.png");
    }

    #[test]
    fn draft_round_trip_treats_blank_image_as_none() {
        let mut draft = MissionDraft::from(&apollo());
        assert_eq!(draft.image, "");
        draft.image = "   ".into();
        let m = Mission::from_draft(3, draft);
        assert_eq!(m.id, 3);
        assert!(m.image.is_none());
    }
}
