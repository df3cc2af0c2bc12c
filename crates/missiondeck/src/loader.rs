//! Loading the catalog document, with fallback on failure.
//!
//! The document is `{"missions": [...]}`, read once at start-up from a local
//! file or an HTTP(S) URL. It is checked against the JSON Schema derived from
//! [`MissionDocument`] before deserializing, so a bad record is reported by
//! its path (`/missions/3/launchDate`) rather than by byte offset.
//!
//! Loading never fails outright: any error yields the [`FallbackPolicy`]
//! list plus a [`LoadNotice`] for the user.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::mission::Mission;

/// Top-level shape of the catalog document.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MissionDocument {
    pub missions: Vec<Mission>,
}

/// Where the catalog document comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("data source must not be empty".into());
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// What to show when the document cannot be loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FallbackPolicy {
    /// Start with no missions.
    #[default]
    Empty,
    /// Start with the built-in sample missions.
    Samples,
}

/// User-visible message explaining a failed load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadNotice {
    pub title: String,
    pub message: String,
    /// Underlying error, for logs and diagnostics.
    pub detail: String,
}

impl LoadNotice {
    fn from_error(source: &DataSource, detail: String) -> Self {
        let file = match source {
            DataSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            DataSource::Url(url) => url.clone(),
        };
        Self {
            title: "Erreur de chargement".into(),
            message: format!("Impossible de charger les missions. Vérifiez que le fichier {file} existe."),
            detail,
        }
    }
}

/// Result of a load: the missions to start with and, on failure, a notice.
#[derive(Clone, Debug)]
pub struct LoadOutcome {
    pub missions: Vec<Mission>,
    pub notice: Option<LoadNotice>,
}

/// JSON Schema of the catalog document.
pub fn document_schema() -> serde_json::Value {
    crate::json_schema_for::<MissionDocument>()
}

/// Validate and deserialize a catalog document.
pub fn parse_document(raw: &str) -> Result<Vec<Mission>, String> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("Invalid JSON: {e}"))?;

    let schema = document_schema();
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| format!("Invalid document schema: {e}"))?;
    let errors: Vec<String> = validator
        .iter_errors(&value)
        .map(|e| format!("  - {}: {e}", e.instance_path()))
        .collect();
    if !errors.is_empty() {
        return Err(format!(
            "Document does not match the mission schema:\n{}",
            errors.join("\n")
        ));
    }

    let doc: MissionDocument =
        serde_json::from_value(value).map_err(|e| format!("Invalid mission document: {e}"))?;
    Ok(doc.missions)
}

/// Read the raw document text from its source.
pub async fn fetch_document(source: &DataSource) -> Result<String, String> {
    match source {
        DataSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read {}: {e}", path.display())),
        DataSource::Url(url) => {
            let resp = reqwest::get(url)
                .await
                .map_err(|e| format!("Failed to fetch {url}: {e}"))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(format!("Failed to fetch {url}: HTTP {status}"));
            }
            resp.text()
                .await
                .map_err(|e| format!("Failed to read response from {url}: {e}"))
        }
    }
}

/// Load the catalog, falling back per `policy` on any failure.
pub async fn load_missions(source: &DataSource, policy: FallbackPolicy) -> LoadOutcome {
    let result = match fetch_document(source).await {
        Ok(raw) => parse_document(&raw),
        Err(e) => Err(e),
    };

    match result {
        Ok(missions) => {
            info!("Loaded {} missions from {source}", missions.len());
            LoadOutcome {
                missions,
                notice: None,
            }
        }
        Err(detail) => {
            warn!("Falling back to {policy:?} catalog: {detail}");
            let missions = match policy {
                FallbackPolicy::Empty => Vec::new(),
                FallbackPolicy::Samples => sample_missions(),
            };
            LoadOutcome {
                missions,
                notice: Some(LoadNotice::from_error(source, detail)),
            }
        }
    }
}

/// Built-in missions used by [`FallbackPolicy::Samples`].
pub fn sample_missions() -> Vec<Mission> {
    let m = |id: u32, name: &str, agency: &str, objective: &str, date: &str, kind: &str| Mission {
        id,
        name: name.into(),
        agency: agency.into(),
        objective: objective.into(),
        launch_date: date.into(),
        kind: kind.into(),
        image: None,
    };
    vec![
        m(
            1,
            "Apollo 11",
            "NASA",
            "Premier alunissage habité de l'histoire",
            "1969-07-16",
            "Alunissage",
        ),
        m(
            2,
            "Rosetta",
            "ESA",
            "Étudier la comète 67P/Tchourioumov-Guérassimenko",
            "2004-03-02",
            "Sonde spatiale",
        ),
        m(
            3,
            "Chang'e 4",
            "CNSA",
            "Premier atterrissage sur la face cachée de la Lune",
            "2018-12-07",
            "Alunissage",
        ),
        m(
            4,
            "Hope",
            "MBRSC",
            "Étudier l'atmosphère de Mars",
            "2020-07-19",
            "Orbiteur",
        ),
        m(
            5,
            "Chandrayaan-3",
            "ISRO",
            "Atterrissage près du pôle Sud lunaire",
            "2023-07-14",
            "Alunissage",
        ),
    ]
}
