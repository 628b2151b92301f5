//! Stage catalog - localized titles and descriptions for each stage.
//!
//! Catalogs are JSON arrays of `{ "id", "title", "description" }` objects,
//! one per stage in life-cycle order. Two are bundled with the crate.

use serde::{Deserialize, Serialize};

use crate::stages::StageId;

const ENGLISH_JSON: &str = include_str!("../../../data/stages.en.json");
const KOREAN_JSON: &str = include_str!("../../../data/stages.ko.json");

/// Display text for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageInfo {
    pub id: StageId,
    pub title: String,
    pub description: String,
}

/// Bundled catalog languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
}

impl Language {
    /// Short code used on the command line and in config files
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Korean => "ko",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::English),
            "ko" => Ok(Language::Korean),
            other => Err(CatalogError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Validated, ordered list of stage infos
#[derive(Debug, Clone, PartialEq)]
pub struct StageCatalog {
    entries: Vec<StageInfo>,
}

impl StageCatalog {
    /// Parse and validate a catalog
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<StageInfo> = serde_json::from_str(json)?;
        validate(&entries)?;
        Ok(Self { entries })
    }

    /// One of the catalogs shipped with the crate
    pub fn bundled(language: Language) -> Result<Self, CatalogError> {
        match language {
            Language::English => Self::from_json(ENGLISH_JSON),
            Language::Korean => Self::from_json(KOREAN_JSON),
        }
    }

    pub fn entries(&self) -> &[StageInfo] {
        &self.entries
    }

    pub fn get(&self, id: StageId) -> Option<&StageInfo> {
        self.entries.get(id.ordinal())
    }

    pub fn into_entries(self) -> Vec<StageInfo> {
        self.entries
    }
}

/// Every stage exactly once, in life-cycle order
fn validate(entries: &[StageInfo]) -> Result<(), CatalogError> {
    let mut seen = Vec::with_capacity(entries.len());
    for (ordinal, entry) in entries.iter().enumerate() {
        if seen.contains(&entry.id) {
            return Err(CatalogError::Duplicate(entry.id));
        }
        seen.push(entry.id);

        let expected = StageId::ALL[ordinal];
        if entry.id != expected {
            return Err(CatalogError::OutOfOrder {
                expected,
                found: entry.id,
            });
        }
    }

    match StageId::ALL.iter().find(|id| !seen.contains(id)) {
        Some(missing) => Err(CatalogError::Missing(*missing)),
        None => Ok(()),
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Json(serde_json::Error),
    Duplicate(StageId),
    Missing(StageId),
    OutOfOrder { expected: StageId, found: StageId },
    UnknownLanguage(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Json(e)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Json(e) => write!(f, "Catalog parse error: {}", e),
            CatalogError::Duplicate(id) => write!(f, "Stage '{}' listed more than once", id),
            CatalogError::Missing(id) => write!(f, "Stage '{}' missing from catalog", id),
            CatalogError::OutOfOrder { expected, found } => {
                write!(f, "Catalog out of order: expected '{}', found '{}'", expected, found)
            }
            CatalogError::UnknownLanguage(lang) => write!(f, "No bundled catalog for language '{}'", lang),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Json(e) => Some(e),
            _ => None,
        }
    }
}
