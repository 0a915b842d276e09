use serde::{Deserialize, Serialize};

/// A read-only catalog entry. The catalog is an external collaborator
/// (spec §1); this crate only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub headword: String,
    pub translation: String,
    pub sentence_source: String,
    pub sentence_translation: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub level: Option<String>,
    pub category: Option<String>,
    /// Stable catalog insertion order, used as the final tiebreaker
    /// when ordering P0 candidates (spec §4.2).
    pub insertion_order: i64,
}
