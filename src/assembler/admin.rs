use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AssemblerError;
use crate::db::models::Word;
use crate::db::store::{Catalog, ProgressStore};
use crate::domain::pool::Pool;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResult {
    pub words_reset: usize,
}

pub async fn reset_progress(store: &dyn ProgressStore, user_id: &str) -> Result<ResetResult, AssemblerError> {
    let words_reset = store.reset_all(user_id).await?;
    Ok(ResetResult { words_reset })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntry {
    pub word_id: String,
    pub headword: String,
    pub translation: String,
    pub next_available_time: Option<DateTime<Utc>>,
}

/// P0 has no progress row to read from, so its entries are synthesized
/// from the catalog minus whatever the user already has a row for.
pub async fn list_pool(
    store: &dyn ProgressStore,
    catalog: &dyn Catalog,
    user_id: &str,
) -> Result<HashMap<String, Vec<PoolEntry>>, AssemblerError> {
    let progress = store.list_for_user(user_id).await?;
    let words = catalog.list_all().await?;
    let by_id: HashMap<&str, &Word> = words.iter().map(|w| (w.id.as_str(), w)).collect();

    let mut pools: HashMap<String, Vec<PoolEntry>> = HashMap::new();
    for row in &progress {
        let Some(word) = by_id.get(row.word_id.as_str()) else {
            continue;
        };
        pools.entry(row.pool.as_db_str()).or_default().push(PoolEntry {
            word_id: word.id.clone(),
            headword: word.headword.clone(),
            translation: word.translation.clone(),
            next_available_time: row.next_available_time,
        });
    }

    let progressed: HashSet<&str> = progress.iter().map(|p| p.word_id.as_str()).collect();
    let p0_entries: Vec<PoolEntry> = words
        .iter()
        .filter(|w| !progressed.contains(w.id.as_str()))
        .map(|w| PoolEntry {
            word_id: w.id.clone(),
            headword: w.headword.clone(),
            translation: w.translation.clone(),
            next_available_time: None,
        })
        .collect();
    if !p0_entries.is_empty() {
        pools.entry(Pool::P(0).as_db_str()).or_default().extend(p0_entries);
    }

    Ok(pools)
}
