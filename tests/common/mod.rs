use std::sync::Arc;

use axum::Router;
use lexwell_backend_rust::db::memory::{MemoryCatalog, MemoryProgressStore};
use lexwell_backend_rust::db::models::Word;

pub fn word(id: &str, insertion_order: i64) -> Word {
    Word {
        id: id.to_string(),
        headword: format!("head-{id}"),
        translation: format!("trans-{id}"),
        sentence_source: "a sentence with ___".to_string(),
        sentence_translation: "a translated sentence".to_string(),
        image_url: None,
        audio_url: None,
        level: None,
        category: None,
        insertion_order,
    }
}

pub fn catalog(n: usize) -> Vec<Word> {
    (0..n).map(|i| word(&format!("w{i}"), i as i64)).collect()
}

pub fn create_test_app(words: Vec<Word>) -> Router {
    let store = Arc::new(MemoryProgressStore::new());
    let catalog = Arc::new(MemoryCatalog::new(words));
    lexwell_backend_rust::create_app_with(store, catalog)
}
