//! Exercise shapes and distractor sampling shared by Learn, Practice,
//! and Review session assembly. Sampling is rejection-free: the
//! candidate set is pre-filtered before a single uniform draw, never
//! drawn-and-retried.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::db::models::Word;
use crate::domain::pool::ExerciseType;

/// One answer choice. Which fields are populated depends on the
/// exercise type: Reading shows translation + image and never reveals
/// the option's headword; Listening and Speaking show the headword
/// (read aloud / to be pronounced) and never the translation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseOption {
    pub word_id: String,
    pub headword: Option<String>,
    pub translation: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub word_id: String,
    pub exercise_type: ExerciseType,
    pub sentence_source: String,
    pub sentence_translation: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub options: Vec<ExerciseOption>,
    pub correct_index: usize,
}

/// Reading shows translation + image; the option side never carries a
/// headword (spec §4.2: "never reveal the headword on the option
/// side"). Listening options are headwords (client plays audio
/// separately). Speaking options describe pronunciation targets, which
/// this crate represents as the headword the candidate must produce.
fn option_for(word: &Word, exercise_type: ExerciseType) -> ExerciseOption {
    match exercise_type {
        ExerciseType::ReadingLv1 | ExerciseType::ReadingLv2 => ExerciseOption {
            word_id: word.id.clone(),
            headword: None,
            translation: Some(word.translation.clone()),
            image_url: word.image_url.clone(),
        },
        ExerciseType::ListeningLv1 | ExerciseType::SpeakingLv1 | ExerciseType::SpeakingLv2 => ExerciseOption {
            word_id: word.id.clone(),
            headword: Some(word.headword.clone()),
            translation: None,
            image_url: None,
        },
    }
}

/// Draws up to 3 distractors uniformly without replacement from
/// `catalog`, excluding `target` by id. Fewer than 3 other words in
/// the catalog yields a shorter (but still correct) option list —
/// callers with a catalog this small are out of scope for the 4-option
/// guarantee, which assumes a catalog well above session size.
fn sample_distractors<R: Rng + ?Sized>(catalog: &[Word], target: &Word, rng: &mut R) -> Vec<Word> {
    let mut pool: Vec<&Word> = catalog.iter().filter(|w| w.id != target.id).collect();
    pool.shuffle(rng);
    pool.into_iter().take(3).cloned().collect()
}

/// Builds one exercise for `target`, drawing distractors from
/// `catalog` and placing the correct option at a uniformly random
/// index. `catalog` must not be empty-of-target; callers pass the full
/// catalog minus nothing, this function excludes `target` itself.
pub fn build_exercise<R: Rng + ?Sized>(
    target: &Word,
    exercise_type: ExerciseType,
    catalog: &[Word],
    rng: &mut R,
) -> Exercise {
    let distractors = sample_distractors(catalog, target, rng);
    let mut options: Vec<ExerciseOption> = distractors
        .iter()
        .map(|w| option_for(w, exercise_type))
        .collect();
    let correct_index = rng.random_range(0..=options.len());
    options.insert(correct_index, option_for(target, exercise_type));

    Exercise {
        word_id: target.id.clone(),
        exercise_type,
        sentence_source: target.sentence_source.clone(),
        sentence_translation: target.sentence_translation.clone(),
        image_url: target.image_url.clone(),
        audio_url: target.audio_url.clone(),
        options,
        correct_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: &str) -> Word {
        Word {
            id: id.to_string(),
            headword: format!("word-{id}"),
            translation: format!("translation-{id}"),
            sentence_source: "source".into(),
            sentence_translation: "translation".into(),
            image_url: None,
            audio_url: None,
            level: None,
            category: None,
            insertion_order: 0,
        }
    }

    #[test]
    fn correct_option_points_at_target_and_options_are_distinct() {
        let catalog: Vec<Word> = (0..10).map(|i| word(&i.to_string())).collect();
        let target = catalog[0].clone();
        let mut rng = rand::rng();
        let exercise = build_exercise(&target, ExerciseType::ReadingLv1, &catalog, &mut rng);

        assert_eq!(exercise.options[exercise.correct_index].word_id, target.id);
        let mut ids: Vec<&str> = exercise.options.iter().map(|o| o.word_id.as_str()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn distractors_never_include_the_target() {
        let catalog: Vec<Word> = (0..10).map(|i| word(&i.to_string())).collect();
        let target = catalog[3].clone();
        let mut rng = rand::rng();
        for _ in 0..20 {
            let exercise = build_exercise(&target, ExerciseType::ReadingLv1, &catalog, &mut rng);
            let correct_count = exercise
                .options
                .iter()
                .filter(|o| o.word_id == target.id)
                .count();
            assert_eq!(correct_count, 1);
        }
    }

    #[test]
    fn option_content_matches_exercise_type() {
        let catalog: Vec<Word> = (0..10).map(|i| word(&i.to_string())).collect();
        let target = catalog[0].clone();
        let mut rng = rand::rng();

        let reading = build_exercise(&target, ExerciseType::ReadingLv1, &catalog, &mut rng);
        for opt in &reading.options {
            assert!(opt.translation.is_some());
            assert!(opt.headword.is_none());
        }

        let listening = build_exercise(&target, ExerciseType::ListeningLv1, &catalog, &mut rng);
        for opt in &listening.options {
            assert!(opt.headword.is_some());
            assert!(opt.translation.is_none());
        }

        let speaking = build_exercise(&target, ExerciseType::SpeakingLv1, &catalog, &mut rng);
        for opt in &speaking.options {
            assert!(opt.headword.is_some());
            assert!(opt.translation.is_none());
        }
    }
}
