use crate::WordEntry;
use crate::input::parse_synonyms;

#[cfg(test)]
use crate::{OPTION_COUNT, generate_options, select_questions};
#[cfg(test)]
use rand::SeedableRng;

/// Attempt count suggested for the offline demo quiz.
pub const DEMO_ATTEMPT_COUNT: usize = 4;

fn demo_entries() -> Vec<(&'static str, &'static str)> {
    vec![
        ("happy", "joyful, glad, cheerful"),
        ("sad", "unhappy, blue, downcast"),
        ("angry", "mad, irate, furious"),
        ("calm", "serene, tranquil"),
        ("brave", "courageous, bold, valiant"),
        ("tired", "weary, exhausted"),
        ("quick", "rapid, swift, brisk"),
        ("honest", "truthful, sincere"),
    ]
}

/// Word pairs bundled with the client for trying the quiz without the
/// word service.
pub fn demo_word_pairs() -> Vec<WordEntry> {
    demo_entries()
        .into_iter()
        .map(|(word, synonyms)| WordEntry::new(word, parse_synonyms(synonyms)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn dataset_has_unique_words() {
        let pairs = demo_word_pairs();
        let words: HashSet<&str> = pairs.iter().map(|entry| entry.word.as_str()).collect();

        assert_eq!(words.len(), pairs.len());
        assert!(pairs.iter().all(|entry| !entry.synonyms.is_empty()));
    }

    #[test]
    fn dataset_supports_full_option_sets() {
        let pairs = demo_word_pairs();
        let mut rng = StdRng::seed_from_u64(10);

        let questions = select_questions(&mut rng, &pairs, DEMO_ATTEMPT_COUNT)
            .expect("dataset should cover the demo quiz");

        for question in &questions {
            let options = generate_options(&mut rng, question, &pairs);
            assert_eq!(options.len(), OPTION_COUNT);
        }
    }
}
