//! Confusable phoneme table.
//!
//! Per-language configuration data mapping a phoneme to the sounds learners
//! commonly substitute for it. A substitution inside the set scores partial
//! credit instead of zero. The table below covers Kazakh Cyrillic.

/// Phonemes and their perceptually-confusable neighbors.
pub const CONFUSABLE_PHONEMES: &[(char, &[char])] = &[
    ('қ', &['к', 'х']),
    ('ғ', &['г']),
    ('ң', &['н', 'м']),
    ('ә', &['а', 'е']),
    ('ө', &['о', 'ұ']),
    ('ү', &['у', 'ұ']),
    ('һ', &['х']),
    ('і', &['ы', 'и']),
    ('ы', &['і', 'и']),
    ('и', &['і', 'ы']),
];

/// Sounds confusable with `phoneme`, empty when it has no entry.
pub fn confusable_with(phoneme: char) -> &'static [char] {
    CONFUSABLE_PHONEMES
        .iter()
        .find(|(p, _)| *p == phoneme)
        .map(|(_, set)| *set)
        .unwrap_or(&[])
}

/// Perceptual similarity between a reference phoneme and its realization.
///
/// 1.0 for an exact match, 0.5 when the realization is in the reference
/// phoneme's confusable set, 0.0 otherwise.
pub fn phoneme_similarity(reference: char, predicted: char) -> f64 {
    if reference == predicted {
        1.0
    } else if confusable_with(reference).contains(&predicted) {
        0.5
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_similarity() {
        assert_eq!(phoneme_similarity('а', 'а'), 1.0);
    }

    #[test]
    fn test_confusable_similarity() {
        assert_eq!(phoneme_similarity('қ', 'к'), 0.5);
        assert_eq!(phoneme_similarity('қ', 'х'), 0.5);
        assert_eq!(phoneme_similarity('ң', 'м'), 0.5);
    }

    #[test]
    fn test_unrelated_similarity() {
        assert_eq!(phoneme_similarity('қ', 'б'), 0.0);
        // confusability is directional: 'к' has no entry of its own
        assert_eq!(phoneme_similarity('к', 'қ'), 0.0);
    }

    #[test]
    fn test_confusable_set_lookup() {
        assert_eq!(confusable_with('і'), &['ы', 'и']);
        assert!(confusable_with('б').is_empty());
    }
}
