//! Phoneme-Level Alignment
//!
//! Aligns a recognized transcription against the reference word with a
//! minimum-edit-operation (Levenshtein) alignment and classifies every
//! reference position as a match, substitution, or omission. Extra sounds in
//! the hypothesis are reported separately so they never disturb reference
//! ordering.

use crate::error::AnalysisError;
use crate::phonemes;
use crate::types::{AlignmentResult, ExtraSound, PhonemeDetail, PhonemeOutcome};

/// A single unit-cost edit operation, with the indices it touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditOp {
    Replace { i: usize, j: usize },
    Delete { i: usize },
    Insert { j: usize },
}

/// Align `hypothesis` against `reference` (both case-folded).
///
/// The reference must be non-empty; the hypothesis may be empty, in which
/// case every reference position is an omission.
pub fn align(reference: &str, hypothesis: &str) -> Result<AlignmentResult, AnalysisError> {
    let ref_chars: Vec<char> = reference.to_lowercase().chars().collect();
    if ref_chars.is_empty() {
        return Err(AnalysisError::EmptyReference);
    }
    let hyp_chars: Vec<char> = hypothesis.to_lowercase().chars().collect();

    let total = ref_chars.len();
    let ops = edit_ops(&ref_chars, &hyp_chars);

    if ops.is_empty() {
        // Identical texts: by definition a perfect score, no division involved.
        let phoneme_details = ref_chars
            .iter()
            .map(|&c| PhonemeDetail {
                phoneme: c,
                correct: true,
                similarity: 1.0,
                outcome: PhonemeOutcome::Match,
            })
            .collect();
        return Ok(AlignmentResult {
            total_phonemes: total,
            correct_phonemes: total,
            accuracy: 100.0,
            phoneme_details,
            insertions: Vec::new(),
        });
    }

    // Details carry their reference index so ordering is by position, never
    // by first-occurrence-of-character (which breaks on repeated letters).
    let mut indexed: Vec<(usize, PhonemeDetail)> = Vec::with_capacity(total);
    let mut insertions = Vec::new();
    let mut touched = vec![false; total];
    let mut penalized = 0usize;

    for op in &ops {
        match *op {
            EditOp::Replace { i, j } => {
                touched[i] = true;
                penalized += 1;
                let reference_phoneme = ref_chars[i];
                let predicted = hyp_chars[j];
                indexed.push((
                    i,
                    PhonemeDetail {
                        phoneme: reference_phoneme,
                        correct: false,
                        similarity: phonemes::phoneme_similarity(reference_phoneme, predicted),
                        outcome: PhonemeOutcome::Substitution {
                            predicted_as: predicted,
                            similar_to: phonemes::confusable_with(reference_phoneme).to_vec(),
                        },
                    },
                ));
            }
            EditOp::Delete { i } => {
                touched[i] = true;
                penalized += 1;
                indexed.push((
                    i,
                    PhonemeDetail {
                        phoneme: ref_chars[i],
                        correct: false,
                        similarity: 0.0,
                        outcome: PhonemeOutcome::Omission,
                    },
                ));
            }
            EditOp::Insert { j } => {
                // Does not consume a reference position and never reduces
                // correctness of any reference phoneme.
                insertions.push(ExtraSound {
                    extra: hyp_chars[j],
                });
            }
        }
    }

    for (i, &c) in ref_chars.iter().enumerate() {
        if !touched[i] {
            indexed.push((
                i,
                PhonemeDetail {
                    phoneme: c,
                    correct: true,
                    similarity: 1.0,
                    outcome: PhonemeOutcome::Match,
                },
            ));
        }
    }

    indexed.sort_by_key(|(i, _)| *i);
    let phoneme_details: Vec<PhonemeDetail> = indexed.into_iter().map(|(_, d)| d).collect();

    let correct_phonemes = total - penalized;
    let accuracy = correct_phonemes as f64 / total as f64 * 100.0;

    Ok(AlignmentResult {
        total_phonemes: total,
        correct_phonemes,
        accuracy,
        phoneme_details,
        insertions,
    })
}

/// Minimum-edit-operation script between `a` and `b`, unit cost each.
///
/// Equal positions are skipped; only replace/delete/insert appear in the
/// returned script, in ascending order of the indices they touch.
fn edit_ops(a: &[char], b: &[char]) -> Vec<EditOp> {
    let m = a.len();
    let n = b.len();

    let mut d = vec![vec![0u32; n + 1]; m + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i as u32;
    }
    for j in 0..=n {
        d[0][j] = j as u32;
    }
    for i in 1..=m {
        for j in 1..=n {
            let cost = u32::from(a[i - 1] != b[j - 1]);
            d[i][j] = (d[i - 1][j - 1] + cost)
                .min(d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1);
        }
    }

    let mut ops = Vec::new();
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] && d[i][j] == d[i - 1][j - 1] {
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && d[i][j] == d[i - 1][j - 1] + 1 {
            ops.push(EditOp::Replace { i: i - 1, j: j - 1 });
            i -= 1;
            j -= 1;
        } else if i > 0 && d[i][j] == d[i - 1][j] + 1 {
            ops.push(EditOp::Delete { i: i - 1 });
            i -= 1;
        } else {
            ops.push(EditOp::Insert { j: j - 1 });
            j -= 1;
        }
    }
    ops.reverse();
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn phoneme_sequence(result: &AlignmentResult) -> String {
        result.phoneme_details.iter().map(|d| d.phoneme).collect()
    }

    #[test]
    fn test_identical_text_is_perfect() {
        let result = align("ана", "ана").unwrap();
        assert_eq!(result.total_phonemes, 3);
        assert_eq!(result.correct_phonemes, 3);
        assert_eq!(result.accuracy, 100.0);
        assert!(result
            .phoneme_details
            .iter()
            .all(|d| d.correct && d.similarity == 1.0 && d.outcome == PhonemeOutcome::Match));
        assert!(result.insertions.is_empty());
    }

    #[test]
    fn test_case_folded_before_comparison() {
        let result = align("Ана", "анА").unwrap();
        assert_eq!(result.accuracy, 100.0);
    }

    #[test]
    fn test_single_substitution() {
        let result = align("ана", "апа").unwrap();
        assert_eq!(result.total_phonemes, 3);
        assert_eq!(result.correct_phonemes, 2);
        assert_relative_eq!(result.accuracy, 200.0 / 3.0, epsilon = 1e-9);
        assert_eq!(phoneme_sequence(&result), "ана");

        assert_eq!(result.phoneme_details[0].outcome, PhonemeOutcome::Match);
        assert_eq!(
            result.phoneme_details[1].outcome,
            PhonemeOutcome::Substitution {
                predicted_as: 'п',
                similar_to: vec![],
            }
        );
        assert_eq!(result.phoneme_details[2].outcome, PhonemeOutcome::Match);
    }

    #[test]
    fn test_confusable_substitution_scores_half() {
        let result = align("қант", "кант").unwrap();
        assert_eq!(result.correct_phonemes, 3);
        assert_relative_eq!(result.accuracy, 75.0);

        let detail = &result.phoneme_details[0];
        assert!(!detail.correct);
        assert_eq!(detail.similarity, 0.5);
        assert_eq!(
            detail.outcome,
            PhonemeOutcome::Substitution {
                predicted_as: 'к',
                similar_to: vec!['к', 'х'],
            }
        );
    }

    #[test]
    fn test_empty_hypothesis_is_total_omission() {
        let result = align("су", "").unwrap();
        assert_eq!(result.total_phonemes, 2);
        assert_eq!(result.correct_phonemes, 0);
        assert_eq!(result.accuracy, 0.0);
        assert_eq!(phoneme_sequence(&result), "су");
        assert!(result
            .phoneme_details
            .iter()
            .all(|d| d.outcome == PhonemeOutcome::Omission && d.similarity == 0.0));
    }

    #[test]
    fn test_empty_reference_rejected() {
        assert!(matches!(
            align("", "су"),
            Err(AnalysisError::EmptyReference)
        ));
    }

    #[test]
    fn test_insertion_does_not_reduce_accuracy() {
        let result = align("су", "сту").unwrap();
        assert_eq!(result.correct_phonemes, 2);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.insertions, vec![ExtraSound { extra: 'т' }]);
        assert_eq!(phoneme_sequence(&result), "су");
    }

    #[test]
    fn test_repeated_letters_keep_positional_order() {
        // A first-index-of-character reconstruction would collapse both 'а'
        // positions onto index 0; positional sorting must not.
        let result = align("аа", "ба").unwrap();
        assert_eq!(phoneme_sequence(&result), "аа");
        assert!(matches!(
            result.phoneme_details[0].outcome,
            PhonemeOutcome::Substitution { predicted_as: 'б', .. }
        ));
        assert_eq!(result.phoneme_details[1].outcome, PhonemeOutcome::Match);
    }

    #[test]
    fn test_omission_in_repeated_letter_word() {
        let result = align("банан", "бана").unwrap();
        assert_eq!(result.total_phonemes, 5);
        assert_eq!(result.correct_phonemes, 4);
        assert_eq!(phoneme_sequence(&result), "банан");
        assert_eq!(result.phoneme_details[4].outcome, PhonemeOutcome::Omission);
        assert!(result.phoneme_details[..4].iter().all(|d| d.correct));
    }

    #[test]
    fn test_edit_ops_empty_for_equal_inputs() {
        let a: Vec<char> = "сөз".chars().collect();
        assert!(edit_ops(&a, &a).is_empty());
    }

    #[test]
    fn test_edit_ops_indices() {
        let a: Vec<char> = "ана".chars().collect();
        let b: Vec<char> = "апа".chars().collect();
        assert_eq!(edit_ops(&a, &b), vec![EditOp::Replace { i: 1, j: 1 }]);
    }
}
