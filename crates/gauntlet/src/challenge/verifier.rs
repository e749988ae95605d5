//! Answer verification logic.

use gauntlet_common::{Attempt, ChallengeSpec, CorrectAnswer, Direction};

/// Check an attempt against a challenge's answer.
///
/// An attempt of the wrong kind is simply incorrect.
pub fn verify(spec: &ChallengeSpec, attempt: &Attempt) -> bool {
    let success = match (&spec.answer, attempt) {
        (CorrectAnswer::Text { text }, Attempt::Text(input)) => input.to_uppercase() == *text,
        (CorrectAnswer::Tiles { ids }, Attempt::Tiles(selected)) => selected == ids,
        (CorrectAnswer::Sequence { sequence }, Attempt::Sequence(input)) => {
            first_mismatch(sequence, input).is_none() && input.len() == sequence.len()
        }
        (CorrectAnswer::Target { target, tolerance }, Attempt::Slider(position)) => {
            position.abs_diff(*target) <= *tolerance
        }
        _ => false,
    };

    tracing::trace!(kind = ?spec.kind, success, "Verified attempt");
    success
}

/// Index of the first position where `input` departs from `expected`.
///
/// Input longer than the sequence mismatches at the first extra element.
pub fn first_mismatch(expected: &[Direction], input: &[Direction]) -> Option<usize> {
    input
        .iter()
        .enumerate()
        .find(|&(i, dir)| expected.get(i) != Some(dir))
        .map(|(i, _)| i)
}

/// Result of feeding one click into a [`SequenceProgress`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Correct so far; carries how many arrows are matched
    Advanced(usize),
    /// The whole sequence was entered correctly
    Complete,
    /// Wrong arrow at `position`; progress is back to zero
    Mismatch { position: usize },
}

/// Click-by-click entry of an ordered sequence.
///
/// A wrong click rejects immediately and discards everything entered so far.
#[derive(Debug, Clone)]
pub struct SequenceProgress {
    expected: Vec<Direction>,
    entered: Vec<Direction>,
}

impl SequenceProgress {
    pub fn new(expected: Vec<Direction>) -> Self {
        Self {
            entered: Vec::with_capacity(expected.len()),
            expected,
        }
    }

    pub fn entered(&self) -> &[Direction] {
        &self.entered
    }

    pub fn expected(&self) -> &[Direction] {
        &self.expected
    }

    pub fn push(&mut self, dir: Direction) -> SequenceStep {
        let position = self.entered.len();
        if self.expected.get(position) != Some(&dir) {
            self.entered.clear();
            return SequenceStep::Mismatch { position };
        }

        self.entered.push(dir);
        if self.entered.len() == self.expected.len() {
            SequenceStep::Complete
        } else {
            SequenceStep::Advanced(self.entered.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_common::{ChallengeKind, RenderData};
    use gauntlet_common::Direction::{Down, Left, Right, Up};
    use std::collections::BTreeSet;

    fn text_spec(text: &str) -> ChallengeSpec {
        ChallengeSpec {
            kind: ChallengeKind::TextEntry,
            question: String::new(),
            answer: CorrectAnswer::Text {
                text: text.to_string(),
            },
            render: RenderData::Text {
                text: text.to_string(),
            },
        }
    }

    fn slider_spec(target: u8) -> ChallengeSpec {
        ChallengeSpec {
            kind: ChallengeKind::SliderAlign,
            question: String::new(),
            answer: CorrectAnswer::Target {
                target,
                tolerance: 5,
            },
            render: RenderData::Slider {
                target,
                tolerance: 5,
            },
        }
    }

    fn tiles_spec(ids: &[u8]) -> ChallengeSpec {
        ChallengeSpec {
            kind: ChallengeKind::ImageSelect,
            question: String::new(),
            answer: CorrectAnswer::Tiles {
                ids: ids.iter().copied().collect(),
            },
            render: RenderData::Grid {
                category: "trees".to_string(),
                tiles: vec![],
            },
        }
    }

    fn set(ids: &[u8]) -> BTreeSet<u8> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_text_any_case() {
        let spec = text_spec("AB3XYZ");
        assert!(verify(&spec, &Attempt::Text("AB3XYZ".into())));
        assert!(verify(&spec, &Attempt::Text("ab3xyz".into())));
        assert!(verify(&spec, &Attempt::Text("Ab3xYz".into())));
    }

    #[test]
    fn test_text_single_deviation_fails() {
        let spec = text_spec("AB3XYZ");
        assert!(!verify(&spec, &Attempt::Text("AB3XYA".into())));
        assert!(!verify(&spec, &Attempt::Text("AB3XY".into())));
        assert!(!verify(&spec, &Attempt::Text("AB3XYZZ".into())));
    }

    #[test]
    fn test_tiles_exact_set_only() {
        let spec = tiles_spec(&[2, 5, 9]);
        assert!(verify(&spec, &Attempt::Tiles(set(&[9, 2, 5]))));
        assert!(!verify(&spec, &Attempt::Tiles(set(&[2, 5]))));
        assert!(!verify(&spec, &Attempt::Tiles(set(&[2, 5, 9, 10]))));
        assert!(!verify(&spec, &Attempt::Tiles(set(&[2, 5, 8]))));
    }

    #[test]
    fn test_slider_tolerance_is_inclusive() {
        let spec = slider_spec(75);
        for position in 70..=80 {
            assert!(verify(&spec, &Attempt::Slider(position)), "{position}");
        }
        assert!(!verify(&spec, &Attempt::Slider(69)));
        assert!(!verify(&spec, &Attempt::Slider(81)));
    }

    #[test]
    fn test_wrong_kind_is_incorrect() {
        assert!(!verify(&slider_spec(75), &Attempt::Text("75".into())));
    }

    #[test]
    fn test_first_mismatch() {
        let expected = [Up, Up, Left, Down, Right];
        assert_eq!(first_mismatch(&expected, &[Up, Up]), None);
        assert_eq!(first_mismatch(&expected, &[Up, Down, Left]), Some(1));
        assert_eq!(
            first_mismatch(&expected, &[Up, Up, Left, Down, Right, Up]),
            Some(5)
        );
    }

    #[test]
    fn test_sequence_completes_after_all_clicks() {
        let mut progress = SequenceProgress::new(vec![Up, Right, Down, Left, Up]);
        assert_eq!(progress.push(Up), SequenceStep::Advanced(1));
        assert_eq!(progress.push(Right), SequenceStep::Advanced(2));
        assert_eq!(progress.push(Down), SequenceStep::Advanced(3));
        assert_eq!(progress.push(Left), SequenceStep::Advanced(4));
        assert_eq!(progress.push(Up), SequenceStep::Complete);
    }

    #[test]
    fn test_sequence_mismatch_resets_to_zero() {
        let mut progress = SequenceProgress::new(vec![Up, Right, Down, Left, Up]);
        progress.push(Up);
        progress.push(Right);
        assert_eq!(progress.push(Up), SequenceStep::Mismatch { position: 2 });
        assert!(progress.entered().is_empty());

        // No resume from the mismatch point
        assert_eq!(progress.push(Down), SequenceStep::Mismatch { position: 0 });
        assert_eq!(progress.push(Up), SequenceStep::Advanced(1));
    }

    #[test]
    fn test_sequence_attempt_must_be_complete() {
        let spec = ChallengeSpec {
            kind: ChallengeKind::OrderedInput,
            question: String::new(),
            answer: CorrectAnswer::Sequence {
                sequence: vec![Up, Right, Down, Left, Up],
            },
            render: RenderData::Sequence {
                sequence: vec![Up, Right, Down, Left, Up],
            },
        };
        assert!(verify(&spec, &Attempt::Sequence(vec![Up, Right, Down, Left, Up])));
        assert!(!verify(&spec, &Attempt::Sequence(vec![Up, Right, Down])));
        assert!(!verify(&spec, &Attempt::Sequence(vec![Up, Left, Down, Left, Up])));
    }
}
