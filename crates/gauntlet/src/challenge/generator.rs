//! Challenge generation.
//!
//! Every generator is a pure function of the RNG it is handed, so a seeded
//! `StdRng` reproduces a session exactly.

use gauntlet_common::constants::{grid, sequence, slider, text};
use gauntlet_common::{
    ChallengeKind, ChallengeSpec, CorrectAnswer, Direction, GauntletError, GridTile, RenderData,
};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::BTreeSet;

/// Challenge generator service
pub struct ChallengeGenerator {
    /// Challenges per session
    pub count: usize,
}

impl ChallengeGenerator {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Generate a new session's worth of challenges, one per distinct kind
    pub fn generate_session(&self, rng: &mut impl Rng) -> Result<Vec<ChallengeSpec>, GauntletError> {
        let available = ChallengeKind::ALL.len();
        if self.count == 0 || self.count > available {
            return Err(GauntletError::ChallengeCount {
                requested: self.count,
                available,
            });
        }

        let mut kinds = ChallengeKind::ALL.to_vec();
        kinds.shuffle(rng);
        kinds.truncate(self.count);

        let challenges = kinds
            .into_iter()
            .map(|kind| {
                let spec = generate(kind, rng);
                validate_spec(&spec)?;
                Ok(spec)
            })
            .collect::<Result<Vec<_>, GauntletError>>()?;

        tracing::debug!(
            kinds = ?challenges.iter().map(|c| c.kind).collect::<Vec<_>>(),
            "Generated challenge session"
        );

        Ok(challenges)
    }
}

/// Generate a single challenge of the given kind
pub fn generate(kind: ChallengeKind, rng: &mut impl Rng) -> ChallengeSpec {
    match kind {
        ChallengeKind::TextEntry => distorted_text(rng),
        ChallengeKind::ImageSelect => image_selection(rng),
        ChallengeKind::OrderedInput => arrow_sequence(rng),
        ChallengeKind::SliderAlign => slider_puzzle(rng),
    }
}

fn distorted_text(rng: &mut impl Rng) -> ChallengeSpec {
    let alphabet = text::ALPHABET.as_bytes();
    let text: String = (0..text::LENGTH)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect();

    ChallengeSpec {
        kind: ChallengeKind::TextEntry,
        question: "Enter the characters you see below".to_string(),
        answer: CorrectAnswer::Text { text: text.clone() },
        render: RenderData::Text { text },
    }
}

fn image_selection(rng: &mut impl Rng) -> ChallengeSpec {
    let category = grid::CATEGORIES[rng.random_range(0..grid::CATEGORIES.len())];
    let correct_count = rng.random_range(grid::MIN_CORRECT..=grid::MAX_CORRECT);

    // Ids are handed out before the shuffle so they say nothing about position
    let mut tiles: Vec<GridTile> = (0..grid::TILE_COUNT)
        .map(|i| {
            let correct = i < correct_count;
            let symbol = if correct {
                category.symbol
            } else {
                category.decoys.choose(rng).copied().unwrap_or(category.symbol)
            };
            GridTile {
                id: i as u8,
                symbol: symbol.to_string(),
                correct,
            }
        })
        .collect();
    tiles.shuffle(rng);

    let ids: BTreeSet<u8> = tiles.iter().filter(|t| t.correct).map(|t| t.id).collect();

    ChallengeSpec {
        kind: ChallengeKind::ImageSelect,
        question: format!("Select all images with {}", category.name),
        answer: CorrectAnswer::Tiles { ids },
        render: RenderData::Grid {
            category: category.name.to_string(),
            tiles,
        },
    }
}

fn arrow_sequence(rng: &mut impl Rng) -> ChallengeSpec {
    let sequence: Vec<Direction> = (0..sequence::LENGTH)
        .map(|_| Direction::ALL[rng.random_range(0..Direction::ALL.len())])
        .collect();

    ChallengeSpec {
        kind: ChallengeKind::OrderedInput,
        question: "Click the arrows in the order shown".to_string(),
        answer: CorrectAnswer::Sequence {
            sequence: sequence.clone(),
        },
        render: RenderData::Sequence { sequence },
    }
}

fn slider_puzzle(rng: &mut impl Rng) -> ChallengeSpec {
    let target = rng.random_range(slider::MIN_TARGET..slider::MAX_TARGET);

    ChallengeSpec {
        kind: ChallengeKind::SliderAlign,
        question: "Slide to complete the puzzle".to_string(),
        answer: CorrectAnswer::Target {
            target,
            tolerance: slider::TOLERANCE,
        },
        render: RenderData::Slider {
            target,
            tolerance: slider::TOLERANCE,
        },
    }
}

/// Check a generated spec for data no widget could present or solve.
///
/// A failure here means a generator is broken, so callers must not swallow it.
pub fn validate_spec(spec: &ChallengeSpec) -> Result<(), GauntletError> {
    let degenerate = |reason: &str| GauntletError::DegenerateChallenge {
        kind: spec.kind,
        reason: reason.to_string(),
    };

    match (&spec.answer, &spec.render) {
        (CorrectAnswer::Text { text: answer }, RenderData::Text { text: shown }) => {
            if answer.chars().count() != text::LENGTH {
                return Err(degenerate("text has the wrong length"));
            }
            if answer != shown {
                return Err(degenerate("rendered text differs from answer"));
            }
            if !answer.chars().all(|c| text::ALPHABET.contains(c)) {
                return Err(degenerate("text uses characters outside the alphabet"));
            }
        }
        (CorrectAnswer::Tiles { ids }, RenderData::Grid { tiles, .. }) => {
            if tiles.len() != grid::TILE_COUNT {
                return Err(degenerate("grid does not fill the board"));
            }
            if !(grid::MIN_CORRECT..=grid::MAX_CORRECT).contains(&ids.len()) {
                return Err(degenerate("wrong number of correct tiles"));
            }
            let marked: BTreeSet<u8> = tiles.iter().filter(|t| t.correct).map(|t| t.id).collect();
            if &marked != ids {
                return Err(degenerate("answer ids do not match the marked tiles"));
            }
            let unique: BTreeSet<u8> = tiles.iter().map(|t| t.id).collect();
            if unique.len() != tiles.len() {
                return Err(degenerate("duplicate tile ids"));
            }
        }
        (CorrectAnswer::Sequence { sequence: answer }, RenderData::Sequence { sequence: shown }) => {
            if answer.len() != sequence::LENGTH {
                return Err(degenerate("sequence has the wrong length"));
            }
            if answer != shown {
                return Err(degenerate("rendered sequence differs from answer"));
            }
        }
        (CorrectAnswer::Target { target, tolerance }, RenderData::Slider { target: shown, .. }) => {
            if *target > slider::MAX_POSITION {
                return Err(degenerate("target beyond slider travel"));
            }
            if target != shown {
                return Err(degenerate("rendered target differs from answer"));
            }
            if *tolerance > slider::MAX_POSITION {
                return Err(degenerate("tolerance covers the whole slider"));
            }
        }
        _ => return Err(degenerate("answer and render data disagree on kind")),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_session_has_distinct_kinds() {
        let generator = ChallengeGenerator::new(3);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let session = generator.generate_session(&mut rng).unwrap();
            assert_eq!(session.len(), 3);
            let kinds: BTreeSet<ChallengeKind> = session.iter().map(|c| c.kind).collect();
            assert_eq!(kinds.len(), 3);
        }
    }

    #[test]
    fn test_session_of_four_covers_every_kind() {
        let mut rng = StdRng::seed_from_u64(7);
        let session = ChallengeGenerator::new(4).generate_session(&mut rng).unwrap();
        let kinds: BTreeSet<ChallengeKind> = session.iter().map(|c| c.kind).collect();
        assert_eq!(kinds.len(), 4);
    }

    #[test]
    fn test_same_seed_same_session() {
        let generator = ChallengeGenerator::new(3);
        let a = generator.generate_session(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = generator.generate_session(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_counts() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            ChallengeGenerator::new(0).generate_session(&mut rng),
            Err(GauntletError::ChallengeCount { requested: 0, .. })
        ));
        assert!(matches!(
            ChallengeGenerator::new(5).generate_session(&mut rng),
            Err(GauntletError::ChallengeCount { requested: 5, available: 4 })
        ));
    }

    #[test]
    fn test_text_avoids_ambiguous_characters() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let spec = generate(ChallengeKind::TextEntry, &mut rng);
            let CorrectAnswer::Text { text } = spec.answer else {
                panic!("wrong answer type");
            };
            assert_eq!(text.len(), 6);
            assert!(!text.contains(['I', 'O', '0', '1']));
            assert!(text.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_grid_layout() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let spec = generate(ChallengeKind::ImageSelect, &mut rng);
            let (CorrectAnswer::Tiles { ids }, RenderData::Grid { category, tiles }) =
                (&spec.answer, &spec.render)
            else {
                panic!("wrong payload");
            };
            assert_eq!(tiles.len(), 12);
            assert!((3..=4).contains(&ids.len()));

            let cat = grid::CATEGORIES.iter().find(|c| c.name == category).unwrap();
            for tile in tiles {
                if tile.correct {
                    assert_eq!(tile.symbol, cat.symbol);
                } else {
                    assert!(cat.decoys.contains(&tile.symbol.as_str()));
                }
            }
            assert!(spec.question.ends_with(category.as_str()));
        }
    }

    #[test]
    fn test_sequence_length() {
        let mut rng = StdRng::seed_from_u64(5);
        let spec = generate(ChallengeKind::OrderedInput, &mut rng);
        let CorrectAnswer::Sequence { sequence } = spec.answer else {
            panic!("wrong answer type");
        };
        assert_eq!(sequence.len(), 5);
    }

    #[test]
    fn test_slider_target_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let spec = generate(ChallengeKind::SliderAlign, &mut rng);
            let CorrectAnswer::Target { target, tolerance } = spec.answer else {
                panic!("wrong answer type");
            };
            assert!((70..=79).contains(&target));
            assert_eq!(tolerance, 5);
        }
    }

    #[test]
    fn test_validate_flags_empty_grid() {
        let spec = ChallengeSpec {
            kind: ChallengeKind::ImageSelect,
            question: "Select all images with nothing".to_string(),
            answer: CorrectAnswer::Tiles { ids: BTreeSet::new() },
            render: RenderData::Grid {
                category: "nothing".to_string(),
                tiles: vec![],
            },
        };
        let err = validate_spec(&spec).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_validate_flags_mismatched_payload() {
        let spec = ChallengeSpec {
            kind: ChallengeKind::SliderAlign,
            question: "Slide".to_string(),
            answer: CorrectAnswer::Target {
                target: 75,
                tolerance: 5,
            },
            render: RenderData::Text {
                text: "ABC".to_string(),
            },
        };
        assert!(validate_spec(&spec).is_err());
    }

    fn grid_spec(tile_count: u8, correct: u8) -> ChallengeSpec {
        let tiles: Vec<GridTile> = (0..tile_count)
            .map(|id| GridTile {
                id,
                symbol: (if id < correct { "🌲" } else { "🌵" }).to_string(),
                correct: id < correct,
            })
            .collect();
        ChallengeSpec {
            kind: ChallengeKind::ImageSelect,
            question: "Select all images with trees".to_string(),
            answer: CorrectAnswer::Tiles {
                ids: (0..correct).collect(),
            },
            render: RenderData::Grid {
                category: "trees".to_string(),
                tiles,
            },
        }
    }

    #[test]
    fn test_validate_grid_board_size() {
        assert!(validate_spec(&grid_spec(12, 3)).is_ok());
        assert!(validate_spec(&grid_spec(12, 4)).is_ok());

        let err = validate_spec(&grid_spec(2, 2)).unwrap_err();
        assert!(matches!(
            err,
            GauntletError::DegenerateChallenge {
                kind: ChallengeKind::ImageSelect,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_grid_correct_count() {
        assert!(validate_spec(&grid_spec(12, 0)).is_err());
        assert!(validate_spec(&grid_spec(12, 2)).is_err());
        assert!(validate_spec(&grid_spec(12, 5)).is_err());
    }

    #[test]
    fn test_validate_text_length() {
        let spec = |text: &str| ChallengeSpec {
            kind: ChallengeKind::TextEntry,
            question: "Enter the characters you see below".to_string(),
            answer: CorrectAnswer::Text {
                text: text.to_string(),
            },
            render: RenderData::Text {
                text: text.to_string(),
            },
        };
        assert!(validate_spec(&spec("AB3XYZ")).is_ok());
        assert!(validate_spec(&spec("AB")).is_err());
        assert!(validate_spec(&spec("AB3XYZW")).is_err());
        assert!(validate_spec(&spec("")).is_err());
    }

    #[test]
    fn test_validate_sequence_length() {
        let spec = |sequence: Vec<Direction>| ChallengeSpec {
            kind: ChallengeKind::OrderedInput,
            question: "Click the arrows in the order shown".to_string(),
            answer: CorrectAnswer::Sequence {
                sequence: sequence.clone(),
            },
            render: RenderData::Sequence { sequence },
        };
        assert!(validate_spec(&spec(vec![Direction::Up; 5])).is_ok());
        assert!(validate_spec(&spec(vec![Direction::Up; 2])).is_err());
        assert!(validate_spec(&spec(vec![Direction::Left; 6])).is_err());
    }
}
