//! Piece generators - producers of piece batches
//!
//! A generator hands out one batch per [`refill`](PieceGenerator::refill). The
//! queue consumes each batch back to front, so the last id of a batch is the
//! next piece to spawn.

use crate::pieces::{self, PieceDefinition};
use crate::rng::PieceRng;
use crate::types::{ConfigError, EngineError, PieceId};

/// Remaining bags that get extra picks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetitions {
    Finite(u32),
    Infinite,
}

/// Piece generator configuration, by id
///
/// This is what goes into [`Rules`](crate::rules::Rules); it is resolved
/// against the piece catalog when the game starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Shuffle the whole set once per refill
    Bag { available: Vec<PieceId> },
    /// Bag plus `x` extra picks (with replacement) from `extra`, for
    /// `repetitions` bags; plain bag afterwards
    BagPlusX {
        available: Vec<PieceId>,
        extra: Vec<PieceId>,
        x: usize,
        repetitions: Repetitions,
    },
}

impl GeneratorKind {
    /// 7-bag of tetrominoes
    pub fn tetromino_bag() -> Self {
        GeneratorKind::Bag {
            available: pieces::TETROMINOES.to_vec(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build().map(|_| ())
    }

    /// Resolve ids and create the runtime generator
    pub fn build(&self) -> Result<PieceGenerator, ConfigError> {
        match self {
            GeneratorKind::Bag { available } => Ok(PieceGenerator::Bag {
                available: resolve_non_empty(available, ConfigError::EmptyBag)?,
            }),
            GeneratorKind::BagPlusX {
                available,
                extra,
                x,
                repetitions,
            } => {
                if *repetitions == Repetitions::Finite(0) {
                    return Err(ConfigError::ZeroRepetitions);
                }
                let available = resolve_non_empty(available, ConfigError::EmptyBag)?;
                let extra = if *x > 0 {
                    resolve_non_empty(extra, ConfigError::EmptyExtraPool)?
                } else {
                    resolve(extra)?
                };
                Ok(PieceGenerator::BagPlusX {
                    available,
                    extra,
                    x: *x,
                    remaining: *repetitions,
                })
            }
        }
    }
}

impl Default for GeneratorKind {
    fn default() -> Self {
        Self::tetromino_bag()
    }
}

fn resolve(ids: &[PieceId]) -> Result<Vec<&'static PieceDefinition>, ConfigError> {
    pieces::resolve_all(ids).map_err(|err| match err {
        EngineError::UnknownPiece(name) => ConfigError::UnknownPiece(name),
        other => ConfigError::UnknownPiece(other.to_string()),
    })
}

fn resolve_non_empty(
    ids: &[PieceId],
    empty: ConfigError,
) -> Result<Vec<&'static PieceDefinition>, ConfigError> {
    if ids.is_empty() {
        return Err(empty);
    }
    resolve(ids)
}

/// Runtime generator state
#[derive(Debug, Clone, PartialEq)]
pub enum PieceGenerator {
    Bag {
        available: Vec<&'static PieceDefinition>,
    },
    BagPlusX {
        available: Vec<&'static PieceDefinition>,
        extra: Vec<&'static PieceDefinition>,
        x: usize,
        remaining: Repetitions,
    },
}

impl PieceGenerator {
    /// Produce the next batch
    pub fn refill(&mut self, rng: &mut PieceRng) -> Vec<&'static PieceDefinition> {
        match self {
            PieceGenerator::Bag { available } => {
                let mut batch = available.clone();
                rng.shuffle(&mut batch);
                batch
            }
            PieceGenerator::BagPlusX {
                available,
                extra,
                x,
                remaining,
            } => {
                let mut batch = available.clone();
                if *remaining != Repetitions::Finite(0) {
                    batch.extend((0..*x).map(|_| extra[rng.index(extra.len())]));
                    if let Repetitions::Finite(left) = remaining {
                        *left -= 1;
                    }
                }
                rng.shuffle(&mut batch);
                batch
            }
        }
    }

    /// Bags left with extra picks (`None` for plain bags)
    pub fn remaining(&self) -> Option<Repetitions> {
        match self {
            PieceGenerator::Bag { .. } => None,
            PieceGenerator::BagPlusX { remaining, .. } => Some(*remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{ids, PENTOMINOES, TETROMINOES};

    fn ids_of(batch: &[&'static PieceDefinition]) -> Vec<PieceId> {
        batch.iter().map(|def| def.id()).collect()
    }

    fn sorted(mut ids: Vec<PieceId>) -> Vec<PieceId> {
        ids.sort();
        ids
    }

    #[test]
    fn test_bag_is_a_permutation() {
        let mut generator = GeneratorKind::tetromino_bag().build().unwrap();
        let mut rng = PieceRng::new(1);
        for _ in 0..10 {
            let batch = generator.refill(&mut rng);
            assert_eq!(sorted(ids_of(&batch)), sorted(TETROMINOES.to_vec()));
        }
    }

    #[test]
    fn test_bag_plus_zero_matches_bag() {
        let mut bag = GeneratorKind::tetromino_bag().build().unwrap();
        let mut plus = GeneratorKind::BagPlusX {
            available: TETROMINOES.to_vec(),
            extra: PENTOMINOES.to_vec(),
            x: 0,
            repetitions: Repetitions::Infinite,
        }
        .build()
        .unwrap();
        let mut rng_a = PieceRng::new(99);
        let mut rng_b = PieceRng::new(99);
        for _ in 0..20 {
            assert_eq!(bag.refill(&mut rng_a), plus.refill(&mut rng_b));
        }
    }

    #[test]
    fn test_bag_plus_x_adds_extra_picks_then_degrades() {
        let mut generator = GeneratorKind::BagPlusX {
            available: TETROMINOES.to_vec(),
            extra: vec![ids::X],
            x: 2,
            repetitions: Repetitions::Finite(2),
        }
        .build()
        .unwrap();
        let mut rng = PieceRng::new(5);

        for left in [1, 0] {
            let batch = ids_of(&generator.refill(&mut rng));
            assert_eq!(batch.len(), 9);
            assert_eq!(batch.iter().filter(|&&id| id == ids::X).count(), 2);
            assert_eq!(generator.remaining(), Some(Repetitions::Finite(left)));
        }
        let batch = ids_of(&generator.refill(&mut rng));
        assert_eq!(sorted(batch), sorted(TETROMINOES.to_vec()));
    }

    #[test]
    fn test_infinite_repetitions_never_degrade() {
        let mut generator = GeneratorKind::BagPlusX {
            available: vec![ids::O],
            extra: vec![ids::I],
            x: 1,
            repetitions: Repetitions::Infinite,
        }
        .build()
        .unwrap();
        let mut rng = PieceRng::new(0);
        for _ in 0..50 {
            assert_eq!(generator.refill(&mut rng).len(), 2);
        }
        assert_eq!(generator.remaining(), Some(Repetitions::Infinite));
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            GeneratorKind::Bag { available: vec![] }.validate(),
            Err(ConfigError::EmptyBag)
        );
        assert_eq!(
            GeneratorKind::Bag {
                available: vec![PieceId::new("K")]
            }
            .validate(),
            Err(ConfigError::UnknownPiece("K".to_string()))
        );
        assert_eq!(
            GeneratorKind::BagPlusX {
                available: TETROMINOES.to_vec(),
                extra: vec![],
                x: 1,
                repetitions: Repetitions::Infinite,
            }
            .validate(),
            Err(ConfigError::EmptyExtraPool)
        );
        assert_eq!(
            GeneratorKind::BagPlusX {
                available: TETROMINOES.to_vec(),
                extra: vec![],
                x: 0,
                repetitions: Repetitions::Finite(0),
            }
            .validate(),
            Err(ConfigError::ZeroRepetitions)
        );
        assert!(GeneratorKind::default().validate().is_ok());
    }
}
