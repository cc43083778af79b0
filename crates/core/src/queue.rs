//! Piece queue - FIFO over a generator with guaranteed lookahead

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::generators::PieceGenerator;
use crate::pieces::PieceDefinition;
use crate::rng::PieceRng;
use crate::types::{EngineError, PieceId, MAX_LOOKAHEAD};

/// Upcoming pieces, refilled transparently from the generator
///
/// The queue owns the generator and the session's RNG stream.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    generator: PieceGenerator,
    rng: PieceRng,
    pending: VecDeque<&'static PieceDefinition>,
}

impl PieceQueue {
    pub fn new(generator: PieceGenerator, rng: PieceRng) -> Self {
        let mut queue = Self {
            generator,
            rng,
            pending: VecDeque::with_capacity(MAX_LOOKAHEAD * 2),
        };
        queue.ensure(MAX_LOOKAHEAD);
        queue
    }

    /// Refill until at least `len` pieces are buffered
    fn ensure(&mut self, len: usize) {
        while self.pending.len() < len {
            let batch = self.generator.refill(&mut self.rng);
            if batch.is_empty() {
                break;
            }
            // last generated piece is consumed first
            self.pending.extend(batch.into_iter().rev());
        }
    }

    /// Piece `index` positions ahead, without removing it
    ///
    /// ```
    /// use blockfall_core::{GeneratorKind, PieceQueue, PieceRng};
    /// use blockfall_types::EngineError;
    ///
    /// let generator = GeneratorKind::tetromino_bag().build().unwrap();
    /// let mut queue = PieceQueue::new(generator, PieceRng::new(3));
    /// let next = queue.peek(0).unwrap();
    /// assert_eq!(queue.peek(0).unwrap(), next);
    /// assert_eq!(
    ///     queue.peek(7),
    ///     Err(EngineError::LookaheadOutOfRange { index: 7, max: 7 })
    /// );
    /// ```
    pub fn peek(&mut self, index: usize) -> Result<PieceId, EngineError> {
        self.peek_definition(index).map(|def| def.id())
    }

    pub fn peek_definition(&mut self, index: usize) -> Result<&'static PieceDefinition, EngineError> {
        if index >= MAX_LOOKAHEAD {
            return Err(EngineError::LookaheadOutOfRange {
                index,
                max: MAX_LOOKAHEAD,
            });
        }
        self.ensure(index + 1);
        self.pending
            .get(index)
            .copied()
            .ok_or(EngineError::LookaheadOutOfRange {
                index,
                max: self.pending.len(),
            })
    }

    /// Remove and return the head piece
    ///
    /// Only `None` if the generator produces empty batches.
    pub fn pop(&mut self) -> Option<&'static PieceDefinition> {
        self.ensure(1);
        let head = self.pending.pop_front();
        self.ensure(MAX_LOOKAHEAD);
        head
    }

    /// The whole lookahead window, head first
    pub fn preview(&self) -> ArrayVec<PieceId, MAX_LOOKAHEAD> {
        self.pending
            .iter()
            .take(MAX_LOOKAHEAD)
            .map(|def| def.id())
            .collect()
    }

    /// Seed of the RNG stream feeding this queue
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn generator(&self) -> &PieceGenerator {
        &self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::GeneratorKind;
    use crate::pieces::{ids, TETROMINOES};

    fn bag_queue(seed: u64) -> PieceQueue {
        PieceQueue::new(GeneratorKind::tetromino_bag().build().unwrap(), PieceRng::new(seed))
    }

    #[test]
    fn test_peek_is_stable() {
        let mut queue = bag_queue(11);
        for index in 0..MAX_LOOKAHEAD {
            let first = queue.peek(index).unwrap();
            assert_eq!(queue.peek(index).unwrap(), first);
        }
    }

    #[test]
    fn test_peek_out_of_range() {
        let mut queue = bag_queue(11);
        assert_eq!(
            queue.peek(MAX_LOOKAHEAD),
            Err(EngineError::LookaheadOutOfRange {
                index: MAX_LOOKAHEAD,
                max: MAX_LOOKAHEAD
            })
        );
        assert!(queue.peek(usize::MAX).is_err());
    }

    #[test]
    fn test_pop_follows_peek() {
        let mut queue = bag_queue(4);
        for _ in 0..30 {
            let next = queue.peek(0).unwrap();
            let second = queue.peek(1).unwrap();
            assert_eq!(queue.pop().map(|def| def.id()), Some(next));
            assert_eq!(queue.peek(0).unwrap(), second);
        }
    }

    #[test]
    fn test_batches_are_consumed_back_to_front() {
        let generator = GeneratorKind::tetromino_bag().build().unwrap();
        let mut reference = generator.clone();
        let mut rng = PieceRng::new(21);
        let first_batch: Vec<PieceId> = reference
            .refill(&mut rng)
            .into_iter()
            .map(|def| def.id())
            .collect();

        let mut queue = PieceQueue::new(generator, PieceRng::new(21));
        let popped: Vec<PieceId> = (0..7).filter_map(|_| queue.pop()).map(|def| def.id()).collect();
        let expected: Vec<PieceId> = first_batch.into_iter().rev().collect();
        assert_eq!(popped, expected);
    }

    #[test]
    fn test_every_bag_window_holds_each_piece_once() {
        let mut queue = bag_queue(8);
        for _ in 0..5 {
            let mut bag: Vec<PieceId> = (0..7).filter_map(|_| queue.pop()).map(|def| def.id()).collect();
            bag.sort();
            let mut all = TETROMINOES.to_vec();
            all.sort();
            assert_eq!(bag, all);
        }
    }

    #[test]
    fn test_preview_window() {
        let mut queue = bag_queue(2);
        let preview = queue.preview();
        assert_eq!(preview.len(), MAX_LOOKAHEAD);
        for (index, id) in preview.iter().enumerate() {
            assert_eq!(queue.peek(index).unwrap(), *id);
        }
        let single = GeneratorKind::Bag {
            available: vec![ids::O],
        };
        let mut queue = PieceQueue::new(single.build().unwrap(), PieceRng::new(0));
        assert!(queue.preview().iter().all(|&id| id == ids::O));
        assert_eq!(queue.pop().map(|def| def.id()), Some(ids::O));
    }
}
