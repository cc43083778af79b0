//! Game state module - the simulation orchestrator
//!
//! [`GameState`] owns the board, the active piece, the hold slot and the piece
//! queue (which owns the RNG). One call to [`GameState::tick`] runs a frame in
//! a fixed order:
//!
//! 1. spawn a piece if there is none (block-out when it collides)
//! 2. sweep full rows left on the board
//! 3. lock delay, auto-locking a piece that rested long enough
//! 4. soft drop toggles
//! 5. horizontal movement from the hold state (DAS/ARR)
//! 6. rotations
//! 7. gravity
//! 8. hard drop and hold, in command order
//!
//! Everything observable leaves through the [`EventBus`].

use crate::active_piece::ActivePiece;
use crate::board::Board;
use crate::events::{EventBus, SubscriptionId};
use crate::pieces::PieceDefinition;
use crate::queue::PieceQueue;
use crate::rng::PieceRng;
use crate::rules::{validate_gravity, Rules};
use crate::scoring::{calculate_score, drop_score, level_for_lines};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{
    CellPosition, Command, EngineError, HoldInput, Notification, PieceId, Placement,
    RotationDirection, SpinKind, TopOutKind, G_TILES_PER_MS, MAX_LOOKAHEAD,
};

use arrayvec::ArrayVec;

/// Session counters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameStats {
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub pieces_placed: u32,
    /// Consecutive clearing locks minus one; -1 when no chain is running
    pub combo: i32,
    pub back_to_back: bool,
    pub elapsed_secs: f64,
}

impl GameStats {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 0,
            lines: 0,
            pieces_placed: 0,
            combo: -1,
            back_to_back: false,
            elapsed_secs: 0.0,
        }
    }

    pub fn pieces_per_second(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            f64::from(self.pieces_placed) / self.elapsed_secs
        } else {
            0.0
        }
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete simulation state for one session
#[derive(Debug)]
pub struct GameState {
    rules: Rules,
    board: Board,
    active: Option<ActivePiece>,
    held: Option<&'static PieceDefinition>,
    /// A hold happened since the last spawn from the queue
    hold_used: bool,
    queue: PieceQueue,
    events: EventBus,
    gravity: f64,
    gravity_counter_ms: f64,
    soft_dropping: bool,
    latest_spin: SpinKind,
    stats: GameStats,
    started: bool,
    paused: bool,
    game_over: bool,
    goal_reached: bool,
}

impl GameState {
    /// Validate `rules` and set up a session
    ///
    /// The session is idle until [`start`](Self::start).
    pub fn new(rules: Rules) -> Result<Self, EngineError> {
        rules.validate()?;
        let generator = rules.generator.build()?;
        let rng = PieceRng::from_optional_seed(rules.seed);
        let board = Board::new(rules.board_width, rules.visible_height, rules.hidden_height);

        Ok(Self {
            gravity: rules.beginning_gravity,
            board,
            active: None,
            held: None,
            hold_used: false,
            queue: PieceQueue::new(generator, rng),
            events: EventBus::new(),
            gravity_counter_ms: 0.0,
            soft_dropping: false,
            latest_spin: SpinKind::None,
            stats: GameStats::new(),
            started: false,
            paused: false,
            game_over: false,
            goal_reached: false,
            rules,
        })
    }

    /// Start the session and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_if_needed();
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }

    /// Started, not paused and not finished
    pub fn is_running(&self) -> bool {
        self.started && !self.paused && !self.game_over && !self.goal_reached
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for setting up positions
    ///
    /// Full rows left here are removed by the next tick's sweep.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn held_piece(&self) -> Option<PieceId> {
        self.held.map(|def| def.id())
    }

    pub fn can_hold(&self) -> bool {
        !self.hold_used
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn score(&self) -> u64 {
        self.stats.score
    }

    /// Spin of the most recently locked piece
    pub fn latest_spin(&self) -> SpinKind {
        self.latest_spin
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Gravity in effect this frame, soft drop included
    pub fn effective_gravity(&self) -> f64 {
        if self.soft_dropping {
            self.rules.soft_drop_factor.apply(self.gravity)
        } else {
            self.gravity
        }
    }

    pub fn soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    /// Change gravity (0..=20 G); restarts the gravity accumulator
    pub fn set_gravity(&mut self, gravity: f64) -> Result<(), EngineError> {
        validate_gravity(gravity)?;
        self.gravity = gravity;
        self.gravity_counter_ms = 0.0;
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.queue.seed()
    }

    /// Upcoming piece `index` positions ahead (0..7)
    pub fn peek(&mut self, index: usize) -> Result<PieceId, EngineError> {
        self.queue.peek(index)
    }

    pub fn preview(&self) -> ArrayVec<PieceId, MAX_LOOKAHEAD> {
        self.queue.preview()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Notification) + 'static) -> SubscriptionId {
        self.events.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Keep (or stop keeping) notifications for [`GameState::take_events`]
    ///
    /// Without a call, notifications are kept only while nobody is subscribed.
    pub fn set_event_buffering(&mut self, buffered: bool) {
        self.events.set_buffered(buffered);
    }

    /// Drain the notifications published since the last call
    pub fn take_events(&mut self) -> Vec<Notification> {
        self.events.take_events()
    }

    /// Run one frame
    ///
    /// `hold` is the horizontal hold state for this frame; `commands` are the
    /// discrete presses. Does nothing unless the session is running.
    pub fn tick(&mut self, delta_secs: f64, hold: HoldInput, commands: &[Command]) {
        if !self.is_running() {
            return;
        }
        self.stats.elapsed_secs += delta_secs;

        self.spawn_if_needed();
        if !self.is_running() {
            return;
        }
        self.sweep_full_rows();

        let must_lock = match self.active.as_mut() {
            Some(piece) => piece.advance_lock_delay(&self.board, delta_secs),
            None => false,
        };
        if must_lock {
            self.lock();
            if !self.is_running() {
                return;
            }
        }

        for command in commands {
            match command {
                Command::SoftDropOn => self.set_soft_drop(true),
                Command::SoftDropOff => self.set_soft_drop(false),
                _ => {}
            }
        }

        self.apply_hold_input(hold);

        for direction in commands.iter().filter_map(Command::rotation) {
            self.rotate(direction);
        }

        self.apply_gravity(delta_secs);

        for command in commands {
            if !self.is_running() {
                break;
            }
            match command {
                Command::HardDrop => {
                    self.hard_drop();
                }
                Command::Hold => {
                    self.hold();
                }
                _ => {}
            }
        }
    }

    /// Spawn from the queue if no piece is active
    pub fn spawn_if_needed(&mut self) {
        if self.active.is_none() && self.started && !self.game_over && !self.goal_reached {
            self.spawn_next();
        }
    }

    fn spawn_next(&mut self) {
        let Some(definition) = self.queue.pop() else {
            return;
        };
        self.hold_used = false;
        self.events.publish(Notification::NextPieceSpawned {
            piece: definition.id(),
        });
        self.spawn(definition);
    }

    fn spawn(&mut self, definition: &'static PieceDefinition) {
        let piece = ActivePiece::spawn(definition, &self.board, self.rules.lock_delay_secs);
        let blocked = piece.collides(&self.board);
        self.active = Some(piece);
        if blocked {
            self.top_out(TopOutKind::BlockOut);
        }
    }

    fn sweep_full_rows(&mut self) {
        let count = self.board.clear_full_rows();
        if count > 0 {
            self.stats.lines += count;
            self.stats.level = level_for_lines(self.stats.lines);
            self.events.publish(Notification::LineCleared {
                count,
                piece: None,
                placement: None,
            });
            self.check_line_goal();
        }
    }

    fn set_soft_drop(&mut self, on: bool) {
        if on && !self.soft_dropping {
            self.gravity_counter_ms = 0.0;
        }
        self.soft_dropping = on;
    }

    /// Translate the active piece
    ///
    /// Gravity, auto-shift and callers all move through here. A spin resolved
    /// by the last rotation survives the move and is scored at lock.
    pub fn move_piece(&mut self, offset: CellPosition) -> bool {
        match self.active.as_mut() {
            Some(piece) => piece.try_move(&self.board, offset, true, true),
            None => false,
        }
    }

    /// Horizontal movement for one tick
    ///
    /// The first tick of a press moves one cell. After that every auto-repeat
    /// step that came due since the previous tick is applied, so a long frame
    /// can move several cells at once rather than dropping steps.
    fn apply_hold_input(&mut self, hold: HoldInput) {
        let Some(offset) = hold.direction.offset() else {
            return;
        };
        let steps = if hold.prev_held_secs.is_nan() {
            1
        } else {
            self.auto_repeat_steps(hold.held_secs, hold.prev_held_secs)
        };
        for _ in 0..steps {
            if !self.move_piece(offset) {
                break;
            }
        }
    }

    /// Auto-repeat steps due between two cumulative hold times
    ///
    /// Counting from cumulative time keeps the number of steps independent of
    /// how the hold is split into frames.
    fn auto_repeat_steps(&self, held_secs: f64, prev_held_secs: f64) -> u32 {
        let das = self.rules.das_secs;
        let arr = self.rules.arr_secs;
        if !(held_secs > das) {
            return 0;
        }
        let repeats = |held: f64| ((held - das).max(0.0) / arr).floor();
        let due = repeats(held_secs) - repeats(prev_held_secs.max(0.0));
        // more steps than columns can never all succeed
        due.clamp(0.0, self.board.width() as f64) as u32
    }

    /// Rotate the active piece
    ///
    /// Returns the resolved spin, or `None` if no piece is active or every kick
    /// collided. A spin publishes `PieceSpun`.
    pub fn rotate(&mut self, direction: RotationDirection) -> Option<SpinKind> {
        let piece = self.active.as_mut()?;
        let spin = piece.rotate(&self.board, direction)?;
        if spin.is_spin() {
            let notification = Notification::PieceSpun {
                piece: piece.id(),
                position: piece.position(),
                rotation: piece.rotation(),
                spin,
            };
            self.latest_spin = spin;
            self.events.publish(notification);
        }
        Some(spin)
    }

    fn apply_gravity(&mut self, delta_secs: f64) {
        let gravity = self.effective_gravity();
        if gravity <= 0.0 {
            return;
        }
        let ms_per_tile = 1.0 / (gravity * G_TILES_PER_MS);
        self.gravity_counter_ms += delta_secs * 1000.0;
        while self.gravity_counter_ms > ms_per_tile {
            let moved = self.move_piece(CellPosition::DOWN);
            self.gravity_counter_ms -= ms_per_tile;
            if !moved {
                break;
            }
            if self.soft_dropping {
                self.stats.score += u64::from(drop_score(1, false));
            }
        }
    }

    /// Drop the active piece to the floor and lock it
    ///
    /// Returns the number of rows travelled. The drop keeps a pending spin.
    pub fn hard_drop(&mut self) -> Option<u32> {
        let piece = self.active.as_mut()?;
        let rows = piece.drop_to_floor(&self.board);
        self.stats.score += u64::from(drop_score(rows, true));
        self.lock();
        Some(rows)
    }

    /// Swap the active piece with the hold slot, once per spawn
    ///
    /// The first hold of a session stashes the piece and spawns the next one
    /// from the queue.
    pub fn hold(&mut self) -> bool {
        if self.hold_used || !self.is_running() {
            return false;
        }
        let Some(piece) = self.active.take() else {
            return false;
        };
        let current = piece.definition();
        match self.held.replace(current) {
            Some(held) => self.spawn(held),
            None => self.spawn_next(),
        }
        self.hold_used = true;
        self.events.publish(Notification::PieceHeld {
            piece: current.id(),
        });
        true
    }

    /// Stamp the active piece into the board, then score, notify and spawn
    pub fn lock(&mut self) -> bool {
        let Some(piece) = self.active.take() else {
            return false;
        };

        let hidden = self.board.hidden_height() as i32;
        let mut above_visible = true;
        for (cell, value) in piece.cells() {
            // cells outside the grid are dropped
            self.board.set(cell.row, cell.col, i32::from(value)).ok();
            if cell.row >= hidden {
                above_visible = false;
            }
        }
        if above_visible {
            self.top_out(TopOutKind::LockOut);
        }

        self.latest_spin = piece.spin();
        self.stats.pieces_placed += 1;

        let lines = self.board.clear_full_rows();
        self.score_lock(lines, piece.spin());

        let placement = Placement {
            position: piece.position(),
            rotation: piece.rotation(),
            spin: piece.spin(),
        };
        self.events.publish(Notification::PiecePlaced {
            piece: piece.id(),
            position: placement.position,
            rotation: placement.rotation,
            spin: placement.spin,
            cleared_lines: lines > 0,
        });
        if lines > 0 {
            self.events.publish(Notification::LineCleared {
                count: lines,
                piece: Some(piece.id()),
                placement: Some(placement),
            });
            self.check_line_goal();
        }

        self.spawn_if_needed();
        true
    }

    fn score_lock(&mut self, lines: u32, spin: SpinKind) {
        let stats = &mut self.stats;
        if lines > 0 {
            stats.combo += 1;
            stats.lines += lines;
            stats.level = level_for_lines(stats.lines);
        } else {
            stats.combo = -1;
        }
        let result = calculate_score(lines, stats.level, spin, stats.combo, stats.back_to_back);
        stats.score += u64::from(result.total);
        if lines > 0 {
            stats.back_to_back = result.qualifies_for_b2b;
        }
    }

    fn check_line_goal(&mut self) {
        let Some(goal) = self.rules.line_goal else {
            return;
        };
        if !self.goal_reached && self.stats.lines >= goal {
            self.goal_reached = true;
            self.events.publish(Notification::GoalReached {
                lines: self.stats.lines,
                elapsed_secs: self.stats.elapsed_secs,
            });
        }
    }

    /// Raise a top-out; true if it was fatal
    ///
    /// Only kinds overlapping the considered mask end the session and publish
    /// `ToppedOut`.
    pub fn top_out(&mut self, kind: TopOutKind) -> bool {
        if !self.rules.top_out_considered.contains(kind) {
            return false;
        }
        if !self.game_over {
            self.game_over = true;
            self.events.publish(Notification::ToppedOut { kind });
        }
        true
    }

    /// [`top_out`](Self::top_out) from raw bits; rejects unknown or multi-bit
    /// values
    pub fn top_out_bits(&mut self, bits: u8) -> Result<bool, EngineError> {
        let kind = TopOutKind::from_bits(bits)?;
        Ok(self.top_out(kind))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.board.width(),
            visible_height: self.board.visible_height(),
            hidden_height: self.board.hidden_height(),
            tiles: self.board.tiles().to_vec(),
            active: self.active.as_ref().map(ActiveSnapshot::from),
            ghost: self
                .active
                .as_ref()
                .map(|piece| piece.ghost_position(&self.board)),
            hold: self.held_piece(),
            can_hold: self.can_hold(),
            preview: self.preview().to_vec(),
            stats: self.stats,
            gravity: self.gravity,
            seed: self.seed(),
            paused: self.paused,
            game_over: self.game_over,
            goal_reached: self.goal_reached,
        }
    }
}
