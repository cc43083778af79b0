//! Headless simulator (default binary).
//!
//! Plays a seeded session with a greedy placement bot and reports the result.
//! Useful for replaying seeds, checking determinism and profiling the engine
//! without any display attached.
//!
//! ```text
//! blockfall-sim [--seed N] [--pieces N] [--gravity G] [--goal LINES] [--json]
//! ```

use anyhow::{anyhow, bail, Context, Result};

use blockfall::core::{ActivePiece, Board, GameState, Rules};
use blockfall::engine::{apply_place, legal_columns, rotation_plan};
use blockfall::types::{CellPosition, HoldInput, Notification, Rotation, FRAME_TIME_SECS};

#[derive(Debug, Clone)]
struct SimConfig {
    seed: Option<u64>,
    pieces: u32,
    gravity: f64,
    goal: Option<u32>,
    json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            pieces: 100,
            gravity: 0.0,
            goal: None,
            json: false,
        }
    }
}

impl SimConfig {
    fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("{name} expects a value"))
            };
            match arg.as_str() {
                "--seed" => {
                    let raw = value("--seed")?;
                    config.seed = Some(raw.parse().with_context(|| format!("invalid seed {raw:?}"))?);
                }
                "--pieces" => {
                    let raw = value("--pieces")?;
                    config.pieces = raw
                        .parse()
                        .with_context(|| format!("invalid piece count {raw:?}"))?;
                }
                "--gravity" => {
                    let raw = value("--gravity")?;
                    config.gravity = raw
                        .parse()
                        .with_context(|| format!("invalid gravity {raw:?}"))?;
                }
                "--goal" => {
                    let raw = value("--goal")?;
                    config.goal = Some(raw.parse().with_context(|| format!("invalid goal {raw:?}"))?);
                }
                "--json" => config.json = true,
                "-h" | "--help" => {
                    println!(
                        "usage: blockfall-sim [--seed N] [--pieces N] [--gravity G] [--goal LINES] [--json]"
                    );
                    std::process::exit(0);
                }
                other => bail!("unknown argument {other:?}"),
            }
        }
        Ok(config)
    }

    fn rules(&self) -> Rules {
        Rules {
            seed: self.seed,
            beginning_gravity: self.gravity,
            line_goal: self.goal,
            ..Rules::default()
        }
    }
}

fn main() -> Result<()> {
    let config = SimConfig::from_args(std::env::args().skip(1))?;
    let mut game = GameState::new(config.rules()).context("invalid rules")?;
    game.start();
    eprintln!("[Sim] seed={} pieces={} gravity={}", game.seed(), config.pieces, config.gravity);

    while game.is_running() && game.stats().pieces_placed < config.pieces {
        // one idle frame per piece so gravity, lock delay and the sweep run
        game.tick(FRAME_TIME_SECS, HoldInput::IDLE, &[]);
        report(&mut game, config.json)?;
        if !game.is_running() {
            break;
        }

        let Some((col, rotation)) = game.active().and_then(|piece| choose(piece, game.board()))
        else {
            eprintln!("[Sim] no legal placement, stopping");
            break;
        };
        if let Err(e) = apply_place(&mut game, col, rotation, false) {
            eprintln!("[Sim] placement failed: {e} ({})", e.code());
            break;
        }
        report(&mut game, config.json)?;
    }

    let stats = game.stats();
    eprintln!(
        "[Sim] done: score={} lines={} level={} pieces={} pps={:.2} game_over={} goal_reached={}",
        stats.score,
        stats.lines,
        stats.level,
        stats.pieces_placed,
        stats.pieces_per_second(),
        game.game_over(),
        game.goal_reached(),
    );
    Ok(())
}

fn report(game: &mut GameState, json: bool) -> Result<()> {
    for event in game.take_events() {
        if json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }
        match event {
            Notification::LineCleared { count, .. } => println!("[Sim] cleared {count} line(s)"),
            Notification::PieceSpun { piece, spin, .. } => {
                println!("[Sim] {piece} spin ({:?})", spin)
            }
            Notification::ToppedOut { kind } => println!("[Sim] topped out: {}", kind.as_str()),
            Notification::GoalReached {
                lines,
                elapsed_secs,
            } => println!("[Sim] goal of {lines} lines reached in {elapsed_secs:.2}s"),
            _ => {}
        }
    }
    Ok(())
}

/// Greedy pick: fewest holes, then lowest stack, then most lines
fn choose(piece: &ActivePiece, board: &Board) -> Option<(i32, Rotation)> {
    let mut best: Option<((usize, i32, i32), i32, Rotation)> = None;
    for rotation in Rotation::ALL {
        let Some(plan) = rotation_plan(piece, board, rotation) else {
            continue;
        };
        let mut rotated = piece.clone();
        for direction in plan {
            rotated.rotate(board, direction);
        }
        let Some(columns) = legal_columns(rotated.definition(), rotation, board.width()) else {
            continue;
        };
        for col in columns {
            let Some(cost) = evaluate(&rotated, board, col) else {
                continue;
            };
            if best.as_ref().map_or(true, |(current, _, _)| cost < *current) {
                best = Some((cost, col, rotation));
            }
        }
    }
    best.map(|(_, col, rotation)| (col, rotation))
}

fn evaluate(piece: &ActivePiece, board: &Board, col: i32) -> Option<(usize, i32, i32)> {
    let mut trial = piece.clone();
    let dx = col - trial.position().col;
    let step = if dx > 0 {
        CellPosition::RIGHT
    } else {
        CellPosition::LEFT
    };
    for _ in 0..dx.abs() {
        if !trial.try_move(board, step, false, false) {
            return None;
        }
    }
    trial.drop_to_floor(board);

    let mut landed = board.clone();
    for (cell, tile) in trial.cells() {
        landed.set(cell.row, cell.col, i32::from(tile)).ok()?;
    }
    let lines = landed.clear_full_rows() as i32;

    let top = landed.top_occupied_row().unwrap_or(landed.height()) as i32;
    Some((holes(&landed), -top, -lines))
}

fn holes(board: &Board) -> usize {
    (0..board.width() as i32)
        .map(|col| {
            let mut covered = false;
            (0..board.height() as i32)
                .filter(|&row| {
                    let occupied = board.is_occupied(row, col);
                    let hole = covered && !occupied;
                    covered |= occupied;
                    hole
                })
                .count()
        })
        .sum()
}
