use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use blockfall::core::pieces::{definition, ids};
use blockfall::core::{ActivePiece, Board, GameState, Rules};
use blockfall::engine::apply_place;
use blockfall::types::{
    CellPosition, Command, HoldInput, Rotation, RotationDirection, FRAME_TIME_SECS,
};

fn started() -> GameState {
    let mut state = GameState::new(Rules::seeded(12345)).unwrap();
    state.start();
    state
}

fn bench_tick(c: &mut Criterion) {
    let mut state = started();

    c.bench_function("game_tick_frame", |b| {
        b.iter(|| {
            state.tick(black_box(FRAME_TIME_SECS), HoldInput::IDLE, &[]);
        })
    });
}

fn bench_hard_drop_cycle(c: &mut Criterion) {
    c.bench_function("hard_drop_100_pieces", |b| {
        b.iter_batched(
            started,
            |mut state| {
                for _ in 0..100 {
                    if !state.is_running() {
                        break;
                    }
                    state.tick(FRAME_TIME_SECS, HoldInput::IDLE, &[Command::HardDrop]);
                    state.take_events();
                }
                state
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new(10, 20, 20);
            for row in 36..40 {
                for col in 0..10 {
                    let _ = board.set(row, col, 1);
                }
            }
            black_box(board.clear_full_rows());
        })
    });
}

fn bench_try_move(c: &mut Criterion) {
    let board = Board::new(10, 20, 20);
    let t = definition(ids::T).unwrap();
    let mut piece = ActivePiece::spawn(t, &board, 0.5);
    let mut step = CellPosition::RIGHT;

    c.bench_function("try_move", |b| {
        b.iter(|| {
            if !piece.try_move(&board, step, false, true) {
                step = CellPosition::new(0, -step.col);
            }
        })
    });
}

fn bench_rotate_with_spin(c: &mut Criterion) {
    let board = Board::from_ascii(&["#.........", "#..#######", "#.########"], 20, 20);
    let t = definition(ids::T).unwrap();
    let piece = ActivePiece::spawn(t, &board, 0.5);

    c.bench_function("rotate_and_classify", |b| {
        b.iter(|| {
            let mut trial = piece.clone();
            black_box(trial.rotate(&board, RotationDirection::Right));
        })
    });
}

fn bench_place(c: &mut Criterion) {
    c.bench_function("apply_place", |b| {
        b.iter_batched(
            started,
            |mut state| {
                let _ = apply_place(&mut state, black_box(0), Rotation::East, false);
                state
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_hard_drop_cycle,
    bench_line_clear,
    bench_try_move,
    bench_rotate_with_spin,
    bench_place
);
criterion_main!(benches);
