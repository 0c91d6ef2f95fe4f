//! Integration test: win-detection agreement
//!
//! The board engine and the multiplayer server each carry their own
//! run-counting win check. Both are pinned to the same fixtures here so they
//! can never drift apart on boundary cases (exactly 4, exactly 5, overlines).

use gomoku::board::{empty_grid, Board, BoardState, Position, StoneColor};
use gomoku::net::registry::check_win as server_check_win;

/// A fixture: stones to place, the cell to check, and the expected verdict.
struct Fixture {
    name: &'static str,
    stones: Vec<(Position, StoneColor)>,
    check: Position,
    wins: bool,
}

fn fixtures() -> Vec<Fixture> {
    let black_row = |cols: std::ops::Range<usize>| {
        cols.map(|c| ((7usize, c), StoneColor::Black)).collect::<Vec<_>>()
    };

    vec![
        Fixture {
            name: "empty board",
            stones: vec![],
            check: (7, 7),
            wins: false,
        },
        Fixture {
            name: "single stone",
            stones: vec![((7, 7), StoneColor::Black)],
            check: (7, 7),
            wins: false,
        },
        Fixture {
            name: "horizontal exactly 4",
            stones: black_row(3..7),
            check: (7, 5),
            wins: false,
        },
        Fixture {
            name: "horizontal exactly 5",
            stones: black_row(3..8),
            check: (7, 7),
            wins: true,
        },
        Fixture {
            name: "horizontal 5 checked mid-line",
            stones: black_row(3..8),
            check: (7, 5),
            wins: true,
        },
        Fixture {
            name: "overline of 6",
            stones: black_row(3..9),
            check: (7, 6),
            wins: true,
        },
        Fixture {
            name: "vertical 5",
            stones: (2..7).map(|r| ((r, 9), StoneColor::White)).collect(),
            check: (4, 9),
            wins: true,
        },
        Fixture {
            name: "diagonal 5 from corner",
            stones: (0..5).map(|i| ((i, i), StoneColor::Black)).collect(),
            check: (2, 2),
            wins: true,
        },
        Fixture {
            name: "anti-diagonal 5",
            stones: (0..5).map(|i| ((i, 14 - i), StoneColor::White)).collect(),
            check: (3, 11),
            wins: true,
        },
        Fixture {
            name: "five broken by opponent",
            stones: vec![
                ((7, 3), StoneColor::Black),
                ((7, 4), StoneColor::Black),
                ((7, 5), StoneColor::White),
                ((7, 6), StoneColor::Black),
                ((7, 7), StoneColor::Black),
                ((7, 8), StoneColor::Black),
            ],
            check: (7, 7),
            wins: false,
        },
        Fixture {
            name: "five hugging the edge",
            stones: (10..15).map(|r| ((r, 0), StoneColor::Black)).collect(),
            check: (14, 0),
            wins: true,
        },
        Fixture {
            name: "four at the edge blocked by bounds",
            stones: (11..15).map(|r| ((r, 0), StoneColor::Black)).collect(),
            check: (14, 0),
            wins: false,
        },
    ]
}

fn build_board(stones: &[(Position, StoneColor)]) -> Board {
    let mut board = Board::new(15);
    for &(pos, color) in stones {
        board.place(pos, color).unwrap();
    }
    board
}

fn build_grid(stones: &[(Position, StoneColor)]) -> BoardState {
    let mut grid = empty_grid(15);
    for &((row, col), color) in stones {
        grid[row][col] = Some(color);
    }
    grid
}

#[test]
fn test_board_engine_verdicts() {
    for fixture in fixtures() {
        let board = build_board(&fixture.stones);
        let won = board.check_win(fixture.check).is_some();
        assert_eq!(won, fixture.wins, "board engine disagrees on: {}", fixture.name);
    }
}

#[test]
fn test_server_verdicts() {
    for fixture in fixtures() {
        let grid = build_grid(&fixture.stones);
        let won = server_check_win(&grid, fixture.check.0, fixture.check.1);
        assert_eq!(won, fixture.wins, "server disagrees on: {}", fixture.name);
    }
}

#[test]
fn test_both_implementations_agree_everywhere() {
    // Beyond the expected verdicts, the two must agree at every cell of every
    // fixture, occupied or not.
    for fixture in fixtures() {
        let board = build_board(&fixture.stones);
        let grid = build_grid(&fixture.stones);
        for row in 0..15 {
            for col in 0..15 {
                let engine = board.check_win((row, col)).is_some();
                let server = server_check_win(&grid, row, col);
                assert_eq!(
                    engine, server,
                    "disagreement at ({row},{col}) on: {}",
                    fixture.name
                );
            }
        }
    }
}

#[test]
fn test_win_appears_on_fifth_placement_not_before() {
    let mut board = Board::new(15);
    let mut grid = empty_grid(15);

    for col in 3..7 {
        board.place((7, col), StoneColor::Black).unwrap();
        grid[7][col] = Some(StoneColor::Black);
        assert_eq!(board.check_win((7, col)), None);
        assert!(!server_check_win(&grid, 7, col));
    }

    board.place((7, 7), StoneColor::Black).unwrap();
    grid[7][7] = Some(StoneColor::Black);
    assert_eq!(board.check_win((7, 7)), Some(StoneColor::Black));
    assert!(server_check_win(&grid, 7, 7));
}
