//! Serializable presentation snapshots of a state.
//!
//! Views are plain owned data for UIs, logs and analysis exports: tile
//! zones flattened to the one-letter color alphabet (`B`, `Y`, `R`, `K`,
//! `W`, with `-` for empty and `F` for the first-player marker). They
//! carry no behavior and serialize one way only; reconstruction goes
//! through [`codec`](crate::codec) instead.

use serde::Serialize;

use crate::board::{FloorTile, PlayerBoard, TileSource};
use crate::core::{line_capacity, wall_color, PlayerId, BOARD_SIZE, FLOOR_CAPACITY};

use super::{GameState, Phase};

/// One player's board, flattened for display.
#[derive(Clone, Debug, Serialize)]
pub struct PlayerBoardView {
    /// Seat index.
    pub player: u8,
    /// Running score.
    pub score: i32,
    /// Pattern lines as fixed-width rows, shortest first (`"R-"`, `"RR-"`).
    pub pattern_lines: Vec<String>,
    /// Wall rows; each cell is the placed color's letter or `-`.
    pub wall: Vec<String>,
    /// Floor line, left-packed (`"BRF----"`).
    pub floor: String,
}

impl PlayerBoardView {
    /// Flatten one board.
    #[must_use]
    pub fn new(player: PlayerId, board: &PlayerBoard) -> Self {
        let pattern_lines = (0..BOARD_SIZE)
            .map(|line| {
                let pl = board.line(line);
                let mut row = String::with_capacity(line + 1);
                for slot in 0..line_capacity(line) {
                    match pl.color() {
                        Some(color) if slot < pl.count() => row.push(color.letter()),
                        _ => row.push('-'),
                    }
                }
                row
            })
            .collect();

        let wall = (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| {
                        if board.wall_occupied(row, col) {
                            wall_color(row, col).letter()
                        } else {
                            '-'
                        }
                    })
                    .collect()
            })
            .collect();

        let mut floor = String::with_capacity(FLOOR_CAPACITY);
        for token in board.floor() {
            floor.push(match token {
                FloorTile::Tile(color) => color.letter(),
                FloorTile::Marker => 'F',
            });
        }
        while floor.len() < FLOOR_CAPACITY {
            floor.push('-');
        }

        Self {
            player: player.index() as u8,
            score: board.score(),
            pattern_lines,
            wall,
            floor,
        }
    }
}

/// A whole game position, flattened for display.
#[derive(Clone, Debug, Serialize)]
pub struct GameStateView {
    /// Round counter, 0 before the first round.
    pub round: u32,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Seat to move.
    pub current_player: u8,
    /// Factory displays, each a string of color letters or `-` when empty.
    pub factories: Vec<String>,
    /// Center pool letters; leading `F` while the marker is unclaimed.
    pub center: String,
    /// Scores in seat order.
    pub scores: Vec<i32>,
    /// Tiles left in the draw bag.
    pub bag_total: u8,
    /// Tiles in the discard bag.
    pub discard_total: u8,
    /// Per-player boards in seat order.
    pub players: Vec<PlayerBoardView>,
}

impl GameStateView {
    /// Flatten a state.
    #[must_use]
    pub fn new(state: &GameState) -> Self {
        let factories = state.factories().iter().map(source_letters).collect();

        let mut center = String::new();
        if !state.first_player_taken() {
            center.push('F');
        }
        if !state.center().is_empty() {
            center.push_str(&source_letters(state.center()));
        }
        if center.is_empty() {
            center.push('-');
        }

        let players = state
            .players()
            .iter()
            .map(|(player, board)| PlayerBoardView::new(player, board))
            .collect();

        Self {
            round: state.round(),
            phase: state.phase(),
            current_player: state.current_player().index() as u8,
            factories,
            center,
            scores: state.scores(),
            bag_total: state.bag().total(),
            discard_total: state.discard().total(),
            players,
        }
    }
}

/// A source's tiles as concatenated letters in color order, `-` if empty.
fn source_letters(source: &TileSource) -> String {
    if source.is_empty() {
        return "-".to_string();
    }
    let mut letters = String::with_capacity(source.total() as usize);
    for (color, count) in source.colors() {
        for _ in 0..count {
            letters.push(color.letter());
        }
    }
    letters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    #[test]
    fn test_new_game_view() {
        let state = GameState::new(2, 42);
        let view = GameStateView::new(&state);

        assert_eq!(view.round, 0);
        assert_eq!(view.phase, Phase::RoundPending);
        assert_eq!(view.factories, vec!["-"; 5]);
        assert_eq!(view.center, "F");
        assert_eq!(view.scores, vec![0, 0]);
        assert_eq!(view.bag_total, 100);
        assert_eq!(view.players.len(), 2);
    }

    #[test]
    fn test_board_view_rows() {
        let mut state = GameState::new(2, 0);
        let seat = PlayerId::new(0);
        {
            let board = state.players.get_mut(seat);
            board.place_on_line(2, Color::Red, 2).unwrap();
            board.push_floor(FloorTile::Marker);
            board.push_floor(FloorTile::Tile(Color::Blue));
            board.restore_wall_cell(0, 0);
            board.restore_score(12);
        }

        let view = PlayerBoardView::new(seat, state.player(seat));
        assert_eq!(view.pattern_lines[0], "-");
        assert_eq!(view.pattern_lines[2], "RR-");
        assert_eq!(view.wall[0], "B----");
        assert_eq!(view.floor, "FB-----");
        assert_eq!(view.score, 12);
    }

    #[test]
    fn test_center_letters_ordered_by_color() {
        let mut state = GameState::new(2, 0);
        state.center.add(Color::White, 1);
        state.center.add(Color::Blue, 2);
        state.first_player_taken = true;

        let view = GameStateView::new(&state);
        assert_eq!(view.center, "BBW");

        // Empty center with the marker gone renders as the bare placeholder.
        state.center.remove(Color::White, 1).unwrap();
        state.center.remove(Color::Blue, 2).unwrap();
        let view = GameStateView::new(&state);
        assert_eq!(view.center, "-");
    }

    #[test]
    fn test_view_serializes() {
        let state = GameState::new(3, 1);
        let json = serde_json::to_string(&GameStateView::new(&state)).unwrap();
        assert!(json.contains("\"factories\""));
        assert!(json.contains("\"RoundPending\""));
    }
}
