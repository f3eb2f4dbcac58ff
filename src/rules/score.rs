//! Round scoring and end-game bonuses.
//!
//! Round settlement, per player:
//! 1. every exactly-full pattern line moves one tile to the wall (the rest
//!    to the discard bag) and scores its contiguous runs;
//! 2. the floor line is cleared, charging the fixed penalty schedule per
//!    occupied slot (the marker included);
//! 3. the summed delta is applied to the score, clamped so the running
//!    total never drops below 0.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{FloorTile, PlayerBoard, Settlement};
use crate::core::{
    PlayerId, StateError, BOARD_SIZE, COLOR_SET_BONUS, COLUMN_BONUS, FLOOR_PENALTY, ROW_BONUS,
};
use crate::state::{GameState, Phase};

/// One wall placement with the points it scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredPlacement {
    /// What moved where.
    pub settlement: Settlement,
    /// Points for the placement's contiguous runs (≥ 1).
    pub points: i32,
}

/// One player's share of a round settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoundSummary {
    /// The seat this summary belongs to.
    pub player: PlayerId,
    /// Wall placements in line order.
    pub placements: SmallVec<[ScoredPlacement; BOARD_SIZE]>,
    /// Floor-line penalty, ≤ 0.
    pub floor_penalty: i32,
    /// Signed round delta before clamping.
    pub delta: i32,
    /// Running score after the clamped delta.
    pub score: i32,
}

/// Outcome of settling a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// The round that was settled (1-based).
    pub round: u32,
    /// Per-player settlements in seat order.
    pub players: Vec<PlayerRoundSummary>,
    /// Final scores in seat order when this round ended the game.
    pub final_scores: Option<Vec<i32>>,
}

impl RoundSummary {
    /// Whether this settlement ended the game.
    #[must_use]
    pub fn game_over(&self) -> bool {
        self.final_scores.is_some()
    }
}

/// Points for a tile just placed at `(row, col)`: the lengths of the
/// horizontal and vertical runs through the cell, counting a run only when
/// it extends past the placed tile; an isolated tile scores exactly 1.
#[must_use]
pub fn score_placement(board: &PlayerBoard, row: usize, col: usize) -> i32 {
    let mut horizontal = 1;
    let mut c = col;
    while c > 0 && board.wall_occupied(row, c - 1) {
        horizontal += 1;
        c -= 1;
    }
    c = col;
    while c + 1 < BOARD_SIZE && board.wall_occupied(row, c + 1) {
        horizontal += 1;
        c += 1;
    }

    let mut vertical = 1;
    let mut r = row;
    while r > 0 && board.wall_occupied(r - 1, col) {
        vertical += 1;
        r -= 1;
    }
    r = row;
    while r + 1 < BOARD_SIZE && board.wall_occupied(r + 1, col) {
        vertical += 1;
        r += 1;
    }

    match (horizontal > 1, vertical > 1) {
        (false, false) => 1,
        (true, false) => horizontal,
        (false, true) => vertical,
        (true, true) => horizontal + vertical,
    }
}

/// End-game bonus for a board: 2 per complete row, 7 per complete column,
/// 10 per complete color set.
#[must_use]
pub fn end_game_bonus(board: &PlayerBoard) -> i32 {
    ROW_BONUS * board.completed_rows() as i32
        + COLUMN_BONUS * board.completed_columns() as i32
        + COLOR_SET_BONUS * board.completed_color_sets() as i32
}

/// Settle the round: wall tiling, floor penalties, marker hand-off, and
/// the terminal check with end-game bonuses.
pub(crate) fn settle_round(state: &mut GameState) -> Result<RoundSummary, StateError> {
    let mut players = Vec::with_capacity(state.player_count());

    for player in state.players.player_ids().collect::<Vec<_>>() {
        let mut placements: SmallVec<[ScoredPlacement; BOARD_SIZE]> = SmallVec::new();
        let mut placed_points = 0;

        for line in 0..BOARD_SIZE {
            let settlement = {
                let board = state.players.get_mut(player);
                board.settle_line(line)?
            };
            if let Some(settlement) = settlement {
                let board = state.players.get(player);
                let points = score_placement(board, settlement.line, settlement.col);
                state.discard.add(settlement.color, settlement.spent);
                placed_points += points;
                placements.push(ScoredPlacement { settlement, points });
            }
        }

        let floor = state.players.get_mut(player).take_floor();
        let mut floor_penalty = 0;
        for (slot, token) in floor.iter().enumerate() {
            floor_penalty += FLOOR_PENALTY[slot];
            if let FloorTile::Tile(color) = token {
                state.discard.add(*color, 1);
            }
        }

        let delta = placed_points + floor_penalty;
        let score = state.players.get_mut(player).apply_round_delta(delta);

        players.push(PlayerRoundSummary {
            player,
            placements,
            floor_penalty,
            delta,
            score,
        });
    }

    state.first_player_this_round = state.first_player_next_round;
    state.current_player = state.first_player_this_round;
    state.first_player_taken = false;
    state.sequence = 0;

    let game_over = state.players.iter().any(|(_, b)| b.has_complete_row());
    let final_scores = if game_over {
        for (_, board) in state.players.iter_mut() {
            let bonus = end_game_bonus(board);
            board.add_bonus(bonus);
        }
        state.phase = Phase::GameOver;
        Some(state.scores())
    } else {
        state.phase = Phase::RoundPending;
        None
    };

    Ok(RoundSummary {
        round: state.round,
        players,
        final_scores,
    })
}
