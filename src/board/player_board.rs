//! Per-player board: pattern lines, wall, floor line, tally, score.
//!
//! Invariants owned here:
//! - a pattern line's `count` never exceeds its capacity (`line + 1`), and
//!   it carries a color iff `count > 0`;
//! - a wall cell is only ever set for the color the fixed layout dictates
//!   at that row/column;
//! - the floor holds at most 7 tokens; overflow past that is reported to
//!   the caller so the physical tile can be discarded, never dropped.
//!
//! Mutation happens through the rule engine; external consumers get
//! read-only accessors and [`PlayerBoardView`](crate::state::PlayerBoardView)
//! snapshots.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    line_capacity, wall_column, ActionError, Color, StateError, ALL_COLORS, BOARD_SIZE,
    FLOOR_CAPACITY, NUM_COLORS,
};

/// One pattern line: a color and how many tiles of it are staged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternLine {
    color: Option<Color>,
    count: u8,
}

impl PatternLine {
    /// Staged color, `None` when the line is empty.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Number of staged tiles.
    #[must_use]
    pub fn count(&self) -> u8 {
        self.count
    }

    /// True when no tiles are staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A token on the floor line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorTile {
    /// A regular tile.
    Tile(Color),
    /// The first-player marker.
    Marker,
}

/// A tile settled from a completed pattern line onto the wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Pattern line (= wall row) that completed.
    pub line: usize,
    /// Color placed.
    pub color: Color,
    /// Wall column the color landed in.
    pub col: usize,
    /// Tiles returned to the discard bag (`capacity - 1`).
    pub spent: u8,
}

/// One player's complete board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBoard {
    pattern_lines: [PatternLine; BOARD_SIZE],
    wall: [[bool; BOARD_SIZE]; BOARD_SIZE],
    floor: SmallVec<[FloorTile; FLOOR_CAPACITY]>,
    color_tally: [u8; NUM_COLORS],
    score: i32,
}

impl Default for PlayerBoard {
    fn default() -> Self {
        Self {
            pattern_lines: [PatternLine::default(); BOARD_SIZE],
            wall: [[false; BOARD_SIZE]; BOARD_SIZE],
            floor: SmallVec::new(),
            color_tally: [0; NUM_COLORS],
            score: 0,
        }
    }
}

impl PlayerBoard {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Read-only accessors ===

    /// One pattern line.
    #[must_use]
    pub fn line(&self, line: usize) -> &PatternLine {
        &self.pattern_lines[line]
    }

    /// All pattern lines in row order.
    #[must_use]
    pub fn lines(&self) -> &[PatternLine; BOARD_SIZE] {
        &self.pattern_lines
    }

    /// Whether the wall cell at `(row, col)` is occupied.
    #[must_use]
    pub fn wall_occupied(&self, row: usize, col: usize) -> bool {
        self.wall[row][col]
    }

    /// Whether `color` already sits on the wall in `row`.
    #[must_use]
    pub fn wall_has_color(&self, row: usize, color: Color) -> bool {
        self.wall[row][wall_column(row, color)]
    }

    /// Floor line tokens in placement order.
    #[must_use]
    pub fn floor(&self) -> &[FloorTile] {
        &self.floor
    }

    /// Whether the first-player marker sits on this floor.
    #[must_use]
    pub fn floor_has_marker(&self) -> bool {
        self.floor.contains(&FloorTile::Marker)
    }

    /// Tiles of `color` ever placed on the wall.
    #[must_use]
    pub fn color_tally(&self, color: Color) -> u8 {
        self.color_tally[color.index()]
    }

    /// Running score; never negative.
    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Whether wall `row` is fully occupied (5/5 cells).
    #[must_use]
    pub fn row_complete(&self, row: usize) -> bool {
        self.wall[row].iter().all(|&cell| cell)
    }

    /// Whether any wall row is fully occupied (game-end trigger).
    #[must_use]
    pub fn has_complete_row(&self) -> bool {
        (0..BOARD_SIZE).any(|row| self.row_complete(row))
    }

    /// Number of fully occupied wall rows.
    #[must_use]
    pub fn completed_rows(&self) -> u32 {
        (0..BOARD_SIZE).filter(|&r| self.row_complete(r)).count() as u32
    }

    /// Number of fully occupied wall columns.
    #[must_use]
    pub fn completed_columns(&self) -> u32 {
        (0..BOARD_SIZE)
            .filter(|&col| (0..BOARD_SIZE).all(|row| self.wall[row][col]))
            .count() as u32
    }

    /// Number of colors with all 5 tiles on the wall.
    #[must_use]
    pub fn completed_color_sets(&self) -> u32 {
        ALL_COLORS
            .into_iter()
            .filter(|&c| self.color_tally(c) == BOARD_SIZE as u8)
            .count() as u32
    }

    /// Total tiles held on pattern lines and the floor (markers excluded).
    #[must_use]
    pub fn held_tiles(&self) -> u32 {
        let staged: u32 = self.pattern_lines.iter().map(|l| u32::from(l.count)).sum();
        let floored = self
            .floor
            .iter()
            .filter(|t| matches!(t, FloorTile::Tile(_)))
            .count() as u32;
        staged + floored
    }

    /// Tiles of `color` currently visible on this board (wall, lines, floor).
    #[must_use]
    pub fn visible_tiles(&self, color: Color) -> u32 {
        let walled = u32::from(self.color_tally(color));
        let staged: u32 = self
            .pattern_lines
            .iter()
            .filter(|l| l.color == Some(color))
            .map(|l| u32::from(l.count))
            .sum();
        let floored = self
            .floor
            .iter()
            .filter(|&&t| t == FloorTile::Tile(color))
            .count() as u32;
        walled + staged + floored
    }

    // === Mutation (rule engine + codec only) ===

    /// Check that `color` may be staged on `line` right now.
    pub(crate) fn check_line(&self, line: usize, color: Color) -> Result<(), ActionError> {
        if self.wall_has_color(line, color) {
            return Err(ActionError::WallCellOccupied {
                row: line,
                col: wall_column(line, color),
            });
        }
        let pl = &self.pattern_lines[line];
        if let Some(line_color) = pl.color {
            if line_color != color {
                return Err(ActionError::LineColorMismatch {
                    line,
                    line_color,
                    color,
                });
            }
        }
        if pl.count >= line_capacity(line) {
            return Err(ActionError::LineFull { line });
        }
        Ok(())
    }

    /// Stage `n` tiles of `color` on `line`, returning how many overflowed
    /// past the line's capacity (to be routed to the floor).
    pub(crate) fn place_on_line(
        &mut self,
        line: usize,
        color: Color,
        n: u8,
    ) -> Result<u8, ActionError> {
        self.check_line(line, color)?;
        let pl = &mut self.pattern_lines[line];
        if pl.color.is_none() {
            pl.color = Some(color);
        }
        let space = line_capacity(line) - pl.count;
        let staged = n.min(space);
        pl.count += staged;
        Ok(n - staged)
    }

    /// Append a token to the floor line. Returns `false` when the floor is
    /// full; a physical tile then goes to the discard bag instead.
    pub(crate) fn push_floor(&mut self, token: FloorTile) -> bool {
        if self.floor.len() < FLOOR_CAPACITY {
            self.floor.push(token);
            true
        } else {
            false
        }
    }

    /// Drain the floor line for round settlement.
    pub(crate) fn take_floor(&mut self) -> SmallVec<[FloorTile; FLOOR_CAPACITY]> {
        std::mem::take(&mut self.floor)
    }

    /// Swap the token in the newest occupied floor slot, returning the
    /// displaced one. Callers use this when the marker must claim a slot
    /// on a full floor; the floor must not be empty.
    pub(crate) fn replace_last_floor(&mut self, token: FloorTile) -> FloorTile {
        let last = self.floor.len() - 1;
        std::mem::replace(&mut self.floor[last], token)
    }

    /// Settle pattern line `line` if it is exactly full: move one tile to
    /// the wall, clear the line, and report what happened.
    pub(crate) fn settle_line(&mut self, line: usize) -> Result<Option<Settlement>, StateError> {
        let cap = line_capacity(line);
        let pl = self.pattern_lines[line];
        if pl.count != cap {
            return Ok(None);
        }
        let color = pl.color.ok_or(StateError::LineMissingColor { line })?;
        let col = wall_column(line, color);
        self.wall[line][col] = true;
        self.color_tally[color.index()] += 1;
        self.pattern_lines[line] = PatternLine::default();
        Ok(Some(Settlement {
            line,
            color,
            col,
            spent: cap - 1,
        }))
    }

    /// Apply a round's score delta, clamping the running total at 0.
    pub(crate) fn apply_round_delta(&mut self, delta: i32) -> i32 {
        self.score = (self.score + delta).max(0);
        self.score
    }

    /// Add an always-positive end-game bonus.
    pub(crate) fn add_bonus(&mut self, bonus: i32) {
        self.score += bonus;
    }

    // Snapshot reconstruction hooks (codec).

    pub(crate) fn restore_wall_cell(&mut self, row: usize, col: usize) {
        self.wall[row][col] = true;
        self.color_tally[crate::core::wall_color(row, col).index()] += 1;
    }

    pub(crate) fn restore_line(&mut self, line: usize, color: Color, count: u8) {
        self.pattern_lines[line] = PatternLine {
            color: Some(color),
            count,
        };
    }

    pub(crate) fn restore_score(&mut self, score: i32) {
        self.score = score;
    }
}
