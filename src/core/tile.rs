//! Tile colors, wall geometry, and the fixed scoring tables.
//!
//! The wall is a 5×5 Latin square: every row contains each color exactly
//! once, shifted one column to the right per row. Both directions of the
//! lookup (`wall_column`, `wall_color`) are closed-form and identical for
//! every player.

use serde::{Deserialize, Serialize};

/// Board dimension: 5 pattern lines, 5 wall rows/columns.
pub const BOARD_SIZE: usize = 5;

/// Number of distinct tile colors.
pub const NUM_COLORS: usize = 5;

/// Physical tiles of each color in the game box.
pub const TILES_PER_COLOR: u8 = 20;

/// Total tiles in play (bag at game start).
pub const TOTAL_TILES: u32 = TILES_PER_COLOR as u32 * NUM_COLORS as u32;

/// Tiles drawn into each factory display at the start of a round.
pub const FACTORY_CAPACITY: u8 = 4;

/// Floor line slots per player.
pub const FLOOR_CAPACITY: usize = 7;

/// Penalty for each occupied floor slot, by slot index.
pub const FLOOR_PENALTY: [i32; FLOOR_CAPACITY] = [-1, -1, -2, -2, -2, -3, -3];

/// End-game bonus per completed wall row.
pub const ROW_BONUS: i32 = 2;

/// End-game bonus per completed wall column.
pub const COLUMN_BONUS: i32 = 7;

/// End-game bonus per color with all 5 tiles on the wall.
pub const COLOR_SET_BONUS: i32 = 10;

/// Tile color. Discriminant order is fixed: it drives the wall layout,
/// the snapshot letter alphabet, and all color-indexed tables.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue = 0,
    Yellow = 1,
    Red = 2,
    Black = 3,
    White = 4,
}

/// All colors in discriminant order.
pub const ALL_COLORS: [Color; NUM_COLORS] = [
    Color::Blue,
    Color::Yellow,
    Color::Red,
    Color::Black,
    Color::White,
];

impl Color {
    /// Color-table index (0..5).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Convert a raw index back to a color.
    #[must_use]
    pub fn from_index(idx: usize) -> Option<Color> {
        match idx {
            0 => Some(Color::Blue),
            1 => Some(Color::Yellow),
            2 => Some(Color::Red),
            3 => Some(Color::Black),
            4 => Some(Color::White),
            _ => None,
        }
    }

    /// Single-letter snapshot encoding.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Red => 'R',
            Color::Black => 'K',
            Color::White => 'W',
        }
    }

    /// Parse a snapshot letter.
    #[must_use]
    pub fn from_letter(ch: char) -> Option<Color> {
        match ch {
            'B' => Some(Color::Blue),
            'Y' => Some(Color::Yellow),
            'R' => Some(Color::Red),
            'K' => Some(Color::Black),
            'W' => Some(Color::White),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Wall column that `color` occupies in `row`.
///
/// Row 0 is the identity ordering; each subsequent row shifts every color
/// one column to the right.
#[must_use]
pub const fn wall_column(row: usize, color: Color) -> usize {
    (color.index() + row) % BOARD_SIZE
}

/// Color the wall layout dictates for cell `(row, col)`.
#[must_use]
pub fn wall_color(row: usize, col: usize) -> Color {
    let idx = (col + BOARD_SIZE - row % BOARD_SIZE) % BOARD_SIZE;
    ALL_COLORS[idx]
}

/// Capacity of pattern line `line` (0-based): line 0 holds 1 tile, line 4
/// holds 5.
#[must_use]
pub const fn line_capacity(line: usize) -> u8 {
    line as u8 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_index_round_trip() {
        for color in ALL_COLORS {
            assert_eq!(Color::from_index(color.index()), Some(color));
        }
        assert_eq!(Color::from_index(5), None);
    }

    #[test]
    fn test_color_letter_round_trip() {
        for color in ALL_COLORS {
            assert_eq!(Color::from_letter(color.letter()), Some(color));
        }
        assert_eq!(Color::from_letter('X'), None);
        assert_eq!(Color::from_letter('-'), None);
    }

    #[test]
    fn test_wall_row_0_is_identity() {
        assert_eq!(wall_column(0, Color::Blue), 0);
        assert_eq!(wall_column(0, Color::Yellow), 1);
        assert_eq!(wall_column(0, Color::Red), 2);
        assert_eq!(wall_column(0, Color::Black), 3);
        assert_eq!(wall_column(0, Color::White), 4);
    }

    #[test]
    fn test_wall_rows_shift_right() {
        // Blue walks down the main diagonal.
        for row in 0..BOARD_SIZE {
            assert_eq!(wall_column(row, Color::Blue), row);
        }
        // White wraps from column 4 back to 0.
        assert_eq!(wall_column(1, Color::White), 0);
        assert_eq!(wall_column(2, Color::Black), 0);
    }

    #[test]
    fn test_each_row_contains_every_color_once() {
        for row in 0..BOARD_SIZE {
            let mut seen = [false; NUM_COLORS];
            for color in ALL_COLORS {
                let col = wall_column(row, color);
                assert!(!seen[col], "column {col} used twice in row {row}");
                seen[col] = true;
            }
        }
    }

    #[test]
    fn test_wall_color_inverts_wall_column() {
        for row in 0..BOARD_SIZE {
            for color in ALL_COLORS {
                assert_eq!(wall_color(row, wall_column(row, color)), color);
            }
        }
    }

    #[test]
    fn test_line_capacities() {
        assert_eq!(line_capacity(0), 1);
        assert_eq!(line_capacity(2), 3);
        assert_eq!(line_capacity(4), 5);
    }

    #[test]
    fn test_penalty_schedule() {
        assert_eq!(FLOOR_PENALTY.iter().sum::<i32>(), -14);
        assert_eq!(FLOOR_PENALTY[0] + FLOOR_PENALTY[1] + FLOOR_PENALTY[2], -4);
    }
}
