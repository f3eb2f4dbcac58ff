//! Error types for rule-engine operations and snapshot decoding.
//!
//! Three families, all value-returned (`Result`), never silently
//! substituted:
//!
//! - [`ActionError`]: a caller asked for an illegal move.
//! - [`StateError`]: an internal invariant would be violated; the engine
//!   aborts the operation rather than repairing it.
//! - [`SnapshotError`]: a serialized snapshot failed to decode.

use std::fmt;

use super::action::DraftSource;
use super::player::PlayerId;
use super::tile::Color;

/// An action was illegal in the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// A different player is to move.
    NotPlayersTurn { expected: PlayerId, found: PlayerId },
    /// The state machine is not in the drafting phase.
    WrongPhase,
    /// The referenced factory index does not exist at this player count.
    NoSuchFactory { factory: u8 },
    /// The source holds no tiles of the requested color.
    ColorUnavailable { source: DraftSource, color: Color },
    /// The referenced pattern line index is out of range.
    NoSuchLine { line: u8 },
    /// The target pattern line already holds a different color.
    LineColorMismatch {
        line: usize,
        line_color: Color,
        color: Color,
    },
    /// The target pattern line is already full.
    LineFull { line: usize },
    /// The wall cell this line/color pair feeds is already occupied.
    WallCellOccupied { row: usize, col: usize },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::NotPlayersTurn { expected, found } => {
                write!(f, "{found} acted but {expected} is to move")
            }
            ActionError::WrongPhase => {
                write!(f, "action not legal in the current phase")
            }
            ActionError::NoSuchFactory { factory } => {
                write!(f, "factory {factory} does not exist")
            }
            ActionError::ColorUnavailable { source, color } => {
                write!(f, "no {color} tiles available in {source}")
            }
            ActionError::NoSuchLine { line } => {
                write!(f, "pattern line {line} does not exist")
            }
            ActionError::LineColorMismatch {
                line,
                line_color,
                color,
            } => {
                write!(
                    f,
                    "pattern line {line} holds {line_color}, cannot add {color}"
                )
            }
            ActionError::LineFull { line } => {
                write!(f, "pattern line {line} is already full")
            }
            ActionError::WallCellOccupied { row, col } => {
                write!(f, "wall cell ({row}, {col}) is already occupied")
            }
        }
    }
}

impl std::error::Error for ActionError {}

/// An internal invariant would be violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A tile counter would go negative.
    TileUnderflow { color: Color },
    /// A full pattern line carries no color.
    LineMissingColor { line: usize },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::TileUnderflow { color } => {
                write!(f, "tile count for {color} would go negative")
            }
            StateError::LineMissingColor { line } => {
                write!(f, "full pattern line {line} has no color")
            }
        }
    }
}

impl std::error::Error for StateError {}

/// A serialized snapshot failed structural or semantic checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Total `/`-separated segment count does not fit any player count.
    SegmentCount { found: usize },
    /// Derived player count outside 2..=4.
    PlayerCount { found: usize },
    /// A segment has the wrong number of `|`-separated fields.
    FieldCount {
        segment: &'static str,
        expected: usize,
        found: usize,
    },
    /// A field has the wrong length.
    FieldLength {
        segment: &'static str,
        expected: usize,
        found: usize,
    },
    /// A character is not a color letter (or `-`/`F` where allowed).
    InvalidColor { ch: char },
    /// A wall letter disagrees with the fixed wall layout.
    WallColorMismatch { row: usize, col: usize, ch: char },
    /// A pattern line mixes colors.
    MixedLineColors { line: usize },
    /// An integer field failed to parse.
    InvalidInteger { field: &'static str, text: String },
    /// The current-player field is out of range.
    PlayerOutOfRange { found: usize, player_count: usize },
    /// More tiles of one color are visible than exist in the game.
    TileOverflow { color: Color, count: u32 },
    /// The first-player marker appears more than once.
    DuplicateMarker,
    /// The first-player marker appears nowhere (neither unclaimed in the
    /// center nor on a floor line).
    MissingMarker,
    /// A pattern line stages a color already tiled on that wall row.
    LineColorOnWall { line: usize, color: Color },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::SegmentCount { found } => {
                write!(f, "snapshot has {found} segments, expected 11, 14 or 17")
            }
            SnapshotError::PlayerCount { found } => {
                write!(f, "snapshot encodes {found} players, expected 2-4")
            }
            SnapshotError::FieldCount {
                segment,
                expected,
                found,
            } => {
                write!(
                    f,
                    "{segment} segment has {found} fields, expected {expected}"
                )
            }
            SnapshotError::FieldLength {
                segment,
                expected,
                found,
            } => {
                write!(
                    f,
                    "{segment} field is {found} characters, expected {expected}"
                )
            }
            SnapshotError::InvalidColor { ch } => {
                write!(f, "invalid color character '{ch}'")
            }
            SnapshotError::WallColorMismatch { row, col, ch } => {
                write!(
                    f,
                    "wall cell ({row}, {col}) holds '{ch}', inconsistent with the wall layout"
                )
            }
            SnapshotError::MixedLineColors { line } => {
                write!(f, "pattern line {line} mixes colors")
            }
            SnapshotError::InvalidInteger { field, text } => {
                write!(f, "{field} field '{text}' is not a valid integer")
            }
            SnapshotError::PlayerOutOfRange {
                found,
                player_count,
            } => {
                write!(
                    f,
                    "current player {found} out of range for {player_count} players"
                )
            }
            SnapshotError::TileOverflow { color, count } => {
                write!(f, "{count} {color} tiles visible, more than exist in the game")
            }
            SnapshotError::DuplicateMarker => {
                write!(f, "first-player marker appears more than once")
            }
            SnapshotError::MissingMarker => {
                write!(f, "first-player marker appears nowhere")
            }
            SnapshotError::LineColorOnWall { line, color } => {
                write!(
                    f,
                    "pattern line {line} stages {color}, already tiled in that wall row"
                )
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Umbrella error for rule-engine transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The caller requested an illegal action.
    Action(ActionError),
    /// An internal invariant would be violated.
    State(StateError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Action(e) => write!(f, "illegal action: {e}"),
            GameError::State(e) => write!(f, "invalid state: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Action(e) => Some(e),
            GameError::State(e) => Some(e),
        }
    }
}

impl From<ActionError> for GameError {
    fn from(e: ActionError) -> Self {
        GameError::Action(e)
    }
}

impl From<StateError> for GameError {
    fn from(e: StateError) -> Self {
        GameError::State(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::ColorUnavailable {
            source: DraftSource::Factory(2),
            color: Color::Red,
        };
        assert!(err.to_string().contains('R'));
        assert!(err.to_string().contains("factory 2"));

        let err = ActionError::NotPlayersTurn {
            expected: PlayerId::new(0),
            found: PlayerId::new(1),
        };
        assert!(err.to_string().contains("Player 1"));
    }

    #[test]
    fn test_state_error_display() {
        let err = StateError::TileUnderflow { color: Color::Blue };
        assert!(err.to_string().contains('B'));
    }

    #[test]
    fn test_snapshot_error_display() {
        let err = SnapshotError::SegmentCount { found: 3 };
        assert!(err.to_string().contains('3'));

        let err = SnapshotError::WallColorMismatch {
            row: 1,
            col: 2,
            ch: 'B',
        };
        assert!(err.to_string().contains("(1, 2)"));
    }

    #[test]
    fn test_game_error_wraps_both_families() {
        let action: GameError = ActionError::WrongPhase.into();
        assert!(matches!(action, GameError::Action(_)));

        let state: GameError = StateError::LineMissingColor { line: 4 }.into();
        assert!(state.to_string().contains("invalid state"));
    }

    #[test]
    fn test_error_equality() {
        let a = SnapshotError::InvalidColor { ch: 'Q' };
        let b = SnapshotError::InvalidColor { ch: 'Q' };
        assert_eq!(a, b);
    }
}
