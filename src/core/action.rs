//! Draft actions and the recorded action history.
//!
//! An Azul move is a triple: take every tile of one color from one source
//! (a factory display or the center pool) and route them to one
//! destination (a pattern line, or straight to the floor). Overflow past a
//! line's capacity and the first-player marker are side effects of
//! applying the action, never separate moves.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::tile::Color;

/// Where tiles are drafted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftSource {
    /// Factory display by index.
    Factory(u8),
    /// The shared center pool.
    Center,
}

impl std::fmt::Display for DraftSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftSource::Factory(i) => write!(f, "factory {i}"),
            DraftSource::Center => write!(f, "center"),
        }
    }
}

/// Where drafted tiles go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftDestination {
    /// Pattern line 0..=4 (capacity `line + 1`); overflow runs to the floor.
    Line(u8),
    /// Everything to the floor line.
    Floor,
}

/// A complete draft action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Tile source.
    pub source: DraftSource,
    /// Color to take (all tiles of it).
    pub color: Color,
    /// Destination for the taken tiles.
    pub dest: DraftDestination,
}

impl Action {
    /// Draft from a factory into a pattern line.
    #[must_use]
    pub const fn factory_to_line(factory: u8, color: Color, line: u8) -> Self {
        Self {
            source: DraftSource::Factory(factory),
            color,
            dest: DraftDestination::Line(line),
        }
    }

    /// Draft from the center into a pattern line.
    #[must_use]
    pub const fn center_to_line(color: Color, line: u8) -> Self {
        Self {
            source: DraftSource::Center,
            color,
            dest: DraftDestination::Line(line),
        }
    }

    /// Draft straight to the floor.
    #[must_use]
    pub const fn to_floor(source: DraftSource, color: Color) -> Self {
        Self {
            source,
            color,
            dest: DraftDestination::Floor,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.source {
            DraftSource::Factory(i) => write!(f, "F{i}:{}", self.color)?,
            DraftSource::Center => write!(f, "C:{}", self.color)?,
        }
        match self.dest {
            DraftDestination::Line(l) => write!(f, ">L{l}"),
            DraftDestination::Floor => write!(f, ">floor"),
        }
    }
}

/// A recorded action with metadata, for replay and debugging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,
    /// The action taken.
    pub action: Action,
    /// Round number when the action was taken (1-based).
    pub round: u32,
    /// Sequence number within the round.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, round: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            round,
            sequence,
        }
    }
}
