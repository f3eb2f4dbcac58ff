//! Core building blocks: tiles and wall geometry, players, actions,
//! errors, and the deterministic RNG.

pub mod action;
pub mod error;
pub mod player;
pub mod rng;
pub mod tile;

pub use action::{Action, ActionRecord, DraftDestination, DraftSource};
pub use error::{ActionError, GameError, SnapshotError, StateError};
pub use player::{PlayerId, PlayerMap, MAX_PLAYERS, MIN_PLAYERS};
pub use rng::{GameRng, RngState};
pub use tile::{
    line_capacity, wall_color, wall_column, Color, ALL_COLORS, BOARD_SIZE, COLOR_SET_BONUS,
    COLUMN_BONUS, FACTORY_CAPACITY, FLOOR_CAPACITY, FLOOR_PENALTY, NUM_COLORS, ROW_BONUS,
    TILES_PER_COLOR, TOTAL_TILES,
};
