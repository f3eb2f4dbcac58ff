//! Board components: tile sources and per-player boards.

pub mod player_board;
pub mod source;

pub use player_board::{FloorTile, PatternLine, PlayerBoard, Settlement};
pub use source::TileSource;
