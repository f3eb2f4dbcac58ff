//! # azul-core
//!
//! A complete Azul rules engine built as an explicit state machine,
//! optimized for search, RL training and analysis tooling.
//!
//! ## Design Principles
//!
//! 1. **Explicit State**: [`GameState`] is plain, fully observable data.
//!    No hidden globals; the RNG is seeded and carried inside the state.
//!
//! 2. **Fail Loudly**: Every transition is a `Result`. An illegal action,
//!    an inconsistent state or a malformed snapshot is a typed error,
//!    never a silently "repaired" position.
//!
//! 3. **N-Player First**: Every API is parameterized over 2-4 seats;
//!    factory counts and turn order follow from the player count.
//!
//! ## Architecture
//!
//! - **Pure transitions**: the rule engine mutates a state it exclusively
//!   owns; concurrent search clones or captures deltas instead of sharing.
//!
//! - **Deterministic replay**: seeded ChaCha draws plus the recorded
//!   action history reproduce any game exactly.
//!
//! - **Persistent history**: `im-rs` vectors keep state clones cheap for
//!   tree search.
//!
//! ## Modules
//!
//! - `core`: tiles and wall geometry, players, actions, errors, RNG
//! - `board`: tile sources (factories/center/bags) and player boards
//! - `state`: the full game state, views, and capture/undo deltas
//! - `rules`: legal actions, transitions, round and end-game scoring
//! - `hash`: Zobrist position hashing with incremental updates
//! - `codec`: canonical FEN-like snapshot strings

pub mod board;
pub mod codec;
pub mod core;
pub mod hash;
pub mod rules;
pub mod state;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, ActionError, Color, DraftDestination, DraftSource, GameError, GameRng,
    PlayerId, PlayerMap, RngState, SnapshotError, StateError,
};

pub use crate::board::{FloorTile, PatternLine, PlayerBoard, Settlement, TileSource};

pub use crate::state::{
    capture, undo, GameState, GameStateView, Phase, PlayerBoardView, StateDelta,
};

pub use crate::rules::{
    apply_action, end_game_bonus, is_over, legal_actions, result, score_placement, start_round,
    DraftOutcome, GameResult, RoundSummary,
};

pub use crate::hash::{Feature, Zobrist};
