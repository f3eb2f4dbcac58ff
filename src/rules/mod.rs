//! Rule engine: legal actions, transitions, scoring, termination.

pub mod engine;
pub mod score;

pub use engine::{apply_action, is_over, legal_actions, result, start_round, DraftOutcome, GameResult};
pub use score::{end_game_bonus, score_placement, PlayerRoundSummary, RoundSummary, ScoredPlacement};
