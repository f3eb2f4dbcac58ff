//! Capture/undo support for search over one owned state.
//!
//! Tree search wants to try an action, recurse, and take it back without
//! paying a full deep copy per node. [`capture`] records just the zones a
//! draft action touches (one factory, the center, the acting board, the
//! discard bag, turn bookkeeping); [`undo`] writes them back. Actions that
//! will end the round cascade into settlement across every board, so those
//! fall back to a full snapshot.
//!
//! The pairing discipline is the caller's: capture before applying, undo in
//! reverse order. A delta is consumed by `undo` and cannot be replayed.

use crate::board::{PlayerBoard, TileSource};
use crate::core::{Action, DraftSource, PlayerId};

use super::{GameState, Phase};

/// Everything a single non-settling draft action can touch.
#[derive(Clone, Debug)]
pub struct DraftDelta {
    /// The drafted factory, by index, before the draft. `None` for center
    /// drafts.
    factory: Option<(usize, TileSource)>,
    center: TileSource,
    player: PlayerId,
    board: PlayerBoard,
    discard: TileSource,
    first_player_taken: bool,
    first_player_next_round: PlayerId,
    current_player: PlayerId,
    phase: Phase,
    sequence: u32,
    history_len: usize,
}

/// Reversal data for one action, captured before applying it.
#[derive(Clone, Debug)]
pub enum StateDelta {
    /// Narrow delta for a draft that leaves the round in progress.
    Draft(Box<DraftDelta>),
    /// Full snapshot, taken when the action will exhaust the tile sources
    /// and trigger round settlement.
    Full(Box<GameState>),
}

/// Capture the reversal data for `action` on `state`.
///
/// Must be called on the state the action will be applied to, before
/// applying it. Capturing for an action that then fails validation is
/// harmless; a failed [`apply_action`](crate::rules::apply_action) leaves
/// the state untouched and the delta restores it to itself.
#[must_use]
pub fn capture(state: &GameState, action: &Action) -> StateDelta {
    if ends_round(state, action) {
        return StateDelta::Full(Box::new(state.clone()));
    }

    let factory = match action.source {
        DraftSource::Factory(i) => {
            let i = i as usize;
            state.factories.get(i).map(|f| (i, f.clone()))
        }
        DraftSource::Center => None,
    };
    let player = state.current_player;

    StateDelta::Draft(Box::new(DraftDelta {
        factory,
        center: state.center.clone(),
        player,
        board: state.players[player].clone(),
        discard: state.discard.clone(),
        first_player_taken: state.first_player_taken,
        first_player_next_round: state.first_player_next_round,
        current_player: state.current_player,
        phase: state.phase,
        sequence: state.sequence,
        history_len: state.history.len(),
    }))
}

/// Roll `state` back to the position `delta` was captured from.
pub fn undo(state: &mut GameState, delta: StateDelta) {
    match delta {
        StateDelta::Full(snapshot) => *state = *snapshot,
        StateDelta::Draft(delta) => {
            let delta = *delta;
            if let Some((i, factory)) = delta.factory {
                state.factories[i] = factory;
            }
            state.center = delta.center;
            state.players[delta.player] = delta.board;
            state.discard = delta.discard;
            state.first_player_taken = delta.first_player_taken;
            state.first_player_next_round = delta.first_player_next_round;
            state.current_player = delta.current_player;
            state.phase = delta.phase;
            state.sequence = delta.sequence;
            state.history.truncate(delta.history_len);
        }
    }
}

/// Whether applying `action` will empty every tile source (the trigger for
/// round settlement). True exactly when the named source's tiles of that
/// color are the only tiles left anywhere: a factory draft also dumps the
/// factory's remainder into the center, so any remainder keeps the round
/// alive.
fn ends_round(state: &GameState, action: &Action) -> bool {
    let taken = match action.source {
        DraftSource::Factory(i) => state
            .factories
            .get(i as usize)
            .map_or(0, |f| f.count(action.color)),
        DraftSource::Center => state.center.count(action.color),
    };
    if taken == 0 {
        return false;
    }

    let remaining: u32 = state
        .factories
        .iter()
        .map(|f| u32::from(f.total()))
        .sum::<u32>()
        + u32::from(state.center.total());
    remaining == u32::from(taken)
}
