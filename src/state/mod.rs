//! Complete game state: boards, tile supply, factories, center pool,
//! turn order and first-player bookkeeping.
//!
//! ## Ownership contract
//!
//! `GameState` is exclusively owned by whichever component is currently
//! advancing it: one state, one writer, no internal locking. Concurrent
//! exploration takes its own [`clone_state`](GameState::clone_state) (which
//! forks the RNG so branches diverge deterministically) or a plain
//! [`Clone`] for exact replicas. Aliasing a state across workers is a bug
//! in the caller.

pub mod delta;
pub mod view;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::board::{PlayerBoard, TileSource};
use crate::core::{
    Action, ActionRecord, Color, GameRng, PlayerId, PlayerMap, RngState, ALL_COLORS,
    TILES_PER_COLOR, TOTAL_TILES,
};

pub use delta::{capture, undo, StateDelta};
pub use view::{GameStateView, PlayerBoardView};

/// Lifecycle phase of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Between rounds: factories are empty and await `start_round`.
    RoundPending,
    /// Players are drafting tiles.
    Drafting,
    /// Terminal; scores are final.
    GameOver,
}

/// Number of factory displays for a player count (5/7/9 for 2/3/4).
#[must_use]
pub fn factory_count(player_count: usize) -> usize {
    2 * player_count + 1
}

/// Complete, fully observable game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) players: PlayerMap<PlayerBoard>,
    pub(crate) factories: Vec<TileSource>,
    pub(crate) center: TileSource,
    pub(crate) bag: TileSource,
    pub(crate) discard: TileSource,
    /// Whether the first-player marker has been claimed this round.
    pub(crate) first_player_taken: bool,
    pub(crate) first_player_this_round: PlayerId,
    pub(crate) first_player_next_round: PlayerId,
    pub(crate) current_player: PlayerId,
    pub(crate) phase: Phase,
    /// Explicit round counter, 0 before the first `start_round`.
    pub(crate) round: u32,
    /// Action sequence within the current round.
    pub(crate) sequence: u32,
    /// Replay/debug history; persistent vector keeps clones cheap.
    pub(crate) history: Vector<ActionRecord>,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: GameRng,
}

fn default_rng() -> GameRng {
    GameRng::new(0)
}

impl GameState {
    /// Create a fresh game: full bag, empty boards, seat 0 to start.
    ///
    /// The state starts in [`Phase::RoundPending`]; call
    /// [`rules::start_round`](crate::rules::start_round) to fill the
    /// factories for round 1.
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        let first = PlayerId::new(0);
        Self {
            players: PlayerMap::with_default(player_count),
            factories: vec![TileSource::new(); factory_count(player_count)],
            center: TileSource::new(),
            bag: TileSource::uniform(TILES_PER_COLOR),
            discard: TileSource::new(),
            first_player_taken: false,
            first_player_this_round: first,
            first_player_next_round: first,
            current_player: first,
            phase: Phase::RoundPending,
            round: 0,
            sequence: 0,
            history: Vector::new(),
            rng: GameRng::new(seed),
        }
    }

    // === Read-only accessors ===

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// One player's board.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerBoard {
        &self.players[player]
    }

    /// All boards in seat order.
    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerBoard> {
        &self.players
    }

    /// Factory displays in index order.
    #[must_use]
    pub fn factories(&self) -> &[TileSource] {
        &self.factories
    }

    /// The center pool.
    #[must_use]
    pub fn center(&self) -> &TileSource {
        &self.center
    }

    /// The draw bag.
    #[must_use]
    pub fn bag(&self) -> &TileSource {
        &self.bag
    }

    /// The discard bag ("box lid").
    #[must_use]
    pub fn discard(&self) -> &TileSource {
        &self.discard
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Round counter: 0 before the first round starts, then 1-based.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Whose turn it is while drafting.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Whether the first-player marker has been claimed this round.
    #[must_use]
    pub fn first_player_taken(&self) -> bool {
        self.first_player_taken
    }

    /// The seat that starts the round in progress (or about to start).
    #[must_use]
    pub fn round_starter(&self) -> PlayerId {
        self.first_player_this_round
    }

    /// The seat currently slated to start the next round.
    #[must_use]
    pub fn next_round_starter(&self) -> PlayerId {
        self.first_player_next_round
    }

    /// Scores in seat order.
    #[must_use]
    pub fn scores(&self) -> Vec<i32> {
        self.players.iter().map(|(_, b)| b.score()).collect()
    }

    /// Recorded action history, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Plain-data display snapshot of the whole position.
    #[must_use]
    pub fn view(&self) -> GameStateView {
        GameStateView::new(self)
    }

    /// Plain-data display snapshot of one seat's board.
    #[must_use]
    pub fn player_view(&self, player: PlayerId) -> PlayerBoardView {
        PlayerBoardView::new(player, &self.players[player])
    }

    /// True while any factory or the center still holds tiles.
    #[must_use]
    pub fn sources_have_tiles(&self) -> bool {
        !self.center.is_empty() || self.factories.iter().any(|f| !f.is_empty())
    }

    /// Total tiles tracked across every zone. Always [`TOTAL_TILES`] for a
    /// state reached through the rule engine (tile conservation).
    #[must_use]
    pub fn total_tiles_tracked(&self) -> u32 {
        let supply = u32::from(self.bag.total()) + u32::from(self.discard.total());
        let sources: u32 = self
            .factories
            .iter()
            .map(|f| u32::from(f.total()))
            .sum::<u32>()
            + u32::from(self.center.total());
        let held: u32 = self
            .players
            .iter()
            .map(|(_, b)| {
                b.held_tiles() + ALL_COLORS.into_iter().map(|c| u32::from(b.color_tally(c))).sum::<u32>()
            })
            .sum();
        supply + sources + held
    }

    // === Mutation support ===

    /// Exploration clone: deep copy with a forked RNG so the branch draws
    /// a different (but deterministic) tile sequence.
    #[must_use]
    pub fn clone_state(&mut self) -> Self {
        let rng = self.rng.fork();
        let mut clone = self.clone();
        clone.rng = rng;
        clone
    }

    /// Checkpoint the RNG. Serde skips the RNG, so callers that need the
    /// exact draw sequence after deserializing persist this alongside and
    /// hand it back to [`restore_rng`](Self::restore_rng).
    #[must_use]
    pub fn rng_state(&self) -> RngState {
        self.rng.state()
    }

    /// Restore the RNG from a checkpoint taken with
    /// [`rng_state`](Self::rng_state).
    pub fn restore_rng(&mut self, checkpoint: &RngState) {
        self.rng = GameRng::from_state(checkpoint);
    }

    /// Draw one random tile from the bag, recycling the discard bag into
    /// the draw bag first when the bag runs dry. `None` when both are
    /// empty.
    pub(crate) fn draw_from_bag(&mut self) -> Option<Color> {
        if self.bag.is_empty() {
            if self.discard.is_empty() {
                return None;
            }
            let mut discard = std::mem::take(&mut self.discard);
            discard.drain_into(&mut self.bag);
        }

        let mut pick = self.rng.gen_range_usize(0..self.bag.total() as usize);
        for color in ALL_COLORS {
            let count = self.bag.count(color) as usize;
            if pick < count {
                // Underflow impossible: count > pick >= 0.
                self.bag
                    .remove(color, 1)
                    .expect("bag count verified above");
                return Some(color);
            }
            pick -= count;
        }
        unreachable!("total() is the sum of per-color counts")
    }

    /// Append an action to the history with round/sequence metadata.
    pub(crate) fn record_action(&mut self, player: PlayerId, action: Action) {
        let record = ActionRecord::new(player, action, self.round, self.sequence);
        self.sequence += 1;
        self.history.push_back(record);
    }
}
