//! Zobrist hashing over game states.
//!
//! A [`Zobrist`] holds fixed random 64-bit key tables for every board
//! feature; a state's hash is the XOR of the keys of its active features.
//! The hash is a pure function of the visible configuration (tiles,
//! scores, marker bookkeeping, player to move), never of move order, so
//! transposing move sequences that reach the same position collide on
//! purpose.
//!
//! Tables are an explicit, constructor-injected object: independent
//! hashers with different seeds never share or race on global key state.
//! Two hashers built with the same seed produce identical keys.
//!
//! Count-valued features (pattern lines, factories, center pool) are
//! keyed per `(index, count)`, so an incremental update XORs out the key
//! for the old count and XORs in the key for the new one — a count of 0
//! maps to the identity key so "now absent" needs no special case.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::FloorTile;
use crate::core::{
    Color, PlayerId, BOARD_SIZE, FLOOR_CAPACITY, MAX_PLAYERS, NUM_COLORS, TILES_PER_COLOR,
};
use crate::state::GameState;

/// Most factories any player count uses (4 players → 9).
const MAX_FACTORIES: usize = 9;

/// Floor token universe: five colors plus the marker.
const NUM_TOKENS: usize = NUM_COLORS + 1;

/// Scores are keyed directly up to this bound; larger totals clamp onto
/// the last key. Azul scores cannot reach it.
const SCORE_KEYS: usize = 256;

/// One hashable board feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    /// An occupied wall cell.
    Wall {
        player: PlayerId,
        row: usize,
        col: usize,
    },
    /// A pattern line holding `count` tiles of `color`.
    PatternLine {
        player: PlayerId,
        line: usize,
        color: Color,
        count: u8,
    },
    /// A floor-line slot holding a token.
    FloorSlot {
        player: PlayerId,
        slot: usize,
        token: FloorTile,
    },
    /// A factory holding `count` tiles of `color`.
    Factory {
        factory: usize,
        color: Color,
        count: u8,
    },
    /// The center pool holding `count` tiles of `color`.
    Center { color: Color, count: u8 },
    /// The seat booked to start the next round.
    NextRoundStarter { player: PlayerId },
    /// The first-player marker is still unclaimed this round.
    MarkerAvailable,
    /// The seat to move.
    ToMove { player: PlayerId },
    /// A player's running score.
    Score { player: PlayerId, score: i32 },
}

/// Fixed random key tables plus hashing over [`GameState`].
pub struct Zobrist {
    wall: [[[u64; BOARD_SIZE]; BOARD_SIZE]; MAX_PLAYERS],
    pattern: [[[[u64; BOARD_SIZE + 1]; NUM_COLORS]; BOARD_SIZE]; MAX_PLAYERS],
    floor: [[[u64; NUM_TOKENS]; FLOOR_CAPACITY]; MAX_PLAYERS],
    factory: [[[u64; 5]; NUM_COLORS]; MAX_FACTORIES],
    center: [[u64; TILES_PER_COLOR as usize + 1]; NUM_COLORS],
    starter: [u64; MAX_PLAYERS],
    marker_available: u64,
    to_move: [u64; MAX_PLAYERS],
    score: [[u64; SCORE_KEYS]; MAX_PLAYERS],
}

impl Zobrist {
    /// Build key tables from a seed. The same seed yields the same keys.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut wall = [[[0u64; BOARD_SIZE]; BOARD_SIZE]; MAX_PLAYERS];
        for player in &mut wall {
            for row in player.iter_mut() {
                for key in row.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        // Count index 0 stays the identity key for every count-valued
        // table, so an empty slot contributes nothing to the hash.
        let mut pattern = [[[[0u64; BOARD_SIZE + 1]; NUM_COLORS]; BOARD_SIZE]; MAX_PLAYERS];
        for player in &mut pattern {
            for line in player.iter_mut() {
                for color in line.iter_mut() {
                    for key in color.iter_mut().skip(1) {
                        *key = rng.gen();
                    }
                }
            }
        }

        let mut floor = [[[0u64; NUM_TOKENS]; FLOOR_CAPACITY]; MAX_PLAYERS];
        for player in &mut floor {
            for slot in player.iter_mut() {
                for key in slot.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let mut factory = [[[0u64; 5]; NUM_COLORS]; MAX_FACTORIES];
        for fac in &mut factory {
            for color in fac.iter_mut() {
                for key in color.iter_mut().skip(1) {
                    *key = rng.gen();
                }
            }
        }

        let mut center = [[0u64; TILES_PER_COLOR as usize + 1]; NUM_COLORS];
        for color in &mut center {
            for key in color.iter_mut().skip(1) {
                *key = rng.gen();
            }
        }

        let mut starter = [0u64; MAX_PLAYERS];
        for key in &mut starter {
            *key = rng.gen();
        }

        let marker_available = rng.gen();

        let mut to_move = [0u64; MAX_PLAYERS];
        for key in &mut to_move {
            *key = rng.gen();
        }

        let mut score = [[0u64; SCORE_KEYS]; MAX_PLAYERS];
        for player in &mut score {
            for key in player.iter_mut() {
                *key = rng.gen();
            }
        }

        Self {
            wall,
            pattern,
            floor,
            factory,
            center,
            starter,
            marker_available,
            to_move,
            score,
        }
    }

    /// The key of one feature.
    #[must_use]
    pub fn key(&self, feature: Feature) -> u64 {
        match feature {
            Feature::Wall { player, row, col } => self.wall[player.index()][row][col],
            Feature::PatternLine {
                player,
                line,
                color,
                count,
            } => self.pattern[player.index()][line][color.index()][count as usize],
            Feature::FloorSlot {
                player,
                slot,
                token,
            } => {
                let token_idx = match token {
                    FloorTile::Tile(color) => color.index(),
                    FloorTile::Marker => NUM_COLORS,
                };
                self.floor[player.index()][slot][token_idx]
            }
            Feature::Factory {
                factory,
                color,
                count,
            } => self.factory[factory][color.index()][count as usize],
            Feature::Center { color, count } => self.center[color.index()][count as usize],
            Feature::NextRoundStarter { player } => self.starter[player.index()],
            Feature::MarkerAvailable => self.marker_available,
            Feature::ToMove { player } => self.to_move[player.index()],
            Feature::Score { player, score } => {
                let idx = (score.max(0) as usize).min(SCORE_KEYS - 1);
                self.score[player.index()][idx]
            }
        }
    }

    /// XOR one feature's key into a running hash. Toggling a feature out
    /// and its replacement in performs an incremental update; no full
    /// recomputation is needed.
    pub fn toggle(&self, hash: &mut u64, feature: Feature) {
        *hash ^= self.key(feature);
    }

    /// Full hash of a state's visible configuration.
    #[must_use]
    pub fn hash(&self, state: &GameState) -> u64 {
        let mut hash = 0u64;

        for (player, board) in state.players().iter() {
            for row in 0..BOARD_SIZE {
                for col in 0..BOARD_SIZE {
                    if board.wall_occupied(row, col) {
                        self.toggle(&mut hash, Feature::Wall { player, row, col });
                    }
                }
            }
            for (line, pl) in board.lines().iter().enumerate() {
                if let Some(color) = pl.color() {
                    self.toggle(
                        &mut hash,
                        Feature::PatternLine {
                            player,
                            line,
                            color,
                            count: pl.count(),
                        },
                    );
                }
            }
            for (slot, &token) in board.floor().iter().enumerate() {
                self.toggle(&mut hash, Feature::FloorSlot {
                    player,
                    slot,
                    token,
                });
            }
            self.toggle(&mut hash, Feature::Score {
                player,
                score: board.score(),
            });
        }

        for (factory, source) in state.factories().iter().enumerate() {
            for (color, count) in source.colors() {
                self.toggle(&mut hash, Feature::Factory {
                    factory,
                    color,
                    count,
                });
            }
        }
        for (color, count) in state.center().colors() {
            self.toggle(&mut hash, Feature::Center { color, count });
        }

        if !state.first_player_taken() {
            self.toggle(&mut hash, Feature::MarkerAvailable);
        }
        self.toggle(&mut hash, Feature::NextRoundStarter {
            player: state.next_round_starter(),
        });
        self.toggle(&mut hash, Feature::ToMove {
            player: state.current_player(),
        });

        hash
    }
}
