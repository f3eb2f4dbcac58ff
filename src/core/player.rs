//! Player identification and per-seat data storage.
//!
//! Azul seats 2–4 players. `PlayerId` is a type-safe 0-based seat index;
//! `PlayerMap` stores one value per seat with O(1) indexed access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Minimum seats at the table.
pub const MIN_PLAYERS: usize = 2;

/// Maximum seats at the table.
pub const MAX_PLAYERS: usize = 4;

/// Seat identifier, 0-based: the first seat is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one in table order.
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count) as u8)
    }

    /// Iterate over all seats of a `player_count`-player game.
    ///
    /// ```
    /// use azul_core::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-seat data storage with O(1) access, backed by a `Vec<T>`.
///
/// ```
/// use azul_core::core::{PlayerId, PlayerMap};
///
/// let mut scores: PlayerMap<i32> = PlayerMap::new(2, |_| 0);
/// scores[PlayerId::new(1)] = 12;
/// assert_eq!(scores[PlayerId::new(1)], 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    ///
    /// # Panics
    ///
    /// Panics when `player_count` is outside 2..=4; seat count is a
    /// construction-time programming error, not a runtime condition.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(
            (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count),
            "Azul seats 2-4 players, got {player_count}"
        );

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Create a map of default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Reference to one seat's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Mutable reference to one seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over `(PlayerId, &T)` pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over `(PlayerId, &mut T)` pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all seat IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        assert_eq!(p0.index(), 0);
        assert_eq!(format!("{p0}"), "Player 0");
    }

    #[test]
    fn test_player_id_next_wraps() {
        assert_eq!(PlayerId::new(0).next(2), PlayerId::new(1));
        assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
        assert_eq!(PlayerId::new(3).next(4), PlayerId::new(0));
    }

    #[test]
    fn test_player_id_all() {
        let seats: Vec<_> = PlayerId::all(4).collect();
        assert_eq!(seats.len(), 4);
        assert_eq!(seats[3], PlayerId::new(3));
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(3, |p| p.index() as i32 * 10);
        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(2)], 20);
        assert_eq!(map.player_count(), 3);
    }

    #[test]
    fn test_player_map_mutation() {
        let mut map: PlayerMap<i32> = PlayerMap::with_default(2);
        map[PlayerId::new(1)] = 7;
        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(1)], 7);
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.index() as i32);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(0), &0), (PlayerId::new(1), &1)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(2, |p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Azul seats 2-4 players")]
    fn test_player_map_rejects_one_player() {
        let _: PlayerMap<i32> = PlayerMap::with_default(1);
    }
}
