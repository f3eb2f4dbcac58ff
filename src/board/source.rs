//! Tile sources: color-indexed multisets with a running total.
//!
//! The same counter backs factory displays, the center pool, the draw bag
//! and the discard bag. `total` is kept in lock-step with the per-color
//! counts; mutators fail rather than drive a count negative.

use serde::{Deserialize, Serialize};

use crate::core::{Color, StateError, ALL_COLORS, NUM_COLORS};

/// A pile of tiles counted by color.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSource {
    counts: [u8; NUM_COLORS],
    total: u8,
}

impl TileSource {
    /// An empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source holding `per_color` tiles of every color (the fresh bag).
    #[must_use]
    pub fn uniform(per_color: u8) -> Self {
        Self {
            counts: [per_color; NUM_COLORS],
            total: per_color * NUM_COLORS as u8,
        }
    }

    /// Tiles of one color.
    #[must_use]
    pub fn count(&self, color: Color) -> u8 {
        self.counts[color.index()]
    }

    /// Total tiles across all colors.
    #[must_use]
    pub fn total(&self) -> u8 {
        self.total
    }

    /// True when no tiles remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Colors present, with their counts, in color order.
    pub fn colors(&self) -> impl Iterator<Item = (Color, u8)> + '_ {
        ALL_COLORS
            .into_iter()
            .filter_map(|c| match self.count(c) {
                0 => None,
                n => Some((c, n)),
            })
    }

    /// Add `n` tiles of `color`.
    pub fn add(&mut self, color: Color, n: u8) {
        self.counts[color.index()] += n;
        self.total += n;
    }

    /// Remove `n` tiles of `color`, failing instead of going negative.
    pub fn remove(&mut self, color: Color, n: u8) -> Result<(), StateError> {
        let slot = &mut self.counts[color.index()];
        if *slot < n {
            return Err(StateError::TileUnderflow { color });
        }
        *slot -= n;
        self.total -= n;
        Ok(())
    }

    /// Remove every tile of `color`, returning how many there were.
    ///
    /// Taking a color that is not present is an invariant violation: the
    /// rule engine checks availability before drafting.
    pub fn take_all(&mut self, color: Color) -> Result<u8, StateError> {
        let n = self.count(color);
        if n == 0 {
            return Err(StateError::TileUnderflow { color });
        }
        self.remove(color, n)?;
        Ok(n)
    }

    /// Move every tile into `other`, leaving this source empty.
    pub fn drain_into(&mut self, other: &mut TileSource) {
        for color in ALL_COLORS {
            let n = self.counts[color.index()];
            other.add(color, n);
        }
        self.counts = [0; NUM_COLORS];
        self.total = 0;
    }
}
