//! Compact text snapshots of a position, FEN-style.
//!
//! A snapshot is a single line of `/`-separated segments with `|`-separated
//! fields, built from the one-letter color alphabet (`B` blue, `Y` yellow,
//! `R` red, `K` black, `W` white; `-` empty, `F` the first-player marker):
//!
//! ```text
//! factories / center / [wall / pattern / floor]×N / scores / round / to-move
//! ```
//!
//! - `factories`: one field per display, tiles as letters in color order,
//!   `-` when empty (`BBRW|KK-` is malformed; empty displays are just `-`).
//! - `center`: leading `F` while the marker is unclaimed, then the pool's
//!   letters in color order; `-` when there is neither.
//! - `wall`: five rows of five cells, the placed color's letter or `-`.
//! - `pattern`: five lines at their natural widths (1..=5), staged letters
//!   left-packed (`RR-` is two reds on the three-line).
//! - `floor`: seven cells, tokens left-packed.
//! - `scores`: one integer per seat; then the round counter and the seat to
//!   move.
//!
//! Segment count is `5 + 3N`, which pins the player count: 11, 14 or 17.
//!
//! [`encode`] is canonical (letters in color order, floors as stored), so
//! [`decode`] followed by [`encode`] reproduces a canonical snapshot byte
//! for byte. Decoding rebuilds the full playable state from what is
//! visible: the draw bag is refilled with every tile not on display (the
//! bag/discard split, action history, RNG stream and round-starter
//! provenance are not part of a snapshot), and the phase is inferred from
//! the board (a complete wall row means the game is over; live tile
//! sources mean drafting; otherwise the round awaits dealing).
//!
//! Malformed or impossible text is rejected with a [`SnapshotError`];
//! there is no partial or best-effort decode.

use crate::board::{FloorTile, TileSource};
use crate::core::{
    wall_color, Color, PlayerId, SnapshotError, ALL_COLORS, BOARD_SIZE, FLOOR_CAPACITY,
    MAX_PLAYERS, MIN_PLAYERS, TILES_PER_COLOR,
};
use crate::state::{factory_count, GameState, Phase};

/// Serialize a state to its canonical snapshot string.
#[must_use]
pub fn encode(state: &GameState) -> String {
    let mut segments = Vec::with_capacity(5 + 3 * state.player_count());

    segments.push(
        state
            .factories()
            .iter()
            .map(source_letters)
            .collect::<Vec<_>>()
            .join("|"),
    );

    let mut center = String::new();
    if !state.first_player_taken() {
        center.push('F');
    }
    if !state.center().is_empty() {
        center.push_str(&source_letters(state.center()));
    }
    if center.is_empty() {
        center.push('-');
    }
    segments.push(center);

    for (_, board) in state.players().iter() {
        let wall = (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| {
                        if board.wall_occupied(row, col) {
                            wall_color(row, col).letter()
                        } else {
                            '-'
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("|");
        segments.push(wall);

        let pattern = (0..BOARD_SIZE)
            .map(|line| {
                let pl = board.line(line);
                (0..=line)
                    .map(|slot| match pl.color() {
                        Some(color) if (slot as u8) < pl.count() => color.letter(),
                        _ => '-',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("|");
        segments.push(pattern);

        let mut floor = String::with_capacity(FLOOR_CAPACITY);
        for token in board.floor() {
            floor.push(match token {
                FloorTile::Tile(color) => color.letter(),
                FloorTile::Marker => 'F',
            });
        }
        while floor.len() < FLOOR_CAPACITY {
            floor.push('-');
        }
        segments.push(floor);
    }

    segments.push(
        state
            .scores()
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join("|"),
    );
    segments.push(state.round().to_string());
    segments.push(state.current_player().index().to_string());

    segments.join("/")
}

/// Parse a snapshot string back into a playable state.
///
/// # Errors
///
/// Any structural defect (segment/field counts, stray characters, wall
/// letters off the fixed layout, mixed pattern lines) or impossible
/// configuration (more tiles of a color visible than exist, a missing or
/// doubled first-player marker, a to-move seat past the last player) is a
/// [`SnapshotError`].
pub fn decode(text: &str) -> Result<GameState, SnapshotError> {
    let segments: Vec<&str> = text.split('/').collect();
    if segments.len() < 5 || (segments.len() - 5) % 3 != 0 {
        return Err(SnapshotError::SegmentCount {
            found: segments.len(),
        });
    }
    let player_count = (segments.len() - 5) / 3;
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        return Err(SnapshotError::PlayerCount {
            found: player_count,
        });
    }

    let mut state = GameState::new(player_count, 0);
    state.bag = TileSource::new();

    // Factories.
    let factory_fields: Vec<&str> = segments[0].split('|').collect();
    let expected = factory_count(player_count);
    if factory_fields.len() != expected {
        return Err(SnapshotError::FieldCount {
            segment: "factories",
            expected,
            found: factory_fields.len(),
        });
    }
    for (i, field) in factory_fields.iter().enumerate() {
        state.factories[i] = parse_source(field)?;
    }

    // Center pool and marker availability.
    let mut marker_count = 0u32;
    let center_field = segments[1];
    if center_field != "-" {
        for (pos, ch) in center_field.chars().enumerate() {
            if ch == 'F' {
                if pos != 0 {
                    return Err(SnapshotError::InvalidColor { ch });
                }
                marker_count += 1;
            } else {
                let color = Color::from_letter(ch).ok_or(SnapshotError::InvalidColor { ch })?;
                add_parsed(&mut state.center, color)?;
            }
        }
    }
    let marker_in_center = marker_count > 0;
    state.first_player_taken = !marker_in_center;

    // Player boards.
    let mut marker_holder = None;
    for seat in 0..player_count {
        let player = PlayerId::new(seat as u8);
        let base = 2 + 3 * seat;
        decode_wall(segments[base], &mut state, player)?;
        decode_pattern(segments[base + 1], &mut state, player)?;
        marker_count += decode_floor(segments[base + 2], &mut state, player)?;
        if state.player(player).floor_has_marker() {
            marker_holder = Some(player);
        }
    }
    match marker_count {
        0 => return Err(SnapshotError::MissingMarker),
        1 => {}
        _ => return Err(SnapshotError::DuplicateMarker),
    }

    // Trailing integers.
    let scores: Vec<&str> = segments[segments.len() - 3].split('|').collect();
    if scores.len() != player_count {
        return Err(SnapshotError::FieldCount {
            segment: "scores",
            expected: player_count,
            found: scores.len(),
        });
    }
    for (seat, text) in scores.iter().enumerate() {
        let score = text
            .parse::<i32>()
            .map_err(|_| SnapshotError::InvalidInteger {
                field: "score",
                text: (*text).to_string(),
            })?;
        state
            .players
            .get_mut(PlayerId::new(seat as u8))
            .restore_score(score);
    }

    let round_text = segments[segments.len() - 2];
    state.round = round_text
        .parse::<u32>()
        .map_err(|_| SnapshotError::InvalidInteger {
            field: "round",
            text: round_text.to_string(),
        })?;

    let player_text = segments[segments.len() - 1];
    let to_move = player_text
        .parse::<usize>()
        .map_err(|_| SnapshotError::InvalidInteger {
            field: "current player",
            text: player_text.to_string(),
        })?;
    if to_move >= player_count {
        return Err(SnapshotError::PlayerOutOfRange {
            found: to_move,
            player_count,
        });
    }
    state.current_player = PlayerId::new(to_move as u8);

    // Refill the bag with every tile not on display. The snapshot does not
    // distinguish bag from discard, so all unseen tiles return to the bag.
    for color in ALL_COLORS {
        let on_sources: u32 = state
            .factories
            .iter()
            .map(|f| u32::from(f.count(color)))
            .sum::<u32>()
            + u32::from(state.center.count(color));
        let on_boards: u32 = state
            .players
            .iter()
            .map(|(_, b)| b.visible_tiles(color))
            .sum();
        let visible = on_sources + on_boards;
        if visible > u32::from(TILES_PER_COLOR) {
            return Err(SnapshotError::TileOverflow {
                color,
                count: visible,
            });
        }
        state.bag.add(color, TILES_PER_COLOR - visible as u8);
    }

    // Turn bookkeeping the snapshot pins down.
    state.first_player_next_round = marker_holder.unwrap_or(state.current_player);
    state.first_player_this_round = state.current_player;

    state.phase = if state.players.iter().any(|(_, b)| b.has_complete_row()) {
        Phase::GameOver
    } else if state.sources_have_tiles() {
        Phase::Drafting
    } else {
        Phase::RoundPending
    };

    Ok(state)
}

/// Whether `text` parses as a well-formed snapshot.
#[must_use]
pub fn validate(text: &str) -> bool {
    decode(text).is_ok()
}

fn source_letters(source: &TileSource) -> String {
    if source.is_empty() {
        return "-".to_string();
    }
    let mut letters = String::with_capacity(source.total() as usize);
    for (color, count) in source.colors() {
        for _ in 0..count {
            letters.push(color.letter());
        }
    }
    letters
}

fn parse_source(field: &str) -> Result<TileSource, SnapshotError> {
    let mut source = TileSource::new();
    if field == "-" {
        return Ok(source);
    }
    for ch in field.chars() {
        let color = Color::from_letter(ch).ok_or(SnapshotError::InvalidColor { ch })?;
        add_parsed(&mut source, color)?;
    }
    Ok(source)
}

// Counters are `u8`; bounding each color at its real tile count keeps
// hostile input from wrapping them and rejects the field early.
fn add_parsed(source: &mut TileSource, color: Color) -> Result<(), SnapshotError> {
    if source.count(color) >= TILES_PER_COLOR {
        return Err(SnapshotError::TileOverflow {
            color,
            count: u32::from(TILES_PER_COLOR) + 1,
        });
    }
    source.add(color, 1);
    Ok(())
}

fn decode_wall(
    segment: &str,
    state: &mut GameState,
    player: PlayerId,
) -> Result<(), SnapshotError> {
    let rows: Vec<&str> = segment.split('|').collect();
    if rows.len() != BOARD_SIZE {
        return Err(SnapshotError::FieldCount {
            segment: "wall",
            expected: BOARD_SIZE,
            found: rows.len(),
        });
    }
    for (row, text) in rows.iter().enumerate() {
        if text.chars().count() != BOARD_SIZE {
            return Err(SnapshotError::FieldLength {
                segment: "wall",
                expected: BOARD_SIZE,
                found: text.chars().count(),
            });
        }
        for (col, ch) in text.chars().enumerate() {
            if ch == '-' {
                continue;
            }
            let color = Color::from_letter(ch).ok_or(SnapshotError::InvalidColor { ch })?;
            if color != wall_color(row, col) {
                return Err(SnapshotError::WallColorMismatch { row, col, ch });
            }
            state.players.get_mut(player).restore_wall_cell(row, col);
        }
    }
    Ok(())
}

fn decode_pattern(
    segment: &str,
    state: &mut GameState,
    player: PlayerId,
) -> Result<(), SnapshotError> {
    let lines: Vec<&str> = segment.split('|').collect();
    if lines.len() != BOARD_SIZE {
        return Err(SnapshotError::FieldCount {
            segment: "pattern",
            expected: BOARD_SIZE,
            found: lines.len(),
        });
    }
    for (line, text) in lines.iter().enumerate() {
        let capacity = line + 1;
        if text.chars().count() != capacity {
            return Err(SnapshotError::FieldLength {
                segment: "pattern",
                expected: capacity,
                found: text.chars().count(),
            });
        }
        let mut color = None;
        let mut count = 0u8;
        let mut closed = false;
        for ch in text.chars() {
            if ch == '-' {
                closed = true;
                continue;
            }
            let tile = Color::from_letter(ch).ok_or(SnapshotError::InvalidColor { ch })?;
            // Left-packed and single-colored, or the line is malformed.
            if closed || color.is_some_and(|c| c != tile) {
                return Err(SnapshotError::MixedLineColors { line });
            }
            color = Some(tile);
            count += 1;
        }
        if let Some(color) = color {
            // The wall for this player is already decoded; a staged color
            // whose wall cell in this row is filled could never be placed.
            if state.player(player).wall_has_color(line, color) {
                return Err(SnapshotError::LineColorOnWall { line, color });
            }
            state.players.get_mut(player).restore_line(line, color, count);
        }
    }
    Ok(())
}

/// Returns how many first-player markers sat on this floor.
fn decode_floor(
    segment: &str,
    state: &mut GameState,
    player: PlayerId,
) -> Result<u32, SnapshotError> {
    if segment.chars().count() != FLOOR_CAPACITY {
        return Err(SnapshotError::FieldLength {
            segment: "floor",
            expected: FLOOR_CAPACITY,
            found: segment.chars().count(),
        });
    }
    let mut markers = 0u32;
    for ch in segment.chars() {
        let token = match ch {
            '-' => continue,
            'F' => {
                markers += 1;
                FloorTile::Marker
            }
            _ => FloorTile::Tile(Color::from_letter(ch).ok_or(SnapshotError::InvalidColor { ch })?),
        };
        state.players.get_mut(player).push_floor(token);
    }
    Ok(markers)
}
