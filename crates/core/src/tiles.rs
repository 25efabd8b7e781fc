//! Canonical tile alphabet and tile-grid to text rendering.

/// Raw tile code as produced by a [`crate::LevelGenerator`].
pub type Tile = u8;

pub const VOID: Tile = 0;
pub const FLOOR: Tile = 1;
pub const WALL: Tile = 2;
pub const DOOR: Tile = 3;
pub const SPECIAL_DOOR: Tile = 4;
pub const ENTRANCE: Tile = 5;
pub const EXIT: Tile = 6;

pub const WALL_SYMBOL: char = '#';

/// Returns the alphabet character for a canonical tile, `None` for anything else.
pub fn tile_symbol(tile: Tile) -> Option<char> {
    match tile {
        VOID => Some(' '),
        FLOOR => Some('.'),
        WALL => Some(WALL_SYMBOL),
        DOOR => Some('/'),
        SPECIAL_DOOR => Some('X'),
        ENTRANCE => Some('<'),
        EXIT => Some('>'),
        _ => None,
    }
}

/// Renders a tile grid as newline-terminated rows.
///
/// Tiles outside the canonical alphabet are written as their decimal value;
/// rendering never fails.
pub fn render(world: &[Vec<Tile>]) -> String {
    let mut rendered = String::with_capacity(world.iter().map(|row| row.len() + 1).sum());
    for row in world {
        for &tile in row {
            match tile_symbol(tile) {
                Some(symbol) => rendered.push(symbol),
                None => rendered.push_str(&tile.to_string()),
            }
        }
        rendered.push('\n');
    }
    rendered
}
