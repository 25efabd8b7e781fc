//! Seeded room-and-corridor generator producing the canonical tile codes.

use rand_chacha::ChaCha8Rng;

use super::layout::{Cell, RoomRect, carve_corridors, carve_room, manhattan, place_rooms};
use super::rng::seeded;
use super::{GenerateError, Level, LevelGenerator, LevelParams};
use crate::tiles::{DOOR, ENTRANCE, EXIT, FLOOR, SPECIAL_DOOR, Tile, VOID, WALL};

const GENERATOR_STREAM: u64 = 1;

/// Deterministic for a given seed and sequence of calls; each call advances
/// the stream, so retries with identical parameters yield different levels.
pub struct RoguelikeGenerator {
    rng: ChaCha8Rng,
}

impl RoguelikeGenerator {
    pub fn new(seed: u64) -> Self {
        Self { rng: seeded(seed, GENERATOR_STREAM) }
    }
}

impl LevelGenerator for RoguelikeGenerator {
    fn generate(&mut self, params: &LevelParams) -> Result<Level, GenerateError> {
        params.check()?;

        let rooms = place_rooms(&mut self.rng, params);
        if rooms.is_empty() {
            return Err(GenerateError::NoRoomsPlaced { attempts: params.retry });
        }

        let width = params.width;
        let mut tiles = vec![VOID; width * params.height];
        for room in &rooms {
            carve_room(&mut tiles, width, room);
        }
        carve_corridors(&mut tiles, width, &mut self.rng, &rooms);
        mark_doors(&mut tiles, width, &rooms, DOOR);
        surround_with_walls(&mut tiles, width, params.height);

        let entrance = rooms[0].center();
        tiles[entrance.y * width + entrance.x] = ENTRANCE;
        if let Some((exit_room, exit)) = pick_exit(&rooms, entrance) {
            tiles[exit.y * width + exit.x] = EXIT;
            if params.special {
                mark_doors(&mut tiles, width, &rooms[exit_room..=exit_room], SPECIAL_DOOR);
            }
        }

        let world = tiles.chunks(width).map(<[Tile]>::to_vec).collect();
        Ok(Level { world, room_count: rooms.len() })
    }
}

/// Floor cells sitting on a room's wall ring are where corridors break through.
fn mark_doors(tiles: &mut [Tile], width: usize, rooms: &[RoomRect], door: Tile) {
    for room in rooms {
        for cell in room.walled().perimeter() {
            let tile = &mut tiles[cell.y * width + cell.x];
            if *tile == FLOOR || *tile == DOOR {
                *tile = door;
            }
        }
    }
}

fn surround_with_walls(tiles: &mut [Tile], width: usize, height: usize) {
    let is_open = |tile: Tile| tile != VOID && tile != WALL;
    for y in 0..height {
        for x in 0..width {
            if tiles[y * width + x] != VOID {
                continue;
            }
            let touches_open = (y.saturating_sub(1)..=(y + 1).min(height - 1)).any(|ny| {
                (x.saturating_sub(1)..=(x + 1).min(width - 1))
                    .any(|nx| is_open(tiles[ny * width + nx]))
            });
            if touches_open {
                tiles[y * width + x] = WALL;
            }
        }
    }
}

/// Exit goes in the room whose center is farthest from the entrance; a lone
/// room gets its exit in the corner opposite the entrance.
fn pick_exit(rooms: &[RoomRect], entrance: Cell) -> Option<(usize, Cell)> {
    let mut best: Option<(usize, usize, Cell)> = None;
    for (index, room) in rooms.iter().enumerate().skip(1) {
        let center = room.center();
        let distance = manhattan(entrance, center);
        if best.is_none_or(|(best_distance, _, best_cell)| {
            (distance, center) > (best_distance, best_cell)
        }) {
            best = Some((distance, index, center));
        }
    }
    if let Some((_, index, cell)) = best {
        return Some((index, cell));
    }

    let room = rooms[0];
    let corner = Cell { y: room.bottom(), x: room.right() };
    (corner != entrance).then_some((0, corner))
}
