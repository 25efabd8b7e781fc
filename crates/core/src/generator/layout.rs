//! Room rectangles, placement, and corridor carving on a flat tile buffer.

use rand_chacha::ChaCha8Rng;

use super::rng::{coin_flip, random_inclusive};
use super::{LevelParams, RoomParams};
use crate::tiles::{FLOOR, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(super) struct Cell {
    pub(super) y: usize,
    pub(super) x: usize,
}

/// Room interior; its one-tile wall ring sits just outside these bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct RoomRect {
    pub(super) x: usize,
    pub(super) y: usize,
    pub(super) width: usize,
    pub(super) height: usize,
}

impl RoomRect {
    pub(super) fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub(super) fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub(super) fn center(self) -> Cell {
        Cell { y: self.y + self.height / 2, x: self.x + self.width / 2 }
    }

    /// Interior plus wall ring. Placement keeps `x, y >= 1`, so this never underflows.
    pub(super) fn walled(self) -> Self {
        Self { x: self.x - 1, y: self.y - 1, width: self.width + 2, height: self.height + 2 }
    }

    pub(super) fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Cells of the rectangle's outermost ring.
    pub(super) fn perimeter(self) -> impl Iterator<Item = Cell> {
        let (left, right, top, bottom) = (self.x, self.right(), self.y, self.bottom());
        (top..=bottom).flat_map(move |y| {
            (left..=right)
                .filter(move |&x| y == top || y == bottom || x == left || x == right)
                .map(move |x| Cell { y, x })
        })
    }
}

pub(super) fn manhattan(a: Cell, b: Cell) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Places up to `room.ideal` rooms whose wall rings never overlap.
///
/// The first two attempts go into a randomly chosen pair of opposite corners
/// so the walls of a multi-room level reach every map edge; later attempts are
/// uniform. Sampled sizes are clamped to what the grid can hold, so an
/// oversized maximum only narrows the draw instead of wasting attempts.
pub(super) fn place_rooms(rng: &mut ChaCha8Rng, params: &LevelParams) -> Vec<RoomRect> {
    let RoomParams { ideal, min_width, max_width, min_height, max_height } = params.room;
    let max_width = max_width.min(params.width - 2);
    let max_height = max_height.min(params.height - 2);
    let corners = if coin_flip(rng) {
        [Corner::TopLeft, Corner::BottomRight]
    } else {
        [Corner::TopRight, Corner::BottomLeft]
    };

    let mut rooms: Vec<RoomRect> = Vec::new();
    for attempt in 0..params.retry {
        if rooms.len() >= ideal {
            break;
        }
        let width = random_inclusive(rng, min_width, max_width);
        let height = random_inclusive(rng, min_height, max_height);
        let far_x = params.width - width - 1;
        let far_y = params.height - height - 1;
        let (x, y) = match corners.get(attempt as usize) {
            Some(Corner::TopLeft) => (1, 1),
            Some(Corner::TopRight) => (far_x, 1),
            Some(Corner::BottomLeft) => (1, far_y),
            Some(Corner::BottomRight) => (far_x, far_y),
            None => (random_inclusive(rng, 1, far_x), random_inclusive(rng, 1, far_y)),
        };

        let candidate = RoomRect { x, y, width, height };
        let candidate_walls = candidate.walled();
        if rooms.iter().any(|room| room.walled().intersects(&candidate_walls)) {
            continue;
        }
        rooms.push(candidate);
    }

    rooms.sort_by_key(|room| {
        let center = room.center();
        (center.y, center.x, room.height, room.width)
    });
    rooms
}

#[derive(Clone, Copy, Debug)]
enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

pub(super) fn carve_room(tiles: &mut [Tile], width: usize, room: &RoomRect) {
    for y in room.y..=room.bottom() {
        for x in room.x..=room.right() {
            tiles[y * width + x] = FLOOR;
        }
    }
}

/// Joins all rooms into one tree, always linking the closest pending room to
/// the connected set.
pub(super) fn carve_corridors(
    tiles: &mut [Tile],
    width: usize,
    rng: &mut ChaCha8Rng,
    rooms: &[RoomRect],
) {
    if rooms.len() < 2 {
        return;
    }

    let mut connected = vec![0_usize];
    let mut pending: Vec<usize> = (1..rooms.len()).collect();

    while !pending.is_empty() {
        let mut best: Option<(usize, usize, usize)> = None;
        for &connected_index in &connected {
            let from = rooms[connected_index].center();
            for &pending_index in &pending {
                let distance = manhattan(from, rooms[pending_index].center());
                let candidate = (distance, connected_index, pending_index);
                if best.is_none_or(|current| candidate < current) {
                    best = Some(candidate);
                }
            }
        }

        let Some((_, connected_index, pending_index)) = best else {
            break;
        };
        let start = rooms[connected_index].center();
        let end = rooms[pending_index].center();
        if coin_flip(rng) {
            carve_horizontal(tiles, width, start.y, start.x, end.x);
            carve_vertical(tiles, width, end.x, start.y, end.y);
        } else {
            carve_vertical(tiles, width, start.x, start.y, end.y);
            carve_horizontal(tiles, width, end.y, start.x, end.x);
        }

        connected.push(pending_index);
        pending.retain(|&index| index != pending_index);
    }
}

fn carve_horizontal(tiles: &mut [Tile], width: usize, y: usize, from_x: usize, to_x: usize) {
    for x in from_x.min(to_x)..=from_x.max(to_x) {
        tiles[y * width + x] = FLOOR;
    }
}

fn carve_vertical(tiles: &mut [Tile], width: usize, x: usize, from_y: usize, to_y: usize) {
    for y in from_y.min(to_y)..=from_y.max(to_y) {
        tiles[y * width + x] = FLOOR;
    }
}
