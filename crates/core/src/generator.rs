//! Generator capability consumed by the search and batch loops.
//!
//! A generator receives a [`LevelParams`] and either returns a tile grid with
//! the number of rooms it managed to place, or fails when the parameters are
//! infeasible. Callers never see a partial grid.

use std::error::Error;
use std::fmt;

use serde::Serialize;

use crate::tiles::Tile;

mod layout;
pub(crate) mod rng;
mod roguelike;

pub use rng::mix_seed_stream;
pub use roguelike::RoguelikeGenerator;

/// Largest grid, in tiles, a generator will allocate.
pub const MAX_GRID_TILES: usize = 1 << 24;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoomParams {
    pub ideal: usize,
    pub min_width: usize,
    pub max_width: usize,
    pub min_height: usize,
    pub max_height: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LevelParams {
    pub width: usize,
    pub height: usize,
    /// Placement attempts the generator may spend before giving up on more rooms.
    pub retry: u32,
    pub special: bool,
    pub room: RoomParams,
}

impl LevelParams {
    /// Rejects parameter sets that no generator could satisfy.
    pub fn check(&self) -> Result<(), GenerateError> {
        let room = &self.room;
        if self.width < 3 || self.height < 3 {
            return Err(GenerateError::invalid(format!(
                "grid {}x{} is too small to hold a walled room",
                self.width, self.height
            )));
        }
        match self.width.checked_mul(self.height) {
            Some(tiles) if tiles <= MAX_GRID_TILES => {}
            _ => {
                return Err(GenerateError::invalid(format!(
                    "grid {}x{} exceeds {MAX_GRID_TILES} tiles",
                    self.width, self.height
                )));
            }
        }
        if room.ideal == 0 {
            return Err(GenerateError::invalid("ideal room count must be positive"));
        }
        if room.min_width == 0 || room.min_height == 0 {
            return Err(GenerateError::invalid("room dimensions must be positive"));
        }
        if room.min_width > room.max_width || room.min_height > room.max_height {
            return Err(GenerateError::invalid(format!(
                "room bounds are inverted: width {}..={}, height {}..={}",
                room.min_width, room.max_width, room.min_height, room.max_height
            )));
        }
        if room.min_width > self.width - 2 || room.min_height > self.height - 2 {
            return Err(GenerateError::invalid(format!(
                "smallest room {}x{} does not fit a {}x{} grid",
                room.min_width, room.min_height, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A successfully generated grid. Rows are `height` long vectors of `width` tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub world: Vec<Vec<Tile>>,
    pub room_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateError {
    /// The parameters can never produce a level.
    InvalidParams { reason: String },
    /// Every placement attempt collided before a single room fit.
    NoRoomsPlaced { attempts: u32 },
}

impl GenerateError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams { reason: reason.into() }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid generation parameters: {reason}"),
            Self::NoRoomsPlaced { attempts } => {
                write!(f, "no room could be placed in {attempts} attempts")
            }
        }
    }
}

impl Error for GenerateError {}

pub trait LevelGenerator {
    fn generate(&mut self, params: &LevelParams) -> Result<Level, GenerateError>;
}

impl<G: LevelGenerator + ?Sized> LevelGenerator for &mut G {
    fn generate(&mut self, params: &LevelParams) -> Result<Level, GenerateError> {
        (**self).generate(params)
    }
}

impl<G: LevelGenerator + ?Sized> LevelGenerator for Box<G> {
    fn generate(&mut self, params: &LevelParams) -> Result<Level, GenerateError> {
        (**self).generate(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width: usize, min: usize, max: usize) -> LevelParams {
        LevelParams {
            width,
            height: width,
            retry: 10,
            special: false,
            room: RoomParams {
                ideal: 3,
                min_width: min,
                max_width: max,
                min_height: min,
                max_height: max,
            },
        }
    }

    #[test]
    fn accepts_bounds_that_fit_the_grid() {
        assert_eq!(params(11, 3, 6).check(), Ok(()));
    }

    #[test]
    fn rejects_inverted_room_bounds() {
        assert!(matches!(params(11, 5, 4).check(), Err(GenerateError::InvalidParams { .. })));
    }

    #[test]
    fn rejects_rooms_that_cannot_fit_with_walls() {
        assert!(matches!(params(6, 5, 5).check(), Err(GenerateError::InvalidParams { .. })));
        assert_eq!(params(7, 5, 5).check(), Ok(()));
    }

    #[test]
    fn oversized_maximum_is_allowed_when_minimum_fits() {
        assert_eq!(params(9, 3, 40).check(), Ok(()));
    }

    #[test]
    fn rejects_grids_too_large_to_allocate() {
        for width in [usize::MAX, usize::MAX / 2, 4097] {
            let result = params(width, 3, 6).check();
            assert!(matches!(result, Err(GenerateError::InvalidParams { .. })), "{width}");
        }
        assert_eq!(params(4096, 3, 6).check(), Ok(()));
    }

    #[test]
    fn huge_minimum_room_is_rejected_without_overflow() {
        assert!(matches!(
            params(11, usize::MAX, usize::MAX).check(),
            Err(GenerateError::InvalidParams { .. })
        ));
    }
}
