//! Validated generation request issued to the bounded invoker.

use std::error::Error;
use std::fmt;

use serde::Serialize;

use crate::generator::{LevelParams, MAX_GRID_TILES, RoomParams};

/// Square map request. The produced grid has `map_size + 1` tiles per side.
///
/// Constructed only through [`GenerationRequest::new`], so
/// `1 <= room_size_min <= room_size_max` holds and the grid fits in
/// [`MAX_GRID_TILES`] for every request that reaches a generator. Narrowing
/// the bounds builds a new request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    map_size: usize,
    room_size_min: usize,
    room_size_max: usize,
    room_count_ideal: usize,
    retry_budget: u32,
}

impl GenerationRequest {
    pub fn new(
        map_size: usize,
        room_size_min: usize,
        room_size_max: usize,
        room_count_ideal: usize,
        retry_budget: u32,
    ) -> Result<Self, RequestError> {
        if map_size == 0 {
            return Err(RequestError::ZeroMapSize);
        }
        match map_size.checked_add(1).and_then(|side| side.checked_mul(side)) {
            Some(tiles) if tiles <= MAX_GRID_TILES => {}
            _ => return Err(RequestError::MapTooLarge { map_size }),
        }
        if room_size_min == 0 {
            return Err(RequestError::ZeroRoomSize);
        }
        if room_size_min > room_size_max {
            return Err(RequestError::InvertedRoomBounds { min: room_size_min, max: room_size_max });
        }
        if room_count_ideal == 0 {
            return Err(RequestError::ZeroRoomCount);
        }
        if retry_budget == 0 {
            return Err(RequestError::ZeroRetryBudget);
        }
        Ok(Self { map_size, room_size_min, room_size_max, room_count_ideal, retry_budget })
    }

    pub fn with_room_size_max(&self, room_size_max: usize) -> Result<Self, RequestError> {
        Self::new(
            self.map_size,
            self.room_size_min,
            room_size_max,
            self.room_count_ideal,
            self.retry_budget,
        )
    }

    pub fn map_size(&self) -> usize {
        self.map_size
    }

    pub fn side(&self) -> usize {
        self.map_size + 1
    }

    pub fn room_size_min(&self) -> usize {
        self.room_size_min
    }

    pub fn room_size_max(&self) -> usize {
        self.room_size_max
    }

    pub fn room_count_ideal(&self) -> usize {
        self.room_count_ideal
    }

    pub fn retry_budget(&self) -> u32 {
        self.retry_budget
    }

    /// Generator parameters for this request; rooms use the same bounds on both axes.
    pub fn level_params(&self, special: bool) -> LevelParams {
        LevelParams {
            width: self.side(),
            height: self.side(),
            retry: self.retry_budget,
            special,
            room: RoomParams {
                ideal: self.room_count_ideal,
                min_width: self.room_size_min,
                max_width: self.room_size_max,
                min_height: self.room_size_min,
                max_height: self.room_size_max,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestError {
    ZeroMapSize,
    MapTooLarge { map_size: usize },
    ZeroRoomSize,
    InvertedRoomBounds { min: usize, max: usize },
    ZeroRoomCount,
    ZeroRetryBudget,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMapSize => write!(f, "map size must be positive"),
            Self::MapTooLarge { map_size } => {
                write!(f, "map size {map_size} exceeds the {MAX_GRID_TILES} tile grid limit")
            }
            Self::ZeroRoomSize => write!(f, "minimum room size must be positive"),
            Self::InvertedRoomBounds { min, max } => {
                write!(f, "minimum room size {min} exceeds maximum {max}")
            }
            Self::ZeroRoomCount => write!(f, "ideal room count must be positive"),
            Self::ZeroRetryBudget => write!(f, "retry budget must be positive"),
        }
    }
}

impl Error for RequestError {}
