//! Scripted generators shared by the search, invoker, and batch test suites.
//! Nothing here is used outside `#[cfg(test)]`.

use std::collections::VecDeque;

use crate::generator::{GenerateError, Level, LevelGenerator, LevelParams};
use crate::tiles::{FLOOR, Tile, WALL};

/// Grid of `side x side` with walls on the whole border and floor inside.
pub(crate) fn bordered_world(side: usize) -> Vec<Vec<Tile>> {
    (0..side)
        .map(|y| {
            (0..side)
                .map(|x| {
                    if y == 0 || x == 0 || y == side - 1 || x == side - 1 { WALL } else { FLOOR }
                })
                .collect()
        })
        .collect()
}

/// Fails every call.
#[derive(Default)]
pub(crate) struct FailingGenerator {
    pub(crate) calls: usize,
}

impl LevelGenerator for FailingGenerator {
    fn generate(&mut self, params: &LevelParams) -> Result<Level, GenerateError> {
        self.calls += 1;
        Err(GenerateError::NoRoomsPlaced { attempts: params.retry })
    }
}

/// Returns a walled grid of the requested size with a fixed room count.
pub(crate) struct FixedGenerator {
    pub(crate) room_count: usize,
    pub(crate) calls: usize,
    pub(crate) seen: Vec<LevelParams>,
}

impl FixedGenerator {
    pub(crate) fn new(room_count: usize) -> Self {
        Self { room_count, calls: 0, seen: Vec::new() }
    }
}

impl LevelGenerator for FixedGenerator {
    fn generate(&mut self, params: &LevelParams) -> Result<Level, GenerateError> {
        self.calls += 1;
        self.seen.push(params.clone());
        Ok(Level { world: bordered_world(params.width), room_count: self.room_count })
    }
}

/// Reports room counts from a function of the maximum room width, on a walled grid.
pub(crate) struct RoomCountByMaxWidth<F> {
    pub(crate) count_for: F,
    pub(crate) seen: Vec<LevelParams>,
}

impl<F: Fn(usize) -> usize> RoomCountByMaxWidth<F> {
    pub(crate) fn new(count_for: F) -> Self {
        Self { count_for, seen: Vec::new() }
    }
}

impl<F: Fn(usize) -> usize> LevelGenerator for RoomCountByMaxWidth<F> {
    fn generate(&mut self, params: &LevelParams) -> Result<Level, GenerateError> {
        self.seen.push(params.clone());
        let room_count = (self.count_for)(params.room.max_width);
        Ok(Level { world: bordered_world(params.width), room_count })
    }
}

/// Plays back queued outcomes, then fails once the script runs dry.
#[derive(Default)]
pub(crate) struct ScriptedGenerator {
    pub(crate) script: VecDeque<Result<Level, GenerateError>>,
    pub(crate) calls: usize,
}

impl ScriptedGenerator {
    pub(crate) fn new(script: impl IntoIterator<Item = Result<Level, GenerateError>>) -> Self {
        Self { script: script.into_iter().collect(), calls: 0 }
    }
}

impl LevelGenerator for ScriptedGenerator {
    fn generate(&mut self, params: &LevelParams) -> Result<Level, GenerateError> {
        self.calls += 1;
        self.script
            .pop_front()
            .unwrap_or(Err(GenerateError::NoRoomsPlaced { attempts: params.retry }))
    }
}

pub(crate) fn infeasible() -> Result<Level, GenerateError> {
    Err(GenerateError::NoRoomsPlaced { attempts: 100 })
}
