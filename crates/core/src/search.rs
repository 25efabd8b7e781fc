//! Descent over the maximum room size until the generator yields the wanted room count.
//!
//! Room count is not a generator input; it emerges from room bounds versus map
//! size. Larger rooms crowd each other out, so shrinking the maximum room size
//! raises the count and a monotone walk downward is enough.

use log::debug;

use crate::generator::LevelGenerator;
use crate::invoker::{BoundedInvoker, Invocation};
use crate::request::{GenerationRequest, RequestError};

/// Smallest room side the descent ever tries. Also the fixed minimum.
pub const ROOM_SIZE_FLOOR: usize = 3;
pub const DEFAULT_ATTEMPTS_PER_STEP: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Bounds to generate with. When `matched` is false these are the floor
    /// bounds and room count still has to be checked per generation.
    pub request: GenerationRequest,
    pub matched: bool,
    /// Number of times the maximum was decremented, including the step that hit the floor.
    pub steps: usize,
    /// Invocations that exhausted their retries during the descent.
    pub exhausted: u32,
    /// The descent stopped early because `exhausted` went past the allowance.
    pub gave_up: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomCountSearch {
    attempts_per_step: u32,
    exhausted_allowance: u32,
}

impl Default for RoomCountSearch {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS_PER_STEP)
    }
}

impl RoomCountSearch {
    pub fn new(attempts_per_step: u32) -> Self {
        Self { attempts_per_step, exhausted_allowance: u32::MAX }
    }

    /// Copy of this search that abandons the descent once more than
    /// `allowance` invocations have exhausted.
    pub fn with_exhausted_allowance(self, allowance: u32) -> Self {
        Self { exhausted_allowance: allowance, ..self }
    }

    /// Starts at `map_size - 4` and decrements before every step. Reaching
    /// [`ROOM_SIZE_FLOOR`] ends the descent without trying the floor itself.
    pub fn run<G: LevelGenerator + ?Sized>(
        &self,
        generator: &mut G,
        invoker: &BoundedInvoker,
        map_size: usize,
        room_count_ideal: usize,
        retry_budget: u32,
    ) -> Result<SearchOutcome, RequestError> {
        let floor_request = GenerationRequest::new(
            map_size,
            ROOM_SIZE_FLOOR,
            ROOM_SIZE_FLOOR,
            room_count_ideal,
            retry_budget,
        )?;

        let mut room_size_max = map_size.saturating_sub(4);
        let mut steps = 0;
        let mut exhausted = 0;
        loop {
            room_size_max = room_size_max.saturating_sub(1);
            steps += 1;
            if room_size_max <= ROOM_SIZE_FLOOR {
                debug!(
                    "room search for map_size={map_size} reached the floor after {steps} steps \
                     without {room_count_ideal} rooms"
                );
                return Ok(SearchOutcome {
                    request: floor_request,
                    matched: false,
                    steps,
                    exhausted,
                    gave_up: false,
                });
            }

            let request = floor_request.with_room_size_max(room_size_max)?;
            for _ in 0..self.attempts_per_step {
                match invoker.invoke(generator, &request) {
                    Invocation::Generated(level) if level.room_count == room_count_ideal => {
                        debug!(
                            "room search for map_size={map_size} matched {room_count_ideal} rooms \
                             with max room size {room_size_max}"
                        );
                        return Ok(SearchOutcome {
                            request,
                            matched: true,
                            steps,
                            exhausted,
                            gave_up: false,
                        });
                    }
                    Invocation::Generated(_) => {}
                    Invocation::Exhausted { .. } => {
                        exhausted += 1;
                        if exhausted > self.exhausted_allowance {
                            debug!(
                                "room search for map_size={map_size} gave up after {exhausted} \
                                 exhausted invocations"
                            );
                            return Ok(SearchOutcome {
                                request: floor_request,
                                matched: false,
                                steps,
                                exhausted,
                                gave_up: true,
                            });
                        }
                    }
                }
            }
        }
    }
}
