//! Batch production: search for room bounds, generate, validate, repeat
//! until the quota is met or the run-wide error ceiling is exceeded.

use log::warn;
use rand_chacha::ChaCha8Rng;

use crate::generator::LevelGenerator;
use crate::generator::rng::{random_inclusive, seeded};
use crate::invoker::{BoundedInvoker, Invocation};
use crate::record::MapRecord;
use crate::request::{GenerationRequest, RequestError};
use crate::search::RoomCountSearch;
use crate::settings::{Settings, SizeProfile};
use crate::tiles::render;
use crate::validate::validate;

const PROFILE_STREAM: u64 = 2;

/// Maps accepted by one production call plus how it ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production {
    pub records: Vec<MapRecord>,
    pub errors: u32,
    /// False when the error ceiling stopped the run before the quota was met.
    pub complete: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Acceptance {
    Accepted(String),
    /// The per-map attempt ceiling ran out without a valid map.
    Abandoned,
    /// The run-wide error ceiling was exceeded mid-loop.
    TooManyErrors,
}

/// Run-wide failure counter; exceeded once the count goes past the ceiling.
#[derive(Clone, Copy, Debug)]
struct ErrorBudget {
    count: u32,
    ceiling: u32,
}

impl ErrorBudget {
    fn new(ceiling: u32) -> Self {
        Self { count: 0, ceiling }
    }

    fn charge(&mut self, errors: u32) -> bool {
        self.count = self.count.saturating_add(errors);
        self.count > self.ceiling
    }

    /// Errors that can still be charged without exceeding the ceiling.
    fn remaining(&self) -> u32 {
        self.ceiling.saturating_sub(self.count)
    }
}

pub struct Orchestrator<G> {
    generator: G,
    invoker: BoundedInvoker,
    search: RoomCountSearch,
    accept_attempt_ceiling: u32,
    max_errors: u32,
    generator_retry: u32,
    rng: ChaCha8Rng,
}

impl<G: LevelGenerator> Orchestrator<G> {
    pub fn new(generator: G, settings: &Settings) -> Self {
        let limits = &settings.limits;
        Self {
            generator,
            invoker: BoundedInvoker::new(limits.invoke_failure_ceiling, settings.generator.special),
            search: RoomCountSearch::new(limits.search_attempts_per_step),
            accept_attempt_ceiling: limits.accept_attempt_ceiling,
            max_errors: limits.max_errors,
            generator_retry: settings.generator.retry,
            rng: seeded(settings.generator.seed, PROFILE_STREAM),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Produces `target_count` maps of side `map_size + 1` with exactly
    /// `room_count_ideal` rooms. Bounds are searched afresh for every map.
    pub fn produce(
        &mut self,
        map_size: usize,
        room_count_ideal: usize,
        target_count: usize,
    ) -> Result<Production, RequestError> {
        let mut budget = ErrorBudget::new(self.max_errors);
        let mut records = Vec::with_capacity(target_count);

        while records.len() < target_count {
            let outcome = self.search.with_exhausted_allowance(budget.remaining()).run(
                &mut self.generator,
                &self.invoker,
                map_size,
                room_count_ideal,
                self.generator_retry,
            )?;
            if budget.charge(outcome.exhausted) {
                return Ok(stopped_early(records, budget));
            }

            match self.accept(&outcome.request, &mut budget) {
                Acceptance::Accepted(map) => {
                    records.push(MapRecord::new(outcome.request, map, None));
                }
                Acceptance::Abandoned => {
                    if budget.charge(1) {
                        return Ok(stopped_early(records, budget));
                    }
                }
                Acceptance::TooManyErrors => return Ok(stopped_early(records, budget)),
            }
        }

        Ok(Production { records, errors: budget.count, complete: true })
    }

    /// Produces `target_count` maps for a size category. Each map draws its
    /// size from the profile's range and uses the profile's room bounds as is.
    pub fn produce_profile(
        &mut self,
        label: &str,
        profile: &SizeProfile,
        target_count: usize,
    ) -> Result<Production, RequestError> {
        let mut budget = ErrorBudget::new(self.max_errors);
        let mut records = Vec::with_capacity(target_count);

        while records.len() < target_count {
            let map_max = profile.map_max.max(profile.map_min);
            let map_size = random_inclusive(&mut self.rng, profile.map_min, map_max);
            let request = GenerationRequest::new(
                map_size,
                profile.room_min,
                profile.room_max,
                profile.room_ideal,
                profile.retry,
            )?;

            match self.accept(&request, &mut budget) {
                Acceptance::Accepted(map) => {
                    records.push(MapRecord::new(request, map, Some(label)));
                }
                Acceptance::Abandoned => {
                    if budget.charge(1) {
                        return Ok(stopped_early(records, budget));
                    }
                }
                Acceptance::TooManyErrors => return Ok(stopped_early(records, budget)),
            }
        }

        Ok(Production { records, errors: budget.count, complete: true })
    }

    /// Regenerates under fixed bounds until a map has the ideal room count and
    /// passes validation. The search is not rerun here.
    fn accept(&mut self, request: &GenerationRequest, budget: &mut ErrorBudget) -> Acceptance {
        for _ in 0..self.accept_attempt_ceiling {
            let level = match self.invoker.invoke(&mut self.generator, request) {
                Invocation::Generated(level) => level,
                Invocation::Exhausted { .. } => {
                    if budget.charge(1) {
                        return Acceptance::TooManyErrors;
                    }
                    continue;
                }
            };
            if level.room_count != request.room_count_ideal() {
                continue;
            }
            let map = render(&level.world);
            if validate(&map, request.map_size()) {
                return Acceptance::Accepted(map);
            }
        }

        warn!(
            "gave up on a map_size={} map with {} rooms after {} attempts",
            request.map_size(),
            request.room_count_ideal(),
            self.accept_attempt_ceiling
        );
        Acceptance::Abandoned
    }
}

fn stopped_early(records: Vec<MapRecord>, budget: ErrorBudget) -> Production {
    warn!(
        "too many errors ({} > {}), stopping with {} maps",
        budget.count,
        budget.ceiling,
        records.len()
    );
    Production { records, errors: budget.count, complete: false }
}
