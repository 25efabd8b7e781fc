//! Bounded retries around a single generator request.

use log::warn;

use crate::generator::{Level, LevelGenerator};
use crate::request::GenerationRequest;

pub const DEFAULT_FAILURE_CEILING: u32 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    Generated(Level),
    /// Every attempt failed; the generator errors are logged, not returned.
    Exhausted { failures: u32 },
}

/// Re-issues the same request until the generator succeeds or more than
/// `failure_ceiling` failures have accumulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundedInvoker {
    failure_ceiling: u32,
    special: bool,
}

impl Default for BoundedInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_CEILING, false)
    }
}

impl BoundedInvoker {
    pub fn new(failure_ceiling: u32, special: bool) -> Self {
        Self { failure_ceiling, special }
    }

    pub fn failure_ceiling(&self) -> u32 {
        self.failure_ceiling
    }

    pub fn invoke<G: LevelGenerator + ?Sized>(
        &self,
        generator: &mut G,
        request: &GenerationRequest,
    ) -> Invocation {
        let params = request.level_params(self.special);
        let mut failures = 0_u32;
        loop {
            match generator.generate(&params) {
                Ok(level) => return Invocation::Generated(level),
                Err(error) => {
                    failures += 1;
                    if failures > self.failure_ceiling {
                        warn!(
                            "too many errors while creating maps: {failures} failures for \
                             map_size={} rooms={}..={}, last error: {error}",
                            request.map_size(),
                            request.room_size_min(),
                            request.room_size_max()
                        );
                        return Invocation::Exhausted { failures };
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        FailingGenerator, FixedGenerator, ScriptedGenerator, bordered_world, infeasible,
    };

    fn request() -> GenerationRequest {
        GenerationRequest::new(10, 3, 6, 5, 100).unwrap()
    }

    #[test]
    fn first_success_is_returned_immediately() {
        let mut generator = FixedGenerator::new(4);
        let outcome = BoundedInvoker::default().invoke(&mut generator, &request());
        assert!(matches!(outcome, Invocation::Generated(level) if level.room_count == 4));
        assert_eq!(generator.calls, 1);
    }

    #[test]
    fn passes_square_bounds_and_internal_retry_to_the_generator() {
        let mut generator = FixedGenerator::new(4);
        BoundedInvoker::new(10, true).invoke(&mut generator, &request());
        let params = &generator.seen[0];
        assert_eq!((params.width, params.height), (11, 11));
        assert_eq!(params.retry, 100);
        assert!(params.special);
        assert_eq!(params.room.ideal, 5);
    }

    #[test]
    fn exhausts_after_the_failure_ceiling_is_exceeded() {
        let mut generator = FailingGenerator::default();
        let outcome = BoundedInvoker::default().invoke(&mut generator, &request());
        assert_eq!(outcome, Invocation::Exhausted { failures: 11 });
        assert_eq!(generator.calls, 11);
    }

    #[test]
    fn recovers_when_a_retry_succeeds_within_the_ceiling() {
        let level = Level { world: bordered_world(11), room_count: 2 };
        let mut generator = ScriptedGenerator::new([infeasible(), infeasible(), Ok(level)]);
        let outcome = BoundedInvoker::new(2, false).invoke(&mut generator, &request());
        assert!(matches!(outcome, Invocation::Generated(level) if level.room_count == 2));
        assert_eq!(generator.calls, 3);
    }

    #[test]
    fn zero_ceiling_gives_up_after_one_failure() {
        let mut generator = FailingGenerator::default();
        let outcome = BoundedInvoker::new(0, false).invoke(&mut generator, &request());
        assert_eq!(outcome, Invocation::Exhausted { failures: 1 });
    }
}
