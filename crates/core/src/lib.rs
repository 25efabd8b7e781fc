pub mod generator;
pub mod invoker;
pub mod orchestrator;
pub mod record;
pub mod request;
pub mod search;
pub mod settings;
pub mod tiles;
pub mod validate;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use generator::{
    GenerateError, Level, LevelGenerator, LevelParams, RoguelikeGenerator, RoomParams,
};
pub use invoker::{BoundedInvoker, Invocation};
pub use orchestrator::{Orchestrator, Production};
pub use record::MapRecord;
pub use request::{GenerationRequest, RequestError};
pub use search::{RoomCountSearch, SearchOutcome};
pub use settings::{Settings, SettingsError, SizeProfile};
pub use tiles::render;
pub use validate::{check_map, validate};
pub use writer::{BatchWriter, WriteReport, partition};
