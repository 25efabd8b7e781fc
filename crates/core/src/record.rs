//! Accepted map records as they appear in batch files.

use serde::Serialize;

use crate::request::GenerationRequest;

/// One accepted map. Only built by the batch loop after the map passed validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MapRecord {
    pub params: GenerationRequest,
    pub map: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl MapRecord {
    pub(crate) fn new(params: GenerationRequest, map: String, size: Option<&str>) -> Self {
        Self { params, map, size: size.map(str::to_owned) }
    }
}
