use serde::{Deserialize, Serialize};

/// Read-only projection served on `/api/status`. Recomputed per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusSnapshot {
    pub request_per_second_target: u32,
    pub request_per_second_current: u32,
}
