use serde::{Deserialize, Serialize};

/// Request payload for `/api/respond`.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    /// Framed answer, or a user-facing explanation of why there is none.
    pub answer: String,
}
