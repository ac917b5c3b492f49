use serde::{Deserialize, Serialize};

/// One stored KiwiVM account: the provider's numeric VEID plus its API key,
/// keyed by an opaque id generated at creation time. Immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub veid: String,
    pub api_key: String,
}
