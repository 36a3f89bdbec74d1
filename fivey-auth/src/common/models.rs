use serde::{Deserialize, Serialize};

/// Token pair persisted between runs.
///
/// The identity provider does not hand us an expiry we can trust, so
/// validity is probed against the profile endpoint instead of tracked
/// locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}
