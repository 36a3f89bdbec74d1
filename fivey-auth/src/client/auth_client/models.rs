use serde::Deserialize;

use crate::common::Credentials;

/// Payload returned by the token endpoint for both the refresh and the
/// authorization-code grants. Either token missing makes the whole
/// exchange unusable, so both fields are required at the decode layer.
#[derive(Debug, Deserialize)]
pub struct TokenEndpointResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenEndpointResponse> for Credentials {
    fn from(payload: TokenEndpointResponse) -> Self {
        Self {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
        }
    }
}
