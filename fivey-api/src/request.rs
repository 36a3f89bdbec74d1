use std::borrow::Cow;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use reqwest::Method;

/// How a request carries its payload.
pub enum RequestData<T> {
    Empty,
    Query(T),
    Json(T),
}

/// A typed call against the commerce backend.
///
/// Implementors name their path, verb and payload; [`crate::Client::send`]
/// owns transport, the error-decoding contract and response decoding.
pub trait Request {
    type Data: Serialize;
    type Response: DeserializeOwned;

    const METHOD: Method = Method::GET;

    fn endpoint(&self) -> Cow<'_, str>;

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Empty
    }
}

/// Response for endpoints whose body carries nothing we use.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResponse;

impl<'de> serde::Deserialize<'de> for EmptyResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(EmptyResponse)
    }
}
