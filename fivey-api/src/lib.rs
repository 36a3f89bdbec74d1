pub mod endpoints;
mod error;
mod macros;
pub mod repositories;
mod request;

use std::time::Duration;

use fivey_auth::Session;

pub use crate::error::{ApiError, ApiErrorEntry, DecodeError};
pub use crate::repositories::Api;
pub use crate::request::{EmptyResponse, Method, Request, RequestData};

const BASE_URL: &str = "https://5d.5ka.ru/api";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP session bound to an authenticated [`Session`]'s header set and
/// the commerce base URL.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(session: &Session) -> Self {
        Self::with_base_url(session, BASE_URL)
    }

    pub fn with_base_url(session: &Session, base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .default_headers(session.headers())
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Execute a typed request. Transport failures surface as
    /// [`ApiError::Transport`]; every non-2xx response is decoded into
    /// structured entries per the backend's `detail` contract; a 2xx body
    /// that does not fit `R::Response` is a decode error, never a default
    /// value.
    pub async fn send<R>(&self, request: R) -> Result<R::Response, ApiError>
    where
        R: Request,
    {
        let url = format!("{}{}", self.base_url, request.endpoint());
        let mut builder = self.http.request(R::METHOD, url.as_str());
        match request.data() {
            RequestData::Empty => {}
            RequestData::Query(query) => builder = builder.query(query),
            RequestData::Json(body) => builder = builder.json(body),
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, url, "request rejected");
            return Err(ApiError::Api {
                status: status.as_u16(),
                errors: error::decode_error_body(status.as_u16(), &text),
            });
        }

        let body = if text.is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}
