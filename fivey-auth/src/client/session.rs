use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use uuid::Uuid;

const PACKAGE_NAME: &str = "ru.pyaterochka.app.browser";
const PLATFORM: &str = "android";
const APP_VERSION: &str = "3.2.2";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0";

/// Process-lifetime authenticated state: the current access token plus the
/// header set derived from it. Created only through a validated
/// `set_token`; the device id is regenerated on every transition.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: String,
    device_id: String,
}

impl Session {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            device_id: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Header set for the commerce backend: bearer token, per-session
    /// device id and the fixed client identification headers.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-authorization"),
            bearer(&self.access_token),
        );
        headers.insert(
            HeaderName::from_static("x-device-id"),
            HeaderValue::from_str(&self.device_id).expect("device id is ASCII"),
        );
        headers.insert(
            HeaderName::from_static("x-package-name"),
            HeaderValue::from_static(PACKAGE_NAME),
        );
        headers.insert(
            HeaderName::from_static("x-platform"),
            HeaderValue::from_static(PLATFORM),
        );
        headers.insert(
            HeaderName::from_static("x-app-version"),
            HeaderValue::from_static(APP_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers
    }
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("token is ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_carry_the_bearer_token_and_device_id() {
        let session = Session::new("tok".to_string());
        let headers = session.headers();
        assert_eq!(headers["x-authorization"], "Bearer tok");
        assert_eq!(headers["x-device-id"], session.device_id());
        assert_eq!(headers["x-package-name"], PACKAGE_NAME);
        assert_eq!(headers["x-platform"], "android");
    }

    #[test]
    fn device_id_is_fresh_per_session() {
        let a = Session::new("tok".to_string());
        let b = Session::new("tok".to_string());
        assert_ne!(a.device_id(), b.device_id());
        assert_eq!(a.device_id().len(), 32);
        assert!(a.device_id().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
