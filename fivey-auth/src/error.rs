use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Token storage error: {0}")]
    TokenStorage(String),

    #[error("Identity provider rejected the request with status {0}")]
    TokenEndpoint(reqwest::StatusCode),

    #[error("Login flow error: {0}")]
    LoginFlow(#[from] LoginFlowError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication was not completed")]
    NotAuthenticated,
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}

/// A step of the interactive login produced HTML, headers or query
/// parameters we did not expect. The flow has no retry; the caller decides
/// whether to run it again.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoginFlowError {
    #[error("login form action not found in identity provider page")]
    FormActionNotFound,

    #[error("identity provider response carried no redirect Location")]
    MissingRedirect,

    #[error("redirect target could not be parsed as a URL")]
    MalformedRedirect,

    #[error("redirect target carried no authorization code")]
    MissingAuthorizationCode,
}
