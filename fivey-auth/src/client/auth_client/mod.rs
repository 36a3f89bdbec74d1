mod models;

use std::sync::Arc;
use std::time::Duration;

use models::TokenEndpointResponse;
use reqwest::cookie::Jar;
use reqwest::header::{AUTHORIZATION, LOCATION};
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use super::config::Settings;
use super::login_form;
use super::pkce::PkceSession;
use super::session::Session;
use super::token_store::TokenStore;
use crate::common::Credentials;
use crate::error::{AuthError, LoginFlowError};

const CLIENT_ID: &str = "tc5_mob";
const REDIRECT_URI: &str = "ru.pyaterochka.app.browser://oauth2redirect";
const SCOPE: &str = "profile offline_access";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns the access/refresh token state for the process.
///
/// Three observable states: unauthenticated (`session()` is `None`),
/// authenticated (a validated [`Session`]), and refresh-failed
/// (`restore_from_store` came back `false` with the stale file left in
/// place). Every transition into the authenticated state goes through
/// [`set_token`](AuthClient::set_token).
pub struct AuthClient {
    http: Client,
    cookies: Arc<Jar>,
    settings: Settings,
    store: TokenStore,
    session: Option<Session>,
}

impl AuthClient {
    pub fn new(settings: Settings) -> Result<Self, AuthError> {
        let store = match settings.token_path.clone() {
            Some(path) => TokenStore::at(path),
            None => TokenStore::new()?,
        };

        // One cookie jar for the whole login flow: the provider threads
        // its session cookies through every login-actions step. Redirects
        // stay suppressed so the final Location can be read off directly.
        let cookies = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(cookies.clone())
            .redirect(Policy::none())
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            cookies,
            settings,
            store,
            session: None,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn into_session(self) -> Option<Session> {
        self.session
    }

    /// Probe the profile endpoint with a bearer token. True iff the
    /// response is success-class. No state is touched.
    pub async fn check_auth(&self, token: &str) -> Result<bool, AuthError> {
        let url = format!("{}/profile/v1/user", self.settings.profile_url);
        let resp = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Bring a persisted token pair back to life: validate the access
    /// token, fall back to the refresh grant, re-validate. `false` means
    /// the caller has to go through interactive login; the stale file is
    /// left on disk for inspection.
    pub async fn restore_from_store(&mut self) -> Result<bool, AuthError> {
        let Some(credentials) = self.store.load() else {
            return Ok(false);
        };

        if self.check_auth(&credentials.access_token).await? {
            return self
                .set_token(credentials.access_token, credentials.refresh_token)
                .await;
        }

        if credentials.refresh_token.is_empty() {
            return Ok(false);
        }

        let refreshed = match self.exchange_refresh_token(&credentials.refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(err) => {
                tracing::warn!(%err, "refresh token exchange failed");
                return Ok(false);
            }
        };
        self.set_token(refreshed.access_token, refreshed.refresh_token)
            .await
    }

    /// Trade a refresh token for a fresh pair. Fails on a non-success
    /// response or a payload missing either token.
    pub async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Credentials, AuthError> {
        let resp = self
            .http
            .post(self.token_endpoint())
            .form(&[
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
                ("client_id", CLIENT_ID),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AuthError::TokenEndpoint(resp.status()));
        }
        let payload: TokenEndpointResponse = resp.json().await?;
        Ok(payload.into())
    }

    /// The single state-transition entry point. Validates the access
    /// token first; only then is the session replaced (new device id
    /// included) and the pair persisted. A failing validation leaves both
    /// the session and the token file untouched.
    pub async fn set_token(
        &mut self,
        access_token: String,
        refresh_token: String,
    ) -> Result<bool, AuthError> {
        if !self.check_auth(&access_token).await? {
            tracing::debug!("token rejected by profile endpoint, session unchanged");
            return Ok(false);
        }

        let session = Session::new(access_token.clone());
        let credentials = Credentials {
            access_token,
            refresh_token,
        };
        if let Err(err) = self.store.save(&credentials) {
            // Reported but not fatal: the in-memory session stays usable.
            tracing::warn!(%err, "failed to persist credentials");
        }
        self.session = Some(session);
        Ok(true)
    }

    /// Full authorization-code flow against the identity provider:
    /// PKCE material, login form scrape, SMS code, redirect code capture,
    /// token exchange. Any mismatch along the way is terminal for this
    /// invocation; retrying is the caller's call.
    pub async fn interactive_login(&mut self, phone: &str) -> Result<bool, AuthError> {
        let pkce = PkceSession::generate();

        tracing::info!("requesting authorization page");
        let resp = self
            .http
            .get(format!(
                "{}/protocol/openid-connect/auth",
                self.settings.identity_url
            ))
            .query(&[
                ("redirect_uri", REDIRECT_URI),
                ("client_id", CLIENT_ID),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("response_mode", "query"),
                ("code_challenge", pkce.code_challenge.as_str()),
                ("code_challenge_method", "S256"),
                ("device_id", pkce.device_id.as_str()),
                ("state", pkce.state.as_str()),
                ("nonce", pkce.nonce.as_str()),
            ])
            .send()
            .await?;
        let html = resp.text().await?;
        let form_url = login_form::extract_form_action(&html)?;

        self.set_login_hint(phone)?;

        tracing::info!("submitting phone number");
        let resp = self
            .http
            .post(&form_url)
            .form(&[("username", phone), ("rememberMe", "on")])
            .send()
            .await?;
        let html = resp.text().await?;
        let form_url = login_form::extract_form_action(&html)?;

        let code = super::prompt_sms_code()?;
        let digits: Vec<String> = code.chars().map(String::from).collect();

        tracing::info!("submitting SMS code");
        let resp = self
            .http
            .post(&form_url)
            .form(&[
                ("phone_number", phone),
                ("code1", digits[0].as_str()),
                ("code2", digits[1].as_str()),
                ("code3", digits[2].as_str()),
                ("code4", digits[3].as_str()),
                ("rememberMe", "on"),
            ])
            .send()
            .await?;

        let location = resp
            .headers()
            .get(LOCATION)
            .ok_or(LoginFlowError::MissingRedirect)?
            .to_str()
            .map_err(|_| LoginFlowError::MalformedRedirect)?;
        let authorization_code = login_form::extract_authorization_code(location)?;

        tracing::info!("exchanging authorization code");
        let credentials = self
            .exchange_authorization_code(&authorization_code, &pkce.code_verifier)
            .await?;
        self.set_token(credentials.access_token, credentials.refresh_token)
            .await
    }

    async fn exchange_authorization_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<Credentials, AuthError> {
        let resp = self
            .http
            .post(self.token_endpoint())
            .form(&[
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", REDIRECT_URI),
                ("code_verifier", code_verifier),
                ("client_id", CLIENT_ID),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AuthError::TokenEndpoint(resp.status()));
        }
        let payload: TokenEndpointResponse = resp.json().await?;
        Ok(payload.into())
    }

    fn token_endpoint(&self) -> String {
        format!(
            "{}/protocol/openid-connect/token",
            self.settings.identity_url
        )
    }

    fn set_login_hint(&self, phone: &str) -> Result<(), AuthError> {
        let origin = Url::parse(&self.settings.identity_url)
            .map_err(|e| AuthError::Configuration(format!("invalid identity_url: {e}")))?;
        self.cookies
            .add_cookie_str(&format!("loginHint={phone}"), &origin);
        Ok(())
    }
}
