//! Extraction of structured fields from the identity provider's
//! semi-structured login pages. Kept behind a narrow interface so the
//! matching strategy can change without touching the flow logic; upstream
//! HTML drift surfaces as [`LoginFlowError`], never a panic.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::LoginFlowError;

static FORM_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<form\s+id="kc-form-login"[^>]*?action="([^"]+)""#)
        .expect("form action pattern is valid")
});

/// Pull the POST target out of the login form element.
pub fn extract_form_action(html: &str) -> Result<String, LoginFlowError> {
    let captures = FORM_ACTION
        .captures(html)
        .ok_or(LoginFlowError::FormActionNotFound)?;
    Ok(captures[1].replace("&amp;", "&"))
}

/// Pull the authorization code out of a redirect target's query string.
pub fn extract_authorization_code(location: &str) -> Result<String, LoginFlowError> {
    let url = Url::parse(location).map_err(|_| LoginFlowError::MalformedRedirect)?;
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .ok_or(LoginFlowError::MissingAuthorizationCode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = r#"<html><body>
        <form id="kc-form-login" onsubmit="login.disabled = true; return true;" action="https://id.example.com/auth/realms/demo/login-actions/authenticate?session_code=abc&amp;execution=def&amp;client_id=tc5_mob" method="post">
        <input name="username"/></form></body></html>"#;

    #[test]
    fn form_action_is_extracted_and_entity_decoded() {
        let action = extract_form_action(LOGIN_PAGE).unwrap();
        assert_eq!(
            action,
            "https://id.example.com/auth/realms/demo/login-actions/authenticate?session_code=abc&execution=def&client_id=tc5_mob"
        );
    }

    #[test]
    fn missing_form_is_a_flow_error() {
        assert_eq!(
            extract_form_action("<html><body>maintenance</body></html>"),
            Err(LoginFlowError::FormActionNotFound)
        );
    }

    #[test]
    fn other_forms_do_not_match() {
        let html = r#"<form id="kc-reset" action="https://id.example.com/reset" method="post">"#;
        assert_eq!(
            extract_form_action(html),
            Err(LoginFlowError::FormActionNotFound)
        );
    }

    #[test]
    fn authorization_code_is_read_from_the_redirect_query() {
        let code = extract_authorization_code(
            "ru.pyaterochka.app.browser://oauth2redirect?state=xyz&session_state=1&code=the-code",
        )
        .unwrap();
        assert_eq!(code, "the-code");
    }

    #[test]
    fn redirect_without_code_is_a_flow_error() {
        assert_eq!(
            extract_authorization_code("ru.pyaterochka.app.browser://oauth2redirect?state=xyz"),
            Err(LoginFlowError::MissingAuthorizationCode)
        );
        assert_eq!(
            extract_authorization_code("not a url"),
            Err(LoginFlowError::MalformedRedirect)
        );
    }
}
