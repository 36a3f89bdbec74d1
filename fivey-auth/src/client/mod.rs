pub mod auth_client;
mod config;
mod login_form;
mod pkce;
mod session;
mod token_store;

pub use auth_client::AuthClient;
pub use config::Settings;
pub use session::Session;
pub use token_store::TokenStore;

use std::io::{self, Write};

use crate::error::AuthError;

/// Authenticate before the menu takes over the terminal.
///
/// Restores the persisted session when it is still (or can be refreshed
/// to be) valid; otherwise walks the user through the interactive choices
/// the way the mobile app would. Returns a validated [`Session`] or
/// [`AuthError::NotAuthenticated`] when the user bails out.
pub async fn authenticate(settings: &Settings) -> Result<Session, AuthError> {
    settings.validate().map_err(AuthError::Configuration)?;

    let mut auth = AuthClient::new(settings.clone())?;

    if auth.restore_from_store().await? {
        tracing::info!("session restored from token file");
        return auth.into_session().ok_or(AuthError::NotAuthenticated);
    }

    loop {
        println!();
        println!("1. Авторизоваться по номеру");
        println!("2. Подставить токен");
        println!("3. Выход");
        println!();

        match prompt("Выбор: ")?.as_str() {
            "1" => {
                let digits = prompt("Телефон: +7")?;
                let phone = format!("7{digits}");
                match auth.interactive_login(&phone).await {
                    Ok(true) => break,
                    Ok(false) => println!("Авторизация не удалась!"),
                    Err(err) => {
                        tracing::error!(%err, "interactive login failed");
                        println!("Ошибка авторизации: {err}");
                    }
                }
            }
            "2" => {
                let token = prompt("Вставьте токен: ")?;
                match auth.set_token(token, String::new()).await {
                    Ok(true) => break,
                    Ok(false) => println!("Токен не прошёл проверку!"),
                    Err(err) => {
                        tracing::error!(%err, "token check failed");
                        println!("Ошибка авторизации: {err}");
                    }
                }
            }
            "3" | "q" => return Err(AuthError::NotAuthenticated),
            _ => {}
        }
    }

    auth.into_session().ok_or(AuthError::NotAuthenticated)
}

pub(crate) fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// The provider sends a four-digit code; re-prompt locally until the
/// input at least has that shape.
pub(crate) fn prompt_sms_code() -> io::Result<String> {
    loop {
        let code = prompt("Код: ")?;
        if code.len() == 4 && code.chars().all(|c| c.is_ascii_digit()) {
            return Ok(code);
        }
        println!("Код должен состоять из четырёх цифр");
    }
}
