use std::fs;
use std::path::PathBuf;

use crate::common::Credentials;
use crate::error::AuthError;

pub struct TokenStore {
    token_path: PathBuf,
}

impl TokenStore {
    pub fn new() -> Result<Self, AuthError> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| AuthError::Configuration("Could not find cache directory".to_string()))?
            .join("fivey");
        Ok(Self::at(cache_dir.join("token.json")))
    }

    pub fn at(token_path: PathBuf) -> Self {
        Self { token_path }
    }

    /// Read the persisted token pair. A missing, unreadable or malformed
    /// file is an expected condition (first run, interrupted write, stale
    /// format) and comes back as `None`, never an error. The file is left
    /// in place either way.
    pub fn load(&self) -> Option<Credentials> {
        let json = match fs::read_to_string(&self.token_path) {
            Ok(json) => json,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.token_path.display(), %err, "token file unreadable");
                }
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(credentials) => Some(credentials),
            Err(err) => {
                tracing::warn!(path = %self.token_path.display(), %err, "token file malformed");
                None
            }
        }
    }

    /// Persist the token pair. Written to a sibling temp file and renamed
    /// so a crash mid-write never leaves a half-populated token file.
    pub fn save(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(credentials)?;

        let dir = self
            .token_path
            .parent()
            .ok_or_else(|| AuthError::TokenStorage("token path has no parent".to_string()))?;
        fs::create_dir_all(dir).map_err(|e| {
            AuthError::TokenStorage(format!("Failed to create token directory: {}", e))
        })?;

        let tmp_path = self.token_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| AuthError::TokenStorage(format!("Failed to save token: {}", e)))?;

        // Owner read/write only before it reaches the final name
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&tmp_path)
                .map_err(|e| {
                    AuthError::TokenStorage(format!("Failed to get file permissions: {}", e))
                })?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp_path, perms).map_err(|e| {
                AuthError::TokenStorage(format!("Failed to set file permissions: {}", e))
            })?;
        }

        fs::rename(&tmp_path, &self.token_path)
            .map_err(|e| AuthError::TokenStorage(format!("Failed to save token: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> TokenStore {
        TokenStore::at(dir.path().join("token.json"))
    }

    #[test]
    fn load_returns_none_for_a_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let credentials = Credentials {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };

        store.save(&credentials).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token, "access");
        assert_eq!(loaded.refresh_token, "refresh");
    }

    #[test]
    fn save_overwrites_a_previous_pair() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for token in ["first", "second"] {
            store
                .save(&Credentials {
                    access_token: token.to_string(),
                    refresh_token: format!("{token}-refresh"),
                })
                .unwrap();
        }
        assert_eq!(store.load().unwrap().access_token, "second");
    }

    #[test]
    fn malformed_or_incomplete_files_load_as_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::write(dir.path().join("token.json"), "not json").unwrap();
        assert!(store.load().is_none());

        fs::write(dir.path().join("token.json"), r#"{"access_token": "a"}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .save(&Credentials {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
            })
            .unwrap();
        let mode = fs::metadata(dir.path().join("token.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
