use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::distr::{Alphanumeric, SampleString};
use sha2::{Digest, Sha256};

const VERIFIER_LEN: usize = 128;
const STATE_LEN: usize = 22;
const DEVICE_ID_LEN: usize = 128;

/// Single-use material for one authorization-code attempt (PKCE, S256).
#[derive(Debug, Clone)]
pub struct PkceSession {
    pub code_verifier: String,
    pub code_challenge: String,
    pub state: String,
    pub nonce: String,
    pub device_id: String,
}

impl PkceSession {
    pub fn generate() -> Self {
        let code_verifier = random_alphanumeric(VERIFIER_LEN);
        let code_challenge = compute_code_challenge(&code_verifier);
        Self {
            code_verifier,
            code_challenge,
            state: random_alphanumeric(STATE_LEN),
            nonce: random_alphanumeric(STATE_LEN),
            device_id: random_alphanumeric(DEVICE_ID_LEN),
        }
    }
}

/// challenge = base64url(sha256(verifier)), padding stripped.
pub fn compute_code_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

fn random_alphanumeric(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_is_deterministic_for_a_fixed_verifier() {
        // sha256("") is a known digest; its unpadded base64url form is stable.
        assert_eq!(
            compute_code_challenge(""),
            "47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU"
        );

        let verifier = "a-fixed-verifier-string";
        assert_eq!(
            compute_code_challenge(verifier),
            compute_code_challenge(verifier)
        );
    }

    #[test]
    fn challenge_is_base64url_without_padding() {
        let challenge = compute_code_challenge("anything");
        assert_eq!(challenge.len(), 43);
        assert!(!challenge.contains('='));
        assert!(!challenge.contains('+'));
        assert!(!challenge.contains('/'));
    }

    #[test]
    fn generated_material_has_the_required_shape() {
        let pkce = PkceSession::generate();
        assert_eq!(pkce.code_verifier.len(), 128);
        assert_eq!(pkce.state.len(), 22);
        assert_eq!(pkce.nonce.len(), 22);
        assert_eq!(pkce.device_id.len(), 128);
        assert!(pkce.code_verifier.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(pkce.code_challenge, compute_code_challenge(&pkce.code_verifier));
    }

    #[test]
    fn each_session_uses_fresh_material() {
        let a = PkceSession::generate();
        let b = PkceSession::generate();
        assert_ne!(a.code_verifier, b.code_verifier);
        assert_ne!(a.state, b.state);
    }
}
