use axum::extract::FromRef;
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, Rng};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use time::{Duration, OffsetDateTime};
use tracing::error;

use crate::state::AppState;

/// Issues and checks short-lived email verification codes. Codes are never
/// stored in plaintext; only their keyed digest lands in the database.
#[derive(Clone)]
pub struct CodeEngine {
    secret: String,
    ttl: Duration,
}

impl FromRef<AppState> for CodeEngine {
    fn from_ref(state: &AppState) -> Self {
        Self {
            secret: state.config.code.secret.clone(),
            ttl: Duration::minutes(state.config.code.ttl_minutes),
        }
    }
}

impl CodeEngine {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Six-digit decimal code drawn from the OS CSPRNG, zero-padded.
    pub fn generate(&self) -> String {
        let n: u32 = OsRng.gen_range(0..1_000_000);
        format!("{n:06}")
    }

    /// Hex HMAC-SHA256 of the code under the code-keying secret.
    pub fn digest(&self, code: &str) -> anyhow::Result<String> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes()).map_err(|e| {
            error!(error = %e, "hmac key error");
            anyhow::anyhow!(e.to_string())
        })?;
        mac.update(code.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Recomputes the digest for `code` and compares it against the stored
    /// digest in constant time.
    pub fn matches(&self, code: &str, stored_digest: &str) -> anyhow::Result<bool> {
        let computed = self.digest(code)?;
        Ok(computed
            .as_bytes()
            .ct_eq(stored_digest.as_bytes())
            .into())
    }

    pub fn is_expired(&self, sent_at: OffsetDateTime) -> bool {
        OffsetDateTime::now_utc() - sent_at > self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CodeEngine {
        CodeEngine::new("test-code-secret", Duration::minutes(5))
    }

    #[test]
    fn generated_codes_are_six_decimal_digits() {
        let engine = engine();
        for _ in 0..100 {
            let code = engine.generate();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn digest_is_deterministic_per_key() {
        let engine = engine();
        assert_eq!(engine.digest("123456").unwrap(), engine.digest("123456").unwrap());
        assert_ne!(engine.digest("123456").unwrap(), engine.digest("654321").unwrap());
    }

    #[test]
    fn digest_differs_across_keys() {
        let a = CodeEngine::new("key-a", Duration::minutes(5));
        let b = CodeEngine::new("key-b", Duration::minutes(5));
        assert_ne!(a.digest("123456").unwrap(), b.digest("123456").unwrap());
    }

    #[test]
    fn matches_accepts_correct_code_and_rejects_wrong_one() {
        let engine = engine();
        let stored = engine.digest("042000").unwrap();
        assert!(engine.matches("042000", &stored).unwrap());
        assert!(!engine.matches("042001", &stored).unwrap());
    }

    #[test]
    fn expiry_flips_at_the_window_boundary() {
        let engine = engine();
        let now = OffsetDateTime::now_utc();
        assert!(!engine.is_expired(now - Duration::minutes(4)));
        assert!(engine.is_expired(now - Duration::minutes(5) - Duration::seconds(1)));
    }
}
