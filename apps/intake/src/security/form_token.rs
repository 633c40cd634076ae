//! Anti-forgery tokens for the public form and the admin delete action.
//!
//! A token has the form `<expires_unix>.<hex hmac>` where the MAC is
//! HMAC-SHA256 over `<scope>|<expires_unix>`. A token issued for one scope
//! never verifies against another.

use chrono::{DateTime, Duration, Utc};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Scope embedded in the public application form.
pub const SUBMIT_SCOPE: &str = "job_application_form_action";

/// Scope embedded in the admin listing for row deletion.
pub const DELETE_SCOPE: &str = "delete_job_application_nonce";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is missing")]
    Missing,

    #[error("token is malformed")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token signature mismatch")]
    BadSignature,
}

/// Issues and verifies scope-bound, time-limited form tokens.
#[derive(Clone)]
pub struct FormTokens {
    keyed: HmacSha256,
    ttl: Duration,
}

impl FormTokens {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, InvalidLength> {
        Ok(Self {
            keyed: HmacSha256::new_from_slice(secret)?,
            ttl,
        })
    }

    pub fn issue(&self, scope: &str) -> String {
        self.issue_at(scope, Utc::now())
    }

    pub fn issue_at(&self, scope: &str, now: DateTime<Utc>) -> String {
        let expires = (now + self.ttl).timestamp();
        let signature = hex::encode(self.mac(scope, expires).finalize().into_bytes());
        format!("{expires}.{signature}")
    }

    pub fn verify(&self, token: Option<&str>, scope: &str) -> Result<(), TokenError> {
        self.verify_at(token, scope, Utc::now())
    }

    pub fn verify_at(
        &self,
        token: Option<&str>,
        scope: &str,
        now: DateTime<Utc>,
    ) -> Result<(), TokenError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        let token = token.ok_or(TokenError::Missing)?;

        let (expires, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let expires: i64 = expires.parse().map_err(|_| TokenError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| TokenError::Malformed)?;

        self.mac(scope, expires)
            .verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        if now.timestamp() >= expires {
            return Err(TokenError::Expired);
        }
        Ok(())
    }

    fn mac(&self, scope: &str, expires: i64) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(scope.as_bytes());
        mac.update(b"|");
        mac.update(expires.to_string().as_bytes());
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> FormTokens {
        FormTokens::new(b"test-secret", Duration::hours(24)).unwrap()
    }

    #[test]
    fn test_issued_token_verifies_for_same_scope() {
        let t = tokens();
        let token = t.issue(SUBMIT_SCOPE);
        assert_eq!(t.verify(Some(&token), SUBMIT_SCOPE), Ok(()));
    }

    #[test]
    fn test_token_rejected_for_other_scope() {
        let t = tokens();
        let token = t.issue(SUBMIT_SCOPE);
        assert_eq!(
            t.verify(Some(&token), DELETE_SCOPE),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_missing_and_blank_tokens() {
        let t = tokens();
        assert_eq!(t.verify(None, SUBMIT_SCOPE), Err(TokenError::Missing));
        assert_eq!(t.verify(Some("  "), SUBMIT_SCOPE), Err(TokenError::Missing));
    }

    #[test]
    fn test_malformed_token() {
        let t = tokens();
        assert_eq!(
            t.verify(Some("not-a-token"), SUBMIT_SCOPE),
            Err(TokenError::Malformed)
        );
        assert_eq!(
            t.verify(Some("123.zz"), SUBMIT_SCOPE),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_expired_token() {
        let t = tokens();
        let issued = Utc::now() - Duration::hours(25);
        let token = t.issue_at(DELETE_SCOPE, issued);
        assert_eq!(
            t.verify(Some(&token), DELETE_SCOPE),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_expiry_breaks_signature() {
        let t = tokens();
        let token = t.issue(SUBMIT_SCOPE);
        let (expires, sig) = token.split_once('.').unwrap();
        let extended: i64 = expires.parse::<i64>().unwrap() + 3600;
        let forged = format!("{extended}.{sig}");
        assert_eq!(
            t.verify(Some(&forged), SUBMIT_SCOPE),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = tokens().issue(SUBMIT_SCOPE);
        let other = FormTokens::new(b"another-secret", Duration::hours(24)).unwrap();
        assert_eq!(
            other.verify(Some(&token), SUBMIT_SCOPE),
            Err(TokenError::BadSignature)
        );
    }
}
