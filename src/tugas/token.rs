use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Fixed development secret, used when no secret is configured.
///
/// This is a deliberate convenience for local development, not a security
/// boundary: production deployments must set `TUGAS_JWT_SECRET`.
const FALLBACK_SECRET: &str = "fallback-secret-key";

/// Default token lifetime for login and registration flows.
#[must_use]
pub fn default_ttl() -> Duration {
    Duration::days(1)
}

/// Claims carried by every bearer token.
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    pub email: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues and verifies signed, time-bounded bearer tokens (HS256 JWT).
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: Option<&SecretString>) -> Self {
        let secret = secret.map_or(FALLBACK_SECRET, ExposeSecret::expose_secret);

        let mut validation = Validation::new(Algorithm::HS256);
        // A token is valid strictly while `now < exp`
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `subject_id`, expiring after `ttl`.
    /// # Errors
    /// Returns an error if JWT encoding fails.
    pub fn issue(&self, subject_id: &str, email: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify a token string and recover its claims.
    ///
    /// Fails for a bad signature, structural garbage, or an expired token.
    /// A token signed with a different secret is indistinguishable from a
    /// malformed one.
    /// # Errors
    /// Returns the underlying JWT error; callers treat any failure as an
    /// authentication failure.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;

        // The library check is exclusive (now > exp); a token is valid
        // strictly while now < exp, so the expiry instant itself fails
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(jsonwebtoken::errors::ErrorKind::ExpiredSignature.into());
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new(Some(&secret("test-secret")));
        let token = service
            .issue("user-1", "a@x.com", default_ttl())
            .expect("issue");

        let claims = service.verify(&token).expect("verify");
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::new(Some(&secret("test-secret")));
        let token = service
            .issue("user-1", "a@x.com", Duration::hours(-1))
            .expect("issue");

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenService::new(Some(&secret("one-secret")));
        let verifier = TokenService::new(Some(&secret("another-secret")));
        let token = issuer
            .issue("user-1", "a@x.com", default_ttl())
            .expect("issue");

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_token_at_exact_expiry_is_rejected() {
        let service = TokenService::new(Some(&secret("test-secret")));
        // exp == iat == now: the expiry instant itself must fail
        let token = service
            .issue("user-1", "a@x.com", Duration::zero())
            .expect("issue");

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let service = TokenService::new(Some(&secret("test-secret")));
        assert!(service.verify("not-a-token").is_err());
        assert!(service.verify("").is_err());
    }

    #[test]
    fn test_fallback_secret_when_unconfigured() {
        let unconfigured = TokenService::new(None);
        let token = unconfigured
            .issue("user-1", "a@x.com", default_ttl())
            .expect("issue");

        // Another unconfigured service shares the fallback secret
        assert!(TokenService::new(None).verify(&token).is_ok());
        // A configured one does not
        assert!(TokenService::new(Some(&secret("real-secret")))
            .verify(&token)
            .is_err());
    }
}
