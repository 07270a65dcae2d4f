use secrecy::SecretString;

/// Shared runtime configuration, attached to the router as an extension.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Secret used to sign and verify bearer tokens. When absent a fixed
    /// development fallback is used by the token service.
    pub jwt_secret: Option<SecretString>,
    /// Development mode: requests without an `Authorization` header are
    /// handled under a fixed placeholder identity instead of being rejected.
    pub allow_anonymous: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(jwt_secret: Option<SecretString>, allow_anonymous: bool) -> Self {
        Self {
            jwt_secret,
            allow_anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(Some(SecretString::from("s3cret".to_string())), false);
        assert_eq!(
            args.jwt_secret.as_ref().map(ExposeSecret::expose_secret),
            Some("s3cret")
        );
        assert!(!args.allow_anonymous);

        let args = GlobalArgs::default();
        assert!(args.jwt_secret.is_none());
        assert!(!args.allow_anonymous);
    }
}
