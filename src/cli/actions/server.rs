use crate::{cli::globals::GlobalArgs, tugas};
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub jwt_secret: Option<SecretString>,
    pub allow_anonymous: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the DSN is malformed or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    if let Some(dsn) = &args.dsn {
        let url = Url::parse(dsn)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(anyhow!("unsupported DSN scheme: {}", url.scheme()));
        }
    }

    if args.jwt_secret.is_none() {
        warn!("No token secret configured, using the development fallback");
    }

    if args.allow_anonymous {
        warn!("Anonymous mode enabled, unauthenticated requests use a placeholder identity");
    }

    info!(
        "Starting server on port {} ({} user store)",
        args.port,
        if args.dsn.is_some() {
            "postgres"
        } else {
            "in-memory"
        }
    );

    let globals = GlobalArgs::new(args.jwt_secret, args.allow_anonymous);

    tugas::new(args.port, args.dsn, globals).await
}
