use crate::cli::actions::{server::Args, Action};
use anyhow::Result;
use secrecy::SecretString;

/// Map parsed CLI matches to an [`Action`].
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server(Args {
        port: matches.get_one::<u16>("port").copied().unwrap_or(3000),
        dsn: matches.get_one::<String>("dsn").cloned(),
        jwt_secret: matches
            .get_one::<String>("jwt-secret")
            .cloned()
            .map(SecretString::from),
        allow_anonymous: matches.get_flag("allow-anonymous"),
    }))
}
