pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

pub mod users;
pub use self::users::list_users;

pub mod lists;

// common functions for the handlers
use crate::tugas::error::ApiError;
use tracing::error;

/// Collapse an unexpected backend failure into a generic 500, logging the
/// detail server-side only.
pub(crate) fn internal(err: impl std::fmt::Display) -> ApiError {
    error!("{err}");
    ApiError::Internal
}
