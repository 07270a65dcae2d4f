use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::cli::globals::GlobalArgs;

pub mod auth;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod store;
pub mod token;

use store::{
    ListRepository, MemoryListRepository, MemoryUserRepository, PgUserRepository, UserRepository,
};
use token::TokenService;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

/// Build the application router.
///
/// Repositories, the token service and the global config ride along as
/// extensions; the `/api/lists` routes sit behind the bearer-token
/// middleware, auth and health routes do not.
#[must_use]
pub fn router(
    users: Arc<dyn UserRepository>,
    lists: Arc<dyn ListRepository>,
    tokens: Arc<TokenService>,
    globals: GlobalArgs,
) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    let protected = Router::new()
        .route(
            "/api/lists",
            post(handlers::lists::create_list).get(handlers::lists::get_all_lists),
        )
        .route(
            "/api/lists/:id",
            get(handlers::lists::get_list_by_id)
                .put(handlers::lists::update_list)
                .delete(handlers::lists::delete_list),
        )
        .route_layer(middleware::from_fn(auth::auth));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/users", get(handlers::list_users))
        .merge(protected)
        .merge(
            SwaggerUi::new("/api-docs")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(users))
                .layer(Extension(lists))
                .layer(Extension(tokens))
                .layer(Extension(globals)),
        )
}

/// Start the server.
/// # Errors
/// Returns an error if the database connection or the listener fails.
pub async fn new(port: u16, dsn: Option<String>, globals: GlobalArgs) -> Result<()> {
    let users: Arc<dyn UserRepository> = match &dsn {
        Some(dsn) => {
            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(5)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(dsn)
                .await
                .context("Failed to connect to database")?;

            Arc::new(PgUserRepository::new(pool))
        }
        None => Arc::new(MemoryUserRepository::default()),
    };

    // Lists are in-memory only; no persistent backend is wired up
    let lists: Arc<dyn ListRepository> = Arc::new(MemoryListRepository::default());

    let tokens = Arc::new(TokenService::new(globals.jwt_secret.as_ref()));

    let app = router(users, lists, tokens, globals);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}
