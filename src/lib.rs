//! # Tugas (Multi-tenant ToDo List API)
//!
//! `tugas` is a small HTTP backend: users register and log in with password
//! credentials, receive a signed bearer token, and manage their own "list"
//! resources. Every list is scoped to the user id that created it; requests
//! for somebody else's list answer `404` so that resource existence is never
//! leaked to non-owners.
//!
//! ## Storage
//!
//! Repositories are trait objects with two backings:
//!
//! 1. **In-memory** (default): append-only vectors behind a mutex, suitable
//!    for development and exercised by the test suite.
//! 2. **PostgreSQL** (users only, via `--dsn`): mirrors the in-memory
//!    contract with `sqlx` queries.
//!
//! ## Tokens
//!
//! Bearer tokens are HS256 JWTs carrying the subject user id and email,
//! valid for one day. When no secret is configured a fixed development
//! fallback is used; production deployments must set `TUGAS_JWT_SECRET`.

pub mod cli;
pub mod tugas;
