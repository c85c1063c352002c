//! Memory-palace scene generation.
//!
//! A user names a concept to remember and a familiar place; the service asks a
//! generative model for a vivid, surreal scene that places the concept inside
//! the location, optionally translates it into one of several Indian languages,
//! and saves it to the user's palace history.
//!
//! # Pipeline
//!
//! | Stage | Module | Failure |
//! |-------|--------|---------|
//! | Compose prompt | [`scene::prompt`] | never fails |
//! | Generate | [`generator`] | aborts the request |
//! | Translate | [`translation`] | logged, English scene kept |
//! | Build record | [`scene::record`] | aborts the request |
//! | Persist | [`scene::store`] | aborts the request |
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, migrations, and health checks
//! - [`generator`] — Gemini-backed scene generation behind a one-shot model handle
//! - [`translation`] — Chunked translation through the public Google endpoint
//! - [`scene`] — Prompt composition, record building, persistence, and the pipeline
//! - [`identity`] — Accounts, password hashing, sessions, and profiles
//! - [`routes`] / [`server`] — The HTTP API

pub mod config;
pub mod db;
pub mod generator;
pub mod identity;
pub mod routes;
pub mod scene;
pub mod server;
pub mod translation;
