//! promptdeck_core: the logic behind a prompt-library site
//!
//! The crate holds everything that is not rendering:
//! - Curated catalog of prompts and blog articles (read-only)
//! - View-state controller with the dashboard gate
//! - Session flow over an identity collaborator, with profile upserts
//! - Dashboard CRUD over a document store with live queries
//! - JSON command registry over the catalog
//!
//! ## Architecture
//!
//! - **Collaborators** are traits: [`session::AuthBackend`],
//!   [`store::PromptStore`] and [`store::ProfileStore`]. In-memory and SQLite
//!   implementations ship with the crate.
//! - **Push, not poll**: session changes and query results flow through
//!   [`hub::Hub`] listener registries; dropping a subscription handle
//!   unregisters it.
//! - **Notices**: every collaborator call site reports its outcome through
//!   [`notify::Notifier`] instead of failing the caller's loop.

pub mod app;
pub mod commands;
pub mod config;
pub mod content;
pub mod dashboard;
pub mod errors;
pub mod hub;
pub mod logging;
pub mod model;
pub mod notify;
pub mod runtime;
pub mod session;
pub mod store;
pub mod view;

pub use app::App;
pub use errors::{DeckError, Result};
