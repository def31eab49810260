//! Pokemon Scout: fetch Pokemon records from PokeAPI, sanitize the payload,
//! and persist them in a local SQLite database.
//!
//! The crate is organized around one shared pipeline
//! ([`pipeline::fetch_and_store`]): check the store, fetch from the API,
//! sanitize, persist. The HTTP API ([`server`]), the CLI (`main.rs`), and the
//! interactive menu ([`ui`]) are thin callers of that pipeline plus the
//! [`store::Store`] query surface.

pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod sanitize;
pub mod server;
pub mod store;
pub mod ui;
pub mod utils;
