//! # SneakPeak
//!
//! Sneaker catalog search and user-data service.
//!
//! SneakPeak serves a file-backed sneaker catalog with filtered search,
//! a curated-plus-popularity trending list, and detail lookup, and accepts
//! user-authored designs and price/restock alerts into a SQLite document
//! store. Everything is available from the `sneakpeak` CLI and an HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐
//! │ catalog.json │──▶│ loader (per call) │──┐
//! └──────────────┘   └──────────────────┘  │   ┌─────────────────┐
//!                                          ├──▶│ sneakpeak-core  │
//! ┌──────────────┐   ┌──────────────────┐  │   │ filter/trending │
//! │    SQLite    │◀─▶│  DocumentStore    │──┘   └────────┬────────┘
//! └──────────────┘   └──────────────────┘                │
//!                                          ┌──────────────┴─────┐
//!                                          ▼                    ▼
//!                                     ┌─────────┐          ┌─────────┐
//!                                     │   CLI   │          │  HTTP   │
//!                                     └─────────┘          └─────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`loader`] | Catalog file loading (degrades to empty) |
//! | [`search`] | CLI catalog commands |
//! | [`documents`] | Design and alert services |
//! | [`sqlite_store`] | SQLite [`DocumentStore`](sneakpeak_core::store::DocumentStore) |
//! | [`server`] | HTTP API server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod db;
pub mod documents;
pub mod loader;
pub mod migrate;
pub mod search;
pub mod server;
pub mod sqlite_store;
