//! # SneakPeak Core
//!
//! Shared logic for SneakPeak: catalog data models, the search and trending
//! engine, and the document store abstraction used for designs and alerts.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or HTTP
//! dependencies. Every engine operation is a pure function over a borrowed
//! catalog snapshot.

pub mod catalog;
pub mod models;
pub mod store;
