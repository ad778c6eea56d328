//! Street-light alert relay HTTP trigger adapter.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! Firestore event decoding) so integration tests and the binary entrypoint
//! can both access them.

pub mod config;
pub mod error;
pub mod firestore;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
