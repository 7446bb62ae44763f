//! Observability for bioaudit.
//! `tracing` crate with `EnvFilter`, per-component log levels.

pub mod setup;

pub use setup::init_tracing;
