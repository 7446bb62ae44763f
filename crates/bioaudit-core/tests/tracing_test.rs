//! Tests for the bioaudit tracing setup.

use std::sync::Mutex;

use bioaudit_core::tracing::init_tracing;

/// Serializes tracing tests (env var manipulation).
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_bioaudit_log_filter_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("BIOAUDIT_LOG", "bioaudit_analysis=debug,bioaudit_core=warn");
    init_tracing();
    std::env::remove_var("BIOAUDIT_LOG");
}

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    tracing::info!("still logging after repeated init");
}
