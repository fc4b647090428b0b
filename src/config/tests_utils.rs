//! Shared test utilities for config module tests.

use std::sync::Mutex;

/// Mutex to serialize environment variable tests and prevent race conditions.
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variables read by `Config::load`.
pub const CONFIG_ENV_VARS: [&str; 9] = [
    "MINDVAULT_EMBEDDER",
    "MINDVAULT_DIMENSION",
    "MINDVAULT_EMBEDDING_MODEL",
    "MINDVAULT_API_BASE_URL",
    "MINDVAULT_TOP_K",
    "MINDVAULT_DATA_DIR",
    "MINDVAULT_USER_ID",
    "MINDVAULT_REQUEST_TIMEOUT_SECS",
    "OPENAI_API_KEY",
];

/// Set an environment variable. Callers must hold `ENV_MUTEX`.
pub fn set_env(name: &str, value: &str) {
    // SAFETY: every test touching the environment holds ENV_MUTEX.
    unsafe { std::env::set_var(name, value) }
}

/// Clean up environment variables used by mindvault config.
pub fn cleanup_env_vars(vars: &[&str]) {
    for var in vars {
        // SAFETY: every test touching the environment holds ENV_MUTEX.
        unsafe { std::env::remove_var(var) }
    }
}
