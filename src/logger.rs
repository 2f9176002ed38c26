//! Global logging helpers
//!
//! Thin wrappers over `tracing` that tag every entry with a source
//! component, so call sites read `logger::info("pipe", "...")`. Installing
//! a subscriber is the embedding host's job; without one these are no-ops.

/// Log a DEBUG level message
pub fn debug(source: &str, message: &str) {
    tracing::debug!(source, "{message}");
}

/// Log an INFO level message
pub fn info(source: &str, message: &str) {
    tracing::info!(source, "{message}");
}

/// Log a WARN level message
pub fn warn(source: &str, message: &str) {
    tracing::warn!(source, "{message}");
}

/// Log an ERROR level message
pub fn error(source: &str, message: &str) {
    tracing::error!(source, "{message}");
}
