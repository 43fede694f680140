//! Shared constants for end-to-end tests

#![allow(dead_code)]

// ============================================================================
// Demo albums seeded into the memory store
// ============================================================================

pub const DEMO_ALBUMS_COUNT: usize = 4;

pub const DEMO_ALBUM_1_TITLE: &str = "Blue Train";
pub const DEMO_ALBUM_1_ARTIST: &str = "John Coltrane";
pub const DEMO_ALBUM_1_PRICE: f64 = 56.99;

pub const DEMO_ALBUM_4_TITLE: &str = "Hirschbrunnen";
pub const DEMO_ALBUM_4_ARTIST: &str = "delving";

// ============================================================================
// Error bodies
// ============================================================================

pub const INVALID_ID_ERROR: &str = "ID provided is invalid";
pub const NOT_FOUND_ERROR: &str = "Item ID not found";
pub const SCHEMA_MISMATCH_ERROR: &str = "Data provided did not match album schema";

// ============================================================================
// Server settings
// ============================================================================

/// Body limit used by the test server, small enough to trip easily.
pub const TEST_MAX_BODY_BYTES: usize = 16 * 1024;

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
