//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants.

use crate::constants::*;

// =============================================================================
// SCRATCH FILE TESTS
// =============================================================================

#[test]
fn test_extensions_differ() {
    assert_ne!(
        SOURCE_EXTENSION, MESH_EXTENSION,
        "source and mesh scratch files must not collide"
    );
}

#[test]
fn test_prefix_is_path_safe() {
    assert!(
        SCRATCH_FILE_PREFIX
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
        "SCRATCH_FILE_PREFIX must be usable as a file name"
    );
}

// =============================================================================
// COLOR TESTS
// =============================================================================

#[test]
fn test_default_base_color_is_normalized() {
    for component in DEFAULT_BASE_COLOR {
        assert!((0.0..=1.0).contains(&component));
    }
}

#[test]
fn test_color_byte_max() {
    assert_eq!(COLOR_BYTE_MAX, u8::MAX as f32);
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_timeout_is_bounded() {
    assert!(COMPILER_TIMEOUT_SECS > 0);
    assert!(COMPILER_TIMEOUT_SECS <= 300, "requests must not hang for minutes");
}
