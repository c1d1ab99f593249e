//! Shared test utilities for the meteo-maps workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Forecast payload and GeoJSON fixtures
//! - Generators for synthetic location records and boundaries
//! - Temporary maps/data directory helpers
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if no TrueType font is available for labels.
///
/// Text rendering is optional; tests that assert on label pixels call this
/// first and return early on machines without DejaVu fonts.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_font;
///
/// #[test]
/// fn test_title_is_drawn() {
///     let font_path = require_font!();
///     // Test code using font_path...
/// }
/// ```
#[macro_export]
macro_rules! require_font {
    () => {{
        match $crate::find_system_font() {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: no TrueType font found. Install fonts-dejavu-core.");
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }
}
