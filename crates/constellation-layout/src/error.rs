//! Error types for the `constellation-layout` crate.
//!
//! Placement itself never fails: missing pillars fall back to the canvas
//! center and unresolved overlaps are flagged rather than rejected. The only
//! fallible operation is validating a [`LayoutConfig`].
//!
//! [`LayoutConfig`]: crate::config::LayoutConfig

/// Errors that can occur while validating layout parameters.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A layout parameter is out of its allowed range.
    #[error("invalid layout configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}
