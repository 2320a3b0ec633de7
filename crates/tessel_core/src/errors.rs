//! Error Types
//!
//! This module defines the error types shared by every Tessel crate.
//!
//! # Overview
//!
//! The main error type [`TesselError`] covers the failure modes of texture
//! resolution:
//! - A generator could not produce its original texture
//! - A derived copy could not be allocated or rendered
//! - A caller passed a constraint rectangle outside the content bounds
//!
//! Cache misses and incompatible sampling parameters are *not* errors; they
//! are the ordinary inputs of the copy path.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, TesselError>`.
//!
//! ```rust,ignore
//! use tessel_core::errors::{Result, TesselError};
//!
//! fn resolve() -> Result<()> {
//!     Err(TesselError::SourceUnavailable)
//! }
//! ```

use thiserror::Error;

use crate::geometry::Rect;

/// The main error type for Tessel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TesselError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The generator backing a producer could not produce its original texture.
    #[error("Texture source unavailable: generator produced no original texture")]
    SourceUnavailable,

    // ========================================================================
    // GPU Allocation Errors
    // ========================================================================
    /// A render-copy or resample could not allocate its destination texture.
    #[error("Failed to allocate texture copy: {0}")]
    CopyAllocationFailed(String),

    // ========================================================================
    // Caller Contract Violations
    // ========================================================================
    /// The constraint rectangle lies outside `[0, width] x [0, height]`.
    #[error("Constraint rect {rect:?} exceeds content bounds {width}x{height}")]
    InvalidConstraint {
        /// The offending rectangle, in content space
        rect: Rect,
        /// Logical content width
        width: u32,
        /// Logical content height
        height: u32,
    },
}

/// Alias for `Result<T, TesselError>`.
pub type Result<T> = std::result::Result<T, TesselError>;
