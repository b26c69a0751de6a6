//! Errors raised while validating scene overrides.

use thiserror::Error;

/// Error returned when a [`SceneConfig`](crate::scene::SceneConfig) cannot be drawn.
///
/// The renderer itself never fails; these variants are produced by
/// [`SceneConfig::validate`](crate::scene::SceneConfig::validate) so the caller
/// can reject command line overrides before any geometry is computed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SceneError {
    /// Returned when the fault would be vertical, horizontal, or dip the wrong way.
    #[error("fault angle must lie strictly between 90 and 180 degrees (received {0})")]
    FaultAngleOutOfRange(f64),
    /// Returned when the slip distance is negative or not a number.
    #[error("slip must be a finite, non-negative distance (received {0})")]
    InvalidSlip(f64),
    /// Returned when the margin leaves no room for the layers.
    #[error("margin {margin} leaves no drawable area on a {width}x{height} canvas")]
    MarginTooLarge {
        /// Rejected margin in scene units.
        margin: f64,
        /// Canvas width in scene units.
        width: f64,
        /// Canvas height in scene units.
        height: f64,
    },
    /// Returned when the fault anchor is not inside the layered area.
    #[error("fault anchor x = {fault_x} must lie between {min} and {max}")]
    FaultOutsideLayers {
        /// Rejected anchor position.
        fault_x: f64,
        /// Left edge of the layers.
        min: f64,
        /// Right edge of the layers.
        max: f64,
    },
    /// Returned when the far end of the fault leaves the layered area.
    #[error("fault end x = {end_x} must lie between {min} and {max}")]
    FaultEndOutsideLayers {
        /// x-coordinate of the fault at `y = height - margin`.
        end_x: f64,
        /// Left edge of the layers.
        min: f64,
        /// Right edge of the layers.
        max: f64,
    },
    /// Returned when the layer list does not hold exactly three strata.
    #[error("expected 3 layers, found {0}")]
    LayerCount(usize),
}
