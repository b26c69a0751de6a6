//! Fixed visual parameters of the fault diagram.
//!
//! Scene units follow the plot axes: x grows to the right, y grows upward, and
//! the axes span `(0, 0)` to `(width, height)`.

use crate::error::SceneError;
use crate::fault::FaultPlane;
use std::f64::consts::PI;
use std::fmt;

/// Number of strata drawn in the diagram.
pub const LAYER_COUNT: usize = 3;

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const GRAY: Rgb = Rgb::new(0x80, 0x80, 0x80);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// RGBA bytes with full opacity, the layout of the pixel buffer
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fill color and display name of one stratum
#[derive(Clone, Debug, PartialEq)]
pub struct LayerStyle {
    pub name: &'static str,
    pub color: Rgb,
}

/// Immutable scene constants shared by every render.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Canvas width in scene units
    pub width: f64,
    /// Canvas height in scene units
    pub height: f64,
    /// Empty border around the layers
    pub margin: f64,
    /// Layer styles, index 0 is the lowest stratum
    pub layers: Vec<LayerStyle>,
    /// Dip of the fault plane in degrees, measured counter-clockwise from +x
    pub fault_angle_deg: f64,
    /// x-position where the fault meets the first layer boundary (`y = margin`)
    pub fault_x: f64,
    /// Distance the east block travels when displaced
    pub slip: f64,
    /// Outline color of the layer polygons
    pub edge_color: Rgb,
    /// Color of the drawn fault plane
    pub fault_color: Rgb,
    /// Stroke width of the fault plane in scene units
    pub fault_width: f64,
    /// Dash length and gap of the fault plane in scene units
    pub fault_dash: (f64, f64),
    /// Color of the fault entry in the legend
    pub legend_fault_color: Rgb,
    /// Color of the legend labels
    pub legend_text_color: Rgb,
    pub title: &'static str,
    pub button_label: &'static str,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let width = 8.0;
        SceneConfig {
            width,
            height: 4.0,
            margin: 0.2,
            layers: vec![
                LayerStyle {
                    name: "Pinkstone",
                    color: Rgb::new(0xff, 0xd1, 0xdc),
                },
                LayerStyle {
                    name: "Greenstone",
                    color: Rgb::new(0xb0, 0xea, 0xcb),
                },
                LayerStyle {
                    name: "Yellowstone",
                    color: Rgb::new(0xff, 0xf9, 0xb1),
                },
            ],
            fault_angle_deg: 135.0,
            // Slightly right of center
            fault_x: width / 2.0 + 1.0,
            slip: 1.0,
            edge_color: Rgb::GRAY,
            fault_color: Rgb::new(0xb8, 0x5c, 0x2b),
            fault_width: 0.04,
            fault_dash: (0.15, 0.07),
            legend_fault_color: Rgb::new(0xf8, 0xbb, 0xd0),
            legend_text_color: Rgb::new(0xf8, 0xbb, 0xd0),
            title: "What is this normal fault really?",
            button_label: "Click here to see!",
        }
    }
}

impl SceneConfig {
    pub fn fault_angle_rad(&self) -> f64 {
        self.fault_angle_deg.to_radians()
    }

    /// Height of a single stratum; the three layers fill the canvas between the margins.
    pub fn layer_thickness(&self) -> f64 {
        (self.height - 2.0 * self.margin) / self.layers.len() as f64
    }

    /// Check that caller overrides still describe a drawable normal fault.
    ///
    /// The geometry divides by `tan(pi - angle)` and by the fault slope, so
    /// angles of 90 or 180 degrees are rejected here instead of producing
    /// infinite coordinates later.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.layers.len() != LAYER_COUNT {
            return Err(SceneError::LayerCount(self.layers.len()));
        }
        if !(self.margin >= 0.0 && 2.0 * self.margin < self.height.min(self.width)) {
            return Err(SceneError::MarginTooLarge {
                margin: self.margin,
                width: self.width,
                height: self.height,
            });
        }
        let angle = self.fault_angle_deg;
        if !(angle > 90.0 && angle < 180.0) {
            return Err(SceneError::FaultAngleOutOfRange(angle));
        }
        // Guard against angles that round to a vertical or flat line
        let rad = self.fault_angle_rad();
        if (PI - rad).tan().abs() < f64::EPSILON || rad.cos().abs() < f64::EPSILON {
            return Err(SceneError::FaultAngleOutOfRange(angle));
        }
        if !self.slip.is_finite() || self.slip < 0.0 {
            return Err(SceneError::InvalidSlip(self.slip));
        }
        let (min, max) = (self.margin, self.width - self.margin);
        if !(self.fault_x > min && self.fault_x < max) {
            return Err(SceneError::FaultOutsideLayers {
                fault_x: self.fault_x,
                min,
                max,
            });
        }
        // Past the layer edge the west polygons self-intersect
        let end_x = FaultPlane::from_scene(self).bottom.x;
        if !(end_x > min && end_x < max) {
            return Err(SceneError::FaultEndOutsideLayers { end_x, min, max });
        }
        Ok(())
    }
}
