//! Fault plane and layer geometry.
//!
//! Everything here is recomputed from the [`SceneConfig`] on each render; the
//! only input that changes the result is the [`FaultState`].

use crate::math::{slope, x_at_y};
use crate::scene::SceneConfig;
use crate::state::FaultState;
use crate::vertex::Vertex;
use std::f64::consts::PI;

/// The fracture line, fixed in both states.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaultPlane {
    /// Anchor on the first layer boundary, `(fault_x, margin)`
    pub top: Vertex,
    /// Anchor on the last layer boundary, `y = height - margin`
    pub bottom: Vertex,
}

impl FaultPlane {
    pub fn from_scene(scene: &SceneConfig) -> Self {
        let run = (scene.height - 2.0 * scene.margin) / (PI - scene.fault_angle_rad()).tan();
        FaultPlane {
            top: Vertex::new(scene.fault_x, scene.margin),
            bottom: Vertex::new(scene.fault_x - run, scene.height - scene.margin),
        }
    }

    pub fn slope(&self) -> f64 {
        slope(self.top, self.bottom)
    }

    /// x-coordinate where the fault crosses height `y`
    pub fn x_at(&self, y: f64) -> f64 {
        x_at_y(self.top, self.slope(), y)
    }
}

/// Offset applied to the east block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Displacement {
    pub dx: f64,
    pub dy: f64,
}

impl Displacement {
    pub const NONE: Displacement = Displacement { dx: 0.0, dy: 0.0 };

    /// Full slip along the fault direction.
    ///
    /// With the default 135 degree fault this is `(0.7071, -0.7071)`: the east
    /// block drops relative to the west block, as in a normal fault.
    pub fn along_fault(scene: &SceneConfig) -> Self {
        let (sin, cos) = scene.fault_angle_rad().sin_cos();
        Displacement {
            dx: -scene.slip * cos,
            dy: -scene.slip * sin,
        }
    }

    pub fn for_state(scene: &SceneConfig, state: FaultState) -> Self {
        match state {
            FaultState::Flat => Displacement::NONE,
            FaultState::Displaced => Displacement::along_fault(scene),
        }
    }
}

/// Vertical extent of one stratum
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerBand {
    pub index: usize,
    /// Boundary nearer the first margin (`margin + index * thickness`)
    pub y_top: f64,
    pub y_bot: f64,
}

/// Bands for every layer, lowest first.
pub fn layer_bands(scene: &SceneConfig) -> impl Iterator<Item = LayerBand> + '_ {
    let thickness = scene.layer_thickness();
    (0..scene.layers.len()).map(move |index| {
        let y_top = scene.margin + index as f64 * thickness;
        LayerBand {
            index,
            y_top,
            y_bot: y_top + thickness,
        }
    })
}

/// Which part of a stratum a polygon covers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Block {
    /// Unbroken layer
    Whole,
    /// Footwall, left of the fault, never moves
    West,
    /// Hanging wall, right of the fault, shifted when displaced
    East,
}

/// Quadrilateral covering a layer or one side of it
#[derive(Clone, Debug, PartialEq)]
pub struct LayerPolygon {
    pub layer: usize,
    pub block: Block,
    pub vertices: [Vertex; 4],
}

/// Polygons for all layers in the given state, lowest layer first.
///
/// A flat scene yields one rectangle per layer. A displaced scene yields a west
/// and an east polygon per layer, split where the fault crosses the band.
pub fn layer_polygons(
    scene: &SceneConfig,
    fault: &FaultPlane,
    state: FaultState,
) -> Vec<LayerPolygon> {
    let left = scene.margin;
    let right = scene.width - scene.margin;
    let mut polygons = Vec::with_capacity(scene.layers.len() * 2);

    for band in layer_bands(scene) {
        let LayerBand { index, y_top, y_bot } = band;
        match state {
            FaultState::Flat => polygons.push(LayerPolygon {
                layer: index,
                block: Block::Whole,
                vertices: [
                    Vertex::new(left, y_top),
                    Vertex::new(right, y_top),
                    Vertex::new(right, y_bot),
                    Vertex::new(left, y_bot),
                ],
            }),
            FaultState::Displaced => {
                let x_fault_top = fault.x_at(y_top);
                let x_fault_bot = fault.x_at(y_bot);
                let Displacement { dx, dy } = Displacement::along_fault(scene);

                polygons.push(LayerPolygon {
                    layer: index,
                    block: Block::West,
                    vertices: [
                        Vertex::new(left, y_top),
                        Vertex::new(x_fault_top, y_top),
                        Vertex::new(x_fault_bot, y_bot),
                        Vertex::new(left, y_bot),
                    ],
                });
                polygons.push(LayerPolygon {
                    layer: index,
                    block: Block::East,
                    vertices: [
                        Vertex::new(x_fault_top, y_top).translate(dx, dy),
                        Vertex::new(right, y_top).translate(dx, dy),
                        Vertex::new(right, y_bot).translate(dx, dy),
                        Vertex::new(x_fault_bot, y_bot).translate(dx, dy),
                    ],
                });
            }
        }
    }

    polygons
}
