//! The diagram renderer: a pure function from scene and fault state to a [`Figure`].

use crate::fault::{layer_polygons, FaultPlane, LayerPolygon};
use crate::scene::{Rgb, SceneConfig};
use crate::state::FaultState;
use crate::vertex::Vertex;

/// Filled stratum piece
#[derive(Clone, Debug, PartialEq)]
pub struct LayerShape {
    pub polygon: LayerPolygon,
    pub fill: Rgb,
}

/// Dashed line drawn along the fault plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaultLine {
    pub from: Vertex,
    pub to: Vertex,
    pub color: Rgb,
    /// Stroke width in scene units
    pub width: f64,
    /// Dash and gap lengths in scene units
    pub dash: (f64, f64),
}

/// Symbol shown next to a legend label
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LegendMarker {
    Swatch(Rgb),
    DashedLine(Rgb),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub marker: LegendMarker,
    pub label: String,
}

/// Backend-independent drawing of the fault diagram.
///
/// Shapes are listed in paint order; the fault line is painted after them.
/// The legend sits outside the axes, to the right of `width`.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub width: f64,
    pub height: f64,
    pub state: FaultState,
    pub layers: Vec<LayerShape>,
    pub edge_color: Rgb,
    pub fault: FaultLine,
    pub legend: Vec<LegendEntry>,
    pub legend_text_color: Rgb,
}

/// Render the diagram for one fault state.
///
/// Pure and idempotent: the same `scene` and `state` always produce the same
/// figure, and the fault line is identical in both states.
pub fn render(scene: &SceneConfig, state: FaultState) -> Figure {
    let fault = FaultPlane::from_scene(scene);
    let layers = layer_polygons(scene, &fault, state)
        .into_iter()
        .map(|polygon| LayerShape {
            fill: scene.layers[polygon.layer].color,
            polygon,
        })
        .collect::<Vec<_>>();

    let mut legend: Vec<LegendEntry> = scene
        .layers
        .iter()
        .map(|layer| LegendEntry {
            marker: LegendMarker::Swatch(layer.color),
            label: layer.name.to_string(),
        })
        .collect();
    legend.push(LegendEntry {
        marker: LegendMarker::DashedLine(scene.legend_fault_color),
        label: "Fault plane".to_string(),
    });

    log::debug!(
        "rendered {} state: {} layer shapes, fault {:?} -> {:?}",
        state,
        layers.len(),
        fault.top,
        fault.bottom
    );

    Figure {
        width: scene.width,
        height: scene.height,
        state,
        layers,
        edge_color: scene.edge_color,
        fault: FaultLine {
            from: fault.top,
            to: fault.bottom,
            color: scene.fault_color,
            width: scene.fault_width,
            dash: scene.fault_dash,
        },
        legend,
        legend_text_color: scene.legend_text_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::Block;

    fn east_block(figure: &Figure) -> usize {
        figure
            .layers
            .iter()
            .filter(|shape| shape.polygon.block == Block::East)
            .count()
    }

    #[test]
    fn flat_figure_has_one_shape_per_layer() {
        let scene = SceneConfig::default();
        let figure = render(&scene, FaultState::Flat);
        assert_eq!(figure.layers.len(), 3);
        assert_eq!(east_block(&figure), 0);
        for (shape, style) in figure.layers.iter().zip(&scene.layers) {
            assert_eq!(shape.fill, style.color);
        }
    }

    #[test]
    fn displaced_figure_splits_every_layer() {
        let figure = render(&SceneConfig::default(), FaultState::Displaced);
        assert_eq!(figure.layers.len(), 6);
        assert_eq!(east_block(&figure), 3);
    }

    #[test]
    fn fault_line_is_the_same_in_both_states() {
        let scene = SceneConfig::default();
        let flat = render(&scene, FaultState::Flat);
        let displaced = render(&scene, FaultState::Displaced);
        assert_eq!(flat.fault, displaced.fault);
    }

    #[test]
    fn toggling_twice_renders_the_flat_figure_again() {
        let scene = SceneConfig::default();
        let initial = render(&scene, FaultState::Flat);
        let state = FaultState::Flat.toggled().toggled();
        assert_eq!(render(&scene, state), initial);
    }

    #[test]
    fn legend_lists_layers_then_fault() {
        let figure = render(&SceneConfig::default(), FaultState::Flat);
        let labels: Vec<_> = figure.legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Pinkstone", "Greenstone", "Yellowstone", "Fault plane"]);
        assert!(matches!(
            figure.legend[3].marker,
            LegendMarker::DashedLine(_)
        ));
    }
}
