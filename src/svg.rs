//! Vector backend: serializes a [`Figure`] as a standalone SVG document.

use crate::figure::{Figure, LegendMarker};
use crate::graphics::Viewport;
use crate::scene::Rgb;
use crate::vertex::Vertex;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Width of the legend panel right of the axes, in scene units
pub const LEGEND_WIDTH: f64 = 2.2;
const LEGEND_ROW: f64 = 0.38;
const LEGEND_PAD: f64 = 0.15;
const SWATCH: f64 = 0.22;

pub fn render_svg(figure: &Figure, scale: f64) -> String {
    let plot_w = figure.width * scale;
    let plot_h = figure.height * scale;
    let total_w = (figure.width + LEGEND_WIDTH) * scale;
    let viewport = Viewport::with_scale(scale, figure.height);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{total_w:.0}\" height=\"{plot_h:.0}\" viewBox=\"0 0 {total_w:.2} {plot_h:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"{total_w:.2}\" height=\"{plot_h:.2}\" fill=\"{}\"/>",
        Rgb::WHITE
    ));
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<clipPath id=\"axes\"><rect x=\"0\" y=\"0\" width=\"{plot_w:.2}\" height=\"{plot_h:.2}\"/></clipPath>",
    ));
    svg.push_str("</defs>");

    svg.push_str("<g clip-path=\"url(#axes)\">");
    for shape in &figure.layers {
        let points = shape
            .polygon
            .vertices
            .iter()
            .map(|&v| {
                let [x, y] = viewport.to_screen(v);
                format!("{x:.2},{y:.2}")
            })
            .collect::<Vec<_>>()
            .join(" ");
        svg.push_str(&format!(
            "<polygon points=\"{points}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            shape.fill, figure.edge_color
        ));
    }

    let fault = &figure.fault;
    let [x1, y1] = viewport.to_screen(fault.from);
    let [x2, y2] = viewport.to_screen(fault.to);
    svg.push_str(&format!(
        "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-dasharray=\"{:.2} {:.2}\"/>",
        fault.color,
        fault.width * scale,
        fault.dash.0 * scale,
        fault.dash.1 * scale,
    ));
    svg.push_str("</g>");

    svg.push_str(&legend_svg(figure, &viewport, scale));
    svg.push_str("</svg>");
    svg
}

/// Framed legend, vertically centered just right of the axes
fn legend_svg(figure: &Figure, viewport: &Viewport, scale: f64) -> String {
    let rows = figure.legend.len() as f64;
    let frame_h = rows * LEGEND_ROW + 2.0 * LEGEND_PAD;
    let frame_w = LEGEND_WIDTH - 2.0 * LEGEND_PAD;
    let left = figure.width + LEGEND_PAD;
    let top = (figure.height + frame_h) / 2.0;
    let [fx, fy] = viewport.to_screen(Vertex::new(left, top));

    let mut svg = String::new();
    svg.push_str("<g font-family=\"sans-serif\">");
    svg.push_str(&format!(
        "<rect x=\"{fx:.2}\" y=\"{fy:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" fill=\"{}\" stroke=\"#cccccc\"/>",
        frame_w * scale,
        frame_h * scale,
        Rgb::WHITE
    ));

    for (i, entry) in figure.legend.iter().enumerate() {
        let row_y = top - LEGEND_PAD - (i as f64 + 0.5) * LEGEND_ROW;
        let [mx, my] = viewport.to_screen(Vertex::new(left + LEGEND_PAD, row_y));
        match entry.marker {
            LegendMarker::Swatch(color) => {
                let s = SWATCH * scale;
                svg.push_str(&format!(
                    "<rect x=\"{mx:.2}\" y=\"{:.2}\" width=\"{s:.2}\" height=\"{s:.2}\" fill=\"{color}\"/>",
                    my - s / 2.0,
                ));
            }
            LegendMarker::DashedLine(color) => {
                svg.push_str(&format!(
                    "<line x1=\"{mx:.2}\" y1=\"{my:.2}\" x2=\"{:.2}\" y2=\"{my:.2}\" stroke=\"{color}\" stroke-width=\"{:.2}\" stroke-dasharray=\"{:.2} {:.2}\"/>",
                    mx + 0.4 * scale,
                    figure.fault.width * scale,
                    figure.fault.dash.0 * scale * 0.5,
                    figure.fault.dash.1 * scale * 0.5,
                ));
            }
        }
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{my:.2}\" dominant-baseline=\"middle\" font-size=\"{:.1}\" fill=\"{}\">{}</text>",
            mx + 0.55 * scale,
            0.2 * scale,
            figure.legend_text_color,
            escape_xml(&entry.label)
        ));
    }
    svg.push_str("</g>");
    svg
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Writes the document to `output`, or to stdout when `output` is `None`
pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {} bytes to {}", svg.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(svg.as_bytes())
                .and_then(|_| stdout.flush())
                .context("failed to write SVG to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::render;
    use crate::scene::SceneConfig;
    use crate::state::FaultState;

    #[test]
    fn flat_document_has_one_polygon_per_layer() {
        let svg = render_svg(&render(&SceneConfig::default(), FaultState::Flat), 100.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<polygon").count(), 3);
        assert!(svg.contains("width=\"1020\""));
    }

    #[test]
    fn displaced_document_splits_layers() {
        let svg = render_svg(&render(&SceneConfig::default(), FaultState::Displaced), 100.0);
        assert_eq!(svg.matches("<polygon").count(), 6);
    }

    #[test]
    fn fault_line_is_dashed_between_anchors() {
        let svg = render_svg(&render(&SceneConfig::default(), FaultState::Flat), 100.0);
        assert!(svg.contains(
            "<line x1=\"500.00\" y1=\"380.00\" x2=\"140.00\" y2=\"20.00\" stroke=\"#b85c2b\""
        ));
        assert!(svg.contains("stroke-dasharray=\"15.00 7.00\""));
    }

    #[test]
    fn fractional_scale_keeps_geometry_and_strokes_aligned() {
        let svg = render_svg(&render(&SceneConfig::default(), FaultState::Flat), 0.33);
        assert!(svg.contains("<line x1=\"1.65\" y1=\"1.25\""));
        assert!(svg.contains("stroke-width=\"0.01\""));
        assert!(svg.contains("<polygon points=\"0.07,1.25 2.57,1.25 2.57,0.86 0.07,0.86\""));
    }

    #[test]
    fn legend_names_every_layer() {
        let svg = render_svg(&render(&SceneConfig::default(), FaultState::Flat), 100.0);
        for name in ["Pinkstone", "Greenstone", "Yellowstone", "Fault plane"] {
            assert!(svg.contains(&format!(">{name}</text>")), "missing {name}");
        }
    }

    #[test]
    fn escapes_markup_in_labels() {
        assert_eq!(escape_xml("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
    }

    #[test]
    fn writes_document_to_file() {
        let path = std::env::temp_dir().join(format!("normal-fault-{}.svg", std::process::id()));
        write_output_svg("<svg/>", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg/>");
        std::fs::remove_file(&path).unwrap();
    }
}
