//! Raster backend: draws a [`Figure`] into an RGBA pixel buffer.

use crate::figure::Figure;
use crate::math::{edge_function, signed_area2};
use crate::scene::Rgb;
use crate::vertex::Vertex;

/// RGBA8 pixel buffer with an optional clip rectangle
pub struct Canvas {
    width: usize,
    height: usize,
    pixel_data: Vec<u8>,
    /// Inclusive-exclusive pixel bounds `(x0, y0, x1, y1)` that writes are limited to
    clip: Option<(isize, isize, isize, isize)>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        let pixel_data = background.to_rgba8().repeat(width * height);
        Canvas {
            width,
            height,
            pixel_data,
            clip: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at `(x, y)`, or `None` outside the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        let px = &self.pixel_data[offset..offset + 3];
        Some(Rgb::new(px[0], px[1], px[2]))
    }

    pub fn set_clip(&mut self, clip: Option<(isize, isize, isize, isize)>) {
        self.clip = clip;
    }

    /// Writes one pixel; anything outside the buffer or clip is dropped
    fn put(&mut self, x: isize, y: isize, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return;
        }
        if let Some((x0, y0, x1, y1)) = self.clip {
            if x < x0 || y < y0 || x >= x1 || y >= y1 {
                return;
            }
        }
        let offset = (y as usize * self.width + x as usize) * 4;
        self.pixel_data[offset..offset + 4].copy_from_slice(&color.to_rgba8());
    }
}

/// Maps scene units to pixels with equal x/y scale, flipping y so it grows down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Pixels per scene unit
    pub scale: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    scene_height: f64,
}

impl Viewport {
    /// Largest viewport that fits a `scene_width` x `scene_height` scene into
    /// `pixel_width` x `pixel_height`, centered.
    pub fn fit(scene_width: f64, scene_height: f64, pixel_width: usize, pixel_height: usize) -> Self {
        let scale = (pixel_width as f64 / scene_width).min(pixel_height as f64 / scene_height);
        Viewport {
            scale,
            origin_x: (pixel_width as f64 - scene_width * scale) / 2.0,
            origin_y: (pixel_height as f64 - scene_height * scale) / 2.0,
            scene_height,
        }
    }

    /// Fixed `scale` pixels per unit with the scene's top-left corner at the origin
    pub fn with_scale(scale: f64, scene_height: f64) -> Self {
        Viewport {
            scale,
            origin_x: 0.0,
            origin_y: 0.0,
            scene_height,
        }
    }

    pub fn to_screen(&self, v: Vertex) -> [f64; 2] {
        [
            self.origin_x + v.x * self.scale,
            self.origin_y + (self.scene_height - v.y) * self.scale,
        ]
    }
}

/// Fills a triangle, testing pixel centers against each edge
pub fn draw_triangle(v0: &[f64; 2], v1: &[f64; 2], v2: &[f64; 2], canvas: &mut Canvas, color: Rgb) {
    // Compute bounding box of the triangle
    let min_x = v0[0].min(v1[0]).min(v2[0]).floor().max(0.0) as isize;
    let max_x = v0[0].max(v1[0]).max(v2[0]).ceil().min(canvas.width as f64 - 1.0) as isize;
    let min_y = v0[1].min(v1[1]).min(v2[1]).floor().max(0.0) as isize;
    let max_y = v0[1].max(v1[1]).max(v2[1]).ceil().min(canvas.height as f64 - 1.0) as isize;

    let area = edge_function(v0, v1, v2);
    if area == 0.0 {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f64 + 0.5, y as f64 + 0.5];

            let w0 = edge_function(v1, v2, &p);
            let w1 = edge_function(v2, v0, &p);
            let w2 = edge_function(v0, v1, &p);

            // Either winding counts as inside
            let inside = if area > 0.0 {
                w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
            } else {
                w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
            };
            if inside {
                canvas.put(x, y, color);
            }
        }
    }
}

/// Fills a convex polygon as a triangle fan
pub fn fill_polygon(points: &[[f64; 2]], canvas: &mut Canvas, color: Rgb) {
    if points.len() < 3 || signed_area2(points) == 0.0 {
        return;
    }
    for i in 1..points.len() - 1 {
        draw_triangle(&points[0], &points[i], &points[i + 1], canvas, color);
    }
}

/// Draws the closed outline of a polygon
pub fn stroke_polygon(points: &[[f64; 2]], canvas: &mut Canvas, color: Rgb) {
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        draw_line(a[0], a[1], b[0], b[1], canvas, color, 1);
    }
}

/// Draws a line between two points using Bresenham's algorithm.
///
/// `thickness` above one stamps a square brush centered on each step.
pub fn draw_line(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    canvas: &mut Canvas,
    color: Rgb,
    thickness: usize,
) {
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    let lo = -((thickness.max(1) as isize - 1) / 2);
    let hi = lo + thickness.max(1) as isize;

    loop {
        for by in lo..hi {
            for bx in lo..hi {
                canvas.put(x0 + bx, y0 + by, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a dashed line; the pattern starts with a dash at `from`
pub fn draw_dashed_line(
    from: [f64; 2],
    to: [f64; 2],
    dash: f64,
    gap: f64,
    canvas: &mut Canvas,
    color: Rgb,
    thickness: usize,
) {
    let (vx, vy) = (to[0] - from[0], to[1] - from[1]);
    let length = vx.hypot(vy);
    if dash <= 0.0 || gap <= 0.0 || length <= dash {
        draw_line(from[0], from[1], to[0], to[1], canvas, color, thickness);
        return;
    }
    let (ux, uy) = (vx / length, vy / length);
    let mut t = 0.0;
    while t < length {
        let end = (t + dash).min(length);
        draw_line(
            from[0] + ux * t,
            from[1] + uy * t,
            from[0] + ux * end,
            from[1] + uy * end,
            canvas,
            color,
            thickness,
        );
        t += dash + gap;
    }
}

/// Paints a figure: layer fills with outlines, then the fault line on top.
///
/// Layers are clipped to the axes so blocks shifted past the margin are cut
/// off at the canvas edge.
pub fn rasterize(figure: &Figure, viewport: &Viewport, canvas: &mut Canvas) {
    let [ax0, ay0] = viewport.to_screen(Vertex::new(0.0, figure.height));
    let [ax1, ay1] = viewport.to_screen(Vertex::new(figure.width, 0.0));
    canvas.set_clip(Some((
        ax0.round() as isize,
        ay0.round() as isize,
        ax1.round() as isize,
        ay1.round() as isize,
    )));

    for shape in &figure.layers {
        let points: Vec<[f64; 2]> = shape
            .polygon
            .vertices
            .iter()
            .map(|&v| viewport.to_screen(v))
            .collect();
        fill_polygon(&points, canvas, shape.fill);
        stroke_polygon(&points, canvas, figure.edge_color);
    }

    let fault = &figure.fault;
    let thickness = (fault.width * viewport.scale).round().max(1.0) as usize;
    draw_dashed_line(
        viewport.to_screen(fault.from),
        viewport.to_screen(fault.to),
        fault.dash.0 * viewport.scale,
        fault.dash.1 * viewport.scale,
        canvas,
        fault.color,
        thickness,
    );

    canvas.set_clip(None);
    log::trace!(
        "rasterized {} shapes into {}x{} at {:.2} px/unit",
        figure.layers.len(),
        canvas.width,
        canvas.height,
        viewport.scale
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::render;
    use crate::scene::SceneConfig;
    use crate::state::FaultState;

    fn draw(state: FaultState, width: usize, height: usize) -> (Canvas, Viewport, SceneConfig) {
        let scene = SceneConfig::default();
        let figure = render(&scene, state);
        let viewport = Viewport::fit(scene.width, scene.height, width, height);
        let mut canvas = Canvas::new(width, height, Rgb::WHITE);
        rasterize(&figure, &viewport, &mut canvas);
        (canvas, viewport, scene)
    }

    fn color_at(canvas: &Canvas, viewport: &Viewport, x: f64, y: f64) -> Option<Rgb> {
        let [px, py] = viewport.to_screen(Vertex::new(x, y));
        canvas.pixel(px as usize, py as usize)
    }

    #[test]
    fn viewport_keeps_equal_aspect_and_centers() {
        let viewport = Viewport::fit(8.0, 4.0, 800, 600);
        assert_eq!(viewport.scale, 100.0);
        assert_eq!(viewport.origin_x, 0.0);
        assert_eq!(viewport.origin_y, 100.0);
        assert_eq!(viewport.to_screen(Vertex::new(0.0, 4.0)), [0.0, 100.0]);
        assert_eq!(viewport.to_screen(Vertex::new(8.0, 0.0)), [800.0, 500.0]);
    }

    #[test]
    fn flat_layers_show_their_colors() {
        let (canvas, viewport, scene) = draw(FaultState::Flat, 800, 400);
        for (i, layer) in scene.layers.iter().enumerate() {
            let y = scene.margin + (i as f64 + 0.5) * scene.layer_thickness();
            // Left of where the fault reaches any layer
            assert_eq!(color_at(&canvas, &viewport, 0.5, y), Some(layer.color));
        }
        assert_eq!(color_at(&canvas, &viewport, 0.1, 2.0), Some(Rgb::WHITE));
    }

    #[test]
    fn fault_line_is_painted_over_layers() {
        let (canvas, viewport, scene) = draw(FaultState::Flat, 800, 400);
        assert_eq!(color_at(&canvas, &viewport, 5.0, 0.2), Some(scene.fault_color));
    }

    #[test]
    fn hanging_wall_drops_when_displaced() {
        let (flat, viewport, scene) = draw(FaultState::Flat, 800, 400);
        let (moved, _, _) = draw(FaultState::Displaced, 800, 400);
        assert_eq!(color_at(&flat, &viewport, 6.0, 1.3), Some(scene.layers[0].color));
        assert_eq!(color_at(&moved, &viewport, 6.0, 1.3), Some(scene.layers[1].color));
        // Footwall stays put
        assert_eq!(color_at(&moved, &viewport, 1.0, 0.8), Some(scene.layers[0].color));
    }

    #[test]
    fn shifted_block_is_clipped_to_the_axes() {
        let (canvas, viewport, scene) = draw(FaultState::Displaced, 800, 600);
        assert_eq!(color_at(&canvas, &viewport, 7.0, 0.1), Some(scene.layers[0].color));
        assert_eq!(color_at(&canvas, &viewport, 7.0, -0.3), Some(Rgb::WHITE));
    }

    #[test]
    fn lines_off_canvas_are_dropped() {
        let mut canvas = Canvas::new(4, 4, Rgb::WHITE);
        draw_line(-10.0, -10.0, 20.0, 20.0, &mut canvas, Rgb::GRAY, 3);
        assert_eq!(canvas.pixel(2, 2), Some(Rgb::GRAY));
        assert_eq!(canvas.pixel(4, 4), None);
    }

    #[test]
    fn dashes_leave_gaps() {
        let mut canvas = Canvas::new(40, 1, Rgb::WHITE);
        draw_dashed_line([0.0, 0.0], [39.0, 0.0], 5.0, 5.0, &mut canvas, Rgb::GRAY, 1);
        assert_eq!(canvas.pixel(2, 0), Some(Rgb::GRAY));
        assert_eq!(canvas.pixel(8, 0), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(12, 0), Some(Rgb::GRAY));
    }

    #[test]
    fn either_winding_fills() {
        let mut canvas = Canvas::new(10, 10, Rgb::WHITE);
        let square = [[1.0, 1.0], [9.0, 1.0], [9.0, 9.0], [1.0, 9.0]];
        fill_polygon(&square, &mut canvas, Rgb::GRAY);
        assert_eq!(canvas.pixel(5, 5), Some(Rgb::GRAY));

        let mut canvas = Canvas::new(10, 10, Rgb::WHITE);
        let mut reversed = square;
        reversed.reverse();
        fill_polygon(&reversed, &mut canvas, Rgb::GRAY);
        assert_eq!(canvas.pixel(5, 5), Some(Rgb::GRAY));
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::WHITE));
    }
}
