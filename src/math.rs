use crate::vertex::Vertex;

/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Slope of the line through two points
pub fn slope(a: Vertex, b: Vertex) -> f64 {
    (b.y - a.y) / (b.x - a.x)
}

/// x-coordinate where the line through `anchor` with slope `m` reaches height `y`
pub fn x_at_y(anchor: Vertex, m: f64, y: f64) -> f64 {
    (y - anchor.y) / m + anchor.x
}

/// Twice the signed area of a polygon, positive when wound counter-clockwise
pub fn signed_area2(points: &[[f64; 2]]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let [x0, y0] = points[i];
            let [x1, y1] = points[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum()
}
