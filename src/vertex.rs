/// Point in scene units, y pointing up
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub const fn new(x: f64, y: f64) -> Self {
        Vertex { x, y }
    }

    /// Returns the vertex moved by `(dx, dy)`
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Vertex::new(self.x + dx, self.y + dy)
    }
}
