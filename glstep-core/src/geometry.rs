//! Vertex layout and the demo meshes
//!
//! Attribute 0 is the position. Attribute 1 is a color for the wire shapes and
//! the face normal for the solid cube.

/// A vertex as laid out in the vertex buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32, r: f32, g: f32, b: f32) -> Self {
        Self {
            position: [x, y, z],
            color: [r, g, b],
        }
    }

    /// 2D vertex (z = 0) with no second attribute
    pub const fn flat(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 0.0, 0.0, 0.0)
    }

    /// The second attribute read as a normal
    pub fn normal(&self) -> [f32; 3] {
        self.color
    }
}

/// Unit normal of the counter-clockwise triangle `a, b, c`.
///
/// Degenerate triangles return the zero vector.
pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len == 0.0 {
        return [0.0; 3];
    }
    [n[0] / len, n[1] / len, n[2] / len]
}

pub const RECTANGLE: [Vertex; 4] = [
    Vertex::flat(-0.5, -0.5),
    Vertex::flat(0.5, -0.5),
    Vertex::flat(0.5, 0.5),
    Vertex::flat(-0.5, 0.5),
];

/// Octahedron outline drawn as a single line loop
pub const OCTAHEDRON: [Vertex; 12] = [
    Vertex::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0),
    Vertex::new(-1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    Vertex::new(0.0, -1.0, 0.0, 0.0, 0.0, 0.0),
    Vertex::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    Vertex::new(0.0, 1.0, 0.0, 0.0, 0.0, 0.0),
    Vertex::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0),
    Vertex::new(0.0, -1.0, 0.0, 0.0, 0.0, 0.0),
    Vertex::new(0.0, 0.0, -1.0, 0.0, 0.0, 0.0),
    Vertex::new(-1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    Vertex::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0),
    Vertex::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    Vertex::new(0.0, 0.0, -1.0, 0.0, 0.0, 0.0),
];

/// Cube corners, colored by position
pub const CUBE: [Vertex; 8] = [
    Vertex::new(-1.0, -1.0, -1.0, 0.0, 0.0, 0.0),
    Vertex::new(-1.0, -1.0, 1.0, 0.0, 0.0, 0.8),
    Vertex::new(-1.0, 1.0, 1.0, 0.0, 0.8, 0.0),
    Vertex::new(-1.0, 1.0, -1.0, 0.0, 0.8, 0.8),
    Vertex::new(1.0, 1.0, -1.0, 0.8, 0.0, 0.0),
    Vertex::new(1.0, -1.0, -1.0, 0.8, 0.0, 0.8),
    Vertex::new(1.0, -1.0, 1.0, 0.8, 0.8, 0.0),
    Vertex::new(1.0, 1.0, 1.0, 0.8, 0.8, 0.8),
];

/// The 12 cube edges as line pairs into [`CUBE`]
pub const WIRE_CUBE_INDEX: [u32; 24] = [
    1, 0, 2, 7, 3, 0, 4, 7, 5, 0, 6, 7, //
    1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 1,
];

/// Two triangles per face; the second attribute is the face normal
pub const SOLID_CUBE: [Vertex; 36] = [
    // left
    Vertex::new(-1.0, -1.0, -1.0, -1.0, 0.0, 0.0),
    Vertex::new(-1.0, -1.0, 1.0, -1.0, 0.0, 0.0),
    Vertex::new(-1.0, 1.0, 1.0, -1.0, 0.0, 0.0),
    Vertex::new(-1.0, -1.0, -1.0, -1.0, 0.0, 0.0),
    Vertex::new(-1.0, 1.0, 1.0, -1.0, 0.0, 0.0),
    Vertex::new(-1.0, 1.0, -1.0, -1.0, 0.0, 0.0),
    // back
    Vertex::new(1.0, -1.0, -1.0, 0.0, 0.0, -1.0),
    Vertex::new(-1.0, -1.0, -1.0, 0.0, 0.0, -1.0),
    Vertex::new(-1.0, 1.0, -1.0, 0.0, 0.0, -1.0),
    Vertex::new(1.0, -1.0, -1.0, 0.0, 0.0, -1.0),
    Vertex::new(-1.0, 1.0, -1.0, 0.0, 0.0, -1.0),
    Vertex::new(1.0, 1.0, -1.0, 0.0, 0.0, -1.0),
    // bottom
    Vertex::new(-1.0, -1.0, -1.0, 0.0, -1.0, 0.0),
    Vertex::new(1.0, -1.0, -1.0, 0.0, -1.0, 0.0),
    Vertex::new(1.0, -1.0, 1.0, 0.0, -1.0, 0.0),
    Vertex::new(-1.0, -1.0, -1.0, 0.0, -1.0, 0.0),
    Vertex::new(1.0, -1.0, 1.0, 0.0, -1.0, 0.0),
    Vertex::new(-1.0, -1.0, 1.0, 0.0, -1.0, 0.0),
    // right
    Vertex::new(1.0, -1.0, 1.0, 1.0, 0.0, 0.0),
    Vertex::new(1.0, -1.0, -1.0, 1.0, 0.0, 0.0),
    Vertex::new(1.0, 1.0, -1.0, 1.0, 0.0, 0.0),
    Vertex::new(1.0, -1.0, 1.0, 1.0, 0.0, 0.0),
    Vertex::new(1.0, 1.0, -1.0, 1.0, 0.0, 0.0),
    Vertex::new(1.0, 1.0, 1.0, 1.0, 0.0, 0.0),
    // top
    Vertex::new(-1.0, 1.0, -1.0, 0.0, 1.0, 0.0),
    Vertex::new(-1.0, 1.0, 1.0, 0.0, 1.0, 0.0),
    Vertex::new(1.0, 1.0, 1.0, 0.0, 1.0, 0.0),
    Vertex::new(-1.0, 1.0, -1.0, 0.0, 1.0, 0.0),
    Vertex::new(1.0, 1.0, 1.0, 0.0, 1.0, 0.0),
    Vertex::new(1.0, 1.0, -1.0, 0.0, 1.0, 0.0),
    // front
    Vertex::new(-1.0, -1.0, 1.0, 0.0, 0.0, 1.0),
    Vertex::new(1.0, -1.0, 1.0, 0.0, 0.0, 1.0),
    Vertex::new(1.0, 1.0, 1.0, 0.0, 0.0, 1.0),
    Vertex::new(-1.0, -1.0, 1.0, 0.0, 0.0, 1.0),
    Vertex::new(1.0, 1.0, 1.0, 0.0, 0.0, 1.0),
    Vertex::new(-1.0, 1.0, 1.0, 0.0, 0.0, 1.0),
];

pub const SOLID_CUBE_INDEX: [u32; 36] = [
    0, 1, 2, 3, 4, 5, // left
    6, 7, 8, 9, 10, 11, // back
    12, 13, 14, 15, 16, 17, // bottom
    18, 19, 20, 21, 22, 23, // right
    24, 25, 26, 27, 28, 29, // top
    30, 31, 32, 33, 34, 35, // front
];
