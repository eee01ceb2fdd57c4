/// Vertex buffer objects and the draw calls that consume them
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::Vertex;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle naming one allocated buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Number of position components read from each vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Two,
    Three,
}

/// A vertex buffer plus an optional index buffer.
///
/// The object owns both buffers for its whole lifetime and releases them on
/// drop. It can be moved but not cloned; share it through [`Shape`].
#[derive(Debug)]
pub struct Object {
    id: ObjectId,
    dimension: Dimension,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Object {
    pub fn new(dimension: Dimension, vertices: &[Vertex], indices: &[u32]) -> Self {
        let id = ObjectId::next();
        log::debug!(
            "object {}: {} vertices, {} indices",
            id.get(),
            vertices.len(),
            indices.len()
        );
        Self {
            id,
            dimension,
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Vertex `i` as the vertex stage sees it: a 2D object reads z as 0.
    pub fn vertex(&self, i: usize) -> Option<Vertex> {
        let mut v = *self.vertices.get(i)?;
        if self.dimension == Dimension::Two {
            v.position[2] = 0.0;
        }
        Some(v)
    }

    pub fn index(&self, i: usize) -> Option<u32> {
        self.indices.get(i).copied()
    }
}

impl Drop for Object {
    fn drop(&mut self) {
        log::debug!("object {}: released", self.id.get());
    }
}

/// Primitive assembly mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    LineLoop,
    Lines,
    Triangles,
}

/// How a shape walks its buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    /// Consecutive vertices from the vertex buffer
    Arrays { primitive: Primitive, count: usize },
    /// Vertices picked through the index buffer
    Elements { primitive: Primitive, count: usize },
}

impl DrawCall {
    pub fn primitive(&self) -> Primitive {
        match *self {
            DrawCall::Arrays { primitive, .. } | DrawCall::Elements { primitive, .. } => primitive,
        }
    }
}

/// One assembled primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Assembled {
    Line([Vertex; 2]),
    Triangle([Vertex; 3]),
}

/// Something that rasterizes assembled primitives
pub trait DrawTarget {
    fn draw_line(&mut self, a: &Vertex, b: &Vertex);
    fn draw_triangle(&mut self, a: &Vertex, b: &Vertex, c: &Vertex);
}

/// A buffer object paired with the draw call that renders it
#[derive(Debug, Clone)]
pub struct Shape {
    object: Rc<Object>,
    draw: DrawCall,
}

impl Shape {
    pub fn new(object: Rc<Object>, draw: DrawCall) -> Self {
        Self { object, draw }
    }

    /// Outline through all vertices, closed back to the first
    pub fn line_loop(dimension: Dimension, vertices: &[Vertex]) -> Self {
        let object = Object::new(dimension, vertices, &[]);
        let draw = DrawCall::Arrays {
            primitive: Primitive::LineLoop,
            count: vertices.len(),
        };
        Self::new(Rc::new(object), draw)
    }

    /// Independent line segments, one per index pair
    pub fn lines_indexed(dimension: Dimension, vertices: &[Vertex], indices: &[u32]) -> Self {
        let object = Object::new(dimension, vertices, indices);
        let draw = DrawCall::Elements {
            primitive: Primitive::Lines,
            count: indices.len(),
        };
        Self::new(Rc::new(object), draw)
    }

    pub fn triangles(dimension: Dimension, vertices: &[Vertex]) -> Self {
        let object = Object::new(dimension, vertices, &[]);
        let draw = DrawCall::Arrays {
            primitive: Primitive::Triangles,
            count: vertices.len(),
        };
        Self::new(Rc::new(object), draw)
    }

    pub fn triangles_indexed(dimension: Dimension, vertices: &[Vertex], indices: &[u32]) -> Self {
        let object = Object::new(dimension, vertices, indices);
        let draw = DrawCall::Elements {
            primitive: Primitive::Triangles,
            count: indices.len(),
        };
        Self::new(Rc::new(object), draw)
    }

    /// Same buffers, different draw call
    pub fn with_draw_call(&self, draw: DrawCall) -> Self {
        Self::new(Rc::clone(&self.object), draw)
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn draw_call(&self) -> DrawCall {
        self.draw
    }

    /// The vertex sequence the draw call feeds to primitive assembly.
    ///
    /// Counts past the end of a buffer are truncated and indices that point
    /// outside the vertex buffer are skipped.
    pub fn vertex_stream(&self) -> Vec<Vertex> {
        match self.draw {
            DrawCall::Arrays { count, .. } => {
                let count = count.min(self.object.vertex_count());
                (0..count).filter_map(|i| self.object.vertex(i)).collect()
            }
            DrawCall::Elements { count, .. } => {
                let count = count.min(self.object.index_count());
                let mut stream = Vec::with_capacity(count);
                for i in 0..count {
                    let Some(index) = self.object.index(i) else {
                        continue;
                    };
                    match self.object.vertex(index as usize) {
                        Some(v) => stream.push(v),
                        None => log::warn!(
                            "object {}: index {} out of range ({} vertices)",
                            self.object.id().get(),
                            index,
                            self.object.vertex_count()
                        ),
                    }
                }
                stream
            }
        }
    }

    /// Assemble the vertex stream into lines or triangles
    pub fn primitives(&self) -> Vec<Assembled> {
        let stream = self.vertex_stream();
        match self.draw.primitive() {
            Primitive::LineLoop => {
                if stream.len() < 2 {
                    return Vec::new();
                }
                (0..stream.len())
                    .map(|i| Assembled::Line([stream[i], stream[(i + 1) % stream.len()]]))
                    .collect()
            }
            Primitive::Lines => stream
                .chunks_exact(2)
                .map(|pair| Assembled::Line([pair[0], pair[1]]))
                .collect(),
            Primitive::Triangles => stream
                .chunks_exact(3)
                .map(|tri| Assembled::Triangle([tri[0], tri[1], tri[2]]))
                .collect(),
        }
    }

    pub fn draw<T: DrawTarget>(&self, target: &mut T) {
        for primitive in self.primitives() {
            match primitive {
                Assembled::Line([a, b]) => target.draw_line(&a, &b),
                Assembled::Triangle([a, b, c]) => target.draw_triangle(&a, &b, &c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{
        CUBE, OCTAHEDRON, RECTANGLE, SOLID_CUBE, SOLID_CUBE_INDEX, WIRE_CUBE_INDEX,
    };

    #[derive(Default)]
    struct Counter {
        lines: usize,
        triangles: usize,
    }

    impl DrawTarget for Counter {
        fn draw_line(&mut self, _a: &Vertex, _b: &Vertex) {
            self.lines += 1;
        }

        fn draw_triangle(&mut self, _a: &Vertex, _b: &Vertex, _c: &Vertex) {
            self.triangles += 1;
        }
    }

    fn draw(shape: &Shape) -> Counter {
        let mut counter = Counter::default();
        shape.draw(&mut counter);
        counter
    }

    #[test]
    fn test_line_loop_closes() {
        let shape = Shape::line_loop(Dimension::Two, &RECTANGLE);
        let counter = draw(&shape);
        assert_eq!(counter.lines, 4);
        assert_eq!(counter.triangles, 0);

        let last = shape.primitives()[3];
        assert_eq!(last, Assembled::Line([RECTANGLE[3], RECTANGLE[0]]));
    }

    #[test]
    fn test_octahedron_outline() {
        let shape = Shape::line_loop(Dimension::Three, &OCTAHEDRON);
        assert_eq!(draw(&shape).lines, 12);
    }

    #[test]
    fn test_wire_cube_edges() {
        let shape = Shape::lines_indexed(Dimension::Three, &CUBE, &WIRE_CUBE_INDEX);
        assert_eq!(draw(&shape).lines, 12);
    }

    #[test]
    fn test_solid_cube_indexed_and_plain_agree() {
        let indexed = Shape::triangles_indexed(Dimension::Three, &SOLID_CUBE, &SOLID_CUBE_INDEX);
        let plain = Shape::triangles(Dimension::Three, &SOLID_CUBE);
        assert_eq!(draw(&indexed).triangles, 12);
        assert_eq!(indexed.primitives(), plain.primitives());
    }

    #[test]
    fn test_two_dimensional_object_drops_z() {
        let v = [Vertex::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0)];
        let object = Object::new(Dimension::Two, &v, &[]);
        assert_eq!(object.vertex(0).unwrap().position, [1.0, 2.0, 0.0]);
        assert!(object.vertex(1).is_none());
    }

    #[test]
    fn test_out_of_range_indices_are_skipped() {
        let shape = Shape::lines_indexed(Dimension::Three, &CUBE, &[0, 1, 2, 99, 3, 4]);
        assert_eq!(shape.vertex_stream().len(), 5);
        assert_eq!(draw(&shape).lines, 2);
    }

    #[test]
    fn test_count_is_truncated() {
        let shape = Shape::line_loop(Dimension::Two, &RECTANGLE).with_draw_call(DrawCall::Arrays {
            primitive: Primitive::Triangles,
            count: 100,
        });
        assert_eq!(shape.vertex_stream().len(), 4);
        assert_eq!(draw(&shape).triangles, 1);
    }

    #[test]
    fn test_shared_object() {
        let shape = Shape::lines_indexed(Dimension::Three, &CUBE, &WIRE_CUBE_INDEX);
        let loop_shape = shape.with_draw_call(DrawCall::Arrays {
            primitive: Primitive::LineLoop,
            count: CUBE.len(),
        });
        assert_eq!(shape.object().id(), loop_shape.object().id());
        assert_eq!(draw(&loop_shape).lines, 8);
    }

    #[test]
    fn test_object_ids_are_unique() {
        let a = Object::new(Dimension::Two, &RECTANGLE, &[]);
        let b = Object::new(Dimension::Two, &RECTANGLE, &[]);
        assert_ne!(a.id(), b.id());
    }
}
