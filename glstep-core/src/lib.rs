/// glstep Core Library - Transform math and the scaffold around it
///
/// This library provides the column-major matrix helpers a shader program
/// consumes, plus the small pieces the demos are assembled from: camera
/// setup, vertex data, buffer objects with their draw calls, and shader
/// source loading.

pub mod geometry;
pub mod matrix;
pub mod projection;
pub mod shader;
pub mod shape;
pub mod transform;

// Re-export commonly used types
pub use geometry::Vertex;
pub use matrix::{Matrix, NormalMatrix};
pub use projection::{Camera, ScreenPoint};
pub use shader::{ProgramInterface, ProgramSource, ShaderError};
pub use shape::{Dimension, DrawCall, DrawTarget, Object, Primitive, Shape};
pub use transform::Transform;
