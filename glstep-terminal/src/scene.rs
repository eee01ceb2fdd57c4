/// Demo scenes and the per-draw matrices they upload
use glstep_core::geometry::{
    CUBE, OCTAHEDRON, RECTANGLE, SOLID_CUBE, SOLID_CUBE_INDEX, WIRE_CUBE_INDEX,
};
use glstep_core::{Camera, Dimension, Matrix, NormalMatrix, Shape, Transform};

use crate::config::Demo;
use crate::window::ViewState;

/// Uniform values for one draw of the scene's shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub modelview: Matrix,
    pub projection: Matrix,
    pub normal_matrix: NormalMatrix,
}

impl Uniforms {
    pub fn new(modelview: Matrix, projection: Matrix) -> Self {
        Self {
            modelview,
            projection,
            normal_matrix: modelview.normal_matrix(),
        }
    }
}

pub struct Scene {
    demo: Demo,
    shape: Shape,
}

impl Scene {
    pub fn new(demo: Demo) -> Self {
        let shape = match demo {
            Demo::Rectangle => Shape::line_loop(Dimension::Two, &RECTANGLE),
            Demo::Octahedron => Shape::line_loop(Dimension::Three, &OCTAHEDRON),
            Demo::WireCube => Shape::lines_indexed(Dimension::Three, &CUBE, &WIRE_CUBE_INDEX),
            Demo::SolidCube => {
                Shape::triangles_indexed(Dimension::Three, &SOLID_CUBE, &SOLID_CUBE_INDEX)
            }
        };
        Self { demo, shape }
    }

    pub fn demo(&self) -> Demo {
        self.demo
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Uniforms for every draw of this frame, `angle` in radians
    pub fn draws(&self, view: &ViewState, angle: f32) -> Vec<Uniforms> {
        let [x, y] = view.location;
        match self.demo {
            Demo::Rectangle => {
                let h = 1.0 / (view.scale * 0.01);
                let w = h * view.aspect();
                let projection = Matrix::orthographic(-w, w, -h, h, -1.0, 1.0);
                vec![Uniforms::new(Matrix::translate(x, y, 0.0), projection)]
            }
            Demo::Octahedron | Demo::WireCube | Demo::SolidCube => {
                let camera = Camera::new(view.fovy(), view.aspect());
                let projection = camera.projection_matrix();
                let model = Transform::model_matrix([x, y, 0.0], angle, [0.0, 1.0, 0.0]);

                let modelview = camera.view_matrix() * model;
                // second copy, pushed back along the model's z axis
                let modelview1 = modelview * Matrix::translate(0.0, 0.0, 3.0);

                vec![
                    Uniforms::new(modelview, projection),
                    Uniforms::new(modelview1, projection),
                ]
            }
        }
    }
}
