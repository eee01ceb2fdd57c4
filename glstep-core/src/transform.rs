/// Model transforms
use crate::matrix::Matrix;

/// Transform builder for model matrices
pub struct Transform;

impl Transform {
    /// Model matrix that spins an object by `angle` about `axis` and then
    /// moves it to `location`.
    pub fn model_matrix(location: [f32; 3], angle: f32, axis: [f32; 3]) -> Matrix {
        Matrix::translate(location[0], location[1], location[2])
            * Matrix::rotate(angle, axis[0], axis[1], axis[2])
    }
}
