/// Column-major 4x4 matrices for OpenGL-style uniform upload
///
/// Every factory is a pure function of its scalar inputs. Degenerate geometric
/// input never produces NaN or infinity: it yields a documented default
/// (identity, a bare translation, or the all-zero matrix) instead.
use std::ops::{Index, IndexMut, Mul, MulAssign};

use nalgebra::{Matrix3, Matrix4};

/// A 4x4 matrix stored column-major (`index = column * 4 + row`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    data: [f32; 16],
}

/// A 3x3 column-major matrix, the layout `glUniformMatrix3fv` expects.
pub type NormalMatrix = [f32; 9];

impl Matrix {
    pub const fn from_array(data: [f32; 16]) -> Self {
        Self { data }
    }

    /// The all-zero matrix, returned by the projections for an empty volume.
    pub const fn zero() -> Self {
        Self { data: [0.0; 16] }
    }

    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Raw column-major storage, ready for a uniform upload.
    pub fn data(&self) -> &[f32; 16] {
        &self.data
    }

    /// Elements of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= 4`.
    pub fn row(&self, row: usize) -> [f32; 4] {
        assert!(row < 4, "matrix row {row} out of range");
        [
            self.data[row],
            self.data[4 + row],
            self.data[8 + row],
            self.data[12 + row],
        ]
    }

    /// Elements of column `column`.
    ///
    /// # Panics
    ///
    /// Panics if `column >= 4`.
    pub fn column(&self, column: usize) -> [f32; 4] {
        assert!(column < 4, "matrix column {column} out of range");
        let k = column * 4;
        [self.data[k], self.data[k + 1], self.data[k + 2], self.data[k + 3]]
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        let mut t = Self::identity();
        t.data[12] = x;
        t.data[13] = y;
        t.data[14] = z;
        t
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut t = Self::identity();
        t.data[0] = x;
        t.data[5] = y;
        t.data[10] = z;
        t
    }

    /// Rotation of `angle` radians about the axis `(x, y, z)`.
    ///
    /// The axis is normalized first. A zero-length axis has no direction to
    /// rotate about, so the identity is returned.
    pub fn rotate(angle: f32, x: f32, y: f32, z: f32) -> Self {
        let d = (x * x + y * y + z * z).sqrt();
        if d <= 0.0 {
            return Self::identity();
        }

        let (l, m, n) = (x / d, y / d, z / d);
        let (l2, m2, n2) = (l * l, m * m, n * n);
        let (lm, mn, nl) = (l * m, m * n, n * l);
        let (s, c) = angle.sin_cos();
        let c1 = 1.0 - c;

        let mut t = Self::identity();
        t.data[0] = l2 * c1 + c;
        t.data[1] = lm * c1 + n * s;
        t.data[2] = nl * c1 - m * s;
        t.data[4] = lm * c1 - n * s;
        t.data[5] = m2 * c1 + c;
        t.data[6] = mn * c1 + l * s;
        t.data[8] = nl * c1 + m * s;
        t.data[9] = mn * c1 - l * s;
        t.data[10] = n2 * c1 + c;
        t
    }

    /// View matrix for a camera at `eye` looking at `target`.
    ///
    /// Rows 0..2 of the rotation part hold the camera's right, up and backward
    /// axes. When `up` is parallel to the viewing direction (or `eye` equals
    /// `target`) the basis cannot be built and only the eye translation is
    /// returned.
    #[allow(clippy::too_many_arguments)]
    pub fn look_at(
        ex: f32, ey: f32, ez: f32,
        gx: f32, gy: f32, gz: f32,
        ux: f32, uy: f32, uz: f32,
    ) -> Self {
        let tv = Self::translate(-ex, -ey, -ez);

        // backward (t), right (r = up x t), true up (s = t x r)
        let (tx, ty, tz) = (ex - gx, ey - gy, ez - gz);
        let (rx, ry, rz) = (uy * tz - uz * ty, uz * tx - ux * tz, ux * ty - uy * tx);
        let (sx, sy, sz) = (ty * rz - tz * ry, tz * rx - tx * rz, tx * ry - ty * rx);

        let s2 = sx * sx + sy * sy + sz * sz;
        if s2 == 0.0 {
            log::warn!("look_at: up vector is parallel to the view direction");
            return tv;
        }

        let mut rv = Self::identity();

        let r = (rx * rx + ry * ry + rz * rz).sqrt();
        rv.data[0] = rx / r;
        rv.data[4] = ry / r;
        rv.data[8] = rz / r;

        let s = s2.sqrt();
        rv.data[1] = sx / s;
        rv.data[5] = sy / s;
        rv.data[9] = sz / s;

        let t = (tx * tx + ty * ty + tz * tz).sqrt();
        rv.data[2] = tx / t;
        rv.data[6] = ty / t;
        rv.data[10] = tz / t;

        rv * tv
    }

    /// OpenGL orthographic projection (`glOrtho`).
    ///
    /// Returns [`Matrix::zero`] when any span of the volume is zero.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let dx = right - left;
        let dy = top - bottom;
        let dz = far - near;
        if dx == 0.0 || dy == 0.0 || dz == 0.0 {
            return Self::zero();
        }

        let mut t = Self::identity();
        t.data[0] = 2.0 / dx;
        t.data[5] = 2.0 / dy;
        t.data[10] = -2.0 / dz;
        t.data[12] = -(right + left) / dx;
        t.data[13] = -(top + bottom) / dy;
        t.data[14] = -(far + near) / dz;
        t
    }

    /// OpenGL perspective frustum (`glFrustum`).
    ///
    /// Returns [`Matrix::zero`] when any span of the volume is zero.
    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let dx = right - left;
        let dy = top - bottom;
        let dz = far - near;
        if dx == 0.0 || dy == 0.0 || dz == 0.0 {
            return Self::zero();
        }

        let mut t = Self::zero();
        t.data[0] = 2.0 * near / dx;
        t.data[5] = 2.0 * near / dy;
        t.data[8] = (right + left) / dx;
        t.data[9] = (top + bottom) / dy;
        t.data[10] = -(far + near) / dz;
        t.data[11] = -1.0;
        t.data[14] = -2.0 * far * near / dz;
        t
    }

    /// Symmetric frustum from a vertical field of view in radians.
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        let dy = near * (fovy * 0.5).tan();
        let dx = dy * aspect;
        Self::frustum(-dx, dx, -dy, dy, near, far)
    }

    /// Column-major product: column `k` of the result is `self` applied to
    /// column `k` of `rhs`.
    pub fn multiply(&self, rhs: &Matrix) -> Matrix {
        let mut t = Self::zero();
        for (i, out) in t.data.iter_mut().enumerate() {
            let j = i & 3;
            let k = i & !3;
            *out = self.data[j] * rhs.data[k]
                + self.data[4 + j] * rhs.data[k + 1]
                + self.data[8 + j] * rhs.data[k + 2]
                + self.data[12 + j] * rhs.data[k + 3];
        }
        t
    }

    /// Transforms a point (w = 1) and returns the homogeneous result.
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 4] {
        let m = &self.data;
        let mut out = [0.0; 4];
        for (r, o) in out.iter_mut().enumerate() {
            *o = m[r] * p[0] + m[4 + r] * p[1] + m[8 + r] * p[2] + m[12 + r];
        }
        out
    }

    /// Upper-left 3x3 block, column-major.
    ///
    /// Usable as a normal matrix only when the transform has no non-uniform
    /// scale or shear; prefer [`Matrix::normal_matrix`] otherwise.
    pub fn upper_3x3(&self) -> NormalMatrix {
        let m = &self.data;
        [m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]]
    }

    /// Matrix for transforming surface normals by this model-view matrix:
    /// the inverse-transpose of its upper-left 3x3.
    ///
    /// A singular 3x3 has no inverse; the raw block is returned in that case.
    pub fn normal_matrix(&self) -> NormalMatrix {
        let upper = self.upper_3x3();
        match Matrix3::from_column_slice(&upper).try_inverse() {
            Some(inverse) => {
                let mut out = [0.0; 9];
                out.copy_from_slice(inverse.transpose().as_slice());
                out
            }
            None => {
                log::warn!("normal_matrix: singular model-view, using upper 3x3");
                upper
            }
        }
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Largest absolute element-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &Matrix) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<usize> for Matrix {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.data[index]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.data[index]
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        self.multiply(&rhs)
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        self.multiply(rhs)
    }
}

impl MulAssign for Matrix {
    fn mul_assign(&mut self, rhs: Matrix) {
        *self = self.multiply(&rhs);
    }
}

impl From<Matrix4<f32>> for Matrix {
    fn from(m: Matrix4<f32>) -> Self {
        let mut data = [0.0; 16];
        data.copy_from_slice(m.as_slice());
        Self { data }
    }
}

impl From<Matrix> for Matrix4<f32> {
    fn from(m: Matrix) -> Self {
        Matrix4::from_column_slice(&m.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Rotation3, Unit, Vector3};

    const EPS: f32 = 1e-5;

    fn sample() -> Matrix {
        Matrix::from_array([
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            13.0, 14.0, 15.0, 16.0,
        ])
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = sample();
        assert_eq!(Matrix::identity() * m, m);
        assert_eq!(m * Matrix::identity(), m);
    }

    #[test]
    fn test_multiply_matches_nalgebra() {
        let a = Matrix::rotate(0.7, 1.0, 2.0, 3.0) * Matrix::translate(1.0, -2.0, 0.5);
        let b = sample();
        let expected: Matrix = (Matrix4::from(a) * Matrix4::from(b)).into();
        assert!((a * b).max_abs_diff(&expected) < 1e-4);
    }

    #[test]
    fn test_translate_moves_origin() {
        let p = Matrix::translate(1.0, 2.0, 3.0).transform_point([0.0, 0.0, 0.0]);
        assert_eq!(p, [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_translate_round_trip() {
        let (x, y, z) = (3.5, -1.25, 8.0);
        let m = Matrix::translate(x, y, z) * Matrix::translate(-x, -y, -z);
        assert!(m.max_abs_diff(&Matrix::identity()) < EPS);
    }

    #[test]
    fn test_scale_diagonal() {
        let p = Matrix::scale(2.0, 3.0, 4.0).transform_point([1.0, 1.0, 1.0]);
        assert_eq!(p, [2.0, 3.0, 4.0, 1.0]);
    }

    #[test]
    fn test_rotate_zero_angle() {
        assert!(Matrix::rotate(0.0, 1.0, 0.0, 0.0).max_abs_diff(&Matrix::identity()) < EPS);
    }

    #[test]
    fn test_rotate_zero_axis() {
        assert_eq!(Matrix::rotate(1.3, 0.0, 0.0, 0.0), Matrix::identity());
    }

    #[test]
    fn test_rotate_matches_nalgebra() {
        let axis = Unit::new_normalize(Vector3::new(1.0, -2.0, 0.5));
        let expected: Matrix = Rotation3::from_axis_angle(&axis, 1.1).to_homogeneous().into();
        let m = Matrix::rotate(1.1, 1.0, -2.0, 0.5);
        assert!(m.max_abs_diff(&expected) < EPS);
    }

    #[test]
    fn test_rotate_quarter_turn_about_y() {
        let p = Matrix::rotate(std::f32::consts::FRAC_PI_2, 0.0, 1.0, 0.0)
            .transform_point([1.0, 0.0, 0.0]);
        assert!(p[0].abs() < EPS);
        assert!((p[2] + 1.0).abs() < EPS);
    }

    #[test]
    fn test_look_at_forward_row() {
        let view = Matrix::look_at(0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        let row = view.row(2);
        assert!(row[0].abs() < EPS);
        assert!(row[1].abs() < EPS);
        assert!((row[2] - 1.0).abs() < EPS);
        assert!((row[3] + 5.0).abs() < EPS);

        let eye = view.transform_point([0.0, 0.0, 5.0]);
        assert!(eye[0].abs() < EPS && eye[1].abs() < EPS && eye[2].abs() < EPS);
    }

    #[test]
    fn test_look_at_matches_nalgebra() {
        let view = Matrix::look_at(3.0, 4.0, 5.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        let expected: Matrix = Matrix4::look_at_rh(
            &Point3::new(3.0, 4.0, 5.0),
            &Point3::origin(),
            &Vector3::y(),
        )
        .into();
        assert!(view.max_abs_diff(&expected) < EPS);
    }

    #[test]
    fn test_look_at_parallel_up_falls_back_to_translation() {
        let view = Matrix::look_at(0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        assert_eq!(view, Matrix::translate(0.0, -5.0, 0.0));

        let same = Matrix::look_at(1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 0.0, 1.0, 0.0);
        assert_eq!(same, Matrix::translate(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_orthographic_matches_nalgebra() {
        let m = Matrix::orthographic(-2.0, 3.0, -1.0, 4.0, 0.5, 20.0);
        let expected: Matrix = Matrix4::new_orthographic(-2.0, 3.0, -1.0, 4.0, 0.5, 20.0).into();
        assert!(m.max_abs_diff(&expected) < EPS);
    }

    #[test]
    fn test_frustum_degenerate_is_zero() {
        for m in [
            Matrix::frustum(1.0, 1.0, -1.0, 1.0, 1.0, 10.0),
            Matrix::frustum(-1.0, 1.0, 2.0, 2.0, 1.0, 10.0),
            Matrix::frustum(-1.0, 1.0, -1.0, 1.0, 3.0, 3.0),
            Matrix::orthographic(0.0, 0.0, -1.0, 1.0, -1.0, 1.0),
            Matrix::perspective(1.0, 0.0, 1.0, 10.0),
        ] {
            assert_eq!(m, Matrix::zero());
            assert!(m.is_finite());
        }
    }

    #[test]
    fn test_frustum_maps_near_corners() {
        let m = Matrix::frustum(-1.0, 2.0, -0.5, 1.5, 1.0, 10.0);
        let clip = m.transform_point([2.0, 1.5, -1.0]);
        assert!((clip[0] / clip[3] - 1.0).abs() < EPS);
        assert!((clip[1] / clip[3] - 1.0).abs() < EPS);
        assert!((clip[2] / clip[3] + 1.0).abs() < EPS);
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let m = Matrix::perspective(1.0, 4.0 / 3.0, 1.0, 10.0);
        let expected: Matrix = Matrix4::new_perspective(4.0 / 3.0, 1.0, 1.0, 10.0).into();
        assert!(m.max_abs_diff(&expected) < EPS);
    }

    #[test]
    fn test_normal_matrix_of_rotation_is_upper_block() {
        let m = Matrix::rotate(0.4, 0.0, 1.0, 1.0) * Matrix::translate(1.0, 2.0, 3.0);
        let n = m.normal_matrix();
        let u = m.upper_3x3();
        for (a, b) in n.iter().zip(u.iter()) {
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn test_normal_matrix_handles_nonuniform_scale() {
        let m = Matrix::scale(4.0, 1.0, 1.0);
        let n = Matrix3::from_column_slice(&m.normal_matrix());

        // surface x + y = 0: tangent (1, -1, 0), normal (1, 1, 0)
        let tangent = Matrix3::from_column_slice(&m.upper_3x3()) * Vector3::new(1.0, -1.0, 0.0);
        let normal = n * Vector3::new(1.0, 1.0, 0.0);
        assert!(tangent.dot(&normal).abs() < EPS);
    }

    #[test]
    fn test_normal_matrix_singular_falls_back() {
        let m = Matrix::scale(1.0, 0.0, 1.0);
        assert_eq!(m.normal_matrix(), m.upper_3x3());
    }

    #[test]
    fn test_rows_and_columns() {
        let m = Matrix::translate(1.0, 2.0, 3.0);
        assert_eq!(m.row(0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(m.column(3), [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_row_out_of_range() {
        Matrix::identity().row(4);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_column_out_of_range() {
        Matrix::identity().column(4);
    }
}
