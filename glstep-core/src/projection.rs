/// Camera and projection utilities
use crate::matrix::Matrix;

/// A projected vertex: screen position in cells plus NDC depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fovy: f32, aspect: f32) -> Self {
        Self {
            eye: [3.0, 4.0, 5.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fovy,
            aspect,
            near: 1.0,
            far: 10.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix {
        let [ex, ey, ez] = self.eye;
        let [gx, gy, gz] = self.target;
        let [ux, uy, uz] = self.up;
        Matrix::look_at(ex, ey, ez, gx, gy, gz, ux, uy, uz)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix {
        Matrix::perspective(self.fovy, self.aspect, self.near, self.far)
    }

    /// Distance from the eye to the look-at target
    pub fn distance(&self) -> f32 {
        let d = [
            self.eye[0] - self.target[0],
            self.eye[1] - self.target[1],
            self.eye[2] - self.target[2],
        ];
        (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Perspective divide and viewport mapping for a clip-space position.
///
/// Points behind the eye or outside the NDC cube (including in front of the
/// near plane or beyond the far plane) are rejected.
pub fn clip_to_screen(clip: [f32; 4], width: u32, height: u32) -> Option<ScreenPoint> {
    let w = clip[3];

    // Prevent division by near-zero or negative w (behind the eye)
    if w < 1e-6 {
        return None;
    }

    let ndc_x = clip[0] / w;
    let ndc_y = clip[1] / w;
    let ndc_z = clip[2] / w;

    // Clip test
    let inside = |v: f32| (-1.0..=1.0).contains(&v);
    if !inside(ndc_x) || !inside(ndc_y) || !inside(ndc_z) {
        return None;
    }

    Some(ScreenPoint {
        x: (ndc_x + 1.0) * 0.5 * width as f32,
        y: (1.0 - ndc_y) * 0.5 * height as f32,
        depth: ndc_z,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(camera: &Camera, point: [f32; 3], width: u32, height: u32) -> Option<ScreenPoint> {
        let clip = camera.projection_matrix() * camera.view_matrix();
        clip_to_screen(clip.transform_point(point), width, height)
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(0.8, 2.0);
        assert_eq!(camera.fovy, 0.8);
        assert_eq!(camera.aspect, 2.0);
        assert_eq!((camera.near, camera.far), (1.0, 10.0));
        assert!(camera.projection_matrix().is_finite());
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        let target = view.transform_point([0.0, 0.0, 0.0]);
        assert!((target[2] + camera.distance()).abs() < 1e-5);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::default();
        let p = project(&camera, [0.0, 0.0, 0.0], 80, 40).unwrap();
        assert!((p.x - 40.0).abs() < 1e-3);
        assert!((p.y - 20.0).abs() < 1e-3);
        assert!(p.depth > -1.0 && p.depth < 1.0);
    }

    #[test]
    fn test_point_behind_eye_is_rejected() {
        let camera = Camera::default();
        assert!(project(&camera, [6.0, 8.0, 10.0], 80, 40).is_none());
    }

    #[test]
    fn test_point_beyond_far_plane_is_rejected() {
        let projection = Matrix::perspective(1.0, 1.0, 1.0, 10.0);
        let clip = projection.transform_point([0.0, 0.0, -50.0]);
        assert!(clip[3] > 0.0);
        assert!(clip_to_screen(clip, 80, 40).is_none());

        let inside = projection.transform_point([0.0, 0.0, -9.5]);
        assert!(clip_to_screen(inside, 80, 40).is_some());
    }

    #[test]
    fn test_point_in_front_of_near_plane_is_rejected() {
        let projection = Matrix::perspective(1.0, 1.0, 1.0, 10.0);
        let clip = projection.transform_point([0.0, 0.0, -0.5]);
        assert!(clip[3] > 0.0);
        assert!(clip_to_screen(clip, 80, 40).is_none());

        let inside = projection.transform_point([0.0, 0.0, -1.5]);
        assert!(clip_to_screen(inside, 80, 40).is_some());
    }
}
