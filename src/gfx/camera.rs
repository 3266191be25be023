use cgmath::{perspective, Deg, Matrix4, Point3, Rad, SquareMatrix, Vector3};

use crate::card::CameraProfile;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Fixed perspective camera for the preview card
///
/// Unlike an orbit camera there is no user control: the eye position comes
/// from the configured [`CameraProfile`] and only the aspect ratio changes
/// over the session's life, driven by host resizes.
#[derive(Debug, Clone, Copy)]
pub struct PreviewCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl PreviewCamera {
    pub fn new(profile: CameraProfile, aspect: f32) -> Self {
        let mut camera = Self {
            eye: profile.eye(),
            target: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            aspect,
            fovy: Deg(75.0).into(),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.eye.x, self.eye.y, self.eye.z);
        let target = Point3::new(self.target.x, self.target.y, self.target.z);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_updates_aspect_exactly() {
        let mut camera = PreviewCamera::new(CameraProfile::Front, 1.0);
        camera.resize_projection(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);

        // Same ratio, different pixel dimensions
        camera.resize_projection(400, 300);
        assert!((camera.aspect - 400.0 / 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_front_profile_faces_origin_along_z() {
        let camera = PreviewCamera::new(CameraProfile::Front, 1.0);
        assert_eq!(camera.eye.x, 0.0);
        assert_eq!(camera.eye.y, 0.0);
        assert!(camera.eye.z > 0.0);
    }
}
