/// Orbit rotation and camera projection for the terminal viewer
use nalgebra::{Matrix4, Point3, Vector3};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Rotation of the viewed model around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Orbit {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, d_pitch: f32, d_yaw: f32, d_roll: f32) {
        self.pitch += d_pitch;
        self.yaw += d_yaw;
        self.roll += d_roll;
    }

    /// Model matrix: roll around Z, then yaw around Y, then pitch around X
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(self.pitch, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.yaw, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.roll));
        rx * ry * rz
    }
}

impl Default for Orbit {
    fn default() -> Self {
        // Tilted so the poles and the seam are both in view.
        Self::new(-1.2, 0.0, 0.4)
    }
}

/// A projected point in terminal cell coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Perspective camera looking at the origin
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 3.2),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f32::consts::FRAC_PI_4,
            near: 0.1,
            far: 100.0,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Visual aspect ratio of the viewport, corrected for cell shape
    pub fn aspect(&self) -> f32 {
        self.width as f32 / (self.height as f32 * CELL_ASPECT)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect(), self.fov, self.near, self.far)
    }

    /// Direction from the origin towards the eye, in world space
    pub fn view_direction(&self) -> Vector3<f32> {
        (self.eye - self.target).normalize()
    }

    /// Project a model-space point to cell coordinates, `None` when outside the frustum
    pub fn project(&self, point: &Point3<f32>, model: &Matrix4<f32>) -> Option<ScreenPoint> {
        let mvp = self.projection_matrix() * self.view_matrix() * model;
        let ndc = mvp.transform_point(point);

        if !ndc.coords.iter().all(|c| c.is_finite()) {
            return None;
        }
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * self.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.height as f32,
            depth: ndc.z,
        })
    }
}
