//! First-person camera: orientation, zoom and collision-checked movement.
//!
//! The camera itself is plain state. [`FirstPersonController`] turns the
//! per-frame input handed over by the windowing collaborator (movement axes,
//! mouse delta, scroll delta) into orientation updates and a validated
//! position; the position only ever changes through the collision navigator.
//! [`CameraUniform`] packs the matrices for GPU upload.

use std::time::Duration;

use cgmath::{Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3, Zero, perspective};

use crate::collision::Navigator;

/// Walking speed in units per second.
const BASE_SPEED: f32 = 2.5;
/// Speed multiplier while sprinting.
const SPRINT_FACTOR: f32 = 2.0;
/// Degrees of yaw/pitch per unit of mouse travel.
const MOUSE_SENSITIVITY: f32 = 0.05;
/// Degrees of field-of-view change per scroll step.
const ZOOM_RATE: f32 = 2.0;
/// Pitch stays just shy of straight up/down to avoid flipping the view.
const PITCH_LIMIT: f32 = 89.0;
/// Field-of-view bounds in degrees.
pub const FOV_MIN: f32 = 10.0;
pub const FOV_MAX: f32 = 90.0;
/// Frame steps are capped so a long pause does not teleport the observer.
const MAX_FRAME_STEP: f32 = 0.1;

/// Observer state.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Unit view direction, derived from `yaw`/`pitch`.
    pub orientation: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Degrees around +Y; -90 looks down -Z.
    pub yaw: f32,
    /// Degrees above the horizon.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Camera {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            orientation: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
        }
    }

    /// View matrix for the rendering collaborator.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.orientation, self.up)
    }

    /// Recompute the orientation vector after yaw or pitch changed.
    pub fn update_orientation(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        self.orientation = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }
}

/// Aspect and clip-plane state for the projection matrix.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    width: u32,
    height: u32,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    /// Projection matrix for the given vertical field of view in degrees.
    pub fn matrix(&self, fov_deg: f32) -> Matrix4<f32> {
        perspective(
            Deg(fov_deg),
            self.width as f32 / self.height as f32,
            self.znear,
            self.zfar,
        )
    }
}

/// The camera data laid out for direct upload into a uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.matrix(camera.fov) * camera.view_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns collaborator input into camera mutations.
///
/// Input arrives as camera-relative movement axes plus raw mouse and scroll
/// deltas; [`update`](Self::update) applies one frame of it. Movement stays
/// in the horizontal plane and only reaches the camera position through the
/// navigator.
#[derive(Clone, Debug)]
pub struct FirstPersonController {
    speed: f32,
    sensitivity: f32,
    movement: Vector3<f32>,
    sprint: bool,
    rotation: (f32, f32),
    zoom: f32,
}

impl FirstPersonController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            movement: Vector3::zero(),
            sprint: false,
            rotation: (0.0, 0.0),
            zoom: 0.0,
        }
    }

    /// Set the desired movement axes for this frame: `x` strafes right, `z`
    /// walks forward. `y` is ignored, locomotion is fixed-height.
    pub fn set_movement(&mut self, movement: Vector3<f32>, sprint: bool) {
        self.movement = movement;
        self.sprint = sprint;
    }

    /// Accumulate a raw mouse delta. Positive `dy` (cursor moving down)
    /// pitches the view down.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.rotation.0 += dx as f32;
        self.rotation.1 += dy as f32;
    }

    /// Accumulate a scroll delta. Positive values zoom in.
    pub fn handle_scroll(&mut self, delta: f32) {
        self.zoom += delta;
    }

    /// Apply one frame of accumulated input to `camera`.
    pub fn update(&mut self, camera: &mut Camera, navigator: &Navigator, dt: Duration) {
        let dt = dt.as_secs_f32().min(MAX_FRAME_STEP);

        let (dx, dy) = std::mem::take(&mut self.rotation);
        camera.yaw += dx * self.sensitivity;
        camera.pitch = (camera.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        camera.update_orientation();

        let zoom = std::mem::take(&mut self.zoom);
        camera.fov = (camera.fov - zoom * ZOOM_RATE).clamp(FOV_MIN, FOV_MAX);

        // The pitch clamp keeps the horizontal component of the orientation
        // away from zero, so this normalization is well defined.
        let forward = Vector3::new(camera.orientation.x, 0.0, camera.orientation.z).normalize();
        let right = forward.cross(camera.up).normalize();
        let mut direction = forward * self.movement.z + right * self.movement.x;
        if direction.magnitude2() > 0.0 {
            if direction.magnitude2() > 1.0 {
                direction = direction.normalize();
            }
            let factor = if self.sprint { SPRINT_FACTOR } else { 1.0 };
            let desired = camera.position + direction * (self.speed * factor * dt);
            camera.position = navigator.try_move(camera.position, desired);
        }
    }
}

impl Default for FirstPersonController {
    fn default() -> Self {
        Self::new(BASE_SPEED, MOUSE_SENSITIVITY)
    }
}
