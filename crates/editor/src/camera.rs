use crate::config::CameraConfig;
use glam::{Mat4, Vec2, Vec3};
use lain_input::{InputState, Key};

/// Pitch limit in radians, either side of the horizon.
pub const MAX_PITCH: f32 = 1.0;

/// Free-fly camera used in move mode.
///
/// Keyboard input picks a direction in the camera basis, the target position
/// runs ahead along it, and the position eases towards the target by a fixed
/// fraction every update. Camera motion is frame-rate dependent and lives
/// outside the saved level.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Radians, 0 looks down +X.
    pub yaw: f32,
    /// Radians, clamped to `[-MAX_PITCH, MAX_PITCH]`.
    pub pitch: f32,
    pub world_up: Vec3,
    pub speed: f32,
    /// Degrees of rotation per pixel of cursor motion.
    pub sensitivity: f32,
    /// Fraction of the remaining distance covered per update.
    pub lerp: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    direction: Vec3,
}

impl Default for EditorCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl EditorCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: config.position,
            target: config.position,
            yaw: config.yaw_degrees.to_radians(),
            pitch: config.pitch_degrees.to_radians().clamp(-MAX_PITCH, MAX_PITCH),
            world_up: Vec3::Y,
            speed: config.speed,
            sensitivity: config.sensitivity,
            lerp: config.lerp,
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
            front: Vec3::X,
            right: Vec3::Z,
            up: Vec3::Y,
            direction: Vec3::ZERO,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit movement direction chosen by the last `process_keyboard`, or zero.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// W/S along the view direction, D/A along the right vector, Q/E along
    /// the camera's up vector. Opposite keys cancel.
    pub fn process_keyboard(&mut self, input: &InputState) {
        let mut direction = Vec3::ZERO;
        if input.key_down(Key::W) {
            direction += self.front;
        }
        if input.key_down(Key::S) {
            direction -= self.front;
        }
        if input.key_down(Key::D) {
            direction += self.right;
        }
        if input.key_down(Key::A) {
            direction -= self.right;
        }
        if input.key_down(Key::Q) {
            direction += self.up;
        }
        if input.key_down(Key::E) {
            direction -= self.up;
        }
        self.direction = direction.normalize_or_zero();
    }

    /// Turn by a cursor delta in pixels. Moving the cursor down looks down.
    pub fn process_cursor(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        self.yaw += (delta.x * self.sensitivity).to_radians();
        self.pitch = (self.pitch - (delta.y * self.sensitivity).to_radians()).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_vectors();
    }

    /// Place the target one frame of travel ahead, or on the camera when no
    /// direction is held.
    pub fn set_target(&mut self, dt: f32) {
        self.target = if self.direction == Vec3::ZERO {
            self.position
        } else {
            self.position + self.direction * self.speed * dt
        };
    }

    /// Ease the position towards the target.
    pub fn update(&mut self) {
        self.position += (self.target - self.position) * self.lerp;
    }

    /// Aim the camera at a world point.
    pub fn look_at(&mut self, point: Vec3) {
        let dir = (point - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH);
        self.update_vectors();
    }

    /// Move without easing; position and target both land on `position`.
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.target = position;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// OpenGL depth range, matching the unprojection pipeline.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect.max(f32::EPSILON), self.near, self.far)
    }

    fn update_vectors(&mut self) {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.front = Vec3::new(cy * cp, sp, sy * cp).normalize();
        self.right = self.front.cross(self.world_up).normalize_or_zero();
        self.up = self.right.cross(self.front).normalize_or_zero();
    }
}
