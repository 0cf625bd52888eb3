//! Screen -> NDC -> clip -> view -> world.
//!
//! Conventions: screen space has its origin at the top-left corner with Y
//! growing downwards; NDC follows OpenGL (Y up, right-handed, -Z forward);
//! projection matrices are expected to map depth to `[-1, 1]`
//! (`Mat4::perspective_rh_gl`).

use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};
use lain_common::Ray;

/// Size of the drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width over height, 1.0 for an invalid viewport.
    pub fn aspect(&self) -> f32 {
        if self.is_valid() {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Pixel coordinates to normalized device coordinates.
///
/// Y is flipped: screen space grows downwards, NDC grows upwards. `z` and
/// `w` are zeroed; later stages overwrite them.
pub fn screen_to_ndc(pos: Vec2, width: f32, height: f32) -> Vec4 {
    Vec4::new(
        (pos.x * 2.0) / width - 1.0,
        1.0 - (pos.y * 2.0) / height,
        0.0,
        0.0,
    )
}

/// Lift an NDC point into homogeneous clip space on the near plane,
/// pointing into the screen (`z = -1`, `w = 1`).
pub fn ndc_to_clip(pos: Vec4) -> Vec4 {
    Vec4::new(pos.x, pos.y, -1.0, 1.0)
}

/// Undo the projection and divide by the resulting `w`.
///
/// A zero `w` is left undivided; callers check the result for finiteness.
pub fn clip_to_view(pos: Vec4, projection: &Mat4) -> Vec4 {
    let view = projection.inverse() * pos;
    if view.w != 0.0 { view / view.w } else { view }
}

/// Undo the camera view transform.
pub fn view_to_world(pos: Vec4, view: &Mat4) -> Vec4 {
    view.inverse() * pos
}

/// World-space point on the near plane under the cursor.
///
/// `None` for an empty viewport, a singular matrix, or a non-finite result.
pub fn screen_to_world(cursor: Vec2, viewport: Viewport, view: &Mat4, projection: &Mat4) -> Option<Vec3> {
    if !viewport.is_valid() || !cursor.is_finite() {
        return None;
    }
    if !is_invertible(view) || !is_invertible(projection) {
        tracing::debug!("unprojection skipped: singular view or projection matrix");
        return None;
    }

    let ndc = screen_to_ndc(cursor, viewport.width, viewport.height);
    let clip = ndc_to_clip(ndc);
    let eye = clip_to_view(clip, projection);
    let world = view_to_world(eye, view).xyz();

    world.is_finite().then_some(world)
}

/// Ray from the camera through the cursor.
pub fn cursor_ray(
    cursor: Vec2,
    viewport: Viewport,
    view: &Mat4,
    projection: &Mat4,
    camera_position: Vec3,
) -> Option<Ray> {
    let world = screen_to_world(cursor, viewport, view, projection)?;
    let ray = Ray::new(camera_position, world - camera_position);
    (!ray.is_degenerate()).then_some(ray)
}

/// Forward transform of a world point to pixel coordinates.
///
/// `None` when the point is behind the camera.
pub fn project_to_screen(world: Vec3, viewport: Viewport, view: &Mat4, projection: &Mat4) -> Option<Vec2> {
    if !viewport.is_valid() {
        return None;
    }
    let clip = *projection * *view * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    let screen = Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.width,
        (1.0 - ndc.y) * 0.5 * viewport.height,
    );
    screen.is_finite().then_some(screen)
}

fn is_invertible(m: &Mat4) -> bool {
    let det = m.determinant();
    det.is_finite() && det != 0.0
}
