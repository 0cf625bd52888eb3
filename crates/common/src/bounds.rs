use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// A valid box has finite corners with `min <= max` on every axis. Invalid
/// boxes are representable (they come from files and user edits) and every
/// geometric query treats them as empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Inclusive containment test.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }

    /// The eight corners, ordered by (x, y, z) bit pattern with min = 0.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Box enclosing this box after transformation by `mat`.
    ///
    /// All eight corners are transformed and re-fitted. Transforming only
    /// `min` and `max` gives wrong bounds as soon as a rotation or a negative
    /// scale is involved.
    pub fn transformed(&self, mat: &Mat4) -> Self {
        let corners = self.corners();
        let first = mat.transform_point3(corners[0]);
        let (min, max) = corners[1..].iter().fold((first, first), |(lo, hi), c| {
            let p = mat.transform_point3(*c);
            (lo.min(p), hi.max(p))
        });
        Self { min, max }
    }
}

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length, or zero for a degenerate ray.
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. A zero or non-finite direction
    /// becomes `Vec3::ZERO` and the ray never hits anything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    pub fn is_degenerate(&self) -> bool {
        !self.origin.is_finite()
            || !self.direction.is_finite()
            || self.direction == Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn from_points_fits_all() {
        let b = Aabb::from_points(&[
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-3.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-3.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 2.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn validity() {
        assert!(unit_box().is_valid());
        assert!(!Aabb::new(Vec3::ONE, Vec3::ZERO).is_valid());
        assert!(!Aabb::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ONE).is_valid());
    }

    #[test]
    fn transformed_translation_is_exact() {
        let m = Mat4::from_translation(Vec3::new(5.0, 0.0, -2.0));
        let b = unit_box().transformed(&m);
        assert_eq!(b.min, Vec3::new(4.0, -1.0, -3.0));
        assert_eq!(b.max, Vec3::new(6.0, 1.0, -1.0));
    }

    #[test]
    fn transformed_rotation_refits_corners() {
        // A 45 degree turn about Y widens the X/Z footprint to sqrt(2).
        let m = Mat4::from_quat(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4));
        let b = unit_box().transformed(&m);
        let r = std::f32::consts::SQRT_2;
        assert!(b.min.abs_diff_eq(Vec3::new(-r, -1.0, -r), 1e-5));
        assert!(b.max.abs_diff_eq(Vec3::new(r, 1.0, r), 1e-5));
    }

    #[test]
    fn transformed_negative_scale_keeps_min_below_max() {
        let m = Mat4::from_scale(Vec3::new(-2.0, 1.0, 1.0));
        let b = unit_box().transformed(&m);
        assert!(b.is_valid());
        assert_eq!(b.min.x, -2.0);
        assert_eq!(b.max.x, 2.0);
    }

    #[test]
    fn ray_normalizes_direction() {
        let r = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(r.direction, Vec3::Z);
        assert_eq!(r.at(2.0), Vec3::new(0.0, 0.0, 2.0));
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_degenerate());
    }
}
