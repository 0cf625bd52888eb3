use lain_common::{Aabb, Ray};

/// Slab-method ray/AABB test.
///
/// Returns `true` when the ray enters the box at a parameter `t >= 0`, or
/// starts inside it.
pub fn ray_intersects_aabb(ray: &Ray, aabb: &Aabb) -> bool {
    slab_interval(ray, aabb).is_some()
}

/// Distance along the ray to the entry point of the box.
///
/// `Some(0.0)` when the origin is inside the box, `None` on a miss. Used
/// to order hits when more than one box is crossed.
pub fn ray_aabb_distance(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    slab_interval(ray, aabb).map(|(t_near, _)| t_near.max(0.0))
}

/// Parametric interval `[t_near, t_far]` in which the ray is inside all
/// three slabs, if that interval is non-empty and not entirely behind the
/// origin.
fn slab_interval(ray: &Ray, aabb: &Aabb) -> Option<(f32, f32)> {
    if ray.is_degenerate() || !aabb.is_valid() {
        return None;
    }

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        // Parallel to this slab: either always inside it or never.
        if dir == 0.0 {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let t1 = (lo - origin) / dir;
        let t2 = (hi - origin) / dir;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }

    (t_near <= t_far && t_far >= 0.0).then_some((t_near, t_far))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn ray_towards_box_hits() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(ray_intersects_aabb(&ray, &unit_box()));
        let d = ray_aabb_distance(&ray, &unit_box()).unwrap();
        assert!((d - 4.0).abs() < 1e-6);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray::new(Vec3::splat(5.0), Vec3::ONE);
        assert!(!ray_intersects_aabb(&ray, &unit_box()));
        assert!(ray_aabb_distance(&ray, &unit_box()).is_none());
    }

    #[test]
    fn origin_inside_always_hits() {
        let dirs = [
            Vec3::X,
            Vec3::NEG_Y,
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-0.3, 0.2, -0.9),
        ];
        for origin in [Vec3::ZERO, Vec3::new(0.9, -0.9, 0.5)] {
            for dir in dirs {
                let ray = Ray::new(origin, dir);
                assert!(ray_intersects_aabb(&ray, &unit_box()), "{origin} {dir}");
                assert_eq!(ray_aabb_distance(&ray, &unit_box()), Some(0.0));
            }
        }
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        // Travels along +Z but sits above the box on Y.
        let ray = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::Z);
        assert!(!ray_intersects_aabb(&ray, &unit_box()));
    }

    #[test]
    fn parallel_ray_on_face_hits() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, -5.0), Vec3::Z);
        assert!(ray_intersects_aabb(&ray, &unit_box()));
    }

    #[test]
    fn box_behind_origin_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(!ray_intersects_aabb(&ray, &unit_box()));
    }

    #[test]
    fn oblique_ray_misses_corner() {
        let ray = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        assert!(!ray_intersects_aabb(&ray, &unit_box()));
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.5, 0.0));
        // Crosses y = 1 at x = -3, long before reaching the box.
        assert!(!ray_intersects_aabb(&ray, &unit_box()));
    }

    #[test]
    fn degenerate_inputs_never_hit() {
        let zero = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::ZERO,
        };
        assert!(!ray_intersects_aabb(&zero, &unit_box()));

        let nan = Ray {
            origin: Vec3::new(f32::NAN, 0.0, 0.0),
            direction: Vec3::Z,
        };
        assert!(!ray_intersects_aabb(&nan, &unit_box()));

        let inverted = Aabb::new(Vec3::ONE, Vec3::NEG_ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(!ray_intersects_aabb(&ray, &inverted));
    }

    #[test]
    fn flat_box_is_hit_head_on() {
        let plate = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert_eq!(ray_aabb_distance(&ray, &plate), Some(5.0));
    }
}
