//! Planar quadrilateral primitive and the box helper built from it.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    sampling::gen_f64,
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Point3, Vec3};
use rand::RngCore;

/// Rays closer than this to parallel with the plane are treated as misses.
const PARALLEL_EPSILON: f64 = 1e-8;

/// A parallelogram with corner `q` and edges `u` and `v`.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)` with `n = u x v`, used to recover planar coordinates
    w: Vec3,
    normal: Vec3,
    /// Plane offset: `normal . p == d` for points on the plane
    d: f64,
    area: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();

        let diagonal1 = Aabb::from_points(q, q + u + v);
        let diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w: n / n.dot(n),
            normal,
            d: normal.dot(q),
            area: n.length(),
            material,
            bbox: Aabb::surrounding(&diagonal1, &diagonal2),
        }
    }

    /// Plane hit within `ray_t`, returning `(t, alpha, beta)` when the point
    /// lies inside the quad.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f64, f64, f64)> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Planar coordinates of the hit point in the (u, v) frame
        let planar_hit = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        Some((t, alpha, beta))
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let Some((t, alpha, beta)) = self.intersect(ray, ray_t) else {
            return false;
        };

        rec.t = t;
        rec.p = ray.at(t);
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Density of picking a uniform point on the quad, in solid angle.
    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        let ray = Ray::new(origin, direction, 0.0);
        let Some((t, _, _)) = self.intersect(&ray, Interval::new(0.001, f64::INFINITY)) else {
            return 0.0;
        };

        let distance_squared = t * t * direction.length_squared();
        let cosine = direction.dot(self.normal).abs() / direction.length();

        distance_squared / (cosine * self.area)
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q + gen_f64(rng) * self.u + gen_f64(rng) * self.v;
        p - origin
    }
}

/// The six quads enclosing the axis-aligned box spanned by `a` and `b`.
pub fn make_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Point3::new(min.x, min.y, max.z), dx, dy),  // front
        (Point3::new(max.x, min.y, max.z), -dz, dy), // right
        (Point3::new(max.x, min.y, min.z), -dx, dy), // back
        (Point3::new(min.x, min.y, min.z), dz, dy),  // left
        (Point3::new(min.x, max.y, max.z), dx, -dz), // top
        (Point3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];

    let mut sides = HittableList::new();
    for (q, u, v) in faces {
        sides.add(Arc::new(Quad::new(q, u, v, Arc::clone(&material))));
    }
    sides
}
