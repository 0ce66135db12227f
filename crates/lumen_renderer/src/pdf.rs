//! Direction densities used for importance sampling.

use std::f64::consts::PI;

use crate::{
    hittable::Hittable,
    sampling::{random_cosine_direction, random_unit_vector},
};
use lumen_math::{Onb, Point3, Vec3};
use rand::RngCore;

/// A probability density over directions, paired with a way to sample it.
///
/// `value` and `generate` always agree: `value(generate())` is the density
/// the sample was drawn with.
pub enum Pdf<'a> {
    /// Uniform over the whole sphere of directions.
    Sphere,
    /// Cosine-weighted about the basis' `w` axis.
    Cosine(Onb),
    /// Toward a hittable, as seen from `origin`.
    Hittable {
        objects: &'a dyn Hittable,
        origin: Point3,
    },
}

impl<'a> Pdf<'a> {
    /// Cosine-weighted density about `normal`.
    pub fn cosine(normal: Vec3) -> Self {
        Pdf::Cosine(Onb::new(normal))
    }

    pub fn toward(objects: &'a dyn Hittable, origin: Point3) -> Self {
        Pdf::Hittable { objects, origin }
    }

    /// Density of sampling `direction`.
    pub fn value(&self, direction: Vec3) -> f64 {
        match self {
            Pdf::Sphere => 1.0 / (4.0 * PI),
            Pdf::Cosine(uvw) => {
                let cosine_theta = direction.normalize().dot(uvw.w());
                (cosine_theta / PI).max(0.0)
            }
            Pdf::Hittable { objects, origin } => objects.pdf_value(*origin, direction),
        }
    }

    /// Draw a direction from this density.
    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Pdf::Sphere => random_unit_vector(rng),
            Pdf::Cosine(uvw) => uvw.transform(random_cosine_direction(rng)),
            Pdf::Hittable { objects, origin } => objects.random(*origin, rng),
        }
    }
}
