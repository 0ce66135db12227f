//! Material trait for surface scattering and emission.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::HitRecord,
    pdf::Pdf,
    sampling::{gen_f64, random_on_hemisphere, random_unit_vector},
    texture::{SolidColor, Texture},
    Ray,
};
use lumen_math::{Point3, Vec3, Vec3Ext};
use rand::RngCore;

/// Color type alias (linear RGB, nominally 0-1 but unbounded for emitters)
pub type Color = Vec3;

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Fraction of incoming radiance carried by the scattered ray
    pub attenuation: Color,
    /// The material's own choice of outgoing ray
    pub scattered: Ray,
    /// Density the material sampled `scattered` with; 0 for delta lobes
    /// (mirror, glass) that have no density
    pub pdf: f64,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Every method has a default, so a material implements only what it does:
/// the defaults describe a black body that neither scatters nor emits.
pub trait Material: Send + Sync {
    /// Radiance emitted at the hit point.
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord, _u: f64, _v: f64, _p: Point3) -> Color {
        Color::ZERO
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    /// Density of scattering from `ray_in` into `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f64 {
        0.0
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn with_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = random_on_hemisphere(rec.normal, rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction.normalize(), ray_in.time()),
            pdf: 1.0 / (2.0 * PI),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f64 {
        Pdf::cosine(rec.normal).value(scattered.direction())
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = ray_in.direction().reflect(rec.normal).normalize();
        let scattered_dir = (reflected + self.fuzz * random_unit_vector(rng)).normalize();

        // Fuzz can push the reflection below the surface
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            pdf: 0.0,
        })
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction relative to the enclosing medium
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng) {
                unit_direction.reflect(rec.normal)
            } else {
                unit_direction.refract(rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
            pdf: 0.0,
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    texture: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(emit)))
    }

    pub fn with_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for DiffuseLight {
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord, u: f64, v: f64, p: Point3) -> Color {
        self.texture.value(u, v, p)
    }
}

/// Isotropic phase function for participating media.
pub struct Isotropic {
    texture: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn with_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let phase = Pdf::Sphere;
        let direction = phase.generate(rng);

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction, ray_in.time()),
            pdf: phase.value(direction),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, scattered: &Ray) -> f64 {
        Pdf::Sphere.value(scattered.direction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::CheckerTexture;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(normal: Vec3, front_face: bool) -> HitRecord<'static> {
        HitRecord {
            p: Point3::ZERO,
            normal,
            front_face,
            t: 1.0,
            ..HitRecord::default()
        }
    }

    #[test]
    fn test_lambertian_scatters_above_surface() {
        let mat = Lambertian::new(Color::new(0.8, 0.3, 0.3));
        let rec = record(Vec3::Y, true);
        let ray_in = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vec3::Y, 0.25);
        let mut rng = StdRng::seed_from_u64(10);

        for _ in 0..100 {
            let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
            assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
            assert!((result.scattered.direction().length() - 1.0).abs() < 1e-9);
            assert_eq!(result.scattered.time(), 0.25);
        }
    }

    #[test]
    fn test_lambertian_scattering_pdf_is_cosine() {
        let mat = Lambertian::new(Color::ONE);
        let rec = record(Vec3::Y, true);
        let ray_in = Ray::default();

        let straight_up = Ray::new(Point3::ZERO, Vec3::Y, 0.0);
        assert!((mat.scattering_pdf(&ray_in, &rec, &straight_up) - 1.0 / PI).abs() < 1e-12);

        let below = Ray::new(Point3::ZERO, -Vec3::Y, 0.0);
        assert_eq!(mat.scattering_pdf(&ray_in, &rec, &below), 0.0);

        let grazing = Ray::new(Point3::ZERO, Vec3::new(1.0, 1.0, 0.0), 0.0);
        let expected = std::f64::consts::FRAC_1_SQRT_2 / PI;
        assert!((mat.scattering_pdf(&ray_in, &rec, &grazing) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_lambertian_texture_lookup() {
        let checker = CheckerTexture::from_colors(1.0, Color::ZERO, Color::ONE);
        let mat = Lambertian::with_texture(Arc::new(checker));
        let mut rec = record(Vec3::Y, true);
        rec.p = Point3::new(1.5, 0.5, 0.5);
        let mut rng = StdRng::seed_from_u64(11);

        let result = mat.scatter(&Ray::default(), &rec, &mut rng).unwrap();
        assert_eq!(result.attenuation, Color::ONE);
    }

    #[test]
    fn test_perfect_mirror_reflects() {
        let mat = Metal::new(Color::splat(0.9), 0.0);
        let rec = record(Vec3::Y, true);
        let ray_in = Ray::new(Point3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(12);

        let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-12);
        assert_eq!(result.attenuation, Color::splat(0.9));
        assert_eq!(mat.scattering_pdf(&ray_in, &rec, &result.scattered), 0.0);
    }

    #[test]
    fn test_fuzzy_metal_never_scatters_below_surface() {
        // Fuzz above 1 is clamped
        let mat = Metal::new(Color::ONE, 3.0);
        let rec = record(Vec3::Y, true);
        let ray_in = Ray::new(Point3::ZERO, Vec3::new(1.0, -0.05, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(13);

        let mut absorbed = 0;
        for _ in 0..200 {
            match mat.scatter(&ray_in, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(Vec3::Y) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_schlick_at_normal_incidence() {
        for ior in [1.0_f64, 1.33, 1.5, 2.4] {
            let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
            assert!((Dielectric::reflectance(1.0, ior) - r0).abs() < 1e-15);
        }
        // Grazing incidence reflects everything
        assert!((Dielectric::reflectance(0.0, 1.5) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        // Inside the glass, steep angle to the normal
        let rec = record(Vec3::Y, false);
        let ray_in = Ray::new(Point3::ZERO, Vec3::new(1.0, -0.2, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(14);

        for _ in 0..50 {
            let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            assert!(result.scattered.direction().dot(Vec3::Y) > 0.0);
        }
    }

    #[test]
    fn test_dielectric_head_on_mostly_refracts() {
        let mat = Dielectric::new(1.5);
        let rec = record(Vec3::Y, true);
        let ray_in = Ray::new(Point3::Y, -Vec3::Y, 0.0);
        let mut rng = StdRng::seed_from_u64(15);

        let refracted = (0..1000)
            .filter(|_| {
                let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
                result.scattered.direction().dot(Vec3::Y) < 0.0
            })
            .count();
        // Reflectance at normal incidence is 4%
        assert!(refracted > 900);
    }

    #[test]
    fn test_diffuse_light_emits_only() {
        let light = DiffuseLight::new(Color::splat(4.0));
        let rec = record(Vec3::Y, true);
        let ray_in = Ray::default();
        let mut rng = StdRng::seed_from_u64(16);

        assert!(light.scatter(&ray_in, &rec, &mut rng).is_none());
        assert_eq!(light.emitted(&ray_in, &rec, 0.0, 0.0, Point3::ZERO), Color::splat(4.0));
        assert_eq!(
            Lambertian::new(Color::ONE).emitted(&ray_in, &rec, 0.0, 0.0, Point3::ZERO),
            Color::ZERO
        );
    }

    #[test]
    fn test_isotropic_uniform_density() {
        let mat = Isotropic::new(Color::splat(0.5));
        let rec = record(Vec3::X, true);
        let ray_in = Ray::default();
        let mut rng = StdRng::seed_from_u64(17);

        let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
        assert!((result.scattered.direction().length() - 1.0).abs() < 1e-9);
        assert_eq!(result.pdf, mat.scattering_pdf(&ray_in, &rec, &result.scattered));
    }
}
