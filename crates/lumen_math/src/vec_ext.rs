// Helpers glam's DVec3 does not provide.

use glam::DVec3;

/// Components below this magnitude count as zero.
const NEAR_ZERO: f64 = 1e-8;

/// Extension trait for vector queries used by the scattering code.
pub trait Vec3Ext {
    /// True if every component is within `1e-8` of zero.
    fn near_zero(&self) -> bool;

    /// Mirror `self` about the (unit) normal `n`.
    fn reflect(&self, n: DVec3) -> DVec3;

    /// Refract the unit vector `self` through a surface with normal `n`,
    /// where `etai_over_etat` is the ratio of refractive indices.
    fn refract(&self, n: DVec3, etai_over_etat: f64) -> DVec3;
}

impl Vec3Ext for DVec3 {
    fn near_zero(&self) -> bool {
        self.x.abs() < NEAR_ZERO && self.y.abs() < NEAR_ZERO && self.z.abs() < NEAR_ZERO
    }

    fn reflect(&self, n: DVec3) -> DVec3 {
        *self - 2.0 * self.dot(n) * n
    }

    fn refract(&self, n: DVec3, etai_over_etat: f64) -> DVec3 {
        let cos_theta = (-*self).dot(n).min(1.0);
        let r_out_perp = etai_over_etat * (*self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }
}
