use crate::Vec3;

/// Orthonormal basis built around a single direction `w`.
///
/// Local-frame samples (x, y, z) map to `x*u + y*v + z*w` in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    axis: [Vec3; 3],
}

impl Onb {
    /// Build a basis whose `w` axis is the normalized `n`.
    pub fn new(n: Vec3) -> Self {
        let w = n.normalize();
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { axis: [u, v, w] }
    }

    #[inline]
    pub fn u(&self) -> Vec3 {
        self.axis[0]
    }

    #[inline]
    pub fn v(&self) -> Vec3 {
        self.axis[1]
    }

    #[inline]
    pub fn w(&self) -> Vec3 {
        self.axis[2]
    }

    /// Transform a vector from basis coordinates to world space.
    #[inline]
    pub fn transform(&self, local: Vec3) -> Vec3 {
        local.x * self.axis[0] + local.y * self.axis[1] + local.z * self.axis[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onb_is_orthonormal() {
        for n in [
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-0.3, 0.8, 0.2),
        ] {
            let onb = Onb::new(n);
            assert!((onb.u().length() - 1.0).abs() < 1e-12);
            assert!((onb.v().length() - 1.0).abs() < 1e-12);
            assert!((onb.w().length() - 1.0).abs() < 1e-12);
            assert!(onb.u().dot(onb.v()).abs() < 1e-12);
            assert!(onb.v().dot(onb.w()).abs() < 1e-12);
            assert!(onb.u().dot(onb.w()).abs() < 1e-12);
            assert!((onb.w() - n.normalize()).length() < 1e-12);
        }
    }

    #[test]
    fn test_onb_transform_z_is_w() {
        let n = Vec3::new(0.2, -0.5, 0.7);
        let onb = Onb::new(n);
        assert!((onb.transform(Vec3::Z) - n.normalize()).length() < 1e-12);
    }
}
