//! Camera for primary ray generation.

use crate::{
    sampling::{gen_f64, random_in_unit_disk},
    Ray,
};
use lumen_math::{Point3, Vec3};
use rand::RngCore;

/// Thin-lens camera generating stratified primary rays.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// before generating rays.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    image_width: u32,
    aspect_ratio: f64,
    image_height: u32,

    // Camera positioning
    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    // Lens settings
    vfov: f64,          // Vertical field of view in degrees
    defocus_angle: f64, // Variation angle of rays through each pixel
    focus_dist: f64,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            aspect_ratio: 1.0,
            image_height: 100,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            // Cached values (initialized to defaults)
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image width and aspect ratio (width / height).
    pub fn with_image(mut self, width: u32, aspect_ratio: f64) -> Self {
        self.image_width = width.max(1);
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.image_height = ((self.image_width as f64 / self.aspect_ratio) as u32).max(1);
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        log::debug!(
            "Camera at {:?} looking at {:?}, {}x{}, vfov {}",
            self.look_from,
            self.look_at,
            self.image_width,
            self.image_height,
            self.vfov
        );
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    /// Image height, valid after `initialize`.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Generate a ray through pixel (i, j), jittered inside stratum
    /// (s_i, s_j) of a `sqrt_spp x sqrt_spp` grid over the pixel.
    pub fn get_ray(
        &self,
        i: u32,
        j: u32,
        s_i: u32,
        s_j: u32,
        sqrt_spp: u32,
        rng: &mut dyn RngCore,
    ) -> Ray {
        let offset = sample_square_stratified(s_i, s_j, sqrt_spp, rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = (pixel_sample - ray_origin).normalize();
        let ray_time = gen_f64(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Random point in stratum (s_i, s_j) of the square [-0.5, 0.5]^2.
fn sample_square_stratified(s_i: u32, s_j: u32, sqrt_spp: u32, rng: &mut dyn RngCore) -> Vec3 {
    let recip_sqrt_spp = 1.0 / sqrt_spp.max(1) as f64;
    let px = ((s_i as f64 + gen_f64(rng)) * recip_sqrt_spp) - 0.5;
    let py = ((s_j as f64 + gen_f64(rng)) * recip_sqrt_spp) - 0.5;
    Vec3::new(px, py, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_image(800, 4.0 / 3.0)
            .with_position(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, 0.0),
            )
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        assert_eq!(camera.center, Point3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
        assert_eq!(camera.image_width(), 800);
        assert_eq!(camera.image_height(), 600);
    }

    #[test]
    fn test_image_height_at_least_one() {
        let mut camera = Camera::new().with_image(10, 100.0);
        camera.initialize();
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn test_camera_ray_direction() {
        let mut camera = Camera::new()
            .with_image(101, 1.0)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point almost exactly towards -Z
        let ray = camera.get_ray(50, 50, 0, 0, 1, &mut rng);
        assert!(ray.direction().z < -0.999);
        assert!((ray.direction().length() - 1.0).abs() < 1e-12);
        assert_eq!(ray.origin(), Point3::ZERO);
        assert!((0.0..1.0).contains(&ray.time()));

        // Top-left pixel looks up and to the left
        let corner = camera.get_ray(0, 0, 0, 0, 1, &mut rng);
        assert!(corner.direction().x < 0.0);
        assert!(corner.direction().y > 0.0);
    }

    #[test]
    fn test_stratified_offsets_stay_in_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 4;
        for s_j in 0..n {
            for s_i in 0..n {
                for _ in 0..20 {
                    let offset = sample_square_stratified(s_i, s_j, n, &mut rng);
                    let cell_x = ((offset.x + 0.5) * n as f64).floor() as u32;
                    let cell_y = ((offset.y + 0.5) * n as f64).floor() as u32;
                    assert_eq!((cell_x, cell_y), (s_i, s_j));
                }
            }
        }
    }

    #[test]
    fn test_defocus_moves_origin_within_disk() {
        let mut camera = Camera::new()
            .with_image(64, 1.0)
            .with_position(Point3::new(0.0, 0.0, 5.0), Point3::ZERO, Vec3::Y)
            .with_lens(40.0, 10.0, 5.0);
        camera.initialize();

        let radius = 5.0 * (5.0f64).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(9);
        let mut moved = false;

        for _ in 0..50 {
            let ray = camera.get_ray(32, 32, 0, 0, 1, &mut rng);
            let offset = ray.origin() - Point3::new(0.0, 0.0, 5.0);
            assert!(offset.length() <= radius + 1e-9);
            assert!(offset.z.abs() < 1e-12);
            moved |= offset.length() > 1e-6;
        }
        assert!(moved);
    }
}
