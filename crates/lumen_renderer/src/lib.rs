//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering: spheres, quads,
//! volumes and instancing wrappers, a median-split BVH, diffuse / metal /
//! glass / emissive / volumetric materials, light importance sampling, and a
//! tile scheduler running on a mutex-and-condvar thread pool.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lumen_renderer::*;
//!
//! let mut world = HittableList::new();
//! world.add(Arc::new(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5,
//!     Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))))));
//!
//! let mut camera = Camera::new().with_image(400, 16.0 / 9.0);
//! camera.initialize();
//!
//! let pool = ThreadPool::with_available_parallelism();
//! let image = render(&pool, &camera, Arc::new(world), None, &RenderConfig::default());
//! ```

mod bvh;
mod camera;
mod hittable;
mod instance;
mod material;
mod medium;
mod parallel;
mod pdf;
mod perlin;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod texture;
mod tile;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{RotateY, Translate};
pub use material::{Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult};
pub use medium::ConstantMedium;
pub use parallel::{parallel_for_2d, tile_edge, JobStep, ParallelJob, ThreadPool};
pub use pdf::Pdf;
pub use perlin::Perlin;
pub use quad::{make_box, Quad};
pub use renderer::{color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, ImageBuffer, RenderConfig};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use tile::{pixel_seed, render_tile, TileContext};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Bounds2i, Interval, Onb, Point2i, Point3, Ray, Vec3};
