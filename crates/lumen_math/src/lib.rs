//! Lumen math - the geometric vocabulary shared by the renderer crates.
//!
//! Vectors are `glam::DVec3` (three doubles). `Vec3` and `Point3` are aliases
//! of the same type; the distinction is documentation only.

pub use glam::{DVec3, IVec2};

mod aabb;
mod bounds;
mod interval;
mod onb;
mod ray;
mod vec_ext;

pub use aabb::Aabb;
pub use bounds::{Bounds2i, Point2i};
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use vec_ext::Vec3Ext;

/// 3D vector of doubles.
pub type Vec3 = DVec3;

/// A position in 3D space.
pub type Point3 = DVec3;
