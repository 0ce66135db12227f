//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built by balanced median splits: each node sorts its objects
//! along the longest axis of their combined bounds and hands half to each
//! child. No surface-area heuristic is evaluated.

use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList, Ray};
use lumen_math::{Aabb, Interval};
use rand::RngCore;

/// BVH node - either a branch with two children or a leaf with one object.
///
/// Using an enum keeps the tree itself free of dynamic dispatch; only the
/// leaves call through `dyn Hittable`.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding a single shared object.
    Leaf {
        object: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Empty tree (no objects).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let node = Self::build(&mut objects);
        log::debug!(
            "Built BVH over {} objects, depth {}",
            objects.len(),
            node.depth()
        );
        node
    }

    /// Build a BVH over the contents of a hittable list.
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive construction over a sub-slice, sorted in place.
    fn build(objects: &mut [Arc<dyn Hittable>]) -> Self {
        let bbox = objects.iter().fold(Aabb::EMPTY, |acc, object| {
            Aabb::surrounding(&acc, &object.bounding_box())
        });

        match objects.len() {
            1 => Self::leaf(&objects[0]),
            2 => BvhNode::Branch {
                left: Box::new(Self::leaf(&objects[0])),
                right: Box::new(Self::leaf(&objects[1])),
                bbox,
            },
            n => {
                let axis = bbox.longest_axis();
                objects.sort_by(|a, b| {
                    let a_min = a.bounding_box().axis_interval(axis).min;
                    let b_min = b.bounding_box().axis_interval(axis).min;
                    a_min.total_cmp(&b_min)
                });

                let (left_objects, right_objects) = objects.split_at_mut(n / 2);

                BvhNode::Branch {
                    left: Box::new(Self::build(left_objects)),
                    right: Box::new(Self::build(right_objects)),
                    bbox,
                }
            }
        }
    }

    fn leaf(object: &Arc<dyn Hittable>) -> Self {
        BvhNode::Leaf {
            object: Arc::clone(object),
            bbox: object.bounding_box(),
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }
                object.hit(ray, ray_t, rec, rng)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec, rng);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
