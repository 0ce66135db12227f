//! The BVH must report exactly what a linear scan over the same objects
//! reports.

use std::sync::Arc;

use lumen_renderer::{
    make_box, BvhNode, Color, HitRecord, Hittable, HittableList, Interval, Lambertian, Material,
    Point3, Ray, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn gray() -> Arc<dyn Material> {
    Arc::new(Lambertian::new(Color::splat(0.5)))
}

/// Disjoint boxes of random size on a jittered grid.
fn box_field(rng: &mut StdRng, per_side: i32) -> Vec<Arc<dyn Hittable>> {
    let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();
    for i in 0..per_side {
        for j in 0..per_side {
            for k in 0..per_side {
                let corner = Point3::new(i as f64 * 4.0, j as f64 * 4.0, k as f64 * 4.0);
                let min = corner + Vec3::splat(rng.gen_range(0.0..0.5));
                let size = Vec3::new(
                    rng.gen_range(0.5..3.0),
                    rng.gen_range(0.5..3.0),
                    rng.gen_range(0.5..3.0),
                );
                objects.push(Arc::new(make_box(min, min + size, gray())));
            }
        }
    }
    objects
}

fn random_ray(rng: &mut StdRng, extent: f64) -> Ray {
    let origin = Point3::new(
        rng.gen_range(-extent..2.0 * extent),
        rng.gen_range(-extent..2.0 * extent),
        rng.gen_range(-extent..2.0 * extent),
    );
    let target = Point3::new(
        rng.gen_range(0.0..extent),
        rng.gen_range(0.0..extent),
        rng.gen_range(0.0..extent),
    );
    Ray::new(origin, (target - origin).normalize(), 0.0)
}

fn closest_hit(
    object: &dyn Hittable,
    ray: &Ray,
    rng: &mut StdRng,
) -> Option<(f64, Point3)> {
    let mut rec = HitRecord::default();
    object
        .hit(ray, Interval::new(0.001, f64::INFINITY), &mut rec, rng)
        .then_some((rec.t, rec.p))
}

fn assert_agree(bvh: &BvhNode, list: &HittableList, ray: &Ray, rng: &mut StdRng) -> bool {
    let from_bvh = closest_hit(bvh, ray, rng);
    let from_list = closest_hit(list, ray, rng);

    match (from_bvh, from_list) {
        (Some((t_bvh, p_bvh)), Some((t_list, p_list))) => {
            assert!(
                (t_bvh - t_list).abs() < 1e-9,
                "t differs: bvh {t_bvh}, list {t_list} for {ray:?}"
            );
            assert!((p_bvh - p_list).length() < 1e-9);
            true
        }
        (None, None) => false,
        (bvh_hit, list_hit) => panic!(
            "bvh hit {:?} but list hit {:?} for {ray:?}",
            bvh_hit.map(|h| h.0),
            list_hit.map(|h| h.0)
        ),
    }
}

#[test]
fn bvh_matches_linear_scan_for_boxes() {
    let mut rng = StdRng::seed_from_u64(2024);
    let objects = box_field(&mut rng, 5);

    let mut list = HittableList::new();
    for object in &objects {
        list.add(Arc::clone(object));
    }
    let bvh = BvhNode::new(objects);
    assert_eq!(bvh.bounding_box(), list.bounding_box());

    let mut hits = 0;
    for _ in 0..1000 {
        let ray = random_ray(&mut rng, 20.0);
        if assert_agree(&bvh, &list, &ray, &mut rng) {
            hits += 1;
        }
    }
    // Most rays are aimed into the field
    assert!(hits > 500);
}

#[test]
fn bvh_matches_linear_scan_for_single_targets() {
    let mut rng = StdRng::seed_from_u64(7);
    let objects = box_field(&mut rng, 3);

    let mut list = HittableList::new();
    for object in &objects {
        list.add(Arc::clone(object));
    }
    let bvh = BvhNode::new(objects.clone());

    // From far below, straight up through each box's centre: with the boxes
    // offset on the grid, only boxes in that column can be hit
    for object in &objects {
        let bbox = object.bounding_box();
        let center = Point3::new(
            (bbox.x.min + bbox.x.max) / 2.0,
            -50.0,
            (bbox.z.min + bbox.z.max) / 2.0,
        );
        let ray = Ray::new(center, Vec3::Y, 0.0);
        assert!(assert_agree(&bvh, &list, &ray, &mut rng));
    }
}

#[test]
fn bvh_matches_linear_scan_for_mixed_primitives() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut objects = box_field(&mut rng, 3);
    for _ in 0..40 {
        let center = Point3::new(
            rng.gen_range(0.0..12.0),
            rng.gen_range(0.0..12.0),
            rng.gen_range(0.0..12.0),
        );
        objects.push(Arc::new(Sphere::new(center, rng.gen_range(0.2..1.5), gray())));
    }

    let mut list = HittableList::new();
    for object in &objects {
        list.add(Arc::clone(object));
    }
    let bvh = BvhNode::from_list(list.clone());

    for _ in 0..1000 {
        let ray = random_ray(&mut rng, 12.0);
        assert_agree(&bvh, &list, &ray, &mut rng);
    }
}
