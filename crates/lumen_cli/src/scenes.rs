//! Built-in demo scenes.
//!
//! Each builder returns the geometry, the lights to importance-sample (if
//! any), a camera that still needs `initialize`, and the render settings the
//! scene was tuned for.

use std::sync::Arc;

use lumen_math::{Point3, Vec3};
use lumen_renderer::{
    make_box, BvhNode, Camera, CheckerTexture, Color, ConstantMedium, Dielectric, DiffuseLight,
    Hittable, HittableList, ImageTexture, Lambertian, Material, Metal, NoiseTexture, Quad,
    RenderConfig, RotateY, Sphere, Translate,
};
use rand::rngs::StdRng;
use rand::Rng;

use crate::cli::SceneKind;

const SKY: Color = Color::new(0.70, 0.80, 1.00);

pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub lights: Option<Arc<dyn Hittable>>,
    pub camera: Camera,
    pub config: RenderConfig,
}

/// Build the scene `kind`, drawing any random placement from `rng`.
pub fn build(kind: SceneKind, rng: &mut StdRng) -> Scene {
    match kind {
        SceneKind::BouncingSpheres => bouncing_spheres(rng),
        SceneKind::CheckeredSpheres => checkered_spheres(),
        SceneKind::Earth => earth(),
        SceneKind::PerlinSpheres => perlin_spheres(rng),
        SceneKind::Quads => quads(),
        SceneKind::SimpleLight => simple_light(rng),
        SceneKind::CornellBox => cornell_box(),
        SceneKind::CornellSmoke => cornell_smoke(),
        SceneKind::FinalScene => final_scene(rng),
        SceneKind::TwoSpheres => two_spheres(),
    }
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(albedo))
}

fn light(emit: Color) -> Arc<dyn Material> {
    Arc::new(DiffuseLight::new(emit))
}

fn random_color(rng: &mut StdRng, min: f64, max: f64) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

fn sky_config(samples_per_pixel: u32, max_depth: u32) -> RenderConfig {
    RenderConfig {
        samples_per_pixel,
        max_depth,
        background: SKY,
        ..RenderConfig::default()
    }
}

fn dark_config(samples_per_pixel: u32, max_depth: u32) -> RenderConfig {
    RenderConfig {
        samples_per_pixel,
        max_depth,
        background: Color::ZERO,
        ..RenderConfig::default()
    }
}

fn bouncing_spheres(rng: &mut StdRng) -> Scene {
    let mut world = HittableList::new();

    let checker = CheckerTexture::from_colors(0.32, Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::with_texture(Arc::new(checker))),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // diffuse, bouncing upward over the shutter interval
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                let center2 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                world.add(Arc::new(Sphere::moving(center, center2, 0.2, lambertian(albedo))));
            } else if choose_mat < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    Scene {
        world: Arc::new(BvhNode::from_list(world)),
        lights: None,
        camera: Camera::new()
            .with_image(1200, 16.0 / 9.0)
            .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.6, 10.0),
        config: sky_config(100, 50),
    }
}

fn checkered_spheres() -> Scene {
    let mut world = HittableList::new();

    let checker: Arc<dyn Material> = Arc::new(Lambertian::with_texture(Arc::new(
        CheckerTexture::from_colors(0.32, Color::new(0.2, 0.3, 0.1), Color::splat(0.9)),
    )));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, -10.0, 0.0), 10.0, Arc::clone(&checker))));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 10.0, 0.0), 10.0, checker)));

    Scene {
        world: Arc::new(world),
        lights: None,
        camera: Camera::new()
            .with_image(400, 16.0 / 9.0)
            .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0),
        config: sky_config(100, 50),
    }
}

fn earth() -> Scene {
    let earth_surface: Arc<dyn Material> = Arc::new(Lambertian::with_texture(Arc::new(
        ImageTexture::new("earthmap.jpg"),
    )));
    let globe: Arc<dyn Hittable> = Arc::new(Sphere::new(Point3::ZERO, 2.0, earth_surface));

    Scene {
        world: Arc::new(HittableList::from(globe)),
        lights: None,
        camera: Camera::new()
            .with_image(400, 16.0 / 9.0)
            .with_position(Point3::new(0.0, 0.0, 12.0), Point3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0),
        config: sky_config(100, 50),
    }
}

fn perlin_spheres(rng: &mut StdRng) -> Scene {
    let mut world = HittableList::new();

    let pertext: Arc<dyn Material> =
        Arc::new(Lambertian::with_texture(Arc::new(NoiseTexture::new(4.0, rng))));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::clone(&pertext),
    )));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 2.0, 0.0), 2.0, pertext)));

    Scene {
        world: Arc::new(world),
        lights: None,
        camera: Camera::new()
            .with_image(400, 16.0 / 9.0)
            .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0),
        config: sky_config(100, 50),
    }
}

fn quads() -> Scene {
    let mut world = HittableList::new();

    let left_red = lambertian(Color::new(1.0, 0.2, 0.2));
    let back_green = lambertian(Color::new(0.2, 1.0, 0.2));
    let right_blue = lambertian(Color::new(0.2, 0.2, 1.0));
    let upper_orange = lambertian(Color::new(1.0, 0.5, 0.0));
    let lower_teal = lambertian(Color::new(0.2, 0.8, 0.8));

    world.add(Arc::new(Quad::new(
        Point3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    )));

    Scene {
        world: Arc::new(world),
        lights: None,
        camera: Camera::new()
            .with_image(400, 1.0)
            .with_position(Point3::new(0.0, 0.0, 9.0), Point3::ZERO, Vec3::Y)
            .with_lens(80.0, 0.0, 10.0),
        config: sky_config(100, 50),
    }
}

fn simple_light(rng: &mut StdRng) -> Scene {
    let mut world = HittableList::new();

    let pertext: Arc<dyn Material> =
        Arc::new(Lambertian::with_texture(Arc::new(NoiseTexture::new(4.0, rng))));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::clone(&pertext),
    )));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 2.0, 0.0), 2.0, pertext)));

    let difflight = light(Color::splat(4.0));
    let panel: Arc<dyn Hittable> = Arc::new(Quad::new(
        Point3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        Arc::clone(&difflight),
    ));
    let bulb: Arc<dyn Hittable> = Arc::new(Sphere::new(Point3::new(0.0, 7.0, 0.0), 2.0, difflight));
    world.add(Arc::clone(&panel));
    world.add(Arc::clone(&bulb));

    let mut lights = HittableList::new();
    lights.add(panel);
    lights.add(bulb);

    Scene {
        world: Arc::new(world),
        lights: Some(Arc::new(lights)),
        camera: Camera::new()
            .with_image(400, 16.0 / 9.0)
            .with_position(Point3::new(26.0, 3.0, 6.0), Point3::new(0.0, 2.0, 0.0), Vec3::Y)
            .with_lens(20.0, 0.0, 10.0),
        config: dark_config(100, 50),
    }
}

/// Walls of the 555-unit Cornell box, without the ceiling light.
fn cornell_walls(world: &mut HittableList, white: &Arc<dyn Material>) {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));

    world.add(Arc::new(Quad::new(
        Point3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        Arc::clone(white),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        Arc::clone(white),
    )));
    world.add(Arc::new(Quad::new(
        Point3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Arc::clone(white),
    )));
}

/// The tall and the short block, rotated and moved into place.
fn cornell_blocks(white: &Arc<dyn Material>) -> (Arc<dyn Hittable>, Arc<dyn Hittable>) {
    let tall: Arc<dyn Hittable> = Arc::new(make_box(
        Point3::ZERO,
        Point3::new(165.0, 330.0, 165.0),
        Arc::clone(white),
    ));
    let tall = Arc::new(RotateY::new(tall, 15.0));
    let tall: Arc<dyn Hittable> = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> = Arc::new(make_box(
        Point3::ZERO,
        Point3::splat(165.0),
        Arc::clone(white),
    ));
    let short = Arc::new(RotateY::new(short, -18.0));
    let short: Arc<dyn Hittable> = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    (tall, short)
}

fn cornell_camera(width: u32) -> Camera {
    Camera::new()
        .with_image(width, 1.0)
        .with_position(
            Point3::new(278.0, 278.0, -800.0),
            Point3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
}

fn cornell_box() -> Scene {
    let mut world = HittableList::new();
    let white = lambertian(Color::splat(0.73));
    cornell_walls(&mut world, &white);

    let ceiling_light: Arc<dyn Hittable> = Arc::new(Quad::new(
        Point3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light(Color::splat(15.0)),
    ));
    world.add(Arc::clone(&ceiling_light));

    let (tall, short) = cornell_blocks(&white);
    world.add(tall);
    world.add(short);

    Scene {
        world: Arc::new(BvhNode::from_list(world)),
        lights: Some(Arc::new(HittableList::from(ceiling_light))),
        camera: cornell_camera(600),
        config: dark_config(1000, 50),
    }
}

fn cornell_smoke() -> Scene {
    let mut world = HittableList::new();
    let white = lambertian(Color::splat(0.73));
    cornell_walls(&mut world, &white);

    let ceiling_light: Arc<dyn Hittable> = Arc::new(Quad::new(
        Point3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        light(Color::splat(7.0)),
    ));
    world.add(Arc::clone(&ceiling_light));

    let (tall, short) = cornell_blocks(&white);
    world.add(Arc::new(ConstantMedium::new(tall, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::new(short, 0.01, Color::ONE)));

    Scene {
        world: Arc::new(BvhNode::from_list(world)),
        lights: Some(Arc::new(HittableList::from(ceiling_light))),
        camera: cornell_camera(600),
        config: dark_config(200, 50),
    }
}

fn final_scene(rng: &mut StdRng) -> Scene {
    let mut boxes1 = HittableList::new();
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));

    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f64 * w;
            let z0 = -1000.0 + j as f64 * w;
            let y0 = 0.0;
            let x1 = x0 + w;
            let y1 = rng.gen_range(1.0..101.0);
            let z1 = z0 + w;

            boxes1.add(Arc::new(make_box(
                Point3::new(x0, y0, z0),
                Point3::new(x1, y1, z1),
                Arc::clone(&ground),
            )));
        }
    }

    let mut world = HittableList::new();
    world.add(Arc::new(BvhNode::from_list(boxes1)));

    let ceiling_light: Arc<dyn Hittable> = Arc::new(Quad::new(
        Point3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        light(Color::splat(7.0)),
    ));
    world.add(Arc::clone(&ceiling_light));

    let center1 = Point3::new(400.0, 400.0, 200.0);
    let center2 = center1 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Arc::new(Sphere::moving(
        center1,
        center2,
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    )));

    world.add(Arc::new(Sphere::new(
        Point3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass ball filled with blue fog
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Point3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(Arc::clone(&boundary));
    world.add(Arc::new(ConstantMedium::new(
        boundary,
        0.2,
        Color::new(0.2, 0.4, 0.9),
    )));

    // Thin mist over everything
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Point3::ZERO,
        5000.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(Arc::new(ConstantMedium::new(boundary, 0.0001, Color::ONE)));

    let emat: Arc<dyn Material> = Arc::new(Lambertian::with_texture(Arc::new(
        ImageTexture::new("earthmap.jpg"),
    )));
    world.add(Arc::new(Sphere::new(Point3::new(400.0, 200.0, 400.0), 100.0, emat)));

    let pertext: Arc<dyn Material> =
        Arc::new(Lambertian::with_texture(Arc::new(NoiseTexture::new(0.2, rng))));
    world.add(Arc::new(Sphere::new(Point3::new(220.0, 280.0, 300.0), 80.0, pertext)));

    let mut boxes2 = HittableList::new();
    let white = lambertian(Color::splat(0.73));
    for _ in 0..1000 {
        let center = Point3::new(
            rng.gen_range(0.0..165.0),
            rng.gen_range(0.0..165.0),
            rng.gen_range(0.0..165.0),
        );
        boxes2.add(Arc::new(Sphere::new(center, 10.0, Arc::clone(&white))));
    }

    let cluster = Arc::new(RotateY::new(Arc::new(BvhNode::from_list(boxes2)), 15.0));
    world.add(Arc::new(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0))));

    Scene {
        world: Arc::new(world),
        lights: Some(Arc::new(HittableList::from(ceiling_light))),
        camera: Camera::new()
            .with_image(400, 1.0)
            .with_position(
                Point3::new(478.0, 278.0, -600.0),
                Point3::new(278.0, 278.0, 0.0),
                Vec3::Y,
            )
            .with_lens(40.0, 0.0, 10.0),
        config: dark_config(250, 4),
    }
}

fn two_spheres() -> Scene {
    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        lambertian(Color::splat(0.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::ZERO,
        2.0,
        lambertian(Color::new(0.8, 0.3, 0.3)),
    )));

    Scene {
        world: Arc::new(world),
        lights: None,
        camera: Camera::new()
            .with_image(400, 16.0 / 9.0)
            .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.0, 10.0),
        config: sky_config(1, 50),
    }
}
