//! Built-in scenes.

use lux_math::{Vec2, Vec3};

use crate::material::{Color, Material, MaterialFlags};
use crate::mesh::{Mesh, Vertex};
use crate::scene::{CameraPlacement, Object, Scene, SceneResult, SceneSetup};

/// Default background: a very dark grey, RGB(10, 10, 10).
pub const BACKGROUND: Color = Color::new(10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0);

const WHITE: Color = Color::ONE;
const BLACK: Color = Color::ZERO;
const RED: Color = Color::new(1.0, 0.0, 0.0);
const GREEN: Color = Color::new(0.0, 192.0 / 255.0, 48.0 / 255.0);

const ROOM_DEPTH: f64 = 30.0;
const ROOM_HEIGHT: f64 = 20.0;
/// Walls are spheres this large, flat enough to pass for planes.
const WALL_RADIUS: f64 = 10_000.0;
const LIGHT_RADIUS: f64 = 15.0;
const LIGHT_EMISSION: f64 = 12.0;

/// A sphere of radius `r` resting on the plane `y`, centered at (x, z).
fn resting(x: f64, y: f64, z: f64, r: f64) -> (Vec3, f64) {
    (Vec3::new(x, y + r, z), r)
}

/// The demo room: six giant-sphere walls, a cluster of white and mirrored
/// spheres on the floor, and one large emissive sphere poking through the
/// ceiling. Every non-emissive surface is lit with global illumination.
///
/// The room's width follows `aspect_ratio` so the side walls sit at the
/// frame edges.
pub fn room(aspect_ratio: f64) -> SceneResult<SceneSetup> {
    let room_width = ROOM_HEIGHT * aspect_ratio;
    let floor = -ROOM_HEIGHT;

    let diffuse = |color: Color| Material::new(color).with_flags(MaterialFlags::GLOBAL_ILLUM);
    let mirror = |color: Color| {
        Material::new(color).with_flags(MaterialFlags::GLOBAL_ILLUM | MaterialFlags::REFLECTION)
    };

    let wall = |center: Vec3, color: Color| Object::sphere(center, WALL_RADIUS, diffuse(color));

    let mut objects = vec![
        // floor
        wall(Vec3::new(0.0, -WALL_RADIUS - ROOM_HEIGHT, 0.0), WHITE),
        // back wall
        wall(Vec3::new(0.0, 0.0, -WALL_RADIUS - ROOM_DEPTH), WHITE),
        // left wall
        wall(Vec3::new(-WALL_RADIUS - room_width, 0.0, 0.0), GREEN),
        // right wall
        wall(Vec3::new(WALL_RADIUS + room_width, 0.0, 0.0), RED),
        // ceiling
        wall(Vec3::new(0.0, WALL_RADIUS + ROOM_HEIGHT, 0.0), WHITE),
        // front wall, behind the camera
        wall(Vec3::new(0.0, 0.0, WALL_RADIUS + ROOM_DEPTH * 2.0), BLACK),
    ];

    let props = [
        (resting(-11.0, floor, -12.0, 7.0), diffuse(WHITE)),
        (resting(13.0, floor, -13.0, 8.0), mirror(WHITE)),
        (resting(0.0, floor, 0.0, 9.0), mirror(WHITE)),
        (resting(-11.0, floor, 10.0, 5.0), mirror(WHITE)),
        (resting(11.0, ROOM_HEIGHT / 4.0, 10.0, 6.0), diffuse(WHITE)),
        (resting(-5.0, 5.0, -5.0, 5.0), mirror(WHITE)),
        (resting(2.0, floor, 12.0, 3.0), diffuse(WHITE)),
    ];
    objects.extend(
        props
            .into_iter()
            .map(|((center, radius), material)| Object::sphere(center, radius, material)),
    );

    // light
    objects.push(Object::sphere(
        Vec3::new(0.0, ROOM_HEIGHT + LIGHT_RADIUS * 0.9, 0.0),
        LIGHT_RADIUS,
        diffuse(BLACK).with_emission(Color::splat(LIGHT_EMISSION)),
    ));

    Ok(SceneSetup {
        scene: Scene::with_objects(BACKGROUND, objects)?,
        camera: CameraPlacement {
            position: Vec3::new(0.0, 0.0, 50.0),
            look_at: Vec3::ZERO,
        },
    })
}

/// An axis-aligned unit cube centered at the origin, 12 triangles with
/// per-face texture coordinates.
pub fn cube_mesh() -> Mesh {
    const P: f64 = 0.5;
    const N: f64 = -0.5;

    #[rustfmt::skip]
    let data: [([f64; 3], [f64; 2]); 36] = [
        // top
        ([N, P, N], [0.0, 1.0]), ([P, P, N], [1.0, 1.0]), ([P, P, P], [1.0, 0.0]),
        ([P, P, P], [1.0, 0.0]), ([N, P, P], [0.0, 0.0]), ([N, P, N], [0.0, 1.0]),
        // back
        ([N, N, N], [0.0, 0.0]), ([P, N, N], [1.0, 0.0]), ([P, P, N], [1.0, 1.0]),
        ([P, P, N], [1.0, 1.0]), ([N, P, N], [0.0, 1.0]), ([N, N, N], [0.0, 0.0]),
        // front
        ([N, N, P], [0.0, 0.0]), ([P, N, P], [1.0, 0.0]), ([P, P, P], [1.0, 1.0]),
        ([P, P, P], [1.0, 1.0]), ([N, P, P], [0.0, 1.0]), ([N, N, P], [0.0, 0.0]),
        // left
        ([N, P, P], [1.0, 0.0]), ([N, P, N], [1.0, 1.0]), ([N, N, N], [0.0, 1.0]),
        ([N, N, N], [0.0, 1.0]), ([N, N, P], [0.0, 0.0]), ([N, P, P], [1.0, 0.0]),
        // right
        ([P, P, P], [1.0, 0.0]), ([P, P, N], [1.0, 1.0]), ([P, N, N], [0.0, 1.0]),
        ([P, N, N], [0.0, 1.0]), ([P, N, P], [0.0, 0.0]), ([P, P, P], [1.0, 0.0]),
        // bottom
        ([N, N, N], [0.0, 1.0]), ([P, N, N], [1.0, 1.0]), ([P, N, P], [1.0, 0.0]),
        ([P, N, P], [1.0, 0.0]), ([N, N, P], [0.0, 0.0]), ([N, N, N], [0.0, 1.0]),
    ];

    Mesh::new(
        data.iter()
            .map(|(p, t)| Vertex::new(Vec3::from_array(*p), Vec2::from_array(*t)))
            .collect(),
    )
}
