//! Scene graph types for lux.
//!
//! A scene is a flat, ordered list of objects. Each object is one piece of
//! geometry (a sphere or a triangle mesh) with one material. The scene owns
//! all of it and is read-only while rendering.

use lux_math::Vec3;
use thiserror::Error;

use crate::material::{Color, Material};
use crate::mesh::Mesh;

/// Errors raised while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("sphere radius must be positive and finite, got {0}")]
    DegenerateSphere(f64),

    #[error("mesh has {0} vertices, which is not a multiple of three")]
    MalformedMesh(usize),

    #[error("mesh has no triangles with nonzero area")]
    EmptyMesh,

    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("no triangles found in OBJ data")]
    NoModels,
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// A sphere primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// The shape of an object.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Sphere(Sphere),
    Mesh(Mesh),
}

/// One renderable thing: geometry plus material.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub geometry: Geometry,
    pub material: Material,
}

impl Object {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self { geometry, material }
    }

    /// Create a sphere object.
    pub fn sphere(center: Vec3, radius: f64, material: Material) -> Self {
        Self::new(Geometry::Sphere(Sphere::new(center, radius)), material)
    }

    /// Create a mesh object.
    pub fn mesh(mesh: Mesh, material: Material) -> Self {
        Self::new(Geometry::Mesh(mesh), material)
    }
}

/// Where the camera sits and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPlacement {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraPlacement {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 50.0),
            look_at: Vec3::ZERO,
        }
    }
}

/// A scene together with the camera placement it was authored for.
#[derive(Clone, Debug)]
pub struct SceneSetup {
    pub scene: Scene,
    pub camera: CameraPlacement,
}

/// The complete scene: objects plus the color seen where nothing is hit.
#[derive(Clone, Debug)]
pub struct Scene {
    objects: Vec<Object>,
    /// Indices of emissive objects, in scene order
    lights: Vec<usize>,
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::ZERO)
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new(background: Color) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            background,
        }
    }

    /// Build a scene from a list of objects, validating each.
    pub fn with_objects(
        background: Color,
        objects: impl IntoIterator<Item = Object>,
    ) -> SceneResult<Self> {
        let mut scene = Self::new(background);
        for object in objects {
            scene.add(object)?;
        }
        Ok(scene)
    }

    /// Add an object to the scene.
    ///
    /// Degenerate geometry is rejected here so the renderer never sees it:
    /// spheres need a positive finite radius, meshes a whole number of
    /// triangles. Zero-area triangles are dropped from meshes.
    pub fn add(&mut self, mut object: Object) -> SceneResult<()> {
        match &mut object.geometry {
            Geometry::Sphere(sphere) => {
                if !(sphere.radius.is_finite() && sphere.radius > 0.0) {
                    return Err(SceneError::DegenerateSphere(sphere.radius));
                }
            }
            Geometry::Mesh(mesh) => {
                if mesh.vertex_count() % 3 != 0 {
                    return Err(SceneError::MalformedMesh(mesh.vertex_count()));
                }
                let dropped = mesh.remove_degenerate();
                if dropped > 0 {
                    log::warn!("Dropped {} degenerate triangles from mesh", dropped);
                }
                if mesh.triangle_count() == 0 {
                    return Err(SceneError::EmptyMesh);
                }
            }
        }

        if object.material.is_emissive() {
            self.lights.push(self.objects.len());
        }
        self.objects.push(object);
        Ok(())
    }

    /// All objects, in insertion order.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Indices (into [`objects`](Self::objects)) of the emissive objects.
    pub fn lights(&self) -> &[usize] {
        &self.lights
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total triangle count across all meshes.
    pub fn triangle_count(&self) -> usize {
        self.objects
            .iter()
            .map(|o| match &o.geometry {
                Geometry::Mesh(mesh) => mesh.triangle_count(),
                Geometry::Sphere(_) => 0,
            })
            .sum()
    }
}
