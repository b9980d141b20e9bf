//! JSON scene descriptions.
//!
//! A description lists objects with their geometry and material, plus an
//! optional background color and camera placement:
//!
//! ```json
//! {
//!   "background": [0.04, 0.04, 0.04],
//!   "camera": { "position": [0, 0, 50], "look_at": [0, 0, 0] },
//!   "objects": [
//!     { "geometry": { "sphere": { "center": [0, 0, 0], "radius": 5 } },
//!       "material": { "color": [1, 1, 1], "flags": ["reflection"] } },
//!     { "geometry": { "mesh": { "obj": "cube.obj",
//!                               "transform": { "scale": [4, 4, 4] } } } }
//!   ]
//! }
//! ```
//!
//! Relative OBJ paths resolve against the directory of the JSON file.

use std::path::{Path, PathBuf};

use lux_math::{rotate, scale, translate, Mat4, Vec3};
use serde::Deserialize;
use thiserror::Error;

use crate::material::{Color, Material, MaterialFlags};
use crate::mesh::Mesh;
use crate::obj::load_obj;
use crate::presets;
use crate::scene::{CameraPlacement, Geometry, Object, Scene, SceneError, SceneSetup, Sphere};

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Unknown material flag: {0}")]
    UnknownFlag(String),
}

pub type DescriptionResult<T> = Result<T, DescriptionError>;

/// Top level of a scene file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default)]
    pub camera: Option<CameraDescription>,
    pub objects: Vec<ObjectDescription>,
}

fn default_background() -> Color {
    presets::BACKGROUND
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraDescription {
    pub position: Vec3,
    pub look_at: Vec3,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDescription {
    pub geometry: GeometryDescription,
    #[serde(default)]
    pub material: MaterialDescription,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum GeometryDescription {
    Sphere {
        center: Vec3,
        radius: f64,
    },
    /// A mesh loaded from an OBJ file.
    Mesh {
        obj: PathBuf,
        #[serde(default)]
        transform: TransformDescription,
    },
    /// The built-in unit cube.
    Cube {
        #[serde(default)]
        transform: TransformDescription,
    },
    /// Inline triangle soup, three positions per triangle.
    Triangles {
        vertices: Vec<Vec3>,
        #[serde(default)]
        transform: TransformDescription,
    },
}

/// Scale, then rotate (Euler angles in degrees), then translate.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformDescription {
    pub translate: Vec3,
    pub rotate: Vec3,
    pub scale: Vec3,
}

impl Default for TransformDescription {
    fn default() -> Self {
        Self {
            translate: Vec3::ZERO,
            rotate: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl TransformDescription {
    pub fn matrix(&self) -> Mat4 {
        let radians = Vec3::new(
            self.rotate.x.to_radians(),
            self.rotate.y.to_radians(),
            self.rotate.z.to_radians(),
        );
        translate(self.translate) * rotate(radians) * scale(self.scale)
    }
}

/// Material fields; anything left out takes the [`Material`] default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialDescription {
    pub color: Option<Color>,
    pub emission: Option<Color>,
    pub ka: Option<f64>,
    pub kd: Option<f64>,
    pub ks: Option<f64>,
    pub shininess: Option<f64>,
    pub reflectivity: Option<f64>,
    pub ior: Option<f64>,
    pub flags: Vec<String>,
}

impl MaterialDescription {
    pub fn to_material(&self) -> DescriptionResult<Material> {
        let defaults = Material::default();

        let mut flags = MaterialFlags::empty();
        for name in &self.flags {
            flags |= MaterialFlags::from_name(name)
                .ok_or_else(|| DescriptionError::UnknownFlag(name.clone()))?;
        }

        Ok(Material {
            color: self.color.unwrap_or(defaults.color),
            emission: self.emission.unwrap_or(defaults.emission),
            ka: self.ka.unwrap_or(defaults.ka),
            kd: self.kd.unwrap_or(defaults.kd),
            ks: self.ks.unwrap_or(defaults.ks),
            shininess: self.shininess.unwrap_or(defaults.shininess),
            reflectivity: self
                .reflectivity
                .unwrap_or(defaults.reflectivity)
                .clamp(0.0, 1.0),
            ior: self.ior.unwrap_or(defaults.ior),
            flags,
        })
    }
}

impl SceneDescription {
    /// Build a validated scene. `base_dir` anchors relative OBJ paths.
    pub fn build(&self, base_dir: &Path) -> DescriptionResult<SceneSetup> {
        let mut scene = Scene::new(self.background);

        for object in &self.objects {
            let geometry = match &object.geometry {
                GeometryDescription::Sphere { center, radius } => {
                    Geometry::Sphere(Sphere::new(*center, *radius))
                }
                GeometryDescription::Mesh { obj, transform } => {
                    let mut mesh = load_obj(base_dir.join(obj))?;
                    mesh.transform(&transform.matrix());
                    Geometry::Mesh(mesh)
                }
                GeometryDescription::Cube { transform } => {
                    let mut mesh = presets::cube_mesh();
                    mesh.transform(&transform.matrix());
                    Geometry::Mesh(mesh)
                }
                GeometryDescription::Triangles {
                    vertices,
                    transform,
                } => {
                    let mut mesh = Mesh::from_positions(vertices);
                    mesh.transform(&transform.matrix());
                    Geometry::Mesh(mesh)
                }
            };
            scene.add(Object::new(geometry, object.material.to_material()?))?;
        }

        let camera = self
            .camera
            .as_ref()
            .map(|c| CameraPlacement {
                position: c.position,
                look_at: c.look_at,
            })
            .unwrap_or_default();

        log::debug!(
            "Built scene: {} objects, {} lights, {} triangles",
            scene.len(),
            scene.lights().len(),
            scene.triangle_count()
        );

        Ok(SceneSetup { scene, camera })
    }
}

/// Parse a description from a JSON string.
pub fn from_str(json: &str, base_dir: &Path) -> DescriptionResult<SceneSetup> {
    let description: SceneDescription = serde_json::from_str(json)?;
    description.build(base_dir)
}

/// Load a scene description file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> DescriptionResult<SceneSetup> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    log::info!("Loading scene description {}", path.display());
    from_str(&json, base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spheres() {
        let json = r#"{
            "background": [0.1, 0.2, 0.3],
            "camera": { "position": [0, 1, 10], "look_at": [0, 0, 0] },
            "objects": [
                { "geometry": { "sphere": { "center": [0, 0, 0], "radius": 2 } },
                  "material": { "color": [1, 0, 0], "flags": ["reflection", "global_illum"] } },
                { "geometry": { "sphere": { "center": [0, 10, 0], "radius": 1 } },
                  "material": { "emission": [4, 4, 4] } }
            ]
        }"#;
        let setup = from_str(json, Path::new(".")).unwrap();

        assert_eq!(setup.scene.len(), 2);
        assert_eq!(setup.scene.background, Color::new(0.1, 0.2, 0.3));
        assert_eq!(setup.scene.lights(), &[1]);
        assert_eq!(setup.camera.position, Vec3::new(0.0, 1.0, 10.0));

        let material = setup.scene.objects()[0].material;
        assert_eq!(material.color, Color::new(1.0, 0.0, 0.0));
        assert!(material.has(MaterialFlags::REFLECTION | MaterialFlags::GLOBAL_ILLUM));
        assert_eq!(material.ka, Material::default().ka);
    }

    #[test]
    fn test_defaults() {
        let json = r#"{ "objects": [] }"#;
        let setup = from_str(json, Path::new(".")).unwrap();

        assert!(setup.scene.is_empty());
        assert_eq!(setup.scene.background, presets::BACKGROUND);
        assert_eq!(setup.camera, CameraPlacement::default());
    }

    #[test]
    fn test_unknown_flag() {
        let json = r#"{ "objects": [
            { "geometry": { "sphere": { "center": [0, 0, 0], "radius": 1 } },
              "material": { "flags": ["sparkly"] } }
        ] }"#;
        let result = from_str(json, Path::new("."));

        assert!(matches!(result, Err(DescriptionError::UnknownFlag(f)) if f == "sparkly"));
    }

    #[test]
    fn test_degenerate_sphere_rejected() {
        let json = r#"{ "objects": [
            { "geometry": { "sphere": { "center": [0, 0, 0], "radius": 0 } } }
        ] }"#;
        let result = from_str(json, Path::new("."));

        assert!(matches!(
            result,
            Err(DescriptionError::Scene(SceneError::DegenerateSphere(_)))
        ));
    }

    #[test]
    fn test_triangles_with_transform() {
        let json = r#"{ "objects": [
            { "geometry": { "triangles": {
                "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
                "transform": { "translate": [0, 0, -3], "scale": [2, 2, 2] } } } }
        ] }"#;
        let setup = from_str(json, Path::new(".")).unwrap();

        match &setup.scene.objects()[0].geometry {
            Geometry::Mesh(mesh) => {
                assert_eq!(mesh.vertices[1].pos, Vec3::new(2.0, 0.0, -3.0));
            }
            other => panic!("expected mesh, got {other:?}"),
        }
    }

    #[test]
    fn test_cube_geometry() {
        let json = r#"{ "objects": [ { "geometry": { "cube": {} } } ] }"#;
        let setup = from_str(json, Path::new(".")).unwrap();

        assert_eq!(setup.scene.triangle_count(), 12);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{ "objects": [], "lights": [] }"#;
        assert!(matches!(
            from_str(json, Path::new(".")),
            Err(DescriptionError::Json(_))
        ));
    }

    #[test]
    fn test_transform_order() {
        let transform = TransformDescription {
            translate: Vec3::new(1.0, 0.0, 0.0),
            rotate: Vec3::new(0.0, 0.0, 90.0),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let p = transform.matrix().transform_point3(Vec3::X);

        // scale to (2,0,0), rotate to (0,2,0), translate to (1,2,0)
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-9);
    }
}
