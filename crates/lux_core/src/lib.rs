//! Lux Core - Scene model for the lux ray tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Object`, `Geometry`, `Sphere`, `Mesh`, `Material`
//! - **Loading**: OBJ meshes via tobj and JSON scene descriptions
//! - **Presets**: the built-in room scene
//!
//! # Example
//!
//! ```ignore
//! use lux_core::{description::load_scene, presets};
//!
//! let setup = load_scene("scene.json")?;
//! println!("{} objects, {} lights", setup.scene.len(), setup.scene.lights().len());
//!
//! let room = presets::room(16.0 / 9.0);
//! ```

pub mod description;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod presets;
pub mod scene;

// Re-export commonly used types
pub use material::{Color, Material, MaterialFlags};
pub use mesh::{Mesh, Vertex};
pub use scene::{
    CameraPlacement, Geometry, Object, Scene, SceneError, SceneResult, SceneSetup, Sphere,
};
