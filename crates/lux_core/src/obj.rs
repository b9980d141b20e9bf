//! Wavefront OBJ loading.
//!
//! Faces are triangulated and de-indexed into the flat vertex-triple
//! layout of [`Mesh`]. All models in the file are merged into one mesh;
//! materials referenced by the file are ignored.

use std::io::BufRead;
use std::path::Path;

use lux_math::{Vec2, Vec3};

use crate::mesh::{Mesh, Vertex};
use crate::scene::{SceneError, SceneResult};

/// Load an OBJ file into a single mesh.
pub fn load_obj<P: AsRef<Path>>(path: P) -> SceneResult<Mesh> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
    let mesh = models_to_mesh(&models)?;

    log::info!(
        "Loaded {} triangles from {} ({} models, area {:.3})",
        mesh.triangle_count(),
        path.display(),
        models.len(),
        mesh.area()
    );
    Ok(mesh)
}

/// Read OBJ data from a reader. `mtllib` statements are ignored.
pub fn read_obj<R: BufRead>(reader: &mut R) -> SceneResult<Mesh> {
    let (models, _materials) = tobj::load_obj_buf(reader, &tobj::GPU_LOAD_OPTIONS, |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;
    models_to_mesh(&models)
}

fn models_to_mesh(models: &[tobj::Model]) -> SceneResult<Mesh> {
    if models.is_empty() {
        return Err(SceneError::NoModels);
    }

    let mut vertices = Vec::new();
    for model in models {
        let mesh = &model.mesh;
        let has_texcoords = !mesh.texcoords.is_empty();
        log::debug!(
            "OBJ model '{}': {} indices, texcoords: {}",
            model.name,
            mesh.indices.len(),
            has_texcoords
        );

        vertices.reserve(mesh.indices.len());
        for &index in &mesh.indices {
            let i = index as usize;
            let pos = Vec3::new(
                mesh.positions[i * 3] as f64,
                mesh.positions[i * 3 + 1] as f64,
                mesh.positions[i * 3 + 2] as f64,
            );
            let tex = if has_texcoords {
                Vec2::new(mesh.texcoords[i * 2] as f64, mesh.texcoords[i * 2 + 1] as f64)
            } else {
                Vec2::ZERO
            };
            vertices.push(Vertex::new(pos, tex));
        }
    }

    if vertices.is_empty() {
        return Err(SceneError::NoModels);
    }
    Ok(Mesh::new(vertices))
}
