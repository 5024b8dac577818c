//! glTF / GLB model inspection.
//!
//! Only the geometry bounds are needed on the CPU side; the node hierarchy is
//! walked so that node transforms are folded into the result.

use std::path::Path;

use glam::{Mat4, Vec3};
use thiserror::Error;

use super::BoundingBox;

/// Errors that can occur while reading a model file.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("glTF import failed: {0}")]
    Import(#[from] gltf::Error),
    #[error("model contains no mesh geometry")]
    NoGeometry,
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),
}

/// Reads a `.gltf` / `.glb` file and returns the bounds of every mesh
/// primitive reachable from the default scene, in model space.
pub fn load_model_bounds(path: &Path) -> Result<BoundingBox, ModelError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if extension != "gltf" && extension != "glb" {
        return Err(ModelError::UnsupportedFormat(extension));
    }

    let (document, _buffers, _images) = gltf::import(path)?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());

    let mut corners = Vec::new();
    match scene {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node_corners(&node, Mat4::IDENTITY, &mut corners);
            }
        }
        // No scene graph: take the meshes as they are.
        None => {
            for mesh in document.meshes() {
                collect_mesh_corners(&mesh, Mat4::IDENTITY, &mut corners);
            }
        }
    }

    if corners.is_empty() {
        return Err(ModelError::NoGeometry);
    }
    Ok(BoundingBox::from_points(corners))
}

fn collect_node_corners(node: &gltf::Node<'_>, parent: Mat4, out: &mut Vec<Vec3>) {
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let world = parent * local;
    if let Some(mesh) = node.mesh() {
        collect_mesh_corners(&mesh, world, out);
    }
    for child in node.children() {
        collect_node_corners(&child, world, out);
    }
}

fn collect_mesh_corners(mesh: &gltf::Mesh<'_>, transform: Mat4, out: &mut Vec<Vec3>) {
    for primitive in mesh.primitives() {
        let bb = primitive.bounding_box();
        let (min, max) = (Vec3::from(bb.min), Vec3::from(bb.max));
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            );
            out.push(transform.transform_point3(corner));
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_assets::write_triangle;
    use super::*;
    use approx::assert_relative_eq;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("scene-sandbox-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_bounds_include_node_transform() {
        let path = write_triangle("bounds", "triangle.gltf");

        let bounds = load_model_bounds(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_relative_eq!(bounds.min.y, 1.0);
        assert_relative_eq!(bounds.max.x, 1.0);
        assert_relative_eq!(bounds.max.y, 3.0);
        assert_relative_eq!(bounds.size().z, 0.0);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_model_bounds(Path::new("tree.obj")).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedFormat(ext) if ext == "obj"));
    }

    #[test]
    fn test_missing_file_is_import_error() {
        let err = load_model_bounds(&temp_path("does-not-exist.glb")).unwrap_err();
        assert!(matches!(err, ModelError::Import(_)));
    }

    #[test]
    fn test_garbage_file_is_import_error() {
        let path = temp_path("garbage.glb");
        std::fs::write(&path, b"not a model").unwrap();
        let result = load_model_bounds(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ModelError::Import(_))));
    }
}
