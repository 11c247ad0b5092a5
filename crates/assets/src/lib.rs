//! Model import: reads skinned glTF/GLB files into plain mesh, skeleton and
//! clip data the scene and animation crates understand.
//!
//! Textures are not decoded. Materials contribute their base color factor only.

mod import;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod testing;

use diorama_animation::{AnimationClip, Skeleton, SkinnedMesh};
use std::path::Path;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("mesh {mesh} has no {attribute} attribute")]
    MissingAttribute {
        mesh: String,
        attribute: &'static str,
    },
    #[error("model contains no triangle meshes")]
    NoMeshes,
}

/// Everything needed to place and animate one model.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub meshes: Vec<SkinnedMesh>,
    pub skeleton: Skeleton,
    pub clips: Vec<AnimationClip>,
}

impl ModelAsset {
    pub fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(SkinnedMesh::vertex_count).sum()
    }
}

/// Load a `.glb` or `.gltf` model from disk.
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelAsset, AssetError> {
    let path = path.as_ref();
    // surface a plain IO error for missing files
    std::fs::metadata(path)?;
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob)?;
    let model = import::convert(&document, &buffers)?;
    tracing::info!(
        "loaded {}: {} meshes, {} joints, {} clips",
        path.display(),
        model.meshes.len(),
        model.skeleton.len(),
        model.clips.len()
    );
    Ok(model)
}

/// Load a self-contained model (GLB or glTF with embedded buffers) from memory.
pub fn load_model_from_slice(bytes: &[u8]) -> Result<ModelAsset, AssetError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, None, blob)?;
    import::convert(&document, &buffers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_from_slice() {
        let model = load_model_from_slice(&testing::skinned_triangle_glb()).unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.skeleton.len(), 1);
        assert_eq!(model.clip_names(), vec!["Idle"]);
    }

    #[test]
    fn load_from_disk() {
        let mut tmp = tempfile::Builder::new().suffix(".glb").tempfile().unwrap();
        tmp.write_all(&testing::skinned_triangle_glb()).unwrap();
        tmp.flush().unwrap();

        let model = load_model(tmp.path()).unwrap();
        assert_eq!(model.clips.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(dir.path().join("Soldier.glb")).unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
    }

    #[test]
    fn garbage_is_gltf_error() {
        let err = load_model_from_slice(b"definitely not a model").unwrap_err();
        assert!(matches!(err, AssetError::Gltf(_)));
    }
}
