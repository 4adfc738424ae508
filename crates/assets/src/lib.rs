//! Model loading for the scene: glTF import, the fixed asset manifest and the
//! model library the renderer uploads from.
//!
//! Models are loaded once at startup. The scene refers to them only through
//! [`solar_common::ModelHandle`]s handed out by [`ModelLibrary`].

mod library;
mod manifest;
mod model;

use std::path::PathBuf;

pub use library::ModelLibrary;
pub use manifest::AssetManifest;
pub use model::{MeshData, ModelData, load_model, load_model_from_slice, smooth_normals};
use solar_common::ModelHandle;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to import model {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("primitive {0} has no positions")]
    MissingPositions(String),
    #[error("model {0} contains no triangle meshes")]
    EmptyModel(String),
    #[error("model not found: {0:?}")]
    NotFound(ModelHandle),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    /// One triangle in the XY plane, node translated to z = 2, no normals.
    pub const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [ { "mesh": 0, "translation": [0.0, 0.0, 2.0] } ],
        "meshes": [ {
            "name": "tri",
            "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 } ]
        } ],
        "materials": [ { "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.5, 0.25, 1.0] } } ],
        "buffers": [ {
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    pub fn write_triangle(dir: &Path, file: &str) -> PathBuf {
        let path = dir.join(file);
        std::fs::write(&path, TRIANGLE_GLTF).unwrap();
        path
    }
}
