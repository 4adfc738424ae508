use glam::{Mat3, Mat4, Vec3};
use std::path::Path;

use crate::AssetError;

/// One triangle list with a flat base colour.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

/// A loaded model: every triangle primitive of the file, with node
/// transforms baked into the vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub name: String,
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }

    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len()).sum()
    }
}

/// Load a `.gltf` or `.glb` file.
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelData, AssetError> {
    let path = path.as_ref();
    let (document, buffers, _images) =
        gltf::import(path).map_err(|source| AssetError::Import {
            path: path.to_path_buf(),
            source,
        })?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string();
    let model = build_model(name, &document, &buffers)?;

    tracing::debug!(
        path = %path.display(),
        meshes = model.meshes.len(),
        vertices = model.vertex_count(),
        "loaded model"
    );
    Ok(model)
}

/// Load a model from in-memory glTF/GLB bytes.
pub fn load_model_from_slice(name: &str, data: &[u8]) -> Result<ModelData, AssetError> {
    let (document, buffers, _images) = gltf::import_slice(data)?;
    build_model(name.to_string(), &document, &buffers)
}

fn build_model(
    name: String,
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<ModelData, AssetError> {
    let mut meshes = Vec::new();
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());

    if let Some(scene) = scene {
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, buffers, &mut meshes)?;
        }
    }

    if meshes.is_empty() {
        return Err(AssetError::EmptyModel(name));
    }
    Ok(ModelData { name, meshes })
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<MeshData>,
) -> Result<(), AssetError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh.name().unwrap_or("unnamed");
        for (i, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::warn!(mesh = mesh_name, mode = ?primitive.mode(), "skipping non-triangle primitive");
                continue;
            }
            meshes.push(read_primitive(
                format!("{mesh_name}_{i}"),
                &primitive,
                buffers,
                world,
            )?);
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, meshes)?;
    }
    Ok(())
}

fn read_primitive(
    name: String,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    world: Mat4,
) -> Result<MeshData, AssetError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| AssetError::MissingPositions(name.clone()))?
        .map(|p| world.transform_point3(Vec3::from(p)))
        .collect();

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let normals: Vec<Vec3> = match reader.read_normals() {
        Some(iter) => {
            let normal_matrix = normal_matrix(world);
            iter.map(|n| (normal_matrix * Vec3::from(n)).normalize_or_zero())
                .collect()
        }
        None => smooth_normals(&positions, &indices),
    };

    let base_color = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();

    Ok(MeshData {
        name,
        positions: positions.iter().map(|p| p.to_array()).collect(),
        normals: normals.iter().map(|n| n.to_array()).collect(),
        indices,
        base_color,
    })
}

fn normal_matrix(world: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(world);
    if m.determinant().abs() > f32::EPSILON {
        m.inverse().transpose()
    } else {
        m
    }
}

/// Area-weighted vertex normals for meshes that ship without any.
pub fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{TRIANGLE_GLTF, write_triangle};

    #[test]
    fn loads_triangle_with_baked_transform() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_triangle(dir.path(), "tri.gltf");

        let model = load_model(&path).unwrap();
        assert_eq!(model.name, "tri");
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.index_count(), 3);

        let mesh = &model.meshes[0];
        assert_eq!(mesh.name, "tri_0");
        assert_eq!(mesh.positions[1], [1.0, 0.0, 2.0]);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.base_color, [1.0, 0.5, 0.25, 1.0]);
        for n in &mesh.normals {
            assert!((Vec3::from(*n) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn loads_from_slice() {
        let model = load_model_from_slice("inline", TRIANGLE_GLTF.as_bytes()).unwrap();
        assert_eq!(model.name, "inline");
        assert_eq!(model.vertex_count(), 3);
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(dir.path().join("nope.glb")).unwrap_err();
        assert!(matches!(err, AssetError::Import { .. }));
    }

    #[test]
    fn smooth_normals_average_shared_vertices() {
        // Two triangles folded along the X axis.
        let positions = [
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
        ];
        let normals = smooth_normals(&positions, &[0, 1, 2, 0, 3, 1]);
        assert!((normals[2] - Vec3::Z).length() < 1e-6);
        assert!((normals[3] - Vec3::Y).length() < 1e-6);
        let shared = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((normals[0] - shared).length() < 1e-6);
    }

    #[test]
    fn degenerate_triangles_fall_back_to_up() {
        let normals = smooth_normals(&[Vec3::ZERO, Vec3::ZERO, Vec3::ZERO], &[0, 1, 2]);
        assert_eq!(normals, vec![Vec3::Y; 3]);
    }
}
