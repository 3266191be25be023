//! CPU-side model data parsed from glTF
//!
//! A [`ModelAsset`] is everything the session needs from the model file:
//! the node hierarchy with rest-pose transforms, flattened mesh
//! primitives, PBR material factors, animation clips, and the rest-pose
//! bounding box used for normalization. GPU upload happens later, on the
//! UI thread, when the asset is attached to a live scene.

use std::path::Path;

use cgmath::{InnerSpace, Matrix4, Quaternion, SquareMatrix, Vector3};

use crate::{
    asset::{animation, animation::AnimationClip, normalize::Aabb},
    error::VitrineError,
    gfx::mesh::Vertex3D,
};

/// One node of the model's scene graph with its rest-pose TRS transform.
///
/// Animation channels overwrite individual TRS components each frame; the
/// global transform is recomputed from these locals in traversal order.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub parent: Option<usize>,
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
    /// Indices into [`ModelAsset::meshes`] drawn at this node
    pub primitives: Vec<usize>,
}

impl NodeData {
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// One mesh primitive: vertices, indices, and its material
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
    /// Index into [`ModelAsset::materials`]
    pub material: usize,
    /// Bounds in the primitive's local space
    pub local_bounds: Aabb,
}

/// PBR material factors extracted from the glTF material
#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub emissive: [f32; 3],
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
        }
    }
}

/// The loaded model: scene graph, meshes, materials, clips, and bounds
pub struct ModelAsset {
    pub name: String,
    pub nodes: Vec<NodeData>,
    /// Node indices in parent-before-child order, covering the nodes of
    /// the model's default scene
    pub traversal: Vec<usize>,
    pub meshes: Vec<MeshData>,
    /// Never empty: the last entry is the fallback default material
    pub materials: Vec<MaterialData>,
    pub clips: Vec<AnimationClip>,
    /// Rest-pose bounds in model space
    pub bounds: Aabb,
}

impl ModelAsset {
    /// Reads and parses a glTF/GLB file.
    ///
    /// This runs on the loader's worker thread and touches no session
    /// state; it only produces CPU-side data.
    pub fn import(path: &Path) -> Result<ModelAsset, VitrineError> {
        let (document, buffers, _images) = gltf::import(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        Self::from_gltf(&document, &buffers, name)
    }

    /// Builds the asset from an already-parsed glTF document
    pub fn from_gltf(
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
        name: String,
    ) -> Result<ModelAsset, VitrineError> {
        let mut materials: Vec<MaterialData> = document
            .materials()
            .map(|material| MaterialData::from_gltf(&material))
            .collect();
        let default_material = materials.len();
        materials.push(MaterialData::default());

        // Flatten every mesh primitive into one list; remember which
        // primitives belong to which glTF mesh so nodes can reference them.
        let mut meshes = Vec::new();
        let mut primitives_by_mesh: Vec<Vec<usize>> = Vec::new();
        for mesh in document.meshes() {
            let mut indices = Vec::new();
            for primitive in mesh.primitives() {
                let mesh_name = mesh
                    .name()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
                indices.push(meshes.len());
                meshes.push(MeshData::from_primitive(
                    mesh_name,
                    &primitive,
                    buffers,
                    default_material,
                )?);
            }
            primitives_by_mesh.push(indices);
        }

        let mut nodes: Vec<NodeData> = document
            .nodes()
            .map(|node| {
                let (translation, rotation, scale) = node.transform().decomposed();
                NodeData {
                    parent: None,
                    translation: Vector3::from(translation),
                    rotation: Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
                    scale: Vector3::from(scale),
                    primitives: node
                        .mesh()
                        .map(|mesh| primitives_by_mesh[mesh.index()].clone())
                        .unwrap_or_default(),
                }
            })
            .collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for node in document.nodes() {
            for child in node.children() {
                nodes[child.index()].parent = Some(node.index());
                children[node.index()].push(child.index());
            }
        }

        // Depth-first preorder from the default scene's roots, so every
        // parent precedes its children.
        let roots: Vec<usize> = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .map(|scene| scene.nodes().map(|node| node.index()).collect())
            .unwrap_or_else(|| {
                (0..nodes.len())
                    .filter(|&i| nodes[i].parent.is_none())
                    .collect()
            });

        let mut traversal = Vec::with_capacity(nodes.len());
        let mut stack: Vec<usize> = roots.into_iter().rev().collect();
        while let Some(index) = stack.pop() {
            traversal.push(index);
            for &child in children[index].iter().rev() {
                stack.push(child);
            }
        }

        let clips = animation::clips_from_gltf(document, buffers);

        let mut asset = ModelAsset {
            name,
            nodes,
            traversal,
            meshes,
            materials,
            clips,
            bounds: Aabb::empty(),
        };
        asset.bounds = asset.rest_bounds();

        Ok(asset)
    }

    /// Global (model-space) transform of every node, computed from the
    /// current local TRS values in traversal order. Nodes outside the
    /// default scene keep an identity transform.
    pub fn global_transforms(&self) -> Vec<Matrix4<f32>> {
        let mut globals = vec![Matrix4::identity(); self.nodes.len()];
        for &index in &self.traversal {
            let local = self.nodes[index].local_matrix();
            globals[index] = match self.nodes[index].parent {
                Some(parent) => globals[parent] * local,
                None => local,
            };
        }
        globals
    }

    /// Model-space bounds at the rest pose, accumulated from each drawn
    /// primitive's local bounds pushed through its node's global transform
    fn rest_bounds(&self) -> Aabb {
        let globals = self.global_transforms();
        let mut bounds = Aabb::empty();
        for &index in &self.traversal {
            let node = &self.nodes[index];
            for &primitive in &node.primitives {
                let local = &self.meshes[primitive].local_bounds;
                if local.is_empty() {
                    continue;
                }
                for corner in local.corners() {
                    let world = globals[index] * corner.extend(1.0);
                    bounds.include(world.truncate());
                }
            }
        }
        bounds
    }
}

impl MeshData {
    fn from_primitive(
        name: String,
        primitive: &gltf::Primitive,
        buffers: &[gltf::buffer::Data],
        default_material: usize,
    ) -> Result<MeshData, VitrineError> {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            return Err(VitrineError::AssetLoad(format!(
                "unsupported primitive mode: {:?}",
                primitive.mode()
            )));
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| VitrineError::AssetLoad("primitive has no positions".to_string()))?
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let normals: Vec<[f32; 3]> = match reader.read_normals() {
            Some(normals) => normals.collect(),
            None => compute_vertex_normals(&positions, &indices),
        };

        let vertices = positions
            .iter()
            .zip(normals.iter())
            .map(|(position, normal)| Vertex3D {
                position: *position,
                normal: *normal,
            })
            .collect();

        let material = primitive.material().index().unwrap_or(default_material);

        Ok(MeshData {
            name,
            vertices,
            indices,
            material,
            local_bounds: Aabb::from_vertices(&positions),
        })
    }
}

impl MaterialData {
    fn from_gltf(material: &gltf::Material) -> Self {
        let pbr = material.pbr_metallic_roughness();
        Self {
            name: material
                .name()
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("material_{}", material.index().unwrap_or(0))),
            base_color: pbr.base_color_factor(),
            metallic: pbr.metallic_factor(),
            roughness: pbr.roughness_factor(),
            emissive: material.emissive_factor(),
        }
    }
}

/// Averaged face normals for primitives that ship without normal data
fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vector3::new(0.0, 0.0, 0.0); positions.len()];

    for triangle in indices.chunks(3) {
        if triangle.len() < 3 {
            continue;
        }
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }

        let v0 = Vector3::from(positions[i0]);
        let v1 = Vector3::from(positions[i1]);
        let v2 = Vector3::from(positions[i2]);
        let face_normal = (v1 - v0).cross(v2 - v0);

        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    normals
        .into_iter()
        .map(|normal| {
            if normal.magnitude2() > 0.0 {
                normal.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Rad;

    fn leaf_node(parent: Option<usize>, primitives: Vec<usize>) -> NodeData {
        NodeData {
            parent,
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            primitives,
        }
    }

    #[test]
    fn test_global_transforms_compose_parent_child() {
        let mut parent = leaf_node(None, vec![]);
        parent.translation = Vector3::new(1.0, 0.0, 0.0);
        let mut child = leaf_node(Some(0), vec![]);
        child.translation = Vector3::new(0.0, 2.0, 0.0);

        let asset = ModelAsset {
            name: "test".to_string(),
            nodes: vec![parent, child],
            traversal: vec![0, 1],
            meshes: vec![],
            materials: vec![MaterialData::default()],
            clips: vec![],
            bounds: Aabb::empty(),
        };

        let globals = asset.global_transforms();
        let origin = globals[1] * Vector3::new(0.0, 0.0, 0.0).extend(1.0);
        assert!((origin.x - 1.0).abs() < 1e-6);
        assert!((origin.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rest_bounds_cover_transformed_primitives() {
        let mesh = MeshData {
            name: "quad".to_string(),
            vertices: vec![],
            indices: vec![],
            material: 0,
            local_bounds: Aabb::new(Vector3::new(-1.0, -1.0, 0.0), Vector3::new(1.0, 1.0, 0.0)),
        };

        let mut node = leaf_node(None, vec![0]);
        node.translation = Vector3::new(5.0, 0.0, 0.0);

        let mut asset = ModelAsset {
            name: "test".to_string(),
            nodes: vec![node],
            traversal: vec![0],
            meshes: vec![mesh],
            materials: vec![MaterialData::default()],
            clips: vec![],
            bounds: Aabb::empty(),
        };
        asset.bounds = asset.rest_bounds();

        assert!((asset.bounds.center().x - 5.0).abs() < 1e-6);
        assert!((asset.bounds.max_dimension() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_local_matrix_applies_rotation() {
        let mut node = leaf_node(None, vec![]);
        // 90 degrees about Y: +X maps to -Z
        node.rotation = Quaternion::from(cgmath::Matrix3::from_angle_y(Rad(
            std::f32::consts::FRAC_PI_2,
        )));

        let m = node.local_matrix();
        let mapped = m * Vector3::new(1.0, 0.0, 0.0).extend(1.0);
        assert!(mapped.x.abs() < 1e-6);
        assert!((mapped.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_computed_normals_face_outward() {
        let positions = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let indices = vec![0, 1, 2];
        let normals = compute_vertex_normals(&positions, &indices);

        for normal in &normals {
            assert!(normal[0].abs() < 1e-6);
            assert!(normal[1].abs() < 1e-6);
            assert!((normal[2] - 1.0).abs() < 1e-6);
        }
    }
}
