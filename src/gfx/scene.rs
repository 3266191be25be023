//! The preview scene
//!
//! Holds the card's one attached model: its CPU asset, the looping
//! animation player, the uploaded GPU buffers, and one transform uniform
//! per drawn primitive. A fresh load supersedes the previous model, whose
//! GPU buffers are destroyed immediately rather than left to collection.

use cgmath::Rad;

use crate::{
    asset::{animation::AnimationPlayer, model::ModelAsset, normalize::NormalizedTransform},
    gfx::{
        camera::convert_matrix4_to_array,
        material::GpuMaterial,
        mesh::{DrawMesh, GpuMesh},
    },
    wgpu_utils::uniform_buffer::UniformBuffer,
};

/// Per-draw transform uniform (bind group slot 1)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
}

type TransformUBO = UniformBuffer<TransformUniform>;

/// One drawn primitive: which mesh, at which node, with its own
/// transform uniform
struct MeshInstance {
    node: usize,
    mesh: usize,
    ubo: TransformUBO,
    bind_group: wgpu::BindGroup,
}

/// The attached model and everything derived from it
pub struct AttachedModel {
    asset: ModelAsset,
    player: AnimationPlayer,
    placement: NormalizedTransform,
    meshes: Vec<GpuMesh>,
    materials: Vec<GpuMaterial>,
    instances: Vec<MeshInstance>,
}

/// Scene containing at most one model
pub struct PreviewScene {
    model: Option<AttachedModel>,
}

impl PreviewScene {
    pub fn new() -> Self {
        Self { model: None }
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_none()
    }

    /// Number of clips playing, for diagnostics
    pub fn clip_count(&self) -> usize {
        self.model
            .as_ref()
            .map(|model| model.asset.clips.len())
            .unwrap_or(0)
    }

    /// Attaches a loaded asset, uploading its GPU resources.
    ///
    /// Supersedes and releases any previously attached model. Every clip
    /// on the asset starts playing immediately.
    pub fn attach(
        &mut self,
        device: &wgpu::Device,
        transform_layout: &wgpu::BindGroupLayout,
        material_layout: &wgpu::BindGroupLayout,
        asset: ModelAsset,
        placement: NormalizedTransform,
    ) {
        self.release();

        let meshes: Vec<GpuMesh> = asset
            .meshes
            .iter()
            .map(|mesh| GpuMesh::upload(device, mesh))
            .collect();

        let materials: Vec<GpuMaterial> = asset
            .materials
            .iter()
            .map(|material| GpuMaterial::new(device, material_layout, material))
            .collect();

        let identity = TransformUniform {
            model: convert_matrix4_to_array(cgmath::Matrix4::from_scale(1.0)),
        };

        let mut instances = Vec::new();
        for &node in &asset.traversal {
            for &mesh in &asset.nodes[node].primitives {
                let ubo = TransformUBO::new_with_data(device, &identity);
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Transform Bind Group"),
                    layout: transform_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: ubo.binding_resource(),
                    }],
                });
                instances.push(MeshInstance {
                    node,
                    mesh,
                    ubo,
                    bind_group,
                });
            }
        }

        let player = AnimationPlayer::attach(&asset.clips);

        self.model = Some(AttachedModel {
            asset,
            player,
            placement,
            meshes,
            materials,
            instances,
        });
    }

    /// Advances animation playback by `delta` seconds
    pub fn advance(&mut self, delta: f32) {
        if let Some(model) = &mut self.model {
            let ModelAsset {
                ref clips,
                ref mut nodes,
                ..
            } = model.asset;
            model.player.advance(delta, clips, nodes);
        }
    }

    /// Recomputes node transforms and writes them to the GPU.
    ///
    /// `spin` is the hover-driven rotation about Y, applied with the
    /// placement transform so the model turns about its own center.
    pub fn sync_transforms(&mut self, queue: &wgpu::Queue, spin: Rad<f32>) {
        if let Some(model) = &mut self.model {
            let globals = model.asset.global_transforms();
            let root = model.placement.matrix(spin);
            for instance in &mut model.instances {
                let matrix = root * globals[instance.node];
                instance.ubo.update_content(
                    queue,
                    TransformUniform {
                        model: convert_matrix4_to_array(matrix),
                    },
                );
            }
        }
    }

    /// Records the scene's draw calls into an open render pass
    pub(crate) fn draw<'a, 'b>(&'b self, render_pass: &mut wgpu::RenderPass<'a>)
    where
        'b: 'a,
    {
        if let Some(model) = &self.model {
            for instance in &model.instances {
                let mesh = &model.meshes[instance.mesh];
                render_pass.set_bind_group(1, &instance.bind_group, &[]);
                render_pass.set_bind_group(2, model.materials[mesh.material].bind_group(), &[]);
                render_pass.draw_mesh(mesh);
            }
        }
    }

    /// Destroys every GPU buffer owned by the attached model and detaches
    /// it. Tolerated with no model attached.
    pub fn release(&mut self) {
        if let Some(model) = self.model.take() {
            for mesh in &model.meshes {
                mesh.destroy();
            }
            for material in &model.materials {
                material.destroy();
            }
            for instance in &model.instances {
                instance.ubo.destroy();
            }
        }
    }
}

impl Default for PreviewScene {
    fn default() -> Self {
        Self::new()
    }
}
