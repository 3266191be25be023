//! Material resources for the preview's forward pass
//!
//! Materials come from the model's PBR factors at load time; there is no
//! runtime material editing. Each material owns one uniform buffer and
//! one bind group against the engine's shared material layout.

use crate::{asset::model::MaterialData, wgpu_utils::uniform_buffer::UniformBuffer};

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub normal_scale: f32,
    pub occlusion_strength: f32,
    pub emissive: [f32; 3],
    _padding: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// One uploaded material: uniform buffer plus bind group (slot 2)
pub struct GpuMaterial {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
}

impl GpuMaterial {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        material: &MaterialData,
    ) -> Self {
        let uniform = MaterialUniform {
            base_color: material.base_color,
            metallic: material.metallic.clamp(0.0, 1.0),
            roughness: material.roughness.clamp(0.0, 1.0),
            normal_scale: 1.0,
            occlusion_strength: 1.0,
            emissive: material.emissive,
            _padding: 0.0,
        };

        let ubo = MaterialUBO::new_with_data(device, &uniform);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Material Bind Group ({})", material.name)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self { ubo, bind_group }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Destroys the material's GPU buffer
    pub fn destroy(&self) {
        self.ubo.destroy();
    }
}
