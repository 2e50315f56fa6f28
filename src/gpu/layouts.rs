use std::collections::BTreeMap;

use crate::bindings::{BufferIndex, BufferKind, TextureIndex};
use crate::passes::{Pass, TextureUse};

pub fn buffer_entry(buffer: BufferIndex) -> wgpu::BindGroupLayoutEntry {
    let ty = match buffer.kind() {
        BufferKind::Uniform => wgpu::BufferBindingType::Uniform,
        BufferKind::Storage => wgpu::BufferBindingType::Storage { read_only: false },
    };
    wgpu::BindGroupLayoutEntry {
        binding: buffer.slot(),
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(buffer.record_size()),
        },
        count: None,
    }
}

fn storage_texture(texture: TextureIndex, access: wgpu::StorageTextureAccess) -> wgpu::BindingType {
    wgpu::BindingType::StorageTexture {
        access,
        format: texture.format(),
        view_dimension: wgpu::TextureViewDimension::D2,
    }
}

pub fn texture_entry(texture: TextureIndex, usage: TextureUse) -> wgpu::BindGroupLayoutEntry {
    let ty = match usage {
        TextureUse::Read => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        TextureUse::Write => storage_texture(texture, wgpu::StorageTextureAccess::WriteOnly),
        TextureUse::ReadWrite => storage_texture(texture, wgpu::StorageTextureAccess::ReadWrite),
    };
    wgpu::BindGroupLayoutEntry {
        binding: texture.slot(),
        visibility: wgpu::ShaderStages::COMPUTE,
        ty,
        count: None,
    }
}

pub fn buffer_entries(pass: Pass) -> Vec<wgpu::BindGroupLayoutEntry> {
    pass.buffers().iter().map(|&b| buffer_entry(b)).collect()
}

pub fn texture_entries(pass: Pass) -> Vec<wgpu::BindGroupLayoutEntry> {
    pass.textures().iter().map(|&(t, u)| texture_entry(t, u)).collect()
}

/// Bind group layouts of one pass: buffers in group 0, textures in group 1.
pub struct PassLayout {
    pub buffers: wgpu::BindGroupLayout,
    pub textures: wgpu::BindGroupLayout,
    pub pipeline: wgpu::PipelineLayout,
}

/// Layouts for every pass, built once from the binding table.
pub struct GpuLayouts {
    passes: BTreeMap<Pass, PassLayout>,
}

impl GpuLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let passes = Pass::ALL
            .iter()
            .map(|&pass| (pass, Self::create_pass_layout(device, pass)))
            .collect();
        GpuLayouts { passes }
    }

    fn create_pass_layout(device: &wgpu::Device, pass: Pass) -> PassLayout {
        let buffers = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(pass.label()),
            entries: &buffer_entries(pass),
        });
        let textures = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(pass.label()),
            entries: &texture_entries(pass),
        });
        let pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(pass.label()),
            bind_group_layouts: &[&buffers, &textures],
            push_constant_ranges: &[],
        });
        PassLayout {
            buffers,
            textures,
            pipeline,
        }
    }

    pub fn pass(&self, pass: Pass) -> &PassLayout {
        // every pass is inserted in `new`
        &self.passes[&pass]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_use_canonical_slots() {
        let entries = buffer_entries(Pass::UpdateAgents);
        let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings, vec![0, 2, 3, 5]);

        let entries = texture_entries(Pass::Combine);
        let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings, vec![0, 1, 2]);
    }

    #[test]
    fn uniform_entries_carry_record_size() {
        let entry = buffer_entry(BufferIndex::AgentVariables);
        match entry.ty {
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                min_binding_size,
                ..
            } => assert_eq!(min_binding_size.map(|s| s.get()), Some(28)),
            other => panic!("unexpected binding type {:?}", other),
        }
    }

    #[test]
    fn written_textures_are_storage() {
        let entry = texture_entry(TextureIndex::CurrentTrailField, TextureUse::Write);
        assert!(matches!(
            entry.ty,
            wgpu::BindingType::StorageTexture {
                format: wgpu::TextureFormat::R32Float,
                access: wgpu::StorageTextureAccess::WriteOnly,
                ..
            }
        ));
    }

    #[test]
    fn deposit_target_is_read_write_storage() {
        let entry = texture_entry(TextureIndex::CurrentTrailField, TextureUse::ReadWrite);
        assert!(matches!(
            entry.ty,
            wgpu::BindingType::StorageTexture {
                format: wgpu::TextureFormat::R32Float,
                access: wgpu::StorageTextureAccess::ReadWrite,
                ..
            }
        ));
    }
}
