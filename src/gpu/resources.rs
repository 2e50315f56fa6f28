use log::info;
use wgpu::util::DeviceExt;

use crate::bindings::{BufferIndex, TextureIndex};
use crate::emitter::Emitter;
use crate::error::LayoutError;
use crate::layout::{self, Particle, ParticleUniforms, Record};
use crate::passes::Pass;
use crate::staging::FrameParameters;
use crate::trail::{PingPong, TickRoles};
use crate::validate::BindingSet;

use super::layouts::GpuLayouts;

fn create_texture(device: &wgpu::Device, label: &str, texture: TextureIndex, extent: (u32, u32)) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: extent.0,
            height: extent.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: texture.format(),
        usage: wgpu::TextureUsages::STORAGE_BINDING
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

fn uniform_buffer(device: &wgpu::Device, label: &str, contents: &[u8]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Rejects a domain or agent count the device cannot hold before anything
/// is allocated.
pub fn check_device_limits(
    limits: &wgpu::Limits,
    uniforms: &ParticleUniforms,
    agent_count: u32,
) -> Result<(), LayoutError> {
    let (width, height) = uniforms.cells();
    let side = u64::from(width.max(height));
    let max_side = u64::from(limits.max_texture_dimension_2d);
    if side > max_side {
        return Err(LayoutError::ExceedsDeviceLimit {
            resource: "trail texture side",
            required: side,
            limit: max_side,
        });
    }

    // an empty run still allocates one element
    let particle_bytes = u64::from(agent_count.max(1)) * Particle::SIZE as u64;
    let max_binding = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
    if particle_bytes > max_binding {
        return Err(LayoutError::ExceedsDeviceLimit {
            resource: "particle buffer bytes",
            required: particle_bytes,
            limit: max_binding,
        });
    }
    Ok(())
}

/// Every buffer and texture named in the binding table.
pub struct SimulationResources {
    pub agent_variables: wgpu::Buffer,
    pub trail_variables: wgpu::Buffer,
    pub particles: wgpu::Buffer,
    pub current_time: wgpu::Buffer,
    pub render_uniforms: wgpu::Buffer,

    pub drawable: wgpu::Texture,
    pub agents: wgpu::Texture,
    pub trails: PingPong<wgpu::Texture>,

    pub uniforms: ParticleUniforms,
    agent_count: u32,
}

impl SimulationResources {
    pub fn new(device: &wgpu::Device, frame: &FrameParameters, emitter: &Emitter) -> Result<Self, LayoutError> {
        let agent_count = emitter.particles.len() as u32;
        let uniforms = emitter.uniforms;
        let extent = uniforms.cells();
        check_device_limits(&device.limits(), &uniforms, agent_count)?;

        let particles = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle buffer"),
            contents: bytemuck::cast_slice(&emitter.buffer_contents()),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
        });

        let trails = PingPong::from_fn(|i| {
            create_texture(device, &format!("Trail texture {}", i), TextureIndex::CurrentTrailField, extent)
        });

        info!(
            "allocated {} agents and {}x{} trail textures",
            agent_count, extent.0, extent.1
        );

        Ok(SimulationResources {
            agent_variables: uniform_buffer(device, "Agent variables", layout::encode(&frame.agents)),
            trail_variables: uniform_buffer(device, "Trail variables", layout::encode(&frame.trail)),
            particles,
            current_time: uniform_buffer(device, "Current time", layout::encode(&frame.time)),
            render_uniforms: uniform_buffer(device, "Agent render uniforms", layout::encode(&uniforms)),

            drawable: create_texture(device, "Drawable texture", TextureIndex::Drawable, extent),
            agents: create_texture(device, "Agents texture", TextureIndex::Agents, extent),
            trails,

            uniforms,
            agent_count,
        })
    }

    pub fn agent_count(&self) -> u32 {
        self.agent_count
    }

    pub fn buffer(&self, buffer: BufferIndex) -> &wgpu::Buffer {
        match buffer {
            BufferIndex::AgentVariables => &self.agent_variables,
            BufferIndex::TrailFieldVariables => &self.trail_variables,
            BufferIndex::ParticleBuffer => &self.particles,
            BufferIndex::CurrentTime => &self.current_time,
            BufferIndex::AgentRenderUniforms => &self.render_uniforms,
        }
    }

    /// Texture bound as `texture` while the trails play `roles`.
    pub fn texture(&self, texture: TextureIndex, roles: TickRoles) -> &wgpu::Texture {
        match (texture, roles.slot_for(texture)) {
            (_, Some(slot)) => self.trails.get(slot),
            (TextureIndex::Drawable, None) => &self.drawable,
            (_, None) => &self.agents,
        }
    }

    /// What is bound where, for validation before any dispatch.
    pub fn binding_set(&self) -> BindingSet {
        let mut set = BindingSet::new(self.agent_count, self.uniforms.cells());
        for buffer in BufferIndex::ALL {
            set.bind_buffer(buffer, buffer.slot(), self.buffer(buffer).size());
        }
        for texture in TextureIndex::ALL {
            let bound = self.texture(texture, self.trails.roles());
            set.bind_texture(texture, texture.slot(), (bound.width(), bound.height()));
        }
        set
    }

    /// Writes a tick's parameter snapshot. Called only between ticks.
    pub fn upload(&self, queue: &wgpu::Queue, frame: &FrameParameters) {
        queue.write_buffer(&self.agent_variables, 0, layout::encode(&frame.agents));
        queue.write_buffer(&self.trail_variables, 0, layout::encode(&frame.trail));
        queue.write_buffer(&self.current_time, 0, layout::encode(&frame.time));
    }

    /// Bind groups of `pass` while the trails play `roles`.
    pub fn bind_groups(
        &self,
        device: &wgpu::Device,
        layouts: &GpuLayouts,
        pass: Pass,
        roles: TickRoles,
    ) -> (wgpu::BindGroup, wgpu::BindGroup) {
        let layout = layouts.pass(pass);

        let buffer_entries: Vec<wgpu::BindGroupEntry> = pass
            .buffers()
            .iter()
            .map(|&buffer| wgpu::BindGroupEntry {
                binding: buffer.slot(),
                resource: self.buffer(buffer).as_entire_binding(),
            })
            .collect();
        let buffers = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(pass.label()),
            layout: &layout.buffers,
            entries: &buffer_entries,
        });

        let views: Vec<(u32, wgpu::TextureView)> = pass
            .textures()
            .iter()
            .map(|&(texture, _)| {
                let view = self
                    .texture(texture, roles)
                    .create_view(&wgpu::TextureViewDescriptor::default());
                (texture.slot(), view)
            })
            .collect();
        let texture_entries: Vec<wgpu::BindGroupEntry> = views
            .iter()
            .map(|(slot, view)| wgpu::BindGroupEntry {
                binding: *slot,
                resource: wgpu::BindingResource::TextureView(view),
            })
            .collect();
        let textures = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(pass.label()),
            layout: &layout.textures,
            entries: &texture_entries,
        });

        (buffers, textures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(width: f32, height: f32) -> ParticleUniforms {
        ParticleUniforms { width, height }
    }

    #[test]
    fn default_run_fits_default_limits() {
        let limits = wgpu::Limits::default();
        check_device_limits(&limits, &ParticleUniforms::default(), 100_000).unwrap();
        check_device_limits(&limits, &domain(8192.0, 8192.0), 0).unwrap();
    }

    #[test]
    fn oversized_domain_is_rejected() {
        let limits = wgpu::Limits::downlevel_defaults();
        let err = check_device_limits(&limits, &domain(4096.0, 10.0), 1).unwrap_err();
        assert_eq!(
            err,
            LayoutError::ExceedsDeviceLimit {
                resource: "trail texture side",
                required: 4096,
                limit: 2048,
            }
        );
    }

    #[test]
    fn oversized_particle_buffer_is_rejected() {
        let limits = wgpu::Limits::default();
        let too_many = limits.max_storage_buffer_binding_size / 16 + 1;
        assert!(matches!(
            check_device_limits(&limits, &ParticleUniforms::default(), too_many),
            Err(LayoutError::ExceedsDeviceLimit {
                resource: "particle buffer bytes",
                ..
            })
        ));
    }
}
