use std::borrow::Cow;
use std::collections::BTreeMap;

use log::{debug, info};

use crate::config::SimulationConfig;
use crate::emitter::Emitter;
use crate::error::LayoutError;
use crate::layout::{AgentVariables, ParticleUniforms};
use crate::passes::Pass;
use crate::staging::ParameterStage;
use crate::trail::TickRoles;
use crate::validate::BindingSet;
use crate::wgsl;

use super::layouts::GpuLayouts;
use super::resources::SimulationResources;

/// WGSL bodies of the kernels, one per pass, without declarations.
///
/// Each source is compiled behind [`wgsl::prelude`] for its pass and must
/// define the entry point named by [`Pass::entry_point`].
#[derive(Clone, Debug, Default)]
pub struct KernelSources {
    sources: BTreeMap<Pass, String>,
}

impl KernelSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pass: Pass, source: impl Into<String>) -> Self {
        self.sources.insert(pass, source.into());
        self
    }

    pub fn get(&self, pass: Pass) -> Option<&str> {
        self.sources.get(&pass).map(String::as_str)
    }
}

pub struct Kernels {
    pipelines: BTreeMap<Pass, wgpu::ComputePipeline>,
}

impl Kernels {
    /// Every tick pass needs a kernel; `GenerateAgents` is optional and the
    /// CPU-spawned agents are used without it.
    pub fn new(device: &wgpu::Device, layouts: &GpuLayouts, sources: &KernelSources) -> Result<Self, LayoutError> {
        if let Some(pass) = Pass::TICK.iter().find(|&&pass| sources.get(pass).is_none()) {
            return Err(LayoutError::MissingKernel { pass: pass.label() });
        }
        let pipelines = Pass::ALL
            .iter()
            .filter_map(|&pass| sources.get(pass).map(|source| (pass, source)))
            .map(|(pass, source)| {
                let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(pass.label()),
                    source: wgpu::ShaderSource::Wgsl(Cow::Owned(wgsl::compose(pass, source))),
                });
                let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                    label: Some(pass.label()),
                    layout: Some(&layouts.pass(pass).pipeline),
                    module: &module,
                    entry_point: pass.entry_point(),
                });
                (pass, pipeline)
            })
            .collect();
        Ok(Kernels { pipelines })
    }

    pub fn pipeline(&self, pass: Pass) -> Option<&wgpu::ComputePipeline> {
        self.pipelines.get(&pass)
    }
}

/// Host side of the simulation: owns the resources, stages parameters, and
/// records the passes of every tick.
pub struct GpuSimulation {
    layouts: GpuLayouts,
    kernels: Kernels,
    resources: SimulationResources,
    bindings: BindingSet,
    // indexed by the trail slot being read
    bind_groups: BTreeMap<Pass, [(wgpu::BindGroup, wgpu::BindGroup); 2]>,
    stage: ParameterStage,
    seed: u64,
}

impl GpuSimulation {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: &SimulationConfig,
        sources: &KernelSources,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        let stage = ParameterStage::new(
            config.agent_variables()?,
            config.trail_variables()?,
            config.ticks_per_second,
        )?;
        let layouts = GpuLayouts::new(device);
        let kernels = Kernels::new(device, &layouts, sources)?;
        let emitter = Emitter::new(config.agents.count, config.particle_uniforms()?, config.seed);
        let resources = SimulationResources::new(device, stage.active(), &emitter)?;

        let mut simulation = GpuSimulation {
            bindings: resources.binding_set(),
            bind_groups: BTreeMap::new(),
            layouts,
            kernels,
            resources,
            stage,
            seed: config.seed,
        };
        simulation.rebuild(device, queue)?;
        Ok(simulation)
    }

    /// Revalidates every pass and recreates the bind groups after resources
    /// changed, then runs agent generation if a kernel was supplied.
    fn rebuild(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<(), LayoutError> {
        self.bindings = self.resources.binding_set();
        self.bindings.validate_all(&Pass::ALL)?;
        self.bind_groups = Pass::ALL
            .iter()
            .map(|&pass| {
                let groups = [0, 1].map(|read| {
                    self.resources
                        .bind_groups(device, &self.layouts, pass, TickRoles::reading(read))
                });
                (pass, groups)
            })
            .collect();
        info!("bind groups ready for {} passes", self.bind_groups.len());

        if self.kernels.pipeline(Pass::GenerateAgents).is_some() {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("generate agents"),
            });
            self.encode_pass(&mut encoder, Pass::GenerateAgents, self.resources.trails.roles().read);
            queue.submit(Some(encoder.finish()));
        }
        Ok(())
    }

    pub fn stage(&mut self) -> &mut ParameterStage {
        &mut self.stage
    }

    pub fn resources(&self) -> &SimulationResources {
        &self.resources
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    /// Output of the last combine pass.
    pub fn output(&self) -> &wgpu::Texture {
        &self.resources.drawable
    }

    /// Most recently finished trail field.
    pub fn latest_trail(&self) -> &wgpu::Texture {
        self.resources.trails.latest()
    }

    fn encode_pass(&self, encoder: &mut wgpu::CommandEncoder, pass: Pass, read: usize) {
        let Some(pipeline) = self.kernels.pipeline(pass) else {
            return;
        };
        let (buffers, textures) = &self.bind_groups[&pass][read];
        let (x, y, z) = pass.workgroups(self.resources.agent_count(), self.resources.uniforms.cells());

        encoder.push_debug_group(pass.label());
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(pass.label()),
                timestamp_writes: None,
            });
            cpass.set_pipeline(pipeline);
            cpass.set_bind_group(0, buffers, &[]);
            cpass.set_bind_group(1, textures, &[]);
            cpass.dispatch_workgroups(x, y, z);
        }
        encoder.pop_debug_group();
    }

    /// Applies staged parameters, records one tick, submits it, and swaps the
    /// trail fields.
    pub fn tick(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<(), LayoutError> {
        self.bindings.validate_all(&Pass::TICK)?;

        let frame = *self.stage.begin_tick();
        self.resources.upload(queue, &frame);

        let read = self.resources.trails.roles().read;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tick"),
        });
        for pass in Pass::TICK {
            self.encode_pass(&mut encoder, pass, read);
        }
        queue.submit(Some(encoder.finish()));

        self.resources.trails.finish_tick();
        debug!(
            "tick {} submitted at t={:.3}s",
            self.resources.trails.tick(),
            frame.time.seconds
        );
        Ok(())
    }

    /// Rebuilds textures and agents for a new domain size.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uniforms: ParticleUniforms,
    ) -> Result<(), LayoutError> {
        uniforms.validate()?;
        info!("resizing to {}x{}", uniforms.width, uniforms.height);
        let agents = self.stage.active().agents;
        self.respawn(device, queue, agents, uniforms)
    }

    /// Starts over with a different agent count.
    pub fn reallocate(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        agents: AgentVariables,
    ) -> Result<(), LayoutError> {
        self.stage.reallocate(agents)?;
        let uniforms = self.resources.uniforms;
        self.respawn(device, queue, agents, uniforms)
    }

    fn respawn(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        agents: AgentVariables,
        uniforms: ParticleUniforms,
    ) -> Result<(), LayoutError> {
        // count was validated non-negative
        let emitter = Emitter::new(agents.count as u32, uniforms, self.seed);
        self.resources = SimulationResources::new(device, self.stage.active(), &emitter)?;
        self.rebuild(device, queue)
    }
}
