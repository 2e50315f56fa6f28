//! The one binding table both sides of the pipeline compile against.
//!
//! Buffers and textures are separate namespaces. On the device they live in
//! separate bind groups ([`BUFFER_GROUP`], [`TEXTURE_GROUP`]) so equal slot
//! numbers across namespaces never alias. Reassigning a slot is a breaking
//! change and must bump [`crate::constants::LAYOUT_VERSION`].

use crate::layout::{AgentVariables, CurrentTime, Particle, ParticleUniforms, Record, TrailFieldVariables};

pub const BUFFER_GROUP: u32 = 0;
pub const TEXTURE_GROUP: u32 = 1;

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BufferIndex {
    AgentVariables = 0,
    TrailFieldVariables = 1,
    ParticleBuffer = 2,
    CurrentTime = 3,
    AgentRenderUniforms = 5,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BufferKind {
    Uniform,
    Storage,
}

impl BufferIndex {
    pub const ALL: [BufferIndex; 5] = [
        BufferIndex::AgentVariables,
        BufferIndex::TrailFieldVariables,
        BufferIndex::ParticleBuffer,
        BufferIndex::CurrentTime,
        BufferIndex::AgentRenderUniforms,
    ];

    pub const fn slot(self) -> u32 {
        self as u32
    }

    /// Name of the module-scope variable in generated WGSL.
    pub const fn var_name(self) -> &'static str {
        match self {
            BufferIndex::AgentVariables => "agent_variables",
            BufferIndex::TrailFieldVariables => "trail_variables",
            BufferIndex::ParticleBuffer => "particles",
            BufferIndex::CurrentTime => "current_time",
            BufferIndex::AgentRenderUniforms => "render_uniforms",
        }
    }

    pub const fn kind(self) -> BufferKind {
        match self {
            BufferIndex::ParticleBuffer => BufferKind::Storage,
            _ => BufferKind::Uniform,
        }
    }

    /// Name of the record type stored in the buffer.
    pub const fn record(self) -> &'static str {
        match self {
            BufferIndex::AgentVariables => AgentVariables::NAME,
            BufferIndex::TrailFieldVariables => TrailFieldVariables::NAME,
            BufferIndex::ParticleBuffer => Particle::NAME,
            BufferIndex::CurrentTime => CurrentTime::NAME,
            BufferIndex::AgentRenderUniforms => ParticleUniforms::NAME,
        }
    }

    /// Size of one record, or of one element for the particle array.
    pub const fn record_size(self) -> u64 {
        (match self {
            BufferIndex::AgentVariables => AgentVariables::SIZE,
            BufferIndex::TrailFieldVariables => TrailFieldVariables::SIZE,
            BufferIndex::ParticleBuffer => Particle::SIZE,
            BufferIndex::CurrentTime => CurrentTime::SIZE,
            BufferIndex::AgentRenderUniforms => ParticleUniforms::SIZE,
        }) as u64
    }

    /// Exact byte size a bound buffer must have.
    ///
    /// The particle buffer always holds at least one element because a
    /// zero-sized binding is invalid on the device.
    pub fn expected_size(self, agent_count: u32) -> u64 {
        match self {
            BufferIndex::ParticleBuffer => self.record_size() * u64::from(agent_count.max(1)),
            _ => self.record_size(),
        }
    }
}

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureIndex {
    /// Final output surface.
    Drawable = 0,
    /// Rasterized agent positions.
    Agents = 1,
    CurrentTrailField = 2,
    PreviousTrailField = 3,
}

impl TextureIndex {
    pub const ALL: [TextureIndex; 4] = [
        TextureIndex::Drawable,
        TextureIndex::Agents,
        TextureIndex::CurrentTrailField,
        TextureIndex::PreviousTrailField,
    ];

    pub const fn slot(self) -> u32 {
        self as u32
    }

    pub const fn var_name(self) -> &'static str {
        match self {
            TextureIndex::Drawable => "drawable",
            TextureIndex::Agents => "agents",
            TextureIndex::CurrentTrailField => "current_trails",
            TextureIndex::PreviousTrailField => "previous_trails",
        }
    }

    pub const fn format(self) -> wgpu::TextureFormat {
        match self {
            TextureIndex::Drawable | TextureIndex::Agents => crate::constants::COLOR_FORMAT,
            TextureIndex::CurrentTrailField | TextureIndex::PreviousTrailField => {
                crate::constants::TRAIL_FORMAT
            }
        }
    }
}

const fn buffer_slots_unique(table: &[BufferIndex]) -> bool {
    let mut i = 0;
    while i < table.len() {
        let mut j = i + 1;
        while j < table.len() {
            if table[i] as u32 == table[j] as u32 {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const fn texture_slots_unique(table: &[TextureIndex]) -> bool {
    let mut i = 0;
    while i < table.len() {
        let mut j = i + 1;
        while j < table.len() {
            if table[i] as u32 == table[j] as u32 {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(buffer_slots_unique(&BufferIndex::ALL));
const _: () = assert!(texture_slots_unique(&TextureIndex::ALL));
