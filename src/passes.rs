//! The GPU passes that consume the shared layout and what each one binds.

use crate::bindings::{BufferIndex, TextureIndex};
use crate::constants::{AGENT_WORKGROUP_SIZE, FIELD_WORKGROUP_SIZE};

/// How a pass touches a texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureUse {
    Read,
    Write,
    /// Accumulates into what an earlier pass of the same tick wrote.
    ReadWrite,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pass {
    /// Fills the particle buffer inside the domain. Runs on start-up and resize.
    GenerateAgents,
    /// Clears the agents texture.
    ResetAgents,
    /// Diffuses and decays the previous trail field into the current one.
    Decay,
    /// Moves agents and deposits trail.
    UpdateAgents,
    /// Composites agents and the finished trail field into the drawable.
    Combine,
}

impl Pass {
    /// Passes recorded every tick, in order.
    pub const TICK: [Pass; 4] = [Pass::ResetAgents, Pass::Decay, Pass::UpdateAgents, Pass::Combine];

    pub const ALL: [Pass; 5] = [
        Pass::GenerateAgents,
        Pass::ResetAgents,
        Pass::Decay,
        Pass::UpdateAgents,
        Pass::Combine,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Pass::GenerateAgents => "generate agents",
            Pass::ResetAgents => "reset agents",
            Pass::Decay => "decay trails",
            Pass::UpdateAgents => "update agents and trails",
            Pass::Combine => "combine",
        }
    }

    /// Kernel entry point looked up in the caller's shader module.
    pub const fn entry_point(self) -> &'static str {
        match self {
            Pass::GenerateAgents => "generate_agents",
            Pass::ResetAgents => "reset_agents",
            Pass::Decay => "decay",
            Pass::UpdateAgents => "update_agents",
            Pass::Combine => "combine",
        }
    }

    pub const fn buffers(self) -> &'static [BufferIndex] {
        match self {
            Pass::GenerateAgents => &[BufferIndex::ParticleBuffer, BufferIndex::AgentRenderUniforms],
            Pass::ResetAgents => &[],
            Pass::Decay => &[BufferIndex::TrailFieldVariables],
            Pass::UpdateAgents => &[
                BufferIndex::AgentVariables,
                BufferIndex::ParticleBuffer,
                BufferIndex::CurrentTime,
                BufferIndex::AgentRenderUniforms,
            ],
            Pass::Combine => &[],
        }
    }

    pub const fn textures(self) -> &'static [(TextureIndex, TextureUse)] {
        match self {
            Pass::GenerateAgents => &[],
            Pass::ResetAgents => &[(TextureIndex::Agents, TextureUse::Write)],
            Pass::Decay => &[
                (TextureIndex::CurrentTrailField, TextureUse::Write),
                (TextureIndex::PreviousTrailField, TextureUse::Read),
            ],
            Pass::UpdateAgents => &[
                (TextureIndex::Agents, TextureUse::Write),
                (TextureIndex::CurrentTrailField, TextureUse::ReadWrite),
                (TextureIndex::PreviousTrailField, TextureUse::Read),
            ],
            Pass::Combine => &[
                (TextureIndex::Drawable, TextureUse::Write),
                (TextureIndex::Agents, TextureUse::Read),
                (TextureIndex::CurrentTrailField, TextureUse::Read),
            ],
        }
    }

    /// One invocation per agent, or one per field cell.
    pub const fn per_agent(self) -> bool {
        matches!(self, Pass::GenerateAgents | Pass::UpdateAgents)
    }

    pub const fn workgroup_size(self) -> (u32, u32) {
        if self.per_agent() {
            (AGENT_WORKGROUP_SIZE, 1)
        } else {
            (FIELD_WORKGROUP_SIZE, FIELD_WORKGROUP_SIZE)
        }
    }

    /// Workgroups to dispatch for `agent_count` agents over a field of `cells`.
    pub fn workgroups(self, agent_count: u32, cells: (u32, u32)) -> (u32, u32, u32) {
        let (x, y) = self.workgroup_size();
        if self.per_agent() {
            (agent_count.div_ceil(x), 1, 1)
        } else {
            (cells.0.div_ceil(x), cells.1.div_ceil(y), 1)
        }
    }
}
