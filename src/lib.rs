//! Shared data contract between the host and the GPU stages of an ant-trail
//! simulation: parameter records, the binding table, and the discipline the
//! passes built on them follow.

pub mod bindings;
pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod gpu;
pub mod layout;
pub mod passes;
pub mod staging;
pub mod trail;
pub mod validate;
pub mod wgsl;

pub use bindings::{BufferIndex, TextureIndex};
pub use config::SimulationConfig;
pub use error::LayoutError;
pub use layout::{AgentVariables, CurrentTime, Particle, ParticleUniforms, TrailFieldVariables};
pub use passes::Pass;
pub use trail::{PingPong, TickRoles};
pub use validate::BindingSet;
