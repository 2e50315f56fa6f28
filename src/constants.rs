pub const WIDTH: u32 = 1280;
pub const HEIGHT: u32 = 960;

/// Largest domain side; the default 2D texture limit of a wgpu device.
pub const MAX_DOMAIN_EXTENT: u32 = 8192;

pub const NUM_AGENTS: u32 = 100_000;

/// Bumped whenever a record field or a binding slot changes.
pub const LAYOUT_VERSION: u32 = 1;

pub const TICKS_PER_SECOND: f32 = 60.0;
pub const SEED: u64 = 42;

pub const MOVE_SPEED: f32 = 2.0;
pub const TURN_SPEED: f32 = 0.1;
pub const SENSOR_DISTANCE: f32 = 7.0;
/// Radians.
pub const SENSOR_ANGLE: f32 = 0.7;
pub const TRAIL_WEIGHT: f32 = 0.3;
pub const SENSOR_SIZE: i32 = 3;

pub const DIFFUSE_RATE: f32 = 0.2;
pub const DECAY_RATE: f32 = 0.003;

pub const AGENT_WORKGROUP_SIZE: u32 = 64;
pub const FIELD_WORKGROUP_SIZE: u32 = 8;

pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub const TRAIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;
