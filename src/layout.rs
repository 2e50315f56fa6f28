//! Parameter records shared byte-for-byte between the host and GPU stages.
//!
//! Every field is a 32-bit scalar and every record derives [`Pod`], so the
//! compiler refuses any layout with implicit padding. The WGSL side of these
//! records is generated from [`Record::FIELDS`] by [`crate::wgsl`].

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use cgmath::Vector2;

use crate::constants::*;
use crate::error::LayoutError;

/// Device-side type of one record field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
    I32,
    F32,
    Vec2F32,
}

impl Scalar {
    pub const fn size(self) -> usize {
        match self {
            Scalar::I32 | Scalar::F32 => 4,
            Scalar::Vec2F32 => 8,
        }
    }

    pub const fn wgsl(self) -> &'static str {
        match self {
            Scalar::I32 => "i32",
            Scalar::F32 => "f32",
            Scalar::Vec2F32 => "vec2<f32>",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: Scalar,
}

const fn field(name: &'static str, ty: Scalar) -> Field {
    Field { name, ty }
}

/// A record that crosses the host/device boundary as raw bytes.
pub trait Record: Pod {
    const NAME: &'static str;
    /// Fields in declaration order.
    const FIELDS: &'static [Field];
    const SIZE: usize = std::mem::size_of::<Self>();
}

pub fn encode<T: Record>(record: &T) -> &[u8] {
    bytemuck::bytes_of(record)
}

/// Reads a record back from the bytes [`encode`] produced.
pub fn decode<T: Record>(bytes: &[u8]) -> Result<T, LayoutError> {
    if bytes.len() != T::SIZE {
        return Err(LayoutError::RecordSize {
            record: T::NAME,
            expected: T::SIZE,
            actual: bytes.len(),
        });
    }
    Ok(bytemuck::pod_read_unaligned(bytes))
}

fn check_finite(field: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::NotFinite { field, value })
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), LayoutError> {
    check_finite(field, value)?;
    if value < min || value > max {
        return Err(LayoutError::OutOfRange {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: i32) -> Result<(), LayoutError> {
    if value < 0 {
        return Err(LayoutError::OutOfRange {
            field,
            value: value.into(),
            min: 0.0,
            max: i32::MAX.into(),
        });
    }
    Ok(())
}

/// Movement and sensing parameters of every agent.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct AgentVariables {
    /// Fixed for a run, the particle buffer is sized from it.
    pub count: i32,
    /// Distance per tick.
    pub move_speed: f32,
    /// Fraction of the maximum turn applied per tick, `0..=1`.
    pub turn_speed: f32,
    pub sensor_distance: f32,
    /// Offset of the flanking sensors from the forward one, in radians.
    pub sensor_angle: f32,
    /// Trail deposited per tick.
    pub trail_weight: f32,
    /// Half-width in cells of the sampling kernel around a sensor.
    pub sensor_size: i32,
}

impl Default for AgentVariables {
    fn default() -> Self {
        AgentVariables {
            count: NUM_AGENTS as i32,
            move_speed: MOVE_SPEED,
            turn_speed: TURN_SPEED,
            sensor_distance: SENSOR_DISTANCE,
            sensor_angle: SENSOR_ANGLE,
            trail_weight: TRAIL_WEIGHT,
            sensor_size: SENSOR_SIZE,
        }
    }
}

impl AgentVariables {
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_non_negative("count", self.count)?;
        check_range("move_speed", self.move_speed, 0.0, f32::INFINITY)?;
        check_range("turn_speed", self.turn_speed, 0.0, 1.0)?;
        check_range("sensor_distance", self.sensor_distance, 0.0, f32::INFINITY)?;
        check_range("sensor_angle", self.sensor_angle, 0.0, PI)?;
        check_range("trail_weight", self.trail_weight, 0.0, f32::INFINITY)?;
        check_non_negative("sensor_size", self.sensor_size)
    }

    /// Consumes the record, handing it back only if every field is in range.
    pub fn validated(self) -> Result<Self, LayoutError> {
        self.validate()?;
        Ok(self)
    }

    pub fn sensor_size_f32(&self) -> f32 {
        self.sensor_size as f32
    }

    /// Truncates toward zero, the way a slider value is stored.
    pub fn set_sensor_size_f32(&mut self, value: f32) {
        self.sensor_size = value as i32;
    }

    pub fn count_f32(&self) -> f32 {
        self.count as f32
    }

    pub fn set_count_f32(&mut self, value: f32) {
        self.count = value as i32;
    }
}

impl Record for AgentVariables {
    const NAME: &'static str = "AgentVariables";
    const FIELDS: &'static [Field] = &[
        field("count", Scalar::I32),
        field("move_speed", Scalar::F32),
        field("turn_speed", Scalar::F32),
        field("sensor_distance", Scalar::F32),
        field("sensor_angle", Scalar::F32),
        field("trail_weight", Scalar::F32),
        field("sensor_size", Scalar::I32),
    ];
}

/// Diffusion and decay of the shared trail field.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TrailFieldVariables {
    pub diffuse_rate: f32,
    pub decay_rate: f32,
}

impl Default for TrailFieldVariables {
    fn default() -> Self {
        TrailFieldVariables {
            diffuse_rate: DIFFUSE_RATE,
            decay_rate: DECAY_RATE,
        }
    }
}

impl TrailFieldVariables {
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_range("diffuse_rate", self.diffuse_rate, 0.0, 1.0)?;
        check_range("decay_rate", self.decay_rate, 0.0, 1.0)
    }

    pub fn validated(self) -> Result<Self, LayoutError> {
        self.validate()?;
        Ok(self)
    }
}

impl Record for TrailFieldVariables {
    const NAME: &'static str = "TrailFieldVariables";
    const FIELDS: &'static [Field] = &[
        field("diffuse_rate", Scalar::F32),
        field("decay_rate", Scalar::F32),
    ];
}

/// Size of the simulation domain, bound as `AgentRenderUniforms`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub width: f32,
    pub height: f32,
}

impl Default for ParticleUniforms {
    fn default() -> Self {
        ParticleUniforms {
            width: WIDTH as f32,
            height: HEIGHT as f32,
        }
    }
}

impl ParticleUniforms {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let max = MAX_DOMAIN_EXTENT as f32;
        check_range("width", self.width, 1.0, max)?;
        check_range("height", self.height, 1.0, max)
    }

    /// Number of field cells along each axis.
    pub fn cells(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    /// Wraps a position back into `[0, width) x [0, height)`.
    pub fn wrap(&self, position: Vector2<f32>) -> Vector2<f32> {
        let wrap_axis = |v: f32, extent: f32| {
            let w = v.rem_euclid(extent);
            // rem_euclid can round up to exactly `extent` for tiny negatives
            if w >= extent {
                0.0
            } else {
                w
            }
        };
        Vector2::new(
            wrap_axis(position.x, self.width),
            wrap_axis(position.y, self.height),
        )
    }

    /// Field cell an agent at `position` samples or deposits into.
    pub fn cell_of(&self, position: Vector2<f32>) -> (u32, u32) {
        let wrapped = self.wrap(position);
        let (cols, rows) = self.cells();
        let x = (wrapped.x as u32).min(cols.saturating_sub(1));
        let y = (wrapped.y as u32).min(rows.saturating_sub(1));
        (x, y)
    }
}

impl Record for ParticleUniforms {
    const NAME: &'static str = "ParticleUniforms";
    const FIELDS: &'static [Field] = &[field("width", Scalar::F32), field("height", Scalar::F32)];
}

/// One agent in the particle buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub position: [f32; 2],
    /// Heading in radians.
    pub angle: f32,
    // vec2<f32> gives the WGSL struct an 8 byte alignment
    pub padding: f32,
}

impl Particle {
    pub fn new(position: Vector2<f32>, angle: f32) -> Self {
        Particle {
            position: position.into(),
            angle,
            padding: 0.0,
        }
    }

    pub fn position(&self) -> Vector2<f32> {
        self.position.into()
    }

    pub fn heading(&self) -> Vector2<f32> {
        Vector2::new(self.angle.cos(), self.angle.sin())
    }
}

impl Record for Particle {
    const NAME: &'static str = "Particle";
    const FIELDS: &'static [Field] = &[
        field("position", Scalar::Vec2F32),
        field("angle", Scalar::F32),
        field("padding", Scalar::F32),
    ];
}

/// Simulation clock, re-uploaded every tick.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CurrentTime {
    pub seconds: f32,
}

impl Record for CurrentTime {
    const NAME: &'static str = "CurrentTime";
    const FIELDS: &'static [Field] = &[field("seconds", Scalar::F32)];
}

const _: () = assert!(std::mem::size_of::<AgentVariables>() == 28);
const _: () = assert!(std::mem::size_of::<TrailFieldVariables>() == 8);
const _: () = assert!(std::mem::size_of::<ParticleUniforms>() == 8);
const _: () = assert!(std::mem::size_of::<Particle>() == 16);
const _: () = assert!(std::mem::size_of::<CurrentTime>() == 4);
