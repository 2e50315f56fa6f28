use thiserror::Error;

use crate::bindings::{BufferIndex, TextureIndex};

/// Host and device disagree about the shared layout.
///
/// Every variant points at a build-time skew or an invalid parameter record,
/// so callers surface it and stop instead of retrying.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{pass} needs buffer {resource:?} but nothing is bound to it")]
    UnboundBuffer {
        pass: &'static str,
        resource: BufferIndex,
    },
    #[error("{pass} needs texture {resource:?} but nothing is bound to it")]
    UnboundTexture {
        pass: &'static str,
        resource: TextureIndex,
    },
    #[error("buffer {resource:?} bound at slot {actual}, expected slot {expected}")]
    WrongBufferSlot {
        resource: BufferIndex,
        expected: u32,
        actual: u32,
    },
    #[error("texture {resource:?} bound at slot {actual}, expected slot {expected}")]
    WrongTextureSlot {
        resource: TextureIndex,
        expected: u32,
        actual: u32,
    },
    #[error("buffer {resource:?} is {actual} bytes, expected {expected}")]
    SizeMismatch {
        resource: BufferIndex,
        expected: u64,
        actual: u64,
    },
    #[error("texture {resource:?} is {actual:?} texels, expected {expected:?}")]
    ExtentMismatch {
        resource: TextureIndex,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("{record} record is {expected} bytes, got {actual}")]
    RecordSize {
        record: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("no kernel supplied for the {pass} pass")]
    MissingKernel { pass: &'static str },
    #[error("agent count changed from {from} to {to} without reallocating the particle buffer")]
    AgentCountChanged { from: i32, to: i32 },
    #[error("layout version {found} does not match compiled layout version {expected}")]
    VersionSkew { expected: u32, found: u32 },
    #[error("{resource} needs {required}, the device allows at most {limit}")]
    ExceedsDeviceLimit {
        resource: &'static str,
        required: u64,
        limit: u64,
    },
}
