//! Launch-time check that what the host bound matches the shared layout.

use std::collections::BTreeMap;

use log::debug;

use crate::bindings::{BufferIndex, TextureIndex};
use crate::error::LayoutError;
use crate::passes::Pass;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundBuffer {
    pub slot: u32,
    pub size: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundTexture {
    pub slot: u32,
    pub extent: (u32, u32),
}

/// Record of every resource the host attached, keyed by symbolic name.
#[derive(Clone, Debug)]
pub struct BindingSet {
    agent_count: u32,
    extent: (u32, u32),
    buffers: BTreeMap<BufferIndex, BoundBuffer>,
    textures: BTreeMap<TextureIndex, BoundTexture>,
}

impl BindingSet {
    pub fn new(agent_count: u32, extent: (u32, u32)) -> Self {
        BindingSet {
            agent_count,
            extent,
            buffers: BTreeMap::new(),
            textures: BTreeMap::new(),
        }
    }

    pub fn bind_buffer(&mut self, resource: BufferIndex, slot: u32, size: u64) -> &mut Self {
        self.buffers.insert(resource, BoundBuffer { slot, size });
        self
    }

    pub fn bind_texture(&mut self, resource: TextureIndex, slot: u32, extent: (u32, u32)) -> &mut Self {
        self.textures.insert(resource, BoundTexture { slot, extent });
        self
    }

    pub fn buffer(&self, resource: BufferIndex) -> Option<BoundBuffer> {
        self.buffers.get(&resource).copied()
    }

    pub fn texture(&self, resource: TextureIndex) -> Option<BoundTexture> {
        self.textures.get(&resource).copied()
    }

    /// Fails on the first resource `pass` needs that is unbound, at the wrong
    /// slot, or of the wrong size.
    pub fn validate_pass(&self, pass: Pass) -> Result<(), LayoutError> {
        for &resource in pass.buffers() {
            let bound = self.buffers.get(&resource).ok_or(LayoutError::UnboundBuffer {
                pass: pass.label(),
                resource,
            })?;
            if bound.slot != resource.slot() {
                return Err(LayoutError::WrongBufferSlot {
                    resource,
                    expected: resource.slot(),
                    actual: bound.slot,
                });
            }
            let expected = resource.expected_size(self.agent_count);
            if bound.size != expected {
                return Err(LayoutError::SizeMismatch {
                    resource,
                    expected,
                    actual: bound.size,
                });
            }
        }
        for &(resource, _) in pass.textures() {
            let bound = self.textures.get(&resource).ok_or(LayoutError::UnboundTexture {
                pass: pass.label(),
                resource,
            })?;
            if bound.slot != resource.slot() {
                return Err(LayoutError::WrongTextureSlot {
                    resource,
                    expected: resource.slot(),
                    actual: bound.slot,
                });
            }
            if bound.extent != self.extent {
                return Err(LayoutError::ExtentMismatch {
                    resource,
                    expected: self.extent,
                    actual: bound.extent,
                });
            }
        }
        debug!("bindings for {} validated", pass.label());
        Ok(())
    }

    pub fn validate_all(&self, passes: &[Pass]) -> Result<(), LayoutError> {
        passes.iter().try_for_each(|&pass| self.validate_pass(pass))
    }
}
