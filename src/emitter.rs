use std::f32::consts::PI;

use cgmath::Vector2;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::layout::{Particle, ParticleUniforms};

/// Builds the initial contents of the particle buffer.
///
/// Rebuilt whenever the domain is resized, since positions are only valid
/// inside the domain they were spawned in.
pub struct Emitter {
    pub uniforms: ParticleUniforms,
    pub particles: Vec<Particle>,
}

impl Emitter {
    pub fn new(count: u32, uniforms: ParticleUniforms, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..count)
            .map(|_| {
                let position = Vector2::new(
                    uniforms.width * rng.gen::<f32>(),
                    uniforms.height * rng.gen::<f32>(),
                );
                Particle::new(uniforms.wrap(position), rng.gen::<f32>() * PI * 2.0)
            })
            .collect();
        info!(
            "spawned {} agents in a {}x{} domain",
            count, uniforms.width, uniforms.height
        );
        Emitter {
            uniforms,
            particles,
        }
    }

    /// Contents for a particle buffer of `BufferIndex::ParticleBuffer` size.
    ///
    /// An empty run still gets one zeroed element.
    pub fn buffer_contents(&self) -> Vec<Particle> {
        if self.particles.is_empty() {
            vec![Particle::new(Vector2::new(0.0, 0.0), 0.0)]
        } else {
            self.particles.clone()
        }
    }
}
