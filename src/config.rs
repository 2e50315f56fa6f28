use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::LayoutError;
use crate::layout::{AgentVariables, ParticleUniforms, TrailFieldVariables};
use crate::staging::check_tick_rate;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DomainConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for DomainConfig {
    fn default() -> Self {
        DomainConfig {
            width: WIDTH as f32,
            height: HEIGHT as f32,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub count: u32,
    pub move_speed: f32,
    pub turn_speed: f32,
    pub sensor_distance: f32,
    /// Radians.
    pub sensor_angle: f32,
    pub trail_weight: f32,
    pub sensor_size: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            count: NUM_AGENTS,
            move_speed: MOVE_SPEED,
            turn_speed: TURN_SPEED,
            sensor_distance: SENSOR_DISTANCE,
            sensor_angle: SENSOR_ANGLE,
            trail_weight: TRAIL_WEIGHT,
            sensor_size: SENSOR_SIZE as u32,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrailConfig {
    pub diffuse_rate: f32,
    pub decay_rate: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        TrailConfig {
            diffuse_rate: DIFFUSE_RATE,
            decay_rate: DECAY_RATE,
        }
    }
}

/// Simulation configuration, loaded from a TOML file. Every key is optional.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Layout version the file was written against.
    pub layout_version: u32,
    pub seed: u64,
    pub ticks_per_second: f32,
    pub domain: DomainConfig,
    pub agents: AgentConfig,
    pub trail: TrailConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            layout_version: LAYOUT_VERSION,
            seed: SEED,
            ticks_per_second: TICKS_PER_SECOND,
            domain: DomainConfig::default(),
            agents: AgentConfig::default(),
            trail: TrailConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(text).context("failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes every key, defaults included, so the output loads back
    /// to an equal configuration.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.layout_version != LAYOUT_VERSION {
            return Err(LayoutError::VersionSkew {
                expected: LAYOUT_VERSION,
                found: self.layout_version,
            });
        }
        check_tick_rate(self.ticks_per_second)?;
        self.agent_variables()?;
        self.trail_variables()?;
        self.particle_uniforms()?;
        Ok(())
    }

    pub fn agent_variables(&self) -> Result<AgentVariables, LayoutError> {
        let agents = &self.agents;
        AgentVariables {
            count: to_i32("agents.count", agents.count)?,
            move_speed: agents.move_speed,
            turn_speed: agents.turn_speed,
            sensor_distance: agents.sensor_distance,
            sensor_angle: agents.sensor_angle,
            trail_weight: agents.trail_weight,
            sensor_size: to_i32("agents.sensor_size", agents.sensor_size)?,
        }
        .validated()
    }

    pub fn trail_variables(&self) -> Result<TrailFieldVariables, LayoutError> {
        TrailFieldVariables {
            diffuse_rate: self.trail.diffuse_rate,
            decay_rate: self.trail.decay_rate,
        }
        .validated()
    }

    pub fn particle_uniforms(&self) -> Result<ParticleUniforms, LayoutError> {
        let uniforms = ParticleUniforms {
            width: self.domain.width,
            height: self.domain.height,
        };
        uniforms.validate()?;
        Ok(uniforms)
    }
}

fn to_i32(field: &'static str, value: u32) -> Result<i32, LayoutError> {
    i32::try_from(value).map_err(|_| LayoutError::OutOfRange {
        field,
        value: value.into(),
        min: 0.0,
        max: i32::MAX.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = SimulationConfig::from_toml("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.agent_variables().unwrap(), AgentVariables::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = SimulationConfig::from_toml(
            r#"
            seed = 9
            [agents]
            count = 1000
            turn_speed = 0.3
            [trail]
            decay_rate = 0.02
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 9);
        let agents = config.agent_variables().unwrap();
        assert_eq!(agents.count, 1000);
        assert_eq!(agents.turn_speed, 0.3);
        assert_eq!(agents.move_speed, MOVE_SPEED);
        assert_eq!(config.trail_variables().unwrap().decay_rate, 0.02);
        assert_eq!(config.trail.diffuse_rate, DIFFUSE_RATE);
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(SimulationConfig::from_toml("[agents]\nturn_speed = 1.5\n").is_err());
        assert!(SimulationConfig::from_toml("[trail]\ndecay_rate = -0.1\n").is_err());
        assert!(SimulationConfig::from_toml("[domain]\nwidth = 0.0\n").is_err());
    }

    #[test]
    fn version_skew_is_rejected() {
        let err = SimulationConfig::from_toml("layout_version = 99\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<LayoutError>(),
            Some(&LayoutError::VersionSkew {
                expected: LAYOUT_VERSION,
                found: 99,
            })
        );
    }

    #[test]
    fn huge_count_does_not_wrap() {
        let mut config = SimulationConfig::default();
        config.agents.count = u32::MAX;
        assert!(config.agent_variables().is_err());
    }

    #[test]
    fn tick_rate_must_be_positive() {
        for rate in ["0.0", "-30.0", "nan", "inf"] {
            let err = SimulationConfig::from_toml(&format!("ticks_per_second = {}\n", rate)).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<LayoutError>(),
                    Some(LayoutError::OutOfRange {
                        field: "ticks_per_second",
                        ..
                    })
                ),
                "ticks_per_second = {} was accepted",
                rate
            );
        }
        assert_eq!(SimulationConfig::from_toml("ticks_per_second = 30.0\n").unwrap().ticks_per_second, 30.0);
    }

    #[test]
    fn dump_loads_back_unchanged() {
        let mut config = SimulationConfig::default();
        config.seed = 7;
        config.agents.count = 250;
        config.trail.decay_rate = 0.05;
        let text = config.to_toml().unwrap();
        assert!(text.contains("[agents]"));
        assert_eq!(SimulationConfig::from_toml(&text).unwrap(), config);
    }
}
