//! Host parameter updates, held back until the next tick boundary.

use log::{debug, warn};

use crate::error::LayoutError;
use crate::layout::{AgentVariables, CurrentTime, TrailFieldVariables};

/// Everything a tick's dispatches read from uniforms. Immutable for the
/// duration of the tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameParameters {
    pub agents: AgentVariables,
    pub trail: TrailFieldVariables,
    pub time: CurrentTime,
}

/// The clock advances by `1 / ticks_per_second`, so the rate must be
/// finite and positive.
pub fn check_tick_rate(ticks_per_second: f32) -> Result<(), LayoutError> {
    if ticks_per_second.is_finite() && ticks_per_second > 0.0 {
        return Ok(());
    }
    Err(LayoutError::OutOfRange {
        field: "ticks_per_second",
        value: ticks_per_second.into(),
        min: f64::MIN_POSITIVE,
        max: f64::INFINITY,
    })
}

#[derive(Debug)]
pub struct ParameterStage {
    active: FrameParameters,
    pending_agents: Option<AgentVariables>,
    pending_trail: Option<TrailFieldVariables>,
    tick_delta: f32,
}

impl ParameterStage {
    pub fn new(
        agents: AgentVariables,
        trail: TrailFieldVariables,
        ticks_per_second: f32,
    ) -> Result<Self, LayoutError> {
        agents.validate()?;
        trail.validate()?;
        check_tick_rate(ticks_per_second)?;
        Ok(ParameterStage {
            active: FrameParameters {
                agents,
                trail,
                time: CurrentTime::default(),
            },
            pending_agents: None,
            pending_trail: None,
            tick_delta: 1.0 / ticks_per_second,
        })
    }

    /// Parameters of the running (or last) tick.
    pub fn active(&self) -> &FrameParameters {
        &self.active
    }

    pub fn has_pending(&self) -> bool {
        self.pending_agents.is_some() || self.pending_trail.is_some()
    }

    /// Queues new agent parameters for the next tick. The agent count is fixed
    /// for a run, see [`ParameterStage::reallocate`].
    pub fn stage_agents(&mut self, agents: AgentVariables) -> Result<(), LayoutError> {
        agents.validate()?;
        if agents.count != self.active.agents.count {
            return Err(LayoutError::AgentCountChanged {
                from: self.active.agents.count,
                to: agents.count,
            });
        }
        if self.pending_agents.replace(agents).is_some() {
            debug!("replaced staged agent parameters before they were applied");
        }
        Ok(())
    }

    pub fn stage_trail(&mut self, trail: TrailFieldVariables) -> Result<(), LayoutError> {
        trail.validate()?;
        if self.pending_trail.replace(trail).is_some() {
            debug!("replaced staged trail parameters before they were applied");
        }
        Ok(())
    }

    /// Starts a new run with a different agent count. The caller reallocates
    /// the particle buffer before the next tick.
    pub fn reallocate(&mut self, agents: AgentVariables) -> Result<(), LayoutError> {
        agents.validate()?;
        if self.pending_agents.take().is_some() {
            warn!("dropping staged agent parameters on reallocation");
        }
        self.active.agents = agents;
        self.active.time = CurrentTime::default();
        Ok(())
    }

    /// Applies staged updates and advances the clock by one tick.
    pub fn begin_tick(&mut self) -> &FrameParameters {
        if let Some(agents) = self.pending_agents.take() {
            debug!("applying staged agent parameters");
            self.active.agents = agents;
        }
        if let Some(trail) = self.pending_trail.take() {
            debug!("applying staged trail parameters");
            self.active.trail = trail;
        }
        self.active.time.seconds += self.tick_delta;
        &self.active
    }
}
