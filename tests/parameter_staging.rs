use ant_trails::staging::ParameterStage;
use ant_trails::{AgentVariables, LayoutError, TrailFieldVariables};

fn stage() -> ParameterStage {
    ParameterStage::new(AgentVariables::default(), TrailFieldVariables::default(), 60.0).unwrap()
}

#[test]
fn updates_become_visible_only_at_the_next_tick() {
    let mut stage = stage();
    let first = *stage.begin_tick();

    let faster = AgentVariables {
        move_speed: 5.0,
        ..first.agents
    };
    stage.stage_agents(faster).unwrap();

    // mid-tick: the running dispatch still sees the old snapshot
    assert_eq!(stage.active().agents, first.agents);

    let second = *stage.begin_tick();
    assert_eq!(second.agents.move_speed, 5.0);
    assert!(second.time.seconds > first.time.seconds);
}

#[test]
fn last_staged_update_wins() {
    let mut stage = stage();
    for decay_rate in [0.1, 0.2, 0.3] {
        stage
            .stage_trail(TrailFieldVariables {
                diffuse_rate: 0.2,
                decay_rate,
            })
            .unwrap();
    }
    assert_eq!(stage.begin_tick().trail.decay_rate, 0.3);
}

#[test]
fn agent_count_is_fixed_for_a_run() {
    let mut stage = stage();
    let more = AgentVariables {
        count: 5,
        ..AgentVariables::default()
    };
    assert!(matches!(
        stage.stage_agents(more),
        Err(LayoutError::AgentCountChanged { to: 5, .. })
    ));
    assert!(!stage.has_pending());
}

#[test]
fn reallocation_restarts_the_clock() {
    let mut stage = stage();
    stage.begin_tick();
    stage
        .reallocate(AgentVariables {
            count: 10,
            ..AgentVariables::default()
        })
        .unwrap();
    assert_eq!(stage.active().time.seconds, 0.0);
    assert_eq!(stage.active().agents.count, 10);
}
