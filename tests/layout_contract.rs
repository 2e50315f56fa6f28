use ant_trails::layout::{decode, encode, Record};
use ant_trails::{AgentVariables, LayoutError, Particle, ParticleUniforms, TrailFieldVariables};

fn scenario_agents() -> AgentVariables {
    AgentVariables {
        count: 1000,
        move_speed: 1.0,
        turn_speed: 0.3,
        sensor_distance: 9.0,
        sensor_angle: 0.3,
        trail_weight: 5.0,
        sensor_size: 1,
    }
}

fn scenario_trail() -> TrailFieldVariables {
    TrailFieldVariables {
        diffuse_rate: 0.2,
        decay_rate: 0.02,
    }
}

#[test]
fn scenario_values_are_accepted() {
    scenario_agents().validate().unwrap();
    scenario_trail().validate().unwrap();
}

#[test]
fn turn_speed_above_one_is_rejected() {
    let agents = AgentVariables {
        turn_speed: 1.5,
        ..scenario_agents()
    };
    assert_eq!(
        agents.validated(),
        Err(LayoutError::OutOfRange {
            field: "turn_speed",
            value: 1.5,
            min: 0.0,
            max: 1.0,
        })
    );
}

#[test]
fn negative_decay_is_rejected() {
    let trail = TrailFieldVariables {
        decay_rate: -0.1,
        ..scenario_trail()
    };
    match trail.validate() {
        Err(LayoutError::OutOfRange { field, .. }) => assert_eq!(field, "decay_rate"),
        other => panic!("expected decay_rate to be rejected, got {:?}", other),
    }
}

#[test]
fn range_edges_are_inclusive() {
    for turn_speed in [0.0, 1.0] {
        AgentVariables {
            turn_speed,
            ..scenario_agents()
        }
        .validate()
        .unwrap();
    }
    for rate in [0.0, 1.0] {
        TrailFieldVariables {
            diffuse_rate: rate,
            decay_rate: rate,
        }
        .validate()
        .unwrap();
    }
    assert!(TrailFieldVariables {
        diffuse_rate: 1.01,
        decay_rate: 0.0,
    }
    .validate()
    .is_err());
}

#[test]
fn negative_fields_are_rejected() {
    let cases = [
        ("count", AgentVariables { count: -1, ..scenario_agents() }),
        ("move_speed", AgentVariables { move_speed: -0.5, ..scenario_agents() }),
        ("sensor_distance", AgentVariables { sensor_distance: -1.0, ..scenario_agents() }),
        ("trail_weight", AgentVariables { trail_weight: -1.0, ..scenario_agents() }),
        ("sensor_size", AgentVariables { sensor_size: -2, ..scenario_agents() }),
        ("sensor_angle", AgentVariables { sensor_angle: -0.1, ..scenario_agents() }),
    ];
    for (name, agents) in cases {
        match agents.validate() {
            Err(LayoutError::OutOfRange { field, .. }) => assert_eq!(field, name),
            other => panic!("{} should be rejected, got {:?}", name, other),
        }
    }
}

#[test]
fn records_survive_a_byte_transfer_exactly() {
    let agents = scenario_agents();
    let bytes = encode(&agents).to_vec();
    assert_eq!(bytes.len(), AgentVariables::SIZE);
    let decoded: AgentVariables = decode(&bytes).unwrap();
    assert_eq!(decoded.count, agents.count);
    assert_eq!(decoded.sensor_size, agents.sensor_size);
    assert_eq!(decoded.move_speed.to_bits(), agents.move_speed.to_bits());
    assert_eq!(decoded.turn_speed.to_bits(), agents.turn_speed.to_bits());
    assert_eq!(decoded.sensor_distance.to_bits(), agents.sensor_distance.to_bits());
    assert_eq!(decoded.sensor_angle.to_bits(), agents.sensor_angle.to_bits());
    assert_eq!(decoded.trail_weight.to_bits(), agents.trail_weight.to_bits());

    let trail = scenario_trail();
    let decoded: TrailFieldVariables = decode(encode(&trail)).unwrap();
    assert_eq!(decoded.diffuse_rate.to_bits(), trail.diffuse_rate.to_bits());
    assert_eq!(decoded.decay_rate.to_bits(), trail.decay_rate.to_bits());
}

#[test]
fn field_offsets_follow_declaration_order() {
    let agents = scenario_agents();
    let bytes = encode(&agents);
    assert_eq!(&bytes[0..4], &1000i32.to_ne_bytes());
    assert_eq!(&bytes[8..12], &0.3f32.to_ne_bytes());
    assert_eq!(&bytes[24..28], &1i32.to_ne_bytes());
}

#[test]
fn record_sizes_are_fixed() {
    assert_eq!(AgentVariables::SIZE, 28);
    assert_eq!(TrailFieldVariables::SIZE, 8);
    assert_eq!(ParticleUniforms::SIZE, 8);
    assert_eq!(Particle::SIZE, 16);
}

#[test]
fn particle_arrays_cast_without_copying_fields() {
    let particles = vec![
        Particle {
            position: [1.0, 2.0],
            angle: 0.5,
            padding: 0.0,
        },
        Particle {
            position: [3.0, 4.0],
            angle: 1.5,
            padding: 0.0,
        },
    ];
    let bytes: &[u8] = bytemuck::cast_slice(&particles);
    assert_eq!(bytes.len(), 32);
    let back: &[Particle] = bytemuck::cast_slice(bytes);
    assert_eq!(back, &particles[..]);
}
