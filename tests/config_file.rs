use std::path::Path;

use ant_trails::{AgentVariables, SimulationConfig, TrailFieldVariables};

#[test]
fn shipped_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
    let config = SimulationConfig::load(&path).unwrap();
    assert_eq!(config, SimulationConfig::default());
    assert_eq!(config.agent_variables().unwrap(), AgentVariables::default());
    assert_eq!(config.trail_variables().unwrap(), TrailFieldVariables::default());
}

#[test]
fn missing_file_names_the_path() {
    let err = SimulationConfig::load("does/not/exist.toml").unwrap_err();
    assert!(format!("{:#}", err).contains("does/not/exist.toml"));
}
