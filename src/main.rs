use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use ant_trails::emitter::Emitter;
use ant_trails::gpu::{self, GpuLayouts, SimulationResources};
use ant_trails::staging::ParameterStage;
use ant_trails::{wgsl, BufferIndex, Pass, SimulationConfig, TextureIndex};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a configuration, then print the binding table
    Check {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the effective configuration, defaults filled in, as TOML
        #[arg(long)]
        dump: bool,
    },
    /// Write the generated WGSL declarations for one pass
    Prelude {
        #[arg(short, long, value_enum, default_value_t = PassArg::UpdateAgents)]
        pass: PassArg,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Allocate every resource on a headless device and validate all bindings
    Probe {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SimulationConfig> {
    match path {
        Some(path) => SimulationConfig::load(path),
        None => {
            info!("no config given, using defaults");
            Ok(SimulationConfig::default())
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
enum PassArg {
    GenerateAgents,
    ResetAgents,
    Decay,
    UpdateAgents,
    Combine,
}

impl From<PassArg> for Pass {
    fn from(arg: PassArg) -> Pass {
        match arg {
            PassArg::GenerateAgents => Pass::GenerateAgents,
            PassArg::ResetAgents => Pass::ResetAgents,
            PassArg::Decay => Pass::Decay,
            PassArg::UpdateAgents => Pass::UpdateAgents,
            PassArg::Combine => Pass::Combine,
        }
    }
}

fn check(config: &SimulationConfig, dump: bool) -> Result<()> {
    if dump {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let agents = config.agent_variables()?;
    let trail = config.trail_variables()?;
    let uniforms = config.particle_uniforms()?;
    info!("agents: {:?}", agents);
    info!("trail: {:?}", trail);
    info!("domain: {}x{}", uniforms.width, uniforms.height);

    for buffer in BufferIndex::ALL {
        println!(
            "buffer  {:>2}  {:<22} {}",
            buffer.slot(),
            format!("{:?}", buffer),
            buffer.record()
        );
    }
    for texture in TextureIndex::ALL {
        println!("texture {:>2}  {:?}", texture.slot(), texture);
    }
    Ok(())
}

fn probe(config: &SimulationConfig) -> Result<()> {
    let stage = ParameterStage::new(
        config.agent_variables()?,
        config.trail_variables()?,
        config.ticks_per_second,
    )?;
    let (_adapter, device, _queue) =
        pollster::block_on(gpu::request_device()).context("no usable GPU adapter")?;

    let layouts = GpuLayouts::new(&device);
    let emitter = Emitter::new(config.agents.count, config.particle_uniforms()?, config.seed);
    let resources = SimulationResources::new(&device, stage.active(), &emitter)?;
    let bindings = resources.binding_set();
    bindings.validate_all(&Pass::ALL)?;

    for pass in Pass::ALL {
        resources.bind_groups(&device, &layouts, pass, resources.trails.roles());
        println!("{:<26} ok", pass.label());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Check { config, dump } => {
            let config = load_config(config.as_ref())?;
            check(&config, dump)
        }
        Command::Prelude { pass, out } => {
            let source = wgsl::prelude(pass.into());
            match out {
                Some(path) => std::fs::write(&path, source)
                    .with_context(|| format!("failed to write '{}'", path.display())),
                None => {
                    print!("{}", source);
                    Ok(())
                }
            }
        }
        Command::Probe { config } => {
            let config = load_config(config.as_ref())?;
            probe(&config)
        }
    }
}
