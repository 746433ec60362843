//! Rolemesh Swarm Simulator
//!
//! Generate or load a triangle grid swarm and run role assignment until every
//! node holds a distinct role.

use std::env;
use std::path::PathBuf;

use rolemesh_consensus::RunStatus;
use rolemesh_sim::{parse_value, Error, NetworkSource, Simulation, SimulationConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
usage: rolemesh-sim [options]

  -f <file>           load the swarm layout from <file>
  -n <size>           generate a swarm of <size> nodes
  --seed <u64>        seed for layout and preferences
  --max-rounds <n>    give up after <n> rounds
  --save <file>       write the layout to <file> before running
  --json              print the event timeline as JSON lines
  -h, --help          show this message

Environment: ROLEMESH_SEED, ROLEMESH_NETWORK_SIZE, ROLEMESH_NETWORK_FILE, ROLEMESH_MAX_ROUNDS";

struct Options {
    config: SimulationConfig,
    save: Option<PathBuf>,
    json: bool,
}

fn parse_args(mut config: SimulationConfig) -> rolemesh_sim::Result<Option<Options>> {
    let mut save = None;
    let mut json = false;
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next().ok_or_else(|| Error::InvalidConfig {
                key: flag.to_string(),
                value: String::new(),
            })
        };
        match arg.as_str() {
            "-f" => config.network = NetworkSource::File(PathBuf::from(value("-f")?)),
            "-n" => {
                config.network = NetworkSource::Generate {
                    size: parse_value("-n", &value("-n")?)?,
                }
            }
            "--seed" => config.seed = parse_value("--seed", &value("--seed")?)?,
            "--max-rounds" => {
                config.max_rounds = parse_value("--max-rounds", &value("--max-rounds")?)?
            }
            "--save" => save = Some(PathBuf::from(value("--save")?)),
            "--json" => json = true,
            "-h" | "--help" => return Ok(None),
            other => {
                return Err(Error::InvalidConfig {
                    key: "argument".to_string(),
                    value: other.to_string(),
                })
            }
        }
    }

    Ok(Some(Options { config, save, json }))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rolemesh_sim=info,rolemesh_consensus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(options) = parse_args(SimulationConfig::from_env()?)? else {
        println!("{USAGE}");
        return Ok(());
    };

    let mut sim = Simulation::new(options.config)?;
    if let Some(path) = &options.save {
        sim.network().save(path)?;
        tracing::info!(path = %path.display(), "layout saved");
    }

    let summary = sim.run()?;

    if options.json {
        for event in sim.events() {
            println!("{}", serde_json::to_string(event)?);
        }
    } else {
        let snapshot = sim.snapshot();
        println!("Rolemesh Role Assignment");
        println!("========================");
        println!();
        println!("  Nodes:         {}", snapshot.nodes.len());
        println!("  Seed:          {}", sim.config().seed);
        println!("  Status:        {:?}", summary.status);
        println!("  Rounds:        {}", summary.rounds.0);
        println!("  Transmissions: {}", summary.total_transmissions);
        println!();
        for node in &snapshot.nodes {
            let marker = if node.in_conflict { " (conflict)" } else { "" };
            println!(
                "  {:>5} at {:>10} -> {:>5}  strength {:.3}{}",
                node.id.to_string(),
                node.position.to_string(),
                node.role.to_string(),
                node.strength,
                marker
            );
        }
    }

    if summary.status != RunStatus::Converged {
        return Err(format!("run ended without convergence: {:?}", summary.status).into());
    }
    Ok(())
}
