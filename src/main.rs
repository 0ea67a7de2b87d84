//! Backbeat CLI — generate a groove and print its events.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backbeat::blueprint::Genre;
use backbeat::event::TimeBase;
use backbeat::session::{remember_config, YamlSettingsStore};
use backbeat::{Event, Session, SessionConfig};

#[derive(Parser)]
#[command(name = "backbeat", version, about = "Generative drum grooves as MIDI events")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a sequence and print it
    Generate {
        /// Genre blueprint to use
        #[arg(short, long)]
        genre: Option<String>,
        /// RNG seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of repetition units
        #[arg(short, long)]
        units: Option<usize>,
        /// YAML session config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Disable micro-timing, velocity noise and surprises
        #[arg(long)]
        no_humanize: bool,
        /// Save the resulting config to ~/.backbeat/settings.yaml
        #[arg(long)]
        remember: bool,
    },
    /// List the available genres
    Genres,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
    Table,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("backbeat=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Genres => {
            for genre in Genre::ALL {
                println!("{:<10} swing {:.2}", genre.as_str(), genre.blueprint().swing);
            }
            Ok(())
        }
        Command::Generate {
            genre,
            seed,
            units,
            config,
            format,
            no_humanize,
            remember,
        } => {
            let mut cfg = match config {
                Some(path) => SessionConfig::load(&path)?,
                None => SessionConfig::default(),
            };
            if let Some(name) = genre {
                cfg.genre = Genre::from_name(&name).ok_or_else(|| format!("unknown genre '{name}'"))?;
            }
            if let Some(seed) = seed {
                cfg.seed = seed;
            }
            if let Some(units) = units {
                cfg.repetition_units = units;
            }
            if no_humanize {
                cfg.humanization_enabled = false;
            }

            let mut session = Session::new(cfg.clone())?;
            let events = session.generate()?;
            for (unit, kind) in session.fills() {
                tracing::debug!("fill {kind:?} closes unit {unit}");
            }
            print_events(&events, TimeBase::new(cfg.ticks_per_beat), format)?;

            if remember {
                let mut store = YamlSettingsStore::open_default()?;
                remember_config(&mut store, &cfg)?;
                tracing::info!("settings saved to {}", store.path().display());
            }
            Ok(())
        }
    }
}

fn print_events(events: &[Event], time_base: TimeBase, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        Format::Yaml => print!("{}", serde_yaml::to_string(events)?),
        Format::Json => println!("{}", serde_json::to_string_pretty(events)?),
        Format::Table => {
            println!("{:>8} {:>8}  {:<11} {:>5} {:>5} {:>4}", "tick", "beat", "role", "pitch", "dur", "vel");
            for e in events {
                println!(
                    "{:>8} {:>8.3}  {:<11} {:>5} {:>5} {:>4}",
                    e.start_tick,
                    time_base.ticks_to_beats(e.start_tick),
                    e.role.as_str(),
                    e.pitch,
                    e.duration_ticks,
                    e.velocity
                );
            }
        }
    }
    Ok(())
}
