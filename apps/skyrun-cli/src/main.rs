use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use skyrun_assets::{AssetLoader, FsModelLoader, MemoryLoader};
use skyrun_common::{GameConfig, ModelManifest};
use skyrun_input::{InputEvent, LogicalKey};
use skyrun_kernel::GameEvent;
use skyrun_render::{DebugTextRenderer, Projection};
use skyrun_session::{FrameClock, GameSession};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

type Session = GameSession<DebugTextRenderer, StdRng>;

#[derive(Parser)]
#[command(name = "skyrun", about = "Headless driver for skyrun game sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Rotate {
    Left,
    Right,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective config as YAML
    Config,
    /// Run a session headless and print a summary
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Seconds per tick (ignored with --realtime)
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// RNG seed for spawn draws
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Directory to load models from; placeholder models are used when omitted
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Hold a rotation key for the whole run
        #[arg(long, value_enum)]
        rotate: Option<Rotate>,
        /// Send one wheel event with this delta before the first tick
        #[arg(long, allow_hyphen_values = true)]
        zoom: Option<f32>,
        /// Print the rendered frame every N ticks (0 = never)
        #[arg(long, default_value = "0")]
        print_every: u64,
        /// Pace ticks with the wall clock at roughly 60 Hz
        #[arg(long)]
        realtime: bool,
    },
    /// Run the same seed twice and compare the event logs
    Check {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "2000")]
        ticks: u64,
        /// RNG seed for spawn draws
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    match cli.command {
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Run {
            ticks,
            dt,
            seed,
            assets,
            rotate,
            zoom,
            print_every,
            realtime,
        } => {
            let mut session = new_session(&config, seed)?;
            match assets {
                Some(dir) => start(&mut session, &FsModelLoader::new(dir))?,
                None => start(&mut session, &placeholder_loader(&config.models))?,
            }

            if let Some(key) = rotate {
                let key = match key {
                    Rotate::Left => LogicalKey::RotateLeft,
                    Rotate::Right => LogicalKey::RotateRight,
                };
                session.handle_input(&InputEvent::KeyDown(key));
            }
            if let Some(delta) = zoom {
                session.handle_input(&InputEvent::Wheel(delta));
            }

            let mut clock = FrameClock::new();
            let (mut spawned, mut despawned) = (0usize, 0usize);
            for tick in 1..=ticks {
                let step = if realtime {
                    std::thread::sleep(Duration::from_millis(16));
                    clock.delta()
                } else {
                    dt
                };
                let report = session.tick(step);
                spawned += usize::from(report.spawned.is_some());
                despawned += report.despawned.len();

                if print_every > 0 && tick % print_every == 0 {
                    print!("{}", session.renderer().last_frame());
                }
            }

            let state = session.state();
            println!("Ran {} ticks ({:.1}s of play)", state.tick(), state.play_time());
            println!(
                "Enemies: spawned={spawned}, despawned={despawned}, active={}",
                state.enemy_count()
            );
            if let Some(player) = state.player() {
                println!(
                    "Player: pos=({:.2}, {:.2}, {:.2}) yaw={:.3}",
                    player.position.x, player.position.y, player.position.z, player.rotation_y
                );
            }
            if let Some(pose) = session.camera_pose() {
                println!(
                    "Camera: pos=({:.2}, {:.2}, {:.2}) zoom={:.2}",
                    pose.position.x,
                    pose.position.y,
                    pose.position.z,
                    state.camera().zoom_distance()
                );
            }
        }
        Commands::Check { ticks, seed } => {
            println!("Determinism check: seed={seed}, ticks={ticks}");
            let first = record_events(&config, seed, ticks)?;
            let second = record_events(&config, seed, ticks)?;
            tracing::info!(seed, ticks, events = first.len(), "determinism runs finished");

            let spawns = first
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
                .count();
            println!("Run 1: events={}, spawns={spawns}", first.len());
            println!("Run 2: events={}", second.len());
            if first != second {
                anyhow::bail!("event logs diverged for seed {seed}");
            }
            println!("Match: OK");
        }
    }

    Ok(())
}

fn new_session(config: &GameConfig, seed: u64) -> Result<Session> {
    let projection = Projection::with_fov(config.camera.fov_degrees);
    let renderer = DebugTextRenderer::with_projection(projection);
    GameSession::new(config.clone(), renderer, StdRng::seed_from_u64(seed))
        .context("invalid game config")
}

fn start<L: AssetLoader>(session: &mut Session, loader: &L) -> Result<()> {
    pollster::block_on(session.load(loader)).context("session failed to start")?;
    tracing::info!(archetypes = session.config().models.enemies.len(), "session running");
    Ok(())
}

/// Placeholder models for every path in the manifest.
fn placeholder_loader(manifest: &ModelManifest) -> MemoryLoader {
    manifest
        .enemies
        .iter()
        .fold(MemoryLoader::new().with_placeholder(manifest.player.clone()), |loader, path| {
            loader.with_placeholder(path.clone())
        })
}

fn record_events(config: &GameConfig, seed: u64, ticks: u64) -> Result<Vec<GameEvent>> {
    let mut session = new_session(config, seed)?;
    start(&mut session, &placeholder_loader(&config.models))?;
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(session.tick(1.0 / 60.0).events);
    }
    Ok(events)
}
