use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use geoguess::{GameService, SessionController, MAX_ROUNDS};
use geoguess_client::{HttpService, OfflineService, DEFAULT_API_URL};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod command;
mod game;
mod recording;

use command::{parse_command, HELP};
use game::Game;
use recording::Recorder;

#[derive(Parser)]
struct Args {
    /// Base URL of the game service
    #[arg(long, env = "GEO_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Seconds to wait for the game service before giving up on a request
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// How many rounds a game has
    #[arg(long, default_value_t = MAX_ROUNDS)]
    rounds: u32,

    /// Play without a server, using the problems in this JSON file
    #[arg(long)]
    offline: Option<PathBuf>,

    /// RNG seed for the order of offline problems
    #[arg(long)]
    seed: Option<u64>,

    /// Write each round's image into this directory
    #[arg(long)]
    save_images_to: Option<PathBuf>,

    /// Record each finished game as a JSON file into this directory
    #[arg(short, long)]
    record_sessions_to: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let service: Box<dyn GameService> = if let Some(path) = &args.offline {
        let seed = args.seed.unwrap_or_else(rand::random);
        info!(seed, path = %path.display(), "Playing offline");
        Box::new(OfflineService::load(path, StdRng::seed_from_u64(seed))?)
    } else {
        info!(api_url = %args.api_url, "Playing against the game service");
        Box::new(HttpService::new(
            &args.api_url,
            Duration::from_secs(args.timeout_secs),
        )?)
    };

    let recorder = if let Some(dir_path) = args.record_sessions_to {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    if let Some(dir) = &args.save_images_to {
        if !dir.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", dir.display());
        }
    }

    let controller = SessionController::with_max_rounds(service, args.rounds);
    let mut game = Game::new(controller, std::io::stdout(), recorder, args.save_images_to);

    println!("{}\n", HELP);
    game.start()?;

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Some(command)) => {
                if !game.handle(command)? {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => println!("{}", err),
        }
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
