use anyhow::Context;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use cosweep_core::{CellCount, Coord, DEFAULT_RESTART_TIMEOUT_SECS, GameConfig};
use tokio::net::TcpListener;

#[derive(ValueEnum, Copy, Clone, Debug)]
enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

#[derive(Parser, Debug)]
#[command(version, about = "Shared-board minesweeper server", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    bind: String,

    #[arg(long, default_value_t = 5)]
    width: Coord,

    #[arg(long, default_value_t = 5)]
    height: Coord,

    #[arg(long, default_value_t = 5)]
    mines: CellCount,

    /// Preset board, overrides width, height and mines
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Seconds between the end of a round and the next one
    #[arg(long, default_value_t = DEFAULT_RESTART_TIMEOUT_SECS)]
    restart_timeout: u32,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Args {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let config = match self.difficulty {
            Some(Difficulty::Beginner) => GameConfig::beginner(),
            Some(Difficulty::Intermediate) => GameConfig::intermediate(),
            Some(Difficulty::Expert) => GameConfig::expert(),
            None => GameConfig::new((self.width, self.height), self.mines)?,
        };
        Ok(config.with_restart_timeout(self.restart_timeout))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    cosweep_server::logging::init(args.verbose.log_level_filter());
    log::debug!("seed: {:?}", args.seed);

    let config = args.game_config().context("invalid board configuration")?;
    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("could not bind {}", args.bind))?;

    cosweep_server::serve(listener, config, cosweep_server::seed_rng(args.seed)).await
}
