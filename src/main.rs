use std::{
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context as _;
use clap::Parser;
use endgame_filter::{
    archive::{self, Period},
    scan, sink, FilterParams, RunMode, SymbolSet,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Print games from a chess.com monthly archive that reach an endgame
/// with few pieces from a restricted set.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// User for chess.com games
    #[arg(long, default_value = "gothamchess")]
    user: String,
    /// Year
    #[arg(long, default_value = "2023")]
    year: String,
    /// Month
    #[arg(long, default_value = "3")]
    month: String,
    /// Pieces allowed
    #[arg(long, default_value = "kKpP")]
    pieces: String,
    /// Pieces that must all be on the board
    #[arg(long, default_value = "")]
    require: String,
    /// Max num of pieces allowed (exclusive)
    #[arg(long, default_value_t = 8)]
    num: usize,
    /// Check endgame from the given ply
    #[arg(long = "move", default_value_t = 40)]
    start: usize,
    /// Duration of endgame with given params, in plies
    #[arg(long, default_value_t = 5)]
    duration: usize,
    /// Only count an uninterrupted run of plies
    #[arg(long)]
    consecutive: bool,
    /// Scan a local PGN file instead of fetching the archive
    #[arg(long)]
    file: Option<PathBuf>,
}

impl Cli {
    fn params(&self) -> endgame_filter::Result<FilterParams> {
        Ok(FilterParams {
            allowed: self.pieces.parse::<SymbolSet>()?,
            max_pieces: self.num,
            start_ply: self.start,
            min_run: self.duration,
            run_mode: if self.consecutive {
                RunMode::Consecutive
            } else {
                RunMode::Cumulative
            },
            required: self.require.parse::<SymbolSet>()?,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let params = cli.params()?;

    let source: Box<dyn Read> = match &cli.file {
        Some(path) => Box::new(archive::open_file(path)?),
        None => {
            let period = Period::from_ascii(cli.year.as_bytes(), cli.month.as_bytes())?;
            Box::new(archive::fetch(&cli.user, period)?)
        }
    };

    let scanner = scan(source, params);
    let params = scanner.params();
    info!(
        allowed = %params.allowed,
        max_pieces = params.max_pieces,
        start_ply = params.start_ply,
        min_run = params.min_run,
        run_mode = %params.run_mode,
        "scanning"
    );

    let stdout = io::stdout();
    let written = sink::write_all(&mut stdout.lock(), scanner)
        .context("scanning pgn archive")?;
    info!(games = written, "done");

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
