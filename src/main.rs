//! Terminal Simon Says runner (default binary).
//!
//! Without arguments it runs the interactive game on the alternate screen.
//! `autoplay [--rounds K] [--seed S]` plays one headless game through the
//! adapter runtime and prints each published result as a JSON line.

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyEventKind};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use simon_says::adapter::{
    AutoPlayer, EngineChannel, EngineCommand, EngineHandle, JsonLinesScoreSink, RuntimeConfig,
    TimedCuePlayer, TracingScoreSink, TracingStateSink, WatchStateSink,
};
use simon_says::core::{
    Collaborators, GameConfig, GameSnapshot, ScoreSink, SequenceGame, SignalSource, SimpleRng,
    ThreadRngSource,
};
use simon_says::input::{handle_key_event, should_quit, PadInput};
use simon_says::term::{BoardView, FrameBuffer, TerminalRenderer};
use simon_says::types::{Signal, TICK_MS};

const BLINK_MS: u128 = 500;
const DEFAULT_AUTOPLAY_ROUNDS: u32 = 5;

/// Sequence-memory game for the terminal.
#[derive(Debug, Parser)]
#[command(name = "simon-says", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Play one headless game and print each result as a JSON line
    Autoplay {
        /// Rounds to play correctly before missing on purpose
        #[arg(long, default_value_t = DEFAULT_AUTOPLAY_ROUNDS)]
        rounds: u32,
        /// Fixed generator seed (falls back to SIMON_SEED)
        #[arg(long)]
        seed: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = Runtime::new().context("start tokio runtime")?;
    let config = GameConfig::from_env();

    match cli.command {
        Some(Command::Autoplay { rounds, seed }) => {
            init_tracing(io::stderr);
            let seed = seed.or_else(env_seed);
            runtime.block_on(autoplay(config, rounds, seed))
        }
        None => {
            match env::var("SIMON_LOG") {
                Ok(path) => {
                    let file = OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(&path)
                        .with_context(|| format!("open log file {path}"))?;
                    init_tracing(Mutex::new(file));
                }
                // Anything written to the terminal would corrupt the board.
                Err(_) => init_tracing(io::sink),
            }
            run_terminal(&runtime, config)
        }
    }
}

fn init_tracing<W>(writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);

    let json = matches!(env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        builder.json().with_current_span(true).init();
    } else {
        builder.compact().init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn env_seed() -> Option<u32> {
    env::var("SIMON_SEED").ok().and_then(|s| s.parse().ok())
}

fn signal_source(seed: Option<u32>) -> Box<dyn SignalSource> {
    match seed {
        Some(seed) => Box::new(SimpleRng::new(seed)),
        None => Box::new(ThreadRngSource),
    }
}

fn score_sink() -> Result<Box<dyn ScoreSink>> {
    let sink: Box<dyn ScoreSink> = match env::var("SIMON_SCORE_LOG") {
        Ok(path) => Box::new(JsonLinesScoreSink::append(path)?),
        Err(_) => Box::new(TracingScoreSink),
    };
    Ok(sink)
}

async fn autoplay(config: GameConfig, rounds: u32, seed: Option<u32>) -> Result<()> {
    let channel = EngineChannel::new(RuntimeConfig::from_env());
    let collaborators = Collaborators::silent()
        .with_cues(Box::new(TimedCuePlayer::new(channel.sender())))
        .with_scores(Box::new(JsonLinesScoreSink::new(io::stdout())))
        .with_state(Box::new(TracingStateSink));
    let game = SequenceGame::new(config, signal_source(seed), collaborators)?;
    let handle = channel.spawn(game);

    let bot = AutoPlayer::new(rounds, Signal::Green.index());
    let result = bot.play(&handle).await;
    handle.shutdown().await?;

    let score = result?;
    info!(score, rounds, "autoplay done");
    Ok(())
}

fn run_terminal(runtime: &Runtime, config: GameConfig) -> Result<()> {
    let channel = EngineChannel::new(RuntimeConfig::from_env());
    let (state_sink, snapshots) = WatchStateSink::channel();
    let collaborators = Collaborators::silent()
        .with_cues(Box::new(TimedCuePlayer::new(channel.sender())))
        .with_scores(score_sink()?)
        .with_state(Box::new(state_sink));
    let board = BoardView::new(&config.signals);
    let game = SequenceGame::new(config, signal_source(env_seed()), collaborators)?;
    let handle = {
        let _guard = runtime.enter();
        channel.spawn(game)
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = run(&mut term, &handle, &snapshots, &board);

    // Always try to restore terminal state.
    let _ = term.exit();
    runtime.block_on(handle.shutdown())?;
    result
}

fn run(
    term: &mut TerminalRenderer,
    handle: &EngineHandle,
    snapshots: &watch::Receiver<GameSnapshot>,
    board: &BoardView,
) -> Result<()> {
    let started = Instant::now();
    let frame = Duration::from_millis(TICK_MS as u64);
    let mut fb = FrameBuffer::new(1, 1);

    loop {
        let view = handle.view();
        let blink_on = (started.elapsed().as_millis() / BLINK_MS) % 2 == 0;
        board.render_into(&view, blink_on, &mut fb);
        board.draw_mirror(&snapshots.borrow(), &mut fb);

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let x = w.saturating_sub(fb.width()) / 2;
        let y = h.saturating_sub(fb.height()) / 2;
        term.draw_at(&fb, x, y)?;

        if !event::poll(frame)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                let command = match handle_key_event(key) {
                    Some(PadInput::Pick(index)) if view.active => EngineCommand::Submit(index),
                    Some(PadInput::Pick(index)) => EngineCommand::Start(index),
                    Some(PadInput::Abort) => EngineCommand::Abort,
                    None => continue,
                };
                if let Err(e) = handle.try_send(command) {
                    warn!(error = %e, "key dropped");
                }
            }
            Event::Resize(..) => term.invalidate(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["simon-says"]).unwrap();
        assert_eq!(cli.command, None);

        let cli = Cli::try_parse_from(["simon-says", "autoplay"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Autoplay {
                rounds: DEFAULT_AUTOPLAY_ROUNDS,
                seed: None
            })
        );

        let cli =
            Cli::try_parse_from(["simon-says", "autoplay", "--seed", "9", "--rounds", "2"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Autoplay {
                rounds: 2,
                seed: Some(9)
            })
        );
    }

    #[test]
    fn test_parse_args_rejects_bad_input() {
        assert!(Cli::try_parse_from(["simon-says", "serve"]).is_err());
        assert!(Cli::try_parse_from(["simon-says", "autoplay", "--rounds"]).is_err());
        assert!(Cli::try_parse_from(["simon-says", "autoplay", "--rounds", "many"]).is_err());
        assert!(Cli::try_parse_from(["simon-says", "autoplay", "--speed", "1"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
