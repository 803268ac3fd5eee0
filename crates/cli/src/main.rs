use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use parley_core::{Config, TransportKind, logging::LoggingConfig};
use parley_session::{FrameCodec, InboundFrame, ProcessTransport, ReplayTransport, SessionHandle, Transport};
use parley_ui::{App, Transcript, TranscriptRenderer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Parley - a terminal client for streaming agent sessions
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Chat with an agent session from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config.toml (default: ~/.parley/config.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Spawn an agent and talk to it over stdio (the default)
    Connect {
        /// Working directory for the agent
        #[arg(long, value_name = "DIR")]
        cwd: Option<PathBuf>,

        /// Agent program and arguments, after `--`
        #[arg(last = true, value_name = "COMMAND")]
        command: Vec<String>,
    },
    /// Chat against a recorded session
    Replay {
        /// JSONL recording
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Delay between replayed frames
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
    },
    /// Print a recorded session as plain text, without the TUI
    Render {
        /// JSONL recording
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Wrap width
        #[arg(long, default_value_t = 100)]
        width: usize,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print an example config.toml
    Example,
    /// Validate the config file and print the result
    Check,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Connect { cwd: None, command: Vec::new() }) {
        Commands::Config { action: ConfigAction::Example } => {
            print!("{}", Config::example());
            Ok(())
        }
        Commands::Config { action: ConfigAction::Check } => cmd_config_check(cli.config.as_deref()),
        Commands::Render { file, width } => {
            let config = load_config(cli.config.as_deref(), cli.verbose)?;
            let _guard = init_logging(&config, true, cli.verbose)?;
            cmd_render(&file, width)
        }
        Commands::Connect { cwd, command } => {
            let mut config = load_config(cli.config.as_deref(), cli.verbose)?;
            config.session.transport = TransportKind::Process;
            if !command.is_empty() {
                config.session.command = command;
            }
            if cwd.is_some() {
                config.session.cwd = cwd;
            }
            cmd_chat(config, cli.verbose)
        }
        Commands::Replay { file, delay_ms } => {
            let mut config = load_config(cli.config.as_deref(), cli.verbose)?;
            config.session.transport = TransportKind::Replay;
            config.session.replay_file = Some(file);
            if let Some(delay_ms) = delay_ms {
                config.session.replay_delay_ms = delay_ms;
            }
            cmd_chat(config, cli.verbose)
        }
    }
}

/// Load the config file, falling back to defaults when none exists
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path().context("Failed to locate config")?,
    };

    if !path.exists() {
        if verbose {
            eprintln!("{} No config at {}, using defaults", "Info:".blue().bold(), path.display());
        }
        return Ok(Config::default());
    }

    if verbose {
        eprintln!("{} Loading config from {}", "Info:".green().bold(), path.display());
    }
    let content = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Install tracing. Returns the file writer guard, which must outlive the session.
fn init_logging(
    config: &Config, stderr: bool, verbose: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let mut logging = LoggingConfig::from(config.logging.clone());
    if verbose {
        logging = logging.with_level("debug");
    }
    if !stderr {
        logging = logging.without_stderr();
    }
    parley_core::init_logging(Some(logging)).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn cmd_config_check(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path().context("Failed to locate config")?,
    };
    let config = Config::from_file(&path).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;

    println!("{} {}", "Valid:".green().bold(), path.display());
    println!("  transport: {}", config.session.transport.as_str().cyan());
    match config.session.transport {
        TransportKind::Process => println!("  command: {}", config.session.command.join(" ").cyan()),
        TransportKind::Replay => {
            let file = config.session.replay_file.as_deref().map(Path::display);
            println!("  replay file: {}", file.map(|f| f.to_string()).unwrap_or_default().cyan());
        }
    }
    println!(
        "  scroll: threshold {} rows, throttle {}ms",
        config.scroll.bottom_threshold, config.scroll.throttle_ms
    );
    Ok(())
}

fn build_transport(config: &Config) -> Result<Box<dyn Transport>> {
    let session = &config.session;
    let transport: Box<dyn Transport> = match session.transport {
        TransportKind::Process => {
            let mut transport = ProcessTransport::from_command(&session.command)
                .context("No agent command configured; pass one after `--` or set session.command")?;
            if let Some(cwd) = &session.cwd {
                transport = transport.with_cwd(cwd.clone());
            }
            Box::new(transport)
        }
        TransportKind::Replay => {
            let file = session.replay_file.clone().context("No replay file configured")?;
            Box::new(ReplayTransport::new(file, Duration::from_millis(session.replay_delay_ms)))
        }
    };
    Ok(transport)
}

/// Run the interactive TUI against the configured transport
fn cmd_chat(config: Config, verbose: bool) -> Result<()> {
    config.validate().map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    let _guard = init_logging(&config, false, verbose)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async {
        let transport = build_transport(&config)?;
        tracing::info!(transport = transport.name(), "starting session");

        let cancel = CancellationToken::new();
        let session = SessionHandle::spawn(transport, cancel.clone());
        let mut app = App::new(session, &config);

        let result = app.run().await.context("Terminal error");
        cancel.cancel();
        result
    })
}

/// Fold a recording into a transcript, one turn per recorded response
fn fold_recording(content: &str) -> Transcript {
    let mut codec = FrameCodec::new();
    let mut transcript = Transcript::new();

    for line in content.lines() {
        let event = match codec.decode_line(line) {
            Ok(Some(InboundFrame::Transcript(event))) => event,
            Ok(Some(InboundFrame::Info(info))) => {
                tracing::debug!(?info, "skipping session info frame");
                continue;
            }
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable frame");
                continue;
            }
        };

        if !transcript.is_streaming() {
            transcript.begin_turn(format!("(recorded turn {})", transcript.len() + 1));
        }
        transcript.apply(event);
    }
    transcript
}

fn cmd_render(file: &Path, width: usize) -> Result<()> {
    let content = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let transcript = fold_recording(&content);
    println!("{}", TranscriptRenderer::new(&transcript, width).plain_text());
    Ok(())
}
