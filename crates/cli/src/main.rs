//! terminal-sync command-line tool.
//!
//! One-shot commands for generating and validating configuration, inspecting
//! terminal documents, and running a single sync tick between two files.

mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use terminal_sync_core::config::AppConfig;
use terminal_sync_core::endpoint::{FileEndpoint, TextEndpoint};
use terminal_sync_core::packet::Packet;
use terminal_sync_core::store::{KeyValueStore, Vector2, Vector4};
use terminal_sync_core::sync::Terminal;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// terminal-sync command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "terminal-sync",
    version,
    about = "Inspect and synchronize terminal key/value documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./terminal-sync.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate {
        /// Path to the TOML configuration file.
        #[arg(short, long, default_value = "./terminal-sync.toml")]
        config: PathBuf,
    },

    /// Print (or write) the default terminal document.
    Defaults {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a document parses.
    Check {
        /// Document to check.
        file: PathBuf,
    },

    /// Show the typed fields of a document.
    Show {
        /// Document to show.
        file: PathBuf,

        /// Print JSON instead of a human-readable listing.
        #[arg(long)]
        json: bool,
    },

    /// Run one sync tick between a local state file and an external file.
    Sync {
        /// Local state document (created from defaults if missing).
        #[arg(long)]
        local: PathBuf,

        /// Externally edited document.
        #[arg(long)]
        external: PathBuf,
    },

    /// Record an error message in a document's diagnostic fields.
    FlagError {
        /// Document to update.
        file: PathBuf,

        /// Human-readable error message.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    // Minimal logging for CLI
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style::error(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Defaults { output } => cmd_defaults(output.as_deref()),
        Commands::Check { file } => cmd_check(&file),
        Commands::Show { file, json } => cmd_show(&file, json),
        Commands::Sync { local, external } => cmd_sync(&local, &external),
        Commands::FlagError { file, message } => cmd_flag_error(&file, &message),
    }
}

// ---------------------------------------------------------------------------
// Document helpers
// ---------------------------------------------------------------------------

fn read_document(path: &Path) -> Result<KeyValueStore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    KeyValueStore::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_document(path: &Path, store: &KeyValueStore) -> Result<()> {
    FileEndpoint::new(path)
        .set_text(&store.serialize())
        .with_context(|| format!("failed to write {}", path.display()))
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_init(output: &Path) -> Result<()> {
    let default_config = r#"# terminal-sync configuration

[daemon]
tick_interval_ms = 100
log_level = "info"
push_on_start = true

[endpoint]
path = "./custom_data.ini"
create_if_missing = true

[session]
# user = "PLACEHOLDERUSER"
# session_id = "NA"
# cmd_mode = "CMDTerminal"      # CMDTerminal | CMDInput | Custom
# visual_style = "Debug"        # Debug | Default | Custom | NoHighlight
"#;

    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_config).context("failed to write config file")?;

    println!("{}", style::success(&format!("Default configuration written to {}", output.display())));
    println!();
    println!("Next steps:");
    println!("  1. Point [endpoint].path at the text file to keep in sync");
    println!(
        "  2. Validate with: terminal-sync validate --config {}",
        output.display()
    );
    println!(
        "  3. Start the daemon: terminal-sync-daemon --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let config = AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    match config.validate() {
        Ok(()) => println!("  [OK] All fields are valid"),
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!("  Endpoint      : {}", config.endpoint.path.display());
    println!(
        "  Missing file  : {}",
        if config.endpoint.create_if_missing {
            "created"
        } else {
            "error"
        }
    );
    println!("  Tick interval : {}ms", config.daemon.tick_interval_ms);
    println!("  Log level     : {}", config.daemon.log_level);
    println!(
        "  Push on start : {}",
        if config.daemon.push_on_start { "yes" } else { "no" }
    );

    Ok(())
}

fn cmd_defaults(output: Option<&Path>) -> Result<()> {
    let packet = Packet::new();
    match output {
        Some(path) => {
            write_document(path, packet.store())?;
            println!("{}", style::success(&format!("Default document written to {}", path.display())));
        }
        None => print!("{}", packet.serialize()),
    }
    Ok(())
}

fn cmd_check(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    match KeyValueStore::parse(&text) {
        Ok(store) => {
            println!(
                "{}",
                style::success(&format!(
                    "{}: {} sections, {} keys",
                    file.display(),
                    store.sections().len(),
                    store.len()
                ))
            );
            if text != store.serialize() {
                println!("{}", style::dim("  (not in canonical form; a sync tick would rewrite it)"));
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", style::error(&format!("{}: {}", file.display(), e)));
            if let Some(line) = text.split('\n').nth(e.line() - 1) {
                println!("    {}", style::dim(line));
            }
            anyhow::bail!("document does not parse");
        }
    }
}

/// Typed snapshot of a packet for display.
#[derive(Debug, Serialize)]
struct PacketView {
    cmd_mode: String,
    session_id: String,
    first_run: bool,
    text: String,
    user: String,
    carriage_index: i64,
    special_keys: Vec<String>,
    general_keys: Vec<String>,
    alpha: f64,
    can_play_sound_on_mouse_over: bool,
    text_scale: f64,
    visual_style: String,
    position_x: f64,
    position_y: f64,
    size: Vector2,
    color_mask: Vector4,
    border_color: Vector4,
    error_count: i64,
    last_error: String,
}

impl From<&Packet> for PacketView {
    fn from(p: &Packet) -> Self {
        Self {
            cmd_mode: p.cmd_mode().to_string(),
            session_id: p.session_id().to_string(),
            first_run: p.first_run(),
            text: p.text().to_string(),
            user: p.user().to_string(),
            carriage_index: p.carriage_index(),
            special_keys: p.special_keys().into_iter().map(String::from).collect(),
            general_keys: p.general_keys().into_iter().map(String::from).collect(),
            alpha: p.alpha(),
            can_play_sound_on_mouse_over: p.can_play_sound_on_mouse_over(),
            text_scale: p.text_scale(),
            visual_style: p.visual_style().to_string(),
            position_x: p.position_x(),
            position_y: p.position_y(),
            size: p.size(),
            color_mask: p.color_mask(),
            border_color: p.border_color(),
            error_count: p.error_count(),
            last_error: p.last_error().to_string(),
        }
    }
}

fn cmd_show(file: &Path, json: bool) -> Result<()> {
    let packet = Packet::from(read_document(file)?);
    let view = PacketView::from(&packet);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", style::header(&file.display().to_string()));
    println!("  Mode          : {}", view.cmd_mode);
    println!("  Session       : {}", view.session_id);
    println!("  User          : {}", view.user);
    println!("  First run     : {}", view.first_run);
    println!("  Text          : {:?}", view.text);
    println!("  Carriage      : {}", view.carriage_index);
    println!("  Special keys  : {}", view.special_keys.join(", "));
    println!("  General keys  : {}", view.general_keys.join(", "));
    println!("  Style         : {}", view.visual_style);
    println!("  Alpha         : {}", view.alpha);
    println!("  Text scale    : {}", view.text_scale);
    println!("  Position      : ({}, {})", view.position_x, view.position_y);
    println!("  Size          : {}", view.size);
    println!("  Color mask    : {}", view.color_mask);
    println!("  Border color  : {}", view.border_color);
    println!("  Mouse sound   : {}", view.can_play_sound_on_mouse_over);
    if view.error_count > 0 {
        println!(
            "{}",
            style::warn(&format!("{} error(s), last: {}", view.error_count, view.last_error))
        );
    }
    Ok(())
}

fn cmd_sync(local: &Path, external: &Path) -> Result<()> {
    let packet = if local.exists() {
        Packet::from(read_document(local)?)
    } else {
        Packet::new()
    };

    let mut terminal = Terminal::with_packet(FileEndpoint::new(external), packet);
    let outcome = terminal
        .tick()
        .with_context(|| format!("sync tick against {} failed", external.display()))?;
    println!("{}", style::outcome(&outcome));

    let (packet, _) = terminal.into_parts();
    write_document(local, packet.store())?;
    Ok(())
}

fn cmd_flag_error(file: &Path, message: &str) -> Result<()> {
    let mut packet = Packet::from(read_document(file)?);
    packet.flag_error(message);
    write_document(file, packet.store())?;
    println!(
        "{}",
        style::success(&format!(
            "{}: error #{} recorded",
            file.display(),
            packet.error_count()
        ))
    );
    Ok(())
}
