#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Stealth Maze experience.

mod session;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use stealth_maze_core::GAME_TITLE;
use stealth_maze_rendering::{Presentation, RenderingBackend};
use stealth_maze_rendering_terminal::TerminalBackend;
use stealth_maze_system_campaign::Campaign;
use tracing_subscriber::EnvFilter;

use crate::session::Session;

/// Turn-based stealth through a maze of patrolling and chasing enemies.
#[derive(Debug, Parser)]
#[command(name = "stealth-maze", version)]
struct Args {
    /// Campaign file in TOML; the classic three levels when omitted.
    #[arg(long, value_name = "FILE")]
    campaign: Option<PathBuf>,
    /// Directory holding the level layout files.
    #[arg(long, value_name = "DIR", default_value = ".")]
    maps: PathBuf,
    /// One-based level to start from.
    #[arg(long, value_name = "N", default_value_t = 1)]
    level: usize,
}

/// Entry point for the Stealth Maze command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let campaign = load_campaign(args.campaign.as_deref())?;
    let layouts = load_layouts(&campaign, &args.maps);
    let mut session = Session::new(campaign, layouts, args.level.saturating_sub(1))?;

    let presentation = Presentation::new(GAME_TITLE, session.scene());
    TerminalBackend::new().run(presentation, |input, scene| session.handle(input, scene))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_campaign(path: Option<&Path>) -> Result<Campaign> {
    let Some(path) = path else {
        return Ok(Campaign::classic());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read campaign file {}", path.display()))?;
    Campaign::from_toml_str(&contents)
        .with_context(|| format!("invalid campaign file {}", path.display()))
}

/// Reads the layout text of every level that names one.
///
/// Unreadable layouts are logged and left out, so the level falls back to a
/// bordered room.
fn load_layouts(campaign: &Campaign, maps: &Path) -> Vec<Option<String>> {
    campaign
        .levels()
        .iter()
        .map(|blueprint| {
            let name = blueprint.layout.as_deref()?;
            let path = maps.join(name);
            match fs::read_to_string(&path) {
                Ok(contents) => Some(contents),
                Err(error) => {
                    tracing::warn!(
                        path = %path.display(),
                        %error,
                        "layout unavailable, using a bordered room"
                    );
                    None
                }
            }
        })
        .collect()
}
