mod frontend;

use anyhow::{Context, Result, bail};
use clap::Parser;
use pairs_rs::{FileStore, Session, SuitPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

use frontend::args::Args;
use frontend::game::Game;
use frontend::renderer::CliRenderer;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(e) = args.validate() {
        bail!(e);
    }

    // Logs go to stderr so they never interleave with the board.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    println!(
        r#"
┌─────────────────────────────────────────┐
│          PAIRS  (CLI Edition)           │
│   Type 'help' or '?' for commands.      │
└─────────────────────────────────────────┘
"#
    );

    let store = match &args.save_file {
        Some(path) => FileStore::at(path),
        None => FileStore::default_location().context("locating the save file")?,
    };
    info!(path = %store.path().display(), "Using save file");

    let boot = args.boot();
    let pool = SuitPool::standard();
    let mut session = match boot.seed {
        Some(seed) => Session::seeded(pool, store, seed),
        None => Session::new(pool, store),
    };
    let outcome = session.boot(&boot).context("dealing the board")?;
    info!(?outcome, "Session ready");

    let mut game = Game::new(session, CliRenderer::new(boot.blind));
    game.run().context("reading player input")?;
    Ok(())
}
