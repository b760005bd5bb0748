//! Command-line boot parameters.

use std::path::PathBuf;

use clap::Parser;
use pairs_rs::Boot;
use pairs_rs::board::{MAX_SIDE, MIN_SIDE};

/// Pairs – flip two cards a turn and clear the board.
#[derive(Parser, Debug)]
#[command(name = "pairs-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Number of rows (2-6)
    #[arg(short, long, default_value_t = 4, value_parser = side)]
    pub rows: usize,

    /// Number of columns (2-6)
    #[arg(short, long, default_value_t = 4, value_parser = side)]
    pub columns: usize,

    /// Resume the saved game instead of dealing a new one
    #[arg(short, long)]
    pub load: bool,

    /// Blind mode: cards seen before show as ?? when revealed again
    #[arg(short, long)]
    pub blind: bool,

    /// Seed for a reproducible deal
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Save file location (defaults to the per-user data directory)
    #[arg(long)]
    pub save_file: Option<PathBuf>,
}

fn side(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !(MIN_SIDE..=MAX_SIDE).contains(&n) {
        return Err(format!("must be between {} and {}", MIN_SIDE, MAX_SIDE));
    }
    Ok(n)
}

impl Args {
    /// Rows times columns must be even so every card has a partner.
    pub fn validate(&self) -> Result<(), String> {
        if (self.rows * self.columns) % 2 != 0 {
            return Err(format!(
                "a {}x{} board has an odd number of cards; pick an even rows x columns",
                self.rows, self.columns
            ));
        }
        Ok(())
    }

    pub fn boot(&self) -> Boot {
        Boot {
            new_game: !self.load,
            rows: self.rows,
            columns: self.columns,
            blind: self.blind,
            seed: self.seed,
        }
    }
}
