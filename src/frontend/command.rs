/// All commands a player can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reveal the card at (`row`, `col`).
    Flip { row: usize, col: usize },
    /// Write the current game to the save file.
    Save,
    /// Give up and deal a new game of the same size.
    NewGame,
    /// Quit (the game is saved first).
    Quit,
    /// Print help.
    Help,
}

/// Parse a single line of text input into a `Command`.
///
/// Syntax reference (case-insensitive):
/// ```text
/// flip <row> <col> | f <row> <col>  -- Reveal a card
/// <row> <col>                       -- Same, shorthand
/// save | s                          -- Save now
/// new | n                           -- New game
/// quit | q                          -- Save and quit
/// help | h | ?                      -- Help
/// ```
/// Bounds are checked by the game, which knows the board size.
pub fn parse_command(input: &str) -> Result<Command, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty input".to_string());
    }

    let tokens: Vec<&str> = input.split_whitespace().collect();
    let cmd = tokens[0].to_lowercase();

    match cmd.as_str() {
        "flip" | "f" => {
            if tokens.len() < 3 {
                return Err("Usage: flip <row> <col>".to_string());
            }
            parse_flip(tokens[1], tokens[2])
        }
        "save" | "s" => Ok(Command::Save),
        "new" | "n" => Ok(Command::NewGame),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "help" | "h" | "?" => Ok(Command::Help),
        _ if tokens.len() == 2 && tokens[0].parse::<usize>().is_ok() => {
            parse_flip(tokens[0], tokens[1])
        }
        _ => Err(format!("Unknown command '{}'. Type 'help' for help.", tokens[0])),
    }
}

fn parse_flip(row: &str, col: &str) -> Result<Command, String> {
    Ok(Command::Flip {
        row: parse_index(row, "row")?,
        col: parse_index(col, "column")?,
    })
}

fn parse_index(s: &str, what: &str) -> Result<usize, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid {} index", s, what))
}
