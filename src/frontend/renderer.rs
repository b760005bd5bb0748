use crossterm::style::Stylize;
use pairs_rs::{Board, CardFace, CardState, Cue, Feedback, Score, SuitPool};

/// Trait that abstracts the rendering layer, so the game loop stays
/// renderer-agnostic.
pub trait Renderer {
    /// Render the full board with the score line.
    fn render(&mut self, board: &Board, pool: &SuitPool, score: Score);
    /// Play (or show) an audio cue.
    fn cue(&mut self, cue: Cue);
    /// Display an informational message.
    fn info(&mut self, msg: &str);
    /// Display an error message.
    fn error(&mut self, msg: &str);
    /// Display the help text.
    fn help(&mut self);
    /// Display the win screen.
    fn win(&mut self, score: Score);
}

// ---------------------------------------------------------------------------
// CLI Renderer
// ---------------------------------------------------------------------------

/// A plain terminal renderer with colored cards.
pub struct CliRenderer {
    blind: bool,
}

impl CliRenderer {
    pub fn new(blind: bool) -> Self {
        CliRenderer { blind }
    }

    /// Blind mode: anything the player already turned over once shows as
    /// a question mark.
    fn symbol(&self, card: &CardState, pool: &SuitPool) -> String {
        if self.blind && card.reveal_count() > 1 {
            return "??".to_string();
        }
        pool.lookup(card.identity())
            .map(|s| s.symbol.clone())
            .unwrap_or_else(|_| "!!".to_string())
    }

    fn card_str(&self, card: &CardState, pool: &SuitPool) -> String {
        if card.is_hidden() {
            return "      ".to_string();
        }
        if !card.is_face_up() {
            return format!(" {} ", "[##]".dark_grey());
        }

        let face = format!("[{:^2}]", self.symbol(card, pool));
        match card.feedback() {
            Feedback::Match => format!(" {} ", face.green()),
            Feedback::Mismatch => format!(" {} ", face.red()),
            Feedback::None => format!(" {} ", face.yellow().bold()),
        }
    }
}

impl Renderer for CliRenderer {
    fn render(&mut self, board: &Board, pool: &SuitPool, score: Score) {
        println!();
        println!(
            "  TURN: {}   POINTS: {}   NEXT MATCH: +{}",
            score.turn, score.points, score.combo
        );
        println!();

        // ---- Column indices header ----
        print!("  COL: ");
        for i in 0..board.columns() {
            print!("  {:^4}", i);
        }
        println!();

        // ---- Grid ----
        for (row, cards) in board.rows_iter().enumerate() {
            print!("  {:>3}: ", row);
            for card in cards {
                print!("{}", self.card_str(card, pool));
            }
            println!();
        }
        println!();
    }

    fn cue(&mut self, cue: Cue) {
        match cue {
            Cue::CardFlip => {}
            Cue::Match => println!("  {}", "*ding* A pair!".green()),
            Cue::Mismatch => println!("  {}", "*bzzt* No match.".red()),
            Cue::GameOver => println!("  {}", "*fanfare*".magenta()),
        }
    }

    fn info(&mut self, msg: &str) {
        println!("{} {}", "[INFO]".cyan(), msg);
    }

    fn error(&mut self, msg: &str) {
        println!("{} {}", "[ERR ]".red(), msg);
    }

    fn help(&mut self) {
        println!(
            r#"
╔══════════════════════════════════════════════════════════════╗
║                     PAIRS – CLI Help                         ║
╠══════════════════════════════════════════════════════════════╣
║  GOAL: Find every pair of matching cards.                    ║
║                                                              ║
║  RULES:                                                      ║
║    · Reveal two cards per turn.                              ║
║    · A matching pair leaves the board.                       ║
║    · A mismatch turns both cards back over.                  ║
║    · Each match scores the NEXT MATCH value, which grows by  ║
║      one per consecutive match and resets on a mismatch.     ║
╠══════════════════════════════════════════════════════════════╣
║  COMMANDS (case-insensitive):                                ║
║                                                              ║
║  flip <row> <col>        Reveal a card (also: f, or just     ║
║                          "<row> <col>")                      ║
║  save                    Save the game                       ║
║  new                     Deal a new game                     ║
║  quit                    Save and exit                       ║
║  help | h | ?            Show this help                      ║
╚══════════════════════════════════════════════════════════════╝
"#
        );
    }

    fn win(&mut self, score: Score) {
        println!(
            "\n  {}\n  Cleared in {} turns with {} points. Type 'new' for another game.\n",
            "All pairs found!".yellow().bold(),
            score.turn,
            score.points
        );
    }
}
