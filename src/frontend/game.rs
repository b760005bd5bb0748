use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

use pairs_rs::{Notice, SaveStore, Selection, Session};
use tracing::{debug, warn};

use super::command::{Command, parse_command};
use super::renderer::Renderer;

/// The interactive loop. `renderer` is injected so the session stays
/// presentation-agnostic.
pub struct Game<S: SaveStore, R: Renderer> {
    session: Session<S>,
    renderer: R,
    rows: usize,
    columns: usize,
}

impl<S: SaveStore, R: Renderer> Game<S, R> {
    pub fn new(session: Session<S>, renderer: R) -> Self {
        let board = session.board();
        let (rows, columns) = (board.rows(), board.columns());
        Game {
            session,
            renderer,
            rows,
            columns,
        }
    }

    /// Run until the player quits or input ends. The game is saved on the
    /// way out either way, and after every flip in between.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        self.flush_notices();
        self.render();

        loop {
            print!("> ");
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            match parse_command(&line) {
                Err(e) => self.renderer.error(&e),
                Ok(cmd) => {
                    if self.handle(cmd) {
                        break;
                    }
                    self.flush_notices();
                    self.render();
                    if self.settle() {
                        self.render();
                    }
                }
            }
        }

        self.save();
        self.session.teardown();
        Ok(())
    }

    /// Dispatch a command. Returns `true` if the game should exit.
    fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Quit => {
                self.renderer.info("Thanks for playing. Goodbye!");
                return true;
            }
            Command::Help => self.renderer.help(),
            Command::Save => {
                if self.save() {
                    self.renderer.info("Game saved.");
                }
            }
            Command::NewGame => match self.session.start_new_game(self.rows, self.columns) {
                Ok(()) => self.renderer.info("A new game has been dealt."),
                Err(e) => self.renderer.error(&e.to_string()),
            },
            Command::Flip { row, col } => {
                let Some(slot) = self.session.board().slot(row, col) else {
                    self.renderer.error(&format!(
                        "No card at {} {} (rows 0–{}, columns 0–{})",
                        row,
                        col,
                        self.rows - 1,
                        self.columns - 1
                    ));
                    return false;
                };
                if self.session.select(slot) == Selection::Ignored {
                    self.renderer.error("That card cannot be picked right now.");
                } else {
                    self.autosave();
                }
            }
        }
        false
    }

    /// Wait out in-flight transitions, feeding real elapsed time to the
    /// session. Returns `true` if anything changed on the board.
    fn settle(&mut self) -> bool {
        let mut applied = 0;
        let mut last = Instant::now();
        while let Some(wait) = self.session.engine().next_transition_in() {
            thread::sleep(wait);
            let now = Instant::now();
            applied += self.session.update(now - last);
            last = now;
        }
        debug!(applied, "Transitions settled");
        applied > 0
    }

    fn flush_notices(&mut self) {
        for notice in self.session.drain_notices() {
            match notice {
                Notice::Cue(cue) => self.renderer.cue(cue),
                Notice::ScoreChanged { .. } => {}
                Notice::GameEnded => self.renderer.win(self.session.score()),
            }
        }
    }

    fn save(&mut self) -> bool {
        match self.session.save_game() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Save failed");
                self.renderer.error(&format!("Could not save: {}", e));
                false
            }
        }
    }

    /// Quiet save after every accepted flip, so an interrupted process
    /// resumes from the last move.
    fn autosave(&mut self) {
        if let Err(e) = self.session.save_game() {
            warn!(error = %e, "Autosave failed");
        }
    }

    fn render(&mut self) {
        self.renderer.render(
            self.session.board(),
            self.session.pool(),
            self.session.score(),
        );
    }
}
