//! Interactive stepping through a game.
//!
//! The stepper owns one board and moves it forwards with [`Board::apply`]
//! and backwards with the stored [`MoveUndo`] records.

use crate::config::ViewerConfig;
use crate::render::render_board;
use chess_core::Move;
use chess_engine::{Board, LineAttacks, MoveUndo};
use chess_pgn::{replay, PgnError, PgnGame};
use std::io::{self, BufRead, Write};

/// A command typed at the viewer prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Start,
    End,
    Goto(usize),
    Quit,
}

impl Command {
    /// Parses one input line. An empty line means [`Command::Next`].
    pub fn parse(line: &str) -> Option<Command> {
        let mut words = line.split_whitespace();
        let command = match words.next() {
            None | Some("n") => Command::Next,
            Some("p") => Command::Previous,
            Some("s") => Command::Start,
            Some("e") => Command::End,
            Some("q") => Command::Quit,
            Some("g") => Command::Goto(words.next()?.parse().ok()?),
            Some(_) => return None,
        };
        match words.next() {
            Some(_) => None,
            None => Some(command),
        }
    }
}

/// A resolved game and a cursor into it.
pub struct Stepper {
    board: Board,
    moves: Vec<Move>,
    sans: Vec<String>,
    undos: Vec<MoveUndo>,
}

impl Stepper {
    /// Resolves every move of `game` and positions the cursor at the start.
    pub fn from_game(game: &PgnGame, tables: &LineAttacks) -> Result<Self, PgnError> {
        let moves = replay(game, tables)?;
        let sans = game.moves.iter().map(|m| m.san.clone()).collect();
        Ok(Self {
            board: game.starting_board()?,
            moves,
            sans,
            undos: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of plies currently applied.
    pub fn ply(&self) -> usize {
        self.undos.len()
    }

    pub fn total_plies(&self) -> usize {
        self.moves.len()
    }

    /// SAN of the last applied move.
    pub fn last_san(&self) -> Option<&str> {
        let ply = self.ply();
        if ply == 0 {
            return None;
        }
        self.sans.get(ply - 1).map(String::as_str)
    }

    pub fn step_forward(&mut self) -> bool {
        let Some(&m) = self.moves.get(self.ply()) else {
            return false;
        };
        let undo = self.board.apply(m);
        self.undos.push(undo);
        true
    }

    pub fn step_back(&mut self) -> bool {
        let Some(undo) = self.undos.pop() else {
            return false;
        };
        self.board.undo(self.moves[self.undos.len()], &undo);
        true
    }

    /// Moves the cursor to `ply`, clamped to the game length.
    pub fn goto(&mut self, ply: usize) {
        let target = ply.min(self.total_plies());
        while self.ply() > target {
            self.step_back();
        }
        while self.ply() < target {
            self.step_forward();
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Next => {
                self.step_forward();
            }
            Command::Previous => {
                self.step_back();
            }
            Command::Start => self.goto(0),
            Command::End => self.goto(self.total_plies()),
            Command::Goto(ply) => self.goto(ply),
            Command::Quit => {}
        }
    }
}

fn print_position<W: Write>(
    stepper: &Stepper,
    config: &ViewerConfig,
    out: &mut W,
) -> io::Result<()> {
    write!(out, "{}", render_board(stepper.board(), config))?;
    match stepper.last_san() {
        Some(san) => writeln!(
            out,
            "ply {}/{}: {}",
            stepper.ply(),
            stepper.total_plies(),
            san
        )?,
        None => writeln!(out, "ply 0/{}: start", stepper.total_plies())?,
    }
    write!(out, "> ")?;
    out.flush()
}

/// Reads commands from `input` until `q` or end of input.
pub fn run<R: BufRead, W: Write>(
    stepper: &mut Stepper,
    config: &ViewerConfig,
    input: R,
    mut out: W,
) -> io::Result<()> {
    print_position(stepper, config, &mut out)?;
    for line in input.lines() {
        let line = line?;
        match Command::parse(&line) {
            Some(Command::Quit) => break,
            Some(command) => {
                stepper.execute(command);
                print_position(stepper, config, &mut out)?;
            }
            None => {
                writeln!(out, "unknown command '{}' (n, p, s, e, g N, q)", line.trim())?;
                write!(out, "> ")?;
                out.flush()?;
            }
        }
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stepper(text: &str) -> Stepper {
        let game = chess_pgn::parse_str(text).unwrap().remove(0);
        Stepper::from_game(&game, LineAttacks::global()).unwrap()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse(""), Some(Command::Next));
        assert_eq!(Command::parse("  n "), Some(Command::Next));
        assert_eq!(Command::parse("p"), Some(Command::Previous));
        assert_eq!(Command::parse("s"), Some(Command::Start));
        assert_eq!(Command::parse("e"), Some(Command::End));
        assert_eq!(Command::parse("g 12"), Some(Command::Goto(12)));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("g"), None);
        assert_eq!(Command::parse("g x"), None);
        assert_eq!(Command::parse("n 2"), None);
        assert_eq!(Command::parse("jump"), None);
    }

    #[test]
    fn stepping_restores_positions() {
        let mut stepper = stepper("1. e4 d5 2. exd5 Qxd5 3. Nc3 *");
        assert_eq!(stepper.total_plies(), 5);
        assert!(!stepper.step_back());

        stepper.goto(4);
        assert_eq!(stepper.last_san(), Some("Qxd5"));
        let after_four = stepper.board().clone();

        stepper.execute(Command::End);
        assert_eq!(stepper.ply(), 5);
        assert!(!stepper.step_forward());
        assert!(stepper.step_back());
        assert_eq!(stepper.board(), &after_four);

        stepper.execute(Command::Start);
        assert_eq!(stepper.board(), &Board::startpos());
        assert_eq!(stepper.last_san(), None);

        stepper.execute(Command::Goto(99));
        assert_eq!(stepper.ply(), 5);
    }

    #[test]
    fn run_reads_until_quit() {
        let mut stepper = stepper("1. e4 e5 2. Nf3 *");
        let mut out = Vec::new();
        run(
            &mut stepper,
            &ViewerConfig::default(),
            Cursor::new("n\n\nbogus\np\nq\nn\n"),
            &mut out,
        )
        .unwrap();

        assert_eq!(stepper.ply(), 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ply 0/3: start"));
        assert!(text.contains("ply 2/3: e5"));
        assert!(text.contains("unknown command 'bogus'"));
        assert!(text.contains("4 . . . . P . . ."));
    }
}
