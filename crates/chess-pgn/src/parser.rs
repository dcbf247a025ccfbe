//! PGN parser: tag pairs and movetext into [`PgnGame`] records.

use crate::lexer::{Lexer, Token, TokenKind};
use crate::PgnError;
use chess_engine::Board;
use std::fmt;

/// Outcome recorded by a game termination marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// `*`: unfinished, unknown, or no terminator present.
    #[default]
    Unknown,
}

impl GameResult {
    /// Parses a termination marker symbol.
    pub fn from_symbol(text: &str) -> Option<Self> {
        match text {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            "*" => Some(GameResult::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unknown => "*",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mainline move with its annotations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PgnMove {
    /// The SAN text as written.
    pub san: String,
    /// Numeric annotation glyphs, in order of appearance.
    pub nags: Vec<u8>,
    /// Comments following the move, joined by a space.
    pub comment: Option<String>,
}

/// A parsed game: tags in file order, mainline moves and the result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PgnGame {
    pub tags: Vec<(String, String)>,
    /// Comment placed before the first move.
    pub comment: Option<String>,
    pub moves: Vec<PgnMove>,
    pub result: GameResult,
}

impl PgnGame {
    /// Looks up a tag value by name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The position the movetext starts from.
    ///
    /// This is the `FEN` tag when the game carries `SetUp "1"`, otherwise the
    /// standard starting position.
    pub fn starting_board(&self) -> Result<Board, PgnError> {
        match (self.tag("SetUp"), self.tag("FEN")) {
            (Some("1"), Some(fen)) => Ok(Board::from_fen(fen)?),
            _ => Ok(Board::startpos()),
        }
    }
}

impl PgnGame {
    fn annotate_nag(&mut self, nag: u8) {
        match self.moves.last_mut() {
            Some(last) => last.nags.push(nag),
            None => tracing::trace!(nag, "NAG before first move ignored"),
        }
    }

    fn annotate_comment(&mut self, text: String) {
        match self.moves.last_mut() {
            Some(last) => append_comment(&mut last.comment, text),
            None => append_comment(&mut self.comment, text),
        }
    }
}

fn append_comment(slot: &mut Option<String>, text: String) {
    if text.is_empty() {
        return;
    }
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(&text);
        }
        None => *slot = Some(text),
    }
}

/// Parses every game in `text`.
pub fn parse_str(text: &str) -> Result<Vec<PgnGame>, PgnError> {
    let tokens = Lexer::tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut games = Vec::new();
    while let Some(game) = parser.game()? {
        games.push(game);
    }
    tracing::debug!(games = games.len(), "parsed PGN");
    Ok(games)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token vector always ends with Eof and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(token: &Token, message: impl Into<String>) -> PgnError {
        PgnError::syntax(token.line, token.column, message)
    }

    /// Parses one game, or returns `None` at end of input.
    fn game(&mut self) -> Result<Option<PgnGame>, PgnError> {
        if self.peek().kind == TokenKind::Eof {
            return Ok(None);
        }

        let mut game = PgnGame::default();
        while self.peek().kind == TokenKind::LeftBracket {
            self.advance();
            game.tags.push(self.tag_pair()?);
        }

        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Integer(_) => {
                    while self.peek().kind == TokenKind::Period {
                        self.advance();
                    }
                }
                TokenKind::Period | TokenKind::LeftAngle | TokenKind::RightAngle => {}
                TokenKind::Asterisk => {
                    game.result = GameResult::Unknown;
                    break;
                }
                TokenKind::Symbol(text) => match GameResult::from_symbol(&text) {
                    Some(result) => {
                        game.result = result;
                        break;
                    }
                    None => {
                        let marked = text.ends_with('e') && self.skip_en_passant_marker();
                        let san = if marked {
                            text[..text.len() - 1].to_string()
                        } else {
                            text
                        };
                        if !san.is_empty() {
                            game.moves.push(PgnMove {
                                san,
                                ..PgnMove::default()
                            });
                        }
                    }
                },
                TokenKind::Nag(nag) => game.annotate_nag(nag),
                TokenKind::Comment(text) => game.annotate_comment(text),
                TokenKind::LeftParen => self.skip_variation(&token)?,
                TokenKind::RightParen => return Err(Self::error(&token, "unbalanced ')'")),
                TokenKind::String(_) => {
                    return Err(Self::error(&token, "string outside of a tag pair"))
                }
                TokenKind::RightBracket => return Err(Self::error(&token, "unexpected ']'")),
                TokenKind::LeftBracket => {
                    // A new tag section: the previous game had no terminator.
                    self.pos -= 1;
                    break;
                }
                TokenKind::Eof => break,
            }
        }

        // Annotations after the terminator belong to the finished game.
        loop {
            match &self.peek().kind {
                TokenKind::Nag(nag) => game.annotate_nag(*nag),
                TokenKind::Comment(text) => game.annotate_comment(text.clone()),
                _ => break,
            }
            self.advance();
        }

        if let Some(tagged) = game.tag("Result").and_then(GameResult::from_symbol) {
            if tagged != game.result {
                tracing::debug!(tag = %tagged, movetext = %game.result, "result tag disagrees");
            }
        }
        Ok(Some(game))
    }

    fn tag_pair(&mut self) -> Result<(String, String), PgnError> {
        let name = match self.advance() {
            Token {
                kind: TokenKind::Symbol(name),
                ..
            } => name,
            token => return Err(Self::error(&token, "expected tag name")),
        };
        let value = match self.advance() {
            Token {
                kind: TokenKind::String(value),
                ..
            } => value,
            token => return Err(Self::error(&token, format!("expected value for tag {name}"))),
        };
        match self.advance() {
            Token {
                kind: TokenKind::RightBracket,
                ..
            } => Ok((name, value)),
            token => Err(Self::error(&token, "expected ']' after tag value")),
        }
    }

    /// Skips a recursive annotation variation; `open` is its `(`.
    /// Consumes the `. p .` that the lexer leaves after the `e` of an `e.p.`
    /// suffix. Consumes nothing and returns false when the tokens do not
    /// spell that suffix.
    fn skip_en_passant_marker(&mut self) -> bool {
        let kinds: Vec<&TokenKind> = self.tokens[self.pos..]
            .iter()
            .take(3)
            .map(|token| &token.kind)
            .collect();
        match kinds.as_slice() {
            [TokenKind::Period, TokenKind::Symbol(p), TokenKind::Period] if p == "p" => {
                self.pos += 3;
                true
            }
            _ => false,
        }
    }

    fn skip_variation(&mut self, open: &Token) -> Result<(), PgnError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance().kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                TokenKind::Eof => return Err(Self::error(open, "unterminated variation")),
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(text: &str) -> PgnGame {
        let mut games = parse_str(text).unwrap();
        assert_eq!(games.len(), 1);
        games.remove(0)
    }

    fn sans(game: &PgnGame) -> Vec<&str> {
        game.moves.iter().map(|m| m.san.as_str()).collect()
    }

    #[test]
    fn tags_moves_and_result() {
        let game = parse_one(
            "[Event \"Casual\"]\n[White \"A\"]\n[Result \"0-1\"]\n\n1. f3 e5 2. g4 Qh4# 0-1\n",
        );
        assert_eq!(game.tag("Event"), Some("Casual"));
        assert_eq!(game.tag("Black"), None);
        assert_eq!(game.tags.len(), 3);
        assert_eq!(sans(&game), vec!["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(game.result, GameResult::BlackWins);
    }

    #[test]
    fn annotations_attach_to_previous_move() {
        let game = parse_one("{opening} 1. e4 $1 {good} {really} e5?! 2. Nf3 *");
        assert_eq!(game.comment.as_deref(), Some("opening"));
        assert_eq!(game.moves[0].nags, vec![1]);
        assert_eq!(game.moves[0].comment.as_deref(), Some("good really"));
        assert_eq!(game.moves[1].nags, vec![6]);
        assert_eq!(game.moves[2].comment, None);
        assert_eq!(game.result, GameResult::Unknown);
    }

    #[test]
    fn variations_are_skipped() {
        let game = parse_one("1. e4 (1. d4 d5 (1... Nf6) 2. c4) e5 2... Nc6 1/2-1/2");
        assert_eq!(sans(&game), vec!["e4", "e5", "Nc6"]);
        assert_eq!(game.result, GameResult::Draw);
    }

    #[test]
    fn missing_result_is_unknown() {
        let game = parse_one("1. e4 e5");
        assert_eq!(sans(&game), vec!["e4", "e5"]);
        assert_eq!(game.result, GameResult::Unknown);
    }

    #[test]
    fn several_games() {
        let text = "[Event \"1\"]\n1. e4 1-0\n\n[Event \"2\"]\n1. d4\n[Event \"3\"]\n*\n";
        let games = parse_str(text).unwrap();
        assert_eq!(games.len(), 3);
        assert_eq!(games[0].result, GameResult::WhiteWins);
        assert_eq!(sans(&games[1]), vec!["d4"]);
        assert_eq!(games[1].result, GameResult::Unknown);
        assert_eq!(games[2].tag("Event"), Some("3"));
        assert!(games[2].moves.is_empty());
        assert!(parse_str("  \n").unwrap().is_empty());
    }

    #[test]
    fn annotations_after_the_result_stay_with_their_game() {
        let text = "[Event \"1\"]\n1. e4 1-0 {won on time}\n\n[Event \"2\"]\n1. d4 * $10\n";
        let games = parse_str(text).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].moves[0].comment.as_deref(), Some("won on time"));
        assert_eq!(games[1].tag("Event"), Some("2"));
        assert_eq!(games[1].moves[0].nags, vec![10]);

        let games = parse_str("1. e4 1-0 {end}\n").unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].result, GameResult::WhiteWins);

        let games = parse_str("{just a note} 1-0 {end}").unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].comment.as_deref(), Some("just a note end"));
    }

    #[test]
    fn en_passant_suffix_is_dropped() {
        let game = parse_one("1. e4 d5 2. e5 f5 3. exf6 e.p. Nf6 4. exd5e.p. *");
        assert_eq!(sans(&game), ["e4", "d5", "e5", "f5", "exf6", "Nf6", "exd5"]);
    }

    #[test]
    fn starting_board_honours_setup() {
        let fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1";
        let game = parse_one(&format!("[SetUp \"1\"]\n[FEN \"{fen}\"]\n1. O-O *"));
        assert_eq!(game.starting_board().unwrap().to_fen(), fen);

        let game = parse_one(&format!("[FEN \"{fen}\"]\n*"));
        assert_eq!(game.starting_board().unwrap(), Board::startpos());

        let game = parse_one("[SetUp \"1\"]\n[FEN \"not a fen\"]\n*");
        assert!(matches!(game.starting_board(), Err(PgnError::Fen(_))));
    }

    #[test]
    fn syntax_errors() {
        assert!(matches!(
            parse_str("[Event]"),
            Err(PgnError::Syntax { line: 1, column: 7, .. })
        ));
        assert!(matches!(parse_str("[\"x\" \"y\"]"), Err(PgnError::Syntax { .. })));
        assert!(matches!(parse_str("1. e4 (e5"), Err(PgnError::Syntax { .. })));
        assert!(matches!(parse_str("1. e4 )"), Err(PgnError::Syntax { .. })));
        assert!(matches!(parse_str("1. e4 \"x\""), Err(PgnError::Syntax { .. })));
    }

    #[test]
    fn result_display() {
        assert_eq!(GameResult::Draw.to_string(), "1/2-1/2");
        assert_eq!(GameResult::from_symbol("1-0"), Some(GameResult::WhiteWins));
        assert_eq!(GameResult::from_symbol("2-0"), None);
    }
}
